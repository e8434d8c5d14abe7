//! Geographic scope resolution: which segments a rule applies to.
//!
//! A rule either files no geo reference (the resolver then falls back to a
//! phase-dependent default) or points at a geo table entry pairing a TSI
//! scope class with a location filter. Each selected segment is tagged with
//! which end matched; the tag decides whether downstream comparison reads
//! the segment's departure or arrival.

use tariff_catalog::{CatalogError, GeoTableRef, LocationSpec, RuleCatalog, TsiScope};
use tariff_core::{Direction, FareComponent, Itinerary, PricingUnit};

/// One segment selected into a rule's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopedSegment {
    /// Index into the itinerary's segment list.
    pub segment: usize,
    /// The location filter matched the departure end.
    pub origin_matched: bool,
    /// The location filter matched the arrival end.
    pub dest_matched: bool,
}

impl ScopedSegment {
    pub(crate) fn origin(segment: usize) -> Self {
        ScopedSegment {
            segment,
            origin_matched: true,
            dest_matched: false,
        }
    }
}

/// The resolver's output: the ordered selection plus the scope class that
/// was actually used, so the caller can judge whether a deferral was
/// avoidable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScope {
    pub segments: Vec<ScopedSegment>,
    pub tsi: TsiScope,
}

/// Why a scope could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The reference selects zero segments and widening cannot help.
    NoMatch,
    /// Resolution needs itinerary structure that does not exist yet; carry
    /// the scope class that would be required.
    NeedsWiderScope(TsiScope),
    /// The geo table reference did not resolve in the catalog.
    GeoTableMissing(CatalogError),
}

/// Resolve a rule's geo reference against the structure known so far.
///
/// `pricing_unit` is `None` during fare-component-phase validation; the
/// resolver signals [`ScopeError::NeedsWiderScope`] instead of guessing
/// when the entry's scope class needs more than that.
pub fn resolve_scope<C: RuleCatalog>(
    catalog: &C,
    geo_ref: GeoTableRef,
    itinerary: &Itinerary,
    fare_component: &FareComponent,
    pricing_unit: Option<&PricingUnit>,
) -> Result<ResolvedScope, ScopeError> {
    if geo_ref.is_none() {
        return resolve_default(fare_component, pricing_unit);
    }

    let entry = catalog
        .geo_table_entry(geo_ref)
        .map_err(ScopeError::GeoTableMissing)?;

    let candidates: Vec<usize> = match entry.tsi {
        TsiScope::FareComponent => fare_component.segments.clone().collect(),
        TsiScope::SubJourney => match pricing_unit {
            // Approximated by the fare component until the unit exists.
            None => fare_component.segments.clone().collect(),
            Some(pu) => {
                if fare_component.direction == Direction::Inbound {
                    pu.return_segments()
                } else {
                    pu.outbound_segments()
                }
            }
        },
        TsiScope::PricingUnit => match pricing_unit {
            None => return Err(ScopeError::NeedsWiderScope(TsiScope::PricingUnit)),
            Some(pu) => pu.segment_indices(),
        },
        TsiScope::Journey => match pricing_unit {
            None => return Err(ScopeError::NeedsWiderScope(TsiScope::Journey)),
            Some(_) => (0..itinerary.len()).collect(),
        },
    };

    let mut segments = Vec::new();
    for index in candidates {
        let seg = match itinerary.segment(index) {
            Some(s) => s,
            None => continue,
        };
        match &entry.locations {
            LocationSpec::Any => segments.push(ScopedSegment::origin(index)),
            filter => {
                let origin_matched = filter.matches(&seg.origin);
                let dest_matched = filter.matches(&seg.destination);
                if origin_matched || dest_matched {
                    segments.push(ScopedSegment {
                        segment: index,
                        origin_matched,
                        dest_matched,
                    });
                }
            }
        }
    }

    if segments.is_empty() {
        // A sub-journey approximated by the fare component may still match
        // once the full sub-journey exists.
        if pricing_unit.is_none() && entry.tsi == TsiScope::SubJourney {
            return Err(ScopeError::NeedsWiderScope(TsiScope::SubJourney));
        }
        return Err(ScopeError::NoMatch);
    }

    Ok(ResolvedScope {
        segments,
        tsi: entry.tsi,
    })
}

/// No geo reference filed: all of the fare component's segments, or the
/// pricing unit's segments up to its turnaround. This default is what lets
/// most rules run during the cheaper fare-component phase.
fn resolve_default(
    fare_component: &FareComponent,
    pricing_unit: Option<&PricingUnit>,
) -> Result<ResolvedScope, ScopeError> {
    let (indices, tsi) = match pricing_unit {
        None => (
            fare_component.segments.clone().collect::<Vec<_>>(),
            TsiScope::FareComponent,
        ),
        Some(pu) => (pu.outbound_segments(), TsiScope::PricingUnit),
    };
    if indices.is_empty() {
        return Err(ScopeError::NoMatch);
    }
    Ok(ResolvedScope {
        segments: indices.into_iter().map(ScopedSegment::origin).collect(),
        tsi,
    })
}
