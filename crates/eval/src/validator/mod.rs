//! Shared rule-validation orchestration.
//!
//! Every temporal category runs the same pipeline: an availability check,
//! a phase gate, geo-scope resolution per filed reference, deadline
//! computation per restriction, a per-segment scan with a boundary-aware
//! "still checking" flag, and a final fold through the verdict algebra.
//! The categories differ only in which restrictions they extract from the
//! record and which reference date each restriction anchors to.
//!
//! When a fare-component-phase run depended on structure that only the
//! pricing unit has, its `Pass` downgrades to `SoftPass`; the returned
//! [`Deferral`] names the restriction to re-check and the scope it needs,
//! so the caller does not re-derive that from scratch.

use time::OffsetDateTime;

use tariff_catalog::{GeoTableRef, RuleCatalog, RuleData, RuleRecord, TsiScope, UnavailableTag};
use tariff_core::{
    Direction, FareComponent, Itinerary, PricingUnit, PricingUnitKind, SegmentKind, TravelSegment,
};

use crate::diagnostics::{DiagSink, Diagnostics};
use crate::scope::{resolve_scope, ResolvedScope, ScopeError, ScopedSegment};
use crate::verdict::{Verdict, VerdictChain};

mod advance_res_tkt;
mod max_stay;
mod min_stay;

/// Which evaluation phase a validation runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Early, cheap phase: only one priced fare component is known.
    FareComponent,
    /// Later phase: the assembled pricing unit (and turnaround) exist.
    PricingUnit,
}

/// Engine configuration, fixed at validator construction. There is no
/// ambient global state; alternate behaviors are selected here explicitly.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Fail sectors that must hold confirmed reservations but do not.
    pub require_confirmed_sectors: bool,
    /// On exchange repricing, only revalidate segments changed by the
    /// exchange.
    pub revalidate_changed_segments_only: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            require_confirmed_sectors: true,
            revalidate_changed_segments_only: false,
        }
    }
}

/// The sub-restriction of a rule that a deferral or failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionKind {
    Reservation,
    Ticketing,
    StayFrom,
    StayTo,
}

/// What a `SoftPass` asks the caller to re-check, and at which scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferral {
    pub restriction: RestrictionKind,
    pub required_scope: TsiScope,
}

/// Outcome of validating one rule record against one fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub verdict: Verdict,
    /// Present exactly when `verdict` is `SoftPass`.
    pub deferred: Option<Deferral>,
}

impl Validation {
    pub fn terminal(verdict: Verdict) -> Self {
        Validation {
            verdict,
            deferred: None,
        }
    }

    pub fn soft(restriction: RestrictionKind, required_scope: TsiScope) -> Self {
        Validation {
            verdict: Verdict::SoftPass,
            deferred: Some(Deferral {
                restriction,
                required_scope,
            }),
        }
    }
}

/// Read-only context for one validation run.
pub(crate) struct RunCtx<'a, C: RuleCatalog> {
    pub catalog: &'a C,
    pub config: &'a EvalConfig,
    pub phase: Phase,
    pub itinerary: &'a Itinerary,
    pub fare_component: &'a FareComponent,
    pub pricing_unit: Option<&'a PricingUnit>,
}

/// Side effects collected during a run and applied to the pricing unit
/// afterwards. Both writes are monotonic: the deadline only tightens and
/// the rebook set only grows.
#[derive(Debug, Default)]
pub(crate) struct Effects {
    pub latest_ticket_date: Option<OffsetDateTime>,
    pub rebook_required: Vec<usize>,
}

/// Validates rule records against fare components and pricing units.
pub struct RuleValidator<'c, C: RuleCatalog> {
    catalog: &'c C,
    config: EvalConfig,
}

impl<'c, C: RuleCatalog> RuleValidator<'c, C> {
    pub fn new(catalog: &'c C, config: EvalConfig) -> Self {
        RuleValidator { catalog, config }
    }

    /// Validate a rule against a single priced fare component.
    pub fn validate_fare_component(
        &self,
        record: &RuleRecord,
        fare_component: &FareComponent,
        itinerary: &Itinerary,
        diag: Option<&mut Diagnostics>,
    ) -> Validation {
        let ctx = RunCtx {
            catalog: self.catalog,
            config: &self.config,
            phase: Phase::FareComponent,
            itinerary,
            fare_component,
            pricing_unit: None,
        };
        let mut sink = DiagSink(diag);
        let mut effects = Effects::default();
        // Fare-component effects have nowhere to land yet; deadline
        // bookkeeping happens once the pricing unit exists.
        run(record, &ctx, &mut sink, &mut effects)
    }

    /// Validate a rule against one fare usage of an assembled pricing unit.
    ///
    /// May tighten the unit's latest ticket date and extend the usage's
    /// rebook set; both updates are idempotent and order-independent.
    pub fn validate_pricing_unit(
        &self,
        record: &RuleRecord,
        pricing_unit: &mut PricingUnit,
        usage_index: usize,
        itinerary: &Itinerary,
        diag: Option<&mut Diagnostics>,
    ) -> Validation {
        let fare_component = match pricing_unit.fare_usages().get(usage_index) {
            Some(usage) => usage.fare_component.clone(),
            None => return Validation::terminal(Verdict::NotProcessed),
        };

        let mut sink = DiagSink(diag);
        let mut effects = Effects::default();
        let validation = {
            let ctx = RunCtx {
                catalog: self.catalog,
                config: &self.config,
                phase: Phase::PricingUnit,
                itinerary,
                fare_component: &fare_component,
                pricing_unit: Some(pricing_unit),
            };
            run(record, &ctx, &mut sink, &mut effects)
        };

        if let Some(deadline) = effects.latest_ticket_date {
            pricing_unit.update_latest_ticket_date(deadline);
        }
        if let Some(usage) = pricing_unit.fare_usage_mut(usage_index) {
            for segment in effects.rebook_required {
                usage.require_rebook(segment);
            }
        }
        validation
    }
}

fn run<C: RuleCatalog>(
    record: &RuleRecord,
    ctx: &RunCtx<'_, C>,
    diag: &mut DiagSink<'_>,
    effects: &mut Effects,
) -> Validation {
    match record.unavailable_tag {
        UnavailableTag::Incomplete => {
            diag.note(|| {
                format!(
                    "rule {}/{} item {}: data unavailable",
                    record.key.vendor, record.key.rule, record.key.item_number
                )
            });
            return Validation::terminal(Verdict::Fail);
        }
        UnavailableTag::TextOnly => return Validation::terminal(Verdict::Skip),
        UnavailableTag::Available => {}
    }

    match &record.data {
        RuleData::AdvanceResTkt(rule) => advance_res_tkt::validate(rule, ctx, diag, effects),
        RuleData::MinStay(rule) => min_stay::validate(rule, ctx, diag, effects),
        RuleData::MaxStay(rule) => max_stay::validate(rule, ctx, diag, effects),
    }
}

// ──────────────────────────────────────────────
// Shared pipeline pieces
// ──────────────────────────────────────────────

/// The date-time a scoped segment contributes to comparisons: the arrival
/// when only the arrival end matched, the departure otherwise.
pub(crate) fn matched_datetime(
    segment: &TravelSegment,
    scoped: &ScopedSegment,
) -> Option<OffsetDateTime> {
    if scoped.dest_matched && !scoped.origin_matched {
        segment.arrival
    } else {
        segment.departure
    }
}

/// First scoped segment carrying a usable date, with that date.
pub(crate) fn first_matched_date(
    itinerary: &Itinerary,
    scope: &ResolvedScope,
) -> Option<(usize, OffsetDateTime)> {
    scope.segments.iter().find_map(|scoped| {
        let segment = itinerary.segment(scoped.segment)?;
        matched_datetime(segment, scoped).map(|dt| (scoped.segment, dt))
    })
}

/// Map a scope-resolution failure onto a validation outcome.
///
/// `on_no_match` lets the restriction decide whether an empty selection
/// fails the rule (a mandatory anchor is missing) or skips it (the
/// restriction simply does not bind this journey).
pub(crate) fn scope_failure(
    error: ScopeError,
    restriction: RestrictionKind,
    on_no_match: Verdict,
    diag: &mut DiagSink<'_>,
) -> Validation {
    match error {
        ScopeError::NeedsWiderScope(scope) => Validation::soft(restriction, scope),
        ScopeError::NoMatch => {
            diag.note(|| "geo reference selects no travel segment".to_string());
            Validation::terminal(on_no_match)
        }
        ScopeError::GeoTableMissing(err) => {
            diag.note(|| err.to_string());
            Validation::terminal(Verdict::Fail)
        }
    }
}

/// How far a per-segment scan checks before the "still checking" flag
/// flips off.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ScanBoundary {
    All,
    /// Stop after the first flown sector has been checked.
    FirstSector,
    /// Stop when the turnaround segment is reached. `None` while the
    /// turnaround is not known yet (fare-component phase): scan everything
    /// visible.
    UpToTurnaround(Option<usize>),
}

/// Scan the scoped segments in order, recording each visit's verdict into
/// `chain`. A visit returning `None` records nothing (segment without a
/// checkable date). The scan does not short-circuit on `Fail`; only a
/// `Stop`-class verdict or the boundary ends it early.
pub(crate) fn scan_segments<C: RuleCatalog>(
    ctx: &RunCtx<'_, C>,
    scope: &ResolvedScope,
    boundary: ScanBoundary,
    chain: &mut VerdictChain,
    mut visit: impl FnMut(usize, &TravelSegment, &ScopedSegment) -> Option<Verdict>,
) {
    let mut still_checking = true;
    for scoped in &scope.segments {
        if !still_checking {
            break;
        }
        if let ScanBoundary::UpToTurnaround(Some(turnaround)) = boundary {
            if scoped.segment >= turnaround {
                break;
            }
        }
        let segment = match ctx.itinerary.segment(scoped.segment) {
            Some(s) => s,
            None => continue,
        };
        if let Some(verdict) = visit(scoped.segment, segment, scoped) {
            chain.apply_next(verdict);
            if verdict.is_stop() {
                break;
            }
        }
        if matches!(boundary, ScanBoundary::FirstSector) && segment.kind == SegmentKind::Air {
            still_checking = false;
        }
    }
}

/// Resolved geography for a stay rule: the anchor date the stay is
/// measured from, and the return-side segments the restriction binds.
pub(crate) struct StayScope {
    pub from_date: OffsetDateTime,
    pub to_scope: ResolvedScope,
}

/// Resolve the "from" and "to" geography a stay rule files.
///
/// Returns `Err` with the outcome to surface when the stay cannot be
/// measured here: a deferral while the pricing unit does not exist, `Skip`
/// when the journey has no return side to bind, `Fail` on catalog damage.
pub(crate) fn resolve_stay_scope<C: RuleCatalog>(
    ctx: &RunCtx<'_, C>,
    geo_from: GeoTableRef,
    geo_to: GeoTableRef,
    diag: &mut DiagSink<'_>,
) -> Result<StayScope, Validation> {
    // Stay rules carry round-trip semantics: a lone fare component that is
    // not the outbound leg cannot anchor them.
    if ctx.phase == Phase::FareComponent && ctx.fare_component.direction != Direction::Outbound {
        return Err(Validation::soft(
            RestrictionKind::StayTo,
            TsiScope::PricingUnit,
        ));
    }

    // Resolve the return side first: it is the side that cannot be seen
    // before the unit exists, and its entry names the scope a deferral
    // must re-run at.
    let to_scope = if geo_to.is_none() {
        match ctx.pricing_unit {
            None => {
                return Err(Validation::soft(
                    RestrictionKind::StayTo,
                    TsiScope::PricingUnit,
                ))
            }
            Some(pu) => ResolvedScope {
                segments: pu
                    .return_segments()
                    .into_iter()
                    .map(ScopedSegment::origin)
                    .collect(),
                tsi: TsiScope::PricingUnit,
            },
        }
    } else {
        match resolve_scope(
            ctx.catalog,
            geo_to,
            ctx.itinerary,
            ctx.fare_component,
            ctx.pricing_unit,
        ) {
            Ok(scope) => scope,
            Err(err) => {
                return Err(scope_failure(
                    err,
                    RestrictionKind::StayTo,
                    Verdict::Skip,
                    diag,
                ))
            }
        }
    };

    let pu = match ctx.pricing_unit {
        Some(pu) => pu,
        None => {
            return Err(Validation::soft(
                RestrictionKind::StayTo,
                TsiScope::PricingUnit,
            ))
        }
    };
    if pu.kind == PricingUnitKind::OneWay {
        return Err(Validation::terminal(Verdict::Skip));
    }
    let turnaround = match pu.turnaround {
        Some(t) => t,
        None => {
            diag.note(|| "pricing unit has no turnaround; stay restriction skipped".to_string());
            return Err(Validation::terminal(Verdict::Skip));
        }
    };

    let from_scope = match resolve_scope(
        ctx.catalog,
        geo_from,
        ctx.itinerary,
        ctx.fare_component,
        ctx.pricing_unit,
    ) {
        Ok(scope) => scope,
        Err(err) => {
            return Err(scope_failure(
                err,
                RestrictionKind::StayFrom,
                Verdict::Skip,
                diag,
            ))
        }
    };
    let from_date = from_scope
        .segments
        .iter()
        .filter(|scoped| scoped.segment < turnaround)
        .find_map(|scoped| {
            let segment = ctx.itinerary.segment(scoped.segment)?;
            matched_datetime(segment, scoped)
        });
    let from_date = match from_date {
        Some(dt) => dt,
        None => {
            diag.note(|| "no dated outbound segment anchors the stay".to_string());
            return Err(Validation::terminal(Verdict::Skip));
        }
    };

    let to_tsi = to_scope.tsi;
    let to_segments: Vec<ScopedSegment> = to_scope
        .segments
        .into_iter()
        .filter(|scoped| scoped.segment >= turnaround)
        .collect();
    if to_segments.is_empty() {
        diag.note(|| "no return travel in scope".to_string());
        return Err(Validation::terminal(Verdict::Skip));
    }

    Ok(StayScope {
        from_date,
        to_scope: ResolvedScope {
            segments: to_segments,
            tsi: to_tsi,
        },
    })
}

/// Fold a chain into the run's outcome. An empty chain means no
/// restriction bound this fare: `Skip`. A fare-component-phase `Pass` that
/// depended on structure only the pricing unit has becomes `SoftPass`.
pub(crate) fn finalize<C: RuleCatalog>(
    ctx: &RunCtx<'_, C>,
    chain: &VerdictChain,
    needs_recheck: Option<RestrictionKind>,
) -> Validation {
    let mut verdict = chain.result();
    if verdict == Verdict::NotProcessed {
        verdict = Verdict::Skip;
    }
    if verdict == Verdict::Pass && ctx.phase == Phase::FareComponent {
        if let Some(restriction) = needs_recheck {
            return Validation::soft(restriction, TsiScope::PricingUnit);
        }
    }
    Validation::terminal(verdict)
}
