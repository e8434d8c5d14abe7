//! Priced fare components and the pricing units assembled from them.

use std::ops::Range;

use time::OffsetDateTime;

use crate::datetime;
use crate::itinerary::{Itinerary, TravelSegment};

/// Travel direction of a fare component relative to the journey origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outbound,
    Inbound,
    Unknown,
}

/// A priced origin-to-destination unit: a contiguous, ordered view over the
/// itinerary's segments. Immutable once priced.
#[derive(Debug, Clone)]
pub struct FareComponent {
    /// Indices into the owning itinerary's segment list.
    pub segments: Range<usize>,
    pub direction: Direction,
    pub governing_carrier: String,
}

impl FareComponent {
    pub fn new(segments: Range<usize>, direction: Direction, carrier: impl Into<String>) -> Self {
        FareComponent {
            segments,
            direction,
            governing_carrier: carrier.into(),
        }
    }

    /// Iterate the component's segments as (itinerary index, segment) pairs.
    pub fn segments_of<'a>(
        &self,
        itinerary: &'a Itinerary,
    ) -> impl Iterator<Item = (usize, &'a TravelSegment)> {
        let range = self.segments.clone();
        itinerary
            .segments()
            .iter()
            .enumerate()
            .filter(move |(i, _)| range.contains(i))
    }
}

/// The shape of a pricing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingUnitKind {
    OneWay,
    RoundTrip,
    CircleTrip,
    OpenJaw,
}

/// A fare component's usage inside one pricing unit.
///
/// The rebook set and the non-refundable flag are written during validation
/// of this usage only; they are never shared across concurrent validations
/// of different fares.
#[derive(Debug, Clone)]
pub struct FareUsage {
    pub fare_component: FareComponent,
    /// Whether the component is used travelling back toward the origin.
    pub inbound: bool,
    pub non_refundable: bool,
    /// Segment indices whose reservation must be rebooked before ticketing.
    rebook_required: Vec<usize>,
}

impl FareUsage {
    pub fn new(fare_component: FareComponent, inbound: bool) -> Self {
        FareUsage {
            fare_component,
            inbound,
            non_refundable: false,
            rebook_required: Vec::new(),
        }
    }

    /// Mark a segment as requiring rebooking. Idempotent.
    pub fn require_rebook(&mut self, segment: usize) {
        if !self.rebook_required.contains(&segment) {
            self.rebook_required.push(segment);
        }
    }

    pub fn rebook_required(&self) -> &[usize] {
        &self.rebook_required
    }
}

/// A combination of fare components priced together. Owns no segments; the
/// turnaround is an index into the itinerary like every other segment
/// reference.
#[derive(Debug, Clone)]
pub struct PricingUnit {
    pub kind: PricingUnitKind,
    fare_usages: Vec<FareUsage>,
    /// First segment of the return journey, where one exists.
    pub turnaround: Option<usize>,
    latest_ticket_date: Option<OffsetDateTime>,
}

impl PricingUnit {
    pub fn new(kind: PricingUnitKind, fare_usages: Vec<FareUsage>, turnaround: Option<usize>) -> Self {
        PricingUnit {
            kind,
            fare_usages,
            turnaround,
            latest_ticket_date: None,
        }
    }

    pub fn fare_usages(&self) -> &[FareUsage] {
        &self.fare_usages
    }

    pub fn fare_usage_mut(&mut self, index: usize) -> Option<&mut FareUsage> {
        self.fare_usages.get_mut(index)
    }

    /// The tightest ticketing deadline recorded across the unit's fare
    /// usages, if any rule has imposed one.
    pub fn latest_ticket_date(&self) -> Option<OffsetDateTime> {
        self.latest_ticket_date
    }

    /// Record a ticketing deadline. The stored value only ever tightens:
    /// a candidate later than the current deadline is discarded, so the
    /// result is the same whichever fare usage is validated first.
    pub fn update_latest_ticket_date(&mut self, candidate: OffsetDateTime) {
        datetime::merge_earlier(&mut self.latest_ticket_date, candidate);
    }

    /// Segment indices on the outbound side of the unit (before the
    /// turnaround), in itinerary order.
    pub fn outbound_segments(&self) -> Vec<usize> {
        self.segment_indices()
            .into_iter()
            .filter(|i| self.turnaround.map_or(true, |t| *i < t))
            .collect()
    }

    /// Segment indices at or after the turnaround, in itinerary order.
    pub fn return_segments(&self) -> Vec<usize> {
        match self.turnaround {
            None => Vec::new(),
            Some(t) => self
                .segment_indices()
                .into_iter()
                .filter(|i| *i >= t)
                .collect(),
        }
    }

    /// All segment indices covered by the unit's fare components, sorted and
    /// deduplicated.
    pub fn segment_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .fare_usages
            .iter()
            .flat_map(|u| u.fare_component.segments.clone())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
