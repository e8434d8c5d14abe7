//! tariff-core: itinerary and fare model shared by every rule category.
//!
//! Owns the travel data that rule validation reads: the [`Itinerary`] and its
//! [`TravelSegment`]s, the priced [`FareComponent`] views over contiguous
//! segment ranges, and the assembled [`PricingUnit`] with its fare usages.
//!
//! Segments are owned by the itinerary alone. Fare components and pricing
//! units refer to segments by index, never by copy, so every layer observes
//! the same segment data.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`Itinerary`], [`TravelSegment`], [`Location`], [`SegmentKind`]
//! - [`FareComponent`], [`Direction`]
//! - [`PricingUnit`], [`PricingUnitKind`], [`FareUsage`]
//! - monotonic deadline merges and clock-time helpers in [`datetime`]

pub mod datetime;
pub mod fare;
pub mod itinerary;

pub use fare::{Direction, FareComponent, FareUsage, PricingUnit, PricingUnitKind};
pub use itinerary::{Itinerary, Location, SegmentKind, TravelSegment};
