//! Travel segments and the itinerary that owns them.

use time::OffsetDateTime;

/// A travel point, identified at airport, city, and nation level.
///
/// Geo tables match at any of the three levels, so all three are carried on
/// every segment endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub airport: String,
    pub city: String,
    pub nation: String,
}

impl Location {
    pub fn new(
        airport: impl Into<String>,
        city: impl Into<String>,
        nation: impl Into<String>,
    ) -> Self {
        Location {
            airport: airport.into(),
            city: city.into(),
            nation: nation.into(),
        }
    }
}

/// What kind of travel a segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A dated flight segment.
    Air,
    /// An open segment sold without a travel date.
    Open,
    /// A surface break (arrival unknown) between two flown segments.
    Arunk,
}

/// One leg of travel within an itinerary.
///
/// `departure`/`arrival` are `None` for open segments sold without a date and
/// for surface breaks. Validators must treat a missing date as "nothing to
/// check" for that segment rather than computing against a placeholder.
#[derive(Debug, Clone)]
pub struct TravelSegment {
    pub origin: Location,
    pub destination: Location,
    pub departure: Option<OffsetDateTime>,
    pub arrival: Option<OffsetDateTime>,
    /// When the reservation for this segment was made.
    pub booking: OffsetDateTime,
    pub kind: SegmentKind,
    /// Whether the reservation is confirmed (vs. waitlisted / requested).
    pub confirmed: bool,
    /// Position of the segment within its itinerary.
    pub ordinal: u16,
    /// Set on segments that were altered by an exchange/reissue; unchanged
    /// segments may be excluded from revalidation on reprice.
    pub changed_on_exchange: bool,
}

impl TravelSegment {
    /// Whether the segment carries travel dates that rules can check.
    pub fn is_dated(&self) -> bool {
        self.departure.is_some()
    }
}

/// The itinerary owns every travel segment. Fare components and pricing
/// units hold indices into `segments`, never copies.
#[derive(Debug, Clone)]
pub struct Itinerary {
    segments: Vec<TravelSegment>,
    /// When the itinerary was (or will be) ticketed. `None` until a ticket
    /// is issued; ticketing-relative checks then record a deadline instead
    /// of comparing against an actual instant.
    pub ticketing: Option<OffsetDateTime>,
}

impl Itinerary {
    /// Build an itinerary, renumbering segment ordinals to match position.
    pub fn new(mut segments: Vec<TravelSegment>) -> Self {
        for (i, seg) in segments.iter_mut().enumerate() {
            seg.ordinal = i as u16;
        }
        Itinerary {
            segments,
            ticketing: None,
        }
    }

    pub fn segments(&self) -> &[TravelSegment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&TravelSegment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
