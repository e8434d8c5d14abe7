//! Catalog record types.
//!
//! Records are immutable data loaded from a carrier-filed catalog. Period
//! values and unit codes are carried verbatim as filed (`"014"`/`"D"`); the
//! validation engine owns their interpretation. Date fields are ISO 8601
//! strings (`YYYY-MM-DD`), parsed once when a record enters a catalog.

use serde::{Deserialize, Serialize};
use tariff_core::Location;

/// Key a rule record is filed under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleKey {
    pub vendor: String,
    pub carrier: String,
    pub tariff: u16,
    pub rule: String,
    pub item_number: u32,
}

/// Availability marker filed on every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableTag {
    /// Data present and binding.
    Available,
    /// Data filed but incomplete; the rule cannot be priced against.
    Incomplete,
    /// Free-text filing with no machine-readable restriction.
    TextOnly,
}

/// A period value and unit code as filed: a 3-character period (`"000"` to
/// `"999"` or a weekday abbreviation) and a unit (`D`/`H`/`N`/`M`, or an
/// occurrence count when the period is a weekday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPeriod {
    pub period: String,
    pub unit: String,
}

impl RawPeriod {
    pub fn new(period: impl Into<String>, unit: impl Into<String>) -> Self {
        RawPeriod {
            period: period.into(),
            unit: unit.into(),
        }
    }
}

/// Reference into the geo tables. Zero means "no reference filed"; the
/// resolver then falls back to its default segment selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoTableRef(pub u32);

impl GeoTableRef {
    pub const NONE: GeoTableRef = GeoTableRef(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// Travel-segment-identifier scope class: how much itinerary structure a geo
/// table entry needs before it can select segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TsiScope {
    FareComponent,
    SubJourney,
    PricingUnit,
    Journey,
}

/// Location filter within a geo table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSpec {
    Any,
    Airport(String),
    City(String),
    Nation(String),
}

impl LocationSpec {
    /// Whether a segment endpoint satisfies this filter.
    pub fn matches(&self, location: &Location) -> bool {
        match self {
            LocationSpec::Any => true,
            LocationSpec::Airport(code) => location.airport == *code,
            LocationSpec::City(code) => location.city == *code,
            LocationSpec::Nation(code) => location.nation == *code,
        }
    }
}

/// A resolved geo table entry: the scope class plus the location filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoTableEntry {
    pub tsi: TsiScope,
    pub locations: LocationSpec,
}

/// Which sectors must hold confirmed reservations for an advance
/// reservation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmedSectors {
    All,
    FirstSector,
    UpToTurnaround,
}

/// Which of the return segment's two date-times a maximum-stay deadline
/// binds: travel must commence (departure) or be completed (arrival) by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnLeg {
    Commence,
    Complete,
}

/// Advance reservation / advance ticketing restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceResTktRule {
    /// Reservation must be made this long before departure.
    pub res: Option<RawPeriod>,
    /// Latest reservation clock time, minutes since midnight.
    pub res_time_of_day: Option<u16>,
    /// Ticketing must follow reservation within this period.
    pub tkt: Option<RawPeriod>,
    pub geo: GeoTableRef,
    pub confirmed_sectors: ConfirmedSectors,
}

/// Minimum stay restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinStayRule {
    pub stay: RawPeriod,
    /// Earliest return clock time, minutes since midnight.
    pub time_of_day: Option<u16>,
    /// Weekdays the return may depart on, as slash-separated 3-letter
    /// abbreviations (e.g. `"SAT/SUN"`). Empty or absent means any day.
    pub day_of_week: Option<String>,
    pub geo_from: GeoTableRef,
    pub geo_to: GeoTableRef,
}

/// Maximum stay restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxStayRule {
    pub stay: RawPeriod,
    /// Latest return clock time, minutes since midnight.
    pub time_of_day: Option<u16>,
    pub return_must: ReturnLeg,
    pub geo_from: GeoTableRef,
    pub geo_to: GeoTableRef,
}

/// Category-specific rule data. One arm per rule category; the validation
/// engine dispatches on the arm instead of downcasting a generic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", content = "data", rename_all = "snake_case")]
pub enum RuleData {
    AdvanceResTkt(AdvanceResTktRule),
    MinStay(MinStayRule),
    MaxStay(MaxStayRule),
}

/// A complete rule record as filed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub key: RuleKey,
    /// ISO 8601 date (YYYY-MM-DD). First day the record applies.
    pub effective: String,
    /// ISO 8601 date (YYYY-MM-DD). Last day the record applies.
    pub discontinue: String,
    pub unavailable_tag: UnavailableTag,
    pub data: RuleData,
}
