//! tariff-catalog: carrier-filed rule records and the lookup trait.
//!
//! Provides typed rule records for the date-and-place-sensitive categories
//! (advance reservation/ticketing, minimum stay, maximum stay), the geo
//! table entries rules point at, and the [`RuleCatalog`] trait the
//! validation engine resolves references through.
//!
//! Lookup is synchronous and read-only: embedders pre-fetch or cache the
//! catalog before validation runs. [`InMemoryCatalog`] is the reference
//! implementation, loadable from JSON.

pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

pub use error::CatalogError;
pub use memory::InMemoryCatalog;
pub use record::{
    AdvanceResTktRule, ConfirmedSectors, GeoTableEntry, GeoTableRef, LocationSpec, MaxStayRule,
    MinStayRule, RawPeriod, ReturnLeg, RuleData, RuleKey, RuleRecord, TsiScope, UnavailableTag,
};
pub use traits::RuleCatalog;
