use time::Date;

use crate::error::CatalogError;
use crate::record::{GeoTableEntry, GeoTableRef, RuleKey, RuleRecord};

/// Read-only lookup into a rules catalog.
///
/// Implementations are synchronous: the engine assumes records and geo
/// tables are pre-fetched or served from an in-memory cache, so a lookup
/// never blocks on I/O. Lookups are answer-once: a `RecordNotFound` for a
/// mandatory restriction is treated as data-unavailable by the caller, not
/// retried within the transaction.
pub trait RuleCatalog {
    /// Fetch the rule record filed under `key` whose effective window
    /// contains `on`.
    fn rule_record(&self, key: &RuleKey, on: Date) -> Result<&RuleRecord, CatalogError>;

    /// Resolve a geo table reference to its scope class and location filter.
    fn geo_table_entry(&self, reference: GeoTableRef) -> Result<&GeoTableEntry, CatalogError>;
}
