//! In-memory catalog, the reference [`RuleCatalog`] implementation.
//!
//! Backs tests and embedders that pre-fetch their rule data. Records enter
//! through [`InMemoryCatalog::insert_rule`] or [`InMemoryCatalog::from_json`];
//! date strings are parsed once at insertion so lookups stay infallible on
//! that axis.

use std::collections::BTreeMap;

use serde::Deserialize;
use time::macros::format_description;
use time::Date;

use crate::error::CatalogError;
use crate::record::{GeoTableEntry, GeoTableRef, RuleKey, RuleRecord};
use crate::traits::RuleCatalog;

#[derive(Debug, Clone)]
struct StoredRule {
    effective: Date,
    discontinue: Date,
    record: RuleRecord,
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    rules: Vec<StoredRule>,
    geo_tables: BTreeMap<u32, GeoTableEntry>,
}

/// On-disk JSON shape: a `rules` array of records plus a `geo_tables` array
/// of numbered entries.
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    rules: Vec<RuleRecord>,
    #[serde(default)]
    geo_tables: Vec<NumberedGeoEntry>,
}

#[derive(Deserialize)]
struct NumberedGeoEntry {
    reference: u32,
    #[serde(flatten)]
    entry: GeoTableEntry,
}

fn parse_record_date(value: &str, field: &'static str) -> Result<Date, CatalogError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).map_err(|_| CatalogError::InvalidDate {
        value: value.to_string(),
        field,
    })
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        InMemoryCatalog::default()
    }

    /// Load a catalog from its JSON representation.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_value(value.clone())
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;
        let mut catalog = InMemoryCatalog::new();
        for record in file.rules {
            catalog.insert_rule(record)?;
        }
        for numbered in file.geo_tables {
            catalog.insert_geo(GeoTableRef(numbered.reference), numbered.entry);
        }
        Ok(catalog)
    }

    /// Add a rule record, validating its effective window.
    pub fn insert_rule(&mut self, record: RuleRecord) -> Result<(), CatalogError> {
        let effective = parse_record_date(&record.effective, "effective")?;
        let discontinue = parse_record_date(&record.discontinue, "discontinue")?;
        self.rules.push(StoredRule {
            effective,
            discontinue,
            record,
        });
        Ok(())
    }

    /// Add a geo table entry under the given reference number.
    pub fn insert_geo(&mut self, reference: GeoTableRef, entry: GeoTableEntry) {
        self.geo_tables.insert(reference.0, entry);
    }
}

impl RuleCatalog for InMemoryCatalog {
    fn rule_record(&self, key: &RuleKey, on: Date) -> Result<&RuleRecord, CatalogError> {
        self.rules
            .iter()
            .find(|stored| {
                stored.record.key == *key && stored.effective <= on && on <= stored.discontinue
            })
            .map(|stored| &stored.record)
            .ok_or_else(|| CatalogError::RecordNotFound {
                vendor: key.vendor.clone(),
                carrier: key.carrier.clone(),
                tariff: key.tariff,
                rule: key.rule.clone(),
                item_number: key.item_number,
            })
    }

    fn geo_table_entry(&self, reference: GeoTableRef) -> Result<&GeoTableEntry, CatalogError> {
        self.geo_tables
            .get(&reference.0)
            .ok_or(CatalogError::GeoTableNotFound {
                reference: reference.0,
            })
    }
}
