/// All errors that can be returned by a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No rule record matches the key and date.
    #[error("rule record not found: {vendor}/{carrier} tariff {tariff} rule {rule} item {item_number}")]
    RecordNotFound {
        vendor: String,
        carrier: String,
        tariff: u16,
        rule: String,
        item_number: u32,
    },

    /// A geo table reference does not resolve to any entry.
    #[error("geo table not found: {reference}")]
    GeoTableNotFound { reference: u32 },

    /// A record carries a date field that does not parse as YYYY-MM-DD.
    #[error("invalid date '{value}' in field '{field}'")]
    InvalidDate { value: String, field: &'static str },

    /// Catalog JSON did not match the expected shape.
    #[error("malformed catalog JSON: {0}")]
    Malformed(String),
}
