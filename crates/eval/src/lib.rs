//! tariff-eval: the fare rule validation engine.
//!
//! Validates carrier-filed rule records against priced fares in two
//! phases. The fare-component phase runs early, while only a single priced
//! component is known; rules that need the assembled pricing unit answer
//! `SoftPass` with a [`Deferral`] naming what to re-check, and the caller
//! re-runs them at the pricing-unit phase once that structure exists.
//!
//! The engine never raises an error across its public API: catalog damage,
//! malformed periods, and unresolvable geography are all folded into the
//! returned [`Verdict`] or into an ignored sub-restriction.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`validate_fare_component`] / [`validate_pricing_unit`] -- one-shot
//!   entry points with default configuration
//! - [`RuleValidator`] -- the configurable validator
//! - [`Verdict`], [`VerdictChain`], [`Connector`] -- the verdict algebra
//! - [`PeriodOfStay`], [`compute_deadline`] -- the temporal primitives
//! - [`resolve_scope`], [`ResolvedScope`] -- geographic scope resolution
//! - [`Diagnostics`] -- optional trace collection

pub mod deadline;
pub mod diagnostics;
pub mod error;
pub mod period;
pub mod scope;
pub mod validator;
pub mod verdict;

pub use deadline::{compute_deadline, DeadlineDirection, ZERO_HOUR_PERIOD_MINUTES};
pub use diagnostics::Diagnostics;
pub use error::EvalError;
pub use period::{PeriodOfStay, PeriodSpec, PeriodUnit};
pub use scope::{resolve_scope, ResolvedScope, ScopeError, ScopedSegment};
pub use validator::{
    Deferral, EvalConfig, Phase, RestrictionKind, RuleValidator, Validation,
};
pub use verdict::{Connector, Verdict, VerdictChain};

use tariff_catalog::{RuleCatalog, RuleRecord};
use tariff_core::{FareComponent, Itinerary, PricingUnit};

/// Validate a rule against a fare component with default configuration.
pub fn validate_fare_component<C: RuleCatalog>(
    catalog: &C,
    record: &RuleRecord,
    fare_component: &FareComponent,
    itinerary: &Itinerary,
    diag: Option<&mut Diagnostics>,
) -> Validation {
    RuleValidator::new(catalog, EvalConfig::default())
        .validate_fare_component(record, fare_component, itinerary, diag)
}

/// Validate a rule against one fare usage of a pricing unit with default
/// configuration.
pub fn validate_pricing_unit<C: RuleCatalog>(
    catalog: &C,
    record: &RuleRecord,
    pricing_unit: &mut PricingUnit,
    usage_index: usize,
    itinerary: &Itinerary,
    diag: Option<&mut Diagnostics>,
) -> Validation {
    RuleValidator::new(catalog, EvalConfig::default()).validate_pricing_unit(
        record,
        pricing_unit,
        usage_index,
        itinerary,
        diag,
    )
}
