//! Minimum stay validation.
//!
//! The earliest permitted return is the stay period applied forward from
//! the outbound anchor date; every scoped return segment must travel on or
//! after it. A filed weekday restriction additionally pins which days the
//! return may travel on.

use tariff_catalog::{MinStayRule, RuleCatalog};
use time::Weekday;

use crate::deadline::{compute_deadline, DeadlineDirection};
use crate::diagnostics::DiagSink;
use crate::period::{weekday_from_abbr, PeriodOfStay};
use crate::verdict::{Verdict, VerdictChain};

use super::{
    finalize, matched_datetime, resolve_stay_scope, scan_segments, Effects, RunCtx, ScanBoundary,
    Validation,
};

/// Parse a slash-separated weekday list (`"SAT/SUN"`). Unknown tokens are
/// dropped; an empty result means the restriction is unreadable.
fn parse_day_set(filed: &str) -> Option<Vec<Weekday>> {
    let days: Vec<Weekday> = filed
        .split(['/', ','])
        .filter_map(|token| weekday_from_abbr(token.trim()))
        .collect();
    if days.is_empty() {
        None
    } else {
        Some(days)
    }
}

pub(crate) fn validate<C: RuleCatalog>(
    rule: &MinStayRule,
    ctx: &RunCtx<'_, C>,
    diag: &mut DiagSink<'_>,
    _effects: &mut Effects,
) -> Validation {
    let period = PeriodOfStay::parse(&rule.stay.period, &rule.stay.unit);

    let stay = match resolve_stay_scope(ctx, rule.geo_from, rule.geo_to, diag) {
        Ok(stay) => stay,
        Err(validation) => return validation,
    };

    let earliest_return = match compute_deadline(
        stay.from_date,
        rule.time_of_day,
        &period,
        DeadlineDirection::After,
        false,
    ) {
        Ok(deadline) => deadline,
        Err(err) => {
            diag.note(|| format!("{}; minimum stay ignored", err));
            return Validation::terminal(Verdict::Skip);
        }
    };
    diag.note(|| format!("earliest return {}", earliest_return));

    let allowed_days = rule.day_of_week.as_deref().and_then(parse_day_set);

    let mut chain = VerdictChain::new();
    scan_segments(
        ctx,
        &stay.to_scope,
        ScanBoundary::All,
        &mut chain,
        |_, segment, scoped| {
            let travelled = matched_datetime(segment, scoped)?;
            if travelled < earliest_return {
                return Some(Verdict::Fail);
            }
            if let Some(days) = &allowed_days {
                if !days.contains(&travelled.weekday()) {
                    return Some(Verdict::Fail);
                }
            }
            Some(Verdict::Pass)
        },
    );

    finalize(ctx, &chain, None)
}
