//! Maximum stay validation.
//!
//! The latest permitted return is the stay period applied forward from the
//! outbound anchor date. The filed indicator decides which instant of each
//! return segment the deadline binds: when return travel must *commence*
//! by the deadline, the departure; when it must be *complete*, the
//! arrival.

use tariff_catalog::{MaxStayRule, ReturnLeg, RuleCatalog};

use crate::deadline::{compute_deadline, DeadlineDirection};
use crate::diagnostics::DiagSink;
use crate::period::PeriodOfStay;
use crate::verdict::{Verdict, VerdictChain};

use super::{
    finalize, resolve_stay_scope, scan_segments, Effects, RunCtx, ScanBoundary, Validation,
};

pub(crate) fn validate<C: RuleCatalog>(
    rule: &MaxStayRule,
    ctx: &RunCtx<'_, C>,
    diag: &mut DiagSink<'_>,
    _effects: &mut Effects,
) -> Validation {
    let period = PeriodOfStay::parse(&rule.stay.period, &rule.stay.unit);
    if period.is_one_year() {
        // 365 days / 12 months is the filed form of "no maximum stay".
        return Validation::terminal(Verdict::Skip);
    }

    let stay = match resolve_stay_scope(ctx, rule.geo_from, rule.geo_to, diag) {
        Ok(stay) => stay,
        Err(validation) => return validation,
    };

    let latest_return = match compute_deadline(
        stay.from_date,
        rule.time_of_day,
        &period,
        DeadlineDirection::After,
        true,
    ) {
        Ok(deadline) => deadline,
        Err(err) => {
            diag.note(|| format!("{}; maximum stay ignored", err));
            return Validation::terminal(Verdict::Skip);
        }
    };
    diag.note(|| format!("latest return {}", latest_return));

    let mut chain = VerdictChain::new();
    scan_segments(
        ctx,
        &stay.to_scope,
        ScanBoundary::All,
        &mut chain,
        |_, segment, _| {
            let bound = match rule.return_must {
                ReturnLeg::Commence => segment.departure,
                ReturnLeg::Complete => segment.arrival.or(segment.departure),
            }?;
            Some(if bound <= latest_return {
                Verdict::Pass
            } else {
                Verdict::Fail
            })
        },
    );

    finalize(ctx, &chain, None)
}
