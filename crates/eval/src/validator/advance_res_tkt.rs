//! Advance reservation / advance ticketing validation.
//!
//! The reservation restriction anchors on the departure of the first
//! scoped sector and reaches backward: the booking of every scoped sector
//! must fall on or before the computed latest-reservation instant. The
//! ticketing restriction anchors on the reservation itself and reaches
//! forward; while the itinerary is not yet ticketed, the computed deadline
//! is recorded on the pricing unit instead of being compared.

use tariff_catalog::{AdvanceResTktRule, ConfirmedSectors, RuleCatalog};
use tariff_core::datetime::merge_earlier;
use tariff_core::SegmentKind;

use crate::deadline::{compute_deadline, DeadlineDirection};
use crate::diagnostics::DiagSink;
use crate::period::PeriodOfStay;
use crate::scope::resolve_scope;
use crate::verdict::{Verdict, VerdictChain};

use super::{
    finalize, first_matched_date, scan_segments, scope_failure, Effects, Phase, RestrictionKind,
    RunCtx, ScanBoundary, Validation,
};

pub(crate) fn validate<C: RuleCatalog>(
    rule: &AdvanceResTktRule,
    ctx: &RunCtx<'_, C>,
    diag: &mut DiagSink<'_>,
    effects: &mut Effects,
) -> Validation {
    let scope = match resolve_scope(
        ctx.catalog,
        rule.geo,
        ctx.itinerary,
        ctx.fare_component,
        ctx.pricing_unit,
    ) {
        Ok(scope) => scope,
        Err(err) => return scope_failure(err, RestrictionKind::Reservation, Verdict::Fail, diag),
    };

    let mut chain = VerdictChain::new();
    let mut needs_recheck = None;

    let boundary = match rule.confirmed_sectors {
        ConfirmedSectors::All => ScanBoundary::All,
        ConfirmedSectors::FirstSector => ScanBoundary::FirstSector,
        ConfirmedSectors::UpToTurnaround => {
            if ctx.phase == Phase::FareComponent {
                // The true boundary is only known once the unit exists.
                needs_recheck = Some(RestrictionKind::Reservation);
            }
            ScanBoundary::UpToTurnaround(ctx.pricing_unit.and_then(|pu| pu.turnaround))
        }
    };

    // Reservation restriction.
    if let Some(raw) = &rule.res {
        let period = PeriodOfStay::parse(&raw.period, &raw.unit);
        let res_deadline = match first_matched_date(ctx.itinerary, &scope) {
            None => {
                diag.note(|| "no dated segment in scope; reservation deadline not computed".to_string());
                None
            }
            Some((_, departure)) => match compute_deadline(
                departure,
                rule.res_time_of_day,
                &period,
                DeadlineDirection::Before,
                true,
            ) {
                Ok(deadline) => {
                    diag.note(|| format!("latest reservation {}", deadline));
                    Some(deadline)
                }
                Err(err) => {
                    diag.note(|| format!("{}; reservation restriction ignored", err));
                    None
                }
            },
        };

        scan_segments(ctx, &scope, boundary, &mut chain, |index, segment, _| {
            if ctx.config.revalidate_changed_segments_only && !segment.changed_on_exchange {
                return None;
            }
            if !segment.is_dated() {
                return None;
            }
            let mut verdict = Verdict::Pass;
            if let Some(deadline) = res_deadline {
                if segment.booking > deadline {
                    verdict = Verdict::Fail;
                }
            }
            if ctx.config.require_confirmed_sectors
                && segment.kind == SegmentKind::Air
                && !segment.confirmed
            {
                effects.rebook_required.push(index);
                verdict = Verdict::Fail;
            }
            Some(verdict)
        });
    }

    // Ticketing restriction, relative to the latest reservation in scope.
    if let Some(raw) = &rule.tkt {
        let period = PeriodOfStay::parse(&raw.period, &raw.unit);
        let booked = scope
            .segments
            .iter()
            .filter_map(|scoped| ctx.itinerary.segment(scoped.segment))
            .map(|segment| segment.booking)
            .max();
        if let Some(booked) = booked {
            match compute_deadline(booked, None, &period, DeadlineDirection::After, true) {
                Ok(deadline) => {
                    diag.note(|| format!("latest ticketing {}", deadline));
                    if ctx.phase == Phase::PricingUnit {
                        merge_earlier(&mut effects.latest_ticket_date, deadline);
                    }
                    match ctx.itinerary.ticketing {
                        Some(ticketed) => {
                            chain.apply_next(if ticketed <= deadline {
                                Verdict::Pass
                            } else {
                                Verdict::Fail
                            });
                        }
                        None => {
                            // Not ticketed yet: the deadline is bookkeeping,
                            // not a comparison.
                            if ctx.phase == Phase::FareComponent && needs_recheck.is_none() {
                                needs_recheck = Some(RestrictionKind::Ticketing);
                            }
                            chain.apply_next(Verdict::Pass);
                        }
                    }
                }
                Err(err) => diag.note(|| format!("{}; ticketing restriction ignored", err)),
            }
        }
    }

    finalize(ctx, &chain, needs_recheck)
}
