//! End-to-end validation scenarios.
//!
//! Each test builds a small itinerary fixture, files a rule record the way
//! a catalog would, and walks it through the two-phase validation the
//! surrounding rule controller performs: fare-component first, then (on a
//! soft pass or for deadline bookkeeping) the assembled pricing unit.

use tariff_catalog::{
    AdvanceResTktRule, ConfirmedSectors, GeoTableEntry, GeoTableRef, InMemoryCatalog,
    LocationSpec, MaxStayRule, MinStayRule, RawPeriod, ReturnLeg, RuleData, RuleKey, RuleRecord,
    TsiScope, UnavailableTag,
};
use tariff_core::{
    Direction, FareComponent, FareUsage, Itinerary, Location, PricingUnit, PricingUnitKind,
    SegmentKind, TravelSegment,
};
use tariff_eval::{
    validate_fare_component, validate_pricing_unit, Diagnostics, Verdict,
};
use time::macros::datetime;
use time::OffsetDateTime;

// ──────────────────────────────────────────────
// Fixtures
// ──────────────────────────────────────────────

fn segment(
    origin: (&str, &str, &str),
    dest: (&str, &str, &str),
    departure: OffsetDateTime,
    booking: OffsetDateTime,
) -> TravelSegment {
    TravelSegment {
        origin: Location::new(origin.0, origin.1, origin.2),
        destination: Location::new(dest.0, dest.1, dest.2),
        departure: Some(departure),
        arrival: Some(departure + time::Duration::hours(7)),
        booking,
        kind: SegmentKind::Air,
        confirmed: true,
        ordinal: 0,
        changed_on_exchange: false,
    }
}

/// JFK-LHR round trip: out 2024-07-01, back 2024-07-15.
fn round_trip(booking: OffsetDateTime) -> (Itinerary, FareComponent, PricingUnit) {
    let itinerary = Itinerary::new(vec![
        segment(
            ("JFK", "NYC", "US"),
            ("LHR", "LON", "GB"),
            datetime!(2024-07-01 9:00 UTC),
            booking,
        ),
        segment(
            ("LHR", "LON", "GB"),
            ("JFK", "NYC", "US"),
            datetime!(2024-07-15 11:00 UTC),
            booking,
        ),
    ]);
    let outbound = FareComponent::new(0..1, Direction::Outbound, "AA");
    let inbound = FareComponent::new(1..2, Direction::Inbound, "AA");
    let pricing_unit = PricingUnit::new(
        PricingUnitKind::RoundTrip,
        vec![
            FareUsage::new(outbound.clone(), false),
            FareUsage::new(inbound, true),
        ],
        Some(1),
    );
    (itinerary, outbound, pricing_unit)
}

fn record(item_number: u32, data: RuleData) -> RuleRecord {
    RuleRecord {
        key: RuleKey {
            vendor: "ATP".into(),
            carrier: "AA".into(),
            tariff: 3,
            rule: "2000".into(),
            item_number,
        },
        effective: "2024-01-01".into(),
        discontinue: "2024-12-31".into(),
        unavailable_tag: UnavailableTag::Available,
        data,
    }
}

/// Reservation at least 61 days before departure (deadline 2024-05-01),
/// ticketing within 24 hours of reservation.
fn advance_rule() -> RuleRecord {
    record(
        101,
        RuleData::AdvanceResTkt(AdvanceResTktRule {
            res: Some(RawPeriod::new("061", "D")),
            res_time_of_day: None,
            tkt: Some(RawPeriod::new("024", "H")),
            geo: GeoTableRef::NONE,
            confirmed_sectors: ConfirmedSectors::All,
        }),
    )
}

fn min_stay_rule(geo_to: GeoTableRef, day_of_week: Option<&str>) -> RuleRecord {
    record(
        201,
        RuleData::MinStay(MinStayRule {
            stay: RawPeriod::new("003", "D"),
            time_of_day: None,
            day_of_week: day_of_week.map(str::to_owned),
            geo_from: GeoTableRef::NONE,
            geo_to,
        }),
    )
}

fn max_stay_rule(period: RawPeriod) -> RuleRecord {
    record(
        301,
        RuleData::MaxStay(MaxStayRule {
            stay: period,
            time_of_day: None,
            return_must: ReturnLeg::Commence,
            geo_from: GeoTableRef::NONE,
            geo_to: GeoTableRef::NONE,
        }),
    )
}

// ──────────────────────────────────────────────
// Advance reservation / ticketing
// ──────────────────────────────────────────────

#[test]
fn missed_reservation_deadline_fails_even_when_ticketing_passes() {
    let booking = datetime!(2024-05-02 10:00 UTC);
    let (mut itinerary, fare_component, _) = round_trip(booking);
    // Ticketed within 24 hours of reservation: that check alone passes.
    itinerary.ticketing = Some(datetime!(2024-05-02 12:00 UTC));
    let catalog = InMemoryCatalog::new();

    let result =
        validate_fare_component(&catalog, &advance_rule(), &fare_component, &itinerary, None);
    assert_eq!(result.verdict, Verdict::Fail);
}

#[test]
fn reservation_and_ticketing_within_deadlines_pass() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (mut itinerary, fare_component, _) = round_trip(booking);
    itinerary.ticketing = Some(datetime!(2024-04-16 8:00 UTC));
    let catalog = InMemoryCatalog::new();

    let mut diag = Diagnostics::new();
    let result = validate_fare_component(
        &catalog,
        &advance_rule(),
        &fare_component,
        &itinerary,
        Some(&mut diag),
    );
    assert_eq!(result.verdict, Verdict::Pass);
    assert!(!diag.is_empty());
}

#[test]
fn unticketed_itinerary_defers_the_ticketing_check() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, fare_component, _) = round_trip(booking);
    let catalog = InMemoryCatalog::new();

    let result =
        validate_fare_component(&catalog, &advance_rule(), &fare_component, &itinerary, None);
    assert_eq!(result.verdict, Verdict::SoftPass);
    let deferral = result.deferred.expect("soft pass carries a deferral");
    assert_eq!(deferral.required_scope, TsiScope::PricingUnit);
}

#[test]
fn pricing_unit_records_the_ticketing_deadline() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, _, mut pricing_unit) = round_trip(booking);
    let catalog = InMemoryCatalog::new();

    let result = validate_pricing_unit(
        &catalog,
        &advance_rule(),
        &mut pricing_unit,
        0,
        &itinerary,
        None,
    );
    assert_eq!(result.verdict, Verdict::Pass);
    assert_eq!(
        pricing_unit.latest_ticket_date(),
        Some(datetime!(2024-04-16 10:00 UTC))
    );
}

#[test]
fn ticketing_deadline_only_tightens_across_rules() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, _, mut pricing_unit) = round_trip(booking);
    let catalog = InMemoryCatalog::new();

    let loose = record(
        102,
        RuleData::AdvanceResTkt(AdvanceResTktRule {
            res: None,
            res_time_of_day: None,
            tkt: Some(RawPeriod::new("048", "H")),
            geo: GeoTableRef::NONE,
            confirmed_sectors: ConfirmedSectors::All,
        }),
    );
    let tight = record(
        103,
        RuleData::AdvanceResTkt(AdvanceResTktRule {
            res: None,
            res_time_of_day: None,
            tkt: Some(RawPeriod::new("012", "H")),
            geo: GeoTableRef::NONE,
            confirmed_sectors: ConfirmedSectors::All,
        }),
    );

    // Loose first, tight second: the tight deadline wins.
    validate_pricing_unit(&catalog, &loose, &mut pricing_unit, 0, &itinerary, None);
    validate_pricing_unit(&catalog, &tight, &mut pricing_unit, 1, &itinerary, None);
    validate_pricing_unit(&catalog, &loose, &mut pricing_unit, 1, &itinerary, None);
    assert_eq!(
        pricing_unit.latest_ticket_date(),
        Some(datetime!(2024-04-15 22:00 UTC))
    );
}

#[test]
fn unconfirmed_sector_fails_and_is_flagged_for_rebooking() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (built, _, mut pricing_unit) = round_trip(booking);
    let mut segments = built.segments().to_vec();
    segments[0].confirmed = false;
    let mut itinerary = Itinerary::new(segments);
    itinerary.ticketing = Some(datetime!(2024-04-15 12:00 UTC));
    let catalog = InMemoryCatalog::new();

    let result = validate_pricing_unit(
        &catalog,
        &advance_rule(),
        &mut pricing_unit,
        0,
        &itinerary,
        None,
    );
    assert_eq!(result.verdict, Verdict::Fail);
    assert_eq!(pricing_unit.fare_usages()[0].rebook_required(), &[0]);
}

#[test]
fn unavailable_rule_data_fails_and_text_only_skips() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, fare_component, _) = round_trip(booking);
    let catalog = InMemoryCatalog::new();

    let mut incomplete = advance_rule();
    incomplete.unavailable_tag = UnavailableTag::Incomplete;
    let result =
        validate_fare_component(&catalog, &incomplete, &fare_component, &itinerary, None);
    assert_eq!(result.verdict, Verdict::Fail);

    let mut text_only = advance_rule();
    text_only.unavailable_tag = UnavailableTag::TextOnly;
    let result =
        validate_fare_component(&catalog, &text_only, &fare_component, &itinerary, None);
    assert_eq!(result.verdict, Verdict::Skip);
}

// ──────────────────────────────────────────────
// Minimum stay
// ──────────────────────────────────────────────

#[test]
fn journey_scope_geo_soft_passes_then_resolves_at_unit_phase() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, fare_component, mut pricing_unit) = round_trip(booking);
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_geo(
        GeoTableRef(978),
        GeoTableEntry {
            tsi: TsiScope::Journey,
            locations: LocationSpec::Nation("US".into()),
        },
    );
    let rule = min_stay_rule(GeoTableRef(978), None);

    // Fare-component phase: the journey does not exist yet.
    let early = validate_fare_component(&catalog, &rule, &fare_component, &itinerary, None);
    assert_eq!(early.verdict, Verdict::SoftPass);
    let deferral = early.deferred.expect("soft pass carries a deferral");
    assert_eq!(deferral.required_scope, TsiScope::Journey);

    // Unit phase: full visibility, 14-day stay beats the 3-day minimum.
    let late = validate_pricing_unit(&catalog, &rule, &mut pricing_unit, 0, &itinerary, None);
    assert_eq!(late.verdict, Verdict::Pass);
    assert!(late.deferred.is_none());
}

#[test]
fn short_stay_fails_at_unit_phase() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let itinerary = Itinerary::new(vec![
        segment(
            ("JFK", "NYC", "US"),
            ("LHR", "LON", "GB"),
            datetime!(2024-07-01 9:00 UTC),
            booking,
        ),
        segment(
            ("LHR", "LON", "GB"),
            ("JFK", "NYC", "US"),
            datetime!(2024-07-02 11:00 UTC),
            booking,
        ),
    ]);
    let outbound = FareComponent::new(0..1, Direction::Outbound, "AA");
    let inbound = FareComponent::new(1..2, Direction::Inbound, "AA");
    let mut pricing_unit = PricingUnit::new(
        PricingUnitKind::RoundTrip,
        vec![
            FareUsage::new(outbound, false),
            FareUsage::new(inbound, true),
        ],
        Some(1),
    );
    let catalog = InMemoryCatalog::new();
    let rule = min_stay_rule(GeoTableRef::NONE, None);

    let result = validate_pricing_unit(&catalog, &rule, &mut pricing_unit, 0, &itinerary, None);
    assert_eq!(result.verdict, Verdict::Fail);
}

#[test]
fn day_of_week_restriction_binds_the_return() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, _, mut pricing_unit) = round_trip(booking);
    let catalog = InMemoryCatalog::new();

    // 2024-07-15 is a Monday.
    let weekend_only = min_stay_rule(GeoTableRef::NONE, Some("SAT/SUN"));
    let result =
        validate_pricing_unit(&catalog, &weekend_only, &mut pricing_unit, 0, &itinerary, None);
    assert_eq!(result.verdict, Verdict::Fail);

    let monday_ok = min_stay_rule(GeoTableRef::NONE, Some("MON"));
    let result =
        validate_pricing_unit(&catalog, &monday_ok, &mut pricing_unit, 0, &itinerary, None);
    assert_eq!(result.verdict, Verdict::Pass);
}

#[test]
fn inbound_fare_component_soft_passes_stay_rules() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, _, _) = round_trip(booking);
    let inbound = FareComponent::new(1..2, Direction::Inbound, "AA");
    let catalog = InMemoryCatalog::new();

    let result = validate_fare_component(
        &catalog,
        &min_stay_rule(GeoTableRef::NONE, None),
        &inbound,
        &itinerary,
        None,
    );
    assert_eq!(result.verdict, Verdict::SoftPass);
}

#[test]
fn one_way_unit_skips_stay_rules() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let itinerary = Itinerary::new(vec![segment(
        ("JFK", "NYC", "US"),
        ("LHR", "LON", "GB"),
        datetime!(2024-07-01 9:00 UTC),
        booking,
    )]);
    let fc = FareComponent::new(0..1, Direction::Outbound, "AA");
    let mut pricing_unit = PricingUnit::new(
        PricingUnitKind::OneWay,
        vec![FareUsage::new(fc, false)],
        None,
    );
    let catalog = InMemoryCatalog::new();

    let result = validate_pricing_unit(
        &catalog,
        &min_stay_rule(GeoTableRef::NONE, None),
        &mut pricing_unit,
        0,
        &itinerary,
        None,
    );
    assert_eq!(result.verdict, Verdict::Skip);
}

// ──────────────────────────────────────────────
// Maximum stay
// ──────────────────────────────────────────────

#[test]
fn one_year_sentinel_means_no_maximum_stay() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, _, mut pricing_unit) = round_trip(booking);
    let catalog = InMemoryCatalog::new();

    let rule = max_stay_rule(RawPeriod::new("365", "D"));
    let result = validate_pricing_unit(&catalog, &rule, &mut pricing_unit, 0, &itinerary, None);
    assert_eq!(result.verdict, Verdict::Skip);
}

#[test]
fn overstayed_return_fails_maximum_stay() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, _, mut pricing_unit) = round_trip(booking);
    let catalog = InMemoryCatalog::new();

    // 14-day stay against a 7-day maximum.
    let rule = max_stay_rule(RawPeriod::new("007", "D"));
    let result = validate_pricing_unit(&catalog, &rule, &mut pricing_unit, 0, &itinerary, None);
    assert_eq!(result.verdict, Verdict::Fail);
}

#[test]
fn return_within_maximum_stay_passes() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, _, mut pricing_unit) = round_trip(booking);
    let catalog = InMemoryCatalog::new();

    let rule = max_stay_rule(RawPeriod::new("001", "M"));
    let result = validate_pricing_unit(&catalog, &rule, &mut pricing_unit, 0, &itinerary, None);
    assert_eq!(result.verdict, Verdict::Pass);
}

// ──────────────────────────────────────────────
// Catalog-driven flow
// ──────────────────────────────────────────────

#[test]
fn json_loaded_catalog_drives_the_full_flow() {
    use tariff_catalog::RuleCatalog;

    let json = serde_json::json!({
        "rules": [{
            "key": { "vendor": "ATP", "carrier": "AA", "tariff": 3, "rule": "2000", "item_number": 201 },
            "effective": "2024-01-01",
            "discontinue": "2024-12-31",
            "unavailable_tag": "available",
            "data": {
                "category": "min_stay",
                "data": {
                    "stay": { "period": "003", "unit": "D" },
                    "time_of_day": null,
                    "day_of_week": null,
                    "geo_from": 0,
                    "geo_to": 978
                }
            }
        }],
        "geo_tables": [{
            "reference": 978,
            "tsi": "journey",
            "locations": { "nation": "US" }
        }]
    });
    let catalog = InMemoryCatalog::from_json(&json).unwrap();

    let key = RuleKey {
        vendor: "ATP".into(),
        carrier: "AA".into(),
        tariff: 3,
        rule: "2000".into(),
        item_number: 201,
    };
    let rule = catalog
        .rule_record(&key, time::macros::date!(2024 - 06 - 01))
        .unwrap()
        .clone();

    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, fare_component, mut pricing_unit) = round_trip(booking);

    let early = validate_fare_component(&catalog, &rule, &fare_component, &itinerary, None);
    assert_eq!(early.verdict, Verdict::SoftPass);

    let late = validate_pricing_unit(&catalog, &rule, &mut pricing_unit, 0, &itinerary, None);
    assert_eq!(late.verdict, Verdict::Pass);
}

#[test]
fn malformed_stay_period_is_ignored_not_failed() {
    let booking = datetime!(2024-04-15 10:00 UTC);
    let (itinerary, _, mut pricing_unit) = round_trip(booking);
    let catalog = InMemoryCatalog::new();

    let mut diag = Diagnostics::new();
    let rule = max_stay_rule(RawPeriod::new("XX", "Q"));
    let result = validate_pricing_unit(
        &catalog,
        &rule,
        &mut pricing_unit,
        0,
        &itinerary,
        Some(&mut diag),
    );
    assert_eq!(result.verdict, Verdict::Skip);
    assert!(!diag.is_empty());
}
