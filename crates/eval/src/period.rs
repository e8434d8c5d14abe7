//! Catalog period-of-stay parsing.
//!
//! A restriction period is filed as a 3-character period value plus a unit
//! code. The period is either a zero-padded integer (`"000"` to `"999"`)
//! with a duration unit (`D`ays, `H`ours, mi`N`utes, `M`onths), or a
//! weekday abbreviation (`"SUN"` to `"SAT"`) with a 1–2 digit occurrence
//! count. Any other combination is filed garbage: parsing is total and
//! yields an invalid value that validators then ignore.

use std::fmt;

use time::Weekday;

/// Duration unit codes as filed in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodUnit {
    Days,
    Hours,
    Minutes,
    Months,
}

impl PeriodUnit {
    fn from_code(code: char) -> Option<PeriodUnit> {
        match code.to_ascii_uppercase() {
            'D' => Some(PeriodUnit::Days),
            'H' => Some(PeriodUnit::Hours),
            'N' => Some(PeriodUnit::Minutes),
            'M' => Some(PeriodUnit::Months),
            _ => None,
        }
    }

    fn code(self) -> char {
        match self {
            PeriodUnit::Days => 'D',
            PeriodUnit::Hours => 'H',
            PeriodUnit::Minutes => 'N',
            PeriodUnit::Months => 'M',
        }
    }
}

/// Parsed form of a period/unit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSpec {
    /// A plain duration, e.g. 14 days or 24 hours.
    Duration { value: u16, unit: PeriodUnit },
    /// The Nth occurrence of a weekday, e.g. the 2nd Friday.
    DayOfWeek { day: Weekday, occurrence: u8 },
    /// The pair was not mutually consistent.
    Invalid,
}

/// A rule's period of stay (or advance period), as parsed from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodOfStay {
    spec: PeriodSpec,
}

pub(crate) fn weekday_from_abbr(text: &str) -> Option<Weekday> {
    match text.to_ascii_uppercase().as_str() {
        "SUN" => Some(Weekday::Sunday),
        "MON" => Some(Weekday::Monday),
        "TUE" => Some(Weekday::Tuesday),
        "WED" => Some(Weekday::Wednesday),
        "THU" => Some(Weekday::Thursday),
        "FRI" => Some(Weekday::Friday),
        "SAT" => Some(Weekday::Saturday),
        _ => None,
    }
}

fn weekday_abbr(day: Weekday) -> &'static str {
    match day {
        Weekday::Sunday => "SUN",
        Weekday::Monday => "MON",
        Weekday::Tuesday => "TUE",
        Weekday::Wednesday => "WED",
        Weekday::Thursday => "THU",
        Weekday::Friday => "FRI",
        Weekday::Saturday => "SAT",
    }
}

impl PeriodOfStay {
    /// Parse a filed period/unit pair. Total: malformed input yields an
    /// invalid period, never an error.
    pub fn parse(period_text: &str, unit_text: &str) -> PeriodOfStay {
        let spec = Self::parse_spec(period_text, unit_text);
        PeriodOfStay { spec }
    }

    fn parse_spec(period_text: &str, unit_text: &str) -> PeriodSpec {
        if period_text.len() != 3 {
            return PeriodSpec::Invalid;
        }

        if period_text.bytes().all(|b| b.is_ascii_digit()) {
            let value: u16 = match period_text.parse() {
                Ok(v) => v,
                Err(_) => return PeriodSpec::Invalid,
            };
            let mut chars = unit_text.chars();
            let unit = match (chars.next(), chars.next()) {
                (Some(c), None) => PeriodUnit::from_code(c),
                _ => None,
            };
            return match unit {
                Some(unit) => PeriodSpec::Duration { value, unit },
                None => PeriodSpec::Invalid,
            };
        }

        if let Some(day) = weekday_from_abbr(period_text) {
            let occurrence_ok = (1..=2).contains(&unit_text.len())
                && unit_text.bytes().all(|b| b.is_ascii_digit());
            if occurrence_ok {
                if let Ok(occurrence) = unit_text.parse::<u8>() {
                    if occurrence >= 1 {
                        return PeriodSpec::DayOfWeek { day, occurrence };
                    }
                }
            }
        }

        PeriodSpec::Invalid
    }

    pub fn spec(&self) -> PeriodSpec {
        self.spec
    }

    pub fn is_valid(&self) -> bool {
        self.spec != PeriodSpec::Invalid
    }

    pub fn is_day_of_week(&self) -> bool {
        matches!(self.spec, PeriodSpec::DayOfWeek { .. })
    }

    /// The duration unit, for plain-duration periods.
    pub fn unit(&self) -> Option<PeriodUnit> {
        match self.spec {
            PeriodSpec::Duration { unit, .. } => Some(unit),
            _ => None,
        }
    }

    /// The duration value, for plain-duration periods.
    pub fn value(&self) -> Option<u16> {
        match self.spec {
            PeriodSpec::Duration { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Whether this is the 365-day / 12-month sentinel a catalog files to
    /// mean "no maximum stay restriction".
    pub fn is_one_year(&self) -> bool {
        matches!(
            self.spec,
            PeriodSpec::Duration {
                value: 365,
                unit: PeriodUnit::Days
            } | PeriodSpec::Duration {
                value: 12,
                unit: PeriodUnit::Months
            }
        )
    }

    /// Canonical period text: zero-padded 3-digit value or a weekday
    /// abbreviation. Invalid periods render as `"???"`.
    pub fn period_text(&self) -> String {
        match self.spec {
            PeriodSpec::Duration { value, .. } => format!("{:03}", value),
            PeriodSpec::DayOfWeek { day, .. } => weekday_abbr(day).to_string(),
            PeriodSpec::Invalid => "???".to_string(),
        }
    }

    /// Canonical unit text: the unit code letter or a zero-padded 2-digit
    /// occurrence count. Invalid periods render as `"?"`.
    pub fn unit_text(&self) -> String {
        match self.spec {
            PeriodSpec::Duration { unit, .. } => unit.code().to_string(),
            PeriodSpec::DayOfWeek { occurrence, .. } => format!("{:02}", occurrence),
            PeriodSpec::Invalid => "?".to_string(),
        }
    }
}

impl fmt::Display for PeriodOfStay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.period_text(), self.unit_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_duration_periods() {
        let p = PeriodOfStay::parse("014", "D");
        assert!(p.is_valid());
        assert!(!p.is_day_of_week());
        assert_eq!(p.unit(), Some(PeriodUnit::Days));
        assert_eq!(p.value(), Some(14));
    }

    #[test]
    fn parses_minute_unit_code() {
        let p = PeriodOfStay::parse("090", "N");
        assert_eq!(p.unit(), Some(PeriodUnit::Minutes));
        assert_eq!(p.value(), Some(90));
    }

    #[test]
    fn parses_weekday_periods() {
        let p = PeriodOfStay::parse("FRI", "02");
        assert!(p.is_valid());
        assert!(p.is_day_of_week());
        assert_eq!(
            p.spec(),
            PeriodSpec::DayOfWeek {
                day: Weekday::Friday,
                occurrence: 2
            }
        );
    }

    #[test]
    fn weekday_with_unit_code_is_invalid() {
        assert!(!PeriodOfStay::parse("FRI", "D").is_valid());
    }

    #[test]
    fn numeric_with_occurrence_count_is_invalid() {
        assert!(!PeriodOfStay::parse("014", "02").is_valid());
    }

    #[test]
    fn zero_occurrence_is_invalid() {
        assert!(!PeriodOfStay::parse("FRI", "0").is_valid());
    }

    #[test]
    fn garbage_is_invalid_not_a_panic() {
        assert!(!PeriodOfStay::parse("", "").is_valid());
        assert!(!PeriodOfStay::parse("XYZ", "9").is_valid());
        assert!(!PeriodOfStay::parse("1234", "D").is_valid());
    }

    #[test]
    fn one_year_sentinels() {
        assert!(PeriodOfStay::parse("365", "D").is_one_year());
        assert!(PeriodOfStay::parse("012", "M").is_one_year());
        assert!(!PeriodOfStay::parse("011", "M").is_one_year());
        assert!(!PeriodOfStay::parse("364", "D").is_one_year());
    }

    #[test]
    fn canonical_form_round_trips() {
        for (period, unit) in [("014", "D"), ("024", "H"), ("090", "N"), ("003", "M"), ("SAT", "1")] {
            let parsed = PeriodOfStay::parse(period, unit);
            assert!(parsed.is_valid(), "fixture {}/{} should parse", period, unit);
            let again = PeriodOfStay::parse(&parsed.period_text(), &parsed.unit_text());
            assert_eq!(again, parsed, "round-trip of {}/{}", period, unit);
        }
    }
}
