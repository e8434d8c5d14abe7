use std::fmt;

/// Errors raised by the temporal primitives.
///
/// None of these cross the public validation API: a validator absorbs each
/// one into a verdict (an invalid period ignores that sub-restriction, an
/// out-of-range date fails the rule) so callers only ever see a `Verdict`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A period/unit pair from the catalog is not mutually consistent.
    InvalidPeriod { period: String, unit: String },
    /// Deadline arithmetic left the representable date range.
    DateOutOfRange,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::InvalidPeriod { period, unit } => {
                write!(f, "invalid period specification: '{}'/'{}'", period, unit)
            }
            EvalError::DateOutOfRange => {
                write!(f, "deadline arithmetic out of representable date range")
            }
        }
    }
}

impl std::error::Error for EvalError {}
