//! The verdict type and the algebra for combining per-item results.
//!
//! A validator evaluates a sequence of qualifiers or segments, each yielding
//! a verdict, and folds them left to right through a [`VerdictChain`]. The
//! chain applies the relational connectors (`IF`, `AND`, `OR`) and the final
//! dominance mapping: any `Fail` seen makes the whole chain `Fail`, otherwise
//! any `SoftPass` seen dominates a `Pass`.

use std::fmt;

/// Outcome of validating one rule against one fare, or of one item within
/// such a validation. Produced fresh on every invocation, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Scope-terminal: the fare is out of consideration for this rule.
    Fail,
    /// The rule exists but does not constrain pricing (text-only filing,
    /// "no restriction" data).
    Skip,
    /// Not decidable at this scope; the caller must re-validate once the
    /// pricing unit or fare path is known.
    SoftPass,
    /// Terminal for the whole rule-category sequence of this fare, not just
    /// the current rule.
    Stop,
    /// As `Stop`, for the soft-pass case.
    StopSoft,
    /// The validator has not produced a result.
    NotProcessed,
}

impl Verdict {
    /// Whether no further categories should run for this fare at the
    /// current scope.
    pub fn is_scope_terminal(self) -> bool {
        matches!(self, Verdict::Fail | Verdict::Stop)
    }

    /// Whether this verdict ends the whole category sequence.
    pub fn is_stop(self) -> bool {
        matches!(self, Verdict::Stop | Verdict::StopSoft)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Skip => "SKIP",
            Verdict::SoftPass => "SOFTPASS",
            Verdict::Stop => "STOP",
            Verdict::StopSoft => "STOPSOFT",
            Verdict::NotProcessed => "NOT PROCESSED",
        };
        f.write_str(name)
    }
}

/// Relational connector between sequential items of one validator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// Set the running result to the item's result.
    If,
    /// Combine with the running result; a running `Fail` short-circuits.
    And,
    /// Alternative branch; evaluated only when the running result is not
    /// already passing.
    Or,
}

/// Left-to-right combiner for per-item verdicts.
///
/// Callers ask [`VerdictChain::wants`] before evaluating an item so that
/// short-circuited branches are not evaluated at all, then record the
/// item's verdict with [`VerdictChain::apply`].
#[derive(Debug, Clone)]
pub struct VerdictChain {
    running: Verdict,
    saw_fail: bool,
    saw_soft: bool,
    stopped: bool,
}

impl Default for VerdictChain {
    fn default() -> Self {
        Self::new()
    }
}

impl VerdictChain {
    pub fn new() -> Self {
        VerdictChain {
            running: Verdict::NotProcessed,
            saw_fail: false,
            saw_soft: false,
            stopped: false,
        }
    }

    /// Whether an item joined by `connector` would still be evaluated.
    pub fn wants(&self, connector: Connector) -> bool {
        if self.stopped {
            return false;
        }
        match connector {
            Connector::If => true,
            Connector::And => self.running != Verdict::Fail,
            Connector::Or => !matches!(self.running, Verdict::Pass | Verdict::SoftPass),
        }
    }

    /// Record an item's verdict. Ignored when [`wants`](Self::wants) is
    /// false for the connector.
    pub fn apply(&mut self, connector: Connector, verdict: Verdict) {
        if !self.wants(connector) {
            return;
        }
        if verdict.is_stop() {
            self.stopped = true;
            self.running = verdict;
            return;
        }
        match connector {
            Connector::If => {
                self.saw_fail |= verdict == Verdict::Fail;
                self.saw_soft |= verdict == Verdict::SoftPass;
                self.running = verdict;
            }
            Connector::And => {
                self.saw_fail |= verdict == Verdict::Fail;
                self.saw_soft |= verdict == Verdict::SoftPass;
                if self.running == Verdict::SoftPass && verdict == Verdict::Fail {
                    self.running = Verdict::Fail;
                } else {
                    self.running = verdict;
                }
            }
            Connector::Or => {
                // The alternative branch supersedes whatever the abandoned
                // branch accumulated.
                self.saw_fail = verdict == Verdict::Fail;
                self.saw_soft = verdict == Verdict::SoftPass;
                self.running = verdict;
            }
        }
    }

    /// Record the next item in a plain sequential scan: `IF` for the first
    /// item, `AND` for every further one.
    pub fn apply_next(&mut self, verdict: Verdict) {
        let connector = if self.running == Verdict::NotProcessed {
            Connector::If
        } else {
            Connector::And
        };
        self.apply(connector, verdict);
    }

    /// Whether anything has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.running == Verdict::NotProcessed && !self.saw_fail && !self.saw_soft
    }

    /// Fold the chain into its overall verdict.
    pub fn result(&self) -> Verdict {
        if self.stopped {
            return self.running;
        }
        if self.saw_fail {
            Verdict::Fail
        } else if self.saw_soft {
            Verdict::SoftPass
        } else {
            self.running
        }
    }
}
