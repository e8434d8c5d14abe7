//! Append-only diagnostics collection.
//!
//! Validators explain themselves into a [`Diagnostics`] collector when one
//! is attached. Collection never changes a verdict; running without a
//! collector is the production configuration.

/// Human-readable trace lines recorded during one or more validations.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    lines: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Append one trace line.
    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Borrowed handle threaded through a validation run. With no collector
/// attached, [`DiagSink::note`] is a no-op and the message is never built.
pub(crate) struct DiagSink<'a>(pub Option<&'a mut Diagnostics>);

impl DiagSink<'_> {
    pub fn note(&mut self, line: impl FnOnce() -> String) {
        if let Some(diag) = self.0.as_deref_mut() {
            diag.note(line());
        }
    }
}
