//! The accumulated result set of one trace, with its query and assertion
//! surface.
//!
//! A [`TraceReport`] maps field paths to [`SerializationResult`]s. Keys are
//! unique and insertion order is preserved, so rendered reports are
//! deterministic across runs. All query operations are read-only; the
//! assertion operations return [`SertraceError::Assertion`] carrying the
//! rendered offending subset, ready for a test runner to print.

use std::fmt::Write as _;

use crate::error::{Result, SertraceError};
use crate::outcome::{ANY_FAILURE, SerializationOutcome, SerializationResult};

/// An insertion-ordered mapping from field path to recorded result.
#[derive(Debug, Clone, Default)]
pub struct TraceReport {
    entries: Vec<(String, SerializationResult)>,
}

impl TraceReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Inserts or replaces the result for `path`. Revisit of a path does not
    /// happen by construction of the walk, but last-write-wins if it did.
    pub(crate) fn record(&mut self, path: String, result: SerializationResult) {
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == path) {
            entry.1 = result;
        } else {
            self.entries.push((path, result));
        }
    }

    // --- Queries ---

    /// All entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &SerializationResult)> {
        self.entries.iter().map(|(p, r)| (p.as_str(), r))
    }

    /// The result recorded for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&SerializationResult> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, r)| r)
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries whose outcome is in `outcomes`, in insertion order.
    pub fn outcomes(&self, outcomes: &[SerializationOutcome]) -> Vec<(&str, &SerializationResult)> {
        self.entries()
            .filter(|(_, result)| outcomes.contains(&result.outcome()))
            .collect()
    }

    /// Returns true if no entry has an outcome in `outcomes`.
    pub fn has_no(&self, outcomes: &[SerializationOutcome]) -> bool {
        self.outcomes(outcomes).is_empty()
    }

    /// Returns true if no entry is in the any-failure set
    /// ([`ANY_FAILURE`](crate::ANY_FAILURE)).
    pub fn has_no_failures(&self) -> bool {
        self.has_no(&ANY_FAILURE)
    }

    /// Returns true if no entry failed its dynamic round trip (`FAIL`).
    pub fn has_no_dynamic_failures(&self) -> bool {
        self.has_no(&[SerializationOutcome::Fail])
    }

    // --- Rendering ---

    /// Renders the entries whose outcome is in `outcomes`, one
    /// `"<path> -> <result>"` line each.
    pub fn render(&self, outcomes: &[SerializationOutcome]) -> String {
        let mut buf = String::new();
        for (path, result) in self.entries() {
            if outcomes.contains(&result.outcome()) {
                let _ = writeln!(buf, "{path} -> {result}");
            }
        }
        buf
    }

    /// Renders every entry, one `"<path> -> <result>"` line each.
    pub fn render_all(&self) -> String {
        let mut buf = String::new();
        for (path, result) in self.entries() {
            let _ = writeln!(buf, "{path} -> {result}");
        }
        buf
    }

    // --- Assertions ---

    /// Fails with [`SertraceError::Assertion`] if any entry's outcome is in
    /// `outcomes`. The error message contains the rendered offending subset.
    pub fn should_not_have_any(&self, outcomes: &[SerializationOutcome]) -> Result<()> {
        if self.has_no(outcomes) {
            Ok(())
        } else {
            Err(SertraceError::Assertion(format!(
                "One or more serializations failed:\n{}",
                self.render(outcomes)
            )))
        }
    }

    /// Fails if any entry is in the any-failure set
    /// ([`ANY_FAILURE`](crate::ANY_FAILURE)).
    pub fn should_not_have_any_failures(&self) -> Result<()> {
        self.should_not_have_any(&ANY_FAILURE)
    }

    /// Fails if any entry failed its dynamic round trip (`FAIL`).
    pub fn should_not_have_any_dynamic_failures(&self) -> Result<()> {
        self.should_not_have_any(&[SerializationOutcome::Fail])
    }
}
