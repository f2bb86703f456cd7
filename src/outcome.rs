//! Outcome classification for a single traced field.
//!
//! Every field path visited by the tracer receives exactly one
//! [`SerializationResult`]: an outcome plus free-text diagnostic info (a codec
//! failure message, or the sentence-per-type explanation produced by static
//! analysis).

use std::fmt;

/// The closed set of per-field outcomes a trace can record.
///
/// The "any failure" subset is [`ANY_FAILURE`]:
/// `FAIL`, `NULL_FAILED_STATIC_ANALYSIS` and `EMPTY_FAILED_STATIC_ANALYSIS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationOutcome {
    /// The value survived a full encode/decode cycle.
    Pass,
    /// The value failed its encode/decode cycle.
    Fail,
    /// The field is marked non-serializing and was excluded from testing.
    Transient,
    /// The field is class-level/shared state, not instance state.
    StaticField,
    /// The field was null; static analysis of the declared type passed.
    NullPassedStaticAnalysis,
    /// The field was null; static analysis of the declared type failed.
    NullFailedStaticAnalysis,
    /// The field held an empty container; static analysis of the runtime
    /// container type passed.
    EmptyPassedStaticAnalysis,
    /// The field held an empty container; static analysis of the runtime
    /// container type failed.
    EmptyFailedStaticAnalysis,
}

/// The outcomes that count as failures for `has_no_failures` and
/// `should_not_have_any_failures`.
pub const ANY_FAILURE: [SerializationOutcome; 3] = [
    SerializationOutcome::Fail,
    SerializationOutcome::NullFailedStaticAnalysis,
    SerializationOutcome::EmptyFailedStaticAnalysis,
];

impl SerializationOutcome {
    /// Returns the canonical report spelling of this outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Transient => "TRANSIENT",
            Self::StaticField => "STATIC_FIELD",
            Self::NullPassedStaticAnalysis => "NULL_PASSED_STATIC_ANALYSIS",
            Self::NullFailedStaticAnalysis => "NULL_FAILED_STATIC_ANALYSIS",
            Self::EmptyPassedStaticAnalysis => "EMPTY_PASSED_STATIC_ANALYSIS",
            Self::EmptyFailedStaticAnalysis => "EMPTY_FAILED_STATIC_ANALYSIS",
        }
    }

    /// Returns true if this outcome belongs to the [`ANY_FAILURE`] set.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Fail | Self::NullFailedStaticAnalysis | Self::EmptyFailedStaticAnalysis
        )
    }
}

impl fmt::Display for SerializationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recorded result for one field path: an outcome plus diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationResult {
    outcome: SerializationOutcome,
    info: String,
}

impl SerializationResult {
    /// Creates a result with no diagnostic info.
    pub fn new(outcome: SerializationOutcome) -> Self {
        Self {
            outcome,
            info: String::new(),
        }
    }

    /// Creates a result carrying diagnostic info.
    pub fn with_info(outcome: SerializationOutcome, info: impl Into<String>) -> Self {
        Self {
            outcome,
            info: info.into(),
        }
    }

    /// The recorded outcome.
    pub fn outcome(&self) -> SerializationOutcome {
        self.outcome
    }

    /// The diagnostic text; empty when there is nothing to explain.
    pub fn info(&self) -> &str {
        &self.info
    }

    /// Returns true if the outcome belongs to the [`ANY_FAILURE`] set.
    pub fn is_failure(&self) -> bool {
        self.outcome.is_failure()
    }
}

impl fmt::Display for SerializationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.info.is_empty() {
            write!(f, "{}", self.outcome)
        } else {
            write!(f, "{} ({})", self.outcome, self.info)
        }
    }
}
