//! Centralized error handling for Sertrace.
//!
//! The important distinction in this crate is between *recorded outcomes* and
//! *errors*. A field that fails its round trip is **data**: the tracer records
//! a [`SerializationOutcome`](crate::SerializationOutcome) and keeps walking.
//! A [`SertraceError`] is raised only when the tool itself cannot continue
//! (a broken introspection capability) or when a caller explicitly asks the
//! report to assert on unwanted outcomes.
//!
//! ## Design Philosophy
//!
//! 1. **No Panics:** All failure conditions are represented as `Result`
//!    values. The library enforces this through `#![deny(clippy::panic)]` and
//!    `#![deny(clippy::unwrap_used)]`.
//!
//! 2. **Outcomes Are Not Errors:** Codec failures never surface here; they are
//!    classified into outcomes and stored in the report.
//!
//! 3. **Cloneable Errors:** [`SertraceError`] is `Clone`, allowing errors to
//!    be stored for later analysis or compared in tests.

use std::fmt;

/// A specialized `Result` type for Sertrace operations.
///
/// ## Examples
///
/// ```rust
/// use sertrace::Result;
///
/// fn my_check() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SertraceError>;

/// The error type covering all failure domains in Sertrace.
///
/// ## Variants
///
/// - **Introspection:** the field-introspection capability broke mid-walk
///   (a field index that passed exclusion checks could not be read). This
///   indicates a bug in a `Traceable` implementation, not an unserializable
///   target, and the trace is aborted.
/// - **Assertion:** an assertion operation on a
///   [`TraceReport`](crate::TraceReport) found unwanted outcomes. The payload
///   is the rendered failing subset, ready for a test runner to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SertraceError {
    /// A field value could not be read even though it passed exclusion checks.
    ///
    /// This should not occur with derived `Traceable` implementations. If you
    /// implement the trait by hand, make sure `field_value` accepts every
    /// index that `fields` describes.
    Introspection(String),

    /// One or more unwanted outcomes were present in the report.
    ///
    /// Produced by the `should_not_have_*` family of assertion operations.
    /// The string contains one `"<path> -> <result>"` line per offending
    /// entry.
    Assertion(String),
}

impl fmt::Display for SertraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Introspection(s) => write!(f, "Introspection Error: {s}"),
            Self::Assertion(s) => write!(f, "Assertion Failed: {s}"),
        }
    }
}

impl std::error::Error for SertraceError {}
