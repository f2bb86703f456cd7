//! # Sertrace
//!
//! A diagnostic library that verifies, for an arbitrary object graph, whether
//! every reachable field survives a serialize/deserialize round trip.
//!
//! ## Overview
//!
//! Types pick up fields over time. Sooner or later one of them references
//! something a codec cannot handle — a callback, a stream handle, a widget —
//! three levels deep, and the type silently becomes unserializable. Nothing
//! breaks until the first save in production. Sertrace exists to catch that
//! regression in a test suite:
//!
//! 1. Point [`SerializationTracer`] at a root value.
//! 2. It walks every reachable field, attempting a real encode/decode cycle
//!    for each one.
//! 3. It returns a [`TraceReport`] mapping every field path to an outcome,
//!    with assertion helpers to fail the test when anything failed.
//!
//! ## Architecture
//!
//! ### The Walk
//!
//! The tracer performs a depth-first, pre-order traversal from the root.
//! Every non-primitive value is registered in an identity-based visited set
//! *before* it is tested, which makes cyclic graphs terminate and prevents
//! shared references from being tested twice. Fields are excluded up front
//! when they are marked transient, class-level, hold null, or hold a
//! closure; everything else is round-tripped and then descended into.
//!
//! ### Introspection
//!
//! Rust has no runtime reflection; the [`Traceable`] trait (typically
//! derived) is the introspection capability: enumerate fields with metadata,
//! read a field's value, report identity. See [`traceable`].
//!
//! ### The Codec
//!
//! The round trip runs through bincode behind serde. Failures are *typed*
//! ([`codec::CodecFailure`]) and carry a root-cause chain; classification —
//! including the known closure-encoding false positive — is a pure function
//! over that chain. See [`codec`].
//!
//! ### Static Analysis
//!
//! A null field has no value to test and an empty container exercises none
//! of its element types, so both fall back to static analysis of a
//! [`TypeSpec`]: the type and each generic argument must satisfy the codec
//! capability. See [`analysis`].
//!
//! ## Usage
//!
//! ```rust
//! use sertrace::{SerializationTracer, Traceable};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Traceable)]
//! struct Session {
//!     user: String,
//!     retries: u32,
//!     tags: Vec<String>,
//! }
//!
//! let session = Session {
//!     user: "ada".to_string(),
//!     retries: 2,
//!     tags: vec!["fast".to_string()],
//! };
//!
//! let mut tracer = SerializationTracer::new();
//! let report = tracer.trace(&session)?;
//!
//! assert!(report.has_no_failures());
//! report.should_not_have_any_failures()?;
//! # Ok::<(), sertrace::SertraceError>(())
//! ```
//!
//! ## Safety and Error Handling
//!
//! * **No Panics:** No `unwrap()` or `panic!()` calls in the library
//!   (enforced by clippy lints).
//! * **Outcomes Are Data:** A failing field is a recorded
//!   [`SerializationOutcome`], never an error; [`SertraceError`] is reserved
//!   for broken introspection and explicit assertions.
//! * **Single-Threaded:** One trace call owns its state; concurrent traces
//!   need independent tracer instances.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// --- PUBLIC API MODULES ---
pub mod analysis;
pub mod codec;
pub mod error;
pub mod outcome;
pub mod report;
pub mod traceable;
pub mod tracer;

// Private modules
mod traceable_impls;

// --- RE-EXPORTS ---

pub use analysis::{TypeArg, TypeSpec};
pub use error::{Result, SertraceError};
pub use outcome::{ANY_FAILURE, SerializationOutcome, SerializationResult};
pub use report::TraceReport;
pub use traceable::{Described, FieldDescriptor, FieldRef, Identity, Traceable};
pub use tracer::{SerializationTracer, default_closure_marker};

// Re-export the derive macro so it is accessible as `sertrace::Traceable`
pub use sertrace_derive::Traceable;
