//! The graph tracer: a depth-first, pre-order walk over every field
//! reachable from a root value.
//!
//! For each `(path, value)` pair the tracer either records an exclusion
//! outcome (transient, static, null — with static analysis of the declared
//! type), skips it (duplicate identity, closure-like runtime type), or
//! attempts the round trip and recurses into the value's own fields.
//!
//! The walk is kept finite by the visited set: every non-primitive value is
//! registered by identity *before* it is tested, so a self-referential
//! object cannot recurse infinitely, and a shared reference reached through
//! a second path is never re-tested.

use std::collections::HashSet;

use log::{debug, info};

use crate::analysis;
use crate::codec;
use crate::error::Result;
use crate::outcome::{SerializationOutcome, SerializationResult};
use crate::report::TraceReport;
use crate::traceable::{FieldDescriptor, FieldRef, Identity, Traceable};

/// The default closure predicate: matches the marker the Rust runtime puts
/// in the type name of every closure.
pub fn default_closure_marker(runtime_type_name: &str) -> bool {
    runtime_type_name.contains("{{closure}}")
}

/// Walks an object graph and verifies, field by field, that every reachable
/// value survives a serialize/deserialize round trip.
///
/// The visited set and the report are instance state, fully reset at the
/// start of each [`trace`](Self::trace) call; a single tracer can be reused
/// sequentially, but concurrent traces need independent tracer instances.
///
/// ## Examples
///
/// ```rust
/// use sertrace::{SerializationTracer, Traceable};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Traceable)]
/// struct Player {
///     name: String,
///     score: u64,
/// }
///
/// let player = Player { name: "b".to_string(), score: 3 };
/// let mut tracer = SerializationTracer::new();
/// tracer.trace(&player)?.should_not_have_any_failures()?;
/// # Ok::<(), sertrace::SertraceError>(())
/// ```
#[derive(Debug)]
pub struct SerializationTracer {
    visited: HashSet<Identity>,
    report: TraceReport,
    is_closure_marker: fn(&str) -> bool,
}

impl SerializationTracer {
    /// Creates a tracer with the default closure predicate.
    pub fn new() -> Self {
        Self::with_closure_marker(default_closure_marker)
    }

    /// Creates a tracer with a custom closure predicate.
    ///
    /// The predicate receives full runtime type names and answers "is this
    /// value an opaque callable produced by the runtime?". It is used both to
    /// exclude closure-valued fields from the walk and to recognize the
    /// closure-encoding artifact in codec failure chains.
    pub fn with_closure_marker(is_closure_marker: fn(&str) -> bool) -> Self {
        Self {
            visited: HashSet::new(),
            report: TraceReport::new(),
            is_closure_marker,
        }
    }

    /// Traces every field reachable from `root` and returns the report.
    ///
    /// Internal state is reset first, so repeated calls on one tracer do not
    /// leak results between traces. The only error is
    /// [`SertraceError::Introspection`](crate::SertraceError::Introspection):
    /// a broken `Traceable` implementation, not an unserializable target.
    pub fn trace(&mut self, root: &dyn Traceable) -> Result<&TraceReport> {
        self.report.clear();
        self.visited.clear();

        self.mark_processed(root);
        self.attempt_round_trip(root.type_name(), root, false);
        self.drill_down(root.type_name(), root)?;

        Ok(&self.report)
    }

    /// The report accumulated by the most recent [`trace`](Self::trace) call.
    pub fn report(&self) -> &TraceReport {
        &self.report
    }

    // --- Walk ---

    fn drill_down(&mut self, path: &str, value: &dyn Traceable) -> Result<()> {
        for (index, field) in value.fields().iter().enumerate() {
            let field_path = format!("{path}.{}", field.name);

            if self.excluded(&field_path, field) {
                continue;
            }

            match value.field_value(index)? {
                FieldRef::Null => {
                    let result = analysis::analyze(&field.declared, false);
                    self.report.record(field_path, result);
                }
                FieldRef::Value(field_value) => {
                    if (self.is_closure_marker)(field_value.runtime_type_name()) {
                        debug!("{field_path} holds a closure, skipped");
                        continue;
                    }
                    self.process_field_value(field_path, field_value)?;
                }
            }
        }
        Ok(())
    }

    fn process_field_value(&mut self, field_path: String, value: &dyn Traceable) -> Result<()> {
        if self.is_processed(value) {
            info!("{field_path} is a duplicate reference, skipped");
            return Ok(());
        }

        // Register before testing: the value could refer to itself.
        self.mark_processed(value);

        debug!("trying round trip for {field_path}");
        self.attempt_round_trip(&field_path, value, true);
        self.drill_down(&field_path, value)
    }

    /// Applies the exclusion rules that need no field value, recording their
    /// outcome. Transient wins over static when a field is both.
    fn excluded(&mut self, field_path: &str, field: &FieldDescriptor) -> bool {
        if field.is_transient {
            self.report.record(
                field_path.to_string(),
                SerializationResult::new(SerializationOutcome::Transient),
            );
            return true;
        }
        if field.is_static {
            self.report.record(
                field_path.to_string(),
                SerializationResult::new(SerializationOutcome::StaticField),
            );
            return true;
        }
        false
    }

    // --- Round Trip & Classification ---

    fn attempt_round_trip(&mut self, path: &str, value: &dyn Traceable, is_field: bool) {
        let result = match value.try_round_trip() {
            Ok(()) => {
                if is_field && value.is_empty_container() {
                    // The trivial round trip proves nothing about the element
                    // types; analyze the runtime container type instead.
                    analysis::analyze(&value.type_spec(), true)
                } else {
                    SerializationResult::new(SerializationOutcome::Pass)
                }
            }
            Err(failure) => {
                if codec::caused_by_encoded_closure(&failure, self.is_closure_marker) {
                    SerializationResult::with_info(SerializationOutcome::Pass, "Lambda")
                } else {
                    debug!("round trip failed for {path}: {failure}");
                    SerializationResult::with_info(SerializationOutcome::Fail, failure.message())
                }
            }
        };
        self.report.record(path.to_string(), result);
    }

    // --- Visited Set ---

    fn is_processed(&self, value: &dyn Traceable) -> bool {
        if value.is_primitive() {
            return true;
        }
        // Never dedup an empty container: it has no content that could make
        // the trace cyclic, and each occurrence must be analyzed at its own
        // path.
        if value.is_empty_container() {
            return false;
        }
        self.visited.contains(&value.identity())
    }

    fn mark_processed(&mut self, value: &dyn Traceable) {
        if !value.is_primitive() {
            self.visited.insert(value.identity());
        }
    }
}

impl Default for SerializationTracer {
    fn default() -> Self {
        Self::new()
    }
}
