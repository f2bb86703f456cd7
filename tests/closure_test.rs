#![allow(missing_docs)]

//! Closure handling: exclusion of closure-valued fields by runtime type
//! name, and reclassification of the closure-encoding decode artifact.

use sertrace::codec::{CauseFrame, CodecFailure, CodecStage};
use sertrace::{
    FieldDescriptor, FieldRef, SerializationOutcome, SerializationTracer, SertraceError,
    Traceable, TypeSpec, default_closure_marker,
};

// --- FIXTURES ---

// Wraps an arbitrary callable. The wrapper's runtime type name carries the
// callable's full type name, which for closures contains the `{{closure}}`
// marker.
struct Hook<F: 'static>(#[allow(dead_code)] F);

impl<F: 'static> Traceable for Hook<F> {
    fn runtime_type_name(&self) -> &'static str {
        std::any::type_name::<F>()
    }

    fn type_spec(&self) -> TypeSpec {
        TypeSpec::named("Hook", false)
    }

    fn try_round_trip(&self) -> Result<(), CodecFailure> {
        Err(CodecFailure::unsupported(std::any::type_name::<F>()))
    }
}

// Generic, so implemented by hand.
struct Widget<F: 'static> {
    title: String,
    on_click: Hook<F>,
}

impl<F: 'static> Traceable for Widget<F> {
    fn type_name(&self) -> &'static str {
        "Widget"
    }

    fn runtime_type_name(&self) -> &'static str {
        "Widget"
    }

    fn type_spec(&self) -> TypeSpec {
        TypeSpec::named("Widget", true)
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor {
                name: "title",
                declared: TypeSpec::named("String", true),
                is_transient: false,
                is_static: false,
            },
            FieldDescriptor {
                name: "on_click",
                declared: TypeSpec::named("Hook", false),
                is_transient: false,
                is_static: false,
            },
        ]
    }

    fn field_value(&self, index: usize) -> sertrace::Result<FieldRef<'_>> {
        match index {
            0 => Ok(FieldRef::Value(&self.title)),
            1 => Ok(FieldRef::Value(&self.on_click)),
            _ => Err(SertraceError::Introspection(format!(
                "Widget has no field at index {index}"
            ))),
        }
    }

    fn try_round_trip(&self) -> Result<(), CodecFailure> {
        Ok(())
    }
}

// Replays a scripted codec failure; used to exercise classification without
// a codec that actually produces the artifact.
struct Scripted {
    failure: CodecFailure,
}

impl Traceable for Scripted {
    fn type_name(&self) -> &'static str {
        "Scripted"
    }

    fn type_spec(&self) -> TypeSpec {
        TypeSpec::named("Scripted", true)
    }

    fn try_round_trip(&self) -> Result<(), CodecFailure> {
        Err(self.failure.clone())
    }
}

fn decode_failure_with_closure_frame() -> CodecFailure {
    CodecFailure::new(
        CodecStage::Decode,
        vec![
            CauseFrame {
                label: "bincode::error::DecodeError".to_string(),
                message: "type mismatch while casting the decoded value".to_string(),
            },
            CauseFrame {
                label: "app::handlers::on_save::{{closure}}".to_string(),
                message: "cannot reconstruct the captured environment".to_string(),
            },
        ],
    )
}

// --- TESTS ---

/// The default predicate recognizes the runtime's closure marker.
#[test]
fn default_marker_matches_closure_type_names() {
    assert!(default_closure_marker("app::handlers::on_save::{{closure}}"));
    assert!(default_closure_marker(
        "core::ops::function::FnOnce<()>::{{closure}}::inner"
    ));
    assert!(!default_closure_marker("alloc::string::String"));
    assert!(!default_closure_marker("fn()"));
}

/// A field holding a closure is silently skipped: no entry, no descent.
#[test]
fn closure_valued_field_is_skipped() -> sertrace::Result<()> {
    let widget = Widget {
        title: "save".to_string(),
        on_click: Hook(|| ()),
    };

    let mut tracer = SerializationTracer::new();
    let report = tracer.trace(&widget)?;

    assert_eq!(
        report.get("Widget.title").map(|r| r.outcome()),
        Some(SerializationOutcome::Pass)
    );
    assert!(report.get("Widget.on_click").is_none());
    Ok(())
}

/// A callable that is not a closure (a function pointer) carries no marker
/// and is tested like any other value.
#[test]
fn non_closure_callable_is_tested() -> sertrace::Result<()> {
    fn on_click() {}

    let widget = Widget {
        title: "save".to_string(),
        on_click: Hook(on_click as fn()),
    };

    let mut tracer = SerializationTracer::new();
    let report = tracer.trace(&widget)?;

    let result = report.get("Widget.on_click").expect("on_click entry");
    assert_eq!(result.outcome(), SerializationOutcome::Fail);
    assert!(result.info().contains("does not satisfy the codec capability"));
    Ok(())
}

/// A custom predicate widens the exclusion to types the default would test.
#[test]
fn custom_marker_excludes_matching_fields() -> sertrace::Result<()> {
    fn on_click() {}

    let widget = Widget {
        title: "save".to_string(),
        on_click: Hook(on_click as fn()),
    };

    let mut tracer = SerializationTracer::with_closure_marker(|name| name == "fn()");
    let report = tracer.trace(&widget)?;

    assert!(report.get("Widget.on_click").is_none());
    assert_eq!(
        report.get("Widget.title").map(|r| r.outcome()),
        Some(SerializationOutcome::Pass)
    );
    Ok(())
}

/// A decode failure whose cause chain carries the closure marker is the
/// known artifact: reclassified as PASS with "Lambda" info.
#[test]
fn encoded_closure_artifact_is_reclassified_as_pass() -> sertrace::Result<()> {
    let scripted = Scripted {
        failure: decode_failure_with_closure_frame(),
    };

    let mut tracer = SerializationTracer::new();
    let report = tracer.trace(&scripted)?;

    let result = report.get("Scripted").expect("root entry");
    assert_eq!(result.outcome(), SerializationOutcome::Pass);
    assert_eq!(result.info(), "Lambda");
    assert!(report.has_no_failures());
    Ok(())
}

/// A decode failure with no closure marker anywhere in the chain is a real
/// failure.
#[test]
fn plain_decode_failure_stays_a_failure() -> sertrace::Result<()> {
    let scripted = Scripted {
        failure: CodecFailure::new(
            CodecStage::Decode,
            vec![CauseFrame {
                label: "bincode::error::DecodeError".to_string(),
                message: "unexpected end of input".to_string(),
            }],
        ),
    };

    let mut tracer = SerializationTracer::new();
    let report = tracer.trace(&scripted)?;

    let result = report.get("Scripted").expect("root entry");
    assert_eq!(result.outcome(), SerializationOutcome::Fail);
    assert_eq!(result.info(), "unexpected end of input");
    Ok(())
}

/// The artifact only exists at the decode stage; an encode failure is never
/// reclassified, marker or not.
#[test]
fn encode_stage_failure_is_never_reclassified() -> sertrace::Result<()> {
    let scripted = Scripted {
        failure: CodecFailure::new(
            CodecStage::Encode,
            vec![CauseFrame {
                label: "app::handlers::on_save::{{closure}}".to_string(),
                message: "cannot encode the captured environment".to_string(),
            }],
        ),
    };

    let mut tracer = SerializationTracer::new();
    let report = tracer.trace(&scripted)?;

    let result = report.get("Scripted").expect("root entry");
    assert_eq!(result.outcome(), SerializationOutcome::Fail);
    Ok(())
}

/// The classification function itself: stage and marker must both agree.
#[test]
fn classification_requires_decode_stage_and_marker() {
    let artifact = decode_failure_with_closure_frame();
    assert!(sertrace::codec::caused_by_encoded_closure(
        &artifact,
        default_closure_marker
    ));

    let no_marker = CodecFailure::new(
        CodecStage::Decode,
        vec![CauseFrame {
            label: "bincode::error::DecodeError".to_string(),
            message: "unexpected end of input".to_string(),
        }],
    );
    assert!(!sertrace::codec::caused_by_encoded_closure(
        &no_marker,
        default_closure_marker
    ));
}
