#![allow(missing_docs)]

//! The report surface: queries, rendering and assertions.

use sertrace::{
    ANY_FAILURE, SerializationOutcome, SerializationTracer, SertraceError, TraceReport, Traceable,
};

// --- FIXTURES ---

#[derive(Traceable)]
struct Handle {
    descriptor: u64,
}

// Produces one entry of each interesting class: the root and `bad` FAIL,
// `ok` passes, `tmp` is transient, `gone` is a passing null.
#[derive(Traceable)]
struct Mixed {
    ok: String,
    bad: Handle,
    #[trace(transient)]
    tmp: String,
    gone: Option<String>,
}

fn mixed_report() -> sertrace::Result<TraceReport> {
    let mixed = Mixed {
        ok: "fine".to_string(),
        bad: Handle { descriptor: 1 },
        tmp: "scratch".to_string(),
        gone: None,
    };

    let mut tracer = SerializationTracer::new();
    Ok(tracer.trace(&mixed)?.clone())
}

// --- TESTS ---

/// Outcome filtering returns the matching entries in insertion order.
#[test]
fn outcomes_filters_by_outcome_set() -> sertrace::Result<()> {
    let report = mixed_report()?;

    let failures = report.outcomes(&[SerializationOutcome::Fail]);
    let failure_paths: Vec<&str> = failures.iter().map(|(path, _)| *path).collect();
    assert_eq!(failure_paths, vec!["Mixed", "Mixed.bad"]);

    let transients = report.outcomes(&[SerializationOutcome::Transient]);
    assert_eq!(transients.len(), 1);
    assert_eq!(transients[0].0, "Mixed.tmp");

    assert!(report.outcomes(&[SerializationOutcome::StaticField]).is_empty());
    Ok(())
}

/// `has_no` answers per outcome set; the failure helpers cover the
/// any-failure set and the dynamic FAIL respectively.
#[test]
fn has_no_family_reflects_report_content() -> sertrace::Result<()> {
    let report = mixed_report()?;

    assert!(report.has_no(&[SerializationOutcome::StaticField]));
    assert!(!report.has_no(&[SerializationOutcome::Transient]));
    assert!(!report.has_no(&ANY_FAILURE));
    assert!(!report.has_no_failures());
    assert!(!report.has_no_dynamic_failures());

    // A passing null does not count as a failure.
    assert_eq!(
        report.get("Mixed.gone").map(|r| r.outcome()),
        Some(SerializationOutcome::NullPassedStaticAnalysis)
    );
    Ok(())
}

/// Rendering produces one `"<path> -> <result>"` line per matching entry.
#[test]
fn render_produces_one_line_per_entry() -> sertrace::Result<()> {
    let report = mixed_report()?;

    assert_eq!(
        report.render(&[SerializationOutcome::Transient]),
        "Mixed.tmp -> TRANSIENT\n"
    );

    let all = report.render_all();
    assert_eq!(all.lines().count(), report.len());
    assert!(all.contains("Mixed.ok -> PASS\n"));
    assert!(all.contains("Mixed.bad -> FAIL ("));
    assert!(all.contains(
        "Mixed.gone -> NULL_PASSED_STATIC_ANALYSIS (String is Serializable.)\n"
    ));
    Ok(())
}

/// Assertions raise exactly when an unwanted outcome is present, with the
/// offending subset rendered into the error.
#[test]
fn assertions_raise_on_unwanted_outcomes() -> sertrace::Result<()> {
    let report = mixed_report()?;

    // The unwanted set is present.
    let err = report
        .should_not_have_any(&[SerializationOutcome::Transient])
        .expect_err("transient entry present");
    match err {
        SertraceError::Assertion(message) => {
            assert!(message.starts_with("One or more serializations failed:\n"));
            assert!(message.contains("Mixed.tmp -> TRANSIENT"));
        }
        other => panic!("expected an assertion error, got {other:?}"),
    }

    assert!(report.should_not_have_any_failures().is_err());
    assert!(report.should_not_have_any_dynamic_failures().is_err());

    // The unwanted set is absent.
    report.should_not_have_any(&[SerializationOutcome::StaticField])?;
    Ok(())
}

/// A report with only passing outcomes satisfies every failure assertion.
#[test]
fn passing_report_satisfies_failure_assertions() -> sertrace::Result<()> {
    let mut tracer = SerializationTracer::new();
    let report = tracer.trace(&"hello".to_string())?;

    report.should_not_have_any_failures()?;
    report.should_not_have_any_dynamic_failures()?;
    assert!(report.has_no_failures());
    Ok(())
}

/// An empty report is empty, renders to nothing and asserts clean.
#[test]
fn empty_report_is_clean() -> sertrace::Result<()> {
    let report = TraceReport::new();

    assert!(report.is_empty());
    assert_eq!(report.len(), 0);
    assert!(report.get("anything").is_none());
    assert!(report.render_all().is_empty());
    report.should_not_have_any_failures()?;
    Ok(())
}
