use std::io::Write;

use flow_adapters::flows::LoanPolicy;
use flow_adapters::steps::Applicant;
use stepflow_rust::runner::{parse_context, run_document, run_loan};
use stepflow_rust::{AppError, RunOptions};
use tempfile::NamedTempFile;

fn document_file(raw: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(raw.as_bytes()).expect("write document");
    file
}

const ELIGIBILITY: &str = r#"{
    "start": "check",
    "steps": [
        { "id": "check",   "kind": "eligibility", "params": { "max_amount": 50000, "min_score": 650 } },
        { "id": "approve", "kind": "decision",    "params": { "value": "approved" } },
        { "id": "reject",  "kind": "decision",    "params": { "value": "rejected" } }
    ],
    "transitions": [
        { "from": "check", "outcome": "passed",   "to": "approve" },
        { "from": "check", "outcome": "rejected", "to": "reject" }
    ]
}"#;

#[test]
fn document_from_disk_runs_with_an_initial_context() {
    let file = document_file(ELIGIBILITY);
    let context = parse_context(Some(r#"{"applicant": {"loan_amount": 1000.0, "credit_score": 800, "suspicious_activity": false}}"#)).unwrap();

    let report = run_document(file.path(), context, &RunOptions::default()).unwrap();
    assert!(report.completed);
    assert_eq!(report.trace, vec!["check", "approve"]);
    assert_eq!(report.context.get_str("decision"), Some("approved"));

    let context = parse_context(Some(r#"{"applicant": {"loan_amount": 1000.0, "credit_score": 500, "suspicious_activity": false}}"#)).unwrap();
    let report = run_document(file.path(), context, &RunOptions::default()).unwrap();
    assert_eq!(report.trace, vec!["check", "reject"]);
    assert_eq!(report.context.get_str("rejected_by"), Some("credit_score_rule"));
}

#[test]
fn strict_option_fails_on_unwired_outcomes() {
    let file = document_file(ELIGIBILITY);
    let context = parse_context(Some(r#"{"applicant": {"loan_amount": 1000.0, "credit_score": 800, "suspicious_activity": false}}"#)).unwrap();
    let strict = RunOptions { max_steps: None,
                              strict: true };

    let err = run_document(file.path(), context, &strict).unwrap_err();
    assert_eq!(err.to_string(),
               "Error del motor: no transition from step 'approve' for outcome 'done'");
}

#[test]
fn step_failures_surface_as_engine_errors() {
    let file = document_file(ELIGIBILITY);
    let err = run_document(file.path(), parse_context(None).unwrap(), &RunOptions::default()).unwrap_err();
    assert!(err.is_step_failure());
    assert_eq!(err.to_string(), "Error del motor: missing context key 'applicant'");
}

#[test]
fn unreadable_or_invalid_documents_are_reported() {
    let missing = run_document("/definitely/not/here.json", parse_context(None).unwrap(), &RunOptions::default());
    assert!(matches!(missing, Err(AppError::Document(_))));

    let file = document_file(r#"{ "start": "a", "steps": [{ "id": "a", "kind": "nope" }] }"#);
    let err = run_document(file.path(), parse_context(None).unwrap(), &RunOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Error en documento de flujo: unknown step kind 'nope'");
}

#[test]
fn loan_runner_honours_policy() {
    let applicant = Applicant::new(20_000.0, 640, false).unwrap();
    let lenient = LoanPolicy { max_amount: 25_000.0,
                               min_score: 600 };
    let report = run_loan(&applicant, lenient, &RunOptions::default()).unwrap();
    assert_eq!(report.context.get_str("decision"), Some("approved"));
    assert_eq!(report.trace,
               vec!["loan_amount_rule", "credit_score_rule", "fraud_check_rule", "decide_approved"]);

    let report = run_loan(&applicant, LoanPolicy::default(), &RunOptions::default()).unwrap();
    assert_eq!(report.context.get_str("decision"), Some("rejected"));
}

#[test]
fn invalid_policy_is_a_domain_error() {
    let applicant = Applicant::new(20_000.0, 700, false).unwrap();
    let err = run_loan(&applicant,
                       LoanPolicy { max_amount: 10_000.0,
                                    min_score: 900 },
                       &RunOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Error de dominio: min_score must be between 0 and 850, got 900");
}
