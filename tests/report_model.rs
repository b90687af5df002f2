use fair_report::assessment::debug::DebugLevel;
use fair_report::assessment::report::{ServiceFailureKind, StatusIcon};
use fair_report::assessment::{
    build_report, AssessmentResponse, FairLetter, MaturityLevel, MaturityValue, Report,
    ReportError,
};
use serde_json::{json, Value};

fn fixture_report() -> Report {
    let raw = include_str!("fixtures/evaluation.json");
    let response = AssessmentResponse::from_slice(raw.as_bytes()).expect("fixture is an object");
    build_report(response).expect("fixture builds a report")
}

fn response(body: Value) -> AssessmentResponse {
    AssessmentResponse::from_value(body).expect("object body")
}

#[test]
fn unauthorized_payload_renders_authorisation_failed() {
    let error = build_report(response(json!({"status": 401}))).expect_err("failure payload");

    let ReportError::ServiceFailure(failure) = &error else {
        panic!("expected a service failure, got {error:?}");
    };
    assert_eq!(failure.status, Some(401));
    assert_eq!(failure.kind(), ServiceFailureKind::Authorization);
    assert_eq!(failure.to_string(), "Authorisation failed");
    assert_eq!(
        error.notice().expect("notice").title,
        "Authorisation failed"
    );
}

#[test]
fn single_numeric_result_lands_in_findable_section() {
    let report = build_report(response(json!({
        "results": [{
            "metric_identifier": "FsF-F1-02D",
            "maturity": 2,
            "score": {"earned": 2, "total": 2},
            "metric_tests": {},
            "test_debug": []
        }]
    })))
    .expect("report");

    assert_eq!(report.sections.len(), 1);
    let section = &report.sections[0];
    assert_eq!(section.letter, FairLetter::F);
    assert_eq!(section.label, "Findable");
    assert_eq!(section.results.len(), 1);

    let result = &section.results[0];
    assert_eq!(result.maturity.label, "moderate");
    assert_eq!(result.maturity.color, "#97ca00");
    assert_eq!(result.score_text, "2 of 2");
    assert_eq!(result.status_icon, StatusIcon::PassedAtLevel(2));
    assert_eq!(result.source.maturity, Some(MaturityValue::Numeric(2)));
}

#[test]
fn overall_maturity_rounds_up_and_keeps_exact_value() {
    let report = build_report(response(json!({
        "results": [],
        "summary": {"maturity": {"FAIR": 2.6}}
    })))
    .expect("report");

    let overall = &report.summary.overall;
    assert_eq!(overall.maturity_level, Some(MaturityLevel::Advanced));
    assert_eq!(overall.maturity_level.map(MaturityLevel::value), Some(3));
    assert_eq!(overall.maturity_label(), Some("advanced"));
    assert_eq!(overall.maturity_color(), Some("#4c1"));
    assert_eq!(overall.maturity, Some(2.6));
}

#[test]
fn fixture_groups_every_recognized_result_once() {
    let report = fixture_report();

    let letters: Vec<FairLetter> = report.sections.iter().map(|section| section.letter).collect();
    assert_eq!(letters, [FairLetter::F, FairLetter::A, FairLetter::R]);

    let findable: Vec<&str> = report
        .section(FairLetter::F)
        .expect("F section")
        .results
        .iter()
        .map(|result| result.identifier.as_str())
        .collect();
    assert_eq!(findable, ["FsF-F1-02D", "FsF-F2-01M", "FsF-F1-02D"]);

    assert_eq!(report.result_count(), 5);
    assert_eq!(report.diagnostics.dropped_results, 1);
    assert_eq!(report.diagnostics.dropped_result_identifiers, ["CESSDA-1"]);
    assert_eq!(report.diagnostics.dropped_debug_lines, 1);
}

#[test]
fn fixture_reconciles_legacy_maturity_and_nests_sub_tests() {
    let report = fixture_report();
    let findable = &report.section(FairLetter::F).expect("F section").results;

    let core_metadata = &findable[1];
    assert_eq!(core_metadata.maturity.level, Some(MaturityLevel::Moderate));
    assert_eq!(core_metadata.maturity.color, "#97ca00");
    assert_eq!(
        core_metadata.maturity.original,
        Some(MaturityValue::Legacy("managed".to_string()))
    );
    assert_eq!(core_metadata.status_icon, StatusIcon::Unknown);
    assert_eq!(core_metadata.sub_principle.as_deref(), Some("F2"));

    let sub_test = &core_metadata.tests[1];
    assert_eq!(sub_test.display_key, "a");
    assert!(sub_test.nested);
    assert_eq!(sub_test.earned_display, "");
    assert_eq!(sub_test.maturity_display, None);

    let debug_levels: Vec<&DebugLevel> = core_metadata.debug.iter().map(|line| &line.level).collect();
    assert_eq!(debug_levels, [&DebugLevel::Warning]);
    assert_eq!(core_metadata.dropped_debug_lines, 1);
}

#[test]
fn fixture_exposes_overview_and_summary() {
    let report = fixture_report();

    let overview = &report.overview;
    assert_eq!(overview.title.as_deref(), Some("Sea ice thickness toolkit"));
    assert_eq!(
        overview.pid_url.as_deref(),
        Some("https://doi.org/10.5281/zenodo.7654321")
    );
    assert_eq!(overview.metric_version.as_deref(), Some("metrics_v0.7_software"));
    assert!(overview.evaluated_at.is_some());

    let findable = report.summary.principle(FairLetter::F).expect("F summary");
    assert_eq!(findable.scores.maturity, Some(2.5));
    assert_eq!(findable.scores.maturity_level, Some(MaturityLevel::Advanced));
    assert_eq!(report.summary.overall.maturity_level, Some(MaturityLevel::Initial));

    let interoperable = report.summary.principle(FairLetter::I).expect("I summary");
    assert_eq!(interoperable.scores.total, Some(0.0));

    let keys: Vec<&str> = report
        .summary
        .sub_principles
        .iter()
        .map(|entry| entry.key.as_str())
        .collect();
    assert_eq!(keys, ["A1", "F1", "F2", "R1.1"]);
}

#[test]
fn fixture_keeps_output_for_display() {
    let report = fixture_report();
    let reusable = &report.section(FairLetter::R).expect("R section").results[0];

    assert!(reusable.output_pretty.contains("\"license\": \"CC-BY-4.0\""));
    assert!(reusable.tests.is_empty());
    assert!(reusable.debug.is_empty());
    assert_eq!(reusable.status_icon.icon_path(), "/icon/passed_1.png");
}
