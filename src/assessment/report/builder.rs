use super::super::debug::classify_all;
use super::super::domain::{FairLetter, TestStatus};
use super::super::identifier::{parse_identifier, sub_test_suffix};
use super::super::maturity::{reconcile, MaturityValue};
use super::super::request::TransportError;
use super::super::response::{AssessmentResponse, MetricResult, MetricTest};
use super::overview::build_overview;
use super::summary::build_summary;
use super::views::{
    MetricResultView, MetricTestView, Notice, Report, ReportDiagnostics, ReportSection, StatusIcon,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

pub const ISSUE_TRACKER_URL: &str = "https://github.com/pangaea-data-publisher/fuji/issues";

/// Failure payload returned by the service in place of `results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceFailure {
    pub status: Option<u16>,
    pub status_text: String,
    pub title: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceFailureKind {
    Authorization,
    Server,
    Other,
}

impl ServiceFailure {
    fn from_response(response: &AssessmentResponse) -> Self {
        let status_text = response.text_field("status").unwrap_or_default();
        let status = match response.status() {
            Some(Value::Number(number)) => number.as_u64().and_then(|code| u16::try_from(code).ok()),
            _ => status_text.trim().parse().ok(),
        };
        Self {
            status,
            status_text,
            title: response.text_field("title"),
            detail: response.text_field("detail"),
        }
    }

    pub fn kind(&self) -> ServiceFailureKind {
        match self.status {
            Some(401) => ServiceFailureKind::Authorization,
            Some(500) => ServiceFailureKind::Server,
            _ => ServiceFailureKind::Other,
        }
    }

    pub fn notice(&self) -> Notice {
        match self.kind() {
            ServiceFailureKind::Authorization => Notice::error("Authorisation failed"),
            ServiceFailureKind::Server => {
                let notice = Notice::error(
                    self.title
                        .clone()
                        .unwrap_or_else(|| "Internal Server Error".to_string()),
                )
                .with_link(ISSUE_TRACKER_URL);
                match &self.detail {
                    Some(detail) => notice.with_detail(detail.clone()),
                    None => notice,
                }
            }
            ServiceFailureKind::Other => {
                Notice::error(format!("Response code: {}", self.status_text))
            }
        }
    }
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ServiceFailureKind::Authorization => f.write_str("Authorisation failed"),
            ServiceFailureKind::Server => write!(
                f,
                "{}: {}",
                self.title.as_deref().unwrap_or("Internal Server Error"),
                self.detail.as_deref().unwrap_or("no detail given")
            ),
            ServiceFailureKind::Other => write!(f, "Response code: {}", self.status_text),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("assessment service reported a failure: {0}")]
    ServiceFailure(ServiceFailure),
    #[error("assessment payload is malformed: {reason}")]
    MalformedPayload { reason: String },
}

impl ReportError {
    /// `None` for malformed payloads, which render no report and no notice.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::ServiceFailure(failure) => Some(failure.notice()),
            Self::MalformedPayload { .. } => None,
        }
    }

    fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            reason: reason.into(),
        }
    }
}

impl TransportError {
    pub fn notice(&self) -> Notice {
        match self {
            Self::EmptyIdentifier => Notice::warning("Please enter an object identifier (PID or URL)"),
            Self::Unreachable { .. } | Self::Client(_) => Notice::error("Server not responding"),
        }
    }
}

/// Turns the decoded service payload into grouped, display-ready sections.
///
/// Results are grouped by the principle letter of their identifier and keep
/// their input order within each section; sections follow F, A, I, R and
/// only non-empty ones are emitted. Results that cannot be placed are
/// counted in the diagnostics rather than failing the report.
pub fn build_report(raw: AssessmentResponse) -> Result<Report, ReportError> {
    let results = match present(raw.results()) {
        Some(Value::Array(results)) => results.clone(),
        Some(_) => return Err(ReportError::malformed("`results` is not an array")),
        None if present(raw.status()).is_some() => {
            let failure = ServiceFailure::from_response(&raw);
            warn!(status = %failure.status_text, "assessment service returned a failure payload");
            return Err(ReportError::ServiceFailure(failure));
        }
        None => return Err(ReportError::malformed("neither `results` nor `status` present")),
    };

    let overview = build_overview(&raw, &results);
    let summary = build_summary(raw.summary());

    let mut diagnostics = ReportDiagnostics::default();
    let mut grouped: BTreeMap<FairLetter, Vec<MetricResultView>> = BTreeMap::new();

    for (index, value) in results.into_iter().enumerate() {
        let identifier = value
            .get("metric_identifier")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let result = match serde_json::from_value::<MetricResult>(value) {
            Ok(result) => result,
            Err(err) => {
                debug!(index, error = %err, "dropping result that is not a metric object");
                diagnostics.dropped_results += 1;
                diagnostics.dropped_result_identifiers.push(identifier);
                continue;
            }
        };

        let Some(parsed) = parse_identifier(&result.metric_identifier) else {
            debug!(index, identifier = %result.metric_identifier, "dropping result without a FAIR letter");
            diagnostics.dropped_results += 1;
            diagnostics
                .dropped_result_identifiers
                .push(result.metric_identifier.clone());
            continue;
        };

        let view = to_result_view(result, parsed.letter, parsed.sub_principle);
        diagnostics.dropped_debug_lines += view.dropped_debug_lines;
        diagnostics.dropped_tests += view.dropped_tests.len();
        grouped.entry(parsed.letter).or_default().push(view);
    }

    if !diagnostics.is_clean() {
        warn!(
            dropped_results = diagnostics.dropped_results,
            dropped_debug_lines = diagnostics.dropped_debug_lines,
            dropped_tests = diagnostics.dropped_tests,
            "assessment report built with dropped items"
        );
    }

    let sections = grouped
        .into_iter()
        .map(|(letter, results)| ReportSection {
            letter,
            label: letter.label(),
            results,
        })
        .collect();

    Ok(Report {
        overview,
        summary,
        sections,
        diagnostics,
    })
}

fn to_result_view(
    result: MetricResult,
    letter: FairLetter,
    sub_principle: Option<String>,
) -> MetricResultView {
    let maturity = reconcile(result.maturity.as_ref());
    let status_icon = status_icon(result.maturity.as_ref(), result.test_status.as_ref());
    let (tests, dropped_tests) = result.tests();
    let tests = tests
        .into_iter()
        .map(|(key, test)| to_test_view(key, test))
        .collect();
    if !dropped_tests.is_empty() {
        debug!(
            identifier = %result.metric_identifier,
            tests = ?dropped_tests,
            "dropping metric tests that are not test objects"
        );
    }
    let (debug, dropped_debug_lines) = classify_all(&result.test_debug);
    if dropped_debug_lines > 0 {
        debug!(
            identifier = %result.metric_identifier,
            dropped = dropped_debug_lines,
            "dropping unclassifiable debug lines"
        );
    }
    let output_pretty = serde_json::to_string_pretty(&result.output).unwrap_or_default();

    MetricResultView {
        identifier: result.metric_identifier.clone(),
        name: result.metric_name.clone(),
        letter,
        sub_principle,
        level_text: maturity.level_text(),
        maturity,
        status_icon,
        icon_path: status_icon.icon_path(),
        score: result.score,
        score_text: format!("{} of {}", result.score.earned, result.score.total),
        output_pretty,
        tests,
        dropped_tests,
        debug,
        dropped_debug_lines,
        source: result,
    }
}

// An explicit `null` counts as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn status_icon(maturity: Option<&MaturityValue>, status: Option<&TestStatus>) -> StatusIcon {
    match maturity {
        Some(MaturityValue::Numeric(level @ 1..=3)) => StatusIcon::PassedAtLevel(*level as u8),
        Some(MaturityValue::Numeric(_)) => StatusIcon::Unknown,
        _ if TestStatus::is_pass(status) => StatusIcon::Passed,
        _ => StatusIcon::Unknown,
    }
}

fn to_test_view(key: String, test: MetricTest) -> MetricTestView {
    let sub_test = sub_test_suffix(&key);
    let passed = TestStatus::is_pass(test.metric_test_status.as_ref());
    let earned_display = if test.metric_test_score.earned == 0.0 {
        String::new()
    } else {
        test.metric_test_score.earned.to_string()
    };
    let maturity_display = test
        .metric_test_maturity
        .as_ref()
        .filter(|_| passed)
        .and_then(|value| match value {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        });
    let icon = StatusIcon::for_test(test.metric_test_status.as_ref());

    MetricTestView {
        display_key: sub_test.map(String::from).unwrap_or_else(|| key.clone()),
        nested: sub_test.is_some(),
        key,
        name: test.metric_test_name,
        earned_display,
        score: test.metric_test_score,
        status: test.metric_test_status,
        maturity_display,
        icon,
        icon_path: icon.icon_path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::debug::DebugLevel;
    use crate::assessment::maturity::{MaturityLevel, NEUTRAL_COLOR};
    use serde_json::json;

    fn payload(body: Value) -> AssessmentResponse {
        AssessmentResponse::from_value(body).expect("object body")
    }

    #[test]
    fn groups_results_by_letter_in_input_order() {
        let report = build_report(payload(json!({
            "results": [
                {"metric_identifier": "FsF-R1-01MD", "maturity": 1},
                {"metric_identifier": "FsF-F1-01D", "maturity": 0},
                {"metric_identifier": "FsF-F1-02D", "maturity": 3},
                {"metric_identifier": "FsF-A1-01M", "maturity": 2}
            ]
        })))
        .expect("report");

        let letters: Vec<FairLetter> = report.sections.iter().map(|section| section.letter).collect();
        assert_eq!(letters, [FairLetter::F, FairLetter::A, FairLetter::R]);
        let findable: Vec<&str> = report
            .section(FairLetter::F)
            .expect("F section")
            .results
            .iter()
            .map(|result| result.identifier.as_str())
            .collect();
        assert_eq!(findable, ["FsF-F1-01D", "FsF-F1-02D"]);
        assert!(report.section(FairLetter::I).is_none());
        assert_eq!(report.result_count(), 4);
        assert!(report.diagnostics.is_clean());
    }

    #[test]
    fn empty_results_produce_no_sections() {
        let report = build_report(payload(json!({"results": [], "summary": {}}))).expect("report");
        assert!(report.sections.is_empty());
        assert_eq!(report.summary.principles.len(), 4);
    }

    #[test]
    fn malformed_identifiers_are_dropped_and_counted() {
        let report = build_report(payload(json!({
            "results": [
                {"metric_identifier": "FsF-X1-01M"},
                {"metric_identifier": "FsF"},
                "not an object",
                {"metric_identifier": "FsF-I1-01M", "maturity": 1}
            ]
        })))
        .expect("report");

        assert_eq!(report.result_count(), 1);
        assert_eq!(report.diagnostics.dropped_results, 3);
        assert_eq!(
            report.diagnostics.dropped_result_identifiers,
            ["FsF-X1-01M", "FsF", ""]
        );
    }

    #[test]
    fn status_icon_follows_maturity_then_test_status() {
        let cases = [
            (json!(2), json!("pass"), StatusIcon::PassedAtLevel(2)),
            (json!(3), json!("fail"), StatusIcon::PassedAtLevel(3)),
            (json!(0), json!("pass"), StatusIcon::Unknown),
            (json!(9), json!("pass"), StatusIcon::Unknown),
            (json!("defined"), json!("pass"), StatusIcon::Passed),
            (json!("defined"), json!("fail"), StatusIcon::Unknown),
            (json!(null), json!("pass"), StatusIcon::Passed),
        ];
        for (maturity, status, expected) in cases {
            let report = build_report(payload(json!({
                "results": [{"metric_identifier": "FsF-F1-01D", "maturity": maturity, "test_status": status}]
            })))
            .expect("report");
            let result = &report.sections[0].results[0];
            assert_eq!(result.status_icon, expected, "{maturity} / {status}");
        }

        assert_eq!(StatusIcon::PassedAtLevel(2).icon_path(), "/icon/passed_2.png");
        assert_eq!(StatusIcon::Passed.icon_path(), "/icon/passed.png");
        assert_eq!(StatusIcon::Unknown.icon_path(), "/icon/unknown.png");
    }

    #[test]
    fn legacy_and_out_of_range_maturity_are_reconciled() {
        let report = build_report(payload(json!({
            "results": [
                {"metric_identifier": "FsF-R1.1-01M", "maturity": "managed"},
                {"metric_identifier": "FsF-R1.2-01M", "maturity": 7}
            ]
        })))
        .expect("report");
        let reusable = &report.section(FairLetter::R).expect("R section").results;

        assert_eq!(reusable[0].maturity.level, Some(MaturityLevel::Moderate));
        assert_eq!(reusable[0].maturity.color, "#97ca00");
        assert_eq!(reusable[0].sub_principle.as_deref(), Some("R1.1"));
        assert_eq!(reusable[1].maturity.label, "7");
        assert_eq!(reusable[1].maturity.color, NEUTRAL_COLOR);
        assert_eq!(reusable[1].level_text, "7 of 3");
    }

    #[test]
    fn metric_tests_are_projected_for_display() {
        let report = build_report(payload(json!({
            "results": [{
                "metric_identifier": "FsF-F1-02D",
                "metric_tests": {
                    "FsF-F1-02D-1": {
                        "metric_test_name": "Identifier is resolvable",
                        "metric_test_score": {"earned": 0, "total": 1},
                        "metric_test_status": "fail",
                        "metric_test_maturity": 1
                    },
                    "FsF-F1-02D-1a": {
                        "metric_test_name": "Identifier follows a scheme",
                        "metric_test_score": {"earned": 0.5, "total": 1},
                        "metric_test_status": "pass",
                        "metric_test_maturity": 2
                    }
                }
            }]
        })))
        .expect("report");
        let tests = &report.sections[0].results[0].tests;

        assert_eq!(tests[0].display_key, "FsF-F1-02D-1");
        assert!(!tests[0].nested);
        assert_eq!(tests[0].earned_display, "");
        assert_eq!(tests[0].maturity_display, None);
        assert_eq!(tests[0].icon, StatusIcon::Unknown);

        assert_eq!(tests[1].display_key, "a");
        assert!(tests[1].nested);
        assert_eq!(tests[1].earned_display, "0.5");
        assert_eq!(tests[1].maturity_display.as_deref(), Some("2"));
        assert_eq!(tests[1].icon_path, "/icon/passed.png");
    }

    #[test]
    fn debug_lines_are_classified_and_counted() {
        let report = build_report(payload(json!({
            "results": [{
                "metric_identifier": "FsF-A1-01M",
                "test_debug": ["INFO: start", "ERROR: disk full", "stray output"]
            }]
        })))
        .expect("report");
        let result = &report.sections[0].results[0];

        assert_eq!(result.debug.len(), 2);
        assert_eq!(result.debug[1].level, DebugLevel::Error);
        assert_eq!(result.debug[1].display_class.as_deref(), Some("debug_ERROR table-danger"));
        assert_eq!(result.dropped_debug_lines, 1);
        assert_eq!(report.diagnostics.dropped_debug_lines, 1);
    }

    #[test]
    fn failure_payloads_become_service_failures() {
        let error = build_report(payload(json!({"status": 401, "title": "Unauthorized"})))
            .expect_err("failure payload");
        let ReportError::ServiceFailure(failure) = &error else {
            panic!("expected service failure, got {error:?}");
        };
        assert_eq!(failure.kind(), ServiceFailureKind::Authorization);
        assert_eq!(failure.notice().title, "Authorisation failed");

        let error = build_report(payload(json!({
            "status": 500,
            "title": "Internal Server Error",
            "detail": "harvester crashed"
        })))
        .expect_err("failure payload");
        let notice = error.notice().expect("notice");
        assert_eq!(notice.title, "Internal Server Error");
        assert_eq!(notice.detail.as_deref(), Some("harvester crashed"));
        assert_eq!(notice.link.as_deref(), Some(ISSUE_TRACKER_URL));

        let error = build_report(payload(json!({"status": "503"}))).expect_err("failure payload");
        assert_eq!(error.notice().expect("notice").title, "Response code: 503");
    }

    #[test]
    fn null_results_fall_through_to_the_status_notice() {
        let error = build_report(payload(json!({
            "results": null,
            "status": 500,
            "title": "Internal Server Error",
            "detail": "harvester crashed"
        })))
        .expect_err("failure payload");
        let ReportError::ServiceFailure(failure) = &error else {
            panic!("expected service failure, got {error:?}");
        };
        assert_eq!(failure.kind(), ServiceFailureKind::Server);
        let notice = failure.notice();
        assert_eq!(notice.title, "Internal Server Error");
        assert_eq!(notice.detail.as_deref(), Some("harvester crashed"));
        assert_eq!(notice.link.as_deref(), Some(ISSUE_TRACKER_URL));

        let error = build_report(payload(json!({"results": null, "status": null})))
            .expect_err("nothing usable");
        assert!(matches!(error, ReportError::MalformedPayload { .. }));
    }

    #[test]
    fn present_but_null_fields_keep_the_result() {
        let report = build_report(payload(json!({
            "results": [
                {"metric_identifier": "FsF-F1-02D", "metric_name": null, "maturity": 2},
                {"metric_identifier": "FsF-A1-01M", "score": null, "test_status": null},
                {"metric_identifier": "FsF-R1-01MD", "test_debug": ["INFO: ok", 5], "metric_tests": null}
            ]
        })))
        .expect("report");

        assert_eq!(report.result_count(), 3);
        assert_eq!(report.diagnostics.dropped_results, 0);

        let findable = &report.section(FairLetter::F).expect("F section").results[0];
        assert_eq!(findable.name, "");
        assert_eq!(findable.maturity.label, "moderate");

        let accessible = &report.section(FairLetter::A).expect("A section").results[0];
        assert_eq!(accessible.score_text, "0 of 0");

        let reusable = &report.section(FairLetter::R).expect("R section").results[0];
        assert_eq!(reusable.debug.len(), 1);
        assert_eq!(reusable.dropped_debug_lines, 1);
        assert_eq!(report.diagnostics.dropped_debug_lines, 1);
    }

    #[test]
    fn realistic_debug_lines_survive_line_breaks() {
        let report = build_report(payload(json!({
            "results": [{
                "metric_identifier": "FsF-F1-02D",
                "test_debug": [
                    "SUCCESS: Persistent identifier found\n",
                    "WARNING: Landing page could not be resolved\nstatus code 404"
                ]
            }]
        })))
        .expect("report");
        let result = &report.sections[0].results[0];

        assert_eq!(result.dropped_debug_lines, 0);
        assert_eq!(result.debug[0].message, "Persistent identifier found");
        assert_eq!(result.debug[1].level, DebugLevel::Warning);
        assert_eq!(
            result.debug[1].message,
            "Landing page could not be resolved\nstatus code 404"
        );
    }

    #[test]
    fn null_test_fields_keep_status_score_and_maturity() {
        let report = build_report(payload(json!({
            "results": [{
                "metric_identifier": "FsF-F1-02D",
                "metric_tests": {
                    "FsF-F1-02D-1": {
                        "metric_test_name": null,
                        "metric_test_score": {"earned": 1, "total": 1},
                        "metric_test_status": "pass",
                        "metric_test_maturity": 2
                    }
                }
            }]
        })))
        .expect("report");
        let test = &report.sections[0].results[0].tests[0];

        assert_eq!(test.name, "");
        assert_eq!(test.earned_display, "1");
        assert_eq!(test.status, Some(TestStatus::Pass));
        assert_eq!(test.maturity_display.as_deref(), Some("2"));
        assert!(report.diagnostics.is_clean());
    }

    #[test]
    fn unreadable_tests_are_counted_not_blanked() {
        let report = build_report(payload(json!({
            "results": [{
                "metric_identifier": "FsF-F1-02D",
                "metric_tests": {
                    "FsF-F1-02D-1": {"metric_test_name": "Resolvable", "metric_test_status": "pass"},
                    "FsF-F1-02D-2": "not a test",
                    "FsF-F1-02D-3": {"metric_test_name": ["not", "a", "name"]}
                }
            }]
        })))
        .expect("report");
        let result = &report.sections[0].results[0];

        assert_eq!(result.tests.len(), 1);
        assert_eq!(result.dropped_tests, ["FsF-F1-02D-2", "FsF-F1-02D-3"]);
        assert_eq!(report.diagnostics.dropped_tests, 2);
        assert!(!report.diagnostics.is_clean());
    }

    #[test]
    fn payloads_without_results_or_status_are_malformed() {
        let error = build_report(payload(json!({"summary": {}}))).expect_err("malformed");
        assert!(matches!(error, ReportError::MalformedPayload { .. }));
        assert!(error.notice().is_none());

        let error = build_report(payload(json!({"results": {"FsF-F1-01D": {}}})))
            .expect_err("malformed");
        assert!(matches!(error, ReportError::MalformedPayload { .. }));
    }
}
