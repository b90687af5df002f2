use crate::page::AssessmentPage;
use fair_report::assessment::report::{Notice, ScoreEntry};
use std::fmt::Write;

pub(crate) fn render_notice(notice: &Notice) -> String {
    let mut out = notice.title.clone();
    if let Some(detail) = &notice.detail {
        write!(out, "\n{detail}").expect("write notice");
    }
    if let Some(link) = &notice.link {
        write!(out, "\nPlease report this issue at {link}").expect("write notice");
    }
    out
}

pub(crate) fn render_assessment(page: &AssessmentPage) -> String {
    let mut out = String::new();
    let report = &page.report;
    let overview = &report.overview;

    writeln!(out, "FAIR assessment report").expect("write report");
    if let Some(request) = &page.request {
        writeln!(out, "Identifier: {}", request.identifier).expect("write report");
        writeln!(
            out,
            "Metric version: {} | Metadata service: {} {}",
            request.metric_version_label, request.service_type_label, request.service_endpoint
        )
        .expect("write report");
        writeln!(
            out,
            "DataCite support: {} | GitHub support: {}",
            request.datacite, request.github
        )
        .expect("write report");
    }

    writeln!(out, "\nEvaluated resource").expect("write report");
    writeln!(out, "- Title: {}", overview.title.as_deref().unwrap_or("n/a")).expect("write report");
    writeln!(out, "- PID: {}", overview.pid_url.as_deref().unwrap_or("n/a")).expect("write report");
    if let Some(version) = &overview.metric_version {
        writeln!(out, "- Metrics: {version}").expect("write report");
    }
    if let Some(version) = &overview.software_version {
        writeln!(out, "- F-UJI version: {version}").expect("write report");
    }
    if let Some(specification) = &overview.metric_specification {
        writeln!(out, "- Specification: {specification}").expect("write report");
    }
    if let Some(evaluated_at) = overview.evaluated_at {
        writeln!(out, "- Evaluated: {}", evaluated_at.to_rfc3339()).expect("write report");
    }

    writeln!(out, "\nSummary").expect("write report");
    for principle in &report.summary.principles {
        writeln!(out, "{}", score_line(principle.label, &principle.scores)).expect("write report");
    }
    writeln!(out, "{}", score_line("FAIR", &report.summary.overall)).expect("write report");

    for section in &report.sections {
        writeln!(out, "\n{} ({})", section.label, section.letter).expect("write report");
        for result in &section.results {
            writeln!(
                out,
                "- {} {}: {} | maturity {} ({}) | score {}",
                result.identifier,
                result.name,
                result.status_icon.icon_path(),
                result.maturity.label,
                result.level_text,
                result.score_text
            )
            .expect("write report");
            for test in &result.tests {
                let indent = if test.nested { "      " } else { "    " };
                let mut line = format!(
                    "{indent}{} {} [{}]",
                    test.display_key,
                    test.name,
                    test.icon_path
                );
                if !test.earned_display.is_empty() {
                    write!(line, " earned {}", test.earned_display).expect("write test line");
                }
                if let Some(maturity) = &test.maturity_display {
                    write!(line, " maturity {maturity}").expect("write test line");
                }
                writeln!(out, "{line}").expect("write report");
            }
            for debug in &result.debug {
                writeln!(out, "    {}: {}", debug.level.tag(), debug.message).expect("write report");
            }
        }
    }

    let diagnostics = &report.diagnostics;
    if !diagnostics.is_clean() {
        writeln!(
            out,
            "\nSkipped {} result(s), {} metric test(s) and {} debug line(s) that could not be interpreted",
            diagnostics.dropped_results, diagnostics.dropped_tests, diagnostics.dropped_debug_lines
        )
        .expect("write report");
    }

    out
}

fn score_line(label: &str, entry: &ScoreEntry) -> String {
    let percent = entry
        .percent
        .map(|percent| format!("{percent:.2}%"))
        .unwrap_or_else(|| "n/a".to_string());
    let maturity = match (entry.maturity_label(), entry.maturity) {
        (Some(label), Some(value)) => format!("{label} ({value})"),
        (None, Some(value)) => value.to_string(),
        _ => "n/a".to_string(),
    };
    format!(
        "- {label}: {} earned, {percent}, maturity {maturity}",
        entry.earned_text()
    )
}
