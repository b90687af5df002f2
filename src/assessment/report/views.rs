use super::super::debug::DebugLine;
use super::super::domain::{FairLetter, TestStatus};
use super::super::maturity::ReconciledMaturity;
use super::super::response::{MetricResult, ScorePair};
use super::overview::ResourceOverview;
use super::summary::Summary;
use serde::Serialize;

/// Badge shown next to a metric or metric test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    PassedAtLevel(u8),
    Passed,
    Unknown,
}

impl StatusIcon {
    pub fn icon_path(self) -> String {
        match self {
            Self::PassedAtLevel(level) => format!("/icon/passed_{level}.png"),
            Self::Passed => "/icon/passed.png".to_string(),
            Self::Unknown => "/icon/unknown.png".to_string(),
        }
    }

    pub fn for_test(status: Option<&TestStatus>) -> Self {
        if TestStatus::is_pass(status) {
            Self::Passed
        } else {
            Self::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTestView {
    pub key: String,
    pub display_key: String,
    pub nested: bool,
    pub name: String,
    pub earned_display: String,
    pub score: ScorePair,
    pub status: Option<TestStatus>,
    pub maturity_display: Option<String>,
    pub icon: StatusIcon,
    pub icon_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricResultView {
    pub identifier: String,
    pub name: String,
    pub letter: FairLetter,
    pub sub_principle: Option<String>,
    pub maturity: ReconciledMaturity,
    pub level_text: String,
    pub status_icon: StatusIcon,
    pub icon_path: String,
    pub score: ScorePair,
    pub score_text: String,
    pub output_pretty: String,
    pub tests: Vec<MetricTestView>,
    /// Keys of metric tests that could not be read as test objects.
    pub dropped_tests: Vec<String>,
    pub debug: Vec<DebugLine>,
    pub dropped_debug_lines: usize,
    pub source: MetricResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub letter: FairLetter,
    pub label: &'static str,
    pub results: Vec<MetricResultView>,
}

/// Items the builder skipped instead of failing the whole report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportDiagnostics {
    pub dropped_results: usize,
    pub dropped_result_identifiers: Vec<String>,
    pub dropped_debug_lines: usize,
    pub dropped_tests: usize,
}

impl ReportDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.dropped_results == 0 && self.dropped_debug_lines == 0 && self.dropped_tests == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub overview: ResourceOverview,
    pub summary: Summary,
    pub sections: Vec<ReportSection>,
    pub diagnostics: ReportDiagnostics,
}

impl Report {
    pub fn section(&self, letter: FairLetter) -> Option<&ReportSection> {
        self.sections.iter().find(|section| section.letter == letter)
    }

    pub fn result_count(&self) -> usize {
        self.sections.iter().map(|section| section.results.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Warning,
    Error,
}

/// User-facing message for a failed assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Notice {
    pub fn warning(title: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            title: title.into(),
            detail: None,
            link: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            detail: None,
            link: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}
