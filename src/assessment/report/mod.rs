mod builder;
mod overview;
mod summary;
pub mod views;

pub use builder::{build_report, ReportError, ServiceFailure, ServiceFailureKind, ISSUE_TRACKER_URL};
pub use overview::ResourceOverview;
pub use summary::{build_summary, PrincipleSummary, ScoreEntry, Summary};
pub use views::{
    MetricResultView, MetricTestView, Notice, NoticeKind, Report, ReportDiagnostics, ReportSection,
    StatusIcon,
};
