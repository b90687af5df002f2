//! Submitting research objects for FAIR assessment and turning the service's
//! evaluation into a grouped report.
//!
//! Flow: [`AssessmentClient`] posts an [`AssessmentRequest`] and hands back the
//! raw [`AssessmentResponse`]; [`build_report`] groups its results by FAIR
//! letter and [`build_summary`] projects the score tables.

pub mod debug;
pub mod domain;
pub mod identifier;
pub mod maturity;
pub mod report;
mod request;
mod response;

pub use domain::{FairLetter, MetadataServiceType, MetricVersion, TestStatus};
pub use maturity::{reconcile, MaturityLevel, MaturityValue, ReconciledMaturity};
pub use report::{build_report, build_summary, Report, ReportError, Summary};
pub use request::{AssessmentClient, AssessmentRequest, TransportError, REMOTE_LOGGING_HEADER};
pub use response::{AssessmentResponse, MetricResult, MetricTest, ScorePair};
