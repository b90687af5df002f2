use fair_report::assessment::{AssessmentRequest, Report};
use serde::Serialize;

/// What the submitter asked for, echoed above the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RequestEcho {
    pub(crate) identifier: String,
    pub(crate) identifier_is_link: bool,
    pub(crate) service_endpoint: String,
    pub(crate) service_type: &'static str,
    pub(crate) service_type_label: &'static str,
    pub(crate) metric_version: &'static str,
    pub(crate) metric_version_label: &'static str,
    pub(crate) datacite: &'static str,
    pub(crate) github: &'static str,
}

impl RequestEcho {
    pub(crate) fn from_request(request: &AssessmentRequest) -> Self {
        let identifier = request.object_identifier().to_string();
        Self {
            identifier_is_link: identifier.contains("http"),
            identifier,
            service_endpoint: request.metadata_service_endpoint().to_string(),
            service_type: request.metadata_service_type().key(),
            service_type_label: request.metadata_service_type().label(),
            metric_version: request.metric_version().key(),
            metric_version_label: request.metric_version().label(),
            datacite: toggle_label(request.use_datacite()),
            github: toggle_label(request.use_github()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AssessmentPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) request: Option<RequestEcho>,
    pub(crate) report: Report,
}

const fn toggle_label(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
