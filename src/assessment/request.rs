use super::domain::{MetadataServiceType, MetricVersion};
use super::response::AssessmentResponse;
use crate::config::AssessmentServiceConfig;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

/// Opt-in header asking the service to keep its own evaluation log.
pub const REMOTE_LOGGING_HEADER: &str = "Allow-Remote-Logging";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("an object identifier (PID or URL) is required")]
    EmptyIdentifier,
    #[error("assessment service not responding: {reason}")]
    Unreachable { reason: String },
    #[error("unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Body posted to the evaluate endpoint. Debug output is always requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentRequest {
    object_identifier: String,
    metadata_service_endpoint: String,
    metadata_service_type: MetadataServiceType,
    test_debug: bool,
    use_datacite: bool,
    use_github: bool,
    metric_version: MetricVersion,
}

impl AssessmentRequest {
    /// Validates the identifier and normalizes the loosely typed form values.
    pub fn new(
        identifier: &str,
        service_endpoint: &str,
        service_type: &str,
        metric_version: &str,
        use_datacite: bool,
        use_github: bool,
    ) -> Result<Self, TransportError> {
        let object_identifier = identifier.trim();
        if object_identifier.is_empty() {
            return Err(TransportError::EmptyIdentifier);
        }

        Ok(Self {
            object_identifier: object_identifier.to_string(),
            metadata_service_endpoint: service_endpoint.trim().to_string(),
            metadata_service_type: MetadataServiceType::parse_or_default(service_type),
            test_debug: true,
            use_datacite,
            use_github,
            metric_version: MetricVersion::parse_or_default(metric_version),
        })
    }

    pub fn object_identifier(&self) -> &str {
        &self.object_identifier
    }

    pub fn metadata_service_endpoint(&self) -> &str {
        &self.metadata_service_endpoint
    }

    pub fn metadata_service_type(&self) -> MetadataServiceType {
        self.metadata_service_type
    }

    pub fn metric_version(&self) -> MetricVersion {
        self.metric_version
    }

    pub fn use_datacite(&self) -> bool {
        self.use_datacite
    }

    pub fn use_github(&self) -> bool {
        self.use_github
    }

    pub fn test_debug(&self) -> bool {
        self.test_debug
    }
}

/// Sends assessment requests to the configured service, one attempt each.
#[derive(Debug, Clone)]
pub struct AssessmentClient {
    http: Client,
    config: AssessmentServiceConfig,
}

impl AssessmentClient {
    pub fn new(config: AssessmentServiceConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TransportError::Client)?;

        if config.credentials.is_none() {
            warn!(endpoint = %config.endpoint, "no assessment service credentials configured");
        }

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AssessmentServiceConfig {
        &self.config
    }

    pub async fn build_and_send(
        &self,
        identifier: &str,
        service_endpoint: &str,
        service_type: &str,
        metric_version: &str,
        use_datacite: bool,
        use_github: bool,
    ) -> Result<AssessmentResponse, TransportError> {
        let request = AssessmentRequest::new(
            identifier,
            service_endpoint,
            service_type,
            metric_version,
            use_datacite,
            use_github,
        )?;
        self.send(&request).await
    }

    /// Posts the request and decodes the body regardless of HTTP status,
    /// since failure payloads come back with non-2xx codes.
    pub async fn send(
        &self,
        request: &AssessmentRequest,
    ) -> Result<AssessmentResponse, TransportError> {
        info!(
            identifier = request.object_identifier(),
            metric_version = request.metric_version().key(),
            endpoint = %self.config.endpoint,
            "dispatching FAIR assessment"
        );

        let mut builder = self
            .http
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(request);
        if self.config.remote_logging {
            builder = builder.header(REMOTE_LOGGING_HEADER, "True");
        }
        if let Some(credentials) = &self.config.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = builder.send().await.map_err(|err| unreachable(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| unreachable(err.to_string()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(unreachable(format!("empty response body (HTTP {status})")));
        }

        AssessmentResponse::from_slice(&body)
            .ok_or_else(|| unreachable(format!("response body is not a JSON object (HTTP {status})")))
    }
}

fn unreachable(reason: String) -> TransportError {
    warn!(%reason, "assessment service unreachable");
    TransportError::Unreachable { reason }
}
