use super::super::response::AssessmentResponse;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

const TITLE_METRIC: &str = "FsF-F2-01M";
const PID_METRIC: &str = "FsF-F1-02D";

/// Card describing the evaluated resource and the service run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceOverview {
    pub title: Option<String>,
    pub pid_url: Option<String>,
    pub metric_version: Option<String>,
    pub software_version: Option<String>,
    pub metric_specification: Option<String>,
    pub evaluated_at: Option<DateTime<Utc>>,
}

pub(crate) fn build_overview(response: &AssessmentResponse, results: &[Value]) -> ResourceOverview {
    let title = metric_output(results, TITLE_METRIC)
        .and_then(|output| output.pointer("/core_metadata_found/title"))
        .and_then(first_text);
    let pid_url = metric_output(results, PID_METRIC)
        .and_then(|output| output.get("pid"))
        .and_then(first_text);

    let metric_version = response.text_field("metric_version").map(|version| {
        version
            .strip_suffix(".yaml")
            .map(str::to_string)
            .unwrap_or(version)
    });
    let evaluated_at = response
        .text_field("end_timestamp")
        .or_else(|| response.text_field("timestamp"))
        .and_then(|raw| parse_timestamp(&raw));

    ResourceOverview {
        title,
        pid_url,
        metric_version,
        software_version: response.text_field("software_version"),
        metric_specification: response.text_field("metric_specification"),
        evaluated_at,
    }
}

fn metric_output<'a>(results: &'a [Value], identifier: &str) -> Option<&'a Value> {
    results
        .iter()
        .find(|result| result.get("metric_identifier").and_then(Value::as_str) == Some(identifier))
        .and_then(|result| result.get("output"))
}

fn first_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim(),
        Value::Array(items) => items.first().and_then(Value::as_str)?.trim(),
        _ => return None,
    };
    (!text.is_empty()).then(|| text.to_string())
}

// The service omits the offset on some versions; those stamps are UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn response(body: Value) -> AssessmentResponse {
        AssessmentResponse::from_value(body).expect("object body")
    }

    #[test]
    fn reads_title_pid_and_versions() {
        let results = vec![
            json!({"metric_identifier": "FsF-F1-02D", "output": {"pid": "https://doi.org/10.5281/zenodo.1"}}),
            json!({"metric_identifier": "FsF-F2-01M", "output": {"core_metadata_found": {"title": ["Sea ice", "Alt"]}}}),
        ];
        let payload = response(json!({
            "metric_version": "metrics_v0.7_software.yaml",
            "software_version": "3.2.0",
            "metric_specification": "https://doi.org/10.5281/zenodo.6461229",
            "end_timestamp": "2024-03-01T10:15:00Z"
        }));

        let overview = build_overview(&payload, &results);
        assert_eq!(overview.title.as_deref(), Some("Sea ice"));
        assert_eq!(overview.pid_url.as_deref(), Some("https://doi.org/10.5281/zenodo.1"));
        assert_eq!(overview.metric_version.as_deref(), Some("metrics_v0.7_software"));
        assert_eq!(overview.software_version.as_deref(), Some("3.2.0"));
        assert_eq!(
            overview.evaluated_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        let payload = response(json!({"timestamp": "2024-03-01T10:15:00.250"}));
        let overview = build_overview(&payload, &[]);
        let stamp = overview.evaluated_at.expect("parsed");
        assert_eq!(stamp.timestamp(), 1_709_288_100);
    }

    #[test]
    fn missing_pieces_stay_empty() {
        let results = vec![json!({"metric_identifier": "FsF-F2-01M", "output": {"core_metadata_found": {}}})];
        let overview = build_overview(&response(json!({"timestamp": "yesterday"})), &results);
        assert_eq!(overview, ResourceOverview::default());
    }
}
