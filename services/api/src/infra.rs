use fair_report::assessment::AssessmentClient;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) client: Arc<AssessmentClient>,
}

/// Accepts a JSON bool or an HTML checkbox value (`"on"`, `"true"`, `"1"`).
pub(crate) fn deserialize_checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(flag),
        Some(Value::String(text)) => Ok(matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "on" | "true" | "1" | "yes"
        )),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a bool or checkbox value, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "deserialize_checkbox")]
        flag: bool,
    }

    fn flag(body: Value) -> Result<bool, serde_json::Error> {
        serde_json::from_value::<Form>(body).map(|form| form.flag)
    }

    #[test]
    fn checkbox_accepts_bools_and_form_values() {
        assert!(flag(json!({"flag": true})).expect("bool"));
        assert!(flag(json!({"flag": "on"})).expect("checkbox"));
        assert!(!flag(json!({"flag": "off"})).expect("checkbox"));
        assert!(!flag(json!({"flag": null})).expect("null"));
        assert!(!flag(json!({})).expect("missing"));
        assert!(flag(json!({"flag": 3})).is_err());
    }
}
