use super::domain::TestStatus;
use super::maturity::MaturityValue;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Decoded body returned by the assessment service, success or failure alike.
///
/// Kept as loose JSON so the report builder can tell a failure payload,
/// a malformed one and a proper result list apart.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentResponse {
    body: Map<String, Value>,
}

impl AssessmentResponse {
    /// Wraps a JSON value; anything other than an object is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(body) => Some(Self { body }),
            _ => None,
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Value>(bytes)
            .ok()
            .and_then(Self::from_value)
    }

    pub fn results(&self) -> Option<&Value> {
        self.body.get("results")
    }

    pub fn status(&self) -> Option<&Value> {
        self.body.get("status")
    }

    pub fn summary(&self) -> Option<&Value> {
        self.body.get("summary")
    }

    pub fn text_field(&self, key: &str) -> Option<String> {
        match self.body.get(key)? {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn into_body(self) -> Map<String, Value> {
        self.body
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    #[serde(default, deserialize_with = "lenient_number")]
    pub earned: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total: f64,
}

/// One metric evaluation as delivered in `results`.
///
/// Every field tolerates an explicit `null`; only a wrong shape for the
/// identifier or the test map rejects the whole result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_identifier: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_name: String,
    #[serde(default)]
    pub maturity: Option<MaturityValue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: ScorePair,
    #[serde(default, deserialize_with = "lenient_status")]
    pub test_status: Option<TestStatus>,
    #[serde(default)]
    pub output: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_tests: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient_lines")]
    pub test_debug: Vec<String>,
}

impl MetricResult {
    /// Metric tests in service order, plus the keys of entries that could not
    /// be read as a test.
    pub fn tests(&self) -> (Vec<(String, MetricTest)>, Vec<String>) {
        let mut tests = Vec::with_capacity(self.metric_tests.len());
        let mut rejected = Vec::new();
        for (key, value) in &self.metric_tests {
            match serde_json::from_value::<MetricTest>(value.clone()) {
                Ok(test) if value.is_object() => tests.push((key.clone(), test)),
                _ => rejected.push(key.clone()),
            }
        }
        (tests, rejected)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_test_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_test_score: ScorePair,
    #[serde(default, deserialize_with = "lenient_status")]
    pub metric_test_status: Option<TestStatus>,
    #[serde(default)]
    pub metric_test_maturity: Option<Value>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_f64().unwrap_or_default(),
        Value::String(text) => text.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<TestStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(match text.trim() {
            "pass" => TestStatus::Pass,
            "fail" => TestStatus::Fail,
            _ => TestStatus::Unknown,
        }),
        Some(_) => Some(TestStatus::Unknown),
    })
}

// Non-string entries are kept as their JSON text so the classifier can
// count them instead of failing the whole result.
fn lenient_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = |value: Value| match value {
        Value::String(text) => text,
        other => other.to_string(),
    };
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.into_iter().map(text).collect(),
        Some(other) => vec![text(other)],
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::<T>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
