use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Color used when a maturity value cannot be placed on the canonical scale.
pub const NEUTRAL_COLOR: &str = "grey";

/// Canonical 0-3 maturity scale shared by the summary table and metric badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    Incomplete,
    Initial,
    Moderate,
    Advanced,
}

impl MaturityLevel {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Incomplete,
            Self::Initial,
            Self::Moderate,
            Self::Advanced,
        ]
    }

    pub const fn value(self) -> u8 {
        match self {
            Self::Incomplete => 0,
            Self::Initial => 1,
            Self::Moderate => 2,
            Self::Advanced => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Initial => "initial",
            Self::Moderate => "moderate",
            Self::Advanced => "advanced",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Incomplete => "#fe7d37",
            Self::Initial => "#dfb317",
            Self::Moderate => "#97ca00",
            Self::Advanced => "#4c1",
        }
    }

    pub const fn from_index(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Incomplete),
            1 => Some(Self::Initial),
            2 => Some(Self::Moderate),
            3 => Some(Self::Advanced),
            _ => None,
        }
    }

    /// Rounds half-up before the palette lookup; summary maturities are averages.
    pub fn from_score(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Self::from_index(value.round() as i64)
    }

    /// Labels emitted by older service versions before the numeric scale.
    pub fn from_legacy_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "incomplete" => Some(Self::Incomplete),
            "initial" => Some(Self::Initial),
            "managed" => Some(Self::Moderate),
            "defined" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Maturity as the service sent it: numeric on current versions, free text on legacy ones.
#[derive(Debug, Clone, PartialEq)]
pub enum MaturityValue {
    Numeric(i64),
    Legacy(String),
}

impl MaturityValue {
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(number) => match number.as_i64() {
                Some(integer) => Some(Self::Numeric(integer)),
                None => match number.as_f64() {
                    Some(float) if float.fract() == 0.0 => Some(Self::Numeric(float as i64)),
                    _ => Some(Self::Legacy(number.to_string())),
                },
            },
            Value::String(text) => Some(Self::Legacy(text.clone())),
            other => Some(Self::Legacy(other.to_string())),
        }
    }

    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            Self::Numeric(value) => Some(*value),
            Self::Legacy(_) => None,
        }
    }
}

impl fmt::Display for MaturityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Legacy(text) => f.write_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for MaturityValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom("maturity must not be null"))
    }
}

impl Serialize for MaturityValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Numeric(value) => serializer.serialize_i64(*value),
            Self::Legacy(text) => serializer.serialize_str(text),
        }
    }
}

/// Display-ready maturity: canonical level when resolvable, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledMaturity {
    pub level: Option<MaturityLevel>,
    pub label: String,
    pub color: &'static str,
    pub original: Option<MaturityValue>,
}

impl ReconciledMaturity {
    pub fn is_resolved(&self) -> bool {
        self.level.is_some()
    }

    /// "2 of 3" style text for the level row; falls back to the raw value.
    pub fn level_text(&self) -> String {
        match (self.level, &self.original) {
            (Some(level), _) => format!("{} of 3", level.value()),
            (None, Some(original)) => format!("{original} of 3"),
            (None, None) => String::new(),
        }
    }

    fn resolved(level: MaturityLevel, original: Option<MaturityValue>) -> Self {
        Self {
            level: Some(level),
            label: level.label().to_string(),
            color: level.color(),
            original,
        }
    }
}

/// Single reconciliation point for both maturity encodings.
pub fn reconcile(value: Option<&MaturityValue>) -> ReconciledMaturity {
    let original = value.cloned();
    let level = match value {
        Some(MaturityValue::Numeric(number)) => MaturityLevel::from_index(*number),
        Some(MaturityValue::Legacy(label)) => MaturityLevel::from_legacy_label(label),
        None => None,
    };

    match level {
        Some(level) => ReconciledMaturity::resolved(level, original),
        None => ReconciledMaturity {
            level: None,
            label: value.map(ToString::to_string).unwrap_or_default(),
            color: NEUTRAL_COLOR,
            original,
        },
    }
}
