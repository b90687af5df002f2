use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four FAIR principles a metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FairLetter {
    F,
    A,
    I,
    R,
}

impl FairLetter {
    pub const fn ordered() -> [Self; 4] {
        [Self::F, Self::A, Self::I, Self::R]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::F => "Findable",
            Self::A => "Accessible",
            Self::I => "Interoperable",
            Self::R => "Reusable",
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::F => 'F',
            Self::A => 'A',
            Self::I => 'I',
            Self::R => 'R',
        }
    }

    pub const fn from_char(value: char) -> Option<Self> {
        match value {
            'F' => Some(Self::F),
            'A' => Some(Self::A),
            'I' => Some(Self::I),
            'R' => Some(Self::R),
            _ => None,
        }
    }

    /// Key used by the service's summary maps.
    pub const fn key(self) -> &'static str {
        match self {
            Self::F => "F",
            Self::A => "A",
            Self::I => "I",
            Self::R => "R",
        }
    }
}

impl fmt::Display for FairLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Protocol of an optional metadata service the assessment may consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataServiceType {
    #[default]
    OaiPmh,
    OgcCsw,
    Sparql,
}

impl MetadataServiceType {
    pub const fn ordered() -> [Self; 3] {
        [Self::OaiPmh, Self::OgcCsw, Self::Sparql]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::OaiPmh => "oai_pmh",
            Self::OgcCsw => "ogc_csw",
            Self::Sparql => "sparql",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OaiPmh => "OAI-PMH",
            Self::OgcCsw => "OGC CSW",
            Self::Sparql => "SPARQL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|candidate| candidate.key() == value)
    }

    /// Unrecognized input falls back to OAI-PMH.
    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }
}

/// Metric collection the service evaluates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MetricVersion {
    #[default]
    #[serde(rename = "metrics_v0.7_software")]
    Software,
    #[serde(rename = "metrics_v0.7_software_cessda")]
    SoftwareCessda,
}

impl MetricVersion {
    pub const fn ordered() -> [Self; 2] {
        [Self::Software, Self::SoftwareCessda]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Software => "metrics_v0.7_software",
            Self::SoftwareCessda => "metrics_v0.7_software_cessda",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Software => "software-agnostic",
            Self::SoftwareCessda => "software-CESSDA",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|candidate| candidate.key() == value)
    }

    /// Unrecognized input falls back to the software-agnostic metrics.
    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }
}

/// Outcome reported for a metric or one of its tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Pass,
    Fail,
    #[serde(other)]
    Unknown,
}

impl TestStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass => "passed",
            Self::Fail => "not detected",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_pass(status: Option<&Self>) -> bool {
        matches!(status, Some(Self::Pass))
    }
}
