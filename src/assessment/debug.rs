//! Debug line classification.
//!
//! Grammar: `LEVEL: message` where `LEVEL` is one or more upper-case ASCII
//! letters, followed by a colon and at least one whitespace character.
//! Leading whitespace is ignored. The message runs to the end of the entry,
//! across line breaks, with trailing whitespace trimmed. Anything else does
//! not classify.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

static DEBUG_LINE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn debug_line_pattern() -> &'static Regex {
    DEBUG_LINE_PATTERN
        .get_or_init(|| Regex::new(r"(?s)^\s*([A-Z]+):\s+(.*)").expect("valid debug line regex"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugLevel {
    Success,
    Warning,
    Error,
    Other(String),
}

impl DebugLevel {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "SUCCESS" => Self::Success,
            "WARNING" => Self::Warning,
            "ERROR" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Other(tag) => tag,
        }
    }

    /// Row class for the debug table; unclassified levels get none.
    pub fn table_class(&self) -> Option<&'static str> {
        match self {
            Self::Success => Some("table-success"),
            Self::Warning => Some("table-warning"),
            Self::Error => Some("table-danger"),
            Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugLine {
    pub level: DebugLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_class: Option<String>,
}

impl DebugLine {
    pub fn is_classified(&self) -> bool {
        self.display_class.is_some()
    }
}

pub fn classify(line: &str) -> Option<DebugLine> {
    let captures = debug_line_pattern().captures(line)?;
    let level = DebugLevel::from_tag(captures.get(1)?.as_str());
    let message = captures
        .get(2)
        .map(|matched| matched.as_str().trim_end().to_string())
        .unwrap_or_default();
    let display_class = level
        .table_class()
        .map(|class| format!("debug_{} {}", level.tag(), class));

    Some(DebugLine {
        level,
        message,
        display_class,
    })
}

/// Classifies every line, returning the kept lines and how many were dropped.
pub fn classify_all<'a, I>(lines: I) -> (Vec<DebugLine>, usize)
where
    I: IntoIterator<Item = &'a String>,
{
    let mut kept = Vec::new();
    let mut dropped = 0;
    for line in lines {
        match classify(line) {
            Some(classified) => kept.push(classified),
            None => dropped += 1,
        }
    }
    (kept, dropped)
}
