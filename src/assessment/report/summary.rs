use super::super::domain::FairLetter;
use super::super::maturity::MaturityLevel;
use serde::Serialize;
use serde_json::{Map, Value};

const OVERALL_KEY: &str = "FAIR";

const SUMMARY_MAPS: [&str; 6] = [
    "score_earned",
    "score_total",
    "score_percent",
    "status_total",
    "status_passed",
    "maturity",
];

/// Scores and maturity for one summary key (`F`, `F1.1`, `FAIR`, ...).
///
/// Values are copied verbatim from the service; `maturity_level` is only the
/// rounded projection used for the badge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub key: String,
    pub earned: Option<f64>,
    pub total: Option<f64>,
    pub percent: Option<f64>,
    pub tests_total: Option<f64>,
    pub tests_passed: Option<f64>,
    pub maturity: Option<f64>,
    pub maturity_level: Option<MaturityLevel>,
}

impl ScoreEntry {
    fn collect(key: &str, summary: Option<&Map<String, Value>>) -> Self {
        let lookup = |map: &str| {
            summary
                .and_then(|summary| summary.get(map))
                .and_then(Value::as_object)
                .and_then(|values| values.get(key))
                .and_then(number)
        };

        let maturity = lookup("maturity");
        Self {
            key: key.to_string(),
            earned: lookup("score_earned"),
            total: lookup("score_total"),
            percent: lookup("score_percent"),
            tests_total: lookup("status_total"),
            tests_passed: lookup("status_passed"),
            maturity,
            maturity_level: maturity.and_then(MaturityLevel::from_score),
        }
    }

    /// "4 of 45"; empty when either side is missing.
    pub fn earned_text(&self) -> String {
        match (self.earned, self.total) {
            (Some(earned), Some(total)) => format!("{earned} of {total}"),
            _ => String::new(),
        }
    }

    pub fn maturity_label(&self) -> Option<&'static str> {
        self.maturity_level.map(MaturityLevel::label)
    }

    pub fn maturity_color(&self) -> Option<&'static str> {
        self.maturity_level.map(MaturityLevel::color)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrincipleSummary {
    pub letter: FairLetter,
    pub label: &'static str,
    #[serde(flatten)]
    pub scores: ScoreEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub overall: ScoreEntry,
    pub principles: Vec<PrincipleSummary>,
    pub sub_principles: Vec<ScoreEntry>,
}

impl Summary {
    pub fn principle(&self, letter: FairLetter) -> Option<&PrincipleSummary> {
        self.principles.iter().find(|entry| entry.letter == letter)
    }

    pub fn sub_principle(&self, key: &str) -> Option<&ScoreEntry> {
        self.sub_principles.iter().find(|entry| entry.key == key)
    }
}

/// Projects the service's `summary` object. Missing maps or keys stay `None`.
pub fn build_summary(summary: Option<&Value>) -> Summary {
    let summary = summary.and_then(Value::as_object);

    let overall = ScoreEntry::collect(OVERALL_KEY, summary);
    let principles = FairLetter::ordered()
        .into_iter()
        .map(|letter| PrincipleSummary {
            letter,
            label: letter.label(),
            scores: ScoreEntry::collect(letter.key(), summary),
        })
        .collect();
    let sub_principles = sub_principle_keys(summary)
        .into_iter()
        .map(|key| ScoreEntry::collect(&key, summary))
        .collect();

    Summary {
        overall,
        principles,
        sub_principles,
    }
}

fn sub_principle_keys(summary: Option<&Map<String, Value>>) -> Vec<String> {
    let Some(summary) = summary else {
        return Vec::new();
    };

    let mut keys: Vec<String> = Vec::new();
    for map in SUMMARY_MAPS {
        let Some(values) = summary.get(map).and_then(Value::as_object) else {
            continue;
        };
        for key in values.keys() {
            let is_principle = FairLetter::ordered()
                .iter()
                .any(|letter| letter.key() == key);
            if key == OVERALL_KEY || is_principle || keys.contains(key) {
                continue;
            }
            keys.push(key.clone());
        }
    }
    keys
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_summary() -> Value {
        json!({
            "score_earned": {"A": 0, "F": 0, "I": 0, "R": 4, "F1": 0, "R1.1": 4, "FAIR": 4.0},
            "score_total": {"A": 2, "F": 20, "I": 7, "R": 16, "F1": 3, "R1.1": 5, "FAIR": 45.0},
            "score_percent": {"A": 0.0, "F": 0.0, "I": 0.0, "R": 25.0, "F1": 0.0, "R1.1": 80.0, "FAIR": 8.89},
            "status_total": {"F1": 1, "R1.1": 2, "A": 1, "F": 7, "I": 3, "R": 6, "FAIR": 17},
            "status_passed": {"F1": 0, "R1.1": 2, "A": 0, "F": 0, "I": 0, "R": 2, "FAIR": 2},
            "maturity": {"A": 0, "F": 0, "I": 0, "R": 1, "F1": 0, "R1.1": 3, "FAIR": 1.0}
        })
    }

    #[test]
    fn copies_principle_scores_in_fair_order() {
        let summary = build_summary(Some(&sample_summary()));

        let letters: Vec<FairLetter> = summary.principles.iter().map(|entry| entry.letter).collect();
        assert_eq!(letters, FairLetter::ordered());

        let reusable = summary.principle(FairLetter::R).expect("R present");
        assert_eq!(reusable.label, "Reusable");
        assert_eq!(reusable.scores.earned, Some(4.0));
        assert_eq!(reusable.scores.total, Some(16.0));
        assert_eq!(reusable.scores.percent, Some(25.0));
        assert_eq!(reusable.scores.tests_passed, Some(2.0));
        assert_eq!(reusable.scores.maturity_label(), Some("initial"));
        assert_eq!(reusable.scores.earned_text(), "4 of 16");
    }

    #[test]
    fn overall_maturity_is_rounded_but_exact_value_kept() {
        let payload = json!({
            "score_earned": {"FAIR": 20},
            "score_total": {"FAIR": 25},
            "score_percent": {"FAIR": 80.0},
            "maturity": {"FAIR": 2.6}
        });
        let summary = build_summary(Some(&payload));
        assert_eq!(summary.overall.maturity, Some(2.6));
        assert_eq!(summary.overall.maturity_level, Some(MaturityLevel::Advanced));
        assert_eq!(summary.overall.maturity_label(), Some("advanced"));
        assert_eq!(summary.overall.maturity_color(), Some("#4c1"));
        assert_eq!(summary.overall.percent, Some(80.0));
    }

    #[test]
    fn sub_principles_keep_first_seen_order() {
        let summary = build_summary(Some(&sample_summary()));
        let keys: Vec<&str> = summary
            .sub_principles
            .iter()
            .map(|entry| entry.key.as_str())
            .collect();
        assert_eq!(keys, ["F1", "R1.1"]);
        let r11 = summary.sub_principle("R1.1").expect("R1.1 present");
        assert_eq!(r11.maturity_level, Some(MaturityLevel::Advanced));
        assert_eq!(r11.tests_total, Some(2.0));
    }

    #[test]
    fn missing_summary_propagates_as_absent_values() {
        let summary = build_summary(None);
        assert_eq!(summary.principles.len(), 4);
        assert!(summary.principles.iter().all(|entry| entry.scores.earned.is_none()));
        assert!(summary.overall.maturity_level.is_none());
        assert!(summary.sub_principles.is_empty());
        assert_eq!(summary.overall.earned_text(), "");

        let partial = build_summary(Some(&json!({"score_total": {"F": 20}})));
        let findable = partial.principle(FairLetter::F).expect("F present");
        assert_eq!(findable.scores.total, Some(20.0));
        assert_eq!(findable.scores.earned, None);
        assert_eq!(findable.scores.maturity_label(), None);
    }
}
