use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Answer recorded for a question the participant skipped.
pub const NO_ANSWER: &str = "No answer";

const PAIR_SEPARATOR: &str = " vs ";

/// Characteristic pairs offered by the quiz client when a request names none.
pub const DEFAULT_CHARACTERISTIC_PAIRS: [&str; 10] = [
    "Collaborative vs Independent",
    "Detail-oriented vs Big-picture thinker",
    "Proactive vs Reactive",
    "Flexible vs Structured",
    "Risk-taker vs Risk-averse",
    "Specialist vs Generalist",
    "Analytical vs Creative",
    "Fast-paced vs Methodical",
    "Introverted vs Extroverted",
    "Process-driven vs Results-driven",
];

/// A forced-choice question as authored in the quiz builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(alias = "question")]
    pub text: String,
    pub option_a: String,
    pub option_b: String,
    /// Side picked by the participant, when the client sends selections instead of answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<Selection>,
}

/// Which side of an A/B question the participant picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    A,
    B,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        option_a: impl Into<String>,
        option_b: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            option_a: option_a.into(),
            option_b: option_b.into(),
            selected_option: None,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selected_option = Some(selection);
        self
    }

    /// Answer text sent to the model for a (possibly missing) selection.
    pub fn answer_for(&self, selection: Option<Selection>) -> String {
        match selection {
            Some(Selection::A) => self.option_a.clone(),
            Some(Selection::B) => self.option_b.clone(),
            None => NO_ANSWER.to_string(),
        }
    }

    pub fn selected_answer(&self) -> String {
        self.answer_for(self.selected_option)
    }
}

/// Two opposite trait labels whose scores sum to 100, written `"Left vs Right"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacteristicPair {
    name: String,
    left: String,
    right: String,
}

impl CharacteristicPair {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedCharacteristic(name.to_string());

        let (left, right) = name.split_once(PAIR_SEPARATOR).ok_or_else(malformed)?;
        let (left, right) = (left.trim(), right.trim());
        if left.is_empty() || right.is_empty() || left == right {
            return Err(malformed());
        }

        Ok(Self {
            name: name.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        })
    }

    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>, ValidationError> {
        if names.is_empty() {
            return Err(ValidationError::NoCharacteristics);
        }
        names.iter().map(|name| Self::parse(name.as_ref())).collect()
    }

    /// The pair exactly as the caller named it.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }
}

impl fmt::Display for CharacteristicPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Normalized per-trait scores handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreMap(BTreeMap<String, f64>);

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, label: &str, score: f64) {
        self.0.insert(label.to_string(), score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pair_labels_and_trims_whitespace() {
        let pair = CharacteristicPair::parse("Risk-taker  vs Risk-averse ").expect("valid pair");
        assert_eq!(pair.left(), "Risk-taker");
        assert_eq!(pair.right(), "Risk-averse");
        assert_eq!(pair.name(), "Risk-taker  vs Risk-averse ");
    }

    #[test]
    fn rejects_pairs_without_two_distinct_labels() {
        for name in ["Flexible", "Flexible vs ", " vs Structured", "Calm vs Calm"] {
            match CharacteristicPair::parse(name) {
                Err(ValidationError::MalformedCharacteristic(raw)) => assert_eq!(raw, name),
                other => panic!("expected malformed characteristic for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn default_pairs_all_parse() {
        let pairs = CharacteristicPair::parse_all(&DEFAULT_CHARACTERISTIC_PAIRS)
            .expect("default pairs are well formed");
        assert_eq!(pairs.len(), DEFAULT_CHARACTERISTIC_PAIRS.len());
    }

    #[test]
    fn answer_for_uses_option_text_or_sentinel() {
        let question = Question::new("1", "Would you rather ski or surf?", "ski", "surf");
        assert_eq!(question.answer_for(Some(Selection::A)), "ski");
        assert_eq!(question.answer_for(Some(Selection::B)), "surf");
        assert_eq!(question.answer_for(None), NO_ANSWER);
    }

    #[test]
    fn question_accepts_client_field_names() {
        let question: Question = serde_json::from_value(serde_json::json!({
            "id": "7",
            "question": "Would you rather plan or improvise?",
            "optionA": "plan",
            "optionB": "improvise",
            "selectedOption": "A"
        }))
        .expect("client payload deserializes");
        assert_eq!(question.text, "Would you rather plan or improvise?");
        assert_eq!(question.option_b, "improvise");
        assert_eq!(question.selected_option, Some(Selection::A));
        assert_eq!(question.selected_answer(), "plan");
    }

    #[test]
    fn unselected_question_answers_with_sentinel() {
        let question: Question = serde_json::from_value(serde_json::json!({
            "id": "8",
            "text": "Would you rather lead or follow?",
            "optionA": "lead",
            "optionB": "follow",
            "selectedOption": null
        }))
        .expect("client payload deserializes");
        assert_eq!(question.selected_option, None);
        assert_eq!(question.selected_answer(), NO_ANSWER);

        let picked = question.with_selection(Selection::B);
        assert_eq!(picked.selected_answer(), "follow");
    }

    #[test]
    fn score_map_serializes_as_flat_object() {
        let mut scores = ScoreMap::new();
        scores.insert("Independent", 20.0);
        scores.insert("Collaborative", 80.0);
        let json = serde_json::to_value(&scores).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({ "Collaborative": 80.0, "Independent": 20.0 })
        );
    }
}
