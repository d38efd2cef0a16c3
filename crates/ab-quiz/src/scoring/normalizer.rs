use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::domain::{CharacteristicPair, ScoreMap};
use super::error::ParseError;
use super::parser::{parse_object, ParseOutcome};

const PAIR_TOTAL: f64 = 100.0;
const NEUTRAL_SCORE: f64 = 50.0;
const SUM_TOLERANCE: f64 = 0.1;

/// Turn raw model text into a [`ScoreMap`] holding both labels of every requested pair.
///
/// Each pair is balanced so its scores sum to 100: a missing side is derived from the other,
/// a pair missing entirely is split 50/50, and totals outside the tolerance are rescaled.
/// Keys not belonging to a requested pair are dropped. Labels match by exact string equality.
pub fn normalize(raw: &str, pairs: &[CharacteristicPair]) -> Result<ScoreMap, ParseError> {
    debug!(raw_len = raw.len(), pairs = pairs.len(), "normalizing model output");

    let outcome = parse_object(raw);
    match &outcome {
        ParseOutcome::ExtractedSubstring(_) => {
            warn!("model output was not a bare JSON object; used the first embedded object")
        }
        ParseOutcome::Failed(err) => warn!(error = %err, "model output held no usable object"),
        ParseOutcome::Parsed(_) => {}
    }

    let object = outcome.into_result()?;
    let parsed = flat_scores(&object)?;

    let mut scores = ScoreMap::new();
    for pair in pairs {
        let (left, right) = balance_pair(
            parsed.get(pair.left()).copied(),
            parsed.get(pair.right()).copied(),
        );
        scores.insert(pair.left(), left);
        scores.insert(pair.right(), right);
    }

    Ok(scores)
}

/// Read a flat `label -> number` mapping. Numeric strings are accepted and `null` counts as
/// an omitted label; anything else is an invalid shape.
fn flat_scores(object: &Map<String, Value>) -> Result<HashMap<&str, f64>, ParseError> {
    let mut scores = HashMap::with_capacity(object.len());

    for (key, value) in object {
        let score = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Value::Null => continue,
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        };

        let score = score.ok_or_else(|| ParseError::InvalidShape { key: key.clone() })?;
        scores.insert(key.as_str(), score);
    }

    Ok(scores)
}

/// Balance one pair so it sums to 100.
///
/// When rescaling, the right score is the complement of the already rounded left score, so a
/// rescaled pair may deviate from 100 by less than the rounding step.
fn balance_pair(left: Option<f64>, right: Option<f64>) -> (f64, f64) {
    let (left, right) = match (left, right) {
        (Some(left), Some(right)) => (left, right),
        (Some(left), None) => (left, PAIR_TOTAL - left),
        (None, Some(right)) => (PAIR_TOTAL - right, right),
        (None, None) => (NEUTRAL_SCORE, NEUTRAL_SCORE),
    };

    let total = left + right;
    if total == 0.0 {
        return (NEUTRAL_SCORE, NEUTRAL_SCORE);
    }
    if (total - PAIR_TOTAL).abs() <= SUM_TOLERANCE {
        return (left, right);
    }

    let scaled_left = round_tenth(left / total * PAIR_TOTAL);
    (scaled_left, round_tenth(PAIR_TOTAL - scaled_left))
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
