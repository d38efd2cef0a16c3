use serde_json::{Map, Value};

use super::error::ParseError;

const FENCE: &str = "```";

/// Outcome of reading a JSON object out of raw model text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParseOutcome {
    /// The cleaned text was itself a JSON object.
    Parsed(Map<String, Value>),
    /// The object was found embedded in surrounding prose.
    ExtractedSubstring(Map<String, Value>),
    Failed(ParseError),
}

impl ParseOutcome {
    pub(crate) fn into_result(self) -> Result<Map<String, Value>, ParseError> {
        match self {
            ParseOutcome::Parsed(object) | ParseOutcome::ExtractedSubstring(object) => Ok(object),
            ParseOutcome::Failed(err) => Err(err),
        }
    }
}

/// Run the fallback chain: direct parse, then the first balanced `{...}` substring.
pub(crate) fn parse_object(raw: &str) -> ParseOutcome {
    let cleaned = strip_code_fences(raw);

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(cleaned) {
        return ParseOutcome::Parsed(object);
    }

    match first_braced_object(cleaned)
        .map(|candidate| serde_json::from_str::<Value>(candidate))
    {
        Some(Ok(Value::Object(object))) => ParseOutcome::ExtractedSubstring(object),
        _ => ParseOutcome::Failed(ParseError::NoJsonObject),
    }
}

/// Remove a leading ```` ``` ```` fence (and its language tag) and a trailing fence.
pub(crate) fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        text = &rest[tag_len..];
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

/// Shortest substring starting at the first `{` whose braces balance, ignoring braces that
/// appear inside JSON string literals.
pub(crate) fn first_braced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}
