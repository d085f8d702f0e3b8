//! Lenient parsing of model output that should have been a JSON object.
//!
//! The chain, first success wins:
//!
//! 1. direct parse of the raw text;
//! 2. repair: take the first fenced block, slice from the first `{` to the
//!    last `}`, replace smart quotes, drop trailing commas;
//! 3. keep only lines that look like JSON and parse those.
//!
//! A result that is itself a JSON string is unwrapped and run through the
//! chain once more. Anything but an object is rejected.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[a-zA-Z]*\n([\s\S]*?)```").expect("valid regex"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid regex"));
static JSON_LOOKING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[:{}\[\]"]"#).expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("model returned an empty response")]
    Empty,
    #[error("response is not valid JSON, even after repair")]
    Unparseable,
    #[error("response JSON is not an object")]
    NotAnObject,
}

/// Parse model output into a JSON object.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let value = match parse_any(raw)? {
        Value::String(inner) => parse_any(&inner)?,
        other => other,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NotAnObject),
    }
}

/// Parse model output straight into a lenient record type.
pub fn parse_as<T: DeserializeOwned>(raw: &str) -> Result<T, ParseError> {
    let object = parse_object(raw)?;
    serde_json::from_value(Value::Object(object)).map_err(|e| {
        tracing::debug!(error = %e, "parsed object did not fit the expected record");
        ParseError::Unparseable
    })
}

fn parse_any(text: &str) -> Result<Value, ParseError> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    let repaired = repair(text);
    if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
        return Ok(value);
    }

    let filtered = json_looking_lines(&repaired);
    serde_json::from_str::<Value>(&filtered).map_err(|_| ParseError::Unparseable)
}

/// Fence strip, object slice, quote and comma cleanup.
pub fn repair(text: &str) -> String {
    let unfenced = FENCED_BLOCK
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text, |m| m.as_str());

    let sliced = match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if end > start => &unfenced[start..=end],
        _ => unfenced,
    };

    let quotes_fixed: String = sliced
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect();

    TRAILING_COMMA.replace_all(&quotes_fixed, "$1").into_owned()
}

fn json_looking_lines(text: &str) -> String {
    text.lines()
        .filter(|line| JSON_LOOKING_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}
