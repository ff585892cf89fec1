//! Response recovery — pulls a JSON array out of free-form model text.
//!
//! Handles code fences, leading prose, trailing commentary, trailing commas, and
//! smart quotes. Never panics; callers get either the array or a `RecoveryError`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```json").unwrap());
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([\]}])").unwrap());
static OBJECT_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*?\}").unwrap());

#[derive(Debug, Error, PartialEq)]
pub enum RecoveryError {
    #[error("model response was empty")]
    Empty,

    #[error("no JSON array found in model response")]
    NoArray,

    #[error("model response could not be parsed as a JSON array")]
    Unparseable,
}

/// Extracts the JSON array from raw model output.
///
/// Text that is already a strict JSON array is returned as-is; cleanup only runs
/// when the strict parse fails.
pub fn recover_array(raw: &str) -> Result<Vec<Value>, RecoveryError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RecoveryError::Empty);
    }

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) {
        return Ok(items);
    }

    let text = strip_fences(raw);
    let text = strip_preamble(&text);
    let text = slice_outer_array(text);
    let text = TRAILING_COMMA.replace_all(text, "$1");
    let text = normalize_quotes(text.trim());

    if !(text.starts_with('[') && text.ends_with(']')) {
        return Err(RecoveryError::NoArray);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err(RecoveryError::Unparseable),
        Err(_) => salvage_objects(&text),
    }
}

fn strip_fences(text: &str) -> String {
    JSON_FENCE
        .replace_all(text, "")
        .replace("```", "")
        .replace('\r', "")
        .trim()
        .to_string()
}

/// Drops commentary before the first `[`, unless an object opens before it.
fn strip_preamble(text: &str) -> &str {
    match text.find(&['[', '{'][..]) {
        Some(pos) if text[pos..].starts_with('[') => &text[pos..],
        _ => text,
    }
}

/// Keeps `[` … `]` from the first open bracket to the last close bracket.
fn slice_outer_array(text: &str) -> &str {
    match (text.find('['), text.rfind(']')) {
        (Some(first), Some(last)) if last > first => &text[first..=last],
        _ => text,
    }
}

fn normalize_quotes(text: &str) -> String {
    text.replace(&['\u{201C}', '\u{201D}'][..], "\"")
        .replace(&['\u{2018}', '\u{2019}'][..], "'")
}

/// Last resort: collect every `{…}` literal and parse them as one array.
fn salvage_objects(text: &str) -> Result<Vec<Value>, RecoveryError> {
    let objects: Vec<&str> = OBJECT_LITERAL.find_iter(text).map(|m| m.as_str()).collect();
    if objects.is_empty() {
        return Err(RecoveryError::Unparseable);
    }

    match serde_json::from_str::<Value>(&format!("[{}]", objects.join(","))) {
        Ok(Value::Array(items)) => Ok(items),
        _ => Err(RecoveryError::Unparseable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_json_round_trips_unchanged() {
        let raw = r#"[{"index":0,"matchPercentage":80,"reasons":["a, ]"]}]"#;
        let expected: Value = serde_json::from_str(raw).unwrap();
        let recovered = recover_array(raw).unwrap();
        assert_eq!(Value::Array(recovered), expected);
    }

    #[test]
    fn test_strips_json_code_fence() {
        let raw = "```json\n[{\"index\":0,\"matchPercentage\":150}]\n```";
        let recovered = recover_array(raw).unwrap();
        assert_eq!(recovered, vec![json!({"index": 0, "matchPercentage": 150})]);
    }

    #[test]
    fn test_strips_uppercase_fence_and_carriage_returns() {
        let raw = "```JSON\r\n[{\"index\":1,\"matchPercentage\":40}]\r\n```";
        assert_eq!(recover_array(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_strips_leading_prose_and_trailing_commentary() {
        let raw = "Here is the JSON you asked for:\n[{\"index\":2,\"matchPercentage\":61}]\nLet me know if you need more.";
        let recovered = recover_array(raw).unwrap();
        assert_eq!(recovered[0]["index"], 2);
    }

    #[test]
    fn test_removes_trailing_commas() {
        let raw = "[{\"index\":0,\"matchPercentage\":70,\"reasons\":[\"react\",],},]";
        let recovered = recover_array(raw).unwrap();
        assert_eq!(recovered[0]["reasons"], json!(["react"]));
    }

    #[test]
    fn test_normalizes_smart_quotes() {
        let raw = "Result: [{\u{201C}index\u{201D}: 0, \u{201C}matchPercentage\u{201D}: 55}]";
        let recovered = recover_array(raw).unwrap();
        assert_eq!(recovered[0]["matchPercentage"], 55);
    }

    #[test]
    fn test_salvages_objects_from_polluted_array() {
        let raw = "[{\"index\":0,\"matchPercentage\":90} oops {\"index\":1,\"matchPercentage\":20}]";
        let recovered = recover_array(raw).unwrap();
        assert_eq!(recovered.len(), 2);
        assert_eq!(recovered[1]["index"], 1);
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(recover_array("   "), Err(RecoveryError::Empty));
    }

    #[test]
    fn test_text_without_array_fails() {
        assert_eq!(
            recover_array("I cannot rank these internships."),
            Err(RecoveryError::NoArray)
        );
    }

    #[test]
    fn test_bare_object_is_not_an_array() {
        assert_eq!(
            recover_array("{\"index\":0,\"matchPercentage\":10}"),
            Err(RecoveryError::NoArray)
        );
    }

    #[test]
    fn test_garbage_inside_brackets_fails() {
        assert_eq!(
            recover_array("[not json at all]"),
            Err(RecoveryError::Unparseable)
        );
    }
}
