//! Pull a JSON object out of free-form model output.
//!
//! Models wrap JSON in markdown fences, prefix it with prose, or both. The
//! candidates below are tried in order and the first one that parses as a
//! JSON object wins:
//!
//! 1. a fenced block tagged `json`
//! 2. a bare fenced block
//! 3. the first balanced `{...}` span
//! 4. the whole reply
//!
//! Any leftover fence markers and surrounding whitespace are stripped from a
//! candidate before parsing.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse model reply as JSON: {0}")]
pub struct ParseError(pub String);

lazy_static! {
    static ref JSON_FENCE: Regex = Regex::new(r"(?s)```json[ \t]*\r?\n?(.*?)```").unwrap();
    static ref BARE_FENCE: Regex = Regex::new(r"(?s)```[ \t]*\r?\n(.*?)```").unwrap();
}

pub fn extract_json(raw: &str) -> Result<Value, ParseError> {
    let candidates = [
        fenced(&JSON_FENCE, raw),
        fenced(&BARE_FENCE, raw),
        first_object(raw),
        Some(raw),
    ];

    let mut last_error = String::from("empty reply");
    for candidate in candidates.into_iter().flatten() {
        let cleaned = candidate.replace("```", "");
        match serde_json::from_str::<Value>(cleaned.trim()) {
            Ok(value @ Value::Object(_)) => return Ok(value),
            Ok(_) => last_error = "expected a JSON object".into(),
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(ParseError(last_error))
}

fn fenced<'a>(re: &Regex, raw: &'a str) -> Option<&'a str> {
    re.captures(raw).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// The first `{...}` span whose braces balance, ignoring braces inside strings.
fn first_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in raw[start..].char_indices() {
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
                    return Some(&raw[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}
