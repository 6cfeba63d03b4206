//! Recovery of JSON payloads embedded in free-form model replies.
//!
//! Model output is never assumed to be valid JSON as a whole. The helpers
//! here locate the first balanced bracket-delimited substring (ignoring
//! brackets inside string literals) and hand the raw text back when no
//! well-formed payload can be recovered.

use serde::de::DeserializeOwned;

/// Outcome of reading structured data out of a model reply. Callers must
/// handle both arms: `Unparsed` keeps the raw text for fallback handling.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelJson<T> {
    Parsed(T),
    Unparsed(String),
}

impl<T> ModelJson<T> {
    pub fn parsed(self) -> Option<T> {
        match self {
            ModelJson::Parsed(value) => Some(value),
            ModelJson::Unparsed(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ModelJson::Parsed(_))
    }
}

/// First balanced `[...]` substring of `text`, if any.
pub fn extract_json_array(text: &str) -> Option<&str> {
    balanced_slice(text, '[', ']')
}

/// First balanced `{...}` substring of `text`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    balanced_slice(text, '{', '}')
}

/// Extract and deserialize the first JSON array in `text`.
pub fn parse_array<T: DeserializeOwned>(text: &str) -> ModelJson<Vec<T>> {
    match extract_json_array(text).and_then(|json| serde_json::from_str(json).ok()) {
        Some(values) => ModelJson::Parsed(values),
        None => ModelJson::Unparsed(text.to_string()),
    }
}

/// Extract and deserialize the first JSON object in `text`.
pub fn parse_object<T: DeserializeOwned>(text: &str) -> ModelJson<T> {
    match extract_json_object(text).and_then(|json| serde_json::from_str(json).ok()) {
        Some(value) => ModelJson::Parsed(value),
        None => ModelJson::Unparsed(text.to_string()),
    }
}

fn balanced_slice(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + offset + c.len_utf8()]);
            }
        }
    }

    None
}
