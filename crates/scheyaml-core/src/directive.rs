//! # Directive Extraction
//!
//! Directives are metadata embedded in a YAML document as comments of the
//! exact shape `## <key>: <value>`, where both key and value consist of
//! ASCII letters, digits, `_` and `-`. Because they are comments, the YAML
//! parser never sees them; they are recovered from the raw text instead.
//!
//! ```text
//! ## id: person
//! ## schema: base
//! name: string
//! ```
//!
//! Anything that does not match the shape is ignored. There is no escaping,
//! quoting, or multi-line form.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const DIRECTIVE_PATTERN: &str = r"## ([A-Za-z0-9_-]+): ([A-Za-z0-9_-]+)";

/// A single `## key: value` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub key: String,
    pub value: String,
}

impl Directive {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

fn directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DIRECTIVE_PATTERN).expect("directive pattern is a valid regex"))
}

/// Extract every directive from `text`, in order of appearance.
///
/// Keys may repeat. Text without any directive yields an empty vector.
pub fn extract_directives(text: &str) -> Vec<Directive> {
    directive_regex()
        .captures_iter(text)
        .map(|caps| Directive::new(&caps[1], &caps[2]))
        .collect()
}

/// Values of all directives with the given key, in document order.
pub fn directive_values<'a>(directives: &'a [Directive], key: &str) -> Vec<&'a str> {
    directives
        .iter()
        .filter(|d| d.key == key)
        .map(|d| d.value.as_str())
        .collect()
}
