//! # Document Loading
//!
//! A [`Document`] is one source file parsed into a generic value tree and
//! paired with the directives found in its raw text.
//!
//! Parsing is behind the [`DocumentParser`] trait so the concrete format
//! library can be swapped. The default [`YamlParser`] uses `serde_yaml` and
//! converts the YAML tree into a `serde_json::Value`; the workspace enables
//! `serde_json/preserve_order`, so mapping keys keep their source order.
//!
//! Parse failures surface as [`ScheyamlError::MalformedDocument`] and are
//! never swallowed here.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::directive::{directive_values, extract_directives, Directive};
use crate::error::ScheyamlError;

/// Rejection of a document's text by a [`DocumentParser`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Turns document text into a value tree.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Value, ParseError>;
}

/// YAML parser backed by `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl DocumentParser for YamlParser {
    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        // An empty or comment-only file comes back from serde_yaml as null.
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| ParseError::new(e.to_string()))?;
        to_tree(yaml)
    }
}

/// Move a YAML value into the JSON data model, consuming it.
///
/// Tags are dropped. Scalar mapping keys become strings.
fn to_tree(yaml: serde_yaml::Value) -> Result<Value, ParseError> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(flag),
        Yaml::Number(number) => Value::Number(to_number(&number)?),
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => {
            Value::Array(items.into_iter().map(to_tree).collect::<Result<_, _>>()?)
        }
        Yaml::Mapping(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| -> Result<(String, Value), ParseError> {
                    Ok((to_key(key)?, to_tree(value)?))
                })
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Tagged(tagged) => to_tree(tagged.value)?,
    })
}

fn to_number(number: &serde_yaml::Number) -> Result<serde_json::Number, ParseError> {
    if let Some(int) = number.as_i64() {
        return Ok(int.into());
    }
    if let Some(uint) = number.as_u64() {
        return Ok(uint.into());
    }
    number
        .as_f64()
        .and_then(serde_json::Number::from_f64)
        .ok_or_else(|| ParseError::new(format!("number {number} has no JSON representation")))
}

fn to_key(key: serde_yaml::Value) -> Result<String, ParseError> {
    match key {
        serde_yaml::Value::String(text) => Ok(text),
        serde_yaml::Value::Number(number) => Ok(number.to_string()),
        serde_yaml::Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(ParseError::new(format!("mapping key {other:?} is not a scalar"))),
    }
}

/// A parsed source file and its directives.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: PathBuf,
    pub content: Value,
    pub directives: Vec<Directive>,
}

impl Document {
    /// Values of the directives with `key`, in document order.
    pub fn directive_values(&self, key: &str) -> Vec<&str> {
        directive_values(&self.directives, key)
    }
}

/// Reads files and turns them into [`Document`]s.
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader<P = YamlParser> {
    parser: P,
}

impl DocumentLoader<YamlParser> {
    pub fn yaml() -> Self {
        Self { parser: YamlParser }
    }
}

impl<P: DocumentParser> DocumentLoader<P> {
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// [`ScheyamlError::Io`] if the file cannot be read,
    /// [`ScheyamlError::MalformedDocument`] if the parser rejects it.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Document, ScheyamlError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScheyamlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "read document");
        self.parse(path, &text)
    }

    /// Parse in-memory `text` as if it had been read from `path`.
    pub fn parse(&self, path: impl Into<PathBuf>, text: &str) -> Result<Document, ScheyamlError> {
        let path = path.into();
        let content = self
            .parser
            .parse(text)
            .map_err(|e| ScheyamlError::MalformedDocument {
                path: path.clone(),
                reason: e.reason,
            })?;
        Ok(Document {
            path,
            content,
            directives: extract_directives(text),
        })
    }
}
