//! # Validation Engine Seam
//!
//! The schema compiler delegates JSON-Schema evaluation to an external
//! engine. [`SchemaEngine`] compiles a canonical schema once;
//! [`CompiledSchema`] checks any number of instances against it and
//! reports every violation, never stopping at the first.
//!
//! ## `jsonschema` Backend
//!
//! [`JsonSchemaEngine`] compiles with the `jsonschema` crate (Draft 7 by
//! default). The canonical vocabulary has one type JSON Schema lacks:
//! `{type: enum, enum: [...]}`. Before compiling, every schema node whose
//! `type` is `"enum"` and which carries an `enum` array drops its `type`
//! key, leaving a plain `enum` constraint. Literal values under `enum` and
//! `const` are never rewritten.
//!
//! ## Cross-schema references
//!
//! A schema may `$ref` any other registered schema by its identifier
//! (`$ref: nums`). Without an `$id`, `jsonschema` resolves that to
//! `json-schema:///nums`; the last path segment is looked up in the
//! [`SchemaReferences`] handed to [`SchemaEngine::compile`]. Nothing is ever
//! fetched from the network or the filesystem.

use std::collections::HashMap;
use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Retrieve, Uri, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::inflate::ENUM_TYPE;

/// Keywords whose value is a single subschema or an array of subschemas.
const SUBSCHEMA_KEYWORDS: &[&str] = &[
    "items",
    "additionalItems",
    "additionalProperties",
    "contains",
    "propertyNames",
    "not",
    "if",
    "then",
    "else",
    "allOf",
    "anyOf",
    "oneOf",
];

/// Keywords whose value maps names to subschemas.
const SUBSCHEMA_MAP_KEYWORDS: &[&str] = &[
    "properties",
    "patternProperties",
    "definitions",
    "$defs",
    "dependencies",
];

/// One violation reported by a compiled schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredError {
    /// The schema keyword that failed (`type`, `required`, `enum`, ...).
    pub keyword: String,
    /// JSON Pointer to the violating value in the instance (`""` for the root).
    pub path: String,
    /// JSON Pointer fragment to the failing keyword in the schema.
    pub schema_path: String,
    /// Keyword-specific details.
    pub params: Value,
    pub message: String,
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.keyword, self.path, self.message)
    }
}

/// The engine refused to compile a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct CompileError {
    pub reason: String,
}

impl CompileError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A schema ready to check instances.
pub trait CompiledSchema: Send + Sync {
    /// Every violation of the schema by `instance`; empty when valid.
    fn check(&self, instance: &Value) -> Vec<StructuredError>;

    fn is_valid(&self, instance: &Value) -> bool {
        self.check(instance).is_empty()
    }
}

/// Canonical schemas addressable by identifier from `$ref`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaReferences {
    by_id: HashMap<String, Value>,
}

impl SchemaReferences {
    pub fn insert(&mut self, schema_id: impl Into<String>, canonical: Value) {
        self.by_id.insert(schema_id.into(), canonical);
    }

    pub fn get(&self, schema_id: &str) -> Option<&Value> {
        self.by_id.get(schema_id)
    }

    pub fn remove(&mut self, schema_id: &str) -> Option<Value> {
        self.by_id.remove(schema_id)
    }

    /// Keep only the identifiers for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.by_id.retain(|id, _| keep(id));
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.by_id.iter().map(|(id, schema)| (id.as_str(), schema))
    }
}

/// Compiles canonical schemas into [`CompiledSchema`]s.
pub trait SchemaEngine: Send + Sync {
    type Compiled: CompiledSchema;

    /// Compile `schema`. `$ref`s naming an identifier in `references`
    /// resolve to that schema.
    fn compile(
        &self,
        schema: &Value,
        references: &SchemaReferences,
    ) -> Result<Self::Compiled, CompileError>;
}

/// [`SchemaEngine`] backed by the `jsonschema` crate.
#[derive(Debug, Clone, Copy)]
pub struct JsonSchemaEngine {
    draft: Draft,
}

impl JsonSchemaEngine {
    pub fn with_draft(draft: Draft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> Draft {
        self.draft
    }
}

impl Default for JsonSchemaEngine {
    fn default() -> Self {
        Self::with_draft(Draft::Draft7)
    }
}

impl SchemaEngine for JsonSchemaEngine {
    type Compiled = JsonSchemaValidator;

    fn compile(
        &self,
        schema: &Value,
        references: &SchemaReferences,
    ) -> Result<JsonSchemaValidator, CompileError> {
        let lowered = lower_canonical(schema);

        let retriever = RegisteredSchemaRetriever {
            by_id: references
                .iter()
                .map(|(id, canonical)| (id.to_string(), lower_canonical(canonical)))
                .collect(),
        };

        let mut opts = jsonschema::options();
        opts.with_draft(self.draft);
        opts.with_retriever(retriever);
        let validator = opts
            .build(&lowered)
            .map_err(|e| CompileError::new(e.to_string()))?;

        Ok(JsonSchemaValidator {
            validator,
            schema: lowered,
        })
    }
}

/// Serves registered schemas to `jsonschema` when a `$ref` names one.
struct RegisteredSchemaRetriever {
    /// Lowered schemas by identifier.
    by_id: HashMap<String, Value>,
}

impl Retrieve for RegisteredSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri = uri.as_str();
        let schema_id = uri.trim_end_matches('/').rsplit('/').next().unwrap_or(uri);
        self.by_id
            .get(schema_id)
            .cloned()
            .ok_or_else(|| format!("no registered schema '{schema_id}' for '{uri}'").into())
    }
}

/// A schema compiled by [`JsonSchemaEngine`].
pub struct JsonSchemaValidator {
    validator: Validator,
    /// The lowered schema the validator was built from.
    schema: Value,
}

impl JsonSchemaValidator {
    /// The schema as handed to `jsonschema`, after enum lowering.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    fn structure(&self, error: &ValidationError<'_>) -> StructuredError {
        let schema_pointer = error.schema_path.to_string();
        let keyword = schema_pointer
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        let params = match &error.kind {
            ValidationErrorKind::Required { property } => json!({ "missingProperty": property }),
            ValidationErrorKind::Enum { options } => json!({ "allowedValues": options }),
            _ => {
                let mut params = Map::new();
                if let Some(value) = self.schema.pointer(&schema_pointer) {
                    params.insert(keyword.clone(), value.clone());
                }
                Value::Object(params)
            }
        };

        StructuredError {
            keyword,
            path: error.instance_path.to_string(),
            schema_path: format!("#{schema_pointer}"),
            params,
            message: error.to_string(),
        }
    }
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl CompiledSchema for JsonSchemaValidator {
    fn check(&self, instance: &Value) -> Vec<StructuredError> {
        self.validator
            .iter_errors(instance)
            .map(|e| self.structure(&e))
            .collect()
    }

    fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

/// Rewrite the canonical `{type: enum}` pseudo type into plain JSON Schema.
fn lower_canonical(schema: &Value) -> Value {
    let mut lowered = schema.clone();
    lower_node(&mut lowered);
    lowered
}

fn lower_node(node: &mut Value) {
    let Some(obj) = node.as_object_mut() else {
        return;
    };

    let is_enum_type = obj.get("type").and_then(Value::as_str) == Some(ENUM_TYPE)
        && obj.get("enum").is_some_and(Value::is_array);
    if is_enum_type {
        obj.remove("type");
    }

    for keyword in SUBSCHEMA_KEYWORDS {
        match obj.get_mut(*keyword) {
            Some(Value::Array(variants)) => variants.iter_mut().for_each(lower_node),
            Some(child) => lower_node(child),
            None => {}
        }
    }

    for keyword in SUBSCHEMA_MAP_KEYWORDS {
        if let Some(Value::Object(children)) = obj.get_mut(*keyword) {
            children.values_mut().for_each(lower_node);
        }
    }
}
