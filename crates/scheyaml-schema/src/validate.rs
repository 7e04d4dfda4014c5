//! # Directive-Driven Validation
//!
//! A target document names the schemas it must satisfy:
//!
//! ```text
//! ## schema: person
//! ## schema: audited
//! name: Ada
//! age: 36
//! ```
//!
//! Each declared schema is checked in declaration order. A target may pass
//! some schemas and fail others in the same run; every failure keeps the
//! full list of errors reported for that schema.
//!
//! Two conditions abort validation of the target as a whole:
//! no `schema` directive at all ([`ScheyamlError::NoSchemaDeclared`]) and a
//! directive naming an unregistered schema
//! ([`ScheyamlError::UnknownSchemaReference`]).

use std::path::Path;

use serde::{Deserialize, Serialize};

use scheyaml_core::{Document, DocumentParser, ScheyamlError, YamlParser, SCHEMA_DIRECTIVE};

use crate::engine::{CompiledSchema, JsonSchemaEngine, SchemaEngine, StructuredError};
use crate::registry::SchemaRegistry;

/// A declared schema the target satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaPass {
    pub schema_id: String,
}

/// A declared schema the target violated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFailure {
    pub schema_id: String,
    pub errors: Vec<StructuredError>,
}

/// Outcome of validating one target against all of its declared schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub passes: Vec<SchemaPass>,
    pub failures: Vec<SchemaFailure>,
}

impl ValidationResult {
    /// Total number of structured errors across all failures.
    pub fn error_count(&self) -> usize {
        self.failures.iter().map(|f| f.errors.len()).sum()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            is_valid: true,
            passes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Validates target documents against a frozen [`SchemaRegistry`].
#[derive(Debug)]
pub struct ValidationEngine<'r, E: SchemaEngine = JsonSchemaEngine, P = YamlParser> {
    registry: &'r SchemaRegistry<E, P>,
}

impl<'r, E: SchemaEngine, P: DocumentParser> ValidationEngine<'r, E, P> {
    pub fn new(registry: &'r SchemaRegistry<E, P>) -> Self {
        Self { registry }
    }

    /// Load the target at `path` and validate it.
    ///
    /// # Errors
    ///
    /// - [`ScheyamlError::Io`] / [`ScheyamlError::MalformedDocument`] from loading.
    /// - [`ScheyamlError::NoSchemaDeclared`] if the target has no `schema` directive.
    /// - [`ScheyamlError::UnknownSchemaReference`] for the first unregistered identifier.
    pub fn validate(&self, path: impl AsRef<Path>) -> Result<ValidationResult, ScheyamlError> {
        let document = self.registry.loader().load(path)?;
        self.validate_document(&document)
    }

    /// Validate an already loaded target document.
    pub fn validate_document(&self, document: &Document) -> Result<ValidationResult, ScheyamlError> {
        let schema_ids = document.directive_values(SCHEMA_DIRECTIVE);
        if schema_ids.is_empty() {
            return Err(ScheyamlError::NoSchemaDeclared {
                path: document.path.clone(),
            });
        }

        let mut result = ValidationResult::default();
        for schema_id in schema_ids {
            let schema =
                self.registry
                    .get(schema_id)
                    .ok_or_else(|| ScheyamlError::UnknownSchemaReference {
                        path: document.path.clone(),
                        schema_id: schema_id.to_string(),
                    })?;

            let errors = schema.compiled.check(&document.content);
            if errors.is_empty() {
                result.passes.push(SchemaPass {
                    schema_id: schema_id.to_string(),
                });
            } else {
                result.is_valid = false;
                result.failures.push(SchemaFailure {
                    schema_id: schema_id.to_string(),
                    errors,
                });
            }
        }

        tracing::debug!(
            path = %document.path.display(),
            passed = result.passes.len(),
            failed = result.failures.len(),
            "validated target"
        );
        Ok(result)
    }
}
