//! # Error Types
//!
//! A single tagged error type for the whole workspace. Callers decide what
//! to do with a failure by matching on the variant, never by inspecting
//! message text.
//!
//! ## Recoverability
//!
//! | Variant                  | Scope of failure          |
//! |--------------------------|---------------------------|
//! | `Io`                     | fatal                     |
//! | `MalformedDocument`      | fatal                     |
//! | `DirectiveCardinality`   | one schema file           |
//! | `DuplicateSchemaId`      | one schema file           |
//! | `NoSchemaDeclared`       | one target file           |
//! | `UnknownSchemaReference` | one target file           |
//! | `SchemaCompile`          | fatal (authoring bug)     |

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for scheyaml.
#[derive(Error, Debug)]
pub enum ScheyamlError {
    /// The file could not be read.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document parser rejected the file's text.
    #[error("malformed document '{}': {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    /// A schema document has zero or several `id` directives.
    #[error("{message}")]
    DirectiveCardinality {
        path: PathBuf,
        /// The directive key whose count was wrong.
        key: String,
        /// How many directives with that key were found.
        found: usize,
        message: String,
    },

    /// A schema identifier is already registered by another file.
    #[error(
        "File '{}' declares schema ID '{schema_id}', already registered from '{}'",
        path.display(),
        first_path.display()
    )]
    DuplicateSchemaId {
        schema_id: String,
        path: PathBuf,
        first_path: PathBuf,
    },

    /// A target document carries no `schema` directive.
    #[error("File '{}' contains no schema directives!", path.display())]
    NoSchemaDeclared { path: PathBuf },

    /// A target document names a schema that was never registered.
    #[error("File '{}' declares an unknown schema '{schema_id}'!", path.display())]
    UnknownSchemaReference { path: PathBuf, schema_id: String },

    /// The inflated schema was rejected by the validation engine.
    #[error("schema '{schema_id}' from '{}' failed to compile: {reason}", path.display())]
    SchemaCompile {
        schema_id: String,
        path: PathBuf,
        reason: String,
    },
}

impl ScheyamlError {
    /// Whether the failure is confined to a single file, so a batch run may
    /// report it and continue with the remaining files.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::DirectiveCardinality { .. }
            | Self::DuplicateSchemaId { .. }
            | Self::NoSchemaDeclared { .. }
            | Self::UnknownSchemaReference { .. } => true,
            Self::Io { .. } | Self::MalformedDocument { .. } | Self::SchemaCompile { .. } => false,
        }
    }

    /// The file the error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. }
            | Self::MalformedDocument { path, .. }
            | Self::DirectiveCardinality { path, .. }
            | Self::DuplicateSchemaId { path, .. }
            | Self::NoSchemaDeclared { path }
            | Self::UnknownSchemaReference { path, .. }
            | Self::SchemaCompile { path, .. } => path,
        }
    }

    /// Build the cardinality error for a schema document's `id` directives.
    pub fn id_cardinality(path: impl Into<PathBuf>, found: usize) -> Self {
        let path = path.into();
        let message = if found == 0 {
            format!(
                "File '{}' does not contain a schema ID directive! ('## id: <schemaid>')",
                path.display()
            )
        } else {
            format!(
                "File '{}' contains multiple schema ID directives! ('## id: <schemaid>')",
                path.display()
            )
        };
        Self::DirectiveCardinality {
            path,
            key: crate::ID_DIRECTIVE.to_string(),
            found,
            message,
        }
    }
}
