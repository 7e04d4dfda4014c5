//! # scheyaml-schema — Schema Compiler & Validation
//!
//! Turns schema documents into compiled validators and checks target
//! documents against the schemas they declare.
//!
//! ## Pipeline
//!
//! 1. [`inflate`] expands the shorthand notation (`"string"`, `"number[]"`,
//!    `[a, b]`, nested mappings) into a canonical schema tree.
//! 2. [`SchemaRegistry`] loads schema documents, requires exactly one
//!    `## id: <schemaid>` directive per file, inflates the content and
//!    compiles it through a [`SchemaEngine`].
//! 3. [`ValidationEngine`] reads a target's `## schema: <schemaid>`
//!    directives and runs every declared schema against its content.
//!
//! ## Engine Seam
//!
//! JSON-Schema evaluation is not implemented here. [`SchemaEngine`] and
//! [`CompiledSchema`] describe what the compiler needs from an evaluator;
//! [`JsonSchemaEngine`] satisfies them with the `jsonschema` crate. Schemas
//! can `$ref` one another by identifier through [`SchemaReferences`].

pub mod engine;
pub mod inflate;
pub mod registry;
pub mod validate;

// Re-export primary types for ergonomic imports.
pub use engine::{
    CompileError, CompiledSchema, JsonSchemaEngine, SchemaEngine, SchemaReferences, StructuredError,
};
pub use inflate::{inflate, ENUM_TYPE, PRIMITIVE_TYPES};
pub use registry::{RegisteredSchema, SchemaLoadOutcome, SchemaRegistry};
pub use validate::{SchemaFailure, SchemaPass, ValidationEngine, ValidationResult};
