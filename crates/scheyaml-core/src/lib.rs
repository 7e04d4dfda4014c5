//! # scheyaml-core — Foundational Types for scheyaml
//!
//! Everything the schema compiler needs before a schema is ever inflated:
//!
//! - [`directive`] — extraction of `## key: value` comment directives from
//!   raw document text.
//! - [`document`] — loading a YAML file into a generic value tree paired
//!   with its directives, behind the [`DocumentParser`] seam.
//! - [`error`] — the single tagged error type shared by every crate in the
//!   workspace.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `scheyaml-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod directive;
pub mod document;
pub mod error;

// Re-export primary types for ergonomic imports.
pub use directive::{directive_values, extract_directives, Directive};
pub use document::{Document, DocumentLoader, DocumentParser, ParseError, YamlParser};
pub use error::ScheyamlError;

/// Directive key naming a schema document's identifier.
pub const ID_DIRECTIVE: &str = "id";

/// Directive key naming a schema a target document must satisfy.
pub const SCHEMA_DIRECTIVE: &str = "schema";
