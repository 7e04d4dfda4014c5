//! # Schema Registry
//!
//! Maps schema identifiers to compiled validators.
//!
//! A schema document declares its identifier with exactly one directive:
//!
//! ```text
//! ## id: person
//! name: string
//! age: number
//! ```
//!
//! Zero or several `id` directives raise
//! [`ScheyamlError::DirectiveCardinality`]. Registering an identifier that
//! is already taken raises [`ScheyamlError::DuplicateSchemaId`] and keeps
//! the first registration. Both are confined to the offending file:
//! [`SchemaRegistry::load`] records them as skipped and carries on, while
//! any other failure ends the load.
//!
//! Registered schemas can reference each other by identifier with `$ref`.
//!
//! The registry is built to completion before validation starts; the
//! [`ValidationEngine`] only ever borrows it immutably.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use scheyaml_core::{Document, DocumentLoader, DocumentParser, ScheyamlError, YamlParser, ID_DIRECTIVE};

use crate::engine::{JsonSchemaEngine, SchemaEngine, SchemaReferences};
use crate::inflate::inflate;
use crate::validate::ValidationEngine;

/// A schema accepted into the registry.
#[derive(Debug)]
pub struct RegisteredSchema<C> {
    pub id: String,
    /// The schema document it was loaded from.
    pub path: PathBuf,
    /// The inflated schema tree.
    pub canonical: Value,
    pub compiled: C,
}

/// What happened to one schema file during [`SchemaRegistry::load`].
#[derive(Debug)]
pub enum SchemaLoadOutcome {
    Loaded { schema_id: String, path: PathBuf },
    /// The file was rejected with a recoverable error.
    Skipped(ScheyamlError),
}

impl SchemaLoadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Loaded { path, .. } => path,
            Self::Skipped(error) => error.path(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Registry of compiled schemas keyed by identifier.
pub struct SchemaRegistry<E: SchemaEngine = JsonSchemaEngine, P = YamlParser> {
    engine: E,
    loader: DocumentLoader<P>,
    schemas: HashMap<String, RegisteredSchema<E::Compiled>>,
    /// Canonical trees of registered schemas, for `$ref` resolution.
    references: SchemaReferences,
    outcomes: Vec<SchemaLoadOutcome>,
}

/// A schema document that passed the directive checks and was inflated.
#[derive(Debug)]
struct StagedSchema {
    id: String,
    path: PathBuf,
    canonical: Value,
}

impl SchemaRegistry {
    /// An empty registry using `jsonschema` and the YAML parser.
    pub fn new() -> Self {
        Self::with_engine(JsonSchemaEngine::default(), DocumentLoader::yaml())
    }

    /// Build a registry from schema files in one step.
    ///
    /// # Errors
    ///
    /// Returns the first non-recoverable error; recoverable ones are
    /// available from [`SchemaRegistry::outcomes`].
    pub fn from_paths<I, Q>(paths: I) -> Result<Self, ScheyamlError>
    where
        I: IntoIterator<Item = Q>,
        Q: AsRef<Path>,
    {
        let mut registry = Self::new();
        registry.load(paths)?;
        Ok(registry)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SchemaEngine, P: DocumentParser> SchemaRegistry<E, P> {
    pub fn with_engine(engine: E, loader: DocumentLoader<P>) -> Self {
        Self {
            engine,
            loader,
            schemas: HashMap::new(),
            references: SchemaReferences::default(),
            outcomes: Vec::new(),
        }
    }

    /// Load, inflate, compile and register the schema document at `path`.
    ///
    /// Returns the schema identifier.
    ///
    /// # Errors
    ///
    /// - [`ScheyamlError::Io`] / [`ScheyamlError::MalformedDocument`] from loading.
    /// - [`ScheyamlError::DirectiveCardinality`] unless exactly one `id` directive is present.
    /// - [`ScheyamlError::DuplicateSchemaId`] if the identifier is taken.
    /// - [`ScheyamlError::SchemaCompile`] if the engine rejects the inflated schema,
    ///   including a `$ref` to an identifier that is not registered yet.
    pub fn register(&mut self, path: impl AsRef<Path>) -> Result<String, ScheyamlError> {
        let document = self.loader.load(path)?;
        self.register_document(document)
    }

    /// Register an already loaded schema document.
    pub fn register_document(&mut self, document: Document) -> Result<String, ScheyamlError> {
        let staged = self.stage(document, &[])?;
        self.references.insert(staged.id.clone(), staged.canonical.clone());
        self.commit(staged)
    }

    /// Register every schema file in order, recording one outcome per file.
    ///
    /// All files are read and inflated before any is compiled, so a schema
    /// may `$ref` one that appears later in `paths`.
    ///
    /// Recoverable errors are logged and recorded as
    /// [`SchemaLoadOutcome::Skipped`]. Returns how many schemas this call
    /// registered.
    ///
    /// # Errors
    ///
    /// Stops at the first non-recoverable error. Outcomes of the files
    /// before it stay available; the failing file and those after it have none.
    pub fn load<I, Q>(&mut self, paths: I) -> Result<usize, ScheyamlError>
    where
        I: IntoIterator<Item = Q>,
        Q: AsRef<Path>,
    {
        let mut staged: Vec<Result<StagedSchema, ScheyamlError>> = Vec::new();
        let mut fatal = None;
        for path in paths {
            let result = self.loader.load(path).and_then(|document| {
                let pending: Vec<&StagedSchema> = staged.iter().flatten().collect();
                self.stage(document, &pending)
            });
            match result {
                Err(error) if !error.is_recoverable() => {
                    fatal = Some(error);
                    break;
                }
                other => staged.push(other),
            }
        }

        for schema in staged.iter().flatten() {
            self.references.insert(schema.id.clone(), schema.canonical.clone());
        }

        let mut loaded = 0;
        for entry in staged {
            match entry {
                Ok(schema) => {
                    let path = schema.path.clone();
                    match self.commit(schema) {
                        Ok(schema_id) => {
                            loaded += 1;
                            self.outcomes.push(SchemaLoadOutcome::Loaded { schema_id, path });
                        }
                        Err(error) => {
                            fatal = Some(error);
                            break;
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(path = %error.path().display(), "skipping schema file: {error}");
                    self.outcomes.push(SchemaLoadOutcome::Skipped(error));
                }
            }
        }

        match fatal {
            Some(error) => {
                // Identifiers staged but never compiled must not stay resolvable.
                let schemas = &self.schemas;
                self.references.retain(|id| schemas.contains_key(id));
                Err(error)
            }
            None => Ok(loaded),
        }
    }

    /// Check the directives of `document` and inflate it. `pending` holds
    /// schemas accepted earlier in the same load but not compiled yet.
    fn stage(
        &self,
        document: Document,
        pending: &[&StagedSchema],
    ) -> Result<StagedSchema, ScheyamlError> {
        let schema_id = match document.directive_values(ID_DIRECTIVE).as_slice() {
            [id] => (*id).to_string(),
            ids => return Err(ScheyamlError::id_cardinality(&document.path, ids.len())),
        };

        let first_path = self
            .schemas
            .get(&schema_id)
            .map(|existing| existing.path.clone())
            .or_else(|| {
                pending
                    .iter()
                    .find(|staged| staged.id == schema_id)
                    .map(|staged| staged.path.clone())
            });
        if let Some(first_path) = first_path {
            return Err(ScheyamlError::DuplicateSchemaId {
                schema_id,
                path: document.path,
                first_path,
            });
        }

        Ok(StagedSchema {
            canonical: inflate(&document.content),
            id: schema_id,
            path: document.path,
        })
    }

    /// Compile a staged schema against the current references and insert it.
    fn commit(&mut self, staged: StagedSchema) -> Result<String, ScheyamlError> {
        let StagedSchema { id, path, canonical } = staged;
        let compiled = match self.engine.compile(&canonical, &self.references) {
            Ok(compiled) => compiled,
            Err(e) => {
                self.references.remove(&id);
                return Err(ScheyamlError::SchemaCompile {
                    schema_id: id,
                    path,
                    reason: e.reason,
                });
            }
        };

        tracing::debug!(schema_id = %id, path = %path.display(), "registered schema");

        self.schemas.insert(
            id.clone(),
            RegisteredSchema {
                id: id.clone(),
                path,
                canonical,
                compiled,
            },
        );
        Ok(id)
    }

    pub fn get(&self, schema_id: &str) -> Option<&RegisteredSchema<E::Compiled>> {
        self.schemas.get(schema_id)
    }

    pub fn contains(&self, schema_id: &str) -> bool {
        self.schemas.contains_key(schema_id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered identifiers, sorted alphabetically.
    pub fn schema_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Outcomes of every [`SchemaRegistry::load`] call so far, in file order.
    pub fn outcomes(&self) -> &[SchemaLoadOutcome] {
        &self.outcomes
    }

    pub fn loader(&self) -> &DocumentLoader<P> {
        &self.loader
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// A validation engine reading from this registry.
    pub fn validator(&self) -> ValidationEngine<'_, E, P> {
        ValidationEngine::new(self)
    }
}

impl<E: SchemaEngine, P> fmt::Debug for SchemaRegistry<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.schemas.keys().collect();
        ids.sort_unstable();
        f.debug_struct("SchemaRegistry")
            .field("schemas", &ids)
            .field("outcomes", &self.outcomes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CompiledSchema;
    use serde_json::json;

    fn schema_doc(path: &str, text: &str) -> Document {
        DocumentLoader::yaml().parse(path, text).unwrap()
    }

    #[test]
    fn test_register_document_returns_id() {
        let mut registry = SchemaRegistry::new();
        let id = registry
            .register_document(schema_doc("schema.yml", "## id: testid\ntest: string\n"))
            .unwrap();
        assert_eq!(id, "testid");
        assert!(registry.contains("testid"));
        assert_eq!(registry.len(), 1);

        let registered = registry.get("testid").unwrap();
        assert_eq!(registered.path, PathBuf::from("schema.yml"));
        assert_eq!(
            registered.canonical,
            json!({
                "type": "object",
                "properties": {"test": {"type": "string"}},
                "required": ["test"]
            })
        );
    }

    #[test]
    fn test_missing_id_is_cardinality_error() {
        let mut registry = SchemaRegistry::new();
        let err = registry
            .register_document(schema_doc("schema.yml", "test: string\n"))
            .unwrap_err();
        assert!(
            matches!(err, ScheyamlError::DirectiveCardinality { found: 0, .. }),
            "Expected DirectiveCardinality, got: {err}"
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_multiple_ids_is_cardinality_error() {
        let mut registry = SchemaRegistry::new();
        let err = registry
            .register_document(schema_doc("schema.yml", "## id: a\n## id: b\ntest: string\n"))
            .unwrap_err();
        assert!(
            matches!(err, ScheyamlError::DirectiveCardinality { found: 2, .. }),
            "Expected DirectiveCardinality, got: {err}"
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected_first_kept() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_document(schema_doc("first.yml", "## id: dup\na: string\n"))
            .unwrap();
        let err = registry
            .register_document(schema_doc("second.yml", "## id: dup\nb: number\n"))
            .unwrap_err();
        match err {
            ScheyamlError::DuplicateSchemaId {
                schema_id,
                path,
                first_path,
            } => {
                assert_eq!(schema_id, "dup");
                assert_eq!(path, PathBuf::from("second.yml"));
                assert_eq!(first_path, PathBuf::from("first.yml"));
            }
            other => panic!("Expected DuplicateSchemaId, got: {other}"),
        }
        assert_eq!(registry.get("dup").unwrap().path, PathBuf::from("first.yml"));
    }

    #[test]
    fn test_invalid_full_schema_fails_to_compile() {
        let mut registry = SchemaRegistry::new();
        let err = registry
            .register_document(schema_doc("bad.yml", "## id: bad\ntype: nonsense\n"))
            .unwrap_err();
        match &err {
            ScheyamlError::SchemaCompile { schema_id, .. } => assert_eq!(schema_id, "bad"),
            other => panic!("Expected SchemaCompile, got: {other}"),
        }
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_full_schema_refs_registered_schema() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_document(schema_doc("nums.yml", "## id: nums\ncount: number\n"))
            .unwrap();
        registry
            .register_document(schema_doc(
                "wrap.yml",
                "## id: wrap\ntype: object\nproperties:\n  inner:\n    $ref: nums\n",
            ))
            .unwrap();

        let wrap = &registry.get("wrap").unwrap().compiled;
        assert!(wrap.is_valid(&json!({"inner": {"count": 3}})));

        let errors = wrap.check(&json!({"inner": {"count": "bad"}}));
        assert_eq!(errors.len(), 1, "errors: {errors:?}");
        assert_eq!(errors[0].keyword, "type");
        assert_eq!(errors[0].path, "/inner/count");
    }

    #[test]
    fn test_ref_to_unregistered_id_is_compile_error() {
        let mut registry = SchemaRegistry::new();
        let err = registry
            .register_document(schema_doc(
                "wrap.yml",
                "## id: wrap\ntype: object\nproperties:\n  inner:\n    $ref: later\n",
            ))
            .unwrap_err();
        assert!(
            matches!(&err, ScheyamlError::SchemaCompile { schema_id, .. } if schema_id == "wrap"),
            "Expected SchemaCompile, got: {err}"
        );
        assert!(registry.is_empty());

        // A failed registration leaves nothing behind to reference.
        let err = registry
            .register_document(schema_doc(
                "user.yml",
                "## id: user\ntype: object\nproperties:\n  w:\n    $ref: wrap\n",
            ))
            .unwrap_err();
        assert!(matches!(err, ScheyamlError::SchemaCompile { .. }));
    }

    #[test]
    fn test_unknown_shorthand_name_compiles_as_enum() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_document(schema_doc("schema.yml", "## id: testid\ntest: badtype\n"))
            .unwrap();
        assert_eq!(
            registry.get("testid").unwrap().canonical["properties"]["test"],
            json!({"type": "enum", "enum": ["badtype"]})
        );
    }

    #[test]
    fn test_schema_ids_sorted() {
        let mut registry = SchemaRegistry::new();
        for (path, id) in [("b.yml", "beta"), ("a.yml", "alpha"), ("c.yml", "gamma")] {
            registry
                .register_document(schema_doc(path, &format!("## id: {id}\nx: string\n")))
                .unwrap();
        }
        assert_eq!(registry.schema_ids(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_debug_lists_ids() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_document(schema_doc("a.yml", "## id: alpha\nx: string\n"))
            .unwrap();
        let debug = format!("{registry:?}");
        assert!(debug.contains("alpha"));
    }
}
