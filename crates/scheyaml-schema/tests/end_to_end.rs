//! Integration tests: schema and target files on disk, registered and
//! validated through the public API.

use std::path::{Path, PathBuf};

use scheyaml_core::ScheyamlError;
use scheyaml_schema::{SchemaLoadOutcome, SchemaRegistry};

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_type_failure_reports_field_and_keyword() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "nums.schema.yml", "## id: nums\ncount: number\n");
    let target = write(dir.path(), "target.yml", "## schema: nums\ncount: bad\n");

    let mut registry = SchemaRegistry::new();
    assert_eq!(registry.register(&schema).unwrap(), "nums");

    let result = registry.validator().validate(&target).unwrap();
    assert!(!result.is_valid);
    assert!(result.passes.is_empty());
    assert_eq!(result.failures.len(), 1);

    let failure = &result.failures[0];
    assert_eq!(failure.schema_id, "nums");
    assert_eq!(failure.errors.len(), 1);
    assert_eq!(failure.errors[0].keyword, "type");
    assert!(failure.errors[0].path.contains("count"));
}

#[test]
fn test_unknown_reference_carries_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let target = write(dir.path(), "target.yml", "## schema: missing\nname: x\n");

    let registry = SchemaRegistry::new();
    let err = registry.validator().validate(&target).unwrap_err();
    match err {
        ScheyamlError::UnknownSchemaReference { schema_id, path } => {
            assert_eq!(schema_id, "missing");
            assert_eq!(path, target);
        }
        other => panic!("Expected UnknownSchemaReference, got: {other}"),
    }
}

#[test]
fn test_load_records_outcomes_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "a.schema.yml", "## id: alpha\nname: string\n");
    let no_id = write(dir.path(), "b.schema.yml", "name: string\n");
    let two_ids = write(dir.path(), "c.schema.yml", "## id: a\n## id: b\nname: string\n");
    let duplicate = write(dir.path(), "d.schema.yml", "## id: alpha\nother: number\n");
    let also_good = write(dir.path(), "e.schema.yml", "## id: epsilon\ntags: string[]\n");

    let mut registry = SchemaRegistry::new();
    let loaded = registry
        .load([&good, &no_id, &two_ids, &duplicate, &also_good])
        .unwrap();
    assert_eq!(loaded, 2);
    assert_eq!(registry.schema_ids(), vec!["alpha", "epsilon"]);

    let outcomes = registry.outcomes();
    assert_eq!(outcomes.len(), 5);
    assert!(outcomes[0].is_loaded());
    assert!(matches!(
        &outcomes[1],
        SchemaLoadOutcome::Skipped(ScheyamlError::DirectiveCardinality { found: 0, .. })
    ));
    assert!(matches!(
        &outcomes[2],
        SchemaLoadOutcome::Skipped(ScheyamlError::DirectiveCardinality { found: 2, .. })
    ));
    assert!(matches!(
        &outcomes[3],
        SchemaLoadOutcome::Skipped(ScheyamlError::DuplicateSchemaId { .. })
    ));
    assert!(outcomes[4].is_loaded());

    let paths: Vec<&Path> = outcomes.iter().map(SchemaLoadOutcome::path).collect();
    assert_eq!(
        paths,
        vec![
            good.as_path(),
            no_id.as_path(),
            two_ids.as_path(),
            duplicate.as_path(),
            also_good.as_path()
        ]
    );
}

#[test]
fn test_load_stops_on_malformed_schema() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "a.schema.yml", "## id: alpha\nname: string\n");
    let broken = write(
        dir.path(),
        "b.schema.yml",
        "## id: beta\ntest:\n  nested: value\n  bad",
    );
    let never = write(dir.path(), "c.schema.yml", "## id: gamma\nname: string\n");

    let mut registry = SchemaRegistry::new();
    let err = registry.load([&good, &broken, &never]).unwrap_err();
    assert!(
        matches!(err, ScheyamlError::MalformedDocument { .. }),
        "Expected MalformedDocument, got: {err}"
    );
    assert_eq!(err.path(), broken.as_path());
    assert_eq!(registry.outcomes().len(), 1);
    assert!(!registry.contains("gamma"));
}

#[test]
fn test_from_paths_and_nested_shorthand() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(
        dir.path(),
        "service.schema.yml",
        "## id: service\n\
         name: string\n\
         replicas: number\n\
         env: [dev, staging, prod]\n\
         ports: number[]\n\
         owner:\n  team: string\n  oncall: boolean\n",
    );
    let good = write(
        dir.path(),
        "good.yml",
        "## schema: service\n\
         name: api\n\
         replicas: 3\n\
         env: prod\n\
         ports: [80, 443]\n\
         owner:\n  team: platform\n  oncall: true\n",
    );
    let bad = write(
        dir.path(),
        "bad.yml",
        "## schema: service\n\
         name: api\n\
         replicas: 3\n\
         env: qa\n\
         ports: [80, http]\n\
         owner:\n  team: platform\n",
    );

    let registry = SchemaRegistry::from_paths([&schema]).unwrap();
    let engine = registry.validator();

    let result = engine.validate(&good).unwrap();
    assert!(result.is_valid, "unexpected failures: {:?}", result.failures);

    let result = engine.validate(&bad).unwrap();
    assert!(!result.is_valid);
    let mut paths: Vec<&str> = result.failures[0]
        .errors
        .iter()
        .map(|e| e.path.as_str())
        .collect();
    paths.sort_unstable();
    assert_eq!(paths, vec!["/env", "/owner", "/ports/1"]);
}

#[test]
fn test_full_schema_escape_hatch_allows_optional_fields() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(
        dir.path(),
        "loose.schema.yml",
        "## id: loose\n\
         type: object\n\
         properties:\n  nickname:\n    type: string\n",
    );
    let target = write(dir.path(), "target.yml", "## schema: loose\nother: 1\n");

    let registry = SchemaRegistry::from_paths([&schema]).unwrap();
    let result = registry.validator().validate(&target).unwrap();
    assert!(result.is_valid);
}

#[test]
fn test_target_load_errors_propagate() {
    let dir = tempfile::tempdir().unwrap();
    let target = write(dir.path(), "broken.yml", "## schema: x\na:\n  b: c\n  bad");

    let registry = SchemaRegistry::new();
    let err = registry.validator().validate(&target).unwrap_err();
    assert!(matches!(err, ScheyamlError::MalformedDocument { .. }));
    assert!(!err.is_recoverable());

    let missing = dir.path().join("missing.yml");
    let err = registry.validator().validate(&missing).unwrap_err();
    assert!(matches!(err, ScheyamlError::Io { .. }));
}

#[test]
fn test_load_resolves_refs_to_later_files() {
    let dir = tempfile::tempdir().unwrap();
    let wrap = write(
        dir.path(),
        "a_wrap.schema.yml",
        "## id: wrap\ntype: object\nproperties:\n  inner:\n    $ref: nums\nrequired: [inner]\n",
    );
    let nums = write(dir.path(), "b_nums.schema.yml", "## id: nums\ncount: number\n");
    let target = write(dir.path(), "target.yml", "## schema: wrap\ninner:\n  count: bad\n");

    let registry = SchemaRegistry::from_paths([&wrap, &nums]).unwrap();
    assert_eq!(registry.schema_ids(), vec!["nums", "wrap"]);

    let result = registry.validator().validate(&target).unwrap();
    assert!(!result.is_valid);
    let errors = &result.failures[0].errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].keyword, "type");
    assert_eq!(errors[0].path, "/inner/count");
}

#[test]
fn test_load_failing_ref_keeps_earlier_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "a.schema.yml", "## id: alpha\nname: string\n");
    let dangling = write(
        dir.path(),
        "b.schema.yml",
        "## id: beta\ntype: object\nproperties:\n  x:\n    $ref: ghost\n",
    );
    let after = write(dir.path(), "c.schema.yml", "## id: gamma\nname: string\n");

    let mut registry = SchemaRegistry::new();
    let err = registry.load([&good, &dangling, &after]).unwrap_err();
    assert!(
        matches!(&err, ScheyamlError::SchemaCompile { schema_id, .. } if schema_id == "beta"),
        "Expected SchemaCompile, got: {err}"
    );
    assert_eq!(registry.schema_ids(), vec!["alpha"]);
    assert_eq!(registry.outcomes().len(), 1);
}
