//! # Validation Run
//!
//! One invocation of the tool, start to finish:
//!
//! 1. Glob schema files (minus excludes) and register them. Directive and
//!    duplicate-identifier problems print a warning and the run continues;
//!    any other schema failure prints a failure line and aborts.
//! 2. Unless `--schemas-only`, glob targets (minus schemas and excludes)
//!    and validate each one against its declared schemas.
//! 3. Print the error details of every failed schema and a summary line.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use scheyaml_core::ScheyamlError;
use scheyaml_schema::{SchemaLoadOutcome, SchemaRegistry, StructuredError};

use crate::config::ScheyamlConfig;
use crate::discover::{difference, glob_files};
use crate::{report, EXIT_FAILED, EXIT_OK, VERSION};

/// Arguments for a validation run.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Add a glob pattern for validation targets.
    #[arg(short = 't', long = "targets", value_name = "GLOB")]
    pub targets: Vec<String>,

    /// Add a glob pattern for schemas.
    #[arg(short = 's', long = "schemas", value_name = "GLOB")]
    pub schemas: Vec<String>,

    /// Add a glob pattern to exclude from schemas and targets.
    #[arg(short = 'e', long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Only load and check the schemas.
    #[arg(long)]
    pub schemas_only: bool,

    /// Path to a YAML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Defaults, then the config file, then these flags.
    pub fn resolve_config(&self) -> Result<ScheyamlConfig> {
        let mut config = match &self.config {
            Some(path) => ScheyamlConfig::from_file(path)?,
            None => ScheyamlConfig::default(),
        };
        config.apply_overrides(&self.schemas, &self.targets, &self.exclude, self.schemas_only);
        tracing::debug!(?config, "resolved configuration");
        Ok(config)
    }
}

/// One failed schema of one target, kept for the details section.
#[derive(Debug, Clone)]
struct FailureDetail {
    file: PathBuf,
    schema_id: String,
    errors: Vec<StructuredError>,
}

/// Counts gathered during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub schemas_loaded: usize,
    pub schemas_skipped: usize,
    pub targets: usize,
    /// Passed (target, schema) pairs.
    pub passed: usize,
    /// Failed (target, schema) pairs.
    pub failed: usize,
    /// Structured errors across all failed pairs.
    pub errors: usize,
    /// Targets that declared no schema.
    pub undeclared: usize,
    /// Targets that referenced an unregistered schema.
    pub unknown_references: usize,
    /// Targets that could not be read or parsed.
    pub load_errors: usize,
}

impl RunReport {
    pub fn exit_code(&self) -> u8 {
        if self.failed > 0 || self.load_errors > 0 {
            EXIT_FAILED
        } else {
            EXIT_OK
        }
    }
}

/// Execute a run with `config`, writing the report to `out`.
///
/// # Errors
///
/// Invalid glob patterns, schema files that fail to load or compile, and
/// write failures on `out`.
pub fn run_scheyaml<W: Write>(config: &ScheyamlConfig, out: &mut W) -> Result<RunReport> {
    let mut run = RunReport::default();

    writeln!(out, "{}", report::banner(VERSION))?;
    writeln!(out)?;

    let excluded = glob_files(&config.exclude_patterns)?;
    if !excluded.is_empty() {
        tracing::info!(count = excluded.len(), "excluding files");
    }

    let schema_paths = difference(glob_files(&config.schema_patterns)?, &excluded);
    writeln!(out, "Globbing schemas... {}", report::found(schema_paths.len(), "schemas"))?;
    writeln!(out)?;

    let mut registry = SchemaRegistry::new();
    let loaded = registry.load(&schema_paths);
    for outcome in registry.outcomes() {
        match outcome {
            SchemaLoadOutcome::Loaded { schema_id, path } => {
                writeln!(out, "{}", report::load_schema_ok(schema_id, path))?;
            }
            SchemaLoadOutcome::Skipped(error) => {
                writeln!(
                    out,
                    "{}",
                    report::load_schema_directive_error(error.path(), &error.to_string())
                )?;
            }
        }
    }
    if let Err(error) = loaded {
        writeln!(out, "{}", report::load_schema_fail(error.path()))?;
        return Err(error).context("schema loading aborted");
    }
    run.schemas_loaded = registry.len();
    run.schemas_skipped = registry.outcomes().len() - registry.len();
    writeln!(out)?;

    if !config.schemas_only {
        validate_targets(config, &registry, &schema_paths, &excluded, &mut run, out)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", report::done())?;
    Ok(run)
}

fn validate_targets<W: Write>(
    config: &ScheyamlConfig,
    registry: &SchemaRegistry,
    schema_paths: &[PathBuf],
    excluded: &[PathBuf],
    run: &mut RunReport,
    out: &mut W,
) -> Result<()> {
    let mut skip = schema_paths.to_vec();
    skip.extend_from_slice(excluded);
    let targets = difference(glob_files(&config.target_patterns)?, &skip);
    run.targets = targets.len();

    writeln!(out, "Globbing targets... {}", report::found(targets.len(), "targets"))?;
    writeln!(out)?;

    let engine = registry.validator();
    let mut details = Vec::new();
    for file in &targets {
        match engine.validate(file) {
            Ok(result) => {
                for pass in &result.passes {
                    run.passed += 1;
                    writeln!(out, "{}", report::validate_ok(&pass.schema_id, file))?;
                }
                for failure in result.failures {
                    run.failed += 1;
                    run.errors += failure.errors.len();
                    writeln!(out, "{}", report::validate_failed(&failure.schema_id, file))?;
                    details.push(FailureDetail {
                        file: file.clone(),
                        schema_id: failure.schema_id,
                        errors: failure.errors,
                    });
                }
            }
            Err(ScheyamlError::UnknownSchemaReference { schema_id, .. }) => {
                run.unknown_references += 1;
                writeln!(out, "{}", report::validate_unknown_schema(&schema_id, file))?;
            }
            Err(ScheyamlError::NoSchemaDeclared { .. }) => {
                run.undeclared += 1;
                writeln!(out, "{}", report::validate_no_schemas(file))?;
            }
            Err(error) => {
                tracing::debug!(path = %file.display(), "target failed to load: {error}");
                run.load_errors += 1;
                writeln!(out, "{}", report::validate_load_error(file, &error))?;
            }
        }
    }

    writeln!(out)?;
    for detail in &details {
        writeln!(out, "{}", report::failure_heading(&detail.schema_id, &detail.file))?;
        for error in &detail.errors {
            writeln!(out)?;
            writeln!(out, "{}", report::failure_error(error))?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "{}",
        report::summary(run.passed, run.failed, run.errors, run.load_errors)
    )?;
    Ok(())
}
