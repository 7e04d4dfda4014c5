//! # Terminal Report
//!
//! Every function returns one formatted line; the caller decides where it
//! goes. Status lines share an eight-column status field:
//!
//! ```text
//! OK      Loaded 'person' from 'schemas/person.schema.yml'
//! WARN    Unknown schema 'team' declared in 'people/ada.yml'
//! FAIL    Schema 'person' failed by 'people/bob.yml'
//! ```

use std::path::Path;

use colored::{ColoredString, Colorize};

use scheyaml_schema::StructuredError;

const STATUS_WIDTH: usize = 8;
const TICK: &str = "✔";
const CROSS: &str = "✖";

fn status(label: &str) -> String {
    format!("{label:<STATUS_WIDTH$}")
}

fn status_line(label: ColoredString, text: ColoredString) -> String {
    format!("{label}{text}")
}

pub fn banner(version: &str) -> String {
    format!("scheyaml v{version}")
}

pub fn found(count: usize, kind: &str) -> String {
    format!("Found {count} {kind}!").yellow().to_string()
}

pub fn load_schema_ok(schema_id: &str, file: &Path) -> String {
    status_line(
        status("OK").green(),
        format!("Loaded '{schema_id}' from '{}'", file.display()).green(),
    )
}

pub fn load_schema_directive_error(file: &Path, message: &str) -> String {
    status_line(
        status("WARN").yellow(),
        format!("Directive error in '{}': {message}", file.display()).yellow(),
    )
}

pub fn load_schema_fail(file: &Path) -> String {
    status_line(
        status("FAIL").red(),
        format!("Failed loading schema from '{}'", file.display()).red(),
    )
}

pub fn validate_ok(schema_id: &str, file: &Path) -> String {
    status_line(
        status("OK").green(),
        format!("Schema '{schema_id}' validated by '{}'", file.display()).green(),
    )
}

pub fn validate_failed(schema_id: &str, file: &Path) -> String {
    status_line(
        status("FAIL").red(),
        format!("Schema '{schema_id}' failed by '{}'", file.display()).red(),
    )
}

pub fn validate_no_schemas(file: &Path) -> String {
    status_line(
        status("---").bright_black(),
        format!("No schemas declared by '{}'", file.display()).bright_black(),
    )
}

pub fn validate_unknown_schema(schema_id: &str, file: &Path) -> String {
    status_line(
        status("WARN").yellow(),
        format!("Unknown schema '{schema_id}' declared in '{}'", file.display()).yellow(),
    )
}

pub fn validate_load_error(file: &Path, error: &dyn std::fmt::Display) -> String {
    status_line(
        status("FAIL").red(),
        format!("Failed loading '{}': {error}", file.display()).red(),
    )
}

/// Heading printed above the error list of one failed schema.
pub fn failure_heading(schema_id: &str, file: &Path) -> String {
    status_line(
        format!("{CROSS:<2}").red(),
        format!("Schema '{schema_id}' for '{}':", file.display()).bright_black(),
    )
}

pub fn failure_error(error: &StructuredError) -> String {
    format!("    {}", error.to_string().red())
}

/// Final `== ✔ N passed, M failed (E errors) ==` line.
///
/// `passed` and `failed` count (target, schema) pairs. Targets that could
/// not be loaded are reported as a separate `U unreadable` figure.
pub fn summary(passed: usize, failed: usize, errors: usize, unreadable: usize) -> String {
    let mut counts = format!("{passed} passed, {failed} failed ({errors} errors)");
    if unreadable > 0 {
        counts.push_str(&format!(", {unreadable} unreadable"));
    }
    if failed == 0 && unreadable == 0 {
        format!("== {TICK} {counts} ==").green().to_string()
    } else {
        format!("== {CROSS} {counts} ==").red().to_string()
    }
}

pub fn done() -> String {
    format!("{TICK} Done!").yellow().to_string()
}
