//! # scheyaml-cli — Command-Line Interface
//!
//! Glue around the schema compiler: find files, build the registry,
//! validate every target and print the outcome.
//!
//! ```bash
//! scheyaml                                   # default patterns
//! scheyaml -s 'schemas/**/*.yml' -t 'config/**/*.yml'
//! scheyaml --schemas-only                    # only load the schemas
//! scheyaml --config scheyaml.yml -e 'vendor/**'
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing and output live here; schema semantics live in
//!   `scheyaml-schema`.
//! - Report lines go to stdout, logs to stderr.

pub mod config;
pub mod discover;
pub mod report;
pub mod run;

pub use config::ScheyamlConfig;
pub use run::{run_scheyaml, RunArgs, RunReport};

/// Version string printed in the banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit code when every target passed.
pub const EXIT_OK: u8 = 0;

/// Exit code when at least one target failed validation or failed to load.
pub const EXIT_FAILED: u8 = 1;

/// Exit code for fatal errors (bad patterns, broken schema files, I/O).
pub const EXIT_FATAL: u8 = 2;
