//! # scheyaml CLI entry point
//!
//! Parses command-line arguments, sets up logging and runs one validation
//! pass over the discovered files.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scheyaml_cli::{run_scheyaml, RunArgs, EXIT_FATAL};

/// Validate YAML files against the schemas their `## schema:` directives declare.
///
/// Schema files carry a `## id: <schemaid>` directive and describe their
/// shape in shorthand (`name: string`, `tags: string[]`, `env: [dev, prod]`)
/// or as full JSON Schema.
#[derive(Parser, Debug)]
#[command(name = "scheyaml", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    run: RunArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = cli
        .run
        .resolve_config()
        .and_then(|config| run_scheyaml(&config, &mut std::io::stdout().lock()));

    match result {
        Ok(report) => ExitCode::from(report.exit_code()),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
