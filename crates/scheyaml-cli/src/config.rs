//! # Configuration
//!
//! Settings are layered: built-in defaults, then an optional YAML file
//! passed with `--config`, then command-line flags. A flag list that is
//! non-empty replaces the configured list instead of extending it.
//!
//! ```yaml
//! schema-patterns:
//!   - "schemas/**/*.yml"
//! target-patterns:
//!   - "deploy/**/*.yml"
//! exclude-patterns:
//!   - "deploy/vendor/**"
//! schemas-only: false
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Resolved run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ScheyamlConfig {
    /// Glob patterns for schema documents.
    pub schema_patterns: Vec<String>,
    /// Glob patterns for target documents.
    pub target_patterns: Vec<String>,
    /// Glob patterns removed from both schemas and targets.
    pub exclude_patterns: Vec<String>,
    /// Load the schemas and stop before validating targets.
    pub schemas_only: bool,
}

impl Default for ScheyamlConfig {
    fn default() -> Self {
        Self {
            schema_patterns: vec!["**/*.schema.yml".to_string(), "**/*.schema.yaml".to_string()],
            target_patterns: vec!["**/*.yml".to_string(), "**/*.yaml".to_string()],
            exclude_patterns: Vec::new(),
            schemas_only: false,
        }
    }
}

impl ScheyamlConfig {
    /// Read a YAML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("invalid config file '{}'", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply command-line values on top of this configuration.
    pub fn apply_overrides(
        &mut self,
        schemas: &[String],
        targets: &[String],
        exclude: &[String],
        schemas_only: bool,
    ) {
        if !schemas.is_empty() {
            self.schema_patterns = schemas.to_vec();
        }
        if !targets.is_empty() {
            self.target_patterns = targets.to_vec();
        }
        if !exclude.is_empty() {
            self.exclude_patterns = exclude.to_vec();
        }
        if schemas_only {
            self.schemas_only = true;
        }
    }
}
