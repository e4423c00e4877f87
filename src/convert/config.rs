//! YAML configuration for conversion options.
//!
//! Every field is optional; missing keys take the defaults below.
//!
//! ```yaml
//! enum_type_prefix: enum_type_
//! drop_tables: true
//! session_preamble: true
//! comment_secondary_indexes: true
//! ```

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Tunable parts of the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Prefix of the synthetic enum type names.
    pub enum_type_prefix: String,
    /// Emit `DROP TABLE IF EXISTS ... CASCADE;` before each CREATE TABLE.
    pub drop_tables: bool,
    /// Wrap the output in the session preamble and epilogue.
    pub session_preamble: bool,
    /// Comment out secondary (non-unique) index definitions.
    pub comment_secondary_indexes: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            enum_type_prefix: "enum_type_".to_string(),
            drop_tables: true,
            session_preamble: true,
            comment_secondary_indexes: true,
        }
    }
}

impl ConvertOptions {
    /// Load options from a YAML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let options: Self = serde_yaml_ng::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !IDENTIFIER_RE.is_match(&self.enum_type_prefix) {
            anyhow::bail!(
                "enum_type_prefix must be a plain SQL identifier, got {:?}",
                self.enum_type_prefix
            );
        }
        Ok(())
    }
}
