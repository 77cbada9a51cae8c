//! Per-run analysis settings

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one analysis run, passed explicitly to each component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// File name suffix of mail files, matched case-sensitively
    pub mail_extension: String,

    /// Length of the top senders, recipients and connectors lists
    pub top_n: usize,

    /// Sender domains listed in the corpus digest
    pub max_domains: usize,

    /// Subjects listed in the corpus digest
    pub max_subjects: usize,

    /// Representative messages previewed in the corpus digest
    pub max_samples: usize,

    /// Body lines shown per preview
    pub preview_lines: usize,

    /// Parse files on the rayon thread pool
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mail_extension: ".eml".to_string(),
            top_n: 5,
            max_domains: 10,
            max_subjects: 10,
            max_samples: 10,
            preview_lines: 10,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mail_extension.is_empty() {
            return Err(ConfigError::Invalid("mail_extension must not be empty".into()));
        }
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        Ok(())
    }
}
