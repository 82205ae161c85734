//! Index service configuration
//!
//! # Example
//!
//! ```ignore
//! use qc_index_service::IndexServiceConfig;
//!
//! let config = IndexServiceConfig::default()
//!     .with_section_size(1024)
//!     .with_index_votes(false);
//! config.validate().expect("valid config");
//! ```

use qc_07_bloom_index::domain::generator::validate_section_size;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Blocks per bloom section unless configured otherwise.
pub const DEFAULT_SECTION_SIZE: u64 = 4096;

/// Index service configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexServiceConfig {
    /// Write vote lookup entries alongside transaction entries
    pub index_votes: bool,
    /// Bloom section settings
    pub sections: SectionConfig,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

/// Bloom section settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Feed block blooms into the section generator
    pub enabled: bool,
    /// Blocks per section; a positive multiple of 8
    pub section_size: u64,
}

impl Default for IndexServiceConfig {
    fn default() -> Self {
        Self {
            index_votes: true,
            sections: SectionConfig::default(),
            log_filter: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            section_size: DEFAULT_SECTION_SIZE,
        }
    }
}

impl IndexServiceConfig {
    /// Parse a JSON document and validate it. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ServiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        validate_section_size(self.sections.section_size)
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        if self.log_filter.trim().is_empty() {
            return Err(ServiceError::Config(
                "log_filter cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_index_votes(mut self, index_votes: bool) -> Self {
        self.index_votes = index_votes;
        self
    }

    pub fn with_sections_enabled(mut self, enabled: bool) -> Self {
        self.sections.enabled = enabled;
        self
    }

    pub fn with_section_size(mut self, section_size: u64) -> Self {
        self.sections.section_size = section_size;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}
