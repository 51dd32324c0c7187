use std::path::Path;

use tracing::warn;

use crate::adapter::AdapterConfig;
use crate::ai::{EvalWeights, SearchConfig};
use crate::error::ConfigError;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub eval: EvalWeights,
    pub adapter: AdapterConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.depth == 0 {
            return Err(ConfigError::Validation(
                "search.depth must be >= 1".into(),
            ));
        }

        if self.adapter.own_symbol == 0 || self.adapter.opponent_symbol == 0 {
            return Err(ConfigError::Validation(
                "adapter symbols must be non-zero (0 marks an empty cell)".into(),
            ));
        }
        if self.adapter.own_symbol == self.adapter.opponent_symbol {
            return Err(ConfigError::Validation(
                "adapter.own_symbol must differ from adapter.opponent_symbol".into(),
            ));
        }

        let eval = &self.eval;
        let weights = [
            ("eval.center", eval.center),
            ("eval.threat_own", eval.threat_own),
            ("eval.threat_opponent", eval.threat_opponent),
            ("eval.setup_strong", eval.setup_strong),
            ("eval.setup_weak", eval.setup_weak),
            ("eval.setup_opponent", eval.setup_opponent),
            ("eval.zugzwang", eval.zugzwang),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !eval.must_block.is_finite() || eval.must_block >= 0.0 {
            return Err(ConfigError::Validation(
                "eval.must_block must be finite and < 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
