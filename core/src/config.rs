//! Engine configuration persistence
//!
//! `EngineConfig` itself lives in `bossmod-types`; this module adds loading and
//! storing it through `confy` (TOML on disk) and parsing inline TOML.

use std::path::PathBuf;

use bossmod_types::EngineConfig;
use thiserror::Error;

const APP_NAME: &str = "bossmod";
const CONFIG_NAME: &str = "engine";

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// EngineConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for EngineConfig persistence
pub trait EngineConfigExt: Sized {
    /// Load from the platform config directory, creating it with defaults if absent
    fn load() -> Result<Self, ConfigError>;
    /// Load, falling back to defaults on any error
    fn load_or_default() -> Self;
    fn store(&self) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    fn from_toml_str(content: &str) -> Result<Self, ConfigError>;
    /// Reject values the engine cannot run with
    fn validate(&self) -> Result<(), ConfigError>;
}

impl EngineConfigExt for EngineConfig {
    fn load() -> Result<Self, ConfigError> {
        let config: EngineConfig = confy::load(APP_NAME, CONFIG_NAME)?;
        config.validate()?;
        Ok(config)
    }

    fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Using default engine configuration");
            Self::default()
        })
    }

    fn store(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
    }

    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = |field: &'static str, value: f32| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a non-negative number of seconds, got {value}"),
                })
            }
        };
        non_negative("unknown_timeout_secs", self.unknown_timeout_secs)?;
        non_negative("upcoming_horizon_secs", self.upcoming_horizon_secs)?;
        if self.max_diagnostics == 0 {
            return Err(ConfigError::Invalid {
                field: "max_diagnostics",
                reason: "must keep at least one diagnostic".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            unknown_timeout_secs = 6.0
            upcoming_limit = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.unknown_timeout_secs, 6.0);
        assert_eq!(config.upcoming_limit, 5);
        assert_eq!(config.max_diagnostics, 256);
        assert!(config.auto_start);
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = EngineConfig::from_toml_str("unknown_timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_invalid_values() {
        let err = EngineConfig::from_toml_str("unknown_timeout_secs = -1.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "unknown_timeout_secs",
                ..
            }
        ));
        assert!(EngineConfig::from_toml_str("max_diagnostics = 0").is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = EngineConfig {
            auto_start: false,
            ..EngineConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
