use super::super::{GenerationConfig, MemoryConfig, ObservabilityConfig};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        let palimpsest_dir = directories::UserDirs::new()
            .map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf())
            .join(".palimpsest");

        Self {
            workspace_dir: palimpsest_dir.join("workspace"),
            config_path: palimpsest_dir.join("config.toml"),
            api_key: None,
            generation: GenerationConfig::default(),
            memory: MemoryConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let temperature = self.generation.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Validation(format!(
                "generation.temperature must be within 0.0..=2.0, got {temperature}"
            )));
        }
        if self.generation.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "generation.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.generation.model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "generation.model must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.config_path.ends_with(".palimpsest/config.toml"));
        assert!(config.workspace_dir.ends_with(".palimpsest/workspace"));
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let mut config = Config::default();
        config.generation.temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));

        config.generation.temperature = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = Config::default();
        config.generation.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("timeout_secs")
        ));
    }

    #[test]
    fn parses_sections_from_toml() {
        let config: Config = toml::from_str(
            r#"
api_key = "sk-test"

[generation]
provider = "ollama"
model = "llama3"
temperature = 0.2

[memory]
backend = "in_memory"

[observability]
backend = "none"
"#,
        )
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.generation.provider, "ollama");
        assert_eq!(config.generation.model, "llama3");
        assert_eq!(config.memory.backend, "in_memory");
        assert_eq!(config.memory.db_file, "palimpsest.db");
        assert_eq!(config.observability.backend, "none");
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.generation, GenerationConfig::default());
        assert_eq!(config.memory, MemoryConfig::default());
    }
}
