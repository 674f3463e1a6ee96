use super::Config;
use std::path::PathBuf;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PALIMPSEST_API_KEY").or_else(|_| std::env::var("API_KEY"))
            && !key.is_empty()
        {
            self.api_key = Some(key);
        }

        if let Ok(provider) = std::env::var("PALIMPSEST_PROVIDER")
            && !provider.is_empty()
        {
            self.generation.provider = provider;
        }

        if let Ok(model) = std::env::var("PALIMPSEST_MODEL")
            && !model.is_empty()
        {
            self.generation.model = model;
        }

        if let Ok(temp_str) = std::env::var("PALIMPSEST_TEMPERATURE")
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.generation.temperature = temp;
        }

        if let Ok(workspace) = std::env::var("PALIMPSEST_WORKSPACE")
            && !workspace.is_empty()
        {
            self.workspace_dir = PathBuf::from(workspace);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_env::{ENV_LOCK, EnvVarGuard};
    use super::*;

    #[test]
    fn overrides_generation_settings() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _provider = EnvVarGuard::set("PALIMPSEST_PROVIDER", "ollama");
        let _model = EnvVarGuard::set("PALIMPSEST_MODEL", "llama3");
        let _temp = EnvVarGuard::set("PALIMPSEST_TEMPERATURE", "1.2");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.generation.provider, "ollama");
        assert_eq!(config.generation.model, "llama3");
        assert!((config.generation.temperature - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_temperature_is_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _temp = EnvVarGuard::set("PALIMPSEST_TEMPERATURE", "3.5");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert!((config.generation.temperature - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn generic_api_key_is_a_fallback() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _specific = EnvVarGuard::unset("PALIMPSEST_API_KEY");
        let _generic = EnvVarGuard::set("API_KEY", "generic-key");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.api_key.as_deref(), Some("generic-key"));
    }

    #[test]
    fn workspace_override_replaces_directory() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _workspace = EnvVarGuard::set("PALIMPSEST_WORKSPACE", "/tmp/palimpsest-ws");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.workspace_dir, PathBuf::from("/tmp/palimpsest-ws"));
    }
}
