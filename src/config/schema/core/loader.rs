use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    /// Load `~/.palimpsest/config.toml`, writing defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(&home.join(".palimpsest"))
    }

    /// Load or create the config under an explicit data directory.
    pub fn load_or_init_in(palimpsest_dir: &Path) -> Result<Self> {
        let config_path = palimpsest_dir.join("config.toml");
        let workspace_dir = palimpsest_dir.join("workspace");

        if !workspace_dir.exists() {
            fs::create_dir_all(&workspace_dir)
                .context("Failed to create workspace directory")?;
        }

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path.clone_from(&config_path);
            config.workspace_dir = workspace_dir;
            config
        } else {
            let config = Self {
                config_path,
                workspace_dir,
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_env::{ENV_LOCK, EnvVarGuard};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_run_writes_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _model = EnvVarGuard::unset("PALIMPSEST_MODEL");
        let tmp = TempDir::new().unwrap();

        let config = Config::load_or_init_in(tmp.path()).unwrap();

        assert!(tmp.path().join("config.toml").exists());
        assert!(tmp.path().join("workspace").is_dir());
        assert_eq!(config.generation.model, "gpt-4o-mini");
    }

    #[test]
    fn saved_config_round_trips() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _provider = EnvVarGuard::unset("PALIMPSEST_PROVIDER");
        let _workspace = EnvVarGuard::unset("PALIMPSEST_WORKSPACE");
        let tmp = TempDir::new().unwrap();

        let mut config = Config::load_or_init_in(tmp.path()).unwrap();
        config.generation.provider = "groq".into();
        config.memory.backend = "in_memory".into();
        config.save().unwrap();

        let reloaded = Config::load_or_init_in(tmp.path()).unwrap();
        assert_eq!(reloaded.generation.provider, "groq");
        assert_eq!(reloaded.memory.backend, "in_memory");
        assert_eq!(reloaded.workspace_dir, tmp.path().join("workspace"));
    }

    #[test]
    fn invalid_file_is_rejected() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _temp = EnvVarGuard::unset("PALIMPSEST_TEMPERATURE");
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[generation]\ntemperature = 9.0\n",
        )
        .unwrap();

        let err = Config::load_or_init_in(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }
}
