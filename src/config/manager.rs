use super::{
    compatibility::CompatibilityConfig,
    evolution::EvolutionConfig,
    map::MapConfig,
    traits::ConfigSection,
};
use crate::error::TilemapError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `TILEMAPGEN__EVOLUTION__SEED=7`.
pub const ENV_PREFIX: &str = "TILEMAPGEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub map: MapConfig,
    pub compatibility: CompatibilityConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), TilemapError> {
        self.evolution.validate()?;
        self.map.validate()?;
        self.compatibility.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a config file (format picked from its extension) layered with
    /// environment overrides, validate it and make it current.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TilemapError> {
        let config = Self::read(Some(path.as_ref()))?;
        self.replace(config)
    }

    /// Defaults layered with `TILEMAPGEN__*` environment overrides only.
    pub fn load_from_env(&self) -> Result<(), TilemapError> {
        let config = Self::read(None)?;
        self.replace(config)
    }

    fn replace(&self, config: AppConfig) -> Result<(), TilemapError> {
        let mut current = self
            .config
            .write()
            .map_err(|_| TilemapError::Configuration("Config lock poisoned".to_string()))?;
        *current = config;
        Ok(())
    }

    fn read(path: Option<&Path>) -> Result<AppConfig, TilemapError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| TilemapError::Configuration(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        match path {
            Some(path) => log::debug!("Loaded configuration from {}", path.display()),
            None => log::debug!("Loaded configuration from environment"),
        }
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TilemapError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| TilemapError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update<F>(&self, f: F) -> Result<(), TilemapError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self
            .config
            .write()
            .map_err(|_| TilemapError::Configuration("Config lock poisoned".to_string()))?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[map]\nwidth = 12\n\n[evolution]\nseed = 99").unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(file.path()).unwrap();

        let config = manager.get();
        assert_eq!(config.map.width, 12);
        assert_eq!(config.map.height, 32);
        assert_eq!(config.evolution.seed, Some(99));
        assert_eq!(config.evolution.population_size, 100);
    }

    #[test]
    fn environment_overrides_apply_without_a_file() {
        // Only this test sets a TILEMAPGEN__ variable, and on a key the
        // file-based tests do not assert.
        std::env::set_var("TILEMAPGEN__MAP__TILE_SIZE", "16");
        let manager = ConfigManager::new();
        let result = manager.load_from_env();
        std::env::remove_var("TILEMAPGEN__MAP__TILE_SIZE");

        result.unwrap();
        let config = manager.get();
        assert_eq!(config.map.tile_size, 16);
        assert_eq!(config.map.width, 32);
        assert_eq!(config.evolution.generations, 50);
    }

    #[test]
    fn invalid_update_is_rejected_and_not_applied() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.map.height = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().map.height, 32);
    }

    #[test]
    fn save_then_load_preserves_rules() {
        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.compatibility.rules.push(super::super::CompatibilityRule {
                    a: 0,
                    b: 1,
                    score: 0.9,
                    symmetric: true,
                })
            })
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tilemapgen.toml");
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get().compatibility.rules, manager.get().compatibility.rules);
    }
}
