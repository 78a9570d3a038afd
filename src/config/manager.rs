use super::{
    evolution::EvolutionConfig,
    traits::ConfigSection,
    universe::{ConstraintConfig, UniverseConfig},
};
use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment variables that override file settings,
/// e.g. `CDBOPT__EVOLUTION__POPULATION_SIZE=500`
pub const ENV_PREFIX: &str = "CDBOPT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub universe: UniverseConfig,
    pub constraints: ConstraintConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), OptimizerError> {
        self.evolution.validate()?;
        self.universe.validate()?;
        self.constraints.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: AppConfig,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Load a TOML or JSON file, layered with `CDBOPT__*` environment overrides
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), OptimizerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OptimizerError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(Self::environment())
            .build()?;
        let config: AppConfig = settings.try_deserialize()?;

        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());

        self.config = config;
        Ok(())
    }

    /// Defaults overridden by environment variables only
    pub fn load_from_env(&mut self) -> Result<(), OptimizerError> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;
        let config: AppConfig = settings.try_deserialize()?;

        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), OptimizerError> {
        let toml_str = toml::to_string_pretty(&self.config)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    pub fn update<F>(&mut self, f: F) -> Result<(), OptimizerError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.config.clone();
        f(&mut candidate);
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }
}
