pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use config::{AppConfig, ConfigManager, EvolutionConfig};
pub use data::Universe;
pub use engines::generation::{EvolutionEngine, EvolutionOutcome};
pub use error::{OptimizerError, Result};
