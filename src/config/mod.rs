pub mod traits;
pub mod evolution;
pub mod universe;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, FitnessStrategy, Encoding, CrossoverMethod, MutationMethod};
pub use universe::{UniverseConfig, ConstraintConfig};
pub use traits::ConfigSection;
