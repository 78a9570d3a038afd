pub mod diversity;
pub mod evolution_engine;
pub mod genome;
pub mod hall_of_fame;
pub mod operators;
pub mod pareto;
pub mod progress;
pub mod repair;
pub mod selection;
pub mod toolbox;

pub use diversity::DiversityMonitor;
pub use evolution_engine::{EvolutionEngine, EvolutionOutcome, ProgressCallback};
pub use genome::{Genome, Individual};
pub use hall_of_fame::{ElitePortfolio, HallOfFame};
pub use pareto::{MultiObjectiveIndividual, OptimizationDirection};
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage, SilentProgress};
pub use toolbox::{SelectionMethod, Toolbox};
