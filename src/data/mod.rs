pub mod connectors;
pub mod filter;
pub mod universe;

pub use connectors::{CsvConnector, UniverseMetadata};
pub use filter::UniverseFilter;
pub use universe::Universe;
