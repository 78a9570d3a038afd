mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{AssetColumn, UniverseMetadata};
pub use validator::DataValidator;
