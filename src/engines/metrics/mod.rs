pub mod returns;
pub mod risk;
pub mod engine;

pub use returns::{ReturnMetrics, DAYS_PER_YEAR};
pub use risk::{RiskMetrics, RISK_FLOOR};
pub use engine::PortfolioMetrics;
