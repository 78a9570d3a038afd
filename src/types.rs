use serde::{Deserialize, Serialize};

/// One fixed-income instrument of the candidate universe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub rate: f64,                // Annual yield, percent
    pub term: u32,                // Days to maturity
    pub category: String,         // Liquidity / product type
    pub rating: Option<String>,
    pub issuer: Option<String>,
}

impl AssetRecord {
    pub fn new(rate: f64, term: u32, category: impl Into<String>) -> Self {
        Self {
            rate,
            term,
            category: category.into(),
            rating: None,
            issuer: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }
}

/// Whether an objective is to be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationDirection {
    Maximize,
    Minimize,
}

/// Outcome of evaluating one individual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessStatus {
    Valid,
    Infeasible, // Violates a constraint; dominated by every valid individual
    Failed,     // Scoring failed; carries worst-case values
}

/// Objective values attached to an individual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    pub values: Vec<f64>,
    pub status: FitnessStatus,
}

impl Fitness {
    pub fn valid(values: Vec<f64>) -> Self {
        Self { values, status: FitnessStatus::Valid }
    }

    pub fn infeasible(values: Vec<f64>) -> Self {
        Self { values, status: FitnessStatus::Infeasible }
    }

    pub fn failed(values: Vec<f64>) -> Self {
        Self { values, status: FitnessStatus::Failed }
    }

    pub fn is_valid(&self) -> bool {
        self.status == FitnessStatus::Valid
    }

    /// First objective; the value logged and compared in single-objective mode
    pub fn scalar(&self) -> f64 {
        self.values.first().copied().unwrap_or(0.0)
    }
}

/// One row of the append-only generation log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationLogEntry {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub feasible: bool, // Best was read from a valid individual
}

impl GenerationLogEntry {
    /// Feasibility first, then the best value
    pub fn improves_on(&self, other: &GenerationLogEntry) -> bool {
        (self.feasible, self.best_fitness) > (other.feasible, other.best_fitness)
    }
}

/// External view of a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub assets: Vec<usize>,
    pub objectives: Vec<f64>,
    pub score: Option<f64>, // Only in single-objective mode
    pub status: FitnessStatus,
}

/// Why the generation loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Stagnated,
    Exhausted,
}
