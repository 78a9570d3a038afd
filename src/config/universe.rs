use super::traits::ConfigSection;
use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};

/// Quality filters applied to the loaded universe before optimization.
/// Every filter is off when its field is unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub benchmark_rate: f64,                   // CDI, % per year
    pub min_rate_pct_of_benchmark: Option<f64>,
    pub max_term_days: Option<u32>,
    pub required_category: Option<String>,
    pub excluded_issuers: Vec<String>,
    pub accepted_ratings: Option<Vec<String>>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            benchmark_rate: 10.0,
            min_rate_pct_of_benchmark: None,
            max_term_days: None,
            required_category: None,
            excluded_issuers: Vec::new(),
            accepted_ratings: None,
        }
    }
}

impl UniverseConfig {
    /// Minimum absolute rate implied by the benchmark filter
    pub fn min_rate(&self) -> Option<f64> {
        self.min_rate_pct_of_benchmark
            .map(|pct| pct / 100.0 * self.benchmark_rate)
    }
}

impl ConfigSection for UniverseConfig {
    fn section_name() -> &'static str {
        "universe"
    }

    fn validate(&self) -> Result<(), OptimizerError> {
        if !self.benchmark_rate.is_finite() || self.benchmark_rate <= 0.0 {
            return Err(OptimizerError::Configuration(
                "Benchmark rate must be positive".to_string()
            ));
        }
        if let Some(pct) = self.min_rate_pct_of_benchmark {
            if !pct.is_finite() || pct < 0.0 {
                return Err(OptimizerError::Configuration(
                    "Minimum rate percentage must be non-negative".to_string()
                ));
            }
        }
        if matches!(&self.accepted_ratings, Some(ratings) if ratings.is_empty()) {
            return Err(OptimizerError::Configuration(
                "Accepted ratings list is empty; unset it to accept any rating".to_string()
            ));
        }
        Ok(())
    }
}

/// Feasibility bounds on a portfolio; unset bounds are not checked
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    pub max_mean_term_days: Option<f64>,
    pub min_distinct_categories: Option<usize>,
    pub max_assets_per_issuer: Option<usize>,
}

impl ConstraintConfig {
    pub fn is_unconstrained(&self) -> bool {
        self.max_mean_term_days.is_none()
            && self.min_distinct_categories.is_none()
            && self.max_assets_per_issuer.is_none()
    }
}

impl ConfigSection for ConstraintConfig {
    fn section_name() -> &'static str {
        "constraints"
    }

    fn validate(&self) -> Result<(), OptimizerError> {
        if let Some(days) = self.max_mean_term_days {
            if !days.is_finite() || days <= 0.0 {
                return Err(OptimizerError::Configuration(
                    "Maximum mean term must be positive".to_string()
                ));
            }
        }
        if self.max_assets_per_issuer == Some(0) {
            return Err(OptimizerError::Configuration(
                "Maximum assets per issuer must be at least 1".to_string()
            ));
        }
        Ok(())
    }
}
