use crate::config::ConstraintConfig;
use crate::engines::metrics::PortfolioMetrics;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintViolation {
    #[error("mean term {actual:.0} days exceeds {limit:.0}")]
    MeanTerm { actual: f64, limit: f64 },

    #[error("{actual} distinct categories, at least {required} required")]
    Categories { actual: usize, required: usize },

    #[error("{actual} assets from one issuer, at most {limit} allowed")]
    IssuerConcentration { actual: usize, limit: usize },
}

/// Feasibility predicate checked before a portfolio is scored
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    config: ConstraintConfig,
}

impl Constraints {
    pub fn new(config: ConstraintConfig) -> Self {
        Self { config }
    }

    pub fn check(&self, m: &PortfolioMetrics) -> Result<(), ConstraintViolation> {
        if self.config.is_unconstrained() {
            return Ok(());
        }
        if let Some(limit) = self.config.max_mean_term_days {
            if m.mean_term_days > limit {
                return Err(ConstraintViolation::MeanTerm { actual: m.mean_term_days, limit });
            }
        }
        if let Some(required) = self.config.min_distinct_categories {
            if m.distinct_categories < required {
                return Err(ConstraintViolation::Categories { actual: m.distinct_categories, required });
            }
        }
        if let Some(limit) = self.config.max_assets_per_issuer {
            if m.max_per_issuer > limit {
                return Err(ConstraintViolation::IssuerConcentration { actual: m.max_per_issuer, limit });
            }
        }
        Ok(())
    }

    pub fn is_feasible(&self, m: &PortfolioMetrics) -> bool {
        self.check(m).is_ok()
    }
}
