use crate::config::FitnessStrategy;
use crate::engines::metrics::{PortfolioMetrics, RiskMetrics, DAYS_PER_YEAR};
use crate::types::OptimizationDirection;

const TERM_PENALTY_PER_YEAR: f64 = 0.005;
const CATEGORY_BONUS: f64 = 0.5;

/// Weights of the composite investor-profile scores
struct ProfileWeights {
    rate: f64,
    risk: f64,
    term: f64,
}

impl ProfileWeights {
    fn apply(&self, m: &PortfolioMetrics) -> f64 {
        self.rate * m.mean_rate - self.risk * m.rate_dispersion - self.term * m.mean_term_days
    }
}

const CONSERVATIVE: ProfileWeights = ProfileWeights { rate: 0.6, risk: 0.4, term: 0.01 };
const MODERATE: ProfileWeights = ProfileWeights { rate: 0.7, risk: 0.3, term: 0.0 };
const AGGRESSIVE: ProfileWeights = ProfileWeights { rate: 0.9, risk: 0.1, term: 0.0 };

impl FitnessStrategy {
    pub fn objective_names(&self) -> &'static [&'static str] {
        match self {
            Self::MeanYield => &["mean_yield"],
            Self::CompoundedReturn => &["compounded_return"],
            Self::TermPenalized => &["term_penalized_yield"],
            Self::Diversification => &["diversified_yield"],
            Self::RiskAdjusted => &["sharpe_like"],
            Self::Conservative | Self::Moderate | Self::Aggressive => &["profile_score"],
            Self::MultiObjective => &["mean_yield", "yield_std_dev", "distinct_categories"],
        }
    }

    pub fn directions(&self) -> Vec<OptimizationDirection> {
        use OptimizationDirection::*;
        match self {
            Self::MultiObjective => vec![Maximize, Minimize, Maximize],
            _ => vec![Maximize],
        }
    }

    /// Objective values of a selection, in `objective_names` order
    pub fn score(&self, m: &PortfolioMetrics, risk_free_rate: f64) -> Vec<f64> {
        match self {
            Self::MeanYield => vec![m.mean_rate],
            Self::CompoundedReturn => vec![m.compounded_return],
            Self::TermPenalized => {
                vec![m.mean_rate - TERM_PENALTY_PER_YEAR * (m.mean_term_days / DAYS_PER_YEAR)]
            }
            Self::Diversification => {
                vec![m.mean_rate + CATEGORY_BONUS * m.distinct_categories as f64]
            }
            Self::RiskAdjusted => {
                vec![RiskMetrics::sharpe_like(m.mean_rate, m.rate_dispersion, risk_free_rate)]
            }
            Self::Conservative => vec![CONSERVATIVE.apply(m)],
            Self::Moderate => vec![MODERATE.apply(m)],
            Self::Aggressive => vec![AGGRESSIVE.apply(m)],
            Self::MultiObjective => vec![
                m.mean_rate,
                m.rate_dispersion,
                m.distinct_categories as f64,
            ],
        }
    }

    /// Values given to a portfolio whose scoring failed: zero for what is
    /// maximized, the largest representable risk for what is minimized
    pub fn worst_case(&self) -> Vec<f64> {
        self.directions()
            .into_iter()
            .map(|d| match d {
                OptimizationDirection::Maximize => 0.0,
                OptimizationDirection::Minimize => f64::MAX,
            })
            .collect()
    }
}
