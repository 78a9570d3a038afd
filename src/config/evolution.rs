use super::traits::{check_probability, ConfigSection};
use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub portfolio_size: usize,
    pub elite_pct: f64,         // Percent of the population, rounded up
    pub tournament_size: usize,
    pub diversity_threshold: f64,
    pub restart_fraction: f64,
    pub early_stop_limit: usize, // 0 disables early stopping
    pub strategy: FitnessStrategy,
    pub risk_free_rate: Option<f64>,
    pub seed: Option<u64>,

    pub encoding: Encoding,
    pub crossover: CrossoverMethod,
    pub mutation: MutationMethod,
    pub substitution_fraction: f64,
    pub parallel_evaluation: bool,
    pub hall_of_fame_size: usize,
}

/// How a portfolio is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessStrategy {
    MeanYield,
    CompoundedReturn,
    TermPenalized,
    Diversification,
    RiskAdjusted,
    Conservative,
    Moderate,
    Aggressive,
    MultiObjective,
}

impl FitnessStrategy {
    pub fn is_multi_objective(&self) -> bool {
        matches!(self, Self::MultiObjective)
    }
}

/// Genetic representation of a portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    Indices, // Exactly N distinct asset indices
    Mask,    // One membership flag per asset, size varies
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverMethod {
    TwoPoint,
    Uniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationMethod {
    Shuffle,
    Swap,
    Substitution,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            generations: 300,
            crossover_rate: 0.7,
            mutation_rate: 0.3,
            portfolio_size: 5,
            elite_pct: 5.0,
            tournament_size: 3,
            diversity_threshold: 0.2,
            restart_fraction: 0.2,
            early_stop_limit: 20,
            strategy: FitnessStrategy::Moderate,
            risk_free_rate: None,
            seed: None,
            encoding: Encoding::Indices,
            crossover: CrossoverMethod::TwoPoint,
            mutation: MutationMethod::Substitution,
            substitution_fraction: 0.3,
            parallel_evaluation: false,
            hall_of_fame_size: 5,
        }
    }
}

impl EvolutionConfig {
    /// Number of individuals carried over verbatim each generation
    pub fn elite_count(&self) -> usize {
        let raw = (self.elite_pct * self.population_size as f64 / 100.0).ceil();
        (raw.max(0.0) as usize).min(self.population_size)
    }

    /// Check the configuration against a concrete universe size
    pub fn validate_for_universe(&self, universe_size: usize) -> Result<(), OptimizerError> {
        self.validate()?;
        if universe_size < self.portfolio_size {
            return Err(OptimizerError::UniverseTooSmall {
                universe: universe_size,
                portfolio_size: self.portfolio_size,
            });
        }
        Ok(())
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), OptimizerError> {
        if self.population_size == 0 {
            return Err(OptimizerError::Configuration(
                "Population size must be positive".to_string()
            ));
        }
        if self.generations == 0 {
            return Err(OptimizerError::Configuration(
                "Number of generations must be positive".to_string()
            ));
        }
        if self.portfolio_size == 0 {
            return Err(OptimizerError::Configuration(
                "Portfolio size must be positive".to_string()
            ));
        }
        if self.tournament_size == 0 {
            return Err(OptimizerError::Configuration(
                "Tournament size must be at least 1".to_string()
            ));
        }
        if !(0.0..=100.0).contains(&self.elite_pct) {
            return Err(OptimizerError::Configuration(
                "Elite percentage must be between 0 and 100".to_string()
            ));
        }
        check_probability("Crossover rate", self.crossover_rate)?;
        check_probability("Mutation rate", self.mutation_rate)?;
        check_probability("Diversity threshold", self.diversity_threshold)?;
        check_probability("Restart fraction", self.restart_fraction)?;
        if self.substitution_fraction <= 0.0 || self.substitution_fraction > 1.0 {
            return Err(OptimizerError::Configuration(
                "Substitution fraction must be in (0, 1]".to_string()
            ));
        }
        if let Some(rate) = self.risk_free_rate {
            if !rate.is_finite() {
                return Err(OptimizerError::Configuration(
                    "Risk-free rate must be finite".to_string()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_elite_count_rounds_up() {
        let config = EvolutionConfig {
            population_size: 30,
            elite_pct: 5.0,
            ..Default::default()
        };
        assert_eq!(config.elite_count(), 2);

        let none = EvolutionConfig { elite_pct: 0.0, ..config.clone() };
        assert_eq!(none.elite_count(), 0);
    }

    #[test]
    fn test_rejects_zero_sizes() {
        let config = EvolutionConfig { population_size: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = EvolutionConfig { portfolio_size: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = EvolutionConfig { generations: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_universe_smaller_than_portfolio() {
        let config = EvolutionConfig { portfolio_size: 5, ..Default::default() };
        match config.validate_for_universe(3) {
            Err(OptimizerError::UniverseTooSmall { universe, portfolio_size }) => {
                assert_eq!(universe, 3);
                assert_eq!(portfolio_size, 5);
            }
            other => panic!("expected UniverseTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn test_strategy_names_deserialize() {
        let config: EvolutionConfig =
            toml::from_str("strategy = \"risk_adjusted\"\nmutation = \"swap\"").unwrap();
        assert_eq!(config.strategy, FitnessStrategy::RiskAdjusted);
        assert_eq!(config.mutation, MutationMethod::Swap);
        assert_eq!(config.population_size, 200);
    }
}
