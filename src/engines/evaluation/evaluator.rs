use crate::config::{ConstraintConfig, FitnessStrategy};
use crate::data::Universe;
use crate::engines::evaluation::constraints::Constraints;
use crate::engines::generation::genome::Genome;
use crate::engines::metrics::PortfolioMetrics;
use crate::error::EvaluationError;
use crate::types::{Fitness, OptimizationDirection};

/// Maps a genome to its objective values under one fitness strategy.
/// Stateless apart from configuration, so it is shared across threads.
#[derive(Debug, Clone)]
pub struct Evaluator {
    strategy: FitnessStrategy,
    risk_free_rate: f64,
    constraints: Constraints,
}

impl Evaluator {
    pub fn new(strategy: FitnessStrategy, risk_free_rate: Option<f64>) -> Self {
        Self {
            strategy,
            risk_free_rate: risk_free_rate.unwrap_or(0.0),
            constraints: Constraints::default(),
        }
    }

    pub fn with_constraints(mut self, constraints: ConstraintConfig) -> Self {
        self.constraints = Constraints::new(constraints);
        self
    }

    pub fn strategy(&self) -> FitnessStrategy {
        self.strategy
    }

    pub fn directions(&self) -> Vec<OptimizationDirection> {
        self.strategy.directions()
    }

    pub fn is_multi_objective(&self) -> bool {
        self.strategy.is_multi_objective()
    }

    /// Score a genome, reporting why scoring failed.
    ///
    /// Index genomes must select at least one row. Mask genomes may be
    /// empty and are scored over no rows. A portfolio that violates a
    /// constraint still carries its objective values but is tagged
    /// infeasible.
    pub fn try_evaluate(&self, genome: &Genome, universe: &Universe) -> Result<Fitness, EvaluationError> {
        let selected = genome.selected();
        if selected.is_empty() && matches!(genome, Genome::Indices(_)) {
            return Err(EvaluationError::EmptySelection);
        }

        let rows = universe.select(&selected)?;
        let metrics = PortfolioMetrics::calculate(&rows);
        let values = self.strategy.score(&metrics, self.risk_free_rate);

        if let Some((name, _)) = self
            .strategy
            .objective_names()
            .iter()
            .zip(&values)
            .find(|(_, v)| !v.is_finite())
        {
            return Err(EvaluationError::NonFinite { objective: *name });
        }

        match self.constraints.check(&metrics) {
            Ok(()) => Ok(Fitness::valid(values)),
            Err(violation) => {
                log::trace!("Infeasible portfolio {:?}: {}", selected, violation);
                Ok(Fitness::infeasible(values))
            }
        }
    }

    /// Score a genome; failures become worst-case `Failed` fitness
    pub fn evaluate(&self, genome: &Genome, universe: &Universe) -> Fitness {
        match self.try_evaluate(genome, universe) {
            Ok(fitness) => fitness,
            Err(e) => {
                log::warn!("Evaluation failed for {:?}: {}", genome.selected(), e);
                Fitness::failed(self.strategy.worst_case())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetRecord, FitnessStatus};

    fn universe() -> Universe {
        Universe::from_rates(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]).unwrap()
    }

    #[test]
    fn test_mean_yield() {
        let evaluator = Evaluator::new(FitnessStrategy::MeanYield, None);
        let fitness = evaluator.evaluate(&Genome::Indices(vec![5, 4, 3]), &universe());
        assert_eq!(fitness.status, FitnessStatus::Valid);
        assert!((fitness.scalar() - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_order_does_not_matter() {
        let evaluator = Evaluator::new(FitnessStrategy::Moderate, None);
        let a = evaluator.evaluate(&Genome::Indices(vec![0, 2, 5]), &universe());
        let b = evaluator.evaluate(&Genome::Indices(vec![5, 0, 2]), &universe());
        assert_eq!(a, b);
    }

    #[test]
    fn test_out_of_range_is_failed() {
        let evaluator = Evaluator::new(FitnessStrategy::MultiObjective, None);
        let genome = Genome::Indices(vec![0, 42]);
        assert_eq!(
            evaluator.try_evaluate(&genome, &universe()),
            Err(EvaluationError::IndexOutOfRange { index: 42, universe: 6 })
        );

        let fitness = evaluator.evaluate(&genome, &universe());
        assert_eq!(fitness.status, FitnessStatus::Failed);
        assert_eq!(fitness.values, vec![0.0, f64::MAX, 0.0]);
    }

    #[test]
    fn test_empty_selection() {
        let evaluator = Evaluator::new(FitnessStrategy::MeanYield, None);
        assert_eq!(
            evaluator.try_evaluate(&Genome::Indices(vec![]), &universe()),
            Err(EvaluationError::EmptySelection)
        );

        // An empty mask is a legal portfolio with mean zero
        let fitness = evaluator.evaluate(&Genome::Mask(vec![false; 6]), &universe());
        assert_eq!(fitness, Fitness::valid(vec![0.0]));
    }

    #[test]
    fn test_risk_floor_single_row() {
        let evaluator = Evaluator::new(FitnessStrategy::RiskAdjusted, Some(10.0));
        let mut mask = vec![false; 6];
        mask[3] = true;
        let fitness = evaluator.evaluate(&Genome::Mask(mask), &universe());
        // (13 - 10) / max(0, 0.1)
        assert!((fitness.scalar() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_infeasible_keeps_values() {
        let universe = Universe::new(vec![
            AssetRecord::new(12.0, 365, "Diária"),
            AssetRecord::new(13.0, 365, "Diária"),
        ])
        .unwrap();
        let evaluator = Evaluator::new(FitnessStrategy::MeanYield, None).with_constraints(ConstraintConfig {
            min_distinct_categories: Some(2),
            ..Default::default()
        });

        let fitness = evaluator.evaluate(&Genome::Indices(vec![0, 1]), &universe);
        assert_eq!(fitness.status, FitnessStatus::Infeasible);
        assert!((fitness.scalar() - 12.5).abs() < 1e-12);
    }
}
