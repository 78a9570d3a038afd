use crate::config::{ConstraintConfig, CrossoverMethod, Encoding, EvolutionConfig, MutationMethod};
use crate::data::Universe;
use crate::engines::evaluation::Evaluator;
use crate::engines::generation::genome::{Genome, Individual};
use crate::engines::generation::{operators, repair, selection};
use crate::error::Result;
use crate::types::{Fitness, OptimizationDirection};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMethod {
    Tournament { size: usize },
    Nsga2,
}

/// Operator set of one run, fixed at construction from the configuration
#[derive(Debug, Clone)]
pub struct Toolbox {
    pub encoding: Encoding,
    pub crossover: CrossoverMethod,
    pub mutation: MutationMethod,
    pub substitution_fraction: f64,
    pub selection: SelectionMethod,
    pub evaluator: Evaluator,
    directions: Vec<OptimizationDirection>,
}

impl Toolbox {
    pub fn from_config(config: &EvolutionConfig, constraints: ConstraintConfig) -> Self {
        let evaluator = Evaluator::new(config.strategy, config.risk_free_rate).with_constraints(constraints);
        let selection = if config.strategy.is_multi_objective() {
            SelectionMethod::Nsga2
        } else {
            SelectionMethod::Tournament { size: config.tournament_size }
        };

        Self {
            encoding: config.encoding,
            crossover: config.crossover,
            mutation: config.mutation,
            substitution_fraction: config.substitution_fraction,
            selection,
            directions: evaluator.directions(),
            evaluator,
        }
    }

    pub fn directions(&self) -> &[OptimizationDirection] {
        &self.directions
    }

    pub fn is_multi_objective(&self) -> bool {
        self.directions.len() > 1
    }

    pub fn generate<R: Rng>(&self, portfolio_size: usize, universe_size: usize, rng: &mut R) -> Individual {
        Individual::new(Genome::random(self.encoding, portfolio_size, universe_size, rng))
    }

    /// Enforce the index invariant; masks pass through untouched. Fitness is
    /// dropped only if the genes actually changed.
    pub fn repair<R: Rng>(
        &self,
        individual: &mut Individual,
        portfolio_size: usize,
        universe_size: usize,
        rng: &mut R,
    ) -> Result<()> {
        if let Genome::Indices(genes) = &mut individual.genome {
            if !repair::is_valid_portfolio(genes, portfolio_size, universe_size) {
                *genes = repair::repair(genes, portfolio_size, universe_size, rng)?;
                individual.fitness = None;
            }
        }
        Ok(())
    }

    pub fn mate<R: Rng>(&self, a: &mut Individual, b: &mut Individual, rng: &mut R) {
        operators::crossover(self.crossover, &mut a.genome, &mut b.genome, rng);
        a.invalidate();
        b.invalidate();
    }

    pub fn mutate<R: Rng>(&self, individual: &mut Individual, universe_size: usize, rng: &mut R) {
        operators::mutate(
            self.mutation,
            &mut individual.genome,
            self.substitution_fraction,
            universe_size,
            rng,
        );
        individual.invalidate();
    }

    pub fn evaluate(&self, genome: &Genome, universe: &Universe) -> Fitness {
        self.evaluator.evaluate(genome, universe)
    }

    /// Indices of the `count` best pool members
    pub fn elites(&self, pool: &[Individual], count: usize) -> Vec<usize> {
        selection::select_elites(pool, count, &self.directions)
    }

    /// Indices of `count` pool members chosen by the configured selector
    pub fn select<R: Rng>(&self, pool: &[Individual], count: usize, rng: &mut R) -> Vec<usize> {
        if pool.is_empty() {
            return Vec::new();
        }
        match self.selection {
            SelectionMethod::Tournament { size } => (0..count)
                .map(|_| selection::tournament_selection(pool, size, rng))
                .collect(),
            SelectionMethod::Nsga2 => selection::nsga2_select(pool, count, &self.directions),
        }
    }
}
