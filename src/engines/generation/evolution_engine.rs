use crate::config::{ConfigSection, ConstraintConfig, EvolutionConfig};
use crate::data::Universe;
use crate::engines::generation::{
    diversity::DiversityMonitor,
    genome::Individual,
    hall_of_fame::HallOfFame,
    pareto,
    toolbox::Toolbox,
};
use crate::error::Result;
use crate::types::{FitnessStatus, GenerationLogEntry, PortfolioSummary, StopReason};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, entry: &GenerationLogEntry, diversity: f64);
    fn on_diversity_restart(&mut self, generation: usize, diversity: f64, replaced: usize);
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation);
    }

    fn on_generation_complete(&mut self, entry: &GenerationLogEntry, diversity: f64) {
        (**self).on_generation_complete(entry, diversity);
    }

    fn on_diversity_restart(&mut self, generation: usize, diversity: f64, replaced: usize) {
        (**self).on_diversity_restart(generation, diversity, replaced);
    }
}

/// Everything a finished run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    pub population: Vec<Individual>,
    pub log: Vec<GenerationLogEntry>,
    pub stop_reason: StopReason,
    pub generations_run: usize,
    pub evaluation_warnings: usize, // Evaluations that fell back to worst-case fitness
    pub restarts: usize,
    pub final_diversity: f64,
    pub pareto_front: Option<Vec<PortfolioSummary>>,
    pub hall_of_fame: Vec<PortfolioSummary>,
}

impl EvolutionOutcome {
    /// Best value of the last logged generation
    pub fn best_fitness(&self) -> Option<f64> {
        self.log.last().map(|entry| entry.best_fitness)
    }
}

pub struct EvolutionEngine {
    config: EvolutionConfig,
    universe: Universe,
    toolbox: Toolbox,
    diversity: DiversityMonitor,
    hall_of_fame: HallOfFame,
    rng: StdRng,
}

impl EvolutionEngine {
    /// Build an engine, refusing any configuration that cannot run on this
    /// universe
    pub fn new(config: EvolutionConfig, universe: Universe) -> Result<Self> {
        Self::with_constraints(config, ConstraintConfig::default(), universe)
    }

    pub fn with_constraints(
        config: EvolutionConfig,
        constraints: ConstraintConfig,
        universe: Universe,
    ) -> Result<Self> {
        config.validate_for_universe(universe.len())?;
        constraints.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let toolbox = Toolbox::from_config(&config, constraints);

        // Create HallOfFame based on optimization mode
        let hall_of_fame = if toolbox.is_multi_objective() {
            HallOfFame::new_with_pareto(config.hall_of_fame_size, toolbox.directions().to_vec())
        } else {
            HallOfFame::new(config.hall_of_fame_size)
        };

        Ok(Self {
            diversity: DiversityMonitor::new(config.diversity_threshold, config.restart_fraction),
            config,
            universe,
            toolbox,
            hall_of_fame,
            rng,
        })
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<EvolutionOutcome> {
        let population_size = self.config.population_size;
        let elite_count = self.config.elite_count();
        let single_objective = !self.toolbox.is_multi_objective();

        log::info!(
            "Starting evolution: {} individuals, {} generations, {} of {} assets, strategy {:?}",
            population_size,
            self.config.generations,
            self.config.portfolio_size,
            self.universe.len(),
            self.config.strategy
        );

        // Initialize population
        let mut population = self.initialize_population();
        let mut warnings = self.evaluate_invalid(&mut population);

        let mut log: Vec<GenerationLogEntry> = Vec::with_capacity(self.config.generations);
        let mut best_so_far: Option<GenerationLogEntry> = None;
        let mut stagnant = 0;
        let mut restarts = 0;
        let mut stop_reason = StopReason::Exhausted;

        // Evolution loop
        for generation in 0..self.config.generations {
            callback.on_generation_start(generation);

            let mut offspring = self.vary(&population);
            for individual in offspring.iter_mut() {
                self.toolbox.repair(
                    individual,
                    self.config.portfolio_size,
                    self.universe.len(),
                    &mut self.rng,
                )?;
            }
            warnings += self.evaluate_invalid(&mut offspring);

            // Parents and offspring compete together
            let mut pool = population;
            pool.extend(offspring);

            let elites = self.toolbox.elites(&pool, elite_count);
            let chosen = self.toolbox.select(&pool, population_size - elites.len(), &mut self.rng);
            population = elites
                .iter()
                .chain(chosen.iter())
                .map(|&i| pool[i].clone())
                .collect();

            let entry = self.log_entry(generation, &population);
            log.push(entry);

            let diversity = DiversityMonitor::measure(&population);
            log::debug!(
                "Generation {}: best {:.4}, mean {:.4}, diversity {:.3}",
                generation,
                entry.best_fitness,
                entry.mean_fitness,
                diversity
            );
            callback.on_generation_complete(&entry, diversity);

            self.hall_of_fame.update(
                population.iter().map(|ind| ind.summary(single_objective)),
                generation,
            );

            if self.diversity.should_restart(generation, diversity) {
                let (replaced, failures) = self.restart(&mut population, elite_count);
                warnings += failures;
                if replaced > 0 {
                    restarts += 1;
                    log::info!(
                        "Diversity {:.3} below {:.3} at generation {}: reseeded {} individuals",
                        diversity,
                        self.config.diversity_threshold,
                        generation,
                        replaced
                    );
                    callback.on_diversity_restart(generation, diversity, replaced);
                }
            }

            if best_so_far.map_or(true, |best| entry.improves_on(&best)) {
                best_so_far = Some(entry);
                stagnant = 0;
            } else {
                stagnant += 1;
            }

            if self.config.early_stop_limit > 0 && stagnant >= self.config.early_stop_limit {
                stop_reason = StopReason::Stagnated;
                log::info!(
                    "No improvement for {} generations, stopping at generation {}",
                    stagnant,
                    generation
                );
                break;
            }
        }

        if warnings > 0 {
            log::warn!("{} evaluations fell back to worst-case fitness", warnings);
        }

        let pareto_front = (!single_objective).then(|| self.pareto_front(&population));
        let outcome = EvolutionOutcome {
            generations_run: log.len(),
            final_diversity: DiversityMonitor::measure(&population),
            hall_of_fame: self.hall_of_fame.summaries(),
            population,
            log,
            stop_reason,
            evaluation_warnings: warnings,
            restarts,
            pareto_front,
        };

        log::info!(
            "Evolution finished ({:?}) after {} generations, best fitness {:.4}",
            outcome.stop_reason,
            outcome.generations_run,
            outcome.best_fitness().unwrap_or(f64::NAN)
        );

        Ok(outcome)
    }

    /// Non-dominated, valid members of a population with their raw
    /// objective values
    pub fn pareto_front(&self, population: &[Individual]) -> Vec<PortfolioSummary> {
        pareto::extract_front(population, self.toolbox.directions())
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    fn initialize_population(&mut self) -> Vec<Individual> {
        (0..self.config.population_size)
            .map(|_| {
                self.toolbox.generate(
                    self.config.portfolio_size,
                    self.universe.len(),
                    &mut self.rng,
                )
            })
            .collect()
    }

    /// Clone the population, cross consecutive pairs and mutate each child
    fn vary(&mut self, population: &[Individual]) -> Vec<Individual> {
        let mut offspring = population.to_vec();

        for i in (1..offspring.len()).step_by(2) {
            if self.rng.gen_bool(self.config.crossover_rate) {
                let (left, right) = offspring.split_at_mut(i);
                self.toolbox.mate(&mut left[i - 1], &mut right[0], &mut self.rng);
            }
        }

        for individual in offspring.iter_mut() {
            if self.rng.gen_bool(self.config.mutation_rate) {
                self.toolbox.mutate(individual, self.universe.len(), &mut self.rng);
            }
        }

        offspring
    }

    /// Evaluate every individual without fitness, in place. Returns the
    /// number of evaluations that failed.
    fn evaluate_invalid(&self, individuals: &mut [Individual]) -> usize {
        let toolbox = &self.toolbox;
        let universe = &self.universe;

        let evaluate = |individual: &mut Individual| -> bool {
            if individual.is_evaluated() {
                return false;
            }
            let fitness = toolbox.evaluate(&individual.genome, universe);
            let failed = fitness.status == FitnessStatus::Failed;
            individual.fitness = Some(fitness);
            failed
        };

        if self.config.parallel_evaluation {
            individuals.par_iter_mut().map(evaluate).filter(|&failed| failed).count()
        } else {
            individuals.iter_mut().map(evaluate).filter(|&failed| failed).count()
        }
    }

    /// Replace random non-elite slots with fresh evaluated individuals.
    /// Returns how many were replaced and how many of them failed to evaluate.
    fn restart(&mut self, population: &mut [Individual], elite_count: usize) -> (usize, usize) {
        let count = self.diversity.restart_count(population.len(), elite_count);
        if count == 0 {
            return (0, 0);
        }

        let free = population.len() - elite_count;
        let slots = index::sample(&mut self.rng, free, count);

        let mut fresh: Vec<Individual> = (0..count)
            .map(|_| {
                self.toolbox.generate(
                    self.config.portfolio_size,
                    self.universe.len(),
                    &mut self.rng,
                )
            })
            .collect();
        let failures = self.evaluate_invalid(&mut fresh);

        for (slot, individual) in slots.iter().zip(fresh) {
            population[elite_count + slot] = individual;
        }
        (count, failures)
    }

    /// Best is read from the top-ranked individual (the first objective in
    /// multi-objective mode). The ranking puts valid individuals first, so
    /// the best only comes from an invalid one when nothing is feasible.
    /// Mean is over every individual's first objective.
    fn log_entry(&self, generation: usize, population: &[Individual]) -> GenerationLogEntry {
        let top = self
            .toolbox
            .elites(population, 1)
            .first()
            .map(|&i| &population[i]);
        let best_fitness = top.map_or(0.0, Individual::scalar);
        let feasible = top.map_or(false, |ind| ind.status() == Some(FitnessStatus::Valid));

        let total: f64 = population
            .iter()
            .map(|ind| ind.fitness.as_ref().map_or(0.0, |f| f.scalar()))
            .sum();
        let mean_fitness = if population.is_empty() {
            0.0
        } else {
            total / population.len() as f64
        };

        GenerationLogEntry {
            generation,
            best_fitness,
            mean_fitness,
            feasible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FitnessStrategy;
    use crate::engines::generation::progress::SilentProgress;

    fn config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 12,
            generations: 15,
            portfolio_size: 2,
            strategy: FitnessStrategy::MeanYield,
            early_stop_limit: 0,
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_small_universe() {
        let universe = Universe::from_rates(&[10.0, 11.0]).unwrap();
        let mut cfg = config();
        cfg.portfolio_size = 3;
        assert!(EvolutionEngine::new(cfg, universe).is_err());
    }

    #[test]
    fn test_restart_protects_elites() {
        let universe = Universe::from_rates(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0]).unwrap();
        let mut cfg = config();
        cfg.restart_fraction = 0.5;
        let mut engine = EvolutionEngine::new(cfg, universe).unwrap();

        let mut population = engine.initialize_population();
        engine.evaluate_invalid(&mut population);
        let elite = population[0].clone();

        let (replaced, failures) = engine.restart(&mut population, 1);
        assert_eq!(replaced, 6);
        assert_eq!(failures, 0);
        assert_eq!(population[0], elite);
        assert_eq!(population.len(), 12);
        assert!(population.iter().all(Individual::is_evaluated));
    }

    #[test]
    fn test_vary_keeps_population_size() {
        let universe = Universe::from_rates(&[10.0, 11.0, 12.0, 13.0, 14.0]).unwrap();
        let mut engine = EvolutionEngine::new(config(), universe).unwrap();
        let population = engine.initialize_population();
        let offspring = engine.vary(&population);
        assert_eq!(offspring.len(), population.len());
    }

    #[test]
    fn test_stagnation_stops_early() {
        // Every portfolio of the two identical assets scores the same
        let universe = Universe::from_rates(&[12.0, 12.0, 12.0]).unwrap();
        let mut cfg = config();
        cfg.generations = 50;
        cfg.early_stop_limit = 3;
        let mut engine = EvolutionEngine::new(cfg, universe).unwrap();
        let outcome = engine.run(SilentProgress).unwrap();

        assert_eq!(outcome.stop_reason, StopReason::Stagnated);
        assert_eq!(outcome.generations_run, 4);
    }
}
