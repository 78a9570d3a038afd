use crate::engines::generation::genome::Individual;
use std::collections::HashSet;

/// Generations that must elapse before a collapse can trigger a restart
pub const MIN_GENERATIONS_BEFORE_RESTART: usize = 10;

/// Watches population-wide genetic variety and decides when part of the
/// population is reseeded
#[derive(Debug, Clone, Copy)]
pub struct DiversityMonitor {
    threshold: f64,
    restart_fraction: f64,
}

impl DiversityMonitor {
    pub fn new(threshold: f64, restart_fraction: f64) -> Self {
        Self { threshold, restart_fraction }
    }

    /// Mean pairwise dissimilarity `1 - shared / max(len_a, len_b)` over all
    /// pairs, in `[0, 1]`. Zero exactly when every individual selects the same
    /// asset set.
    pub fn measure(population: &[Individual]) -> f64 {
        let n = population.len();
        if n < 2 {
            return 0.0;
        }

        let sets: Vec<HashSet<usize>> = population
            .iter()
            .map(|ind| ind.genome.signature().into_iter().collect())
            .collect();

        let mut total = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                total += dissimilarity(&sets[i], &sets[j]);
            }
        }

        let pairs = (n * (n - 1) / 2) as f64;
        total / pairs
    }

    pub fn should_restart(&self, generation: usize, diversity: f64) -> bool {
        generation >= MIN_GENERATIONS_BEFORE_RESTART && diversity < self.threshold
    }

    /// Slots to reseed, never touching the `elite_count` protected ones
    pub fn restart_count(&self, population_size: usize, elite_count: usize) -> usize {
        let wanted = (self.restart_fraction * population_size as f64).round() as usize;
        wanted.min(population_size.saturating_sub(elite_count))
    }
}

fn dissimilarity(a: &HashSet<usize>, b: &HashSet<usize>) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    1.0 - shared as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::Genome;

    fn population(sets: &[&[usize]]) -> Vec<Individual> {
        sets.iter()
            .map(|genes| Individual::new(Genome::Indices(genes.to_vec())))
            .collect()
    }

    #[test]
    fn test_identical_sets_have_zero_diversity() {
        // Gene order does not matter
        let pop = population(&[&[0, 1, 2], &[2, 1, 0], &[1, 0, 2]]);
        assert_eq!(DiversityMonitor::measure(&pop), 0.0);
    }

    #[test]
    fn test_disjoint_sets_have_full_diversity() {
        let pop = population(&[&[0, 1], &[2, 3], &[4, 5]]);
        assert!((DiversityMonitor::measure(&pop) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_overlap() {
        // Pairs: 1/3 shared twice -> 2/3 each, identical pair -> 0
        let pop = population(&[&[0, 1, 2], &[0, 1, 2], &[0, 3, 4]]);
        let expected = (0.0 + 2.0 / 3.0 + 2.0 / 3.0) / 3.0;
        assert!((DiversityMonitor::measure(&pop) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_populations() {
        assert_eq!(DiversityMonitor::measure(&[]), 0.0);
        assert_eq!(DiversityMonitor::measure(&population(&[&[3, 4]])), 0.0);
    }

    #[test]
    fn test_restart_rules() {
        let monitor = DiversityMonitor::new(0.2, 0.2);
        assert!(!monitor.should_restart(9, 0.0));
        assert!(monitor.should_restart(10, 0.1));
        assert!(!monitor.should_restart(50, 0.2));

        assert_eq!(monitor.restart_count(20, 1), 4);
        assert_eq!(monitor.restart_count(5, 4), 1);
        assert_eq!(monitor.restart_count(3, 3), 0);
    }
}
