//! Genetic representation of a candidate portfolio
//!
//! Two encodings are supported:
//! - **Indices**: an ordered list of exactly `N` distinct asset indices.
//!   Order only matters to crossover locality; evaluation treats the list
//!   as a set. Variation may break the invariant, so every offspring goes
//!   through `repair` before it is scored.
//! - **Mask**: one membership flag per universe asset. There is no repair
//!   for masks and the number of selected assets varies freely, including
//!   empty and single-asset portfolios, which are scored over 0 or 1 rows.
//!
//! # Example
//!
//! ```
//! use cdbopt::engines::generation::Genome;
//! let genome = Genome::Indices(vec![4, 0, 7]);
//! assert_eq!(genome.signature(), vec![0, 4, 7]);
//! ```

use crate::config::Encoding;
use crate::types::{Fitness, FitnessStatus, PortfolioSummary};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genome {
    Indices(Vec<usize>),
    Mask(Vec<bool>),
}

impl Genome {
    /// Uniform random portfolio. Index genomes are sampled without
    /// replacement and therefore already satisfy the invariant; masks
    /// select each asset with probability `portfolio_size / universe_size`.
    pub fn random<R: Rng>(
        encoding: Encoding,
        portfolio_size: usize,
        universe_size: usize,
        rng: &mut R,
    ) -> Self {
        match encoding {
            Encoding::Indices => {
                let amount = portfolio_size.min(universe_size);
                Genome::Indices(index::sample(rng, universe_size, amount).into_vec())
            }
            Encoding::Mask => {
                let p = if universe_size == 0 {
                    0.0
                } else {
                    (portfolio_size as f64 / universe_size as f64).min(1.0)
                };
                Genome::Mask((0..universe_size).map(|_| rng.gen_bool(p)).collect())
            }
        }
    }

    /// Number of genes (not of selected assets)
    pub fn len(&self) -> usize {
        match self {
            Genome::Indices(genes) => genes.len(),
            Genome::Mask(bits) => bits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected universe rows, in gene order
    pub fn selected(&self) -> Vec<usize> {
        match self {
            Genome::Indices(genes) => genes.clone(),
            Genome::Mask(bits) => bits
                .iter()
                .enumerate()
                .filter_map(|(i, &on)| on.then_some(i))
                .collect(),
        }
    }

    /// Sorted set of selected rows; equal for portfolios that differ only
    /// in gene order
    pub fn signature(&self) -> Vec<usize> {
        let mut rows = self.selected();
        rows.sort_unstable();
        rows.dedup();
        rows
    }
}

/// A genome with its (possibly not yet computed) fitness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub genome: Genome,
    pub fitness: Option<Fitness>,
}

impl Individual {
    pub fn new(genome: Genome) -> Self {
        Self { genome, fitness: None }
    }

    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Scalar used for logging and tournaments; unevaluated counts as the
    /// lowest possible value
    pub fn scalar(&self) -> f64 {
        self.fitness.as_ref().map_or(f64::NEG_INFINITY, Fitness::scalar)
    }

    pub fn status(&self) -> Option<FitnessStatus> {
        self.fitness.as_ref().map(|f| f.status)
    }

    pub fn summary(&self, single_objective: bool) -> PortfolioSummary {
        let objectives = self
            .fitness
            .as_ref()
            .map(|f| f.values.clone())
            .unwrap_or_default();
        PortfolioSummary {
            assets: self.genome.signature(),
            score: if single_objective { objectives.first().copied() } else { None },
            objectives,
            status: self.status().unwrap_or(FitnessStatus::Failed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_random_indices_are_distinct() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let genome = Genome::random(Encoding::Indices, 5, 8, &mut rng);
            let rows = genome.selected();
            assert_eq!(rows.len(), 5);
            assert_eq!(rows.iter().collect::<HashSet<_>>().len(), 5);
            assert!(rows.iter().all(|&r| r < 8));
        }
    }

    #[test]
    fn test_mask_selection() {
        let genome = Genome::Mask(vec![false, true, false, true]);
        assert_eq!(genome.len(), 4);
        assert_eq!(genome.selected(), vec![1, 3]);

        let mut rng = StdRng::seed_from_u64(3);
        let random = Genome::random(Encoding::Mask, 2, 10, &mut rng);
        assert_eq!(random.len(), 10);
    }

    #[test]
    fn test_summary_uses_sorted_rows() {
        let mut ind = Individual::new(Genome::Indices(vec![9, 2, 5]));
        ind.fitness = Some(Fitness::valid(vec![13.0]));
        let summary = ind.summary(true);
        assert_eq!(summary.assets, vec![2, 5, 9]);
        assert_eq!(summary.score, Some(13.0));

        ind.invalidate();
        assert!(!ind.is_evaluated());
        assert_eq!(ind.scalar(), f64::NEG_INFINITY);
    }
}
