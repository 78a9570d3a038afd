use crate::engines::generation::pareto::{self, MultiObjectiveIndividual, OptimizationDirection};
use crate::types::{FitnessStatus, PortfolioSummary};

use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct ElitePortfolio {
    pub summary: PortfolioSummary,
    pub generation: usize,              // Generation it was first seen in
    pub pareto_rank: usize,             // Pareto frontier rank (0 = best)
    pub crowding_distance: f64,         // Diversity measure
}

impl ElitePortfolio {
    fn fitness(&self) -> f64 {
        self.summary.objectives.first().copied().unwrap_or(f64::NEG_INFINITY)
    }
}

/// Best distinct portfolios seen over a whole run
pub struct HallOfFame {
    portfolios: Vec<ElitePortfolio>,
    max_size: usize,
    seen_signatures: HashSet<Vec<usize>>,
    directions: Vec<OptimizationDirection>,
    use_pareto: bool,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            portfolios: Vec::new(),
            max_size,
            seen_signatures: HashSet::new(),
            directions: vec![OptimizationDirection::Maximize],
            use_pareto: false,
        }
    }

    /// Create a new HallOfFame ordered by Pareto rank then crowding distance
    pub fn new_with_pareto(max_size: usize, directions: Vec<OptimizationDirection>) -> Self {
        Self {
            portfolios: Vec::new(),
            max_size,
            seen_signatures: HashSet::new(),
            directions,
            use_pareto: true,
        }
    }

    /// Attempt to add a portfolio. Only valid portfolios are kept, and each
    /// asset set at most once.
    pub fn try_add(&mut self, summary: PortfolioSummary, generation: usize) -> bool {
        if self.max_size == 0 || summary.status != FitnessStatus::Valid {
            return false;
        }
        if self.seen_signatures.contains(&summary.assets) {
            return false;
        }

        let signature = summary.assets.clone();
        self.seen_signatures.insert(signature.clone());
        self.portfolios.push(ElitePortfolio {
            summary,
            generation,
            pareto_rank: 0,
            crowding_distance: 0.0,
        });

        if self.use_pareto {
            self.sort_and_trim_pareto();
        } else {
            self.sort_and_trim_single();
        }

        // A candidate trimmed straight away was not an improvement
        self.seen_signatures.contains(&signature)
    }

    /// Offer every member of a population; returns how many were admitted
    pub fn update<I>(&mut self, candidates: I, generation: usize) -> usize
    where
        I: IntoIterator<Item = PortfolioSummary>,
    {
        candidates
            .into_iter()
            .filter(|summary| self.try_add(summary.clone(), generation))
            .count()
    }

    fn sort_and_trim_single(&mut self) {
        // Stable, so earlier discoveries win ties
        self.portfolios.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
        self.trim();
    }

    fn sort_and_trim_pareto(&mut self) {
        let mut individuals: Vec<MultiObjectiveIndividual<usize>> = self
            .portfolios
            .iter()
            .enumerate()
            .map(|(i, p)| MultiObjectiveIndividual::new(i, p.summary.objectives.clone()))
            .collect();

        let fronts = pareto::fast_non_dominated_sort(&mut individuals, &self.directions);
        for front in &fronts {
            pareto::calculate_crowding_distance(&mut individuals, front);
        }

        for individual in &individuals {
            self.portfolios[individual.data].pareto_rank = individual.rank;
            self.portfolios[individual.data].crowding_distance = individual.crowding_distance;
        }

        self.portfolios.sort_by(|a, b| {
            a.pareto_rank
                .cmp(&b.pareto_rank)
                .then_with(|| b.crowding_distance.total_cmp(&a.crowding_distance))
        });
        self.trim();
    }

    fn trim(&mut self) {
        while self.portfolios.len() > self.max_size {
            if let Some(removed) = self.portfolios.pop() {
                self.seen_signatures.remove(&removed.summary.assets);
            }
        }
    }

    pub fn get_all(&self) -> &[ElitePortfolio] {
        &self.portfolios
    }

    pub fn summaries(&self) -> Vec<PortfolioSummary> {
        self.portfolios.iter().map(|p| p.summary.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.portfolios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }
}
