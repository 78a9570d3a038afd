/// Pareto optimization utilities for multi-objective evolution
/// Implements NSGA-II style fast non-dominated sorting and crowding distance,
/// with infeasible individuals dominated by every feasible one

use crate::engines::generation::genome::Individual;
pub use crate::types::OptimizationDirection;
use crate::types::PortfolioSummary;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Individual with multiple objective values
#[derive(Debug, Clone)]
pub struct MultiObjectiveIndividual<T> {
    pub data: T,
    pub objectives: Vec<f64>,
    pub feasible: bool,
    pub rank: usize,            // Pareto rank (0 = best frontier)
    pub crowding_distance: f64, // Diversity measure
}

impl<T> MultiObjectiveIndividual<T> {
    pub fn new(data: T, objectives: Vec<f64>) -> Self {
        Self {
            data,
            objectives,
            feasible: true,
            rank: 0,
            crowding_distance: 0.0,
        }
    }

    pub fn infeasible(data: T, objectives: Vec<f64>) -> Self {
        Self {
            feasible: false,
            ..Self::new(data, objectives)
        }
    }
}

/// Wrap evaluated population members; anything not `Valid` is infeasible
pub fn from_population(population: &[Individual]) -> Vec<MultiObjectiveIndividual<usize>> {
    population
        .iter()
        .enumerate()
        .map(|(i, ind)| match &ind.fitness {
            Some(f) if f.is_valid() => MultiObjectiveIndividual::new(i, f.values.clone()),
            Some(f) => MultiObjectiveIndividual::infeasible(i, f.values.clone()),
            None => MultiObjectiveIndividual::infeasible(i, Vec::new()),
        })
        .collect()
}

/// Check if individual A dominates individual B
/// A dominates B if A is no worse than B in all objectives and strictly better in at least one
pub fn dominates(
    a_objectives: &[f64],
    b_objectives: &[f64],
    directions: &[OptimizationDirection],
) -> bool {
    if a_objectives.len() != b_objectives.len() || a_objectives.len() != directions.len() {
        return false;
    }

    let mut at_least_one_better = false;

    for i in 0..a_objectives.len() {
        let a_val = a_objectives[i];
        let b_val = b_objectives[i];

        let (a_better, b_better) = match directions[i] {
            OptimizationDirection::Maximize => (a_val > b_val, b_val > a_val),
            OptimizationDirection::Minimize => (a_val < b_val, b_val < a_val),
        };

        if b_better {
            return false;
        }

        if a_better {
            at_least_one_better = true;
        }
    }

    at_least_one_better
}

/// Dominance with feasibility: a feasible individual dominates every
/// infeasible one, and infeasible individuals never dominate
pub fn constrained_dominates<T>(
    a: &MultiObjectiveIndividual<T>,
    b: &MultiObjectiveIndividual<T>,
    directions: &[OptimizationDirection],
) -> bool {
    match (a.feasible, b.feasible) {
        (true, false) => true,
        (false, _) => false,
        (true, true) => dominates(&a.objectives, &b.objectives, directions),
    }
}

/// Fast non-dominated sorting (NSGA-II algorithm)
/// Returns individuals grouped by Pareto front (0 = best, 1 = second best, etc.)
pub fn fast_non_dominated_sort<T>(
    individuals: &mut [MultiObjectiveIndividual<T>],
    directions: &[OptimizationDirection],
) -> Vec<Vec<usize>> {
    let n = individuals.len();
    if n == 0 {
        return Vec::new();
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_solutions: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut first_front = Vec::new();

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }

            if constrained_dominates(&individuals[i], &individuals[j], directions) {
                dominated_solutions[i].push(j);
            } else if constrained_dominates(&individuals[j], &individuals[i], directions) {
                domination_count[i] += 1;
            }
        }

        if domination_count[i] == 0 {
            individuals[i].rank = 0;
            first_front.push(i);
        }
    }

    fronts.push(first_front);

    let mut front_index = 0;
    while front_index < fronts.len() && !fronts[front_index].is_empty() {
        let mut next_front = Vec::new();

        for &i in &fronts[front_index] {
            for &j in &dominated_solutions[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    individuals[j].rank = front_index + 1;
                    next_front.push(j);
                }
            }
        }

        if !next_front.is_empty() {
            fronts.push(next_front);
        }
        front_index += 1;
    }

    fronts
}

/// Calculate crowding distance for individuals in a front
/// Higher values indicate more isolated (less crowded) individuals
pub fn calculate_crowding_distance<T>(
    individuals: &mut [MultiObjectiveIndividual<T>],
    front_indices: &[usize],
) {
    let front_size = front_indices.len();
    if front_size == 0 {
        return;
    }

    if front_size <= 2 {
        for &idx in front_indices {
            individuals[idx].crowding_distance = f64::INFINITY;
        }
        return;
    }

    let num_objectives = individuals[front_indices[0]].objectives.len();

    for &idx in front_indices {
        individuals[idx].crowding_distance = 0.0;
    }

    for obj in 0..num_objectives {
        let mut sorted_indices: Vec<usize> = front_indices.to_vec();
        sorted_indices.sort_by(|&a, &b| {
            let a_val = individuals[a].objectives.get(obj).copied().unwrap_or(0.0);
            let b_val = individuals[b].objectives.get(obj).copied().unwrap_or(0.0);
            a_val.total_cmp(&b_val)
        });

        individuals[sorted_indices[0]].crowding_distance = f64::INFINITY;
        individuals[sorted_indices[front_size - 1]].crowding_distance = f64::INFINITY;

        let values: Vec<f64> = sorted_indices
            .iter()
            .map(|&i| individuals[i].objectives.get(obj).copied().unwrap_or(0.0))
            .collect();
        let range = values[front_size - 1] - values[0];

        if !range.is_finite() || range.abs() < 1e-10 {
            continue;
        }

        for i in 1..(front_size - 1) {
            let gap = (values[i + 1] - values[i - 1]) / range;
            individuals[sorted_indices[i]].crowding_distance += gap;
        }
    }
}

/// Crowded comparison: lower rank first, then larger crowding distance
pub fn crowded_order<T>(
    a: &MultiObjectiveIndividual<T>,
    b: &MultiObjectiveIndividual<T>,
) -> Ordering {
    a.rank
        .cmp(&b.rank)
        .then_with(|| b.crowding_distance.total_cmp(&a.crowding_distance))
}

/// Rank-0 front of a population under constrained dominance, one summary
/// per distinct portfolio, best first objective first
pub fn extract_front(
    population: &[Individual],
    directions: &[OptimizationDirection],
) -> Vec<PortfolioSummary> {
    let mut individuals = from_population(population);
    let fronts = fast_non_dominated_sort(&mut individuals, directions);

    let mut seen = HashSet::new();
    let mut front: Vec<PortfolioSummary> = fronts
        .first()
        .into_iter()
        .flatten()
        .filter(|&&i| individuals[i].feasible)
        .map(|&i| &population[individuals[i].data])
        .filter(|ind| seen.insert(ind.genome.signature()))
        .map(|ind| ind.summary(false))
        .collect();

    let first_direction = directions.first().copied().unwrap_or(OptimizationDirection::Maximize);
    front.sort_by(|a, b| {
        let a_val = a.objectives.first().copied().unwrap_or(0.0);
        let b_val = b.objectives.first().copied().unwrap_or(0.0);
        match first_direction {
            OptimizationDirection::Maximize => b_val.total_cmp(&a_val),
            OptimizationDirection::Minimize => a_val.total_cmp(&b_val),
        }
    });
    front
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominance_maximize() {
        let directions = vec![OptimizationDirection::Maximize, OptimizationDirection::Maximize];

        // A is better in both objectives
        assert!(dominates(&[10.0, 20.0], &[5.0, 10.0], &directions));

        // A is better in one, equal in other
        assert!(dominates(&[10.0, 20.0], &[10.0, 10.0], &directions));

        // A is better in one, worse in other - no dominance
        assert!(!dominates(&[10.0, 5.0], &[5.0, 10.0], &directions));

        // Equal in both - no dominance
        assert!(!dominates(&[10.0, 20.0], &[10.0, 20.0], &directions));
    }

    #[test]
    fn test_dominance_mixed() {
        let directions = vec![OptimizationDirection::Maximize, OptimizationDirection::Minimize];

        // Higher yield and lower risk
        assert!(dominates(&[10.0, 5.0], &[5.0, 10.0], &directions));

        // Higher yield but higher risk - no dominance
        assert!(!dominates(&[10.0, 15.0], &[5.0, 10.0], &directions));
    }

    #[test]
    fn test_fast_non_dominated_sort() {
        let directions = vec![OptimizationDirection::Maximize, OptimizationDirection::Maximize];

        let mut individuals = vec![
            MultiObjectiveIndividual::new(0, vec![1.0, 5.0]),  // Front 0
            MultiObjectiveIndividual::new(1, vec![3.0, 3.0]),  // Front 0
            MultiObjectiveIndividual::new(2, vec![5.0, 1.0]),  // Front 0
            MultiObjectiveIndividual::new(3, vec![2.0, 2.0]),  // Front 1
            MultiObjectiveIndividual::new(4, vec![1.0, 1.0]),  // Front 2
        ];

        let fronts = fast_non_dominated_sort(&mut individuals, &directions);

        assert_eq!(fronts.len(), 3);
        assert_eq!(fronts[0].len(), 3);
        assert_eq!(individuals[0].rank, 0);
        assert_eq!(individuals[1].rank, 0);
        assert_eq!(individuals[2].rank, 0);
        assert_eq!(individuals[3].rank, 1);
        assert_eq!(individuals[4].rank, 2);
    }

    #[test]
    fn test_infeasible_ranked_last() {
        let directions = vec![OptimizationDirection::Maximize, OptimizationDirection::Minimize];

        let mut individuals = vec![
            MultiObjectiveIndividual::infeasible(0, vec![99.0, 0.0]),
            MultiObjectiveIndividual::new(1, vec![12.0, 2.0]),
            MultiObjectiveIndividual::new(2, vec![10.0, 3.0]),
        ];

        let fronts = fast_non_dominated_sort(&mut individuals, &directions);
        assert_eq!(fronts, vec![vec![1], vec![2], vec![0]]);
        assert_eq!(individuals[0].rank, 2);
    }

    #[test]
    fn test_crowding_distance() {
        let directions = vec![OptimizationDirection::Maximize, OptimizationDirection::Maximize];

        let mut individuals = vec![
            MultiObjectiveIndividual::new(0, vec![1.0, 5.0]),
            MultiObjectiveIndividual::new(1, vec![3.0, 3.0]),
            MultiObjectiveIndividual::new(2, vec![5.0, 1.0]),
            MultiObjectiveIndividual::new(3, vec![4.0, 2.0]),
        ];

        let fronts = fast_non_dominated_sort(&mut individuals, &directions);
        calculate_crowding_distance(&mut individuals, &fronts[0]);

        // Boundaries are infinite, interior points get normalized gaps
        assert!(individuals[0].crowding_distance.is_infinite());
        assert!(individuals[2].crowding_distance.is_infinite());
        // Point 1: (4-1)/4 + (5-2)/4 = 1.5; point 3: (5-3)/4 + (3-1)/4 = 1.0
        assert!((individuals[1].crowding_distance - 1.5).abs() < 1e-12);
        assert!((individuals[3].crowding_distance - 1.0).abs() < 1e-12);
        assert_eq!(crowded_order(&individuals[1], &individuals[3]), Ordering::Less);
    }
}
