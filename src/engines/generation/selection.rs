use crate::engines::generation::genome::Individual;
use crate::engines::generation::pareto::{self, OptimizationDirection};
use crate::types::FitnessStatus;
use rand::Rng;
use std::cmp::Ordering;

/// Valid beats infeasible/failed, which beat unevaluated
fn status_rank(ind: &Individual) -> u8 {
    match ind.status() {
        Some(FitnessStatus::Valid) => 2,
        Some(FitnessStatus::Infeasible) | Some(FitnessStatus::Failed) => 1,
        None => 0,
    }
}

/// Single-objective ordering, `Greater` meaning better
pub fn compare_scalar(a: &Individual, b: &Individual) -> Ordering {
    status_rank(a)
        .cmp(&status_rank(b))
        .then_with(|| a.scalar().total_cmp(&b.scalar()))
}

/// Lexicographic comparison over all objectives, honouring each direction
pub fn compare_lexicographic(
    a: &Individual,
    b: &Individual,
    directions: &[OptimizationDirection],
) -> Ordering {
    let by_status = status_rank(a).cmp(&status_rank(b));
    if by_status != Ordering::Equal {
        return by_status;
    }

    let (Some(fa), Some(fb)) = (&a.fitness, &b.fitness) else {
        return Ordering::Equal;
    };

    for ((x, y), direction) in fa.values.iter().zip(&fb.values).zip(directions) {
        let ord = match direction {
            OptimizationDirection::Maximize => x.total_cmp(y),
            OptimizationDirection::Minimize => y.total_cmp(x),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Tournament selection: sample `k` pool members with replacement and
/// return the index of the best. Ties keep the first one drawn.
pub fn tournament_selection<R: Rng>(pool: &[Individual], k: usize, rng: &mut R) -> usize {
    let mut best = rng.gen_range(0..pool.len());
    for _ in 1..k.max(1) {
        let candidate = rng.gen_range(0..pool.len());
        if compare_scalar(&pool[candidate], &pool[best]) == Ordering::Greater {
            best = candidate;
        }
    }
    best
}

/// Indices of the `count` best pool members, best first. Stable, so equal
/// individuals keep pool order.
pub fn select_elites(
    pool: &[Individual],
    count: usize,
    directions: &[OptimizationDirection],
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pool.len()).collect();
    if directions.len() > 1 {
        order.sort_by(|&a, &b| compare_lexicographic(&pool[b], &pool[a], directions));
    } else {
        order.sort_by(|&a, &b| compare_scalar(&pool[b], &pool[a]));
    }
    order.truncate(count);
    order
}

/// NSGA-II environmental selection: fill front by front, breaking the
/// overflowing front by crowding distance (least crowded first)
pub fn nsga2_select(
    pool: &[Individual],
    count: usize,
    directions: &[OptimizationDirection],
) -> Vec<usize> {
    let mut individuals = pareto::from_population(pool);
    let fronts = pareto::fast_non_dominated_sort(&mut individuals, directions);

    let mut chosen = Vec::with_capacity(count);
    for front in &fronts {
        if chosen.len() >= count {
            break;
        }
        pareto::calculate_crowding_distance(&mut individuals, front);

        if chosen.len() + front.len() <= count {
            chosen.extend(front.iter().map(|&i| individuals[i].data));
        } else {
            let mut overflow = front.clone();
            overflow.sort_by(|&a, &b| pareto::crowded_order(&individuals[a], &individuals[b]));
            let remaining = count - chosen.len();
            chosen.extend(overflow.into_iter().take(remaining).map(|i| individuals[i].data));
        }
    }
    chosen
}
