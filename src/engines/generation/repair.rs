use crate::error::{OptimizerError, Result};
use rand::seq::index;
use rand::Rng;
use std::collections::HashSet;

/// Restore the portfolio invariant on an index gene sequence: exactly
/// `portfolio_size` distinct genes, all below `universe_size`.
///
/// Unique in-range genes keep their first-occurrence order; missing slots
/// are filled with genes drawn uniformly from the ones not yet present, and
/// surplus genes are cut from the tail. Fails only when the universe cannot
/// hold a portfolio of the requested size.
pub fn repair<R: Rng>(
    genes: &[usize],
    portfolio_size: usize,
    universe_size: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if universe_size < portfolio_size {
        return Err(OptimizerError::UniverseTooSmall {
            universe: universe_size,
            portfolio_size,
        });
    }

    let mut seen = HashSet::with_capacity(genes.len());
    let mut repaired: Vec<usize> = genes
        .iter()
        .copied()
        .filter(|&gene| gene < universe_size && seen.insert(gene))
        .collect();
    repaired.truncate(portfolio_size);

    let missing = portfolio_size - repaired.len();
    if missing > 0 {
        let candidates: Vec<usize> = (0..universe_size).filter(|g| !seen.contains(g)).collect();
        for pick in index::sample(rng, candidates.len(), missing).iter() {
            repaired.push(candidates[pick]);
        }
    }

    Ok(repaired)
}

/// True when the genes already satisfy the invariant
pub fn is_valid_portfolio(genes: &[usize], portfolio_size: usize, universe_size: usize) -> bool {
    let mut seen = HashSet::with_capacity(genes.len());
    genes.len() == portfolio_size && genes.iter().all(|&g| g < universe_size && seen.insert(g))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_keeps_first_occurrence_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let repaired = repair(&[4, 2, 4, 7, 2], 3, 10, &mut rng).unwrap();
        assert_eq!(repaired, vec![4, 2, 7]);
    }

    #[test]
    fn test_fills_missing_genes() {
        let mut rng = StdRng::seed_from_u64(2);
        let repaired = repair(&[3, 3, 3, 3], 4, 6, &mut rng).unwrap();
        assert_eq!(repaired[0], 3);
        assert!(is_valid_portfolio(&repaired, 4, 6));
    }

    #[test]
    fn test_truncates_surplus() {
        let mut rng = StdRng::seed_from_u64(3);
        let repaired = repair(&[0, 1, 2, 3, 4], 3, 10, &mut rng).unwrap();
        assert_eq!(repaired, vec![0, 1, 2]);
    }

    #[test]
    fn test_drops_out_of_range() {
        let mut rng = StdRng::seed_from_u64(4);
        let repaired = repair(&[12, 1, 99], 3, 5, &mut rng).unwrap();
        assert_eq!(repaired[0], 1);
        assert!(is_valid_portfolio(&repaired, 3, 5));
    }

    #[test]
    fn test_exact_universe_fill() {
        // U == N leaves exactly one possible gene set
        let mut rng = StdRng::seed_from_u64(5);
        let mut repaired = repair(&[2, 2, 2], 3, 3, &mut rng).unwrap();
        repaired.sort_unstable();
        assert_eq!(repaired, vec![0, 1, 2]);
    }

    #[test]
    fn test_universe_too_small() {
        let mut rng = StdRng::seed_from_u64(6);
        assert!(matches!(
            repair(&[0, 1, 2], 5, 3, &mut rng),
            Err(OptimizerError::UniverseTooSmall { universe: 3, portfolio_size: 5 })
        ));
    }
}
