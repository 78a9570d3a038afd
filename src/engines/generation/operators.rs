use crate::config::{CrossoverMethod, MutationMethod};
use crate::engines::generation::genome::Genome;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::collections::HashSet;

/// Two-point crossover: swap the segment between two cut points
pub fn two_point_crossover<T, R: Rng>(a: &mut [T], b: &mut [T], rng: &mut R) {
    let size = a.len().min(b.len());
    if size < 2 {
        return;
    }

    let mut first = rng.gen_range(1..=size);
    let mut second = rng.gen_range(1..size);
    if second >= first {
        second += 1;
    } else {
        std::mem::swap(&mut first, &mut second);
    }

    a[first..second].swap_with_slice(&mut b[first..second]);
}

/// Uniform crossover: swap each position on a fair coin
pub fn uniform_crossover<T, R: Rng>(a: &mut [T], b: &mut [T], rng: &mut R) {
    let size = a.len().min(b.len());
    for i in 0..size {
        if rng.gen_bool(0.5) {
            std::mem::swap(&mut a[i], &mut b[i]);
        }
    }
}

/// Recombine two genomes in place. Index children may hold duplicates
/// afterwards and must be repaired.
pub fn crossover<R: Rng>(method: CrossoverMethod, a: &mut Genome, b: &mut Genome, rng: &mut R) {
    match (a, b) {
        (Genome::Indices(x), Genome::Indices(y)) => match method {
            CrossoverMethod::TwoPoint => two_point_crossover(x, y, rng),
            CrossoverMethod::Uniform => uniform_crossover(x, y, rng),
        },
        (Genome::Mask(x), Genome::Mask(y)) => match method {
            CrossoverMethod::TwoPoint => two_point_crossover(x, y, rng),
            CrossoverMethod::Uniform => uniform_crossover(x, y, rng),
        },
        _ => log::warn!("Crossover between different encodings skipped"),
    }
}

/// Exchange two distinct random positions
pub fn swap_mutation<T, R: Rng>(genes: &mut [T], rng: &mut R) {
    let len = genes.len();
    if len < 2 {
        return;
    }
    let i = rng.gen_range(0..len);
    let mut j = rng.gen_range(0..len - 1);
    if j >= i {
        j += 1;
    }
    genes.swap(i, j);
}

/// Replace a fraction of the genes (at least one) with distinct genes
/// not already in the portfolio
pub fn substitution_mutation<R: Rng>(
    genes: &mut [usize],
    fraction: f64,
    universe_size: usize,
    rng: &mut R,
) {
    if genes.is_empty() {
        return;
    }

    let present: HashSet<usize> = genes.iter().copied().collect();
    let candidates: Vec<usize> = (0..universe_size).filter(|g| !present.contains(g)).collect();
    let count = substitution_count(genes.len(), fraction).min(candidates.len());
    if count == 0 {
        return;
    }

    let positions = index::sample(rng, genes.len(), count);
    let fresh = index::sample(rng, candidates.len(), count);
    for (pos, pick) in positions.iter().zip(fresh.iter()) {
        genes[pos] = candidates[pick];
    }
}

/// Mask counterpart of substitution: move a fraction of the selected
/// assets to unselected ones, keeping the portfolio size
pub fn mask_substitution<R: Rng>(bits: &mut [bool], fraction: f64, rng: &mut R) {
    let (on, off): (Vec<usize>, Vec<usize>) = (0..bits.len()).partition(|&i| bits[i]);
    let count = substitution_count(on.len(), fraction).min(off.len());
    if on.is_empty() || count == 0 {
        return;
    }

    for pick in index::sample(rng, on.len(), count).iter() {
        bits[on[pick]] = false;
    }
    for pick in index::sample(rng, off.len(), count).iter() {
        bits[off[pick]] = true;
    }
}

fn substitution_count(len: usize, fraction: f64) -> usize {
    ((len as f64 * fraction).ceil() as usize).clamp(1, len.max(1))
}

/// Apply one mutation operator to the whole genome
pub fn mutate<R: Rng>(
    method: MutationMethod,
    genome: &mut Genome,
    substitution_fraction: f64,
    universe_size: usize,
    rng: &mut R,
) {
    match (method, genome) {
        (MutationMethod::Shuffle, Genome::Indices(genes)) => genes.shuffle(rng),
        (MutationMethod::Shuffle, Genome::Mask(bits)) => bits.shuffle(rng),
        (MutationMethod::Swap, Genome::Indices(genes)) => swap_mutation(genes, rng),
        (MutationMethod::Swap, Genome::Mask(bits)) => swap_mutation(bits, rng),
        (MutationMethod::Substitution, Genome::Indices(genes)) => {
            substitution_mutation(genes, substitution_fraction, universe_size, rng)
        }
        (MutationMethod::Substitution, Genome::Mask(bits)) => {
            mask_substitution(bits, substitution_fraction, rng)
        }
    }
}
