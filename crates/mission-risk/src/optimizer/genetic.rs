use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

const CROSSOVER_RATE: f64 = 0.9;
const MUTATION_RATE: f64 = 0.2;

/// A candidate boarding order over `0..n`.
pub(crate) type Permutation = Vec<usize>;

/// Outcome of one permutation search.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchOutcome {
    pub best: Permutation,
    pub fitness: f64,
    pub generations: u32,
}

/// Search limits; the search stops at whichever bound is hit first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchLimits {
    pub population: usize,
    pub generations: u32,
    pub deadline: Option<Instant>,
}

/// Sum of squared displacement from the identity order. Lower is better; 0 is ideal.
pub(crate) fn displacement(permutation: &[usize]) -> f64 {
    permutation
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let delta = index as f64 - value as f64;
            delta * delta
        })
        .sum()
}

/// Swap two randomly chosen positions.
pub(crate) fn mutate<R: Rng + ?Sized>(permutation: &mut [usize], rng: &mut R) {
    if permutation.len() < 2 {
        return;
    }
    let i = rng.gen_range(0..permutation.len());
    let j = rng.gen_range(0..permutation.len());
    permutation.swap(i, j);
}

/// Single-point crossover: the mother's prefix up to a random cut, then the father's
/// remaining genes in the father's order, so the child stays a permutation.
pub(crate) fn crossover<R: Rng + ?Sized>(
    mother: &[usize],
    father: &[usize],
    rng: &mut R,
) -> Permutation {
    let cut = rng.gen_range(0..=mother.len());
    let mut child: Permutation = mother[..cut].to_vec();
    let mut taken = vec![false; mother.len()];
    for &gene in &child {
        taken[gene] = true;
    }
    child.extend(father.iter().copied().filter(|&gene| !taken[gene]));
    child
}

fn tournament<'a, R: Rng + ?Sized>(
    population: &'a [(Permutation, f64)],
    rng: &mut R,
) -> &'a Permutation {
    let a = &population[rng.gen_range(0..population.len())];
    let b = &population[rng.gen_range(0..population.len())];
    if a.1 <= b.1 {
        &a.0
    } else {
        &b.0
    }
}

/// Evolve a population of permutations of `0..n` towards minimal displacement.
pub(crate) fn evolve<R: Rng + ?Sized>(
    n: usize,
    limits: SearchLimits,
    rng: &mut R,
) -> SearchOutcome {
    let size = limits.population.max(2);
    let mut population: Vec<(Permutation, f64)> = (0..size)
        .map(|_| {
            let mut candidate: Permutation = (0..n).collect();
            candidate.shuffle(rng);
            let fitness = displacement(&candidate);
            (candidate, fitness)
        })
        .collect();
    sort_by_fitness(&mut population);

    let mut generations = 0;
    while generations < limits.generations {
        if population[0].1 == 0.0 {
            break;
        }
        if limits.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            debug!(generations, "optimizer deadline reached");
            break;
        }

        let mut next = Vec::with_capacity(size);
        next.push(population[0].clone());
        while next.len() < size {
            let mother = tournament(&population, rng);
            let mut child = if rng.gen_bool(CROSSOVER_RATE) {
                let father = tournament(&population, rng);
                crossover(mother, father, rng)
            } else {
                mother.clone()
            };
            if rng.gen_bool(MUTATION_RATE) {
                mutate(&mut child, rng);
            }
            let fitness = displacement(&child);
            next.push((child, fitness));
        }

        population = next;
        sort_by_fitness(&mut population);
        generations += 1;

        if generations % 25 == 0 {
            debug!(generations, best = population[0].1, "optimizer progress");
        }
    }

    let (best, fitness) = population.swap_remove(0);
    SearchOutcome {
        best,
        fitness,
        generations,
    }
}

fn sort_by_fitness(population: &mut [(Permutation, f64)]) {
    population.sort_by(|a, b| a.1.total_cmp(&b.1));
}
