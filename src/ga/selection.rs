//! Selection strategies for the GA.
//!
//! Selection determines which individuals are chosen as parents for
//! crossover. Every strategy reads a fitness slice aligned with the
//! population, where **higher fitness is better** (fitness is the inverse
//! cost `max_cost - cost`).
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_placement::ga::Selection;
/// use u_placement::random::create_rng;
///
/// let fitness = [1.0, 10.0, 0.5];
/// let mut rng = create_rng(3);
/// let parent = Selection::Tournament(3).select(&fitness, &mut rng);
/// assert!(parent < fitness.len());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: pick `k` individuals at random, select the best.
    ///
    /// Higher `k` = stronger selection pressure.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// **Warning**: Susceptible to super-individual dominance when
    /// fitness variance is high.
    ///
    /// # Complexity
    /// O(n) per selection (linear scan)
    Roulette,

    /// Linear rank selection: weight `n - rank`, best rank 0.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Roulette
    }
}

impl Selection {
    /// Select a parent index from the population's fitness values.
    ///
    /// # Panics
    /// Panics if `fitness` is empty.
    pub fn select<R: Rng + ?Sized>(&self, fitness: &[f64], rng: &mut R) -> usize {
        assert!(!fitness.is_empty(), "cannot select from empty population");

        match self {
            Selection::Tournament(k) => tournament(fitness, *k, rng),
            Selection::Roulette => roulette(fitness, rng),
            Selection::Rank => rank(fitness, rng),
        }
    }
}

/// Tournament selection: pick k random individuals, return the fittest.
fn tournament<R: Rng + ?Sized>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = fitness.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if fitness[idx] > fitness[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}

/// Roulette wheel selection proportional to fitness.
///
/// Falls back to a uniform pick when the total fitness is zero.
fn roulette<R: Rng + ?Sized>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    let total: f64 = fitness.iter().map(|f| f.max(0.0)).sum();
    if total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &f) in fitness.iter().enumerate() {
        cumulative += f.max(0.0);
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

/// Rank-based selection using linear ranking.
fn rank<R: Rng + ?Sized>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    // Best (highest fitness) first.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (rank, &idx) in order.iter().enumerate() {
        cumulative += (n - rank) as f64;
        if cumulative > threshold {
            return idx;
        }
    }

    order[n - 1]
}
