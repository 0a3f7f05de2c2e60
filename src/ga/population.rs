//! GA population with cost statistics.

use rand::Rng;

use crate::error::Result;
use crate::problem::Problem;
use crate::solution::Solution;

/// A generation of solutions.
#[derive(Debug, Clone)]
pub struct Population<'p> {
    individuals: Vec<Solution<'p>>,
}

impl<'p> Population<'p> {
    /// `size` independent random solutions.
    pub fn random<R: Rng + ?Sized>(problem: &'p Problem, size: usize, rng: &mut R) -> Result<Self> {
        let individuals = (0..size)
            .map(|_| Solution::random(problem, &mut *rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { individuals })
    }

    pub fn from_individuals(individuals: Vec<Solution<'p>>) -> Self {
        Self { individuals }
    }

    pub fn individuals(&self) -> &[Solution<'p>] {
        &self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn push(&mut self, individual: Solution<'p>) {
        self.individuals.push(individual);
    }

    /// Inverse cost `max_cost - cost` of every individual, in order.
    pub fn fitness(&self) -> Vec<f64> {
        self.individuals
            .iter()
            .map(|s| s.problem().max_cost() - s.cost())
            .collect()
    }

    /// The cheapest individual (first one on ties).
    pub fn best(&self) -> Option<&Solution<'p>> {
        self.individuals
            .iter()
            .min_by(|a, b| a.cost().total_cmp(&b.cost()))
    }

    /// Lowest cost, `f64::INFINITY` when empty.
    pub fn min_cost(&self) -> f64 {
        self.best().map_or(f64::INFINITY, Solution::cost)
    }

    /// Mean cost, `0.0` when empty.
    pub fn avg_cost(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        self.individuals.iter().map(Solution::cost).sum::<f64>() / self.len() as f64
    }

    /// Removes and returns the `k` cheapest individuals, cheapest first.
    pub fn remove_best(&mut self, k: usize) -> Vec<Solution<'p>> {
        self.individuals.sort_by(|a, b| a.cost().total_cmp(&b.cost()));
        let k = k.min(self.individuals.len());
        self.individuals.drain(..k).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::random::create_rng;

    #[test]
    fn test_random_population_statistics() {
        let problem = fixtures::grid_problem(20, 9, 2);
        let population = Population::random(&problem, 12, &mut create_rng(5)).unwrap();
        assert_eq!(population.len(), 12);

        let costs: Vec<f64> = population.individuals().iter().map(Solution::cost).collect();
        let min = costs.iter().copied().fold(f64::INFINITY, f64::min);
        let avg = costs.iter().sum::<f64>() / costs.len() as f64;
        assert_eq!(population.min_cost(), min);
        assert!((population.avg_cost() - avg).abs() < 1e-9);
    }

    #[test]
    fn test_fitness_is_inverse_cost() {
        let problem = fixtures::grid_problem(20, 9, 1);
        let population = Population::random(&problem, 6, &mut create_rng(8)).unwrap();
        for (f, s) in population.fitness().iter().zip(population.individuals()) {
            assert!(*f >= 0.0, "fitness must be non-negative, got {f}");
            assert!((f + s.cost() - problem.max_cost()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_remove_best_takes_cheapest() {
        let problem = fixtures::grid_problem(20, 9, 1);
        let mut population = Population::random(&problem, 10, &mut create_rng(13)).unwrap();
        let min = population.min_cost();
        let best = population.remove_best(3);
        assert_eq!(best.len(), 3);
        assert_eq!(population.len(), 7);
        assert_eq!(best[0].cost(), min);
        assert!(best.windows(2).all(|w| w[0].cost() <= w[1].cost()));
        let worst_removed = best[2].cost();
        assert!(population.individuals().iter().all(|s| s.cost() >= worst_removed));
    }

    #[test]
    fn test_remove_best_caps_at_len() {
        let problem = fixtures::grid_problem(5, 4, 1);
        let mut population = Population::random(&problem, 2, &mut create_rng(1)).unwrap();
        assert_eq!(population.remove_best(5).len(), 2);
        assert!(population.is_empty());
        assert_eq!(population.min_cost(), f64::INFINITY);
        assert_eq!(population.avg_cost(), 0.0);
    }
}
