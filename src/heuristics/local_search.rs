//! Local search improvement for the TSP.
//!
//! The search hill-climbs from a starting tour with random 2-opt moves,
//! accepting only strict improvements, and stops after a fixed number of
//! consecutive non-improving moves.

use crate::error::{GraspError, Result};
use crate::heuristics::perturbation::stochastic_two_opt;
use crate::instance::TspInstance;
use crate::solution::Solution;
use rand::Rng;

/// Trait for local search improvement methods
pub trait LocalSearch {
    fn improve<R: Rng + ?Sized>(
        &self,
        instance: &TspInstance,
        start: Solution,
        rng: &mut R,
    ) -> Result<LocalSearchOutcome>;

    fn name(&self) -> &str;
}

/// Result of one local search call
#[derive(Debug, Clone)]
pub struct LocalSearchOutcome {
    /// Best solution observed
    pub solution: Solution,
    /// Number of neighbors evaluated
    pub evaluations: usize,
    /// Number of accepted (strictly improving) moves
    pub improvements: usize,
}

/// Stochastic 2-opt hill climber with a no-improvement patience
#[derive(Debug, Clone)]
pub struct StochasticTwoOpt {
    /// Consecutive non-improving moves before stopping
    pub max_no_improve: usize,
}

impl StochasticTwoOpt {
    pub fn new(max_no_improve: usize) -> Self {
        StochasticTwoOpt { max_no_improve }
    }
}

impl Default for StochasticTwoOpt {
    fn default() -> Self {
        Self::new(50)
    }
}

impl LocalSearch for StochasticTwoOpt {
    fn improve<R: Rng + ?Sized>(
        &self,
        instance: &TspInstance,
        start: Solution,
        rng: &mut R,
    ) -> Result<LocalSearchOutcome> {
        if self.max_no_improve == 0 {
            return Err(GraspError::InvalidPatience);
        }

        let mut best = start;
        let mut no_improve = 0;
        let mut evaluations = 0;
        let mut improvements = 0;

        while no_improve < self.max_no_improve {
            let neighbor = stochastic_two_opt(best.tour(), rng)?;
            let candidate = Solution::from_tour(instance, neighbor)?;
            evaluations += 1;

            if candidate.improves_on(&best) {
                best = candidate;
                improvements += 1;
                no_improve = 0;
            } else {
                no_improve += 1;
            }
        }

        log::debug!(
            "{} stalled at cost {} after {} evaluations ({} improvements)",
            self.name(), best.cost(), evaluations, improvements
        );

        Ok(LocalSearchOutcome { solution: best, evaluations, improvements })
    }

    fn name(&self) -> &str {
        "Stochastic-2-Opt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_instance() -> TspInstance {
        // Twelve points on a circle, visited in a scrambled order below
        let coords: Vec<(f64, f64)> = (0..12)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / 12.0;
                (100.0 * angle.cos(), 100.0 * angle.sin())
            })
            .collect();
        TspInstance::from_coordinates(&coords)
    }

    #[test]
    fn test_never_worsens() {
        let instance = create_test_instance();
        let start = Solution::from_tour(&instance, vec![0, 6, 1, 7, 2, 8, 3, 9, 4, 10, 5, 11]).unwrap();
        let start_cost = start.cost();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let outcome = StochasticTwoOpt::new(30).improve(&instance, start, &mut rng).unwrap();

        assert!(outcome.solution.cost() <= start_cost);
        assert!(outcome.improvements > 0);
    }

    #[test]
    fn test_evaluation_budget() {
        let instance = create_test_instance();
        let start = Solution::from_tour(&instance, (0..12).rev().collect()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let outcome = StochasticTwoOpt::new(25).improve(&instance, start, &mut rng).unwrap();

        assert_eq!(outcome.evaluations, 25 + outcome.improvements);
    }

    #[test]
    fn test_optimal_start_stays_put() {
        let instance = create_test_instance();
        let start = Solution::from_tour(&instance, (0..12).collect()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let outcome = StochasticTwoOpt::new(20).improve(&instance, start.clone(), &mut rng).unwrap();

        assert_eq!(outcome.improvements, 0);
        assert_eq!(outcome.evaluations, 20);
        assert_eq!(outcome.solution, start);
    }

    #[test]
    fn test_zero_patience_rejected() {
        let instance = create_test_instance();
        let start = Solution::from_tour(&instance, (0..12).collect()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = StochasticTwoOpt::new(0).improve(&instance, start, &mut rng).unwrap_err();
        assert!(matches!(err, GraspError::InvalidPatience));
    }
}
