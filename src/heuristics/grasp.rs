//! GRASP (Greedy Randomized Adaptive Search Procedure) for the TSP.
//!
//! # Algorithm
//!
//! Repeat `max_iterations` times:
//! 1. Build a tour with [`RandomizedGreedy`] (restricted candidate list
//!    controlled by `alpha`)
//! 2. Refine it with [`StochasticTwoOpt`] until `max_no_improve`
//!    consecutive moves fail to improve it
//! 3. Keep it if it is strictly cheaper than the best tour so far
//!
//! Iterations are independent apart from the running best.

use crate::error::{GraspError, Result};
use crate::heuristics::construction::{ConstructionHeuristic, RandomizedGreedy};
use crate::heuristics::local_search::{LocalSearch, StochasticTwoOpt};
use crate::heuristics::perturbation::MIN_TOUR_SIZE;
use crate::instance::{City, TspInstance};
use crate::solution::Solution;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// GRASP configuration
///
/// Defaults are 50 iterations, a patience of 50 and `alpha = 0.3`.
///
/// ```
/// use grasp_tsp::heuristics::grasp::GraspConfig;
///
/// let config = GraspConfig::default()
///     .with_max_iterations(100)
///     .with_alpha(0.1)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraspConfig {
    /// Number of construction + local search rounds
    pub max_iterations: usize,
    /// Local search patience (consecutive non-improving moves)
    pub max_no_improve: usize,
    /// Greediness factor in [0, 1]
    pub alpha: f64,
    /// Random seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GraspConfig {
    fn default() -> Self {
        GraspConfig {
            max_iterations: 50,
            max_no_improve: 50,
            alpha: 0.3,
            seed: None,
        }
    }
}

impl GraspConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(GraspError::InvalidIterations);
        }
        if self.max_no_improve == 0 {
            return Err(GraspError::InvalidPatience);
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(GraspError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }
}

/// Result of a GRASP run
#[derive(Debug, Clone, Serialize)]
pub struct GraspResult {
    /// Best solution found
    pub best: Solution,
    /// Iterations executed
    pub iterations: usize,
    /// Iteration (1-based) at which the best solution was found
    pub best_iteration: usize,
    /// Best cost after each iteration
    pub cost_history: Vec<f64>,
    /// Wall time in seconds
    pub computation_time: f64,
}

/// GRASP runner
#[derive(Debug, Clone, Default)]
pub struct Grasp {
    pub config: GraspConfig,
}

impl Grasp {
    pub fn new(config: GraspConfig) -> Self {
        Grasp { config }
    }

    /// Run with the configured seed
    pub fn run(&self, instance: &TspInstance) -> Result<GraspResult> {
        self.run_with_progress(instance, |_, _| {})
    }

    /// Run with the configured seed, calling `progress(iteration, best_cost)`
    /// once per iteration
    pub fn run_with_progress<F>(&self, instance: &TspInstance, progress: F) -> Result<GraspResult>
    where
        F: FnMut(usize, f64),
    {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.run_with_rng(instance, &mut rng, progress)
    }

    /// Run drawing all randomness from `rng`; `config.seed` is ignored
    pub fn run_with_rng<R, F>(
        &self,
        instance: &TspInstance,
        rng: &mut R,
        mut progress: F,
    ) -> Result<GraspResult>
    where
        R: Rng + ?Sized,
        F: FnMut(usize, f64),
    {
        self.config.validate()?;
        let n = instance.dimension();
        if n < MIN_TOUR_SIZE {
            return Err(GraspError::TooFewCities { found: n, required: MIN_TOUR_SIZE });
        }
        instance.check_distances()?;

        let start = std::time::Instant::now();
        let construction = RandomizedGreedy::new(self.config.alpha);
        let local_search = StochasticTwoOpt::new(self.config.max_no_improve);

        log::info!(
            "GRASP ({} + {}) on {} ({} cities): {} iterations, patience {}, alpha {}",
            construction.name(), local_search.name(), instance.name, n,
            self.config.max_iterations, self.config.max_no_improve, self.config.alpha
        );

        let mut best: Option<Solution> = None;
        let mut best_iteration = 0;
        let mut cost_history = Vec::with_capacity(self.config.max_iterations);

        for iteration in 1..=self.config.max_iterations {
            let candidate = construction.construct(instance, rng)?;
            let constructed_cost = candidate.cost();
            let candidate = local_search.improve(instance, candidate, rng)?.solution;

            log::debug!(
                "iteration {}: constructed {}, refined {}",
                iteration, constructed_cost, candidate.cost()
            );

            let replace = match &best {
                None => true,
                Some(current) => candidate.improves_on(current),
            };
            if replace {
                best = Some(candidate);
                best_iteration = iteration;
            }

            if let Some(current) = &best {
                cost_history.push(current.cost());
                progress(iteration, current.cost());
            }
        }

        let best = best.ok_or(GraspError::InvalidIterations)?;
        let computation_time = start.elapsed().as_secs_f64();

        log::info!(
            "GRASP finished: best cost {} at iteration {} ({:.3}s)",
            best.cost(), best_iteration, computation_time
        );

        Ok(GraspResult {
            best,
            iterations: self.config.max_iterations,
            best_iteration,
            cost_history,
            computation_time,
        })
    }
}

/// Solve a city table with GRASP, drawing randomness from `rng`.
///
/// Requires at least four cities, positive `max_iter` and `max_no_improv`,
/// and `alpha` in [0, 1].
pub fn search<R: Rng + ?Sized>(
    cities: &[City],
    max_iter: usize,
    max_no_improv: usize,
    alpha: f64,
    rng: &mut R,
) -> Result<Solution> {
    let instance = TspInstance::new("search", cities.to_vec());
    let config = GraspConfig::default()
        .with_max_iterations(max_iter)
        .with_max_no_improve(max_no_improv)
        .with_alpha(alpha);

    Ok(Grasp::new(config).run_with_rng(&instance, rng, |_, _| {})?.best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_cities() -> Vec<City> {
        (0..5)
            .flat_map(|row| (0..4).map(move |col| City::new(col as f64 * 10.0, row as f64 * 10.0)))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = GraspConfig::default();
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.max_no_improve, 50);
        assert!((config.alpha - 0.3).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            GraspConfig::default().with_max_iterations(0).validate(),
            Err(GraspError::InvalidIterations)
        ));
        assert!(matches!(
            GraspConfig::default().with_max_no_improve(0).validate(),
            Err(GraspError::InvalidPatience)
        ));
        assert!(matches!(
            GraspConfig::default().with_alpha(1.01).validate(),
            Err(GraspError::InvalidAlpha(_))
        ));
    }

    #[test]
    fn test_search_returns_permutation() {
        let cities = grid_cities();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let best = search(&cities, 10, 30, 0.3, &mut rng).unwrap();

        let mut sorted = best.tour().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..cities.len()).collect::<Vec<_>>());
        // 20 grid points 10 apart: no tour is shorter than 200
        assert!(best.cost() >= 200.0);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let cities = grid_cities();
        let a = search(&cities, 8, 20, 0.5, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        let b = search(&cities, 8, 20, 0.5, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);

        let instance = TspInstance::new("grid", cities);
        let config = GraspConfig::default().with_max_iterations(5).with_seed(3);
        let r1 = Grasp::new(config.clone()).run(&instance).unwrap();
        let r2 = Grasp::new(config).run(&instance).unwrap();
        assert_eq!(r1.best, r2.best);
        assert_eq!(r1.cost_history, r2.cost_history);
    }

    #[test]
    fn test_best_is_monotone() {
        let instance = TspInstance::new("grid", grid_cities());
        let config = GraspConfig::default().with_max_iterations(15).with_max_no_improve(10).with_seed(1);

        let mut observed = Vec::new();
        let result = Grasp::new(config)
            .run_with_progress(&instance, |iteration, cost| observed.push((iteration, cost)))
            .unwrap();

        assert_eq!(observed.len(), 15);
        assert_eq!(observed.iter().map(|&(i, _)| i).collect::<Vec<_>>(), (1..=15).collect::<Vec<_>>());
        assert!(observed.windows(2).all(|w| w[1].1 <= w[0].1));
        assert!(result.best.cost() <= observed[0].1);
        assert_eq!(result.best.cost(), observed[14].1);
        assert_eq!(result.cost_history[result.best_iteration - 1], result.best.cost());
    }

    #[test]
    fn test_rejects_small_instances() {
        let cities = vec![City::new(0.0, 0.0), City::new(1.0, 0.0), City::new(0.0, 1.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = search(&cities, 5, 5, 0.3, &mut rng).unwrap_err();
        assert!(matches!(err, GraspError::TooFewCities { found: 3, required: 4 }));
    }

    #[test]
    fn test_overflowing_coordinates_are_rejected() {
        let cities: Vec<City> = [(0.0, 0.0), (1e200, 0.0), (0.0, 1e200), (-1e200, 0.0), (1.0, 1.0)]
            .into_iter()
            .map(City::from)
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = search(&cities, 2, 5, 0.0, &mut rng).unwrap_err();
        assert!(matches!(err, GraspError::NonFiniteDistance { from: 1, to: 2 }));
    }

    #[test]
    fn test_rectangle_is_solved() {
        let cities: Vec<City> = [(0.0, 0.0), (0.0, 3.0), (4.0, 3.0), (4.0, 0.0)]
            .into_iter()
            .map(City::from)
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let best = search(&cities, 5, 10, 0.0, &mut rng).unwrap();
        assert_eq!(best.cost(), 14.0);
    }
}
