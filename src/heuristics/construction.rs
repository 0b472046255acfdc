use crate::error::{GraspError, Result};
use crate::instance::TspInstance;
use crate::solution::Solution;
use ordered_float::OrderedFloat;
use rand::Rng;

pub trait ConstructionHeuristic {
    fn construct<R: Rng + ?Sized>(&self, instance: &TspInstance, rng: &mut R) -> Result<Solution>;
    fn name(&self) -> &str;
}

/// Build the restricted candidate list for one construction step.
///
/// Returns, in increasing index order, every city of `unvisited` whose
/// distance from `last` is at most `min + alpha * (max - min)` over that set.
/// An empty `unvisited` gives an empty list, and so do infinite distances.
pub fn restricted_candidate_list(
    instance: &TspInstance,
    last: usize,
    unvisited: &[usize],
    alpha: f64,
) -> Vec<usize> {
    let costs: Vec<(usize, f64)> = unvisited.iter()
        .map(|&c| (c, instance.distance(last, c)))
        .collect();

    let (Some(min), Some(max)) = (
        costs.iter().map(|&(_, d)| OrderedFloat(d)).min(),
        costs.iter().map(|&(_, d)| OrderedFloat(d)).max(),
    ) else {
        return Vec::new();
    };

    let threshold = min.0 + alpha * (max.0 - min.0);
    costs.into_iter()
        .filter(|&(_, d)| d <= threshold)
        .map(|(c, _)| c)
        .collect()
}

/// Randomized greedy (GRASP) construction
///
/// Grows a tour from a random city. At each step the next city is drawn
/// uniformly from the restricted candidate list around the last city
/// placed. `alpha = 0` is nearest neighbor with random tie-breaking,
/// `alpha = 1` is a uniformly random tour.
#[derive(Debug, Clone)]
pub struct RandomizedGreedy {
    /// Greediness factor in [0, 1]
    pub alpha: f64,
}

impl RandomizedGreedy {
    pub fn new(alpha: f64) -> Self {
        RandomizedGreedy { alpha }
    }

    /// Pure nearest neighbor with a random start
    pub fn nearest_neighbor() -> Self {
        Self::new(0.0)
    }
}

impl Default for RandomizedGreedy {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl ConstructionHeuristic for RandomizedGreedy {
    fn construct<R: Rng + ?Sized>(&self, instance: &TspInstance, rng: &mut R) -> Result<Solution> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(GraspError::InvalidAlpha(self.alpha));
        }
        let n = instance.dimension();
        if n == 0 {
            return Err(GraspError::TooFewCities { found: 0, required: 1 });
        }
        // an infinite distance makes the RCL threshold NaN or infinite
        instance.check_distances()?;

        let start = rng.gen_range(0..n);
        let mut tour = Vec::with_capacity(n);
        tour.push(start);
        let mut unvisited: Vec<usize> = (0..n).filter(|&c| c != start).collect();

        let mut last = start;
        while !unvisited.is_empty() {
            let rcl = restricted_candidate_list(instance, last, &unvisited, self.alpha);
            let next = match rcl.len() {
                0 => return Err(GraspError::NonFiniteDistance { from: last, to: unvisited[0] }),
                1 => rcl[0],
                len => rcl[rng.gen_range(0..len)],
            };

            tour.push(next);
            unvisited.retain(|&c| c != next);
            last = next;
        }

        Solution::from_tour(instance, tour)
    }

    fn name(&self) -> &str {
        if self.alpha == 0.0 {
            "NearestNeighbor"
        } else {
            "RandomizedGreedy"
        }
    }
}
