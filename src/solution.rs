//! Solution representation for the TSP.
//!
//! A [`Solution`] pairs a tour (a permutation of city indices, read as a
//! cycle) with its evaluated cost. Solutions are never modified after they
//! are built; a better one simply replaces the old one.

use crate::error::{GraspError, Result};
use crate::instance::TspInstance;
use serde::Serialize;

/// A complete tour and its cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    tour: Vec<usize>,
    cost: f64,
}

impl Solution {
    /// Evaluate a tour against an instance.
    ///
    /// Fails with [`GraspError::InvalidTour`] if `tour` is not a permutation
    /// of the instance's cities.
    pub fn from_tour(instance: &TspInstance, tour: Vec<usize>) -> Result<Self> {
        check_permutation(&tour, instance.dimension())?;
        let cost = instance.tour_length(&tour);
        Ok(Solution { tour, cost })
    }

    /// The visiting order
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// Total cyclic cost
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Whether this solution is strictly cheaper than `other`
    #[inline]
    pub fn improves_on(&self, other: &Solution) -> bool {
        self.cost < other.cost
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution")?;
        writeln!(f, "  Cost: {}", self.cost)?;
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}

/// Check that `tour` visits each of `0..n` exactly once
pub fn check_permutation(tour: &[usize], n: usize) -> Result<()> {
    if tour.len() != n {
        return Err(GraspError::InvalidTour {
            expected: n,
            reason: format!("length is {}", tour.len()),
        });
    }

    let mut seen = vec![false; n];
    for &city in tour {
        if city >= n {
            return Err(GraspError::InvalidTour {
                expected: n,
                reason: format!("city {} is out of range", city),
            });
        }
        if seen[city] {
            return Err(GraspError::InvalidTour {
                expected: n,
                reason: format!("city {} appears twice", city),
            });
        }
        seen[city] = true;
    }

    Ok(())
}
