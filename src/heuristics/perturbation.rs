//! Stochastic 2-opt neighbor generator.
//!
//! Picks two cut points at random and reverses the segment between them.
//! The second cut is redrawn while it falls on the first cut or one of its
//! two neighbors, since those positions give a move that changes at most
//! one edge.

use crate::error::{GraspError, Result};
use rand::Rng;

/// Smallest tour the move is defined for
pub const MIN_TOUR_SIZE: usize = 4;

/// Cap on second-cut redraws. With at most 3 excluded positions out of 4 or
/// more, hitting it means the random source is broken.
pub const MAX_CUT_RESAMPLES: usize = 1_000;

/// Return a copy of `tour` with the positions `[c1, c2)` reversed, for two
/// random non-adjacent cut points `c1 < c2`.
pub fn stochastic_two_opt<R: Rng + ?Sized>(tour: &[usize], rng: &mut R) -> Result<Vec<usize>> {
    let n = tour.len();
    if n < MIN_TOUR_SIZE {
        return Err(GraspError::TooFewCities { found: n, required: MIN_TOUR_SIZE });
    }

    let (c1, c2) = pick_cuts(n, rng)?;

    let mut perm = tour.to_vec();
    perm[c1..c2].reverse();
    Ok(perm)
}

/// Draw the two cut points, ordered
fn pick_cuts<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<(usize, usize)> {
    let c1 = rng.gen_range(0..n);
    let exclude = [c1, (c1 + 1) % n, (c1 + n - 1) % n];

    for _ in 0..MAX_CUT_RESAMPLES {
        let c2 = rng.gen_range(0..n);
        if !exclude.contains(&c2) {
            return Ok(if c2 < c1 { (c2, c1) } else { (c1, c2) });
        }
    }

    Err(GraspError::ResampleExhausted(MAX_CUT_RESAMPLES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_does_not_mutate_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tour: Vec<usize> = (0..10).collect();
        let neighbor = stochastic_two_opt(&tour, &mut rng).unwrap();
        assert_eq!(tour, (0..10).collect::<Vec<_>>());
        assert_ne!(neighbor, tour);
    }

    #[test]
    fn test_cuts_are_never_adjacent() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for n in 4..12 {
            for _ in 0..200 {
                let (c1, c2) = pick_cuts(n, &mut rng).unwrap();
                assert!(c1 < c2 && c2 < n);
                assert!(c2 - c1 >= 2);
                assert!(!(c1 == 0 && c2 == n - 1));
            }
        }
    }

    #[test]
    fn test_reverses_exactly_one_segment() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tour: Vec<usize> = (0..8).collect();
        let neighbor = stochastic_two_opt(&tour, &mut rng).unwrap();

        let first = neighbor.iter().zip(&tour).position(|(a, b)| a != b).unwrap();
        let last = neighbor.iter().zip(&tour).rposition(|(a, b)| a != b).unwrap();
        let mut segment = neighbor[first..=last].to_vec();
        segment.reverse();
        assert_eq!(segment, tour[first..=last].to_vec());
    }

    #[test]
    fn test_rejects_small_tours() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = stochastic_two_opt(&[0, 1, 2], &mut rng).unwrap_err();
        assert!(matches!(err, GraspError::TooFewCities { found: 3, required: 4 }));
    }

    #[test]
    fn test_stuck_source_exhausts_resampling() {
        // A constant source always redraws the first cut
        let mut rng = StepRng::new(0, 0);
        let err = stochastic_two_opt(&[0, 1, 2, 3, 4], &mut rng).unwrap_err();
        assert!(matches!(err, GraspError::ResampleExhausted(MAX_CUT_RESAMPLES)));
    }

    proptest! {
        #[test]
        fn prop_neighbor_is_permutation(n in 4usize..60, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tour: Vec<usize> = (0..n).rev().collect();
            let neighbor = stochastic_two_opt(&tour, &mut rng).unwrap();
            let mut sorted = neighbor.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
        }
    }
}
