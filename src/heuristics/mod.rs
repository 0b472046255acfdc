//! Heuristics module for the TSP.
//!
//! This module exports the GRASP building blocks: randomized greedy
//! construction, the stochastic 2-opt move, local search, and the GRASP loop.

pub mod construction;
pub mod perturbation;
pub mod local_search;
pub mod grasp;

pub use construction::*;
pub use perturbation::*;
pub use local_search::*;
pub use grasp::*;
