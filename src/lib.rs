//! GRASP TSP Solver Library
//!
//! Approximate solver for the symmetric Euclidean Traveling Salesman Problem
//! using GRASP (Greedy Randomized Adaptive Search Procedure).
//!
//! # Features
//!
//! - TSPLIB (EUC_2D) instance loading with TSPLIB integer distance rounding
//! - Randomized greedy construction with a restricted candidate list
//! - Stochastic 2-opt local search with a no-improvement patience
//! - Multi-start GRASP loop with seeded, reproducible runs
//! - Benchmarking over seeds and greediness values, with CSV export
//!
//! # Example
//!
//! ```no_run
//! use grasp_tsp::instance::TspInstance;
//! use grasp_tsp::heuristics::grasp::{Grasp, GraspConfig};
//!
//! let instance = TspInstance::from_file("berlin52.tsp").unwrap();
//!
//! let config = GraspConfig::default().with_seed(42);
//! let result = Grasp::new(config).run(&instance).unwrap();
//!
//! println!("Solution cost: {}", result.best.cost());
//! ```

pub mod error;
pub mod instance;
pub mod solution;
pub mod heuristics;
pub mod benchmark;

pub use error::GraspError;
pub use heuristics::grasp::{search, Grasp, GraspConfig, GraspResult};
pub use instance::{City, TspInstance};
pub use solution::Solution;
