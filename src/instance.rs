//! Module for parsing and representing symmetric Euclidean TSP instances.
//!
//! This module handles the TSPLIB format files (EUC_2D edge weights only).
//! Distances are rounded to the nearest integer per edge, as TSPLIB does,
//! and cached in a matrix when the instance is built.

use crate::error::{GraspError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A city in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl City {
    pub fn new(x: f64, y: f64) -> Self {
        City { x, y }
    }
}

impl From<(f64, f64)> for City {
    fn from((x, y): (f64, f64)) -> Self {
        City { x, y }
    }
}

/// Euclidean distance between two cities, rounded to the nearest integer.
///
/// Ties round half up (TSPLIB `nint`). Rounding happens per edge, so tour
/// costs are sums of integers.
#[inline]
pub fn euc_2d(a: &City, b: &City) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    ((dx * dx + dy * dy).sqrt() + 0.5).floor()
}

/// A symmetric Euclidean TSP instance
#[derive(Debug, Clone, Serialize)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// City coordinates, indexed by city id
    pub cities: Vec<City>,
    /// Precomputed rounded distance matrix
    #[serde(skip)]
    distance_matrix: Vec<Vec<f64>>,
}

impl TspInstance {
    /// Build an instance from a coordinate table
    pub fn new(name: impl Into<String>, cities: Vec<City>) -> Self {
        let distance_matrix = Self::compute_distance_matrix(&cities);
        TspInstance {
            name: name.into(),
            comment: String::new(),
            cities,
            distance_matrix,
        }
    }

    /// Build an unnamed instance from raw `(x, y)` pairs
    pub fn from_coordinates(coords: &[(f64, f64)]) -> Self {
        Self::new("unnamed", coords.iter().copied().map(City::from).collect())
    }

    /// Parse an instance from a TSPLIB file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let mut instance = Self::parse(&content)?;
        if instance.name.is_empty() {
            instance.name = path.as_ref()
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        log::info!("Loaded instance {} ({} cities)", instance.name, instance.dimension());
        Ok(instance)
    }

    /// Parse an instance from TSPLIB text
    pub fn parse(content: &str) -> Result<Self> {
        let mut name = String::new();
        let mut comment = String::new();
        let mut dimension: Option<usize> = None;
        let mut coords: Vec<City> = Vec::new();
        let mut in_coords = false;

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            if line == "EOF" {
                break;
            }

            if line.starts_with("NODE_COORD_SECTION") {
                in_coords = true;
                continue;
            }

            if in_coords {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 3 {
                    return Err(GraspError::Parse(format!("Invalid coordinate line: {}", line)));
                }
                let x: f64 = parts[1].parse()
                    .map_err(|_| GraspError::Parse(format!("Invalid x coordinate: {}", parts[1])))?;
                let y: f64 = parts[2].parse()
                    .map_err(|_| GraspError::Parse(format!("Invalid y coordinate: {}", parts[2])))?;
                if !x.is_finite() || !y.is_finite() {
                    return Err(GraspError::Parse(format!("Non-finite coordinate: {}", line)));
                }
                coords.push(City::new(x, y));
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                return Err(GraspError::Parse(format!("Unexpected line: {}", line)));
            };
            let value = value.trim();

            match key.trim() {
                "NAME" => name = value.to_string(),
                "COMMENT" => comment = value.to_string(),
                "DIMENSION" => {
                    dimension = Some(value.parse()
                        .map_err(|_| GraspError::Parse(format!("Invalid dimension: {}", value)))?);
                }
                "EDGE_WEIGHT_TYPE" if value != "EUC_2D" => {
                    return Err(GraspError::Parse(format!("Unsupported edge weight type: {}", value)));
                }
                "TYPE" if value != "TSP" => {
                    return Err(GraspError::Parse(format!("Unsupported problem type: {}", value)));
                }
                _ => {}
            }
        }

        if let Some(expected) = dimension {
            if expected != coords.len() {
                return Err(GraspError::Parse(format!(
                    "DIMENSION is {} but {} coordinates were read", expected, coords.len()
                )));
            }
        }

        let mut instance = Self::new(name, coords);
        instance.comment = comment;
        Ok(instance)
    }

    /// Compute the rounded Euclidean distance matrix
    fn compute_distance_matrix(cities: &[City]) -> Vec<Vec<f64>> {
        cities.iter()
            .map(|a| cities.iter().map(|b| euc_2d(a, b)).collect())
            .collect()
    }

    /// Number of cities
    #[inline]
    pub fn dimension(&self) -> usize {
        self.cities.len()
    }

    /// Get the rounded distance between two cities
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    /// Check that every pairwise distance is a finite number.
    ///
    /// Finite coordinates can still overflow: points about 1e155 apart give
    /// an infinite distance, which no tour cost or candidate list survives.
    pub fn check_distances(&self) -> Result<()> {
        for (i, row) in self.distance_matrix.iter().enumerate() {
            if let Some(j) = row.iter().position(|d| !d.is_finite()) {
                return Err(GraspError::NonFiniteDistance { from: i, to: j });
            }
        }
        Ok(())
    }

    /// Total cyclic tour length, wrap-around edge included.
    ///
    /// `tour` must be a permutation of `0..dimension()`; use
    /// [`Solution::from_tour`](crate::solution::Solution::from_tour) for a
    /// checked evaluation.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        debug_assert!(
            crate::solution::check_permutation(tour, self.dimension()).is_ok(),
            "tour_length called with a non-permutation"
        );

        let n = tour.len();
        (0..n).map(|i| self.distance(tour[i], tour[(i + 1) % n])).sum()
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.dimension();
        let mut total = 0.0;
        let mut count = 0usize;
        let mut max_distance: f64 = 0.0;
        for i in 0..n {
            for j in i + 1..n {
                let d = self.distance(i, j);
                total += d;
                count += 1;
                max_distance = max_distance.max(d);
            }
        }
        let avg_distance = if count > 0 { total / count as f64 } else { 0.0 };

        let (min_x, max_x, min_y, max_y) = self.cities.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(lx, hx, ly, hy), c| (lx.min(c.x), hx.max(c.x), ly.min(c.y), hy.max(c.y)),
        );

        InstanceStatistics {
            name: self.name.clone(),
            dimension: n,
            avg_distance,
            max_distance,
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub avg_distance: f64,
    pub max_distance: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Cities: {}", self.dimension)?;
        writeln!(f, "  Bounding box: [{:.1}, {:.1}] x [{:.1}, {:.1}]",
            self.min_x, self.max_x, self.min_y, self.max_y)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}
