//! Benchmarking and experimentation module for GRASP.
//!
//! Runs GRASP several times per instance with consecutive seeds, compares
//! greediness values, collects statistics and exports them.

use crate::error::Result;
use crate::heuristics::grasp::{Grasp, GraspConfig};
use crate::instance::TspInstance;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

/// Optimal tour lengths of TSPLIB EUC_2D instances
const KNOWN_OPTIMA: &[(&str, f64)] = &[
    ("berlin52", 7542.0),
    ("eil51", 426.0),
    ("eil76", 538.0),
    ("eil101", 629.0),
    ("st70", 675.0),
    ("pr76", 108159.0),
    ("rat99", 1211.0),
    ("kroA100", 21282.0),
    ("kroB100", 22141.0),
    ("lin105", 14379.0),
    ("ch130", 6110.0),
    ("ch150", 6528.0),
    ("a280", 2579.0),
];

/// Optimal tour length of a TSPLIB instance, if known
pub fn known_optimum(name: &str) -> Option<f64> {
    KNOWN_OPTIMA.iter().find(|(n, _)| *n == name).map(|&(_, cost)| cost)
}

/// Result of a single GRASP run on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Algorithm label, including alpha
    pub algorithm: String,
    /// Instance name
    pub instance: String,
    /// Number of cities
    pub dimension: usize,
    /// Run index
    pub run: usize,
    /// Seed used for the run
    pub seed: u64,
    /// Greediness factor
    pub alpha: f64,
    /// Best tour cost
    pub cost: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Iteration at which the best tour was found
    pub best_iteration: usize,
    /// Gap to best known in percent (if available)
    pub gap_to_best: Option<f64>,
}

/// Aggregated statistics for one algorithm on one instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    pub algorithm: String,
    pub instance: String,
    pub num_runs: usize,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub avg_cost: f64,
    pub std_cost: f64,
    pub avg_time: f64,
    pub avg_gap: Option<f64>,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of runs per configuration
    pub num_runs: usize,
    /// Seed of the first run; run `k` uses `base_seed + k`, wrapping at `u64::MAX`
    pub base_seed: u64,
    /// GRASP parameters (its seed is overridden per run)
    pub grasp: GraspConfig,
    /// Alpha values tried by [`Benchmark::compare_alphas`]
    pub alphas: Vec<f64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            base_seed: 0,
            grasp: GraspConfig::default(),
            alphas: (0..=10).map(|k| k as f64 / 10.0).collect(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
    best_known: HashMap<String, f64>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        let best_known = KNOWN_OPTIMA.iter()
            .map(|&(name, cost)| (name.to_string(), cost))
            .collect();
        Benchmark {
            config,
            results: Vec::new(),
            best_known,
        }
    }

    /// Set best known solution for an instance
    pub fn set_best_known(&mut self, instance_name: &str, cost: f64) {
        self.best_known.insert(instance_name.to_string(), cost);
    }

    /// Run GRASP `num_runs` times with the configured parameters
    pub fn run_instance(&mut self, instance: &TspInstance) -> Result<()> {
        log::info!("Running benchmark on instance: {}", instance.name);
        let grasp = self.config.grasp.clone();
        for run in 0..self.config.num_runs {
            self.run_grasp(instance, grasp.clone(), run)?;
        }
        Ok(())
    }

    /// Run GRASP `num_runs` times for every configured alpha
    pub fn compare_alphas(&mut self, instance: &TspInstance) -> Result<()> {
        log::info!("Comparing {} alpha values on {}", self.config.alphas.len(), instance.name);
        let alphas = self.config.alphas.clone();
        for alpha in alphas {
            let grasp = self.config.grasp.clone().with_alpha(alpha);
            for run in 0..self.config.num_runs {
                self.run_grasp(instance, grasp.clone(), run)?;
            }
        }
        Ok(())
    }

    fn run_grasp(&mut self, instance: &TspInstance, config: GraspConfig, run: usize) -> Result<()> {
        let seed = self.config.base_seed.wrapping_add(run as u64);
        let alpha = config.alpha;
        let result = Grasp::new(config.with_seed(seed)).run(instance)?;

        let cost = result.best.cost();
        let gap_to_best = self.best_known.get(&instance.name)
            .map(|&best| (cost - best) / best * 100.0);

        log::debug!("{} run {} (seed {}): cost {}", instance.name, run, seed, cost);

        self.results.push(RunResult {
            algorithm: format!("GRASP(alpha={:.2})", alpha),
            instance: instance.name.clone(),
            dimension: instance.dimension(),
            run,
            seed,
            alpha,
            cost,
            time: result.computation_time,
            best_iteration: result.best_iteration,
            gap_to_best,
        });
        Ok(())
    }

    /// Compute statistics for each (algorithm, instance) pair
    pub fn compute_statistics(&self) -> Vec<RunStatistics> {
        let mut groups: BTreeMap<(String, String), Vec<&RunResult>> = BTreeMap::new();
        for result in &self.results {
            groups.entry((result.algorithm.clone(), result.instance.clone()))
                .or_default()
                .push(result);
        }

        groups.into_iter()
            .map(|((algorithm, instance), runs)| {
                let costs: Vec<f64> = runs.iter().map(|r| r.cost).collect();
                let times: Vec<f64> = runs.iter().map(|r| r.time).collect();
                let gaps: Vec<f64> = runs.iter().filter_map(|r| r.gap_to_best).collect();

                let avg_gap = if gaps.is_empty() { None } else { Some(gaps.iter().mean()) };

                RunStatistics {
                    algorithm,
                    instance,
                    num_runs: runs.len(),
                    best_cost: Statistics::min(costs.iter()),
                    worst_cost: Statistics::max(costs.iter()),
                    avg_cost: costs.iter().mean(),
                    std_cost: costs.iter().population_std_dev(),
                    avg_time: times.iter().mean(),
                    avg_gap,
                }
            })
            .collect()
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        GRASP TSP Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!("Generated: {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));
        report.push_str(&format!(
            "Runs: {}, iterations: {}, patience: {}\n\n",
            self.config.num_runs, self.config.grasp.max_iterations, self.config.grasp.max_no_improve
        ));

        report.push_str("-".repeat(96).as_str());
        report.push('\n');
        report.push_str(&format!("{:<12} {:<20} {:>6} {:>12} {:>12} {:>10} {:>10} {:>10}\n",
            "Instance", "Algorithm", "Runs", "Best Cost", "Avg Cost", "Std", "Avg Gap%", "Avg Time"));
        report.push_str("-".repeat(96).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            let gap_str = stat.avg_gap
                .map(|g| format!("{:.2}%", g))
                .unwrap_or_else(|| "-".to_string());

            report.push_str(&format!("{:<12} {:<20} {:>6} {:>12.0} {:>12.2} {:>10.2} {:>10} {:>10.4}\n",
                stat.instance,
                stat.algorithm,
                stat.num_runs,
                stat.best_cost,
                stat.avg_cost,
                stat.std_cost,
                gap_str,
                stat.avg_time));
        }

        report.push_str("-".repeat(96).as_str());
        report.push('\n');

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

/// Helper function to load instances from a directory
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Vec<TspInstance> {
    let mut instances = Vec::new();

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "tsp").unwrap_or(false) {
                match TspInstance::from_file(&path) {
                    Ok(instance) => instances.push(instance),
                    Err(e) => log::warn!("Skipping {:?}: {}", path, e),
                }
            }
        }
    }

    // Sort by dimension
    instances.sort_by_key(|i| i.dimension());

    instances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> BenchmarkConfig {
        BenchmarkConfig {
            num_runs: 3,
            base_seed: 10,
            grasp: GraspConfig::default().with_max_iterations(3).with_max_no_improve(10),
            alphas: vec![0.0, 1.0],
        }
    }

    fn square() -> TspInstance {
        let mut instance = TspInstance::from_coordinates(&[
            (0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (5.0, 0.0), (5.0, 10.0),
        ]);
        instance.name = "square".to_string();
        instance
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 5);
        assert_eq!(config.alphas.len(), 11);
    }

    #[test]
    fn test_known_optimum() {
        assert_eq!(known_optimum("berlin52"), Some(7542.0));
        assert_eq!(known_optimum("nowhere"), None);
    }

    #[test]
    fn test_run_instance_records_runs() {
        let mut benchmark = Benchmark::new(small_config());
        benchmark.set_best_known("square", 40.0);
        benchmark.run_instance(&square()).unwrap();

        let results = benchmark.results();
        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().map(|r| r.seed).collect::<Vec<_>>(), vec![10, 11, 12]);
        for r in results {
            assert!(r.cost >= 40.0);
            assert!(r.gap_to_best.unwrap() >= 0.0);
        }

        let stats = benchmark.compute_statistics();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].num_runs, 3);
        assert!(stats[0].best_cost <= stats[0].avg_cost);
        assert!(stats[0].avg_cost <= stats[0].worst_cost);
    }

    #[test]
    fn test_seeds_wrap_around() {
        let config = BenchmarkConfig {
            num_runs: 2,
            base_seed: u64::MAX,
            ..small_config()
        };
        let mut benchmark = Benchmark::new(config);
        benchmark.run_instance(&square()).unwrap();

        let seeds: Vec<u64> = benchmark.results().iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![u64::MAX, 0]);
    }

    #[test]
    fn test_compare_alphas_groups_by_alpha() {
        let mut benchmark = Benchmark::new(small_config());
        benchmark.compare_alphas(&square()).unwrap();

        assert_eq!(benchmark.results().len(), 6);
        let stats = benchmark.compute_statistics();
        let labels: Vec<&str> = stats.iter().map(|s| s.algorithm.as_str()).collect();
        assert_eq!(labels, vec!["GRASP(alpha=0.00)", "GRASP(alpha=1.00)"]);
        assert!(stats.iter().all(|s| s.avg_gap.is_none()));

        let report = benchmark.generate_report();
        assert!(report.contains("GRASP(alpha=0.00)"));
        assert!(report.contains("square"));
    }
}
