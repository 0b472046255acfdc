//! GRASP TSP Solver - Command Line Interface
//!
//! Solves symmetric Euclidean TSP instances in TSPLIB format with GRASP.

use clap::{Parser, Subcommand};
use grasp_tsp::benchmark::{known_optimum, load_instances_from_dir, Benchmark, BenchmarkConfig};
use grasp_tsp::heuristics::grasp::{Grasp, GraspConfig};
use grasp_tsp::instance::TspInstance;
use indicatif::{ProgressBar, ProgressStyle};

use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "grasp-tsp")]
#[command(version = "1.0")]
#[command(about = "A GRASP solver for the symmetric Euclidean TSP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct GraspArgs {
    /// Number of construction + local search rounds
    #[arg(long, default_value = "50")]
    max_iterations: usize,

    /// Consecutive non-improving 2-opt moves before local search stops
    #[arg(long, default_value = "50")]
    max_no_improve: usize,

    /// Greediness factor: 0 = nearest neighbor, 1 = random tour
    #[arg(short, long, default_value = "0.3")]
    alpha: f64,
}

impl GraspArgs {
    fn to_config(&self) -> GraspConfig {
        GraspConfig::default()
            .with_max_iterations(self.max_iterations)
            .with_max_no_improve(self.max_no_improve)
            .with_alpha(self.alpha)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single instance
    ///
    /// Shows a progress bar while GRASP runs. With --verbose the bar is
    /// replaced by one " > Iteration i, best=c" line per iteration.
    Solve {
        #[arg(short, long)]
        instance: PathBuf,

        #[command(flatten)]
        grasp: GraspArgs,

        /// Random seed (drawn from the OS when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output solution to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print one line per iteration instead of a progress bar
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run benchmarks on a directory of instances
    Benchmark {
        /// Directory containing .tsp files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Number of runs per instance
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Seed of the first run
        #[arg(long, default_value = "0")]
        base_seed: u64,

        #[command(flatten)]
        grasp: GraspArgs,

        /// Maximum instance size
        #[arg(long)]
        max_size: Option<usize>,
    },

    /// Compare alpha values on an instance
    Compare {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of runs per alpha
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Alpha values to try
        #[arg(long, value_delimiter = ',', default_values_t = [0.0, 0.1, 0.2, 0.3, 0.5, 0.7, 1.0])]
        alphas: Vec<f64>,

        #[command(flatten)]
        grasp: GraspArgs,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { instance, grasp, seed, output, verbose } => {
            solve_instance(&instance, &grasp, seed, output, verbose);
        }

        Commands::Benchmark { dir, output, runs, base_seed, grasp, max_size } => {
            run_benchmark(&dir, &output, runs, base_seed, &grasp, max_size);
        }

        Commands::Compare { instance, runs, alphas, grasp, output } => {
            compare_alphas(&instance, runs, alphas, &grasp, output);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }
    }
}

fn load_or_exit(path: &Path) -> TspInstance {
    match TspInstance::from_file(path) {
        Ok(inst) => inst,
        Err(e) => {
            log::error!("Error loading instance {:?}: {}", path, e);
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_instance(
    path: &Path,
    args: &GraspArgs,
    seed: Option<u64>,
    output: Option<PathBuf>,
    verbose: bool,
) {
    println!("Loading instance from {:?}...", path);
    let instance = load_or_exit(path);

    let mut config = args.to_config();
    config.seed = seed;

    if verbose {
        println!("{}", instance.statistics());
    }

    println!(
        "Solving with GRASP (iterations={}, patience={}, alpha={})...",
        config.max_iterations, config.max_no_improve, config.alpha
    );
    let start = Instant::now();

    let bar = if verbose {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(config.max_iterations as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} best={msg}") {
            bar.set_style(style);
        }
        bar
    };

    let grasp = Grasp::new(config);
    let result = grasp.run_with_progress(&instance, |iteration, best| {
        if verbose {
            println!(" > Iteration {}, best={}", iteration, best);
        } else {
            bar.set_message(best.to_string());
            bar.inc(1);
        }
    });
    bar.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            log::error!("GRASP failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let elapsed = start.elapsed();

    println!("\n========== Results ==========");
    println!("Instance: {}", instance.name);
    println!("Cost: {}", result.best.cost());
    if let Some(best) = known_optimum(&instance.name) {
        println!("Gap to optimum: {:.2}%", (result.best.cost() - best) / best * 100.0);
    }
    println!("Best found at iteration: {}/{}", result.best_iteration, result.iterations);
    println!("Time: {:.4}s", elapsed.as_secs_f64());
    println!("Tour: {:?}", result.best.tour());

    if let Some(out_path) = output {
        let written = serde_json::to_string_pretty(&result)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&out_path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("\nSolution saved to {:?}", out_path),
            Err(e) => {
                eprintln!("Failed to write output: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_benchmark(
    dir: &Path,
    output: &Path,
    runs: usize,
    base_seed: u64,
    args: &GraspArgs,
    max_size: Option<usize>,
) {
    println!("Loading instances from {:?}...", dir);

    let mut instances = load_instances_from_dir(dir);

    if let Some(max) = max_size {
        instances.retain(|i| i.dimension() <= max);
    }

    println!("Found {} instances", instances.len());

    if instances.is_empty() {
        eprintln!("No instances found!");
        return;
    }

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    let config = BenchmarkConfig {
        num_runs: runs,
        base_seed,
        grasp: args.to_config(),
        ..Default::default()
    };

    let mut benchmark = Benchmark::new(config);

    for (i, instance) in instances.iter().enumerate() {
        println!("\n[{}/{}] Processing {} (n={})...",
            i + 1, instances.len(), instance.name, instance.dimension());

        if let Err(e) = benchmark.run_instance(instance) {
            log::error!("Benchmark failed on {}: {}", instance.name, e);
        }
    }

    write_outputs(&benchmark, output);
}

fn compare_alphas(
    path: &Path,
    runs: usize,
    alphas: Vec<f64>,
    args: &GraspArgs,
    output: Option<PathBuf>,
) {
    let instance = load_or_exit(path);

    let config = BenchmarkConfig {
        num_runs: runs,
        grasp: args.to_config(),
        alphas,
        ..Default::default()
    };

    let mut benchmark = Benchmark::new(config);
    if let Err(e) = benchmark.compare_alphas(&instance) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("\n{}", benchmark.generate_report());

    if let Some(out_path) = output {
        match benchmark.export_statistics_csv(&out_path) {
            Ok(()) => println!("Statistics exported to {:?}", out_path),
            Err(e) => eprintln!("Failed to export statistics: {}", e),
        }
    }
}

fn write_outputs(benchmark: &Benchmark, output: &Path) {
    let results_path = output.join("results.csv");
    match benchmark.export_to_csv(&results_path) {
        Ok(()) => println!("\nResults exported to {:?}", results_path),
        Err(e) => eprintln!("Failed to export results: {}", e),
    }

    let stats_path = output.join("statistics.csv");
    match benchmark.export_statistics_csv(&stats_path) {
        Ok(()) => println!("Statistics exported to {:?}", stats_path),
        Err(e) => eprintln!("Failed to export statistics: {}", e),
    }

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    match std::fs::write(&report_path, &report) {
        Ok(()) => println!("Report saved to {:?}", report_path),
        Err(e) => eprintln!("Failed to save report: {}", e),
    }
}

fn analyze_instance(path: &Path) {
    let instance = load_or_exit(path);

    println!("{}", instance.statistics());
    if let Some(best) = known_optimum(&instance.name) {
        println!("  Known optimum: {}", best);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_solve_help_describes_iteration_output() {
        let mut cli = Cli::command();
        let solve = cli.find_subcommand_mut("solve").unwrap();
        let help = solve.render_long_help().to_string();
        assert!(help.contains("progress bar"));
        assert!(help.contains("> Iteration i, best=c"));
        assert!(help.contains("--verbose"));
    }

    #[test]
    fn test_solve_defaults() {
        let cli = Cli::try_parse_from(["grasp-tsp", "solve", "--instance", "data/berlin52.tsp"]).unwrap();
        let Commands::Solve { grasp, seed, verbose, .. } = cli.command else {
            panic!("expected the solve command");
        };
        assert_eq!(grasp.to_config(), GraspConfig::default());
        assert_eq!(seed, None);
        assert!(!verbose);
    }
}
