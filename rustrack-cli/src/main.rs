//! Command-line interface for track-hit compatibility filtering.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use thiserror::Error;

use rustrack_core::hit::HitCandidate;
use rustrack_core::trajectory::TrajectoryStateOnSurface;
use rustrack_estimators::{
    compatible_measurements, compatible_measurements_par, load_config_file, EstimatorConfig,
    EstimatorRegistry, SearchStatistics,
};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] rustrack_estimators::ConfigError),

    #[error("{0}")]
    Selection(String),
}

/// One trajectory state with its candidate hits, as read from the
/// events file.
#[derive(Deserialize)]
struct EventRecord {
    state: TrajectoryStateOnSurface,
    candidates: Vec<HitCandidate>,
}

/// Track-hit compatibility filtering over offline event files.
#[derive(Parser)]
#[command(name = "rustrack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter candidate hits against trajectory states
    Filter {
        /// Estimator configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Events file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Component name to filter with (required when the
        /// configuration defines several)
        #[arg(short, long)]
        estimator: Option<String>,

        /// Evaluate candidates across a thread pool
        #[arg(short, long)]
        parallel: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the estimators a configuration file defines
    Info {
        /// Estimator configuration file (JSON)
        config: PathBuf,
    },

    /// Benchmark every configured estimator over an event set
    Benchmark {
        /// Estimator configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Events file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of timed iterations
        #[arg(long, default_value = "5")]
        iterations: usize,
    },
}

fn read_events(path: &Path) -> Result<Vec<EventRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

fn select_component(configs: &[EstimatorConfig], requested: Option<String>) -> Result<String> {
    if let Some(name) = requested {
        if configs.iter().any(|c| c.component_name == name) {
            return Ok(name);
        }
        return Err(CliError::Selection(format!(
            "estimator '{}' is not defined by the configuration",
            name
        )));
    }
    match configs {
        [single] => Ok(single.component_name.clone()),
        [] => Err(CliError::Selection(
            "the configuration defines no estimators".to_string(),
        )),
        _ => {
            let names: Vec<&str> = configs.iter().map(|c| c.component_name.as_str()).collect();
            Err(CliError::Selection(format!(
                "several estimators are defined ({}); pick one with --estimator",
                names.join(", ")
            )))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Filter {
            config,
            input,
            output,
            estimator,
            parallel,
            verbose,
        } => {
            let configs = load_config_file(&config)?;
            let name = select_component(&configs, estimator)?;

            let registry = EstimatorRegistry::new();
            for component in configs {
                registry.register(component);
            }
            let estimator = registry.produce(&name)?;

            if verbose {
                eprintln!("Estimator: {}", name);
                eprintln!("MaxChi2: {}", estimator.chi_squared_cut());
                eprintln!("nSigma: {}", estimator.n_sigma_cut());
                eprintln!("Reading events from: {}", input.display());
            }

            let events = read_events(&input)?;
            let start = Instant::now();

            let mut writer = BufWriter::new(File::create(&output)?);
            writeln!(writer, "event,candidate,chi2")?;

            let mut totals = SearchStatistics::default();
            for (event_index, event) in events.iter().enumerate() {
                let (accepted, stats) = if parallel {
                    compatible_measurements_par(
                        estimator.as_ref(),
                        &event.state,
                        &event.candidates,
                    )
                } else {
                    compatible_measurements(estimator.as_ref(), &event.state, &event.candidates)
                };

                for measurement in &accepted {
                    writeln!(
                        writer,
                        "{},{},{}",
                        event_index, measurement.index, measurement.chi2
                    )?;
                }

                if verbose {
                    eprintln!(
                        "  event {}: {}/{} accepted",
                        event_index,
                        stats.accepted,
                        stats.candidates
                    );
                }
                totals.merge(&stats);
            }
            writer.flush()?;

            let elapsed = start.elapsed();
            println!(
                "Processed {} events in {:.2}s",
                events.len(),
                elapsed.as_secs_f64()
            );
            println!("Candidates: {}", totals.candidates);
            println!("Pre-filter rejected: {}", totals.prefilter_rejected);
            println!("Evaluated: {}", totals.evaluated);
            println!("Accepted: {}", totals.accepted);
        }

        Commands::Info { config } => {
            let configs = load_config_file(&config)?;
            println!("File: {}", config.display());
            println!("Estimators: {}", configs.len());

            for component in &configs {
                println!();
                println!("Component: {}", component.component_name);
                match &component.charge_filter {
                    Some(section) => {
                        println!("  Variant: chi-square + cluster charge filter");
                        println!("  MaxChi2: {}", component.max_chi2);
                        println!("  nSigma: {}", component.n_sigma);
                        println!("  MaxSagitta: {}", component.max_sagitta);
                        println!("  MinimalTolerance: {}", component.minimal_tolerance);
                        if section.pt_charge_cut_threshold < 0.0 {
                            println!("  pT bypass: disabled (charge cut at all momenta)");
                        } else {
                            println!("  pT bypass: above {} GeV", section.pt_charge_cut_threshold);
                        }
                        let cut = rustrack_estimators::cluster_charge_cut(component)?;
                        println!("  Strip charge cut: {} /cm", cut);
                    }
                    None => {
                        println!("  Variant: chi-square");
                        println!("  MaxChi2: {}", component.max_chi2);
                        println!("  nSigma: {}", component.n_sigma);
                        println!("  MaxSagitta: {}", component.max_sagitta);
                        println!("  MinimalTolerance: {}", component.minimal_tolerance);
                    }
                }
            }
        }

        Commands::Benchmark {
            config,
            input,
            iterations,
        } => {
            let configs = load_config_file(&config)?;
            let events = read_events(&input)?;
            let candidates: usize = events.iter().map(|e| e.candidates.len()).sum();

            println!(
                "Benchmarking with {} events, {} candidates, {} iterations",
                events.len(),
                candidates,
                iterations
            );

            let registry = EstimatorRegistry::new();
            for component in &configs {
                registry.register(component.clone());
            }

            println!(
                "{:<20} | {:<6} | {:<14} | {:<14} | {:<14}",
                "Component", "Mode", "Mean Time (ms)", "Min Time (ms)", "Max Time (ms)"
            );
            println!("{:-<80}", "");

            for component in &configs {
                let estimator = registry.produce(&component.component_name)?;

                for (mode, parallel) in [("seq", false), ("par", true)] {
                    // Warmup pass outside the timing.
                    for event in &events {
                        let _ = compatible_measurements(
                            estimator.as_ref(),
                            &event.state,
                            &event.candidates,
                        );
                    }

                    let mut times = Vec::with_capacity(iterations);
                    for _ in 0..iterations {
                        let start = Instant::now();
                        for event in &events {
                            if parallel {
                                let _ = compatible_measurements_par(
                                    estimator.as_ref(),
                                    &event.state,
                                    &event.candidates,
                                );
                            } else {
                                let _ = compatible_measurements(
                                    estimator.as_ref(),
                                    &event.state,
                                    &event.candidates,
                                );
                            }
                        }
                        times.push(start.elapsed().as_secs_f64() * 1000.0);
                    }

                    let min_time = times.iter().fold(f64::INFINITY, |a, &b| a.min(b));
                    let max_time = times.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                    let mean_time = times.iter().sum::<f64>() / times.len() as f64;

                    println!(
                        "{:<20} | {:<6} | {:<14.2} | {:<14.2} | {:<14.2}",
                        component.component_name, mode, mean_time, min_time, max_time
                    );
                }
            }
        }
    }

    Ok(())
}
