// CLI entry point for offline path planning.
//
// Loads a scenario file (map config, obstacles, queries), runs every query
// through a `SearchEngine`, and prints one JSON report. See `lib.rs` for the
// scenario format and the runner.
//
// Usage:
//   plan <SCENARIO.json> [OPTIONS]
//     --heuristic <NAME>   Override every query's heuristic
//                          (euclidean, manhattan, diagonal,
//                           tie_broken_euclidean, dijkstra)
//     --reopen             Re-expand Closed nodes whose score improves
//     --output <FILE>      Write the report here instead of stdout
//
// Log verbosity follows RUST_LOG (default: info).

use std::path::PathBuf;

use grid_path_cli::{RunOptions, Scenario, run_scenario};
use grid_path_searcher::ClosedNodePolicy;
use log::error;

struct Args {
    scenario: PathBuf,
    output: Option<PathBuf>,
    options: RunOptions,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();

    let scenario = match Scenario::load(&args.scenario) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load scenario: {e}");
            std::process::exit(1);
        }
    };

    let report = match run_scenario(&scenario, &args.options) {
        Ok(r) => r,
        Err(e) => {
            error!("Invalid map: {e}");
            std::process::exit(1);
        }
    };

    let json = match serde_json::to_string_pretty(&report) {
        Ok(j) => j,
        Err(e) => {
            error!("Failed to encode report: {e}");
            std::process::exit(1);
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, json) {
                error!("Failed to write {}: {e}", path.display());
                std::process::exit(1);
            }
        }
        None => println!("{json}"),
    }

    let found = report.queries.iter().filter(|q| q.success).count();
    if found < report.queries.len() {
        // Non-zero exit so scripts notice unreachable goals.
        std::process::exit(2);
    }
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching.
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut scenario = None;
    let mut output = None;
    let mut options = RunOptions::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--heuristic" => {
                i += 1;
                let Some(name) = args.get(i) else {
                    eprintln!("--heuristic requires a name");
                    std::process::exit(1);
                };
                match name.parse() {
                    Ok(h) => options.heuristic = Some(h),
                    Err(e) => {
                        eprintln!("--heuristic: {e}");
                        std::process::exit(1);
                    }
                }
            }
            "--reopen" => {
                options.closed_policy = Some(ClosedNodePolicy::Reopen);
            }
            "--output" => {
                i += 1;
                output = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    std::process::exit(1);
                }));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
            path => {
                if scenario.replace(PathBuf::from(path)).is_some() {
                    eprintln!("Only one scenario file may be given");
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let Some(scenario) = scenario else {
        print_usage();
        std::process::exit(1);
    };

    Args {
        scenario,
        output,
        options,
    }
}

fn print_usage() {
    println!("Usage: plan <SCENARIO.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --heuristic <NAME>   euclidean | manhattan | diagonal |");
    println!("                       tie_broken_euclidean | dijkstra");
    println!("  --reopen             Re-expand closed nodes whose score improves");
    println!("  --output <FILE>      Write the JSON report to FILE");
    println!("  --help, -h           Show this help");
}
