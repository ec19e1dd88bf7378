// CLI entry point for the headless Sidescape host.
//
// Builds a world for one window, drives it for a fixed number of frames with
// the scripted input from `host.rs`, and prints a JSON summary to stdout.
// Logging goes to stderr through `env_logger`; set `RUST_LOG=debug` to see
// jumps and populate detail, `RUST_LOG=trace` for every timer firing.
//
// Usage:
//   sidescape [OPTIONS]
//     --seed <N>       World seed (default: 0)
//     --frames <N>     Frames to simulate (default: 250)
//     --fps <N>        Frame rate override
//     --width <W>      Window width override, in pixels
//     --height <H>     Window height override, in pixels
//     --config <PATH>  JSON WorldConfig to start from

use sidescape_headless::{HostOptions, run};
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = parse_args();

    let summary = match run(&options) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Failed to run world: {e}");
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to encode summary: {e}");
            std::process::exit(1);
        }
    }
}

/// Parse command-line arguments into `HostOptions`. Uses simple
/// `std::env::args()` matching.
fn parse_args() -> HostOptions {
    let mut options = HostOptions::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                options.seed = parse_value(&args, i, "--seed requires a non-negative integer");
            }
            "--frames" => {
                i += 1;
                options.frames = parse_value(&args, i, "--frames requires a non-negative integer");
            }
            "--fps" => {
                i += 1;
                options.fps = Some(parse_value(&args, i, "--fps requires a positive integer"));
            }
            "--width" => {
                i += 1;
                options.width = Some(parse_value(&args, i, "--width requires a number"));
            }
            "--height" => {
                i += 1;
                options.height = Some(parse_value(&args, i, "--height requires a number"));
            }
            "--config" => {
                i += 1;
                options.config_path = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--config requires a path");
                    std::process::exit(1);
                }));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, message: &str) -> T {
    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        eprintln!("{message}");
        std::process::exit(1);
    })
}

fn print_usage() {
    println!("Usage: sidescape [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --seed <N>       World seed (default: 0)");
    println!("  --frames <N>     Frames to simulate (default: 250)");
    println!("  --fps <N>        Frame rate override (default: 25)");
    println!("  --width <W>      Window width override (default: 800)");
    println!("  --height <H>     Window height override (default: 600)");
    println!("  --config <PATH>  JSON world config to start from");
    println!("  --help, -h       Show this help");
}
