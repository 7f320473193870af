//! CLI binary for EZChart
//!
//! Point-to-point course calculation and route planning from saved drawings.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use ezchart::{
    course, export_plan_csv, format_bearing, format_distance_nm, format_duration, parse_drawings,
    ExportOptions, LegRow, Position, RoutePlanner, DEFAULT_SPEED_KTS,
};
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn parse_position(value: &str) -> std::result::Result<Position, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{value}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("bad latitude '{lat}': {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("bad longitude '{lon}': {e}"))?;
    Position::checked(lat, lon).map_err(|e| e.to_string())
}

fn speed_arg() -> Arg {
    Arg::new("speed")
        .long("speed")
        .help("Boat speed in knots")
        .value_name("KTS")
        .value_parser(clap::value_parser!(f64))
        .default_value(DEFAULT_SPEED_KTS.to_string())
}

fn build_command() -> Command {
    let long_version = format!(
        "{} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown revision")
    );

    Command::new("EZChart")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .about("Marine route and ETA planning from the EZChartplotter core.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .help("Enable debug output")
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("course")
                .about("Distance, heading and time en route between two positions")
                .arg(
                    Arg::new("from")
                        .help("Start position as LAT,LON (e.g. 25.7617,-80.1918)")
                        .required(true)
                        .allow_hyphen_values(true)
                        .value_parser(parse_position)
                        .index(1),
                )
                .arg(
                    Arg::new("to")
                        .help("Destination as LAT,LON")
                        .required(true)
                        .allow_hyphen_values(true)
                        .value_parser(parse_position)
                        .index(2),
                )
                .arg(speed_arg()),
        )
        .subcommand(
            Command::new("plan")
                .about("Leg table and totals for saved GeoJSON drawings (supports globbing)")
                .arg(
                    Arg::new("files")
                        .help("GeoJSON files with drawn LineStrings")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                )
                .arg(speed_arg())
                .arg(
                    Arg::new("csv")
                        .long("csv")
                        .help("Export the leg table to <name>.legs.csv")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .help("Directory for CSV output files (default: same as input file)")
                        .value_name("DIR"),
                ),
        )
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("debug"));

    match matches.subcommand() {
        Some(("course", sub)) => run_course(sub),
        Some(("plan", sub)) => run_plan(sub),
        _ => {
            build_command().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn run_course(matches: &ArgMatches) -> Result<()> {
    let from = *matches
        .get_one::<Position>("from")
        .context("missing start position")?;
    let to = *matches
        .get_one::<Position>("to")
        .context("missing destination")?;
    let speed = *matches.get_one::<f64>("speed").context("missing speed")?;

    let plotted = course(from, to, speed);
    println!("Distance:   {}", format_distance_nm(plotted.distance_nm));
    println!("Heading:    {}", format_bearing(plotted.bearing_deg));
    println!("Est. time:  {}", format_duration(plotted.eta_hours));
    println!("Speed:      {speed} kts");
    Ok(())
}

fn expand_patterns(patterns: &[&String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => {
                    let matched: Vec<PathBuf> = glob_iter.filter_map(|entry| entry.ok()).collect();
                    debug!("Glob pattern '{pattern}' matched {} files", matched.len());
                    paths.extend(matched);
                }
                Err(e) => warn!("Invalid glob pattern '{pattern}': {e}"),
            }
        } else {
            paths.push(PathBuf::from(pattern));
        }
    }
    paths
}

fn print_rows(rows: &[LegRow]) {
    println!(
        "{:>4}  {:>10}  {:>7}  {:>9}",
        "Leg", "Dist (nm)", "Kts", "Est Time"
    );
    for row in rows {
        println!(
            "{:>4}  {:>10.2}  {:>7}  {:>9}",
            row.number, row.distance_nm, row.speed_kts, row.eta_formatted
        );
    }
}

fn plan_file(path: &Path, speed: f64, csv: bool, export_options: &ExportOptions) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let drawings = parse_drawings(&text)
        .with_context(|| format!("Failed to parse drawings in {}", path.display()))?;

    let mut planner = RoutePlanner::new(speed);
    let report = planner.sync_drawings(drawings)?;
    if report.ignored > 0 {
        debug!("{} non-route features ignored", report.ignored);
    }

    let rows = planner.rows();
    let summary = planner.summary();
    print_rows(&rows);
    println!(
        "Total Dist: {}   Total Time: {}   Total Legs: {}",
        format_distance_nm(summary.total_distance_nm),
        summary.total_time_formatted,
        summary.leg_count
    );

    if csv {
        let csv_path = export_plan_csv(&rows, &summary, path, export_options)?;
        println!("Exported leg table to: {}", csv_path.display());
    }
    Ok(())
}

fn run_plan(matches: &ArgMatches) -> Result<()> {
    let speed = *matches.get_one::<f64>("speed").context("missing speed")?;
    let export_csv = matches.get_flag("csv");
    let export_options = ExportOptions {
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };
    let patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|files| files.collect())
        .unwrap_or_default();

    let paths = expand_patterns(&patterns);
    if paths.is_empty() {
        eprintln!("Error: No drawing files found.");
        eprintln!("Input patterns were: {patterns:?}");
        std::process::exit(1);
    }

    let mut planned = 0;
    for (index, path) in paths.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("Route: {}", path.display());
        match plan_file(path, speed, export_csv, &export_options) {
            Ok(()) => planned += 1,
            Err(e) => {
                eprintln!("Error planning {}: {e:#}", path.display());
                eprintln!("Continuing with next file...");
            }
        }
    }

    if planned == 0 {
        eprintln!(
            "Error: No routes were planned out of {} files found.",
            paths.len()
        );
        std::process::exit(1);
    }
    Ok(())
}
