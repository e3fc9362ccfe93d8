//! CLI tool to compute the optimal visiting plan offline.
//!
//! Prints the visiting order, tour length and assembled plan as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use visit_cli::{build_report, parse_lat_lon};
use visit_core::{waypoints_from_degrees, PlanSettings, Position};

/// Plan the shortest closed tour over a set of points
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Vehicle position as LAT,LON in degrees
    #[arg(long)]
    from: String,

    /// Points to visit as a flat LAT,LON,LAT,LON,... list in degrees
    #[arg(long, allow_hyphen_values = true)]
    points: String,

    /// Cruise speed in m/s
    #[arg(long, default_value_t = 1.6)]
    speed: f32,

    /// Maneuver depth in meters
    #[arg(long, default_value_t = 0.0)]
    depth: f32,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (lat, lon) = parse_lat_lon(&args.from).context("invalid --from")?;
    let points = visit_core::parse_points(&args.points).context("invalid --points")?;
    let waypoints = waypoints_from_degrees(&points).context("invalid --points")?;

    if waypoints.len() > visit_core::PRACTICAL_WAYPOINT_LIMIT {
        eprintln!(
            "warning: {} points is above the practical limit of {}, this may take a long time",
            waypoints.len(),
            visit_core::PRACTICAL_WAYPOINT_LIMIT
        );
    }

    let settings = PlanSettings {
        speed: args.speed,
        z: args.depth,
        ..PlanSettings::default()
    };
    let report = build_report(Position::from_degrees(lat, lon), &waypoints, &settings);

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
