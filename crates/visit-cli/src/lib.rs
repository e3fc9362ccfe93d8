//! Visit CLI - Command line tools for waypoint visit planning.
//!
//! This crate provides the CLI binaries:
//! - plan_visit: offline route and plan computation
//! - simulate_visit: runs the mission controller against a simulated vehicle

pub mod report;
pub mod sim;

pub use report::{build_report, parse_lat_lon, PlanReport};
pub use sim::SimulatedVehicle;
