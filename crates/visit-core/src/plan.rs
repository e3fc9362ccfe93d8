//! Mission plan assembly from an optimized visiting order.

use serde::{Deserialize, Serialize};

use crate::models::{
    Goto, MissionPlan, PlanManeuver, PlanTransition, Position, SpeedUnits, Waypoint, ZUnits,
};
use crate::optimizer::Route;

/// Transition condition used between consecutive maneuvers.
pub const MANEUVER_DONE: &str = "ManeuverIsDone";

/// Fixed parameters applied to every maneuver of an assembled plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    /// Logical plan name, reused across activations
    pub plan_id: String,
    pub description: String,
    pub speed: f32,
    pub speed_units: SpeedUnits,
    pub z: f32,
    pub z_units: ZUnits,
    /// Maneuver ids are this prefix followed by the sequence number
    pub maneuver_prefix: String,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            plan_id: "PlanVisit".to_string(),
            description: "Visiting given points in optimal order based on range".to_string(),
            speed: 1.6,
            speed_units: SpeedUnits::MetersPerSecond,
            z: 0.0,
            z_units: ZUnits::Depth,
            maneuver_prefix: "Goto".to_string(),
        }
    }
}

impl PlanSettings {
    fn goto(&self, lat: f64, lon: f64) -> Goto {
        Goto {
            lat,
            lon,
            z: self.z,
            z_units: self.z_units,
            speed: self.speed,
            speed_units: self.speed_units,
        }
    }

    fn maneuver_id(&self, seq: usize) -> String {
        format!("{}{}", self.maneuver_prefix, seq)
    }
}

/// Turn a route into a chain of goto maneuvers ending back at `origin`.
///
/// Route entries are waypoint node indices (1-based into `waypoints`).
/// `origin` is a frozen snapshot: the last maneuver returns to where the
/// vehicle was when the plan was built, not to a live position.
///
/// The plan always has `route.len() + 1` maneuvers and `route.len()`
/// transitions, each firing when its source maneuver is done.
///
/// # Panics
/// If a route entry is 0 or greater than `waypoints.len()`.
pub fn assemble_plan(
    route: &Route,
    waypoints: &[Waypoint],
    origin: Position,
    settings: &PlanSettings,
) -> MissionPlan {
    let targets = route
        .order
        .iter()
        .map(|&node| {
            let wp = waypoints[node - 1];
            (wp.lat, wp.lon)
        })
        .chain(std::iter::once((origin.lat, origin.lon)));

    let maneuvers: Vec<PlanManeuver> = targets
        .enumerate()
        .map(|(seq, (lat, lon))| PlanManeuver {
            maneuver_id: settings.maneuver_id(seq),
            data: settings.goto(lat, lon),
        })
        .collect();

    let transitions = maneuvers
        .windows(2)
        .map(|pair| PlanTransition {
            source_man: pair[0].maneuver_id.clone(),
            dest_man: pair[1].maneuver_id.clone(),
            conditions: MANEUVER_DONE.to_string(),
        })
        .collect();

    MissionPlan {
        plan_id: settings.plan_id.clone(),
        description: settings.description.clone(),
        start_man_id: settings.maneuver_id(0),
        maneuvers,
        transitions,
    }
}
