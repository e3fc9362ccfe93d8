//! Core data models for waypoint visit planning.
//!
//! All latitudes and longitudes in this module are in radians.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A target coordinate the vehicle must visit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a waypoint from decimal degrees.
    pub fn from_degrees(lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            lat: lat_deg.to_radians(),
            lon: lon_deg.to_radians(),
        }
    }
}

/// Latest estimated vehicle position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn from_degrees(lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            lat: lat_deg.to_radians(),
            lon: lon_deg.to_radians(),
        }
    }
}

/// Vehicle operating mode as reported by the vehicle supervisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleMode {
    /// Idle and ready to accept a new plan
    Service,
    Calibration,
    Error,
    /// Executing a maneuver
    Maneuver,
    /// Controlled by an external system
    External,
    #[default]
    Boot,
}

impl VehicleMode {
    /// Whether the vehicle will accept a new plan in this mode.
    pub fn is_ready_for_plan(self) -> bool {
        matches!(self, VehicleMode::Service)
    }
}

/// Execution state of the vehicle's plan supervisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanExecutionState {
    Blocked,
    #[default]
    Ready,
    Initializing,
    Executing,
}

/// Outcome of the last plan the supervisor ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanOutcome {
    #[default]
    None,
    Success,
    Failure,
}

/// Plan supervisor status report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanStatusReport {
    pub state: PlanExecutionState,
    /// Progress fraction, negative when unknown
    #[serde(default)]
    pub progress: f32,
    #[serde(default)]
    pub last_outcome: PlanOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnits {
    #[default]
    MetersPerSecond,
    Rpm,
    Percentage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZUnits {
    None,
    #[default]
    Depth,
    Altitude,
    Height,
}

/// Straight transit to a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goto {
    pub lat: f64,
    pub lon: f64,
    pub z: f32,
    pub z_units: ZUnits,
    pub speed: f32,
    pub speed_units: SpeedUnits,
}

/// A named maneuver within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanManeuver {
    pub maneuver_id: String,
    pub data: Goto,
}

/// Rule moving execution from one maneuver to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTransition {
    pub source_man: String,
    pub dest_man: String,
    pub conditions: String,
}

/// Executable sequential mission plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionPlan {
    pub plan_id: String,
    pub description: String,
    pub start_man_id: String,
    pub maneuvers: Vec<PlanManeuver>,
    pub transitions: Vec<PlanTransition>,
}

impl MissionPlan {
    /// Look up a maneuver by id.
    pub fn maneuver(&self, maneuver_id: &str) -> Option<&PlanManeuver> {
        self.maneuvers.iter().find(|m| m.maneuver_id == maneuver_id)
    }

    /// The maneuver execution starts with.
    pub fn start_maneuver(&self) -> Option<&PlanManeuver> {
        self.maneuver(&self.start_man_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanControlKind {
    Request,
    Success,
    Failure,
    InProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanOperation {
    Start,
    Stop,
    Load,
    Get,
}

/// Plan control request sent to the vehicle's plan supervisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanControl {
    pub kind: PlanControlKind,
    pub op: PlanOperation,
    pub request_id: u16,
    pub plan_id: String,
    /// System id the request is addressed to
    pub destination: u16,
    pub plan: MissionPlan,
    pub issued_at: DateTime<Utc>,
}

impl PlanControl {
    /// Build a request to start `plan` on system `destination`.
    pub fn start_request(request_id: u16, destination: u16, plan: MissionPlan) -> Self {
        Self {
            kind: PlanControlKind::Request,
            op: PlanOperation::Start,
            request_id,
            plan_id: plan.plan_id.clone(),
            destination,
            plan,
            issued_at: Utc::now(),
        }
    }
}
