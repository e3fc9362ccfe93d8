pub mod config;
pub mod error;
pub mod matrix;
pub mod models;
pub mod optimizer;
pub mod pipeline;
pub mod plan;
pub mod spatial;

pub use config::{parse_points, waypoints_from_degrees};
pub use error::ConfigError;
pub use matrix::DistanceMatrix;
pub use models::{
    Goto, MissionPlan, PlanControl, PlanControlKind, PlanExecutionState, PlanManeuver,
    PlanOperation, PlanOutcome, PlanStatusReport, PlanTransition, Position, SpeedUnits,
    VehicleMode, Waypoint, ZUnits,
};
pub use optimizer::{Route, PRACTICAL_WAYPOINT_LIMIT};
pub use pipeline::{plan_visit, VisitPlan};
pub use plan::{assemble_plan, PlanSettings};
pub use spatial::{haversine_range, wgs84_bearing_and_range, wgs84_range};
