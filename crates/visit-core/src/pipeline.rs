//! Matrix, optimizer and assembler chained into one planning pass.

use crate::matrix::DistanceMatrix;
use crate::models::{MissionPlan, Position, Waypoint};
use crate::optimizer::{self, Route};
use crate::plan::{assemble_plan, PlanSettings};

/// Output of one planning pass.
#[derive(Debug, Clone)]
pub struct VisitPlan {
    pub matrix: DistanceMatrix,
    pub route: Route,
    pub plan: MissionPlan,
}

/// Plan a closed tour over `waypoints` starting and ending at `origin`.
///
/// Everything is recomputed from scratch; nothing is cached between calls.
pub fn plan_visit(origin: Position, waypoints: &[Waypoint], settings: &PlanSettings) -> VisitPlan {
    let matrix = DistanceMatrix::build(origin, waypoints);
    let route = optimizer::solve(&matrix);
    let plan = assemble_plan(&route, waypoints, origin, settings);
    VisitPlan {
        matrix,
        route,
        plan,
    }
}
