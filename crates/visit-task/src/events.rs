//! Typed events consumed by the mission controller.

use serde::{Deserialize, Serialize};
use visit_core::{PlanStatusReport, VehicleMode};

/// Input delivered to the controller through the event queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// Estimated vehicle position, radians
    Position { lat: f64, lon: f64 },
    /// Vehicle operating mode changed
    VehicleMode { mode: VehicleMode },
    /// Plan supervisor status
    PlanStatus(PlanStatusReport),
    Activate,
    Deactivate,
    /// New points-to-visit list, lat/lon pairs in degrees
    Configure { points: Vec<f64> },
}

/// Follow-up action a handler asks the control loop to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    RequestDeactivation,
}

impl Directive {
    /// The event the control loop feeds back to the controller.
    pub fn into_event(self) -> TaskEvent {
        match self {
            Directive::RequestDeactivation => TaskEvent::Deactivate,
        }
    }
}
