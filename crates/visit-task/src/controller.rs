//! Activation state machine for the waypoint visit task.
//!
//! The controller runs the planning pipeline at most once per activation:
//! when the task is active, the plan has not been sent yet and the vehicle
//! reports it is ready for a new plan. It then watches the plan supervisor
//! and asks to be deactivated once the mission finishes successfully.

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use visit_core::{
    plan_visit, waypoints_from_degrees, ConfigError, PlanControl, PlanExecutionState,
    PlanOutcome, PlanSettings, PlanStatusReport, Position, VehicleMode, Waypoint,
    PRACTICAL_WAYPOINT_LIMIT,
};

use crate::dispatch::PlanDispatcher;
use crate::events::{Directive, TaskEvent};

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Cannot activate task since the given points to visit are not ok")]
    ActivationRejected,

    #[error("Task is deactivated: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// Where the controller is in its activation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Points-to-visit configuration is invalid
    Disabled,
    /// Valid configuration, not active
    Idle,
    /// Active, plan not built yet
    Armed,
    /// Plan sent, execution not confirmed
    Dispatched,
    /// Plan supervisor reports the mission executing
    Running,
}

/// Health status reported for the task entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntityStatus {
    #[default]
    Idle,
    Active,
}

/// Mutable task state, owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct MissionState {
    /// True if the points to visit were given as pairs
    pub enabled: bool,
    pub active: bool,
    /// True once the plan for this activation was built and sent
    pub plan_sent: bool,
    pub vehicle_mode: VehicleMode,
    /// True while the plan supervisor is executing
    pub in_mission: bool,
    pub progress: f32,
    pub last_outcome: PlanOutcome,
    /// Latest position estimate, None until the first one arrives
    pub position: Option<Position>,
    /// Time of the latest position estimate
    pub last_position_at: Option<DateTime<Utc>>,
    pub entity_status: EntityStatus,
}

impl MissionState {
    pub fn phase(&self) -> Phase {
        if !self.enabled {
            Phase::Disabled
        } else if !self.active {
            Phase::Idle
        } else if !self.plan_sent {
            Phase::Armed
        } else if self.in_mission {
            Phase::Running
        } else {
            Phase::Dispatched
        }
    }
}

/// Position estimates older than this are reported as stale when planning.
pub const STALE_POSITION_SECS: i64 = 10;

pub struct MissionController {
    settings: PlanSettings,
    system_id: u16,
    waypoints: Vec<Waypoint>,
    state: MissionState,
    rng: StdRng,
}

impl MissionController {
    /// Create a controller addressing plans to `system_id`.
    ///
    /// The controller starts disabled until a configuration is applied.
    pub fn new(settings: PlanSettings, system_id: u16) -> Self {
        Self::with_rng(settings, system_id, StdRng::from_os_rng())
    }

    /// Create a controller with a caller-provided request id generator.
    pub fn with_rng(settings: PlanSettings, system_id: u16, rng: StdRng) -> Self {
        Self {
            settings,
            system_id,
            waypoints: Vec::new(),
            state: MissionState::default(),
            rng,
        }
    }

    pub fn state(&self) -> &MissionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Age of the latest position estimate at `now`.
    pub fn position_age(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.state.last_position_at.map(|at| now - at)
    }

    /// Configured waypoints, radians.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Consume one event.
    ///
    /// A returned directive must be handled by the caller; the controller
    /// never calls back into itself.
    pub fn handle(&mut self, event: TaskEvent) -> Result<Option<Directive>, ControllerError> {
        match event {
            TaskEvent::Position { lat, lon } => {
                self.on_position(Position::new(lat, lon));
                Ok(None)
            }
            TaskEvent::VehicleMode { mode } => {
                if mode != self.state.vehicle_mode {
                    tracing::debug!("Vehicle mode {:?} -> {:?}", self.state.vehicle_mode, mode);
                }
                self.state.vehicle_mode = mode;
                Ok(None)
            }
            TaskEvent::PlanStatus(report) => Ok(self.on_plan_status(report)),
            TaskEvent::Activate => self.activate().map(|_| None),
            TaskEvent::Deactivate => {
                self.deactivate();
                Ok(None)
            }
            TaskEvent::Configure { points } => self.configure(&points).map(|_| None),
        }
    }

    /// Apply a new points-to-visit list in degrees.
    ///
    /// Radians are always derived from `points_deg`, so reapplying the same
    /// list gives the same waypoints. An odd-length list disables the task
    /// and, if it was active, deactivates it.
    pub fn configure(&mut self, points_deg: &[f64]) -> Result<(), ControllerError> {
        match waypoints_from_degrees(points_deg) {
            Ok(waypoints) => {
                tracing::info!("Configured {} point(s) to visit", waypoints.len());
                if waypoints.len() > PRACTICAL_WAYPOINT_LIMIT {
                    tracing::warn!(
                        "{} points to visit exceeds the practical limit of {}; exhaustive search may take long",
                        waypoints.len(),
                        PRACTICAL_WAYPOINT_LIMIT
                    );
                }
                self.waypoints = waypoints;
                self.state.enabled = true;
                Ok(())
            }
            Err(err) => {
                self.waypoints.clear();
                self.state.enabled = false;
                if self.state.active {
                    self.release();
                }
                Err(err.into())
            }
        }
    }

    pub fn activate(&mut self) -> Result<(), ControllerError> {
        if !self.state.enabled {
            return Err(ControllerError::ActivationRejected);
        }
        if self.state.active {
            tracing::debug!("Activation requested while already active");
            return Ok(());
        }

        self.state.active = true;
        self.state.plan_sent = false;
        self.state.entity_status = EntityStatus::Active;
        tracing::info!("Task activated");
        Ok(())
    }

    pub fn deactivate(&mut self) {
        if !self.state.active {
            return;
        }
        self.release();
        tracing::info!("Task deactivated");
    }

    /// Run the planning pipeline if this activation still needs a plan.
    ///
    /// Returns true when a plan was built and handed to the dispatcher.
    pub fn poll<D: PlanDispatcher + ?Sized>(&mut self, dispatcher: &D) -> bool {
        if self.phase() != Phase::Armed || !self.state.vehicle_mode.is_ready_for_plan() {
            return false;
        }
        let Some(origin) = self.state.position else {
            tracing::debug!("Vehicle ready but no position estimate yet");
            return false;
        };

        if let Some(age) = self.position_age(Utc::now()) {
            if age > TimeDelta::seconds(STALE_POSITION_SECS) {
                tracing::warn!(
                    "Planning from a position estimate {} s old",
                    age.num_seconds()
                );
            }
        }

        let visit = plan_visit(origin, &self.waypoints, &self.settings);
        tracing::info!(
            "Planned visit of {} point(s), tour {:.1} m, order {:?}",
            visit.route.len(),
            visit.route.cost,
            visit.route.order
        );

        let request_id: u16 = self.rng.random();
        let request = PlanControl::start_request(request_id, self.system_id, visit.plan);
        match dispatcher.dispatch(request) {
            Ok(()) => tracing::info!("Sent plan start request {}", request_id),
            // Not retried: the plan stays latched for this activation
            Err(err) => tracing::error!("Failed to send plan: {}", err),
        }
        self.state.plan_sent = true;
        self.state.in_mission = false;
        self.state.progress = 0.0;
        true
    }

    fn on_position(&mut self, position: Position) {
        self.state.position = Some(position);
        self.state.last_position_at = Some(Utc::now());
        if self.state.active {
            self.state.entity_status = EntityStatus::Active;
        }
    }

    fn on_plan_status(&mut self, report: PlanStatusReport) -> Option<Directive> {
        let was_running = self.phase() == Phase::Running;
        let executing = report.state == PlanExecutionState::Executing;

        self.state.in_mission = executing;
        self.state.progress = report.progress;
        self.state.last_outcome = report.last_outcome;

        if !was_running {
            if self.phase() == Phase::Running {
                tracing::info!("Plan execution confirmed");
            }
            return None;
        }

        if executing {
            return None;
        }

        match report.last_outcome {
            PlanOutcome::Success => {
                tracing::info!("Plan completed successfully");
                Some(Directive::RequestDeactivation)
            }
            outcome => {
                tracing::warn!("Plan stopped with outcome {:?}; not retrying", outcome);
                None
            }
        }
    }

    fn release(&mut self) {
        self.state.active = false;
        self.state.plan_sent = false;
        self.state.in_mission = false;
        self.state.entity_status = EntityStatus::Idle;
    }
}
