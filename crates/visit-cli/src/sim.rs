//! Simulated vehicle that "executes" a mission plan.
//!
//! Produces the event stream a real vehicle would report while flying the
//! plan: position samples along each straight leg, executing status with
//! progress, and a final successful outcome.

use std::collections::HashMap;

use visit_core::{
    wgs84_range, MissionPlan, PlanExecutionState, PlanOutcome, PlanStatusReport, Position,
    VehicleMode,
};
use visit_task::TaskEvent;

pub struct SimulatedVehicle {
    position: Position,
    /// Distance between reported position samples
    step_m: f64,
}

impl SimulatedVehicle {
    pub fn new(position: Position, step_m: f64) -> Self {
        Self {
            position,
            step_m: step_m.max(1.0),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Events reported once the vehicle is up and waiting for a plan.
    pub fn ready_events(&self) -> Vec<TaskEvent> {
        vec![
            self.position_event(),
            TaskEvent::VehicleMode {
                mode: VehicleMode::Service,
            },
        ]
    }

    /// Fly `plan` from the start maneuver along its transitions.
    pub fn execute(&mut self, plan: &MissionPlan) -> Vec<TaskEvent> {
        let targets = maneuver_chain(plan);
        let total_m = leg_lengths(self.position, &targets).iter().sum::<f64>();

        let mut events = vec![
            TaskEvent::VehicleMode {
                mode: VehicleMode::Maneuver,
            },
            executing(0.0),
        ];

        let mut travelled_m = 0.0;
        for target in targets {
            let leg_m = wgs84_range(self.position.lat, self.position.lon, target.lat, target.lon);
            let steps = ((leg_m / self.step_m).ceil() as usize).max(1);
            let start = self.position;

            for i in 1..steps {
                let t = i as f64 / steps as f64;
                self.position = Position::new(
                    start.lat + (target.lat - start.lat) * t,
                    start.lon + (target.lon - start.lon) * t,
                );
                events.push(self.position_event());
            }
            self.position = target;
            events.push(self.position_event());

            travelled_m += leg_m;
            let progress = if total_m > 0.0 {
                (travelled_m / total_m * 100.0) as f32
            } else {
                100.0
            };
            events.push(executing(progress.min(100.0)));
        }

        events.push(TaskEvent::VehicleMode {
            mode: VehicleMode::Service,
        });
        events.push(TaskEvent::PlanStatus(PlanStatusReport {
            state: PlanExecutionState::Ready,
            progress: 100.0,
            last_outcome: PlanOutcome::Success,
        }));
        events
    }

    fn position_event(&self) -> TaskEvent {
        TaskEvent::Position {
            lat: self.position.lat,
            lon: self.position.lon,
        }
    }
}

fn executing(progress: f32) -> TaskEvent {
    TaskEvent::PlanStatus(PlanStatusReport {
        state: PlanExecutionState::Executing,
        progress,
        last_outcome: PlanOutcome::None,
    })
}

/// Maneuver targets in execution order, following transitions from the start.
fn maneuver_chain(plan: &MissionPlan) -> Vec<Position> {
    let next: HashMap<&str, &str> = plan
        .transitions
        .iter()
        .map(|t| (t.source_man.as_str(), t.dest_man.as_str()))
        .collect();

    let mut chain = Vec::with_capacity(plan.maneuvers.len());
    let mut current = Some(plan.start_man_id.as_str());
    while let Some(id) = current {
        let Some(maneuver) = plan.maneuver(id) else {
            break;
        };
        chain.push(Position::new(maneuver.data.lat, maneuver.data.lon));
        // Guard against cyclic transitions
        if chain.len() > plan.maneuvers.len() {
            break;
        }
        current = next.get(id).copied();
    }
    chain
}

fn leg_lengths(start: Position, targets: &[Position]) -> Vec<f64> {
    let mut from = start;
    targets
        .iter()
        .map(|to| {
            let leg = wgs84_range(from.lat, from.lon, to.lat, to.lon);
            from = *to;
            leg
        })
        .collect()
}
