//! Single-consumer control loop.
//!
//! Drains the bounded event queue into the controller and checks the plan
//! trigger after every event, or after `poll_interval` with no event. The
//! tick covers state that became ready outside the queue, such as a
//! controller configured and activated before the loop starts.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;

use crate::controller::MissionController;
use crate::dispatch::PlanDispatcher;
use crate::events::TaskEvent;

/// Run the controller until shutdown or until the event queue closes.
///
/// Returns the controller so callers can inspect its final state.
pub async fn run_control_loop<D: PlanDispatcher>(
    mut controller: MissionController,
    mut events: mpsc::Receiver<TaskEvent>,
    dispatcher: D,
    poll_interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> MissionController {
    // Directives fed back by the controller, handled before new input
    let mut pending: VecDeque<TaskEvent> = VecDeque::new();

    loop {
        let next = match pending.pop_front() {
            Some(event) => Some(event),
            None => {
                tokio::select! {
                    _ = shutdown.recv() => {
                        tracing::info!("Control loop shutting down");
                        break;
                    }
                    received = timeout(poll_interval, events.recv()) => match received {
                        Ok(Some(event)) => Some(event),
                        Ok(None) => {
                            tracing::info!("Event queue closed, control loop stopping");
                            break;
                        }
                        // Tick
                        Err(_) => None,
                    }
                }
            }
        };

        if let Some(event) = next {
            tracing::debug!("Event {:?}", event);
            match controller.handle(event) {
                Ok(Some(directive)) => pending.push_back(directive.into_event()),
                Ok(None) => {}
                Err(err) => tracing::warn!("{}", err),
            }
        }

        controller.poll(&dispatcher);
    }

    controller
}
