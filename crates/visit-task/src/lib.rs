//! Mission controller for the waypoint visit task.
//!
//! Owns the activation state machine, consumes vehicle events from a bounded
//! queue and dispatches a start request for the optimal visiting plan once
//! per activation.

pub mod bridge;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod events;
pub mod loops;

pub use config::TaskConfig;
pub use controller::{ControllerError, EntityStatus, MissionController, MissionState, Phase};
pub use dispatch::{ChannelDispatcher, DispatchError, PlanDispatcher};
pub use events::{Directive, TaskEvent};
