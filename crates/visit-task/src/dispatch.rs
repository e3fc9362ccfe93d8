//! Outbound plan requests.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use visit_core::PlanControl;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Plan request queue is full (request {0})")]
    QueueFull(u16),

    #[error("Plan request queue is closed (request {0})")]
    Closed(u16),
}

/// Trait for delivering plan requests to the vehicle's plan supervisor.
///
/// Delivery is fire-and-forget: implementations must not wait for the
/// request to be acknowledged.
pub trait PlanDispatcher {
    fn dispatch(&self, request: PlanControl) -> Result<(), DispatchError>;
}

/// Dispatcher that hands requests to a bounded channel.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::Sender<PlanControl>,
}

impl ChannelDispatcher {
    pub fn new(tx: mpsc::Sender<PlanControl>) -> Self {
        Self { tx }
    }

    /// Create a dispatcher together with the receiving end of its queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PlanControl>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

impl PlanDispatcher for ChannelDispatcher {
    fn dispatch(&self, request: PlanControl) -> Result<(), DispatchError> {
        let request_id = request.request_id;
        self.tx.try_send(request).map_err(|err| match err {
            TrySendError::Full(_) => DispatchError::QueueFull(request_id),
            TrySendError::Closed(_) => DispatchError::Closed(request_id),
        })
    }
}
