use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::errors::{OrchestrationError, OrchestrationResult};

/// Hands created workflow ids to the consumer that executes them
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn enqueue(&self, workflow_id: Uuid) -> OrchestrationResult<()>;
}

/// In-process dispatcher backed by an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    sender: mpsc::UnboundedSender<Uuid>,
}

/// Receiving end; exactly one consumer drains it
#[derive(Debug)]
pub struct DispatchQueue {
    receiver: mpsc::UnboundedReceiver<Uuid>,
}

pub fn channel() -> (ChannelDispatcher, DispatchQueue) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ChannelDispatcher { sender }, DispatchQueue { receiver })
}

#[async_trait]
impl Dispatcher for ChannelDispatcher {
    async fn enqueue(&self, workflow_id: Uuid) -> OrchestrationResult<()> {
        self.sender
            .send(workflow_id)
            .map_err(|_| OrchestrationError::Dispatch(format!("consumer gone, workflow {} not queued", workflow_id)))
    }
}

impl DispatchQueue {
    /// Next workflow id; `None` once every dispatcher has been dropped
    pub async fn next(&mut self) -> Option<Uuid> {
        self.receiver.recv().await
    }

    pub fn try_next(&mut self) -> Option<Uuid> {
        self.receiver.try_recv().ok()
    }
}
