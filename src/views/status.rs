//! Processing-status polling.
//!
//! Polls on a fixed interval only while at least one tracked item is in
//! a non-terminal state, and stops immediately once none remains, so a
//! backgrounded console never accumulates unbounded fetches.

use std::time::Duration;

use uuid::Uuid;

use crate::client::GatewayClient;
use crate::models::{ProcessingState, ProcessingStatus};

#[derive(Debug)]
pub struct StatusPoller {
    tracked: Vec<ProcessingStatus>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(interval: Duration) -> Self {
        StatusPoller {
            tracked: Vec::new(),
            interval,
        }
    }

    pub fn tracked(&self) -> &[ProcessingStatus] {
        &self.tracked
    }

    /// Starts tracking an item. Re-tracking an id replaces its entry.
    pub fn track(&mut self, status: ProcessingStatus) {
        self.tracked.retain(|s| s.id != status.id);
        self.tracked.push(status);
    }

    /// Ids still worth asking about.
    pub fn pending_ids(&self) -> Vec<Uuid> {
        self.tracked
            .iter()
            .filter(|s| !s.state.is_terminal())
            .map(|s| s.id)
            .collect()
    }

    /// Whether another poll round is warranted.
    pub fn should_poll(&self) -> bool {
        !self.pending_ids().is_empty()
    }

    /// Merges a poll response into the tracked set. Unknown ids are
    /// ignored; the poller never grows from a response.
    pub fn update(&mut self, statuses: Vec<ProcessingStatus>) {
        for status in statuses {
            if let Some(entry) = self.tracked.iter_mut().find(|s| s.id == status.id) {
                *entry = status;
            }
        }
    }

    /// Polls until every tracked item reaches a terminal state. Poll
    /// failures are logged and retried on the next interval.
    pub async fn run(&mut self, client: &GatewayClient) {
        while self.should_poll() {
            tokio::time::sleep(self.interval).await;
            let pending = self.pending_ids();
            match client.conversation_statuses(&pending).await {
                Ok(statuses) => self.update(statuses),
                Err(err) => tracing::warn!(error = %err, "status poll failed"),
            }
        }
        tracing::debug!("all tracked items terminal, polling stopped");
    }
}
