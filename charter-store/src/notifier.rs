use async_trait::async_trait;
use charter_core::{Notifier, RepoResult};
use charter_shared::DomainEvent;
use std::sync::Mutex;
use tracing::info;

/// Publishes every domain event to the log under its topic name.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: &DomainEvent) -> RepoResult<()> {
        let payload = serde_json::to_string(event)?;
        info!(target: "charter::events", topic = event.name(), %payload, "Published event");
        Ok(())
    }
}

/// Keeps delivered events in memory so tests can assert on them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(DomainEvent::name).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &DomainEvent) -> RepoResult<()> {
        self.events
            .lock()
            .map_err(|e| e.to_string())?
            .push(event.clone());
        Ok(())
    }
}
