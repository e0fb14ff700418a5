use async_trait::async_trait;
use charter_shared::DomainEvent;

use crate::repository::RepoResult;

/// Outbound channel for domain events (e-mail, webhooks, logs).
///
/// A failed delivery never rolls back the change that produced the event.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &DomainEvent) -> RepoResult<()>;
}
