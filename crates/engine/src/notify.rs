use async_trait::async_trait;
use thiserror::Error;

use lingo_core::model::UserId;

/// Errors surfaced by notification transports.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Outbound notification port for finished final tests.
///
/// Delivery is fire-and-forget from the engine's point of view: the caller
/// boundary logs failures and never feeds them back into session state.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell the learner their final-test score.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` when delivery fails.
    async fn test_finished(&self, user: UserId, score: u32, total: u32) -> Result<(), NotifyError>;
}

/// Notifier that drops every message, for tests and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn test_finished(
        &self,
        _user: UserId,
        _score: u32,
        _total: u32,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}
