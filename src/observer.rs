//! Observer and scheduler callback traits.
//!
//! Observers are passive records of lifecycle callbacks, owned by whichever
//! component registered them; a task holds only shared references for the
//! duration of its run. All callbacks execute on the task's
//! [`NotificationContext`](crate::notify::NotificationContext), never on the
//! worker context.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::sink::Sink;

/// Lifecycle callbacks for a single download.
///
/// Contract: exactly one of `on_success`, `on_fail`, `on_cancel` fires per
/// task, always immediately followed by exactly one `on_end`. `on_progress`
/// may fire zero or more times strictly before that terminal pair.
///
/// All methods default to no-ops so implementors override only what they
/// need.
#[async_trait]
pub trait FetchObserver: Send + Sync + 'static {
    /// Called with each progress sample: bytes transferred so far and the
    /// declared total when known (otherwise the transferred count itself).
    async fn on_progress(&self, transferred: u64, total: u64) {
        let _ = (transferred, total);
    }

    /// Called once when the transfer completed and the destination holds the
    /// full resource.
    async fn on_success(&self, output: Arc<dyn Sink>) {
        let _ = output;
    }

    /// Called once when the transfer failed. `not_found` is set when the
    /// remote returned HTTP 404.
    async fn on_fail(&self, not_found: bool) {
        let _ = not_found;
    }

    /// Called once when the transfer was cancelled.
    async fn on_cancel(&self) {}

    /// Called once after the terminal callback, regardless of outcome.
    async fn on_end(&self) {}
}

/// Completion signals for the owning scheduler.
///
/// `task_finished` fires exactly once per task, whether the task succeeded,
/// failed, was cancelled mid-transfer, or was cancelled before it ever ran.
#[async_trait]
pub trait SchedulerCallback: Send + Sync + 'static {
    /// Called on success with the number of bytes added to storage, before
    /// `task_finished`.
    async fn bytes_added(&self, len: u64) {
        let _ = len;
    }

    /// Called when the task reaches a terminal state. The URL identifies the
    /// task to the scheduler.
    async fn task_finished(&self, url: &Url) {
        let _ = url;
    }
}
