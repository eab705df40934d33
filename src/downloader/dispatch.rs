//! Terminal notification dispatch.
//!
//! Exactly one terminal batch is posted per task execution. The batch runs
//! on the notification context after any progress batches already enqueued,
//! so progress never follows the terminal pair. Failure and cancellation
//! batches purge the destination before any listener runs.

use std::sync::Arc;

use url::Url;

use crate::observer::{FetchObserver, SchedulerCallback};
use crate::sink::Sink;
use crate::types::Outcome;

use super::task::DownloadTask;

/// Which non-success callback each listener receives.
#[derive(Clone, Copy)]
enum Terminal {
    Cancel,
    Fail { not_found: bool },
}

pub(super) fn dispatch_terminal(task: &Arc<DownloadTask>, outcome: Outcome) {
    let listeners = task.listener_snapshot();
    let output = task.output.clone();
    let callback = task.callback.clone();
    let url = task.url().clone();

    // False only when a pre-start cancel already claimed the terminal
    // transition and told the scheduler; listeners are still notified.
    let first_finish = task.mark_finished();

    match outcome {
        Outcome::Success { bytes_written } => {
            tracing::debug!(url = %url, bytes = bytes_written, "download done");
            task.notify.post(async move {
                if first_finish {
                    if let Some(callback) = &callback {
                        callback.bytes_added(bytes_written).await;
                        callback.task_finished(&url).await;
                    }
                }
                for listener in &listeners {
                    listener.on_success(output.clone()).await;
                    listener.on_end().await;
                }
            });
        }
        Outcome::Cancelled => {
            // Expected, not exceptional; no cause is logged.
            tracing::debug!(url = %url, "download cancelled");
            post_failure(task, listeners, output, callback, url, first_finish, Terminal::Cancel);
        }
        Outcome::NotFound => {
            tracing::warn!(url = %url, "download failed: remote resource not found");
            post_failure(
                task,
                listeners,
                output,
                callback,
                url,
                first_finish,
                Terminal::Fail { not_found: true },
            );
        }
        Outcome::Failure { cause } => {
            tracing::warn!(url = %url, error = %cause, "download failed");
            post_failure(
                task,
                listeners,
                output,
                callback,
                url,
                first_finish,
                Terminal::Fail { not_found: false },
            );
        }
    }
}

fn post_failure(
    task: &DownloadTask,
    listeners: Vec<Arc<dyn FetchObserver>>,
    output: Arc<dyn Sink>,
    callback: Option<Arc<dyn SchedulerCallback>>,
    url: Url,
    first_finish: bool,
    terminal: Terminal,
) {
    task.notify.post(async move {
        purge(output.as_ref(), &url).await;
        for listener in &listeners {
            match terminal {
                Terminal::Cancel => listener.on_cancel().await,
                Terminal::Fail { not_found } => listener.on_fail(not_found).await,
            }
            listener.on_end().await;
        }
        if first_finish {
            if let Some(callback) = &callback {
                callback.task_finished(&url).await;
            }
        }
    });
}

/// Delete the destination if it exists. A failed delete is logged, never
/// escalated; listeners only learn that the fetch failed.
async fn purge(output: &dyn Sink, url: &Url) {
    if output.exists().await && !output.delete().await {
        tracing::warn!(url = %url, "could not delete output during purge");
    }
}
