//! Download task lifecycle and control surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use url::Url;

use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::notify::NotificationContext;
use crate::observer::{FetchObserver, SchedulerCallback};
use crate::sink::Sink;
use crate::transport::Transport;

use super::{dispatch, transfer};

/// A single-use fetch-and-store unit of work.
///
/// Constructed by an external scheduler, optionally given listeners, then
/// submitted to a worker context via [`run`](DownloadTask::run). The task
/// may be cancelled at any time from any thread; cancellation is cooperative
/// and honored at the transfer loop's checkpoints.
///
/// `running` and `cancel_requested` each transition false to true at most
/// once per instance; a task is never re-run after reaching a terminal
/// state.
pub struct DownloadTask {
    url: Url,
    pub(super) output: Arc<dyn Sink>,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) config: Arc<Config>,
    pub(super) notify: NotificationContext,
    pub(super) callback: Option<Arc<dyn SchedulerCallback>>,

    listeners: Mutex<Vec<Arc<dyn FetchObserver>>>,

    running: AtomicBool,
    cancel_requested: AtomicBool,
    finished: AtomicBool,
}

impl DownloadTask {
    /// Create a task bound to `url` and `output`.
    ///
    /// The transport and scheduler callback are explicit parameters; the
    /// task performs no ambient lookups.
    pub fn new(
        url: &str,
        output: Arc<dyn Sink>,
        transport: Arc<dyn Transport>,
        config: Arc<Config>,
        notify: NotificationContext,
        callback: Option<Arc<dyn SchedulerCallback>>,
    ) -> Result<Self> {
        Ok(Self {
            url: Url::parse(url)?,
            output,
            transport,
            config,
            notify,
            callback,
            listeners: Mutex::new(Vec::new()),
            running: AtomicBool::new(false),
            cancel_requested: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        })
    }

    /// The target URL. Used by the owning cache to key in-flight downloads.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Register a listener. Only valid before the task starts running;
    /// late registrations are dropped with a warning.
    pub fn add_listener(&self, listener: Arc<dyn FetchObserver>) {
        if self.running.load(Ordering::Acquire) {
            tracing::warn!(url = %self.url, "listener registered after task start, ignoring");
            return;
        }
        self.lock_listeners().push(listener);
    }

    /// Request cancellation. Callable from any thread, any number of times;
    /// only the first call has an effect.
    ///
    /// If the task has not begun running, the owning scheduler is told the
    /// task is finished right away, so a scheduler waiting on completion is
    /// never blocked by a task that never started. If the task is running,
    /// the flag is observed at the next checkpoint, within one chunk
    /// iteration.
    pub fn cancel(&self) {
        let was_clear = self
            .cancel_requested
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !was_clear {
            return;
        }

        tracing::debug!(url = %self.url, "cancel requested");

        if !self.running.load(Ordering::Acquire) && self.mark_finished() {
            if let Some(callback) = self.callback.clone() {
                let url = self.url.clone();
                self.notify.post(async move {
                    callback.task_finished(&url).await;
                });
            }
        }
    }

    /// Whether the task has started running. Lock-free, safe from any
    /// thread.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Whether cancellation has been requested. Lock-free, safe from any
    /// thread.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    /// Execute the transfer. Intended to be spawned onto a worker context;
    /// callable exactly once, a second call is ignored.
    ///
    /// Tolerates `cancel()` having been called before entry: the first
    /// checkpoint observes the flag and the task terminates as cancelled.
    /// Every acquired resource (request, body stream, sink writer) is
    /// released before this returns, and exactly one terminal notification
    /// sequence is produced.
    pub async fn run(self: Arc<Self>) {
        if self.running.swap(true, Ordering::AcqRel) {
            tracing::warn!(url = %self.url, "run() called on a task that already ran, ignoring");
            return;
        }

        tracing::debug!(url = %self.url, "download start");
        let outcome = transfer::run(self.as_ref()).await;
        dispatch::dispatch_terminal(&self, outcome);
    }

    /// Fail with [`FetchError::Cancelled`] if cancellation was requested.
    pub(super) fn check_cancel(&self) -> std::result::Result<(), FetchError> {
        if self.cancel_requested.load(Ordering::Acquire) {
            Err(FetchError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Snapshot the registry so dispatch iteration cannot race a late
    /// registration.
    pub(super) fn listener_snapshot(&self) -> Vec<Arc<dyn FetchObserver>> {
        self.lock_listeners().clone()
    }

    /// Claim the single terminal transition. Returns `false` if the task
    /// already reached a terminal state (e.g. cancelled before it started).
    pub(super) fn mark_finished(&self) -> bool {
        self.finished
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<Arc<dyn FetchObserver>>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
