//! Serialized notification context.
//!
//! The Rust analogue of posting closures to a main-thread handler: a single
//! consumer task drains an ordered queue of callback batches, so listener
//! callbacks and scheduler signals never run concurrently and arrive in the
//! order they were enqueued. A progress batch posted before a terminal batch
//! is always delivered before it.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

type Batch = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Handle to the shared notification context.
///
/// Cheap to clone; every task in a cache shares one context so that all
/// callbacks across tasks are serialized the same way.
#[derive(Clone)]
pub struct NotificationContext {
    tx: mpsc::UnboundedSender<Batch>,
}

impl NotificationContext {
    /// Spawn the consumer loop and return a handle to it.
    ///
    /// The loop runs until every `NotificationContext` clone is dropped and
    /// all pending batches have been delivered.
    pub fn start() -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Batch>();
        let handle = tokio::spawn(async move {
            while let Some(batch) = rx.recv().await {
                batch.await;
            }
        });
        (Self { tx }, handle)
    }

    /// Enqueue one callback batch. Batches run to completion one at a time,
    /// in post order.
    pub fn post<F>(&self, batch: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.tx.send(Box::pin(batch)).is_err() {
            tracing::warn!("notification context stopped, dropping callback batch");
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::time::Duration;

    #[tokio::test]
    async fn batches_run_serialized_in_post_order() {
        let (ctx, handle) = NotificationContext::start();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..10 {
            let log = log.clone();
            ctx.post(async move {
                // Yield inside the batch; a non-serialized executor would
                // interleave the pushes.
                tokio::task::yield_now().await;
                log.lock().unwrap().push(i);
            });
        }

        drop(ctx);
        handle.await.unwrap();
        assert_eq!(*log.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn consumer_exits_when_all_handles_drop() {
        let (ctx, handle) = NotificationContext::start();
        ctx.post(async {});
        drop(ctx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
