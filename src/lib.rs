//! # chan-cache
//!
//! Streaming file-cache downloader for imageboard browser clients.
//!
//! One [`DownloadTask`] performs a single fetch-and-store operation: it
//! streams a remote resource over HTTP into a destination [`Sink`], reports
//! progress across the task boundary, classifies failure causes, and
//! guarantees deterministic resource cleanup and listener notification no
//! matter how the transfer terminates (success, HTTP error, cancellation, or
//! I/O fault).
//!
//! ## Design Philosophy
//!
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//! - **Cooperative cancellation** - cancel from any thread, honored at
//!   well-defined checkpoints bounded by one chunk iteration
//! - **Exactly-once terminal delivery** - every observer sees one of
//!   success/fail/cancel, always followed by one end callback
//! - **Explicit collaborators** - transport, sink, and scheduler callback are
//!   injected traits, never ambient lookups
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use chan_cache::{Config, DownloadTask, FileSink, HttpTransport, NotificationContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::default());
//!     let transport = Arc::new(HttpTransport::new(&config)?);
//!     let (notify, _notify_loop) = NotificationContext::start();
//!
//!     let task = Arc::new(DownloadTask::new(
//!         "https://example.org/image.png",
//!         Arc::new(FileSink::new("/tmp/cache/image.png")),
//!         transport,
//!         config,
//!         notify,
//!         None,
//!     )?);
//!
//!     tokio::spawn(task.clone().run()).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Core downloader implementation (task lifecycle, transfer loop, dispatch)
pub mod downloader;
/// Error types
pub mod error;
/// Serialized notification context
pub mod notify;
/// Observer and scheduler callback traits
pub mod observer;
/// Destination sink abstraction
pub mod sink;
/// HTTP transport abstraction
pub mod transport;
/// Core types (terminal outcome, progress samples)
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use downloader::DownloadTask;
pub use error::{Error, FetchError, Result};
pub use notify::NotificationContext;
pub use observer::{FetchObserver, SchedulerCallback};
pub use sink::{FileSink, Sink, SinkWriter};
pub use transport::{HttpTransport, RemoteBody, RemoteResponse, Transport};
pub use types::{Outcome, Progress};
