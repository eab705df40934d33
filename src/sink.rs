//! Destination sink abstraction.
//!
//! A [`Sink`] is the opaque durable-storage handle a task writes into. It
//! must tolerate being deleted after a partial write; the downloader's
//! contract is "file absent or fully overwritten", never partially valid.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWrite;

/// An open write handle into a sink.
pub type SinkWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Opaque writable destination for one download.
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    /// Whether the destination currently exists.
    async fn exists(&self) -> bool;

    /// Delete the destination. Returns `false` if the delete failed.
    async fn delete(&self) -> bool;

    /// Open the destination for writing from the start, truncating any
    /// previous content. Returns `None` when the destination is unavailable.
    async fn open_for_write(&self) -> Option<SinkWriter>;

    /// Current stored length in bytes (0 when absent).
    async fn length(&self) -> u64;
}

/// Production [`Sink`] over a filesystem path.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Create a sink for `path`. The file itself is only created when the
    /// transfer opens it for writing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn delete(&self) -> bool {
        tokio::fs::remove_file(&self.path).await.is_ok()
    }

    async fn open_for_write(&self) -> Option<SinkWriter> {
        match tokio::fs::File::create(&self.path).await {
            Ok(file) => Some(Box::new(tokio::io::BufWriter::new(file))),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not open sink for writing");
                None
            }
        }
    }

    async fn length(&self) -> u64 {
        tokio::fs::metadata(&self.path)
            .await
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn file_sink_reports_absent_before_write() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("img.png"));

        assert!(!sink.exists().await);
        assert_eq!(sink.length().await, 0);
    }

    #[tokio::test]
    async fn file_sink_write_then_length() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("img.png"));

        let mut writer = sink.open_for_write().await.unwrap();
        writer.write_all(&[0u8; 1234]).await.unwrap();
        writer.shutdown().await.unwrap();
        drop(writer);

        assert!(sink.exists().await);
        assert_eq!(sink.length().await, 1234);
    }

    #[tokio::test]
    async fn file_sink_open_truncates_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        std::fs::write(&path, vec![1u8; 5000]).unwrap();
        let sink = FileSink::new(&path);

        let mut writer = sink.open_for_write().await.unwrap();
        writer.write_all(&[2u8; 10]).await.unwrap();
        writer.shutdown().await.unwrap();
        drop(writer);

        assert_eq!(sink.length().await, 10);
    }

    #[tokio::test]
    async fn file_sink_delete_after_partial_write() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("img.png"));

        let mut writer = sink.open_for_write().await.unwrap();
        writer.write_all(&[0u8; 100]).await.unwrap();
        writer.flush().await.unwrap();
        drop(writer);

        assert!(sink.delete().await);
        assert!(!sink.exists().await);
    }

    #[tokio::test]
    async fn file_sink_delete_on_absent_file_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("missing.png"));

        assert!(!sink.delete().await);
    }

    #[tokio::test]
    async fn file_sink_open_fails_in_missing_directory() {
        let sink = FileSink::new("/nonexistent-dir-for-chan-cache-tests/img.png");
        assert!(sink.open_for_write().await.is_none());
    }
}
