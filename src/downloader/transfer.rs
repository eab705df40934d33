//! Transfer loop — the inner byte-pumping algorithm.
//!
//! Checkpoint placement: cancellation is tested at every point where
//! meaningful I/O has just completed and before the next would begin, so the
//! latency between a cancel request and teardown is bounded by roughly one
//! chunk read. The body stream and sink writer are owned locals; every exit
//! path drops them, which closes the sink and aborts any in-flight request.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::FetchError;
use crate::sink::SinkWriter;
use crate::transport::RemoteBody;
use crate::types::{Outcome, Progress};

use super::task::DownloadTask;

/// Run the transfer and classify its result into the task's single terminal
/// outcome.
pub(super) async fn run(task: &DownloadTask) -> Outcome {
    match execute(task).await {
        Ok(bytes_written) => Outcome::Success { bytes_written },
        Err(err) => Outcome::from(err),
    }
}

async fn execute(task: &DownloadTask) -> Result<u64, FetchError> {
    task.check_cancel()?;

    let response = task
        .transport
        .execute(task.url(), &task.config.user_agent)
        .await?;

    if response.status == 404 {
        return Err(FetchError::NotFound);
    }
    if !(200..300).contains(&response.status) {
        return Err(FetchError::Http {
            status: response.status,
        });
    }
    let mut body = response
        .body
        .ok_or_else(|| FetchError::Transport("response had no body".to_string()))?;

    task.check_cancel()?;

    // The sink is opened strictly after the remote stream is confirmed
    // reachable, so a failed destination never masks a 404.
    let mut writer = task
        .output
        .open_for_write()
        .await
        .ok_or_else(|| FetchError::Storage("could not open output for writing".to_string()))?;

    task.check_cancel()?;

    tracing::debug!(
        url = %task.url(),
        content_length = ?response.content_length,
        "remote stream open"
    );

    let total = pump(task, &mut body, &mut writer, response.content_length).await?;

    writer
        .shutdown()
        .await
        .map_err(|e| FetchError::Storage(e.to_string()))?;
    drop(writer);
    drop(body);

    tracing::debug!(url = %task.url(), transferred = total, "transfer done");

    Ok(task.output.length().await)
}

/// Copy the body into the writer in fixed-size chunks, emitting a progress
/// sample whenever the running total has advanced by at least the notify
/// threshold, and re-checking cancellation after every chunk.
async fn pump(
    task: &DownloadTask,
    body: &mut RemoteBody,
    writer: &mut SinkWriter,
    content_length: Option<u64>,
) -> Result<u64, FetchError> {
    let mut buf = vec![0u8; task.config.chunk_size];
    let mut total: u64 = 0;
    let mut notified: u64 = 0;

    loop {
        let read = body
            .read(&mut buf)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        if read == 0 {
            break;
        }

        writer
            .write_all(&buf[..read])
            .await
            .map_err(|e| FetchError::Storage(e.to_string()))?;
        total += read as u64;

        if total >= notified + task.config.notify_threshold {
            notified = total;
            post_progress(
                task,
                Progress {
                    transferred: total,
                    total: content_length.filter(|len| *len > 0).unwrap_or(total),
                },
            );
        }

        task.check_cancel()?;
    }

    Ok(total)
}

fn post_progress(task: &DownloadTask, sample: Progress) {
    let listeners = task.listener_snapshot();
    task.notify.post(async move {
        for listener in &listeners {
            listener.on_progress(sample.transferred, sample.total).await;
        }
    });
}
