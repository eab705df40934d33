//! HTTP transport abstraction.
//!
//! [`Transport`] is the seam between the transfer loop and the network,
//! enabling testability with stub transports. The production implementation
//! wraps a shared `reqwest` client and adapts its streaming body into an
//! [`AsyncRead`](tokio::io::AsyncRead) pumped in bounded chunks.
//!
//! Dropping a [`RemoteBody`] aborts the in-flight call and releases the
//! connection; dropping is idempotent, so every exit path of the transfer
//! loop cleans up the same way.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use url::Url;

use crate::config::Config;
use crate::error::{FetchError, Result};

/// A streamed response body. Owned exclusively by the worker while the
/// transfer is active.
pub type RemoteBody = Box<dyn AsyncRead + Send + Unpin>;

/// The transport's view of an executed request.
pub struct RemoteResponse {
    /// HTTP status code
    pub status: u16,
    /// Declared content length, when the remote sent one
    pub content_length: Option<u64>,
    /// The response body stream. `None` models a transport that yielded no
    /// body; the transfer loop treats that as a generic failure.
    pub body: Option<RemoteBody>,
}

/// Executes one request and yields status, declared length, and a streamed
/// body.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Execute a GET for `url` with the identifying `user_agent` header.
    ///
    /// Returns `Err` only for failures below the HTTP layer; non-success
    /// statuses are returned as a normal [`RemoteResponse`] for the caller
    /// to classify.
    async fn execute(&self, url: &Url, user_agent: &str) -> std::result::Result<RemoteResponse, FetchError>;
}

/// Production [`Transport`] over a shared `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport from the configured connect timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one configured with a proxy.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, url: &Url, user_agent: &str) -> std::result::Result<RemoteResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_length = response.content_length();
        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let body: RemoteBody = Box::new(StreamReader::new(Box::pin(stream)));

        Ok(RemoteResponse {
            status,
            content_length,
            body: Some(body),
        })
    }
}
