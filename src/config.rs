//! Configuration types for chan-cache

use serde::{Deserialize, Serialize};

/// Downloader configuration.
///
/// Every field has a sensible default; `Config::default()` works out of the
/// box.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// User-Agent header sent with every request (default: "chan-cache/0.1")
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Size of each copy-loop read in bytes (default: 8 KiB)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Minimum advance in transferred bytes between progress samples
    /// (default: 8x chunk size, 64 KiB)
    #[serde(default = "default_notify_threshold")]
    pub notify_threshold: u64,

    /// Connection timeout in seconds for the HTTP transport (default: 30).
    /// Overall request timeouts are left to the transport; a streaming body
    /// may legitimately outlive any fixed deadline.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            chunk_size: default_chunk_size(),
            notify_threshold: default_notify_threshold(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    "chan-cache/0.1".to_string()
}

fn default_chunk_size() -> usize {
    8 * 1024
}

fn default_notify_threshold() -> u64 {
    default_chunk_size() as u64 * 8
}

fn default_connect_timeout_secs() -> u64 {
    30
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_sizes() {
        let config = Config::default();
        assert_eq!(config.chunk_size, 8192);
        assert_eq!(config.notify_threshold, 65536);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.user_agent, "chan-cache/0.1");
        assert_eq!(config.chunk_size, 8192);
    }

    #[test]
    fn partial_config_keeps_explicit_values() {
        let config: Config = serde_json::from_str(r#"{"chunk_size": 4096}"#).unwrap();
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.notify_threshold, 65536);
    }
}
