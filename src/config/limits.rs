//! Per-session limits configuration.

use serde::Deserialize;
use std::time::Duration;

/// Per-session line, queue and write limits.
///
/// These bound what a single client can cost the server: how long an inbound
/// line may be, how many outbound lines may wait for a slow reader, and how
/// long one socket write may block before the session is dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum inbound line length in bytes, terminator excluded (default: 4096).
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Outbound queue capacity per session, in lines (default: 256).
    /// Lines for a session whose queue is full are dropped for that session.
    #[serde(default = "default_sendq")]
    pub sendq: usize,
    /// Seconds a single socket write may take before the session is closed (default: 10).
    #[serde(default = "default_write_timeout_secs")]
    pub write_timeout_secs: u64,
}

impl LimitsConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            sendq: default_sendq(),
            write_timeout_secs: default_write_timeout_secs(),
        }
    }
}

fn default_max_line_length() -> usize {
    chat_proto::DEFAULT_MAX_LINE_LEN
}

fn default_sendq() -> usize {
    256
}

fn default_write_timeout_secs() -> u64 {
    10
}
