//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use steamsync_protocol::DecodeConfig;

/// Configuration for a [`SocialClient`](crate::SocialClient).
///
/// Every field has a default, so a partial JSON/TOML document only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Limits applied while decoding frames.
    pub decode: DecodeConfig,

    /// Stop the pump when no frame arrives for this many seconds.
    /// 0 means wait forever.
    pub idle_timeout_secs: u64,
}

impl ClientConfig {
    /// The idle timeout, or `None` when disabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0)
            .then(|| Duration::from_secs(self.idle_timeout_secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            decode: DecodeConfig::default(),
            idle_timeout_secs: 0,
        }
    }
}
