//! Decoding limits.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DecodeConfig
// ---------------------------------------------------------------------------

/// Upper bounds applied while parsing untrusted frames.
///
/// Both limits are checked before any allocation sized by a wire value,
/// so a hostile length prefix can't make the decoder reserve gigabytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Largest frame accepted by [`Frame::decode`](crate::Frame::decode).
    pub max_frame_len: usize,

    /// Largest member count accepted in a chat-enter body.
    pub max_chat_members: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_frame_len: 1024 * 1024,
            max_chat_members: 4096,
        }
    }
}
