//! Error types for the protocol layer.
//!
//! Each steamsync crate has its own error enum. A `ProtocolError` always
//! means a frame could not be parsed or a body could not be decoded.

use crate::{EMsg, WireShape};

/// Errors that can occur while parsing a frame or decoding a body.
///
/// Every variant means the same thing to the caller: "this frame is
/// unparseable, discard it". The variants exist so the diagnostics log
/// says *why*.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The input ended before a fixed-width value or string terminator.
    ///
    /// `needed` is how many bytes the current read wanted; `remaining`
    /// is how many were left in the buffer.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// A null-terminated string was not valid UTF-8.
    #[error("string is not valid utf-8")]
    InvalidUtf8,

    /// A protobuf body failed to decode.
    ///
    /// `prost::DecodeError` covers truncated varints, bad wire types, and
    /// invalid nested lengths.
    #[error("protobuf decode failed: {0}")]
    Protobuf(#[from] prost::DecodeError),

    /// The frame's protobuf flag disagrees with the wire shape the
    /// message kind is known to use.
    #[error("{emsg} expected a {expected} body")]
    WireShapeMismatch { emsg: EMsg, expected: WireShape },

    /// The frame exceeds [`DecodeConfig::max_frame_len`](crate::DecodeConfig).
    #[error("frame of {len} bytes exceeds limit of {max}")]
    FrameTooLarge { len: usize, max: usize },

    /// A chat-enter body announced more members than
    /// [`DecodeConfig::max_chat_members`](crate::DecodeConfig) allows.
    #[error("member count {count} exceeds limit of {max}")]
    TooManyMembers { count: i32, max: usize },

    /// The fixed envelope header is malformed (wrong size or canary).
    #[error("invalid frame header: {0}")]
    InvalidHeader(String),
}
