//! Unified error type for steamsync.

use steamsync_protocol::ProtocolError;
use steamsync_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `steamsync` crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum SteamSyncError {
    /// A transport-level error (receive failed, oversized frame).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (truncated body, bad header).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
