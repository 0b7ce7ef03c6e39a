//! The frame pump.
//!
//! [`SocialClient`] pulls frames from a [`Connection`] and feeds each one
//! to a shared [`Social`]. The loop is:
//!   1. Wait for a frame (bounded by the idle timeout, if configured)
//!   2. Hand it to [`Social::handle_bytes`]
//!   3. Log and skip frames that fail to decode
//!
//! It stops on a clean close or an idle timeout and fails on a transport
//! error.

use std::sync::Arc;

use steamsync_transport::{Connection, TransportError};

use crate::{ClientConfig, Social, SteamSyncError};

/// Why [`SocialClient::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The connection closed cleanly.
    Closed,
    /// No frame arrived within the configured idle timeout.
    IdleTimeout,
}

/// Drives one connection into a [`Social`] synchronizer.
pub struct SocialClient<C> {
    conn: C,
    social: Arc<Social>,
    config: ClientConfig,
}

impl<C> SocialClient<C>
where
    C: Connection<Error = TransportError>,
{
    /// Creates a client with a fresh synchronizer.
    pub fn new(conn: C, config: ClientConfig) -> Self {
        let social = Arc::new(Social::new(config.decode.clone()));
        Self::with_social(conn, social, config)
    }

    /// Creates a client feeding an existing synchronizer, so that
    /// several connections can share one set of caches.
    pub fn with_social(conn: C, social: Arc<Social>, config: ClientConfig) -> Self {
        Self {
            conn,
            social,
            config,
        }
    }

    /// The synchronizer this client feeds.
    pub fn social(&self) -> &Arc<Social> {
        &self.social
    }

    /// Pumps frames until the connection closes or goes idle.
    ///
    /// Frames that fail to decode are logged and counted by the
    /// synchronizer; they do not stop the loop.
    ///
    /// # Errors
    /// [`SteamSyncError::Transport`] if receiving fails.
    pub async fn run(&self) -> Result<StopReason, SteamSyncError> {
        let conn_id = self.conn.id();
        let idle = self.config.idle_timeout();
        tracing::info!(%conn_id, ?idle, "social client started");

        let reason = loop {
            let received = match idle {
                Some(limit) => {
                    match tokio::time::timeout(limit, self.conn.recv()).await {
                        Ok(received) => received,
                        Err(_) => {
                            tracing::info!(%conn_id, "connection idle, stopping");
                            break StopReason::IdleTimeout;
                        }
                    }
                }
                None => self.conn.recv().await,
            };

            let frame = match received {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!(%conn_id, "connection closed cleanly");
                    break StopReason::Closed;
                }
                Err(e) => {
                    tracing::warn!(%conn_id, error = %e, "receive failed");
                    return Err(e.into());
                }
            };

            if let Err(e) = self.social.handle_bytes(&frame) {
                tracing::debug!(%conn_id, error = %e, "frame skipped");
            }
        };

        let stats = self.social.stats();
        tracing::info!(
            %conn_id,
            applied = stats.applied,
            ignored = stats.ignored,
            dropped = stats.dropped,
            "social client stopped"
        );
        Ok(reason)
    }

    /// Closes the underlying connection.
    ///
    /// # Errors
    /// [`SteamSyncError::Transport`] if the connection refuses.
    pub async fn close(&self) -> Result<(), SteamSyncError> {
        self.conn.close().await?;
        Ok(())
    }
}
