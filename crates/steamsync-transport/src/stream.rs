//! Length-prefixed frames over a byte stream.
//!
//! Each frame is a `u32` little-endian byte count followed by that many
//! bytes. A clean end of stream at a frame boundary closes the
//! connection; an end of stream inside a frame is an error.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Mutex;

use crate::{Connection, ConnectionId, TransportError};

/// A [`Connection`] reading length-prefixed frames from `R`.
pub struct StreamConnection<R> {
    id: ConnectionId,
    max_frame_len: usize,
    reader: Mutex<Option<R>>,
}

impl<R> StreamConnection<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    /// Wraps `reader`. Frames announcing more than `max_frame_len` bytes
    /// fail with [`TransportError::FrameTooLarge`] before any allocation.
    pub fn new(reader: R, max_frame_len: usize) -> Self {
        Self {
            id: ConnectionId::next(),
            max_frame_len,
            reader: Mutex::new(Some(reader)),
        }
    }
}

impl<R> Connection for StreamConnection<R>
where
    R: AsyncRead + Unpin + Send + Sync + 'static,
{
    type Error = TransportError;

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut guard = self.reader.lock().await;
        let Some(reader) = guard.as_mut() else {
            return Ok(None);
        };

        let len = match reader.read_u32_le().await {
            Ok(len) => len as usize,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::debug!(id = %self.id, "stream ended");
                *guard = None;
                return Ok(None);
            }
            Err(e) => return Err(TransportError::ReceiveFailed(e)),
        };
        if len > self.max_frame_len {
            return Err(TransportError::FrameTooLarge {
                len,
                max: self.max_frame_len,
            });
        }

        let mut frame = vec![0u8; len];
        reader.read_exact(&mut frame).await.map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                TransportError::ConnectionClosed(format!(
                    "stream ended inside a {len}-byte frame"
                ))
            } else {
                TransportError::ReceiveFailed(e)
            }
        })?;
        Ok(Some(frame))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.reader.lock().await.take();
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
