//! In-memory connection backed by a tokio channel.

use tokio::sync::{Mutex, mpsc};

use crate::{Connection, ConnectionId, TransportError};

/// The producing half of a [`ChannelConnection`].
pub type FrameSender = mpsc::Sender<Vec<u8>>;

/// A [`Connection`] whose frames are pushed by a [`FrameSender`].
///
/// The connection closes when every sender is dropped or when
/// [`close`](Connection::close) is called.
pub struct ChannelConnection {
    id: ConnectionId,
    // `recv` takes `&self`, so the receiver sits behind an async mutex.
    rx: Mutex<mpsc::Receiver<Vec<u8>>>,
}

impl ChannelConnection {
    /// Creates a connection and its sender. `buffer` bounds how many
    /// frames may wait unread; senders wait when it is full.
    pub fn pair(buffer: usize) -> (FrameSender, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let conn = Self {
            id: ConnectionId::next(),
            rx: Mutex::new(rx),
        };
        tracing::debug!(id = %conn.id, "channel connection opened");
        (tx, conn)
    }
}

impl Connection for ChannelConnection {
    type Error = TransportError;

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.rx.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.rx.lock().await.close();
        tracing::debug!(id = %self.id, "channel connection closed");
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
