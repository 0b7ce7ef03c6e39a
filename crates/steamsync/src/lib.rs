//! # steamsync
//!
//! Social state synchronization for Steam-protocol clients.
//!
//! steamsync consumes inbound protocol frames and keeps two concurrent
//! caches current: direct contacts ([`Friend`]) and clans with their
//! chat rosters ([`Group`]). Every change is also published as an
//! [`Event`] to any number of subscribers.
//!
//! The workspace is split by concern:
//!
//! - `steamsync-protocol`: identifiers, wire enums, frame and body decoding
//! - `steamsync-cache`: the concurrent entity caches
//! - `steamsync-transport`: the [`Connection`] trait and two frame sources
//! - `steamsync` (this crate): the synchronizer, events, and client pump
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use steamsync::prelude::*;
//!
//! # async fn demo() -> Result<(), SteamSyncError> {
//! let (frames, conn) = ChannelConnection::pair(64);
//! let client = SocialClient::new(conn, ClientConfig::default());
//! let mut events = client.social().subscribe();
//!
//! // A network task pushes complete frames into `frames`...
//! # drop(frames);
//! client.run().await?;
//!
//! while let Some(event) = events.try_recv() {
//!     println!("{event:?}");
//! }
//! println!("{} friends", client.social().friends().count());
//! # Ok(())
//! # }
//! ```

mod bus;
mod client;
mod config;
mod error;
pub mod events;
mod social;

pub use bus::{EventBus, EventStream};
pub use client::{SocialClient, StopReason};
pub use config::ClientConfig;
pub use error::SteamSyncError;
pub use events::Event;
pub use social::{Social, SyncStats};

pub use steamsync_cache::{CacheReader, ChatMember, Friend, Group, MemberCounts};
pub use steamsync_protocol::{DecodeConfig, Frame, MessageKind, ProtocolError, SteamId};
pub use steamsync_transport::{
    ChannelConnection, Connection, FrameSender, StreamConnection, TransportError,
};

/// The types most applications need.
pub mod prelude {
    pub use crate::{
        CacheReader, ChannelConnection, ClientConfig, Connection, Event,
        EventStream, Friend, Group, Social, SocialClient, SteamId,
        SteamSyncError, StopReason, StreamConnection,
    };
}
