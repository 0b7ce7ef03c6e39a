//! Concurrent entity caches for steamsync.
//!
//! This crate holds the local mirror of the remote social graph:
//!
//! 1. **Contacts** — [`FriendsList`], one [`Friend`] per individual
//! 2. **Groups** — [`GroupsList`], one [`Group`] per clan, each owning a
//!    chat roster of [`ChatMember`]s
//! 3. **Read-only handles** — [`CacheReader`], what application code gets
//!
//! Both caches share one generic implementation, [`EntityCache`]. Keys
//! are always canonical ids (see `SteamId::to_canonical`).
//!
//! # How it fits in the stack
//!
//! ```text
//! Synchronizer (above)  ← the only writer
//!     ↕
//! Cache Layer (this crate)  ← keyed records behind one RwLock per cache
//!     ↕
//! Protocol Layer (below)  ← provides SteamId and wire enums
//! ```

mod cache;
mod entity;
mod lists;

pub use cache::{CacheReader, EntityCache};
pub use entity::{ChatMember, Entity, Friend, Group, MemberCounts};
pub use lists::{FriendsList, GroupsList};
