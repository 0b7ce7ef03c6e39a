//! Wire protocol for steamsync.
//!
//! This crate turns inbound bytes into typed messages. It knows nothing
//! about caches or events, only how frames and bodies are laid out:
//!
//! - **Identity** ([`SteamId`]) — the 64-bit account identifier and its
//!   canonical form.
//! - **Wire enums** ([`EMsg`], [`FriendRelationship`], [`ClanRank`], ...)
//!   — open enumerations that keep unknown values.
//! - **Primitive decoder** ([`BinaryReader`]) — little-endian integers,
//!   booleans, and null-terminated strings.
//! - **Envelope** ([`Frame`]) — type code, header, body.
//! - **Bodies** ([`proto`] for protobuf, [`body`] for hand-rolled binary).
//! - **Dispatch** ([`MessageKind`], [`SocialMessage`]) — routes a frame
//!   to exactly one body decoder.
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Frame → MessageKind → SocialMessage → synchronizer
//! ```

mod config;
mod enums;
mod error;
mod frame;
mod message;
mod reader;
mod steam_id;

pub mod body;
pub mod proto;

pub use config::DecodeConfig;
pub use enums::{
    AccountFlags, AccountType, ChatAction, ChatActionResult, ChatEntryType,
    ChatInfoType, ChatMemberStateChange, ChatPermission, ChatRoomEnterResponse,
    ChatRoomType, ClanRank, ClanRelationship, ClientPersonaStateFlags, EMsg,
    EResult, FriendRelationship, PersonaState, PersonaStateFlags,
};
pub use error::ProtocolError;
pub use frame::{EXTENDED_HEADER_LEN, ExtendedHeader, Frame, FrameHeader, WireShape};
pub use message::{MessageKind, SocialMessage};
pub use reader::{BinaryReader, text_until_nul};
pub use steam_id::{
    CHAT_INSTANCE_CLAN, CHAT_INSTANCE_LOBBY, CHAT_INSTANCE_MMS_LOBBY,
    DESKTOP_INSTANCE, SteamId, UNIVERSE_PUBLIC,
};
