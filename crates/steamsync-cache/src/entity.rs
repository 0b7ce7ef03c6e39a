//! The records held in the caches.
//!
//! One shape per cache: [`Friend`] for direct contacts, [`Group`] for
//! clans. A group owns its chat-room roster as a map of [`ChatMember`]s.
//! Every record can exist as a *placeholder* (an id, every other field at
//! its zero value) until later messages fill it in.

use std::collections::HashMap;

use serde::Serialize;
use steamsync_protocol::body::ChatMemberRecord;
use steamsync_protocol::{
    ChatPermission, ClanRank, ClanRelationship, FriendRelationship, PersonaState,
    PersonaStateFlags, SteamId,
};

/// A record that can live in an [`EntityCache`](crate::EntityCache).
pub trait Entity: Clone {
    /// The id this record is stored under (before normalization).
    fn steam_id(&self) -> SteamId;

    /// Overwrites the record's id. The cache calls this with the
    /// canonical id so stored records always carry their key.
    fn set_steam_id(&mut self, id: SteamId);

    /// A record with only an id.
    fn placeholder(id: SteamId) -> Self;
}

// ---------------------------------------------------------------------------
// Friend
// ---------------------------------------------------------------------------

/// An individual the local user has a relationship with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Friend {
    pub steam_id: SteamId,
    pub name: String,
    pub avatar_hash: Vec<u8>,
    pub relationship: FriendRelationship,
    pub persona_state: PersonaState,
    pub persona_state_flags: PersonaStateFlags,
    pub game_app_id: u32,
    pub game_id: u64,
    pub game_name: String,
    pub game_server_ip: u32,
    pub game_server_port: u32,
    pub clan_tag: String,
    pub clan_rank: ClanRank,
    pub online_session_instances: u32,
    pub facebook_name: String,
    pub facebook_id: u64,
}

impl Friend {
    pub fn new(steam_id: SteamId, relationship: FriendRelationship) -> Self {
        Self {
            steam_id,
            relationship,
            ..Self::default()
        }
    }
}

impl Entity for Friend {
    fn steam_id(&self) -> SteamId {
        self.steam_id
    }

    fn set_steam_id(&mut self, id: SteamId) {
        self.steam_id = id;
    }

    fn placeholder(id: SteamId) -> Self {
        Self {
            steam_id: id,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// Aggregate member counts of a clan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemberCounts {
    pub total: u32,
    pub online: u32,
    pub chatting: u32,
    pub in_game: u32,
}

/// A clan the local user belongs to, or a chat room seen before any clan
/// data arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Group {
    pub steam_id: SteamId,
    pub name: String,
    pub avatar_hash: Vec<u8>,
    pub relationship: ClanRelationship,
    pub member_counts: MemberCounts,
    /// `None` until the first chat member is added; never `None` again
    /// afterwards.
    pub chat_members: Option<HashMap<SteamId, ChatMember>>,
}

impl Group {
    pub fn new(steam_id: SteamId, relationship: ClanRelationship) -> Self {
        Self {
            steam_id,
            relationship,
            ..Self::default()
        }
    }

    /// Looks up one member of this group's chat room.
    pub fn chat_member(&self, id: SteamId) -> Option<&ChatMember> {
        self.chat_members.as_ref()?.get(&id)
    }
}

impl Entity for Group {
    fn steam_id(&self) -> SteamId {
        self.steam_id
    }

    fn set_steam_id(&mut self, id: SteamId) {
        self.steam_id = id;
    }

    fn placeholder(id: SteamId) -> Self {
        Self {
            steam_id: id,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// ChatMember
// ---------------------------------------------------------------------------

/// One occupant of a group's chat room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChatMember {
    pub steam_id: SteamId,
    pub permissions: ChatPermission,
    pub rank: ClanRank,
}

impl From<ChatMemberRecord> for ChatMember {
    fn from(record: ChatMemberRecord) -> Self {
        Self {
            steam_id: record.steam_id,
            permissions: record.permissions,
            rank: record.rank,
        }
    }
}
