//! Wire enumerations.
//!
//! The remote protocol grows new values faster than any client tracks
//! them, so these are *open* enumerations: a newtype over the raw wire
//! integer with named constants for the values we know. A value we have
//! no name for is carried through unchanged instead of being rejected.
//!
//! ```rust
//! use steamsync_protocol::FriendRelationship;
//!
//! let rel = FriendRelationship(3);
//! assert_eq!(rel, FriendRelationship::FRIEND);
//! assert_eq!(rel.to_string(), "FRIEND");
//!
//! // Unknown values survive and still print something useful.
//! assert_eq!(FriendRelationship(42).to_string(), "FriendRelationship(42)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares an open wire enumeration.
///
/// Generates the newtype, one associated constant per known value, a
/// `name()` lookup, and a `Display` impl that falls back to
/// `TypeName(raw)` for unknown values. `#[serde(transparent)]` makes the
/// JSON form the bare number.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident($repr:ty) {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $repr);

        impl $name {
            $( $(#[$vmeta])* pub const $variant: Self = Self($value); )*

            /// Returns the constant name for this value, or `None` if the
            /// value is not one this client knows.
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $( v if v == $value => Some(stringify!($variant)), )*
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "{}({})", stringify!($name), self.0),
                }
            }
        }
    };
}

/// Adds bitmask helpers to a `wire_enum!` type whose values are flags.
macro_rules! wire_flags {
    ($name:ident) => {
        impl $name {
            /// Returns `true` if every bit of `other` is set in `self`.
            pub fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Message kinds
// ---------------------------------------------------------------------------

wire_enum! {
    /// The logical message kind of a frame, with the protobuf flag bit
    /// already stripped. See [`EMsg::from_raw`].
    EMsg(u32) {
        CLIENT_CHAT_ACTION_RESULT = 598,
        CLIENT_PERSONA_STATE = 766,
        CLIENT_FRIENDS_LIST = 767,
        CLIENT_ACCOUNT_INFO = 768,
        CLIENT_ADD_FRIEND_RESPONSE = 792,
        CLIENT_CHAT_MSG = 799,
        CLIENT_CHAT_INVITE = 800,
        CLIENT_CHAT_MEMBER_INFO = 802,
        CLIENT_CHAT_ENTER = 807,
        CLIENT_CLAN_STATE = 822,
        CLIENT_SET_IGNORE_FRIEND_RESPONSE = 856,
        CLIENT_FRIEND_MSG_INCOMING = 5427,
        CLIENT_FRIEND_PROFILE_INFO_RESPONSE = 7601,
    }
}

impl EMsg {
    /// Bit 31 of the raw type code: set when the body is protobuf-encoded.
    pub const PROTO_MASK: u32 = 0x8000_0000;

    /// Strips the protobuf flag from a raw type code, leaving the logical
    /// message kind used for routing.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw & !Self::PROTO_MASK)
    }

    /// Returns `true` if the raw type code flags a protobuf body.
    pub fn is_proto(raw: u32) -> bool {
        raw & Self::PROTO_MASK != 0
    }

    /// Builds the raw type code for this kind, setting the protobuf flag
    /// when `proto` is true.
    pub fn to_raw(self, proto: bool) -> u32 {
        if proto {
            self.0 | Self::PROTO_MASK
        } else {
            self.0
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

wire_enum! {
    /// The account-type tag stored in bits 52–55 of a [`SteamId`](crate::SteamId).
    AccountType(u8) {
        INVALID = 0,
        INDIVIDUAL = 1,
        MULTISEAT = 2,
        GAME_SERVER = 3,
        ANON_GAME_SERVER = 4,
        PENDING = 5,
        CONTENT_SERVER = 6,
        CLAN = 7,
        CHAT = 8,
        CONSOLE_USER = 9,
        ANON_USER = 10,
    }
}

wire_enum! {
    /// Account-level flags reported for a clan.
    AccountFlags(u32) {
        NORMAL_USER = 0,
        PERSONA_NAME_SET = 1,
        UNBANNABLE = 2,
        PASSWORD_SET = 4,
        SUPPORT = 8,
        ADMIN = 16,
        SUPERVISOR = 32,
        APP_EDITOR = 64,
        HW_ID_SET = 128,
    }
}
wire_flags!(AccountFlags);

// ---------------------------------------------------------------------------
// Relationships and presence
// ---------------------------------------------------------------------------

wire_enum! {
    /// The local user's relationship to another individual.
    FriendRelationship(u32) {
        NONE = 0,
        BLOCKED = 1,
        REQUEST_RECIPIENT = 2,
        FRIEND = 3,
        REQUEST_INITIATOR = 4,
        IGNORED = 5,
        IGNORED_FRIEND = 6,
        SUGGESTED_FRIEND = 7,
    }
}

wire_enum! {
    /// The local user's relationship to a clan.
    ClanRelationship(u32) {
        NONE = 0,
        BLOCKED = 1,
        INVITED = 2,
        MEMBER = 3,
        KICKED = 4,
        KICK_ACKNOWLEDGED = 5,
    }
}

wire_enum! {
    /// Online status of a persona.
    PersonaState(u32) {
        OFFLINE = 0,
        ONLINE = 1,
        BUSY = 2,
        AWAY = 3,
        SNOOZE = 4,
        LOOKING_TO_TRADE = 5,
        LOOKING_TO_PLAY = 6,
    }
}

wire_enum! {
    /// Extra presence bits attached to a persona.
    PersonaStateFlags(u32) {
        NONE = 0,
        HAS_RICH_PRESENCE = 1,
        IN_JOINABLE_GAME = 2,
        ONLINE_USING_WEB = 256,
        ONLINE_USING_MOBILE = 512,
        ONLINE_USING_BIG_PICTURE = 1024,
    }
}
wire_flags!(PersonaStateFlags);

wire_enum! {
    /// Which sections a persona-state message carries.
    ClientPersonaStateFlags(u32) {
        NONE = 0,
        STATUS = 1,
        PLAYER_NAME = 2,
        QUERY_PORT = 4,
        SOURCE_ID = 8,
        PRESENCE = 16,
        METADATA = 32,
        LAST_SEEN = 64,
        CLAN_INFO = 128,
        GAME_EXTRA_INFO = 256,
        GAME_DATA_BLOB = 512,
        CLAN_TAG = 1024,
        FACEBOOK = 2048,
    }
}
wire_flags!(ClientPersonaStateFlags);

// ---------------------------------------------------------------------------
// Clans and chat rooms
// ---------------------------------------------------------------------------

wire_enum! {
    /// A member's rank inside a clan.
    ClanRank(u32) {
        NONE = 0,
        OWNER = 1,
        OFFICER = 2,
        MEMBER = 3,
        MODERATOR = 4,
    }
}

impl ClanRank {
    /// Maps a rank as it appears in a chat-member record onto the clan
    /// rank enumeration.
    ///
    /// Chat-member records use their own numbering for two ranks: raw `4`
    /// means member and raw `8` means moderator. Every other value already
    /// agrees with the clan numbering and passes through unchanged.
    pub fn from_chat_rank(raw: u32) -> Self {
        match raw {
            4 => Self::MEMBER,
            8 => Self::MODERATOR,
            other => Self(other),
        }
    }
}

wire_enum! {
    /// Permission bits of a chat-room member.
    ChatPermission(u32) {
        NONE = 0,
        CLOSE = 1,
        INVITE = 2,
        TALK = 8,
        KICK = 16,
        MUTE = 32,
        SET_METADATA = 64,
        CHANGE_PERMISSIONS = 128,
        BAN = 256,
        CHANGE_ACCESS = 512,
    }
}
wire_flags!(ChatPermission);

wire_enum! {
    /// What happened to a chat-room member.
    ChatMemberStateChange(i32) {
        ENTERED = 0x01,
        LEFT = 0x02,
        DISCONNECTED = 0x04,
        KICKED = 0x08,
        BANNED = 0x10,
        VOICE_SPEAKING = 0x1000,
        VOICE_DONE_SPEAKING = 0x2000,
    }
}

impl ChatMemberStateChange {
    /// Returns `true` for state changes that take the member out of the
    /// room (left, disconnected, kicked, banned).
    pub fn is_departure(self) -> bool {
        matches!(
            self,
            Self::LEFT | Self::DISCONNECTED | Self::KICKED | Self::BANNED
        )
    }
}

wire_enum! {
    /// Sub-type of a chat-member-info message.
    ChatInfoType(i32) {
        STATE_CHANGE = 1,
        INFO_UPDATE = 2,
        MEMBER_LIMIT_CHANGE = 3,
    }
}

wire_enum! {
    /// Kind of a chat entry (message, typing notification, emote, ...).
    ChatEntryType(i32) {
        INVALID = 0,
        CHAT_MSG = 1,
        TYPING = 2,
        INVITE_GAME = 3,
        EMOTE = 4,
        LEFT_CONVERSATION = 6,
        ENTERED = 7,
        WAS_KICKED = 8,
        WAS_BANNED = 9,
        DISCONNECTED = 10,
        HISTORICAL_CHAT = 11,
    }
}

wire_enum! {
    /// Kind of chat room.
    ChatRoomType(i32) {
        FRIEND = 1,
        MUC = 2,
        LOBBY = 3,
    }
}

wire_enum! {
    /// Outcome of an attempt to enter a chat room.
    ChatRoomEnterResponse(i32) {
        SUCCESS = 1,
        DOESNT_EXIST = 2,
        NOT_ALLOWED = 3,
        FULL = 4,
        ERROR = 5,
        BANNED = 6,
        LIMITED = 7,
        CLAN_DISABLED = 8,
        COMMUNITY_BAN = 9,
        MEMBER_BLOCKED_YOU = 10,
        YOU_BLOCKED_MEMBER = 11,
    }
}

wire_enum! {
    /// A moderation action on a chat room or one of its members.
    ChatAction(i32) {
        INVITE_CHAT = 1,
        KICK = 2,
        BAN = 3,
        UNBAN = 4,
        START_VOICE_SPEAK = 5,
        END_VOICE_SPEAK = 6,
        LOCK_CHAT = 7,
        UNLOCK_CHAT = 8,
        CLOSE_CHAT = 9,
        SET_JOINABLE = 10,
        SET_UNJOINABLE = 11,
        SET_OWNER = 12,
        SET_INVITE_ONLY = 13,
        SET_UNINVITE_ONLY = 14,
    }
}

wire_enum! {
    /// Outcome of a [`ChatAction`].
    ChatActionResult(i32) {
        SUCCESS = 1,
        ERROR = 2,
        NOT_PERMITTED = 3,
        NOT_ALLOWED_ON_CLAN_MEMBER = 4,
        NOT_ALLOWED_ON_BANNED_USER = 5,
        NOT_ALLOWED_ON_CHAT_OWNER = 6,
        NOT_ALLOWED_ON_SELF = 7,
        CHAT_DOESNT_EXIST = 8,
        CHAT_FULL = 9,
        VOICE_SLOTS_FULL = 10,
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

wire_enum! {
    /// Generic result code carried by response messages.
    EResult(i32) {
        INVALID = 0,
        OK = 1,
        FAIL = 2,
        NO_CONNECTION = 3,
        INVALID_PASSWORD = 5,
        LOGGED_IN_ELSEWHERE = 6,
        INVALID_PROTOCOL_VER = 7,
        INVALID_PARAM = 8,
        FILE_NOT_FOUND = 9,
        BUSY = 10,
        INVALID_STATE = 11,
        INVALID_NAME = 12,
        INVALID_EMAIL = 13,
        DUPLICATE_NAME = 14,
        ACCESS_DENIED = 15,
        TIMEOUT = 16,
        BANNED = 17,
        ACCOUNT_NOT_FOUND = 18,
        INVALID_STEAM_ID = 19,
        SERVICE_UNAVAILABLE = 20,
        NOT_LOGGED_ON = 21,
        PENDING = 22,
        LIMIT_EXCEEDED = 25,
        REVOKED = 26,
        EXPIRED = 27,
        ALREADY_REDEEMED = 28,
        DUPLICATE_REQUEST = 29,
        IGNORED = 31,
        BLOCKED = 40,
    }
}
