//! Protobuf-encoded message bodies.
//!
//! These are the structured bodies carried by frames whose type code has
//! the protobuf flag set. Field names and tags follow the remote
//! protocol's `.proto` definitions; only the messages this client reads
//! are declared.
//!
//! Every scalar is `optional` (proto2), so `prost` generates a null-safe
//! accessor for each one: `msg.steamid_clan()` returns `0` when the field
//! is absent, `msg.player_name()` returns `""`. Repeated fields are plain
//! `Vec`s, empty when absent. Decoders never need to distinguish
//! "absent" from "zero" except for the nested sections of
//! [`CMsgClientClanState`], which stay `Option`.

#![allow(clippy::struct_field_names)]

use prost::Message;

/// Header that precedes every protobuf body inside a frame.
#[derive(Clone, PartialEq, Message)]
pub struct CMsgProtoBufHeader {
    #[prost(fixed64, optional, tag = "1")]
    pub steamid: Option<u64>,
    #[prost(int32, optional, tag = "2")]
    pub client_sessionid: Option<i32>,
    #[prost(uint32, optional, tag = "3")]
    pub routing_appid: Option<u32>,
    #[prost(fixed64, optional, tag = "10", default = "18446744073709551615")]
    pub jobid_source: Option<u64>,
    #[prost(fixed64, optional, tag = "11", default = "18446744073709551615")]
    pub jobid_target: Option<u64>,
    #[prost(string, optional, tag = "12")]
    pub target_job_name: Option<String>,
    #[prost(int32, optional, tag = "13", default = "2")]
    pub eresult: Option<i32>,
    #[prost(string, optional, tag = "14")]
    pub error_message: Option<String>,
}

// ---------------------------------------------------------------------------
// Friends list
// ---------------------------------------------------------------------------

/// The local user's relationship list, either complete or a delta.
#[derive(Clone, PartialEq, Message)]
pub struct CMsgClientFriendsList {
    #[prost(bool, optional, tag = "1")]
    pub bincremental: Option<bool>,
    #[prost(message, repeated, tag = "2")]
    pub friends: Vec<cmsg_client_friends_list::Friend>,
    #[prost(uint32, optional, tag = "3")]
    pub max_friend_count: Option<u32>,
    #[prost(uint32, optional, tag = "4")]
    pub active_friend_count: Option<u32>,
    #[prost(bool, optional, tag = "5")]
    pub friends_limit_hit: Option<bool>,
}

pub mod cmsg_client_friends_list {
    use prost::Message;

    /// One (id, relationship) pair.
    #[derive(Clone, PartialEq, Message)]
    pub struct Friend {
        #[prost(fixed64, optional, tag = "1")]
        pub ulfriendid: Option<u64>,
        #[prost(uint32, optional, tag = "2")]
        pub efriendrelationship: Option<u32>,
    }
}

// ---------------------------------------------------------------------------
// Persona state
// ---------------------------------------------------------------------------

/// Presence updates for one or more accounts.
#[derive(Clone, PartialEq, Message)]
pub struct CMsgClientPersonaState {
    #[prost(uint32, optional, tag = "1")]
    pub status_flags: Option<u32>,
    #[prost(message, repeated, tag = "2")]
    pub friends: Vec<cmsg_client_persona_state::Friend>,
}

pub mod cmsg_client_persona_state {
    use prost::Message;

    /// The partial presence of one account. Which fields are present
    /// depends on the outer `status_flags`.
    #[derive(Clone, PartialEq, Message)]
    pub struct Friend {
        #[prost(fixed64, optional, tag = "1")]
        pub friendid: Option<u64>,
        #[prost(uint32, optional, tag = "2")]
        pub persona_state: Option<u32>,
        #[prost(uint32, optional, tag = "3")]
        pub game_played_app_id: Option<u32>,
        #[prost(uint32, optional, tag = "4")]
        pub game_server_ip: Option<u32>,
        #[prost(uint32, optional, tag = "5")]
        pub game_server_port: Option<u32>,
        #[prost(uint32, optional, tag = "6")]
        pub persona_state_flags: Option<u32>,
        #[prost(uint32, optional, tag = "7")]
        pub online_session_instances: Option<u32>,
        #[prost(uint32, optional, tag = "8")]
        pub published_instance_id: Option<u32>,
        #[prost(bool, optional, tag = "10")]
        pub persona_set_by_user: Option<bool>,
        #[prost(string, optional, tag = "15")]
        pub player_name: Option<String>,
        #[prost(uint32, optional, tag = "20")]
        pub query_port: Option<u32>,
        #[prost(fixed64, optional, tag = "25")]
        pub steamid_source: Option<u64>,
        #[prost(bytes = "vec", optional, tag = "31")]
        pub avatar_hash: Option<Vec<u8>>,
        #[prost(uint32, optional, tag = "45")]
        pub last_logoff: Option<u32>,
        #[prost(uint32, optional, tag = "46")]
        pub last_logon: Option<u32>,
        #[prost(uint32, optional, tag = "50")]
        pub clan_rank: Option<u32>,
        #[prost(string, optional, tag = "55")]
        pub game_name: Option<String>,
        #[prost(fixed64, optional, tag = "56")]
        pub gameid: Option<u64>,
        #[prost(bytes = "vec", optional, tag = "60")]
        pub game_data_blob: Option<Vec<u8>>,
        #[prost(string, optional, tag = "65")]
        pub clan_tag: Option<String>,
        #[prost(string, optional, tag = "66")]
        pub facebook_name: Option<String>,
        #[prost(uint64, optional, tag = "67")]
        pub facebook_id: Option<u64>,
    }
}

// ---------------------------------------------------------------------------
// Clan state
// ---------------------------------------------------------------------------

/// Name, member counts, and news for one clan.
#[derive(Clone, PartialEq, Message)]
pub struct CMsgClientClanState {
    #[prost(fixed64, optional, tag = "1")]
    pub steamid_clan: Option<u64>,
    #[prost(uint32, optional, tag = "2")]
    pub m_un_status_flags: Option<u32>,
    #[prost(uint32, optional, tag = "3")]
    pub clan_account_flags: Option<u32>,
    #[prost(message, optional, tag = "4")]
    pub name_info: Option<cmsg_client_clan_state::NameInfo>,
    #[prost(message, optional, tag = "5")]
    pub user_counts: Option<cmsg_client_clan_state::UserCounts>,
    #[prost(message, repeated, tag = "6")]
    pub events: Vec<cmsg_client_clan_state::Event>,
    #[prost(message, repeated, tag = "7")]
    pub announcements: Vec<cmsg_client_clan_state::Event>,
}

pub mod cmsg_client_clan_state {
    use prost::Message;

    #[derive(Clone, PartialEq, Message)]
    pub struct NameInfo {
        #[prost(string, optional, tag = "1")]
        pub clan_name: Option<String>,
        #[prost(bytes = "vec", optional, tag = "2")]
        pub sha_avatar: Option<Vec<u8>>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct UserCounts {
        #[prost(uint32, optional, tag = "1")]
        pub members: Option<u32>,
        #[prost(uint32, optional, tag = "2")]
        pub online: Option<u32>,
        #[prost(uint32, optional, tag = "3")]
        pub chatting: Option<u32>,
        #[prost(uint32, optional, tag = "4")]
        pub in_game: Option<u32>,
    }

    /// An event or an announcement; both share this shape.
    #[derive(Clone, PartialEq, Message)]
    pub struct Event {
        #[prost(fixed64, optional, tag = "1")]
        pub gid: Option<u64>,
        #[prost(uint32, optional, tag = "2")]
        pub event_time: Option<u32>,
        #[prost(string, optional, tag = "3")]
        pub headline: Option<String>,
        #[prost(fixed64, optional, tag = "4")]
        pub game_id: Option<u64>,
        #[prost(bool, optional, tag = "5")]
        pub just_posted: Option<bool>,
    }
}

// ---------------------------------------------------------------------------
// Messages, account, and responses
// ---------------------------------------------------------------------------

/// A one-to-one chat message from another user.
#[derive(Clone, PartialEq, Message)]
pub struct CMsgClientFriendMsgIncoming {
    #[prost(fixed64, optional, tag = "1")]
    pub steamid_from: Option<u64>,
    #[prost(int32, optional, tag = "2")]
    pub chat_entry_type: Option<i32>,
    #[prost(bool, optional, tag = "3")]
    pub from_limited_account: Option<bool>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub message: Option<Vec<u8>>,
    #[prost(fixed32, optional, tag = "5")]
    pub rtime32_server_timestamp: Option<u32>,
}

/// Details about the logged-in account.
#[derive(Clone, PartialEq, Message)]
pub struct CMsgClientAccountInfo {
    #[prost(string, optional, tag = "1")]
    pub persona_name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub ip_country: Option<String>,
    #[prost(int32, optional, tag = "5")]
    pub count_authed_computers: Option<i32>,
    #[prost(uint32, optional, tag = "7")]
    pub account_flags: Option<u32>,
}

/// The server's answer to an add-friend request.
#[derive(Clone, PartialEq, Message)]
pub struct CMsgClientAddFriendResponse {
    #[prost(int32, optional, tag = "1", default = "2")]
    pub eresult: Option<i32>,
    #[prost(fixed64, optional, tag = "2")]
    pub steam_id_added: Option<u64>,
    #[prost(string, optional, tag = "3")]
    pub persona_name_added: Option<String>,
}

/// An invitation into a chat room.
#[derive(Clone, PartialEq, Message)]
pub struct CMsgClientChatInvite {
    #[prost(fixed64, optional, tag = "1")]
    pub steam_id_invited: Option<u64>,
    #[prost(fixed64, optional, tag = "2")]
    pub steam_id_chat: Option<u64>,
    #[prost(fixed64, optional, tag = "3")]
    pub steam_id_patron: Option<u64>,
    #[prost(int32, optional, tag = "4")]
    pub chatroom_type: Option<i32>,
    #[prost(fixed64, optional, tag = "5")]
    pub steam_id_friend_chat: Option<u64>,
    #[prost(string, optional, tag = "6")]
    pub chat_name: Option<String>,
    #[prost(fixed64, optional, tag = "7")]
    pub game_id: Option<u64>,
}

/// Public profile fields of one account.
#[derive(Clone, PartialEq, Message)]
pub struct CMsgClientFriendProfileInfoResponse {
    #[prost(int32, optional, tag = "1", default = "2")]
    pub eresult: Option<i32>,
    #[prost(fixed64, optional, tag = "2")]
    pub steamid_friend: Option<u64>,
    #[prost(uint32, optional, tag = "3")]
    pub time_created: Option<u32>,
    #[prost(string, optional, tag = "4")]
    pub real_name: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub city_name: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub state_name: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub country_name: Option<String>,
    #[prost(string, optional, tag = "8")]
    pub headline: Option<String>,
    #[prost(string, optional, tag = "9")]
    pub summary: Option<String>,
}

/// Decodes a protobuf body, converting the error into a
/// [`ProtocolError`](crate::ProtocolError).
pub(crate) fn decode<M: Message + Default>(
    body: &[u8],
) -> Result<M, crate::ProtocolError> {
    Ok(M::decode(body)?)
}
