//! Domain events published by the synchronizer.
//!
//! One [`Event`] value per state change. Each variant wraps a plain
//! struct carrying every decoded field, so a consumer never has to go
//! back to the wire message. Events derive `Serialize`; the JSON form is
//! internally tagged:
//!
//! ```json
//! {"type":"friend_state","steam_id":76561197960265729,"relationship":3}
//! ```

use serde::Serialize;
use steamsync_protocol::body::{
    ClientChatActionResult, ClientChatEnter, ClientChatMemberInfo, ClientChatMsg,
};
use steamsync_protocol::proto::{
    CMsgClientChatInvite, CMsgClientClanState, CMsgClientFriendMsgIncoming,
    CMsgClientFriendProfileInfoResponse, cmsg_client_clan_state,
    cmsg_client_persona_state,
};
use steamsync_protocol::{
    AccountFlags, ChatAction, ChatActionResult, ChatEntryType, ChatInfoType,
    ChatMemberStateChange, ChatRoomEnterResponse, ChatRoomType, ClanRank,
    ClanRelationship, ClientPersonaStateFlags, EResult, FriendRelationship,
    PersonaState, PersonaStateFlags, SteamId, text_until_nul,
};

/// Everything the synchronizer can report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// One contact's relationship changed (incremental friends list).
    FriendState(FriendStateEvent),
    /// One clan relationship changed (incremental friends list).
    GroupState(GroupStateEvent),
    /// A complete friends list was applied.
    FriendsList(FriendsListEvent),
    PersonaState(Box<PersonaStateEvent>),
    ClanState(ClanStateEvent),
    /// A one-to-one or chat-room message.
    ChatMsg(ChatMsgEvent),
    ChatEnter(ChatEnterEvent),
    ChatMemberInfo(ChatMemberInfoEvent),
    ChatActionResult(ChatActionResultEvent),
    ChatInvite(ChatInviteEvent),
    IgnoreFriend(IgnoreFriendEvent),
    FriendAdded(FriendAddedEvent),
    ProfileInfo(ProfileInfoEvent),
    AccountInfo(AccountInfoEvent),
}

// ---------------------------------------------------------------------------
// Friends list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FriendStateEvent {
    pub steam_id: SteamId,
    pub relationship: FriendRelationship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupStateEvent {
    pub steam_id: SteamId,
    pub relationship: ClanRelationship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FriendsListEvent {
    /// How many (id, relationship) pairs the list carried.
    pub entries: usize,
}

// ---------------------------------------------------------------------------
// Persona and clan state
// ---------------------------------------------------------------------------

/// The full decoded presence of one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonaStateEvent {
    pub status_flags: ClientPersonaStateFlags,
    pub friend_id: SteamId,
    pub state: PersonaState,
    pub state_flags: PersonaStateFlags,
    pub game_app_id: u32,
    pub game_id: u64,
    pub game_name: String,
    pub game_server_ip: u32,
    pub game_server_port: u32,
    pub query_port: u32,
    pub source_steam_id: SteamId,
    pub game_data_blob: Vec<u8>,
    pub name: String,
    pub avatar_hash: Vec<u8>,
    pub last_log_off: u32,
    pub last_log_on: u32,
    pub clan_rank: ClanRank,
    pub clan_tag: String,
    pub online_session_instances: u32,
    pub published_instance_id: u32,
    pub persona_set_by_user: bool,
    pub facebook_name: String,
    pub facebook_id: u64,
}

impl PersonaStateEvent {
    pub(crate) fn from_wire(
        status_flags: ClientPersonaStateFlags,
        f: &cmsg_client_persona_state::Friend,
    ) -> Self {
        Self {
            status_flags,
            friend_id: SteamId(f.friendid()),
            state: PersonaState(f.persona_state()),
            state_flags: PersonaStateFlags(f.persona_state_flags()),
            game_app_id: f.game_played_app_id(),
            game_id: f.gameid(),
            game_name: f.game_name().to_owned(),
            game_server_ip: f.game_server_ip(),
            game_server_port: f.game_server_port(),
            query_port: f.query_port(),
            source_steam_id: SteamId(f.steamid_source()),
            game_data_blob: f.game_data_blob().to_vec(),
            name: f.player_name().to_owned(),
            avatar_hash: f.avatar_hash().to_vec(),
            last_log_off: f.last_logoff(),
            last_log_on: f.last_logon(),
            clan_rank: ClanRank(f.clan_rank()),
            clan_tag: f.clan_tag().to_owned(),
            online_session_instances: f.online_session_instances(),
            published_instance_id: f.published_instance_id(),
            persona_set_by_user: f.persona_set_by_user(),
            facebook_name: f.facebook_name().to_owned(),
            facebook_id: f.facebook_id(),
        }
    }
}

/// One clan event or announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClanEventDetails {
    pub id: u64,
    pub event_time: u32,
    pub headline: String,
    pub game_id: u64,
    pub just_posted: bool,
}

impl From<&cmsg_client_clan_state::Event> for ClanEventDetails {
    fn from(e: &cmsg_client_clan_state::Event) -> Self {
        Self {
            id: e.gid(),
            event_time: e.event_time(),
            headline: e.headline().to_owned(),
            game_id: e.game_id(),
            just_posted: e.just_posted(),
        }
    }
}

/// A clan-state message as decoded. Absent sections report zero values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClanStateEvent {
    pub clan_id: SteamId,
    pub state_flags: ClientPersonaStateFlags,
    pub account_flags: AccountFlags,
    pub clan_name: String,
    pub avatar_hash: Vec<u8>,
    pub member_total_count: u32,
    pub member_online_count: u32,
    pub member_chatting_count: u32,
    pub member_in_game_count: u32,
    pub events: Vec<ClanEventDetails>,
    pub announcements: Vec<ClanEventDetails>,
}

impl From<&CMsgClientClanState> for ClanStateEvent {
    fn from(body: &CMsgClientClanState) -> Self {
        let (clan_name, avatar_hash) = body
            .name_info
            .as_ref()
            .map(|n| (n.clan_name().to_owned(), n.sha_avatar().to_vec()))
            .unwrap_or_default();
        let counts = body.user_counts.clone().unwrap_or_default();
        Self {
            clan_id: SteamId(body.steamid_clan()),
            state_flags: ClientPersonaStateFlags(body.m_un_status_flags()),
            account_flags: AccountFlags(body.clan_account_flags()),
            clan_name,
            avatar_hash,
            member_total_count: counts.members(),
            member_online_count: counts.online(),
            member_chatting_count: counts.chatting(),
            member_in_game_count: counts.in_game(),
            events: body.events.iter().map(ClanEventDetails::from).collect(),
            announcements: body
                .announcements
                .iter()
                .map(ClanEventDetails::from)
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A chat message. `chat_room_id` is `None` for one-to-one messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMsgEvent {
    pub chat_room_id: Option<SteamId>,
    pub chatter_id: SteamId,
    pub message: String,
    pub entry_type: ChatEntryType,
}

impl From<&CMsgClientFriendMsgIncoming> for ChatMsgEvent {
    fn from(body: &CMsgClientFriendMsgIncoming) -> Self {
        Self {
            chat_room_id: None,
            chatter_id: SteamId(body.steamid_from()),
            message: text_until_nul(body.message()),
            entry_type: ChatEntryType(body.chat_entry_type()),
        }
    }
}

impl From<ClientChatMsg> for ChatMsgEvent {
    fn from(body: ClientChatMsg) -> Self {
        Self {
            chat_room_id: Some(body.room),
            chatter_id: body.chatter,
            message: body.text,
            entry_type: body.entry_type,
        }
    }
}

/// Room metadata from a chat-enter response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEnterEvent {
    pub chat_room_id: SteamId,
    pub friend_id: SteamId,
    pub chat_room_type: ChatRoomType,
    pub owner_id: SteamId,
    pub clan_id: SteamId,
    pub chat_flags: u8,
    pub enter_response: ChatRoomEnterResponse,
    pub name: String,
    pub member_count: usize,
}

impl From<&ClientChatEnter> for ChatEnterEvent {
    fn from(body: &ClientChatEnter) -> Self {
        Self {
            chat_room_id: body.room,
            friend_id: body.friend,
            chat_room_type: body.room_type,
            owner_id: body.owner,
            clan_id: body.clan,
            chat_flags: body.flags,
            enter_response: body.enter_response,
            name: body.name.clone(),
            member_count: body.members.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateChangeDetails {
    pub chatter_acted_on: SteamId,
    pub state_change: ChatMemberStateChange,
    pub chatter_acted_by: SteamId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatMemberInfoEvent {
    pub chat_room_id: SteamId,
    pub info_type: ChatInfoType,
    /// Present for state-change messages only.
    pub state_change_info: Option<StateChangeDetails>,
}

impl From<&ClientChatMemberInfo> for ChatMemberInfoEvent {
    fn from(body: &ClientChatMemberInfo) -> Self {
        Self {
            chat_room_id: body.room,
            info_type: body.info_type,
            state_change_info: body.state_change.map(|sc| StateChangeDetails {
                chatter_acted_on: sc.acted_on,
                state_change: sc.change,
                chatter_acted_by: sc.acted_by,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatActionResultEvent {
    pub chat_room_id: SteamId,
    pub chatter_id: SteamId,
    pub action: ChatAction,
    pub result: ChatActionResult,
}

impl From<ClientChatActionResult> for ChatActionResultEvent {
    fn from(body: ClientChatActionResult) -> Self {
        Self {
            chat_room_id: body.room,
            chatter_id: body.acted_on,
            action: body.action,
            result: body.result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatInviteEvent {
    pub invited_id: SteamId,
    pub chat_room_id: SteamId,
    pub patron_id: SteamId,
    pub chat_room_type: ChatRoomType,
    pub friend_chat_id: SteamId,
    pub chat_room_name: String,
    pub game_id: u64,
}

impl From<&CMsgClientChatInvite> for ChatInviteEvent {
    fn from(body: &CMsgClientChatInvite) -> Self {
        Self {
            invited_id: SteamId(body.steam_id_invited()),
            chat_room_id: SteamId(body.steam_id_chat()),
            patron_id: SteamId(body.steam_id_patron()),
            chat_room_type: ChatRoomType(body.chatroom_type()),
            friend_chat_id: SteamId(body.steam_id_friend_chat()),
            chat_room_name: body.chat_name().to_owned(),
            game_id: body.game_id(),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses and account
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IgnoreFriendEvent {
    pub result: EResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendAddedEvent {
    pub result: EResult,
    pub steam_id: SteamId,
    pub persona_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileInfoEvent {
    pub result: EResult,
    pub steam_id: SteamId,
    pub time_created: u32,
    pub real_name: String,
    pub city_name: String,
    pub state_name: String,
    pub country_name: String,
    pub headline: String,
    pub summary: String,
}

impl From<&CMsgClientFriendProfileInfoResponse> for ProfileInfoEvent {
    fn from(body: &CMsgClientFriendProfileInfoResponse) -> Self {
        Self {
            result: EResult(body.eresult()),
            steam_id: SteamId(body.steamid_friend()),
            time_created: body.time_created(),
            real_name: body.real_name().to_owned(),
            city_name: body.city_name().to_owned(),
            state_name: body.state_name().to_owned(),
            country_name: body.country_name().to_owned(),
            headline: body.headline().to_owned(),
            summary: body.summary().to_owned(),
        }
    }
}

/// The local account's persona, as last reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfoEvent {
    pub persona_name: String,
    pub country: String,
}
