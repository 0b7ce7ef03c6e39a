//! The social state synchronizer.
//!
//! [`Social`] owns the two caches and the event bus. Each decoded
//! message goes through [`Social::apply`], which writes the caches first
//! and publishes afterwards, so a subscriber that reads a cache in
//! response to an event always sees the write that caused it.
//!
//! The synchronizer is synchronous and takes `&self` everywhere. Share it
//! behind an `Arc` between the task feeding frames and the application
//! threads reading caches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use steamsync_cache::{
    CacheReader, ChatMember, Friend, FriendsList, Group, GroupsList, MemberCounts,
};
use steamsync_protocol::body::{ClientChatEnter, ClientChatMemberInfo};
use steamsync_protocol::proto::{
    CMsgClientAccountInfo, CMsgClientAddFriendResponse, CMsgClientClanState,
    CMsgClientFriendsList, CMsgClientPersonaState, cmsg_client_persona_state,
};
use steamsync_protocol::{
    ChatMemberStateChange, ClanRank, ClanRelationship, ClientPersonaStateFlags,
    DecodeConfig, EResult, Frame, FriendRelationship, MessageKind, PersonaState,
    PersonaStateFlags, ProtocolError, SocialMessage, SteamId,
};

use crate::bus::{EventBus, EventStream};
use crate::events::{
    AccountInfoEvent, ChatActionResultEvent, ChatEnterEvent, ChatInviteEvent,
    ChatMemberInfoEvent, ChatMsgEvent, ClanStateEvent, Event, FriendAddedEvent,
    FriendStateEvent, FriendsListEvent, GroupStateEvent, IgnoreFriendEvent,
    PersonaStateEvent, ProfileInfoEvent,
};

/// Frame counters since the synchronizer was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Frames decoded and applied.
    pub applied: u64,
    /// Frames of a kind this client does not handle.
    pub ignored: u64,
    /// Frames that failed to decode.
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    applied: AtomicU64,
    ignored: AtomicU64,
    dropped: AtomicU64,
}

/// The local account's own persona.
#[derive(Debug, Default)]
struct LocalPersona {
    name: String,
    country: String,
}

/// Applies decoded messages to the caches and publishes events.
#[derive(Debug, Default)]
pub struct Social {
    friends: FriendsList,
    groups: GroupsList,
    persona: RwLock<LocalPersona>,
    events: EventBus,
    config: DecodeConfig,
    counters: Counters,
}

impl Social {
    pub fn new(config: DecodeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Read-only view of the contact cache.
    pub fn friends(&self) -> CacheReader<'_, Friend> {
        self.friends.reader()
    }

    /// Read-only view of the group cache.
    pub fn groups(&self) -> CacheReader<'_, Group> {
        self.groups.reader()
    }

    /// Subscribes to events published from now on.
    pub fn subscribe(&self) -> EventStream {
        self.events.subscribe()
    }

    /// The local display name from the last account-info message.
    pub fn persona_name(&self) -> String {
        self.persona().name.clone()
    }

    /// The local account's country from the last account-info message.
    pub fn persona_country(&self) -> String {
        self.persona().country.clone()
    }

    pub fn stats(&self) -> SyncStats {
        SyncStats {
            applied: self.counters.applied.load(Ordering::Relaxed),
            ignored: self.counters.ignored.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }

    // -----------------------------------------------------------------------
    // Frame entry points
    // -----------------------------------------------------------------------

    /// Parses a complete frame (header included) and handles it.
    ///
    /// # Errors
    /// Any [`ProtocolError`] from parsing or decoding. The frame is
    /// counted as dropped and nothing is written or published.
    pub fn handle_bytes(
        &self,
        bytes: &[u8],
    ) -> Result<Option<MessageKind>, ProtocolError> {
        let frame = Frame::decode(bytes, &self.config).inspect_err(|e| {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(len = bytes.len(), error = %e, "dropping unparseable frame");
        })?;
        self.handle_frame(&frame)
    }

    /// Decodes and applies one frame.
    ///
    /// Returns the kind that was applied, or `None` for a kind this
    /// client does not handle.
    ///
    /// # Errors
    /// Any [`ProtocolError`] from decoding the body. The frame is counted
    /// as dropped and nothing is written or published.
    pub fn handle_frame(
        &self,
        frame: &Frame,
    ) -> Result<Option<MessageKind>, ProtocolError> {
        let emsg = frame.emsg();
        let decoded = if frame.body().len() > self.config.max_frame_len {
            Err(ProtocolError::FrameTooLarge {
                len: frame.body().len(),
                max: self.config.max_frame_len,
            })
        } else {
            SocialMessage::decode(frame, &self.config)
        };

        match decoded {
            Ok(Some(message)) => {
                let kind = message.kind();
                self.apply(message);
                self.counters.applied.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%kind, "message applied");
                Ok(Some(kind))
            }
            Ok(None) => {
                self.counters.ignored.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(%emsg, "ignoring unhandled message kind");
                Ok(None)
            }
            Err(e) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(%emsg, error = %e, "dropping undecodable frame");
                Err(e)
            }
        }
    }

    /// Applies one decoded message: cache writes, then events.
    pub fn apply(&self, message: SocialMessage) {
        match message {
            SocialMessage::FriendsList(body) => self.apply_friends_list(&body),
            SocialMessage::PersonaState(body) => self.apply_persona_state(&body),
            SocialMessage::ClanState(body) => self.apply_clan_state(&body),
            SocialMessage::ChatEnter(body) => self.apply_chat_enter(&body),
            SocialMessage::ChatMemberInfo(body) => {
                self.apply_chat_member_info(&body)
            }
            SocialMessage::AccountInfo(body) => self.apply_account_info(&body),
            SocialMessage::AddFriendResponse(body) => {
                self.apply_add_friend_response(&body)
            }
            SocialMessage::FriendMsgIncoming(body) => {
                self.publish(Event::ChatMsg(ChatMsgEvent::from(&body)))
            }
            SocialMessage::ChatMsg(body) => {
                self.publish(Event::ChatMsg(ChatMsgEvent::from(body)))
            }
            SocialMessage::ChatActionResult(body) => self.publish(
                Event::ChatActionResult(ChatActionResultEvent::from(body)),
            ),
            SocialMessage::ChatInvite(body) => {
                self.publish(Event::ChatInvite(ChatInviteEvent::from(&body)))
            }
            SocialMessage::SetIgnoreFriendResponse(body) => self.publish(
                Event::IgnoreFriend(IgnoreFriendEvent {
                    result: body.result,
                }),
            ),
            SocialMessage::FriendProfileInfoResponse(body) => {
                self.publish(Event::ProfileInfo(ProfileInfoEvent::from(&body)))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    fn apply_friends_list(&self, body: &CMsgClientFriendsList) {
        let incremental = body.bincremental();

        for entry in &body.friends {
            let id = SteamId(entry.ulfriendid());
            let raw = entry.efriendrelationship();

            if id.is_clan() {
                let relationship = ClanRelationship(raw);
                if relationship == ClanRelationship::NONE {
                    self.groups.remove(id);
                } else {
                    self.groups
                        .upsert_with(id, |g| g.relationship = relationship);
                }
                if incremental {
                    self.publish(Event::GroupState(GroupStateEvent {
                        steam_id: id,
                        relationship,
                    }));
                }
            } else {
                let relationship = FriendRelationship(raw);
                if relationship == FriendRelationship::NONE {
                    self.friends.remove(id);
                } else {
                    self.friends
                        .upsert_with(id, |f| f.relationship = relationship);
                }
                if incremental {
                    self.publish(Event::FriendState(FriendStateEvent {
                        steam_id: id,
                        relationship,
                    }));
                }
            }
        }

        tracing::debug!(
            entries = body.friends.len(),
            incremental,
            "friends list applied"
        );
        if !incremental {
            self.publish(Event::FriendsList(FriendsListEvent {
                entries: body.friends.len(),
            }));
        }
    }

    fn apply_persona_state(&self, body: &CMsgClientPersonaState) {
        let status_flags = ClientPersonaStateFlags(body.status_flags());

        for update in &body.friends {
            let id = SteamId(update.friendid());
            let hit = if id.is_clan() {
                self.groups.update(id, |g| {
                    if let Some(name) = &update.player_name {
                        g.name.clone_from(name);
                    }
                    if let Some(hash) = &update.avatar_hash {
                        g.avatar_hash.clone_from(hash);
                    }
                })
            } else if id.is_individual() {
                self.friends.update(id, |f| merge_persona(f, update))
            } else {
                false
            };
            if !hit {
                tracing::trace!(steam_id = %id, "persona update not cached");
            }

            self.publish(Event::PersonaState(Box::new(
                PersonaStateEvent::from_wire(status_flags, update),
            )));
        }
    }

    fn apply_clan_state(&self, body: &CMsgClientClanState) {
        let id = SteamId(body.steamid_clan());
        let hit = self.groups.update(id, |g| {
            if let Some(info) = &body.name_info {
                g.name = info.clan_name().to_owned();
                g.avatar_hash = info.sha_avatar().to_vec();
            }
            if let Some(counts) = &body.user_counts {
                g.member_counts = MemberCounts {
                    total: counts.members(),
                    online: counts.online(),
                    chatting: counts.chatting(),
                    in_game: counts.in_game(),
                };
            }
        });
        if !hit {
            tracing::trace!(steam_id = %id, "clan state for unknown group");
        }

        self.publish(Event::ClanState(ClanStateEvent::from(body)));
    }

    fn apply_chat_enter(&self, body: &ClientChatEnter) {
        self.groups.add_chat_members(
            body.room,
            body.members.iter().map(|&record| ChatMember::from(record)),
        );
        self.publish(Event::ChatEnter(ChatEnterEvent::from(body)));
    }

    fn apply_chat_member_info(&self, body: &ClientChatMemberInfo) {
        if let Some(change) = body.state_change {
            if change.change == ChatMemberStateChange::ENTERED {
                if let Some(record) = change.member {
                    self.groups
                        .add_chat_member(body.room, ChatMember::from(record));
                }
            } else if change.change.is_departure() {
                self.groups.remove_chat_member(body.room, change.acted_on);
            }
        }
        self.publish(Event::ChatMemberInfo(ChatMemberInfoEvent::from(body)));
    }

    fn apply_account_info(&self, body: &CMsgClientAccountInfo) {
        {
            let mut persona =
                self.persona.write().unwrap_or_else(PoisonError::into_inner);
            persona.name = body.persona_name().to_owned();
            persona.country = body.ip_country().to_owned();
        }
        self.publish(Event::AccountInfo(AccountInfoEvent {
            persona_name: body.persona_name().to_owned(),
            country: body.ip_country().to_owned(),
        }));
    }

    fn apply_add_friend_response(&self, body: &CMsgClientAddFriendResponse) {
        self.publish(Event::FriendAdded(FriendAddedEvent {
            result: EResult(body.eresult()),
            steam_id: SteamId(body.steam_id_added()),
            persona_name: body.persona_name_added().to_owned(),
        }));
    }

    fn publish(&self, event: Event) {
        self.events.publish(event);
    }

    fn persona(&self) -> std::sync::RwLockReadGuard<'_, LocalPersona> {
        self.persona.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Copies every field present in `update` onto `friend`.
fn merge_persona(friend: &mut Friend, update: &cmsg_client_persona_state::Friend) {
    if let Some(name) = &update.player_name {
        friend.name.clone_from(name);
    }
    if let Some(hash) = &update.avatar_hash {
        friend.avatar_hash.clone_from(hash);
    }
    if let Some(state) = update.persona_state {
        friend.persona_state = PersonaState(state);
    }
    if let Some(flags) = update.persona_state_flags {
        friend.persona_state_flags = PersonaStateFlags(flags);
    }
    if let Some(app_id) = update.game_played_app_id {
        friend.game_app_id = app_id;
    }
    if let Some(game_id) = update.gameid {
        friend.game_id = game_id;
    }
    if let Some(game_name) = &update.game_name {
        friend.game_name.clone_from(game_name);
    }
    if let Some(ip) = update.game_server_ip {
        friend.game_server_ip = ip;
    }
    if let Some(port) = update.game_server_port {
        friend.game_server_port = port;
    }
    if let Some(tag) = &update.clan_tag {
        friend.clan_tag.clone_from(tag);
    }
    if let Some(rank) = update.clan_rank {
        friend.clan_rank = ClanRank(rank);
    }
    if let Some(instances) = update.online_session_instances {
        friend.online_session_instances = instances;
    }
    if let Some(name) = &update.facebook_name {
        friend.facebook_name.clone_from(name);
    }
    if let Some(id) = update.facebook_id {
        friend.facebook_id = id;
    }
}
