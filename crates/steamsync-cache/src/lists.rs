//! The two concrete caches and their field-level setters.
//!
//! Setters are thin wrappers over [`EntityCache::update`]: they change
//! one field under the write lock and return `false` (creating nothing)
//! when the id is absent.

use std::collections::HashMap;

use steamsync_protocol::{
    ClanRelationship, FriendRelationship, PersonaState, PersonaStateFlags, SteamId,
};

use crate::{CacheReader, ChatMember, EntityCache, Friend, Group, MemberCounts};

/// Cache of direct contacts.
pub type FriendsList = EntityCache<Friend>;

/// Cache of clans and their chat rosters.
pub type GroupsList = EntityCache<Group>;

// ---------------------------------------------------------------------------
// Friends
// ---------------------------------------------------------------------------

impl EntityCache<Friend> {
    pub fn set_name(&self, id: SteamId, name: String) -> bool {
        self.update(id, |f| f.name = name)
    }

    pub fn set_avatar_hash(&self, id: SteamId, hash: Vec<u8>) -> bool {
        self.update(id, |f| f.avatar_hash = hash)
    }

    pub fn set_relationship(
        &self,
        id: SteamId,
        relationship: FriendRelationship,
    ) -> bool {
        self.update(id, |f| f.relationship = relationship)
    }

    pub fn set_persona_state(&self, id: SteamId, state: PersonaState) -> bool {
        self.update(id, |f| f.persona_state = state)
    }

    pub fn set_persona_state_flags(
        &self,
        id: SteamId,
        flags: PersonaStateFlags,
    ) -> bool {
        self.update(id, |f| f.persona_state_flags = flags)
    }

    pub fn set_game(
        &self,
        id: SteamId,
        app_id: u32,
        game_id: u64,
        name: String,
    ) -> bool {
        self.update(id, |f| {
            f.game_app_id = app_id;
            f.game_id = game_id;
            f.game_name = name;
        })
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

impl EntityCache<Group> {
    pub fn set_name(&self, id: SteamId, name: String) -> bool {
        self.update(id, |g| g.name = name)
    }

    pub fn set_avatar_hash(&self, id: SteamId, hash: Vec<u8>) -> bool {
        self.update(id, |g| g.avatar_hash = hash)
    }

    pub fn set_relationship(
        &self,
        id: SteamId,
        relationship: ClanRelationship,
    ) -> bool {
        self.update(id, |g| g.relationship = relationship)
    }

    pub fn set_member_counts(&self, id: SteamId, counts: MemberCounts) -> bool {
        self.update(id, |g| g.member_counts = counts)
    }

    /// Adds or replaces one member of a room's roster.
    ///
    /// `room` may be in chat or clan form. The group is created as a
    /// placeholder if absent, and its roster map is created on first use.
    pub fn add_chat_member(&self, room: SteamId, member: ChatMember) {
        self.add_chat_members(room, [member]);
    }

    /// Adds or replaces several members under a single lock, so readers
    /// see either none or all of them.
    pub fn add_chat_members(
        &self,
        room: SteamId,
        members: impl IntoIterator<Item = ChatMember>,
    ) {
        let mut added = 0usize;
        self.upsert_with(room, |g| {
            let roster = g.chat_members.get_or_insert_with(HashMap::new);
            for member in members {
                roster.insert(member.steam_id, member);
                added += 1;
            }
        });
        tracing::debug!(%room, added, "chat members added");
    }

    /// Removes one member from a room's roster.
    ///
    /// Returns `true` if the member was present. An absent group or
    /// member is a no-op.
    pub fn remove_chat_member(&self, room: SteamId, member: SteamId) -> bool {
        let mut removed = false;
        self.update(room, |g| {
            if let Some(members) = g.chat_members.as_mut() {
                removed = members.remove(&member).is_some();
            }
        });
        if removed {
            tracing::debug!(%room, %member, "chat member removed");
        }
        removed
    }

    /// Returns one member of a room's roster.
    pub fn chat_member(&self, room: SteamId, member: SteamId) -> Option<ChatMember> {
        self.get(room)?.chat_member(member).copied()
    }
}

impl CacheReader<'_, Group> {
    pub fn chat_member(&self, room: SteamId, member: SteamId) -> Option<ChatMember> {
        self.get(room)?.chat_member(member).copied()
    }
}

#[cfg(test)]
mod tests {
    use steamsync_protocol::{ChatPermission, ClanRank};

    use super::*;

    fn member(account: u32, rank: ClanRank) -> ChatMember {
        ChatMember {
            steam_id: SteamId::individual(account),
            permissions: ChatPermission::TALK,
            rank,
        }
    }

    // =====================================================================
    // Normalization
    // =====================================================================

    #[test]
    fn test_chat_form_and_clan_form_reach_same_group() {
        let groups = GroupsList::new();
        let clan = SteamId::clan(77);
        groups.upsert(Group::new(clan.to_chat(), ClanRelationship::MEMBER));

        assert_eq!(groups.count(), 1);
        let stored = groups.get(clan).unwrap();
        assert_eq!(stored.steam_id, clan, "stored id is canonical");
        assert!(groups.set_name(clan.to_chat(), "Guild".into()));
        assert_eq!(groups.get(clan).unwrap().name, "Guild");

        groups.remove(clan.to_chat());
        assert_eq!(groups.count(), 0);
    }

    // =====================================================================
    // add_chat_member() / remove_chat_member()
    // =====================================================================

    #[test]
    fn test_add_chat_member_creates_group_placeholder_and_roster() {
        let groups = GroupsList::new();
        let room = SteamId::clan(5).to_chat();

        groups.add_chat_member(room, member(1, ClanRank::MEMBER));

        let group = groups.get(SteamId::clan(5)).unwrap();
        assert!(group.name.is_empty());
        let roster = group.chat_members.as_ref().unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[&SteamId::individual(1)].rank, ClanRank::MEMBER);
    }

    #[test]
    fn test_add_chat_member_keeps_existing_group_fields() {
        let groups = GroupsList::new();
        let mut g = Group::new(SteamId::clan(5), ClanRelationship::MEMBER);
        g.name = "Guild".into();
        groups.upsert(g);

        groups.add_chat_member(SteamId::clan(5).to_chat(), member(1, ClanRank::OWNER));

        let group = groups.get(SteamId::clan(5)).unwrap();
        assert_eq!(group.name, "Guild");
        assert_eq!(group.relationship, ClanRelationship::MEMBER);
    }

    #[test]
    fn test_add_chat_member_twice_replaces_entry() {
        let groups = GroupsList::new();
        let room = SteamId::clan(5);
        groups.add_chat_member(room, member(1, ClanRank::MEMBER));
        groups.add_chat_member(room, member(1, ClanRank::OFFICER));

        let m = groups.chat_member(room, SteamId::individual(1)).unwrap();
        assert_eq!(m.rank, ClanRank::OFFICER);
        let roster_len = groups.get(room).unwrap().chat_members.unwrap().len();
        assert_eq!(roster_len, 1);
    }

    #[test]
    fn test_add_chat_members_empty_still_creates_roster() {
        let groups = GroupsList::new();
        groups.add_chat_members(SteamId::clan(6), []);

        let group = groups.get(SteamId::clan(6)).unwrap();
        assert_eq!(group.chat_members, Some(HashMap::new()));
    }

    #[test]
    fn test_remove_chat_member_keeps_roster_present() {
        let groups = GroupsList::new();
        let room = SteamId::clan(5).to_chat();
        groups.add_chat_member(room, member(1, ClanRank::MEMBER));

        assert!(groups.remove_chat_member(room, SteamId::individual(1)));
        assert!(!groups.remove_chat_member(room, SteamId::individual(1)));

        let group = groups.get(room).unwrap();
        assert_eq!(group.chat_members, Some(HashMap::new()));
    }

    #[test]
    fn test_remove_chat_member_unknown_group_is_noop() {
        let groups = GroupsList::new();
        assert!(!groups.remove_chat_member(SteamId::clan(9), SteamId::individual(1)));
        assert_eq!(groups.count(), 0);
    }

    #[test]
    fn test_snapshot_roster_is_not_aliased() {
        let groups = GroupsList::new();
        let room = SteamId::clan(5);
        groups.add_chat_member(room, member(1, ClanRank::MEMBER));

        let snap = groups.snapshot();
        groups.add_chat_member(room, member(2, ClanRank::MEMBER));

        let roster = snap[&room].chat_members.as_ref().unwrap();
        assert_eq!(roster.len(), 1);
    }

    // =====================================================================
    // Setters
    // =====================================================================

    #[test]
    fn test_friend_setters_noop_when_absent() {
        let friends = FriendsList::new();
        let id = SteamId::individual(4);
        assert!(!friends.set_name(id, "x".into()));
        assert!(!friends.set_persona_state(id, PersonaState::ONLINE));
        assert_eq!(friends.count(), 0);
    }

    #[test]
    fn test_friend_setters_update_existing() {
        let friends = FriendsList::new();
        let id = SteamId::individual(4);
        friends.upsert(Friend::new(id, FriendRelationship::FRIEND));

        assert!(friends.set_game(id, 440, 440, "TF2".into()));
        assert!(friends.set_relationship(id, FriendRelationship::IGNORED_FRIEND));

        let f = friends.get(id).unwrap();
        assert_eq!(f.game_name, "TF2");
        assert_eq!(f.relationship, FriendRelationship::IGNORED_FRIEND);
    }

    #[test]
    fn test_group_member_counts_setter() {
        let groups = GroupsList::new();
        let id = SteamId::clan(3);
        groups.upsert(Group::new(id, ClanRelationship::MEMBER));
        let counts = MemberCounts {
            total: 10,
            online: 4,
            chatting: 1,
            in_game: 2,
        };

        assert!(groups.set_member_counts(id, counts));
        assert_eq!(groups.get(id).unwrap().member_counts, counts);
    }

    #[test]
    fn test_reader_chat_member_lookup() {
        let groups = GroupsList::new();
        groups.add_chat_member(SteamId::clan(5), member(1, ClanRank::MODERATOR));
        let reader = groups.reader();

        let m = reader
            .chat_member(SteamId::clan(5).to_chat(), SteamId::individual(1))
            .unwrap();
        assert_eq!(m.rank, ClanRank::MODERATOR);
    }
}
