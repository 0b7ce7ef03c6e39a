//! The 64-bit account identifier and its canonical form.
//!
//! Every person, clan, and chat room on the wire is named by a
//! [`SteamId`]. The 64 bits pack four fields:
//!
//! ```text
//!  63      56 55  52 51                 32 31                           0
//! ┌──────────┬──────┬─────────────────────┬──────────────────────────────┐
//! │ universe │ type │      instance       │          account id          │
//! └──────────┴──────┴─────────────────────┴──────────────────────────────┘
//! ```
//!
//! # Two names for one clan
//!
//! A clan's chat room is addressed by a *chat-typed* id whose instance
//! carries the [`CHAT_INSTANCE_CLAN`] flag, while the clan itself uses a
//! *clan-typed* id with instance 0. Both share the account id. Messages
//! about the same clan arrive in either form depending on their kind, so
//! the caches key everything by [`SteamId::to_canonical`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AccountType;

const ACCOUNT_ID_MASK: u64 = 0xFFFF_FFFF;
const INSTANCE_SHIFT: u32 = 32;
const INSTANCE_MASK: u64 = 0x000F_FFFF;
const TYPE_SHIFT: u32 = 52;
const TYPE_MASK: u64 = 0xF;
const UNIVERSE_SHIFT: u32 = 56;
const UNIVERSE_MASK: u64 = 0xFF;

/// Instance flag marking a chat room that belongs to a clan.
pub const CHAT_INSTANCE_CLAN: u32 = ((INSTANCE_MASK as u32) + 1) >> 1;
/// Instance flag marking a lobby chat room.
pub const CHAT_INSTANCE_LOBBY: u32 = ((INSTANCE_MASK as u32) + 1) >> 2;
/// Instance flag marking a matchmaking lobby chat room.
pub const CHAT_INSTANCE_MMS_LOBBY: u32 = ((INSTANCE_MASK as u32) + 1) >> 3;

/// Instance value used by desktop individual accounts.
pub const DESKTOP_INSTANCE: u32 = 1;

/// The public universe.
pub const UNIVERSE_PUBLIC: u8 = 1;

/// A 64-bit account identifier.
///
/// A newtype over the raw `u64` so an identifier can't be confused with
/// a job id or a count. `#[serde(transparent)]` keeps the JSON form the
/// bare number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SteamId(pub u64);

impl SteamId {
    /// Assembles an identifier from its four fields. Out-of-range
    /// instance values are masked to 20 bits and types to 4 bits.
    pub fn new(
        account_id: u32,
        instance: u32,
        account_type: AccountType,
        universe: u8,
    ) -> Self {
        let raw = u64::from(account_id)
            | ((u64::from(instance) & INSTANCE_MASK) << INSTANCE_SHIFT)
            | ((u64::from(account_type.0) & TYPE_MASK) << TYPE_SHIFT)
            | (u64::from(universe) << UNIVERSE_SHIFT);
        Self(raw)
    }

    /// Shorthand for a public-universe individual on the desktop instance.
    pub fn individual(account_id: u32) -> Self {
        Self::new(
            account_id,
            DESKTOP_INSTANCE,
            AccountType::INDIVIDUAL,
            UNIVERSE_PUBLIC,
        )
    }

    /// Shorthand for a public-universe clan in its canonical form.
    pub fn clan(account_id: u32) -> Self {
        Self::new(account_id, 0, AccountType::CLAN, UNIVERSE_PUBLIC)
    }

    /// Returns the low 32 bits: the account number.
    pub fn account_id(self) -> u32 {
        (self.0 & ACCOUNT_ID_MASK) as u32
    }

    /// Returns the 20-bit account instance.
    pub fn instance(self) -> u32 {
        ((self.0 >> INSTANCE_SHIFT) & INSTANCE_MASK) as u32
    }

    /// Returns the account-type tag.
    pub fn account_type(self) -> AccountType {
        AccountType(((self.0 >> TYPE_SHIFT) & TYPE_MASK) as u8)
    }

    /// Returns the universe.
    pub fn universe(self) -> u8 {
        ((self.0 >> UNIVERSE_SHIFT) & UNIVERSE_MASK) as u8
    }

    /// Returns a copy with the instance replaced.
    pub fn with_instance(self, instance: u32) -> Self {
        let cleared = self.0 & !(INSTANCE_MASK << INSTANCE_SHIFT);
        Self(cleared | ((u64::from(instance) & INSTANCE_MASK) << INSTANCE_SHIFT))
    }

    /// Returns a copy with the account type replaced.
    pub fn with_account_type(self, account_type: AccountType) -> Self {
        let cleared = self.0 & !(TYPE_MASK << TYPE_SHIFT);
        Self(cleared | ((u64::from(account_type.0) & TYPE_MASK) << TYPE_SHIFT))
    }

    pub fn is_individual(self) -> bool {
        self.account_type() == AccountType::INDIVIDUAL
    }

    pub fn is_clan(self) -> bool {
        self.account_type() == AccountType::CLAN
    }

    pub fn is_chat(self) -> bool {
        self.account_type() == AccountType::CHAT
    }

    /// Returns `true` for a chat-room id that names a clan's chat.
    pub fn is_clan_chat(self) -> bool {
        self.is_chat() && self.instance() & CHAT_INSTANCE_CLAN != 0
    }

    /// Converts a clan id to the id of its chat room. Every other id is
    /// returned unchanged.
    pub fn to_chat(self) -> Self {
        if !self.is_clan() {
            return self;
        }
        self.with_instance(CHAT_INSTANCE_CLAN)
            .with_account_type(AccountType::CHAT)
    }

    /// Returns the canonical cache key for this id.
    ///
    /// A clan's chat-room id maps to the clan id; every other id (including
    /// the clan id itself, individuals, and ad-hoc chat rooms that belong
    /// to no clan) is already canonical. Normalizing twice is the same as
    /// normalizing once.
    pub fn to_canonical(self) -> Self {
        if !self.is_clan_chat() {
            return self;
        }
        self.with_instance(0).with_account_type(AccountType::CLAN)
    }
}

impl From<u64> for SteamId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<SteamId> for u64 {
    fn from(id: SteamId) -> Self {
        id.0
    }
}

/// Renders the id in the bracketed `[T:universe:account]` text form,
/// where `T` is a one-letter account-type code.
impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.account_type() {
            AccountType::INDIVIDUAL => 'U',
            AccountType::MULTISEAT => 'M',
            AccountType::GAME_SERVER => 'G',
            AccountType::ANON_GAME_SERVER => 'A',
            AccountType::PENDING => 'P',
            AccountType::CONTENT_SERVER => 'C',
            AccountType::CLAN => 'g',
            AccountType::CHAT if self.is_clan_chat() => 'c',
            AccountType::CHAT if self.instance() & CHAT_INSTANCE_LOBBY != 0 => 'L',
            AccountType::CHAT => 'T',
            AccountType::ANON_USER => 'a',
            _ => 'I',
        };
        write!(f, "[{letter}:{}:{}]", self.universe(), self.account_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_trips_fields() {
        let id = SteamId::new(123_456, 7, AccountType::CHAT, 1);
        assert_eq!(id.account_id(), 123_456);
        assert_eq!(id.instance(), 7);
        assert_eq!(id.account_type(), AccountType::CHAT);
        assert_eq!(id.universe(), 1);
    }

    #[test]
    fn test_individual_has_known_raw_value() {
        // 76561197960265728 is the base of every public desktop account.
        assert_eq!(SteamId::individual(0).0, 76_561_197_960_265_728);
        assert_eq!(SteamId::individual(5).0, 76_561_197_960_265_733);
    }

    #[test]
    fn test_to_chat_sets_clan_flag_and_chat_type() {
        let chat = SteamId::clan(42).to_chat();
        assert!(chat.is_chat());
        assert!(chat.is_clan_chat());
        assert_eq!(chat.account_id(), 42);
        assert_eq!(chat.instance(), CHAT_INSTANCE_CLAN);
    }

    #[test]
    fn test_to_chat_leaves_non_clan_unchanged() {
        let user = SteamId::individual(9);
        assert_eq!(user.to_chat(), user);
    }

    #[test]
    fn test_to_canonical_maps_clan_chat_to_clan() {
        let clan = SteamId::clan(42);
        assert_eq!(clan.to_chat().to_canonical(), clan);
        assert_eq!(clan.to_canonical(), clan);
    }

    #[test]
    fn test_to_canonical_is_idempotent() {
        let ids = [
            SteamId::individual(1),
            SteamId::clan(2),
            SteamId::clan(3).to_chat(),
            SteamId::new(4, 0, AccountType::CHAT, 1),
            SteamId::new(5, CHAT_INSTANCE_LOBBY, AccountType::CHAT, 1),
            SteamId(0),
            SteamId(u64::MAX),
        ];
        for id in ids {
            let once = id.to_canonical();
            assert_eq!(once.to_canonical(), once, "not idempotent for {id:?}");
        }
    }

    #[test]
    fn test_to_canonical_leaves_ad_hoc_chat_unchanged() {
        // A chat room with no clan flag belongs to no clan; it keys itself.
        let room = SteamId::new(77, 0, AccountType::CHAT, 1);
        assert_eq!(room.to_canonical(), room);
    }

    #[test]
    fn test_display_uses_type_letter() {
        assert_eq!(SteamId::individual(10).to_string(), "[U:1:10]");
        assert_eq!(SteamId::clan(20).to_string(), "[g:1:20]");
        assert_eq!(SteamId::clan(20).to_chat().to_string(), "[c:1:20]");
    }

    #[test]
    fn test_steam_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&SteamId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
