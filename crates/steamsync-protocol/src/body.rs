//! Hand-rolled binary message bodies.
//!
//! Each binary body begins with a block of fixed-width fields and may be
//! followed by a variable payload. Chat-member descriptions inside those
//! payloads use a positional key/type/value layout:
//!
//! ```text
//! "MessageObject\0" u8  "steamid\0" u64  u8  "Permissions\0" i32  u8  "Details\0" i32
//! ```
//!
//! Labels and type bytes are consumed and thrown away; only the three
//! values are kept. Some bodies also carry single pad bytes and a 6-byte
//! region after each member whose meaning is unknown. Both are skipped
//! without being interpreted.

use crate::{
    BinaryReader, ChatAction, ChatActionResult, ChatEntryType, ChatInfoType,
    ChatMemberStateChange, ChatPermission, ChatRoomEnterResponse, ChatRoomType,
    ClanRank, DecodeConfig, EResult, ProtocolError, SteamId, text_until_nul,
};

/// Length of the opaque region after each member record in a chat-enter
/// payload.
pub const MEMBER_TRAILER_LEN: usize = 6;

// ---------------------------------------------------------------------------
// Chat member records
// ---------------------------------------------------------------------------

/// One chat-room member as described inside a binary payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatMemberRecord {
    pub steam_id: SteamId,
    pub permissions: ChatPermission,
    /// Already corrected with [`ClanRank::from_chat_rank`].
    pub rank: ClanRank,
}

impl ChatMemberRecord {
    /// Reads one key/type/value member description.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self, ProtocolError> {
        reader.read_cstring()?; // object label
        reader.read_u8()?;
        reader.read_cstring()?; // id label
        let steam_id = SteamId(reader.read_u64()?);
        reader.read_u8()?;
        reader.read_cstring()?; // permissions label
        let permissions = ChatPermission(reader.read_u32()?);
        reader.read_u8()?;
        reader.read_cstring()?; // details label
        let rank = ClanRank::from_chat_rank(reader.read_u32()?);
        Ok(Self {
            steam_id,
            permissions,
            rank,
        })
    }
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

/// A message posted in a multi-user chat room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientChatMsg {
    pub chatter: SteamId,
    pub room: SteamId,
    pub entry_type: ChatEntryType,
    /// Payload text, cut at the first zero byte.
    pub text: String,
}

impl ClientChatMsg {
    pub fn decode(body: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = BinaryReader::new(body);
        let chatter = SteamId(r.read_u64()?);
        let room = SteamId(r.read_u64()?);
        let entry_type = ChatEntryType(r.read_i32()?);
        Ok(Self {
            chatter,
            room,
            entry_type,
            text: text_until_nul(r.rest()),
        })
    }
}

/// The server's answer to a join request, with the current roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientChatEnter {
    pub room: SteamId,
    pub friend: SteamId,
    pub room_type: ChatRoomType,
    pub owner: SteamId,
    pub clan: SteamId,
    pub flags: u8,
    pub enter_response: ChatRoomEnterResponse,
    pub name: String,
    pub members: Vec<ChatMemberRecord>,
}

impl ClientChatEnter {
    /// Decodes the fixed fields and the member-count-prefixed roster.
    ///
    /// # Errors
    /// - [`ProtocolError::TooManyMembers`] if the count is negative or
    ///   above `config.max_chat_members`
    /// - [`ProtocolError::Truncated`] if the roster is cut short,
    ///   including a missing 6-byte member trailer
    pub fn decode(
        body: &[u8],
        config: &DecodeConfig,
    ) -> Result<Self, ProtocolError> {
        let mut r = BinaryReader::new(body);
        let room = SteamId(r.read_u64()?);
        let friend = SteamId(r.read_u64()?);
        let room_type = ChatRoomType(r.read_i32()?);
        let owner = SteamId(r.read_u64()?);
        let clan = SteamId(r.read_u64()?);
        let flags = r.read_u8()?;
        let enter_response = ChatRoomEnterResponse(r.read_i32()?);

        let count = r.read_i32()?;
        let len = usize::try_from(count)
            .ok()
            .filter(|&n| n <= config.max_chat_members)
            .ok_or(ProtocolError::TooManyMembers {
                count,
                max: config.max_chat_members,
            })?;
        let name = r.read_cstring()?;
        r.read_u8()?;

        let mut members = Vec::with_capacity(len);
        for _ in 0..len {
            members.push(ChatMemberRecord::read(&mut r)?);
            r.skip(MEMBER_TRAILER_LEN)?;
        }

        Ok(Self {
            room,
            friend,
            room_type,
            owner,
            clan,
            flags,
            enter_response,
            name,
            members,
        })
    }
}

/// Detail of a state-change member-info message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub acted_on: SteamId,
    pub change: ChatMemberStateChange,
    pub acted_by: SteamId,
    /// The entering member's record; present only for
    /// [`ChatMemberStateChange::ENTERED`].
    pub member: Option<ChatMemberRecord>,
}

/// A change to one chat-room member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientChatMemberInfo {
    pub room: SteamId,
    pub info_type: ChatInfoType,
    /// `None` for info types other than [`ChatInfoType::STATE_CHANGE`].
    pub state_change: Option<StateChange>,
}

impl ClientChatMemberInfo {
    pub fn decode(body: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = BinaryReader::new(body);
        let room = SteamId(r.read_u64()?);
        let info_type = ChatInfoType(r.read_i32()?);

        if info_type != ChatInfoType::STATE_CHANGE {
            return Ok(Self {
                room,
                info_type,
                state_change: None,
            });
        }

        let acted_on = SteamId(r.read_u64()?);
        let change = ChatMemberStateChange(r.read_i32()?);
        let acted_by = SteamId(r.read_u64()?);
        r.read_u8()?;

        let member = if change == ChatMemberStateChange::ENTERED {
            let record = ChatMemberRecord::read(&mut r)?;
            // The trailer may or may not be present here.
            r.skip(r.remaining().min(MEMBER_TRAILER_LEN))?;
            // The acted-on id is authoritative for who entered.
            Some(ChatMemberRecord {
                steam_id: acted_on,
                ..record
            })
        } else {
            None
        };

        Ok(Self {
            room,
            info_type,
            state_change: Some(StateChange {
                acted_on,
                change,
                acted_by,
                member,
            }),
        })
    }
}

/// The outcome of a moderation action this client requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientChatActionResult {
    pub room: SteamId,
    pub acted_on: SteamId,
    pub action: ChatAction,
    pub result: ChatActionResult,
}

impl ClientChatActionResult {
    pub fn decode(body: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = BinaryReader::new(body);
        Ok(Self {
            room: SteamId(r.read_u64()?),
            acted_on: SteamId(r.read_u64()?),
            action: ChatAction(r.read_i32()?),
            result: ChatActionResult(r.read_i32()?),
        })
    }
}

/// The outcome of an ignore/unignore request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSetIgnoreFriendResponse {
    /// Opaque leading field.
    pub unknown: u64,
    pub result: EResult,
}

impl ClientSetIgnoreFriendResponse {
    pub fn decode(body: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = BinaryReader::new(body);
        Ok(Self {
            unknown: r.read_u64()?,
            result: EResult(r.read_i32()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use byteorder::{LittleEndian, WriteBytesExt};

    use super::*;

    fn write_member(buf: &mut Vec<u8>, id: SteamId, perms: u32, rank: u32) {
        buf.extend_from_slice(b"MessageObject\0");
        buf.write_u8(7).unwrap();
        buf.extend_from_slice(b"steamid\0");
        buf.write_u64::<LittleEndian>(id.0).unwrap();
        buf.write_u8(2).unwrap();
        buf.extend_from_slice(b"Permissions\0");
        buf.write_u32::<LittleEndian>(perms).unwrap();
        buf.write_u8(2).unwrap();
        buf.extend_from_slice(b"Details\0");
        buf.write_u32::<LittleEndian>(rank).unwrap();
    }

    fn chat_enter_body(room: SteamId, members: &[(SteamId, u32, u32)]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u64::<LittleEndian>(room.0).unwrap();
        buf.write_u64::<LittleEndian>(0).unwrap();
        buf.write_i32::<LittleEndian>(ChatRoomType::MUC.0).unwrap();
        buf.write_u64::<LittleEndian>(SteamId::individual(1).0).unwrap();
        buf.write_u64::<LittleEndian>(room.to_canonical().0).unwrap();
        buf.write_u8(0).unwrap();
        buf.write_i32::<LittleEndian>(ChatRoomEnterResponse::SUCCESS.0)
            .unwrap();
        buf.write_i32::<LittleEndian>(members.len() as i32).unwrap();
        buf.extend_from_slice(b"Lounge\0");
        buf.write_u8(0).unwrap();
        for &(id, perms, rank) in members {
            write_member(&mut buf, id, perms, rank);
            buf.extend_from_slice(&[0xEE; MEMBER_TRAILER_LEN]);
        }
        buf
    }

    // =======================================================================
    // Member records
    // =======================================================================

    #[test]
    fn test_member_record_read_keeps_values_and_corrects_rank() {
        let mut buf = Vec::new();
        write_member(&mut buf, SteamId::individual(9), 10, 8);
        let mut r = BinaryReader::new(&buf);

        let record = ChatMemberRecord::read(&mut r).unwrap();
        assert_eq!(record.steam_id, SteamId::individual(9));
        assert_eq!(record.permissions, ChatPermission(10));
        assert_eq!(record.rank, ClanRank::MODERATOR);
        assert_eq!(r.remaining(), 0);
    }

    // =======================================================================
    // Chat enter
    // =======================================================================

    #[test]
    fn test_chat_enter_decode_reads_roster() {
        let room = SteamId::clan(50).to_chat();
        let a = SteamId::individual(1);
        let b = SteamId::individual(2);
        let body = chat_enter_body(room, &[(a, 1, 4), (b, 2, 8)]);

        let msg = ClientChatEnter::decode(&body, &DecodeConfig::default()).unwrap();
        assert_eq!(msg.room, room);
        assert_eq!(msg.clan, SteamId::clan(50));
        assert_eq!(msg.name, "Lounge");
        assert_eq!(msg.enter_response, ChatRoomEnterResponse::SUCCESS);
        assert_eq!(msg.members.len(), 2);
        assert_eq!(msg.members[0].rank, ClanRank::MEMBER);
        assert_eq!(msg.members[1].rank, ClanRank::MODERATOR);
        assert_eq!(msg.members[1].permissions, ChatPermission(2));
    }

    #[test]
    fn test_chat_enter_decode_missing_trailer_is_truncated() {
        let room = SteamId::clan(50).to_chat();
        let mut body = chat_enter_body(room, &[(SteamId::individual(1), 1, 4)]);
        body.truncate(body.len() - 1);

        let err =
            ClientChatEnter::decode(&body, &DecodeConfig::default()).unwrap_err();
        assert!(matches!(err, ProtocolError::Truncated { .. }), "got {err:?}");
    }

    #[test]
    fn test_chat_enter_decode_member_count_over_limit_is_rejected() {
        let room = SteamId::clan(50).to_chat();
        let body = chat_enter_body(
            room,
            &[(SteamId::individual(1), 1, 4), (SteamId::individual(2), 1, 4)],
        );
        let config = DecodeConfig {
            max_chat_members: 1,
            ..DecodeConfig::default()
        };

        let err = ClientChatEnter::decode(&body, &config).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::TooManyMembers { count: 2, max: 1 }
        ));
    }

    #[test]
    fn test_chat_enter_decode_negative_count_is_rejected() {
        let room = SteamId::clan(50).to_chat();
        let mut body = chat_enter_body(room, &[]);
        // Member count sits right after the 41 fixed bytes.
        body[41..45].copy_from_slice(&(-1i32).to_le_bytes());

        let err =
            ClientChatEnter::decode(&body, &DecodeConfig::default()).unwrap_err();
        assert!(matches!(err, ProtocolError::TooManyMembers { count: -1, .. }));
    }

    // =======================================================================
    // Member info
    // =======================================================================

    fn member_info_body(change: ChatMemberStateChange, acted_on: SteamId) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u64::<LittleEndian>(SteamId::clan(50).to_chat().0)
            .unwrap();
        buf.write_i32::<LittleEndian>(ChatInfoType::STATE_CHANGE.0)
            .unwrap();
        buf.write_u64::<LittleEndian>(acted_on.0).unwrap();
        buf.write_i32::<LittleEndian>(change.0).unwrap();
        buf.write_u64::<LittleEndian>(SteamId::individual(99).0)
            .unwrap();
        buf.write_u8(0).unwrap();
        buf
    }

    #[test]
    fn test_member_info_entered_reads_member_with_optional_trailer() {
        let a = SteamId::individual(1);
        let mut body = member_info_body(ChatMemberStateChange::ENTERED, a);
        write_member(&mut body, a, 26, 4);

        let without = ClientChatMemberInfo::decode(&body).unwrap();
        body.extend_from_slice(&[0; MEMBER_TRAILER_LEN]);
        let with = ClientChatMemberInfo::decode(&body).unwrap();

        assert_eq!(without, with);
        let change = with.state_change.unwrap();
        let member = change.member.unwrap();
        assert_eq!(member.steam_id, a);
        assert_eq!(member.rank, ClanRank::MEMBER);
        assert_eq!(change.acted_by, SteamId::individual(99));
    }

    #[test]
    fn test_member_info_left_has_no_member_record() {
        let body =
            member_info_body(ChatMemberStateChange::LEFT, SteamId::individual(1));
        let info = ClientChatMemberInfo::decode(&body).unwrap();
        let change = info.state_change.unwrap();
        assert_eq!(change.change, ChatMemberStateChange::LEFT);
        assert!(change.member.is_none());
    }

    #[test]
    fn test_member_info_other_info_type_skips_state_change() {
        let mut buf = Vec::new();
        buf.write_u64::<LittleEndian>(7).unwrap();
        buf.write_i32::<LittleEndian>(ChatInfoType::INFO_UPDATE.0)
            .unwrap();

        let info = ClientChatMemberInfo::decode(&buf).unwrap();
        assert_eq!(info.info_type, ChatInfoType::INFO_UPDATE);
        assert!(info.state_change.is_none());
    }

    // =======================================================================
    // Fixed-layout bodies
    // =======================================================================

    #[test]
    fn test_chat_msg_decode_truncates_text_at_nul() {
        let mut buf = Vec::new();
        buf.write_u64::<LittleEndian>(SteamId::individual(3).0).unwrap();
        buf.write_u64::<LittleEndian>(SteamId::clan(4).to_chat().0)
            .unwrap();
        buf.write_i32::<LittleEndian>(ChatEntryType::CHAT_MSG.0).unwrap();
        buf.extend_from_slice(b"gg wp\0\0\0");

        let msg = ClientChatMsg::decode(&buf).unwrap();
        assert_eq!(msg.chatter, SteamId::individual(3));
        assert_eq!(msg.text, "gg wp");
    }

    #[test]
    fn test_chat_msg_decode_one_byte_short_is_truncated() {
        // 8 + 8 + 4 fixed bytes are required; give 19.
        let err = ClientChatMsg::decode(&[0; 19]).unwrap_err();
        assert!(matches!(err, ProtocolError::Truncated { needed: 4, remaining: 3 }));
    }

    #[test]
    fn test_chat_action_result_decode() {
        let mut buf = Vec::new();
        buf.write_u64::<LittleEndian>(1).unwrap();
        buf.write_u64::<LittleEndian>(2).unwrap();
        buf.write_i32::<LittleEndian>(ChatAction::KICK.0).unwrap();
        buf.write_i32::<LittleEndian>(ChatActionResult::NOT_PERMITTED.0)
            .unwrap();

        let msg = ClientChatActionResult::decode(&buf).unwrap();
        assert_eq!(msg.acted_on, SteamId(2));
        assert_eq!(msg.action, ChatAction::KICK);
        assert_eq!(msg.result, ChatActionResult::NOT_PERMITTED);
    }

    #[test]
    fn test_ignore_response_decode() {
        let mut buf = Vec::new();
        buf.write_u64::<LittleEndian>(0).unwrap();
        buf.write_i32::<LittleEndian>(EResult::OK.0).unwrap();
        let msg = ClientSetIgnoreFriendResponse::decode(&buf).unwrap();
        assert_eq!(msg.result, EResult::OK);

        assert!(ClientSetIgnoreFriendResponse::decode(&buf[..11]).is_err());
    }
}
