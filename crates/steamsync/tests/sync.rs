//! Integration tests: complete frames in, cache state and events out.

use byteorder::{LittleEndian, WriteBytesExt};
use prost::Message;
use steamsync::events::{Event, FriendsListEvent};
use steamsync::prelude::*;
use steamsync::{DecodeConfig, Frame, MessageKind, ProtocolError};
use steamsync_protocol::proto::{
    CMsgClientAccountInfo, CMsgClientFriendsList, CMsgClientPersonaState,
    CMsgProtoBufHeader, cmsg_client_friends_list, cmsg_client_persona_state,
};
use steamsync_protocol::{
    ChatInfoType, ChatMemberStateChange, ChatPermission, ChatRoomEnterResponse,
    ChatRoomType, ClanRank, EMsg, ExtendedHeader, FriendRelationship,
    FrameHeader, PersonaState,
};

// =========================================================================
// Frame builders
// =========================================================================

fn proto_frame(emsg: EMsg, body: impl Message) -> Vec<u8> {
    let frame = Frame::new(emsg.to_raw(true), body.encode_to_vec()).with_header(
        FrameHeader::Protobuf(CMsgProtoBufHeader {
            steamid: Some(SteamId::individual(1000).0),
            ..Default::default()
        }),
    );
    let mut out = Vec::new();
    frame.write_to(&mut out).unwrap();
    out
}

fn binary_frame(emsg: EMsg, body: Vec<u8>) -> Vec<u8> {
    let frame = Frame::new(emsg.to_raw(false), body)
        .with_header(FrameHeader::Extended(ExtendedHeader::default()));
    let mut out = Vec::new();
    frame.write_to(&mut out).unwrap();
    out
}

fn friends_list(incremental: bool, pairs: &[(SteamId, u32)]) -> Vec<u8> {
    proto_frame(
        EMsg::CLIENT_FRIENDS_LIST,
        CMsgClientFriendsList {
            bincremental: Some(incremental),
            friends: pairs
                .iter()
                .map(|&(id, rel)| cmsg_client_friends_list::Friend {
                    ulfriendid: Some(id.0),
                    efriendrelationship: Some(rel),
                })
                .collect(),
            ..Default::default()
        },
    )
}

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
    buf.write_i32::<LittleEndian>(ChatRoomEnterResponse::SUCCESS.0).unwrap();
    buf.write_i32::<LittleEndian>(members.len() as i32).unwrap();
    buf.extend_from_slice(b"Lounge\0");
    buf.write_u8(0).unwrap();
    for &(id, perms, rank) in members {
        write_member(&mut buf, id, perms, rank);
        buf.extend_from_slice(&[0; 6]);
    }
    buf
}

fn member_left_body(room: SteamId, who: SteamId) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_u64::<LittleEndian>(room.0).unwrap();
    buf.write_i32::<LittleEndian>(ChatInfoType::STATE_CHANGE.0).unwrap();
    buf.write_u64::<LittleEndian>(who.0).unwrap();
    buf.write_i32::<LittleEndian>(ChatMemberStateChange::LEFT.0).unwrap();
    buf.write_u64::<LittleEndian>(who.0).unwrap();
    buf.write_u8(0).unwrap();
    buf
}

fn social() -> Social {
    Social::new(DecodeConfig::default())
}

// =========================================================================
// Friends list
// =========================================================================

#[test]
fn test_incremental_list_emits_one_event_per_pair() {
    let social = social();
    let mut events = social.subscribe();
    let frame = friends_list(
        true,
        &[
            (SteamId::individual(1), 3),
            (SteamId::individual(2), 2),
            (SteamId::clan(3), 3),
        ],
    );

    social.handle_bytes(&frame).unwrap();

    let got = events.drain();
    assert_eq!(got.len(), 3);
    assert!(!got.iter().any(|e| matches!(e, Event::FriendsList(_))));
}

#[test]
fn test_full_list_emits_only_aggregate_event() {
    let social = social();
    let mut events = social.subscribe();
    let frame = friends_list(
        false,
        &[
            (SteamId::individual(1), 3),
            (SteamId::individual(2), 2),
            (SteamId::clan(3), 3),
        ],
    );

    social.handle_bytes(&frame).unwrap();

    assert_eq!(
        events.drain(),
        vec![Event::FriendsList(FriendsListEvent { entries: 3 })]
    );
    assert_eq!(social.friends().count(), 2);
    assert_eq!(social.groups().count(), 1);
}

#[test]
fn test_relationship_none_removes_present_and_ignores_absent() {
    let social = social();
    let present = SteamId::individual(1);
    let absent = SteamId::individual(2);
    social
        .handle_bytes(&friends_list(true, &[(present, 3)]))
        .unwrap();

    social
        .handle_bytes(&friends_list(true, &[(present, 0), (absent, 0)]))
        .unwrap();

    assert!(!social.friends().contains(present));
    assert!(!social.friends().contains(absent));
    assert_eq!(social.friends().count(), 0);
}

// =========================================================================
// Persona state
// =========================================================================

#[test]
fn test_persona_state_hit_and_miss_both_emit() {
    let social = social();
    let known = SteamId::individual(1);
    let unknown = SteamId::individual(2);
    social.handle_bytes(&friends_list(true, &[(known, 3)])).unwrap();
    let mut events = social.subscribe();

    let update = |id: SteamId| cmsg_client_persona_state::Friend {
        friendid: Some(id.0),
        persona_state: Some(PersonaState::BUSY.0),
        player_name: Some("name".into()),
        ..Default::default()
    };
    let frame = proto_frame(
        EMsg::CLIENT_PERSONA_STATE,
        CMsgClientPersonaState {
            status_flags: Some(3),
            friends: vec![update(known), update(unknown)],
        },
    );
    social.handle_bytes(&frame).unwrap();

    assert_eq!(events.drain().len(), 2);
    let f = social.friends().get(known).unwrap();
    assert_eq!(f.persona_state, PersonaState::BUSY);
    assert_eq!(f.relationship, FriendRelationship::FRIEND);
    assert!(!social.friends().contains(unknown));
}

// =========================================================================
// Chat
// =========================================================================

#[test]
fn test_chat_enter_populates_roster_with_corrected_ranks() {
    let social = social();
    let mut events = social.subscribe();
    let room = SteamId::clan(50).to_chat();
    let a = SteamId::individual(1);
    let b = SteamId::individual(2);

    let frame = binary_frame(
        EMsg::CLIENT_CHAT_ENTER,
        chat_enter_body(room, &[(a, 1, 4), (b, 2, 8)]),
    );
    assert_eq!(
        social.handle_bytes(&frame).unwrap(),
        Some(MessageKind::ChatEnter)
    );

    let groups = social.groups();
    let member_a = groups.chat_member(room, a).unwrap();
    let member_b = groups.chat_member(SteamId::clan(50), b).unwrap();
    assert_eq!(member_a.permissions, ChatPermission(1));
    assert_eq!(member_a.rank, ClanRank::MEMBER);
    assert_eq!(member_b.permissions, ChatPermission(2));
    assert_eq!(member_b.rank, ClanRank::MODERATOR);

    let got = events.drain();
    assert_eq!(got.len(), 1);
    assert!(matches!(&got[0], Event::ChatEnter(e) if e.member_count == 2));
}

#[test]
fn test_member_left_removes_from_roster() {
    let social = social();
    let room = SteamId::clan(50).to_chat();
    let a = SteamId::individual(1);
    let b = SteamId::individual(2);
    social
        .handle_bytes(&binary_frame(
            EMsg::CLIENT_CHAT_ENTER,
            chat_enter_body(room, &[(a, 1, 4), (b, 2, 8)]),
        ))
        .unwrap();
    let mut events = social.subscribe();

    social
        .handle_bytes(&binary_frame(
            EMsg::CLIENT_CHAT_MEMBER_INFO,
            member_left_body(room, a),
        ))
        .unwrap();

    let group = social.groups().get(room).unwrap();
    let roster = group.chat_members.unwrap();
    assert_eq!(roster.len(), 1);
    assert!(roster.contains_key(&b));

    let got = events.drain();
    assert_eq!(got.len(), 1);
    let Event::ChatMemberInfo(info) = &got[0] else {
        panic!("expected member info, got {:?}", got[0]);
    };
    let change = info.state_change_info.unwrap();
    assert_eq!(change.chatter_acted_on, a);
    assert_eq!(change.state_change, ChatMemberStateChange::LEFT);
}

// =========================================================================
// Malformed input
// =========================================================================

#[test]
fn test_truncated_body_is_dropped_and_next_frame_applies() {
    let social = social();
    let mut events = social.subscribe();
    let room = SteamId::clan(50).to_chat();
    let mut body = chat_enter_body(room, &[(SteamId::individual(1), 1, 4)]);
    body.pop();

    let result = social.handle_bytes(&binary_frame(EMsg::CLIENT_CHAT_ENTER, body));
    assert!(matches!(result, Err(ProtocolError::Truncated { .. })));
    assert_eq!(social.groups().count(), 0);
    assert!(events.drain().is_empty());

    social
        .handle_bytes(&friends_list(true, &[(SteamId::individual(1), 3)]))
        .unwrap();
    assert_eq!(social.friends().count(), 1);
    assert_eq!(events.drain().len(), 1);

    let stats = social.stats();
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.applied, 1);
}

#[test]
fn test_unmapped_kind_is_ignored_silently() {
    let social = social();
    let mut events = social.subscribe();

    let frame = binary_frame(EMsg(9999), vec![1, 2, 3]);
    assert_eq!(social.handle_bytes(&frame).unwrap(), None);
    assert!(events.drain().is_empty());
    assert_eq!(social.stats().ignored, 1);
}

// =========================================================================
// Snapshots
// =========================================================================

#[test]
fn test_snapshot_isolated_and_keyed_canonically() {
    let social = social();
    let room = SteamId::clan(50).to_chat();
    social
        .handle_bytes(&binary_frame(
            EMsg::CLIENT_CHAT_ENTER,
            chat_enter_body(room, &[(SteamId::individual(1), 1, 4)]),
        ))
        .unwrap();

    let snap = social.groups().snapshot();
    social
        .handle_bytes(&binary_frame(
            EMsg::CLIENT_CHAT_MEMBER_INFO,
            member_left_body(room, SteamId::individual(1)),
        ))
        .unwrap();

    let group = &snap[&SteamId::clan(50)];
    assert_eq!(group.steam_id, SteamId::clan(50));
    assert_eq!(group.chat_members.as_ref().unwrap().len(), 1);
    assert!(!snap.contains_key(&room));
}

#[test]
fn test_account_info_sets_persona_and_serializes_event() {
    let social = social();
    let mut events = social.subscribe();
    social
        .handle_bytes(&proto_frame(
            EMsg::CLIENT_ACCOUNT_INFO,
            CMsgClientAccountInfo {
                persona_name: Some("me".into()),
                ip_country: Some("NO".into()),
                ..Default::default()
            },
        ))
        .unwrap();

    assert_eq!(social.persona_name(), "me");
    let json = serde_json::to_value(&events.drain()[0]).unwrap();
    assert_eq!(json["type"], "account_info");
    assert_eq!(json["country"], "NO");
}
