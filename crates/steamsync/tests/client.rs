//! Integration tests for the client pump over real connections.

use std::io::Cursor;
use std::sync::Arc;

use prost::Message;
use steamsync::prelude::*;
use steamsync::{DecodeConfig, FrameSender, TransportError};
use steamsync_protocol::proto::{CMsgClientFriendsList, cmsg_client_friends_list};
use steamsync_protocol::{EMsg, FriendRelationship};

fn friends_frame(pairs: &[(SteamId, u32)]) -> Vec<u8> {
    let body = CMsgClientFriendsList {
        bincremental: Some(true),
        friends: pairs
            .iter()
            .map(|&(id, rel)| cmsg_client_friends_list::Friend {
                ulfriendid: Some(id.0),
                efriendrelationship: Some(rel),
            })
            .collect(),
        ..Default::default()
    };
    let frame = steamsync::Frame::new(
        EMsg::CLIENT_FRIENDS_LIST.to_raw(true),
        body.encode_to_vec(),
    );
    let mut out = Vec::new();
    frame.write_to(&mut out).unwrap();
    out
}

fn length_prefixed(frames: &[Vec<u8>]) -> Vec<u8> {
    let mut data = Vec::new();
    for frame in frames {
        data.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        data.extend_from_slice(frame);
    }
    data
}

#[tokio::test]
async fn test_stream_capture_is_applied_in_order() {
    let id = SteamId::individual(1);
    let capture = length_prefixed(&[
        friends_frame(&[(id, FriendRelationship::REQUEST_RECIPIENT.0)]),
        vec![0xFF; 3],
        friends_frame(&[(id, FriendRelationship::FRIEND.0)]),
    ]);
    let conn = StreamConnection::new(Cursor::new(capture), 1 << 20);
    let client = SocialClient::new(conn, ClientConfig::default());
    let mut events = client.social().subscribe();

    assert_eq!(client.run().await.unwrap(), StopReason::Closed);

    let friend = client.social().friends().get(id).unwrap();
    assert_eq!(friend.relationship, FriendRelationship::FRIEND);
    assert_eq!(events.drain().len(), 2);
    let stats = client.social().stats();
    assert_eq!(stats.applied, 2);
    assert_eq!(stats.dropped, 1);
}

#[tokio::test]
async fn test_oversized_stream_frame_is_transport_error() {
    let mut capture = Vec::new();
    capture.extend_from_slice(&1024u32.to_le_bytes());
    capture.extend_from_slice(&[0; 1024]);
    let conn = StreamConnection::new(Cursor::new(capture), 64);
    let client = SocialClient::new(conn, ClientConfig::default());

    let err = client.run().await.unwrap_err();
    assert!(matches!(
        err,
        SteamSyncError::Transport(TransportError::FrameTooLarge { len: 1024, max: 64 })
    ));
}

#[tokio::test]
async fn test_two_connections_share_one_synchronizer() {
    let social = Arc::new(Social::new(DecodeConfig::default()));
    let (tx_a, conn_a) = ChannelConnection::pair(4);
    let (tx_b, conn_b) = ChannelConnection::pair(4);
    let a = SocialClient::with_social(conn_a, Arc::clone(&social), ClientConfig::default());
    let b = SocialClient::with_social(conn_b, Arc::clone(&social), ClientConfig::default());

    async fn feed(tx: FrameSender, frame: Vec<u8>) {
        tx.send(frame).await.unwrap();
    }

    let (ra, rb, _, _) = tokio::join!(
        a.run(),
        b.run(),
        feed(tx_a, friends_frame(&[(SteamId::individual(1), 3)])),
        feed(tx_b, friends_frame(&[(SteamId::individual(2), 3)])),
    );

    assert_eq!(ra.unwrap(), StopReason::Closed);
    assert_eq!(rb.unwrap(), StopReason::Closed);
    assert_eq!(social.friends().count(), 2);
    assert_eq!(social.stats().applied, 2);
}

#[tokio::test(start_paused = true)]
async fn test_idle_client_stops_after_timeout_with_frames_kept() {
    let (tx, conn) = ChannelConnection::pair(4);
    let config = ClientConfig {
        idle_timeout_secs: 30,
        ..ClientConfig::default()
    };
    let client = SocialClient::new(conn, config);
    tx.send(friends_frame(&[(SteamId::individual(1), 3)]))
        .await
        .unwrap();

    assert_eq!(client.run().await.unwrap(), StopReason::IdleTimeout);
    assert_eq!(client.social().friends().count(), 1);
    drop(tx);
}
