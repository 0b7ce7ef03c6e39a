//! Dispatch table: message kind → body decoder.
//!
//! [`MessageKind`] is the closed set of kinds this client understands.
//! [`MessageKind::from_emsg`] is the routing table; anything it returns
//! `None` for is ignored by the caller. [`MessageKind::decode`] picks the
//! one decoder for the kind, and the `match` is exhaustive, so adding a
//! kind without a decoder doesn't compile.
//!
//! ```rust
//! use steamsync_protocol::{DecodeConfig, EMsg, Frame, SocialMessage};
//!
//! // An unmapped kind is not an error: there's simply nothing to do.
//! let frame = Frame::new(5501, Vec::new());
//! let decoded = SocialMessage::decode(&frame, &DecodeConfig::default());
//! assert!(matches!(decoded, Ok(None)));
//! ```

use std::fmt;

use crate::body::{
    ClientChatActionResult, ClientChatEnter, ClientChatMemberInfo, ClientChatMsg,
    ClientSetIgnoreFriendResponse,
};
use crate::proto::{
    self, CMsgClientAccountInfo, CMsgClientAddFriendResponse, CMsgClientChatInvite,
    CMsgClientClanState, CMsgClientFriendMsgIncoming,
    CMsgClientFriendProfileInfoResponse, CMsgClientFriendsList,
    CMsgClientPersonaState,
};
use crate::{DecodeConfig, EMsg, Frame, ProtocolError, WireShape};

// ---------------------------------------------------------------------------
// MessageKind
// ---------------------------------------------------------------------------

/// A message kind this client decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    PersonaState,
    ClanState,
    FriendsList,
    FriendMsgIncoming,
    AccountInfo,
    AddFriendResponse,
    ChatEnter,
    ChatMsg,
    ChatMemberInfo,
    ChatActionResult,
    ChatInvite,
    SetIgnoreFriendResponse,
    FriendProfileInfoResponse,
}

impl MessageKind {
    pub const ALL: [Self; 13] = [
        Self::PersonaState,
        Self::ClanState,
        Self::FriendsList,
        Self::FriendMsgIncoming,
        Self::AccountInfo,
        Self::AddFriendResponse,
        Self::ChatEnter,
        Self::ChatMsg,
        Self::ChatMemberInfo,
        Self::ChatActionResult,
        Self::ChatInvite,
        Self::SetIgnoreFriendResponse,
        Self::FriendProfileInfoResponse,
    ];

    /// Routes a logical message kind. Returns `None` for kinds this
    /// client doesn't handle.
    pub fn from_emsg(emsg: EMsg) -> Option<Self> {
        let kind = match emsg {
            EMsg::CLIENT_PERSONA_STATE => Self::PersonaState,
            EMsg::CLIENT_CLAN_STATE => Self::ClanState,
            EMsg::CLIENT_FRIENDS_LIST => Self::FriendsList,
            EMsg::CLIENT_FRIEND_MSG_INCOMING => Self::FriendMsgIncoming,
            EMsg::CLIENT_ACCOUNT_INFO => Self::AccountInfo,
            EMsg::CLIENT_ADD_FRIEND_RESPONSE => Self::AddFriendResponse,
            EMsg::CLIENT_CHAT_ENTER => Self::ChatEnter,
            EMsg::CLIENT_CHAT_MSG => Self::ChatMsg,
            EMsg::CLIENT_CHAT_MEMBER_INFO => Self::ChatMemberInfo,
            EMsg::CLIENT_CHAT_ACTION_RESULT => Self::ChatActionResult,
            EMsg::CLIENT_CHAT_INVITE => Self::ChatInvite,
            EMsg::CLIENT_SET_IGNORE_FRIEND_RESPONSE => {
                Self::SetIgnoreFriendResponse
            }
            EMsg::CLIENT_FRIEND_PROFILE_INFO_RESPONSE => {
                Self::FriendProfileInfoResponse
            }
            _ => return None,
        };
        Some(kind)
    }

    /// The wire code of this kind.
    pub fn emsg(self) -> EMsg {
        match self {
            Self::PersonaState => EMsg::CLIENT_PERSONA_STATE,
            Self::ClanState => EMsg::CLIENT_CLAN_STATE,
            Self::FriendsList => EMsg::CLIENT_FRIENDS_LIST,
            Self::FriendMsgIncoming => EMsg::CLIENT_FRIEND_MSG_INCOMING,
            Self::AccountInfo => EMsg::CLIENT_ACCOUNT_INFO,
            Self::AddFriendResponse => EMsg::CLIENT_ADD_FRIEND_RESPONSE,
            Self::ChatEnter => EMsg::CLIENT_CHAT_ENTER,
            Self::ChatMsg => EMsg::CLIENT_CHAT_MSG,
            Self::ChatMemberInfo => EMsg::CLIENT_CHAT_MEMBER_INFO,
            Self::ChatActionResult => EMsg::CLIENT_CHAT_ACTION_RESULT,
            Self::ChatInvite => EMsg::CLIENT_CHAT_INVITE,
            Self::SetIgnoreFriendResponse => {
                EMsg::CLIENT_SET_IGNORE_FRIEND_RESPONSE
            }
            Self::FriendProfileInfoResponse => {
                EMsg::CLIENT_FRIEND_PROFILE_INFO_RESPONSE
            }
        }
    }

    /// How bodies of this kind are encoded.
    pub fn wire_shape(self) -> WireShape {
        match self {
            Self::ChatEnter
            | Self::ChatMsg
            | Self::ChatMemberInfo
            | Self::ChatActionResult
            | Self::SetIgnoreFriendResponse => WireShape::Binary,
            _ => WireShape::Protobuf,
        }
    }

    /// Decodes a body of this kind.
    pub fn decode(
        self,
        body: &[u8],
        config: &DecodeConfig,
    ) -> Result<SocialMessage, ProtocolError> {
        use SocialMessage as M;

        Ok(match self {
            Self::PersonaState => M::PersonaState(proto::decode(body)?),
            Self::ClanState => M::ClanState(proto::decode(body)?),
            Self::FriendsList => M::FriendsList(proto::decode(body)?),
            Self::FriendMsgIncoming => M::FriendMsgIncoming(proto::decode(body)?),
            Self::AccountInfo => M::AccountInfo(proto::decode(body)?),
            Self::AddFriendResponse => M::AddFriendResponse(proto::decode(body)?),
            Self::ChatInvite => M::ChatInvite(proto::decode(body)?),
            Self::FriendProfileInfoResponse => {
                M::FriendProfileInfoResponse(proto::decode(body)?)
            }
            Self::ChatEnter => M::ChatEnter(ClientChatEnter::decode(body, config)?),
            Self::ChatMsg => M::ChatMsg(ClientChatMsg::decode(body)?),
            Self::ChatMemberInfo => {
                M::ChatMemberInfo(ClientChatMemberInfo::decode(body)?)
            }
            Self::ChatActionResult => {
                M::ChatActionResult(ClientChatActionResult::decode(body)?)
            }
            Self::SetIgnoreFriendResponse => M::SetIgnoreFriendResponse(
                ClientSetIgnoreFriendResponse::decode(body)?,
            ),
        })
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// SocialMessage
// ---------------------------------------------------------------------------

/// A decoded body, one variant per [`MessageKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum SocialMessage {
    PersonaState(CMsgClientPersonaState),
    ClanState(CMsgClientClanState),
    FriendsList(CMsgClientFriendsList),
    FriendMsgIncoming(CMsgClientFriendMsgIncoming),
    AccountInfo(CMsgClientAccountInfo),
    AddFriendResponse(CMsgClientAddFriendResponse),
    ChatEnter(ClientChatEnter),
    ChatMsg(ClientChatMsg),
    ChatMemberInfo(ClientChatMemberInfo),
    ChatActionResult(ClientChatActionResult),
    ChatInvite(CMsgClientChatInvite),
    SetIgnoreFriendResponse(ClientSetIgnoreFriendResponse),
    FriendProfileInfoResponse(CMsgClientFriendProfileInfoResponse),
}

impl SocialMessage {
    /// Routes and decodes one frame.
    ///
    /// Returns `Ok(None)` for kinds with no entry in the dispatch table.
    ///
    /// # Errors
    /// - [`ProtocolError::WireShapeMismatch`] if the frame's protobuf flag
    ///   disagrees with the kind's known wire shape
    /// - any error of the kind's body decoder
    pub fn decode(
        frame: &Frame,
        config: &DecodeConfig,
    ) -> Result<Option<Self>, ProtocolError> {
        let Some(kind) = MessageKind::from_emsg(frame.emsg()) else {
            return Ok(None);
        };
        if frame.shape() != kind.wire_shape() {
            return Err(ProtocolError::WireShapeMismatch {
                emsg: frame.emsg(),
                expected: kind.wire_shape(),
            });
        }
        kind.decode(frame.body(), config).map(Some)
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::PersonaState(_) => MessageKind::PersonaState,
            Self::ClanState(_) => MessageKind::ClanState,
            Self::FriendsList(_) => MessageKind::FriendsList,
            Self::FriendMsgIncoming(_) => MessageKind::FriendMsgIncoming,
            Self::AccountInfo(_) => MessageKind::AccountInfo,
            Self::AddFriendResponse(_) => MessageKind::AddFriendResponse,
            Self::ChatEnter(_) => MessageKind::ChatEnter,
            Self::ChatMsg(_) => MessageKind::ChatMsg,
            Self::ChatMemberInfo(_) => MessageKind::ChatMemberInfo,
            Self::ChatActionResult(_) => MessageKind::ChatActionResult,
            Self::ChatInvite(_) => MessageKind::ChatInvite,
            Self::SetIgnoreFriendResponse(_) => {
                MessageKind::SetIgnoreFriendResponse
            }
            Self::FriendProfileInfoResponse(_) => {
                MessageKind::FriendProfileInfoResponse
            }
        }
    }
}
