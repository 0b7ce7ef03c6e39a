//! Frame envelope: type code, header, body.
//!
//! A frame on the wire starts with a 32-bit little-endian type code. Bit
//! 31 of that code says how the rest is laid out:
//!
//! ```text
//! protobuf (bit 31 set)
//! ┌───────────┬────────────┬──────────────────────────┬──────────┐
//! │ u32 type  │ u32 hdrlen │ CMsgProtoBufHeader bytes │   body   │
//! └───────────┴────────────┴──────────────────────────┴──────────┘
//!
//! binary (bit 31 clear): 36-byte extended header
//! ┌──────────┬─────────┬─────────┬────────────┬────────────┬───────────┬─────────┬──────────┬──────┐
//! │ u32 type │ u8 size │ u16 ver │ u64 target │ u64 source │ u8 canary │ u64 sid │ i32 sess │ body │
//! └──────────┴─────────┴─────────┴────────────┴────────────┴───────────┴─────────┴──────────┴──────┘
//! ```
//!
//! Transports that already strip the header hand over just the type code
//! and body; [`Frame::new`] covers that case.

use std::fmt;
use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use prost::Message;
use serde::{Deserialize, Serialize};

use crate::proto::CMsgProtoBufHeader;
use crate::{BinaryReader, DecodeConfig, EMsg, ProtocolError, SteamId};

/// Size of the binary extended header, type code included.
pub const EXTENDED_HEADER_LEN: usize = 36;
const EXTENDED_HEADER_VERSION: u16 = 2;
const EXTENDED_HEADER_CANARY: u8 = 239;
const NO_JOB: u64 = u64::MAX;

// ---------------------------------------------------------------------------
// WireShape
// ---------------------------------------------------------------------------

/// How a frame's body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireShape {
    /// Self-describing protobuf fields.
    Protobuf,
    /// Hand-rolled little-endian layout.
    Binary,
}

impl WireShape {
    /// Reads the shape from the protobuf flag of a raw type code.
    pub fn of_raw(raw_type: u32) -> Self {
        if EMsg::is_proto(raw_type) {
            Self::Protobuf
        } else {
            Self::Binary
        }
    }
}

impl fmt::Display for WireShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protobuf => write!(f, "protobuf"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// The fixed header of a binary frame, minus the type code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedHeader {
    pub version: u16,
    pub target_job_id: u64,
    pub source_job_id: u64,
    pub steam_id: SteamId,
    pub session_id: i32,
}

impl Default for ExtendedHeader {
    fn default() -> Self {
        Self {
            version: EXTENDED_HEADER_VERSION,
            target_job_id: NO_JOB,
            source_job_id: NO_JOB,
            steam_id: SteamId::default(),
            session_id: 0,
        }
    }
}

/// Whatever header preceded the body.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameHeader {
    Protobuf(CMsgProtoBufHeader),
    Extended(ExtendedHeader),
    /// The transport stripped the header before handing the frame over.
    Stripped,
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One inbound protocol unit: a message kind, its wire shape, and the
/// undecoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    emsg: EMsg,
    shape: WireShape,
    header: FrameHeader,
    body: Vec<u8>,
}

impl Frame {
    /// Builds a frame whose header has already been removed.
    ///
    /// `raw_type` still carries the protobuf flag; it decides the wire
    /// shape.
    pub fn new(raw_type: u32, body: Vec<u8>) -> Self {
        Self {
            emsg: EMsg::from_raw(raw_type),
            shape: WireShape::of_raw(raw_type),
            header: FrameHeader::Stripped,
            body,
        }
    }

    /// Parses a complete frame, header included.
    ///
    /// # Errors
    /// - [`ProtocolError::FrameTooLarge`] if `bytes` exceeds the limit
    /// - [`ProtocolError::InvalidHeader`] on a bad size or canary byte
    /// - [`ProtocolError::Truncated`] if the header is cut short
    /// - [`ProtocolError::Protobuf`] if a protobuf header is malformed
    pub fn decode(
        bytes: &[u8],
        config: &DecodeConfig,
    ) -> Result<Self, ProtocolError> {
        if bytes.len() > config.max_frame_len {
            return Err(ProtocolError::FrameTooLarge {
                len: bytes.len(),
                max: config.max_frame_len,
            });
        }

        let mut reader = BinaryReader::new(bytes);
        let raw_type = reader.read_u32()?;
        let shape = WireShape::of_raw(raw_type);

        let header = match shape {
            WireShape::Protobuf => {
                let len = reader.read_u32()? as usize;
                if len > reader.remaining() {
                    return Err(ProtocolError::Truncated {
                        needed: len,
                        remaining: reader.remaining(),
                    });
                }
                let rest = reader.rest();
                let header = CMsgProtoBufHeader::decode(&rest[..len])?;
                reader.skip(len)?;
                FrameHeader::Protobuf(header)
            }
            WireShape::Binary => {
                FrameHeader::Extended(read_extended_header(&mut reader)?)
            }
        };

        Ok(Self {
            emsg: EMsg::from_raw(raw_type),
            shape,
            header,
            body: reader.rest().to_vec(),
        })
    }

    /// Writes the frame in its full on-wire form.
    ///
    /// A frame built with [`Frame::new`] gets a default header of its
    /// wire shape.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_u32::<LittleEndian>(
            self.emsg.to_raw(self.shape == WireShape::Protobuf),
        )?;
        match (&self.header, self.shape) {
            (FrameHeader::Protobuf(header), _) => {
                write_proto_header(out, header)?;
            }
            (FrameHeader::Extended(header), _) => {
                write_extended_header(out, header)?;
            }
            (FrameHeader::Stripped, WireShape::Protobuf) => {
                write_proto_header(out, &CMsgProtoBufHeader::default())?;
            }
            (FrameHeader::Stripped, WireShape::Binary) => {
                write_extended_header(out, &ExtendedHeader::default())?;
            }
        }
        out.write_all(&self.body)
    }

    /// Returns a copy of this frame carrying `header`.
    pub fn with_header(mut self, header: FrameHeader) -> Self {
        self.header = header;
        self
    }

    /// The logical message kind, protobuf flag stripped.
    pub fn emsg(&self) -> EMsg {
        self.emsg
    }

    pub fn shape(&self) -> WireShape {
        self.shape
    }

    pub fn is_proto(&self) -> bool {
        self.shape == WireShape::Protobuf
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The account id the header names, if the header carried one.
    pub fn sender(&self) -> Option<SteamId> {
        match &self.header {
            FrameHeader::Protobuf(h) => h.steamid.map(SteamId),
            FrameHeader::Extended(h) => Some(h.steam_id),
            FrameHeader::Stripped => None,
        }
    }
}

fn read_extended_header(
    reader: &mut BinaryReader<'_>,
) -> Result<ExtendedHeader, ProtocolError> {
    let size = reader.read_u8()?;
    if usize::from(size) != EXTENDED_HEADER_LEN {
        return Err(ProtocolError::InvalidHeader(format!(
            "header size {size}, expected {EXTENDED_HEADER_LEN}"
        )));
    }
    let version = reader.read_u16()?;
    let target_job_id = reader.read_u64()?;
    let source_job_id = reader.read_u64()?;
    let canary = reader.read_u8()?;
    if canary != EXTENDED_HEADER_CANARY {
        return Err(ProtocolError::InvalidHeader(format!(
            "canary {canary}, expected {EXTENDED_HEADER_CANARY}"
        )));
    }
    let steam_id = SteamId(reader.read_u64()?);
    let session_id = reader.read_i32()?;
    Ok(ExtendedHeader {
        version,
        target_job_id,
        source_job_id,
        steam_id,
        session_id,
    })
}

fn write_proto_header<W: Write>(
    out: &mut W,
    header: &CMsgProtoBufHeader,
) -> io::Result<()> {
    let bytes = header.encode_to_vec();
    out.write_u32::<LittleEndian>(bytes.len() as u32)?;
    out.write_all(&bytes)
}

fn write_extended_header<W: Write>(
    out: &mut W,
    header: &ExtendedHeader,
) -> io::Result<()> {
    out.write_u8(EXTENDED_HEADER_LEN as u8)?;
    out.write_u16::<LittleEndian>(header.version)?;
    out.write_u64::<LittleEndian>(header.target_job_id)?;
    out.write_u64::<LittleEndian>(header.source_job_id)?;
    out.write_u8(EXTENDED_HEADER_CANARY)?;
    out.write_u64::<LittleEndian>(header.steam_id.0)?;
    out.write_i32::<LittleEndian>(header.session_id)
}
