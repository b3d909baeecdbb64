//! Wire frames for the external transport.
//!
//! Each frame is written as:
//! ```text
//! [u32 length (LE)][bincode serialized Frame]
//! ```
//! A byte stream is a concatenation of frames; [`decode_frame`] reports how
//! many bytes it consumed so the caller can advance its buffer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use combat_core::DamageReport;

use super::{AuthoritativeDelta, Proposal};

/// Largest accepted frame payload.
pub const MAX_FRAME_BYTES: usize = 64 * 1024;

const HEADER_BYTES: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Frame {
    Proposal(Proposal),
    Delta(AuthoritativeDelta),
    Report(DamageReport),
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("frame of {len} bytes exceeds limit of {max}")]
    FrameTooLarge { len: usize, max: usize },

    #[error("incomplete frame: need {needed} bytes, have {available}")]
    Incomplete { needed: usize, available: usize },
}

/// Encodes `frame` with its length prefix.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, CodecError> {
    let payload =
        bincode::serialize(frame).map_err(|e| CodecError::Serialization(e.to_string()))?;
    if payload.len() > MAX_FRAME_BYTES {
        return Err(CodecError::FrameTooLarge {
            len: payload.len(),
            max: MAX_FRAME_BYTES,
        });
    }

    let len = payload.len() as u32;
    let mut bytes = Vec::with_capacity(HEADER_BYTES + payload.len());
    bytes.extend_from_slice(&len.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decodes the first frame in `bytes`, returning it with the bytes consumed.
pub fn decode_frame(bytes: &[u8]) -> Result<(Frame, usize), CodecError> {
    let Some(header) = bytes.get(..HEADER_BYTES) else {
        return Err(CodecError::Incomplete {
            needed: HEADER_BYTES,
            available: bytes.len(),
        });
    };
    let mut len_bytes = [0u8; HEADER_BYTES];
    len_bytes.copy_from_slice(header);
    let len = u32::from_le_bytes(len_bytes) as usize;

    if len > MAX_FRAME_BYTES {
        return Err(CodecError::FrameTooLarge {
            len,
            max: MAX_FRAME_BYTES,
        });
    }

    let end = HEADER_BYTES + len;
    let Some(payload) = bytes.get(HEADER_BYTES..end) else {
        return Err(CodecError::Incomplete {
            needed: end,
            available: bytes.len(),
        });
    };

    let frame = bincode::deserialize(payload)
        .map_err(|e| CodecError::Serialization(e.to_string()))?;
    Ok((frame, end))
}

/// Pretty JSON dump for diagnostics (deltas, reports, events).
pub fn dump_json<T: Serialize>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string_pretty(value).map_err(|e| CodecError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{ActionKind, EntityId, PeerId};

    #[test]
    fn stream_of_frames_decodes_in_order() {
        let first = Frame::Proposal(Proposal::new(
            PeerId(2),
            EntityId(7),
            ActionKind::Attack { target: EntityId(9) },
        ));
        let second = Frame::Proposal(Proposal::new(PeerId(2), EntityId(7), ActionKind::Respawn));

        let mut stream = encode_frame(&first).unwrap();
        stream.extend(encode_frame(&second).unwrap());

        let (decoded, used) = decode_frame(&stream).unwrap();
        assert_eq!(decoded, first);
        let (decoded, rest) = decode_frame(&stream[used..]).unwrap();
        assert_eq!(decoded, second);
        assert_eq!(used + rest, stream.len());
    }

    #[test]
    fn truncated_frame_is_incomplete() {
        let frame = Frame::Proposal(Proposal::new(PeerId(1), EntityId(1), ActionKind::Respawn));
        let bytes = encode_frame(&frame).unwrap();

        let err = decode_frame(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, CodecError::Incomplete { .. }));
        assert!(matches!(
            decode_frame(&bytes[..2]),
            Err(CodecError::Incomplete { needed: 4, .. })
        ));
    }

    #[test]
    fn oversized_length_prefix_is_rejected() {
        let mut bytes = ((MAX_FRAME_BYTES + 1) as u32).to_le_bytes().to_vec();
        bytes.extend([0u8; 8]);
        assert!(matches!(
            decode_frame(&bytes),
            Err(CodecError::FrameTooLarge { .. })
        ));
    }
}
