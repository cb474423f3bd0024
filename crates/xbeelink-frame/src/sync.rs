//! Incremental frame synchronization over a growing byte buffer.
//!
//! The buffer's remaining contents alone determine the scan state, so the
//! synchronizer is idempotent and resumable across arbitrarily small read
//! chunks: a partial frame is simply re-evaluated once more bytes arrive.

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::codec::{decode_frame, ApiFrame, FrameKind, FRAME_DELIMITER, FRAME_OVERHEAD, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Minimum buffered bytes before the scanner evaluates a candidate frame:
/// the smallest real frame plus margin.
pub const MIN_SYNC_BYTES: usize = 8;

/// Scan `buf` for the next complete frame.
///
/// Returns `None` when more bytes are needed; nothing is consumed except
/// resynchronization discards (leading bytes that are not the frame
/// delimiter). Returns `Some(Err(..))` when a complete, well-delimited
/// frame failed validation — its bytes are consumed, so the scan stays
/// aligned for the frame after it. Discarding noise is the designed
/// recovery mechanism and is traced, never reported as an error.
pub fn next_frame(buf: &mut BytesMut) -> Option<Result<ApiFrame>> {
    let mut discarded = 0usize;
    let result = loop {
        if buf.len() < MIN_SYNC_BYTES {
            break None;
        }

        if buf[0] != FRAME_DELIMITER {
            buf.advance(1);
            discarded += 1;
            continue;
        }

        let declared = u16::from_be_bytes([buf[1], buf[2]]) as usize;
        let total = declared + FRAME_OVERHEAD;
        if buf.len() < total {
            // Full frame not yet arrived; consume nothing so this candidate
            // is re-evaluated on the next call.
            break None;
        }

        let raw = buf.split_to(total);
        break Some(decode_raw(&raw));
    };

    if discarded > 0 {
        trace!(discarded, "discarded bytes while seeking frame delimiter");
    }
    result
}

/// Decode one complete frame keyed by its own type byte.
pub fn decode_raw(raw: &[u8]) -> Result<ApiFrame> {
    let type_byte = raw[HEADER_SIZE];
    let kind =
        FrameKind::from_byte(type_byte).ok_or(FrameError::UnsupportedType(type_byte))?;
    decode_frame(kind, raw)
}
