//! Checksummed, length-prefixed framing for the XBee API-mode protocol.
//!
//! This is the core value-add layer of xbeelink. Every API-mode message is
//! framed with:
//! - A 1-byte start delimiter (`0x7E`) for stream synchronization
//! - A 2-byte big-endian length covering the type byte through the body
//! - A 1-byte frame type selecting the body layout
//! - A 1-byte checksum over the type byte and body
//!
//! Corrupt or misaligned input never reaches a caller: the synchronizer
//! discards noise byte by byte until the next delimiter, and a frame is
//! surfaced only after its checksum validates.

pub mod checksum;
pub mod codec;
pub mod encode;
pub mod error;
pub mod reader;
pub mod registry;
pub mod status;
pub mod sync;
pub mod writer;

pub use checksum::checksum;
pub use codec::{
    decode_frame, Address16, Address64, ApiFrame, AtCommand, AtResponse, ExplicitReceive,
    FrameKind, ModemStatus, Receive, Transmit, TxStatus, FRAME_DELIMITER, FRAME_OVERHEAD,
    HEADER_SIZE, MAX_FRAME_LENGTH,
};
pub use encode::{encode_at_command, encode_transmit, FrameIdSequence};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use registry::{lookup, FrameSpec, REGISTRY};
pub use status::{
    delivery_status_description, discovery_status_description, modem_status_description,
    receive_options_description,
};
pub use sync::{decode_raw, next_frame, MIN_SYNC_BYTES};
pub use writer::{write_raw, FrameWriter};
