//! Static frame-type registry.
//!
//! Maps each wire type byte to the minimum declared length its fixed fields
//! need and the decoder that extracts them. Callers report type bytes
//! missing from this table as unsupported; they are never silently skipped.

use crate::codec::{self, ApiFrame, FrameKind};
use crate::error::Result;

/// Decode entry for one frame type.
pub struct FrameSpec {
    /// The frame kind this entry decodes.
    pub kind: FrameKind,
    /// Minimum value of the declared length field for this type. A shorter
    /// frame cannot hold the type's fixed fields and is rejected before any
    /// offset is read.
    pub min_length: usize,
    /// Extracts the typed payload from an envelope-validated frame.
    pub decode: fn(&[u8]) -> Result<ApiFrame>,
}

/// Every frame type the codec understands.
pub static REGISTRY: &[FrameSpec] = &[
    FrameSpec {
        kind: FrameKind::AtCommand,
        min_length: 4,
        decode: codec::decode_at_command,
    },
    FrameSpec {
        kind: FrameKind::Transmit,
        min_length: 14,
        decode: codec::decode_transmit,
    },
    FrameSpec {
        kind: FrameKind::AtResponse,
        min_length: 5,
        decode: codec::decode_at_response,
    },
    FrameSpec {
        kind: FrameKind::ModemStatus,
        min_length: 2,
        decode: codec::decode_modem_status,
    },
    FrameSpec {
        kind: FrameKind::TxStatus,
        min_length: 7,
        decode: codec::decode_tx_status,
    },
    FrameSpec {
        kind: FrameKind::Receive,
        min_length: 12,
        decode: codec::decode_receive,
    },
    FrameSpec {
        kind: FrameKind::ExplicitReceive,
        min_length: 18,
        decode: codec::decode_explicit_receive,
    },
];

/// Look up the registry entry for a wire type byte.
pub fn lookup(type_byte: u8) -> Option<&'static FrameSpec> {
    REGISTRY
        .iter()
        .find(|spec| spec.kind.type_byte() == type_byte)
}
