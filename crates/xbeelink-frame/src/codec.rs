use std::fmt;

use bytes::Bytes;

use crate::checksum::checksum;
use crate::error::{FrameError, Result};
use crate::registry;

/// Start-of-frame delimiter.
pub const FRAME_DELIMITER: u8 = 0x7E;

/// Frame header: delimiter (1) + length (2, big-endian) = 3 bytes.
pub const HEADER_SIZE: usize = 3;

/// Header plus the trailing checksum byte. A frame's wire size is its
/// declared length plus this.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + 1;

/// Largest value the length field can declare.
pub const MAX_FRAME_LENGTH: usize = u16::MAX as usize;

/// Smallest span that can hold a frame at all: header, type byte, checksum.
const MIN_FRAME_SIZE: usize = FRAME_OVERHEAD + 1;

/// Frame types understood by the codec.
///
/// Wire format:
/// ```text
/// ┌────────────┬────────────┬──────────┬──────────────────┬────────────┐
/// │ Delimiter  │ Length     │ Type     │ Body             │ Checksum   │
/// │ 0x7E (1B)  │ (2B BE)    │ (1B)     │ (Length-1 bytes) │ (1B)       │
/// └────────────┴────────────┴──────────┴──────────────────┴────────────┘
/// ```
/// The length counts the type byte and the body; the checksum covers the
/// same span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameKind {
    /// Local AT command request.
    AtCommand = 0x08,
    /// Transmit request with 64-bit addressing.
    Transmit = 0x10,
    /// Response to a local AT command.
    AtResponse = 0x88,
    /// Unsolicited modem state notification.
    ModemStatus = 0x8A,
    /// Delivery report for a transmit request.
    TxStatus = 0x8B,
    /// Received data packet.
    Receive = 0x90,
    /// Received data packet with explicit addressing metadata.
    ExplicitReceive = 0x91,
}

impl FrameKind {
    /// Every kind, in wire-value order.
    pub const ALL: [FrameKind; 7] = [
        FrameKind::AtCommand,
        FrameKind::Transmit,
        FrameKind::AtResponse,
        FrameKind::ModemStatus,
        FrameKind::TxStatus,
        FrameKind::Receive,
        FrameKind::ExplicitReceive,
    ];

    /// Map a wire type byte to a kind, if recognized.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x08 => Some(Self::AtCommand),
            0x10 => Some(Self::Transmit),
            0x88 => Some(Self::AtResponse),
            0x8A => Some(Self::ModemStatus),
            0x8B => Some(Self::TxStatus),
            0x90 => Some(Self::Receive),
            0x91 => Some(Self::ExplicitReceive),
            _ => None,
        }
    }

    /// The wire type byte for this kind.
    pub fn type_byte(self) -> u8 {
        self as u8
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::AtCommand => "AtCommand",
            Self::Transmit => "Transmit",
            Self::AtResponse => "AtResponse",
            Self::ModemStatus => "ModemStatus",
            Self::TxStatus => "TxStatus",
            Self::Receive => "Receive",
            Self::ExplicitReceive => "ExplicitReceive",
        }
    }
}

/// 64-bit radio address, big-endian. Carried opaquely: the codec never
/// interprets it beyond its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address64(pub [u8; 8]);

impl Address64 {
    /// The well-known broadcast address.
    pub const BROADCAST: Self = Self([0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF]);
}

impl fmt::Display for Address64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

/// 16-bit network address, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address16(pub [u8; 2]);

impl Address16 {
    /// "Network address unknown / not supplied" sentinel; the default for
    /// outgoing transmit frames when the caller gives no network address.
    pub const UNKNOWN: Self = Self([0xFF, 0xFE]);
}

impl fmt::Display for Address16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}", self.0[0], self.0[1])
    }
}

/// Local AT command request (as decoded back from the wire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtCommand {
    pub frame_id: u8,
    pub command: [u8; 2],
    pub parameter: Bytes,
}

/// Transmit request (as decoded back from the wire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmit {
    pub frame_id: u8,
    pub destination: Address64,
    pub network: Address16,
    pub broadcast_radius: u8,
    pub options: u8,
    pub payload: Bytes,
}

/// Response to a local AT command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtResponse {
    pub frame_id: u8,
    pub command: [u8; 2],
    pub status: u8,
    /// Register value, present when the command queried one.
    pub value: Bytes,
}

/// Unsolicited modem state notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModemStatus {
    pub status: u8,
}

/// Delivery report for a transmit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxStatus {
    pub frame_id: u8,
    pub network: Address16,
    pub retry_count: u8,
    pub delivery_status: u8,
    pub discovery_status: u8,
}

/// Received data packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receive {
    pub source: Address64,
    pub network: Address16,
    pub options: u8,
    pub payload: Bytes,
}

/// Received data packet with explicit addressing metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitReceive {
    pub source: Address64,
    pub network: Address16,
    pub source_endpoint: u8,
    pub destination_endpoint: u8,
    pub cluster_id: u16,
    pub profile_id: u16,
    pub options: u8,
    pub payload: Bytes,
}

/// A decoded API frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFrame {
    AtCommand(AtCommand),
    Transmit(Transmit),
    AtResponse(AtResponse),
    ModemStatus(ModemStatus),
    TxStatus(TxStatus),
    Receive(Receive),
    ExplicitReceive(ExplicitReceive),
}

impl ApiFrame {
    /// The kind of this frame.
    pub fn kind(&self) -> FrameKind {
        match self {
            Self::AtCommand(_) => FrameKind::AtCommand,
            Self::Transmit(_) => FrameKind::Transmit,
            Self::AtResponse(_) => FrameKind::AtResponse,
            Self::ModemStatus(_) => FrameKind::ModemStatus,
            Self::TxStatus(_) => FrameKind::TxStatus,
            Self::Receive(_) => FrameKind::Receive,
            Self::ExplicitReceive(_) => FrameKind::ExplicitReceive,
        }
    }
}

/// Decode one complete frame of a known kind.
///
/// `raw` must be exactly one frame: delimiter, length, type, body, checksum.
/// Validation order: type byte, declared length against the actual span,
/// checksum, per-type minimum length, then field extraction. No field is
/// extracted from a frame that failed any earlier step.
pub fn decode_frame(kind: FrameKind, raw: &[u8]) -> Result<ApiFrame> {
    if raw.len() < MIN_FRAME_SIZE {
        let declared = if raw.len() >= HEADER_SIZE {
            u16::from_be_bytes([raw[1], raw[2]]) as usize
        } else {
            0
        };
        return Err(FrameError::LengthMismatch {
            declared,
            actual: raw.len().saturating_sub(FRAME_OVERHEAD),
        });
    }

    if raw[HEADER_SIZE] != kind.type_byte() {
        return Err(FrameError::TypeMismatch {
            expected: kind.type_byte(),
            actual: raw[HEADER_SIZE],
        });
    }

    let declared = u16::from_be_bytes([raw[1], raw[2]]) as usize;
    let actual = raw.len() - FRAME_OVERHEAD;
    if declared != actual {
        return Err(FrameError::LengthMismatch { declared, actual });
    }

    let body = &raw[HEADER_SIZE..HEADER_SIZE + declared];
    let expected = checksum(body);
    let found = raw[HEADER_SIZE + declared];
    if expected != found {
        return Err(FrameError::ChecksumMismatch {
            expected,
            actual: found,
        });
    }

    let spec = registry::lookup(kind.type_byte())
        .ok_or_else(|| FrameError::UnsupportedType(kind.type_byte()))?;
    if declared < spec.min_length {
        return Err(FrameError::TooShort {
            type_byte: kind.type_byte(),
            length: declared,
            min: spec.min_length,
        });
    }

    (spec.decode)(raw)
}

// Field extractors below assume the envelope (length, checksum, per-type
// minimum) has been validated; offsets are from the frame start and the
// checksum is the final byte.

fn addr64_at(raw: &[u8], offset: usize) -> Address64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&raw[offset..offset + 8]);
    Address64(bytes)
}

fn addr16_at(raw: &[u8], offset: usize) -> Address16 {
    Address16([raw[offset], raw[offset + 1]])
}

fn body_end(raw: &[u8]) -> usize {
    raw.len() - 1
}

pub(crate) fn decode_at_command(raw: &[u8]) -> Result<ApiFrame> {
    Ok(ApiFrame::AtCommand(AtCommand {
        frame_id: raw[4],
        command: [raw[5], raw[6]],
        parameter: Bytes::copy_from_slice(&raw[7..body_end(raw)]),
    }))
}

pub(crate) fn decode_transmit(raw: &[u8]) -> Result<ApiFrame> {
    Ok(ApiFrame::Transmit(Transmit {
        frame_id: raw[4],
        destination: addr64_at(raw, 5),
        network: addr16_at(raw, 13),
        broadcast_radius: raw[15],
        options: raw[16],
        payload: Bytes::copy_from_slice(&raw[17..body_end(raw)]),
    }))
}

pub(crate) fn decode_at_response(raw: &[u8]) -> Result<ApiFrame> {
    Ok(ApiFrame::AtResponse(AtResponse {
        frame_id: raw[4],
        command: [raw[5], raw[6]],
        status: raw[7],
        value: Bytes::copy_from_slice(&raw[8..body_end(raw)]),
    }))
}

pub(crate) fn decode_modem_status(raw: &[u8]) -> Result<ApiFrame> {
    Ok(ApiFrame::ModemStatus(ModemStatus { status: raw[4] }))
}

pub(crate) fn decode_tx_status(raw: &[u8]) -> Result<ApiFrame> {
    Ok(ApiFrame::TxStatus(TxStatus {
        frame_id: raw[4],
        network: addr16_at(raw, 5),
        retry_count: raw[7],
        delivery_status: raw[8],
        discovery_status: raw[9],
    }))
}

pub(crate) fn decode_receive(raw: &[u8]) -> Result<ApiFrame> {
    Ok(ApiFrame::Receive(Receive {
        source: addr64_at(raw, 4),
        network: addr16_at(raw, 12),
        options: raw[14],
        payload: Bytes::copy_from_slice(&raw[15..body_end(raw)]),
    }))
}

pub(crate) fn decode_explicit_receive(raw: &[u8]) -> Result<ApiFrame> {
    Ok(ApiFrame::ExplicitReceive(ExplicitReceive {
        source: addr64_at(raw, 4),
        network: addr16_at(raw, 12),
        source_endpoint: raw[14],
        destination_endpoint: raw[15],
        cluster_id: u16::from_be_bytes([raw[16], raw[17]]),
        profile_id: u16::from_be_bytes([raw[18], raw[19]]),
        options: raw[20],
        payload: Bytes::copy_from_slice(&raw[21..body_end(raw)]),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_type_byte() {
        for kind in [
            FrameKind::AtCommand,
            FrameKind::Transmit,
            FrameKind::AtResponse,
            FrameKind::ModemStatus,
            FrameKind::TxStatus,
            FrameKind::Receive,
            FrameKind::ExplicitReceive,
        ] {
            assert_eq!(FrameKind::from_byte(kind.type_byte()), Some(kind));
        }
        assert_eq!(FrameKind::from_byte(0x42), None);
    }

    #[test]
    fn decode_at_response_without_value() {
        let raw = [0x7E, 0x00, 0x05, 0x88, 0x01, 0x42, 0x44, 0x00, 0xF0];
        let frame = decode_frame(FrameKind::AtResponse, &raw).unwrap();
        match frame {
            ApiFrame::AtResponse(response) => {
                assert_eq!(response.frame_id, 1);
                assert_eq!(&response.command, b"BD");
                assert_eq!(response.status, 0);
                assert!(response.value.is_empty());
            }
            other => panic!("expected AtResponse, got {other:?}"),
        }
    }

    #[test]
    fn decode_at_response_with_value() {
        let raw = [
            0x7E, 0x00, 0x0A, 0x88, 0x01, 0x42, 0x44, 0x00, 0x68, 0x65, 0x6C, 0x6C, 0x6F, 0xDC,
        ];
        let frame = decode_frame(FrameKind::AtResponse, &raw).unwrap();
        match frame {
            ApiFrame::AtResponse(response) => {
                assert_eq!(response.frame_id, 1);
                assert_eq!(response.value.as_ref(), b"hello");
            }
            other => panic!("expected AtResponse, got {other:?}"),
        }
    }

    #[test]
    fn at_response_with_wrong_checksum_never_yields_a_value() {
        let raw = [
            0x7E, 0x00, 0x0A, 0x88, 0x01, 0x42, 0x44, 0x00, 0x68, 0x65, 0x6C, 0x6C, 0x6F, 0x4B,
        ];
        let err = decode_frame(FrameKind::AtResponse, &raw).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ChecksumMismatch {
                expected: 0xDC,
                actual: 0x4B
            }
        ));
    }

    #[test]
    fn decode_modem_status() {
        let raw = [0x7E, 0x00, 0x02, 0x8A, 0x06, 0x6F];
        let frame = decode_frame(FrameKind::ModemStatus, &raw).unwrap();
        assert_eq!(frame, ApiFrame::ModemStatus(ModemStatus { status: 0x06 }));
    }

    #[test]
    fn decode_tx_status_fields() {
        let body = [0x8B, 0x01, 0x7D, 0x84, 0x00, 0x00, 0x01];
        let mut raw = vec![0x7E, 0x00, body.len() as u8];
        raw.extend_from_slice(&body);
        raw.push(crate::checksum::checksum(&body));

        let frame = decode_frame(FrameKind::TxStatus, &raw).unwrap();
        match frame {
            ApiFrame::TxStatus(status) => {
                assert_eq!(status.frame_id, 1);
                assert_eq!(status.network, Address16([0x7D, 0x84]));
                assert_eq!(status.retry_count, 0);
                assert_eq!(status.delivery_status, 0);
                assert_eq!(status.discovery_status, 1);
            }
            other => panic!("expected TxStatus, got {other:?}"),
        }
    }

    #[test]
    fn decode_receive_fields() {
        let mut body = vec![0x90];
        body.extend_from_slice(&[0x00, 0x13, 0xA2, 0x00, 0x40, 0x0A, 0x01, 0x27]);
        body.extend_from_slice(&[0x7D, 0x84]);
        body.push(0x01);
        body.extend_from_slice(b"RxData");
        let mut raw = vec![0x7E, 0x00, body.len() as u8];
        raw.extend_from_slice(&body);
        raw.push(crate::checksum::checksum(&body));

        let frame = decode_frame(FrameKind::Receive, &raw).unwrap();
        match frame {
            ApiFrame::Receive(receive) => {
                assert_eq!(
                    receive.source,
                    Address64([0x00, 0x13, 0xA2, 0x00, 0x40, 0x0A, 0x01, 0x27])
                );
                assert_eq!(receive.network, Address16([0x7D, 0x84]));
                assert_eq!(receive.options, 0x01);
                assert_eq!(receive.payload.as_ref(), b"RxData");
            }
            other => panic!("expected Receive, got {other:?}"),
        }
    }

    #[test]
    fn decode_explicit_receive_fields() {
        let mut body = vec![0x91];
        body.extend_from_slice(&[0x00, 0x13, 0xA2, 0x00, 0x40, 0x0A, 0x01, 0x27]);
        body.extend_from_slice(&[0x7D, 0x84]);
        body.push(0xE8); // source endpoint
        body.push(0xE8); // destination endpoint
        body.extend_from_slice(&[0x00, 0x11]); // cluster
        body.extend_from_slice(&[0xC1, 0x05]); // profile
        body.push(0x02);
        body.extend_from_slice(b"hi");
        let mut raw = vec![0x7E, 0x00, body.len() as u8];
        raw.extend_from_slice(&body);
        raw.push(crate::checksum::checksum(&body));

        let frame = decode_frame(FrameKind::ExplicitReceive, &raw).unwrap();
        match frame {
            ApiFrame::ExplicitReceive(receive) => {
                assert_eq!(receive.source_endpoint, 0xE8);
                assert_eq!(receive.destination_endpoint, 0xE8);
                assert_eq!(receive.cluster_id, 0x0011);
                assert_eq!(receive.profile_id, 0xC105);
                assert_eq!(receive.options, 0x02);
                assert_eq!(receive.payload.as_ref(), b"hi");
            }
            other => panic!("expected ExplicitReceive, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_type_byte_rejected() {
        let raw = [0x7E, 0x00, 0x02, 0x8A, 0x06, 0x6F];
        let err = decode_frame(FrameKind::AtResponse, &raw).unwrap_err();
        assert!(matches!(
            err,
            FrameError::TypeMismatch {
                expected: 0x88,
                actual: 0x8A
            }
        ));
    }

    #[test]
    fn declared_length_must_match_span() {
        // Declared 0x03 but the span only holds a 2-byte body.
        let raw = [0x7E, 0x00, 0x03, 0x8A, 0x06, 0x6F];
        let err = decode_frame(FrameKind::ModemStatus, &raw).unwrap_err();
        assert!(matches!(
            err,
            FrameError::LengthMismatch {
                declared: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn corrupted_checksum_rejected_before_extraction() {
        let raw = [0x7E, 0x00, 0x02, 0x8A, 0x06, 0x70];
        let err = decode_frame(FrameKind::ModemStatus, &raw).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ChecksumMismatch {
                expected: 0x6F,
                actual: 0x70
            }
        ));
    }

    #[test]
    fn corrupted_body_byte_rejected() {
        let mut raw = vec![0x7E, 0x00, 0x05, 0x88, 0x01, 0x42, 0x44, 0x00, 0xF0];
        raw[5] = 0x43; // flip one command byte
        let err = decode_frame(FrameKind::AtResponse, &raw).unwrap_err();
        assert!(matches!(err, FrameError::ChecksumMismatch { .. }));
    }

    #[test]
    fn frame_below_type_minimum_rejected() {
        // A valid envelope whose declared length cannot hold Receive's
        // fixed fields.
        let body = [0x90, 0x01, 0x02];
        let mut raw = vec![0x7E, 0x00, body.len() as u8];
        raw.extend_from_slice(&body);
        raw.push(crate::checksum::checksum(&body));

        let err = decode_frame(FrameKind::Receive, &raw).unwrap_err();
        assert!(matches!(
            err,
            FrameError::TooShort {
                type_byte: 0x90,
                length: 3,
                min: 12
            }
        ));
    }

    #[test]
    fn runt_span_rejected() {
        let err = decode_frame(FrameKind::ModemStatus, &[0x7E, 0x00]).unwrap_err();
        assert!(matches!(err, FrameError::LengthMismatch { .. }));
    }

    #[test]
    fn address_display_is_hex() {
        let addr = Address64([0x00, 0x13, 0xA2, 0x00, 0x40, 0x0A, 0x01, 0x27]);
        assert_eq!(addr.to_string(), "0013A200400A0127");
        assert_eq!(Address16::UNKNOWN.to_string(), "FFFE");
    }
}
