//! Frame encoders.
//!
//! Encoders return the fully formed wire bytes and never touch an outbound
//! buffer; queueing is the engine's job. That keeps encode and decode
//! testable in isolation.

use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::checksum;
use crate::codec::{Address16, FrameKind, FRAME_DELIMITER, HEADER_SIZE, MAX_FRAME_LENGTH};
use crate::error::{FrameError, Result};

/// Broadcast radius byte for transmit frames: 0 = maximum hops.
const BROADCAST_RADIUS_MAX: u8 = 0x00;

/// Frame id carried by transmit frames: 0 requests no transmit status.
const TRANSMIT_NO_STATUS: u8 = 0x00;

/// Fixed body bytes of a transmit frame: type, frame id, addr64, addr16,
/// radius, options.
const TRANSMIT_FIXED_LENGTH: usize = 14;

/// Fixed body bytes of an AT command frame: type, frame id, command.
const AT_COMMAND_FIXED_LENGTH: usize = 4;

/// Sequence of frame ids for outgoing command frames.
///
/// Starts at 1 and advances (wrapping modulo 256) after each AT command
/// encode, so responses can be correlated with the requests that caused
/// them.
#[derive(Debug, Clone)]
pub struct FrameIdSequence {
    next: u8,
}

impl FrameIdSequence {
    /// A fresh sequence, starting at 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// A sequence starting at an explicit id.
    pub fn starting_at(id: u8) -> Self {
        Self { next: id }
    }

    /// The id the next AT command encode will use.
    pub fn peek(&self) -> u8 {
        self.next
    }

    fn advance(&mut self) -> u8 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

impl Default for FrameIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a transmit request frame.
///
/// `destination` must be exactly 8 bytes. A missing `network` address is
/// encoded as the unknown-address sentinel `0xFFFE`. The frame id is always
/// 0 — no transmit-status frame is requested; this mirrors the module's
/// fire-and-forget default rather than omitting a feature.
pub fn encode_transmit(
    destination: &[u8],
    network: Option<Address16>,
    options: u8,
    payload: &[u8],
) -> Result<Bytes> {
    if destination.len() != 8 {
        return Err(FrameError::InvalidAddressLength(destination.len()));
    }
    if TRANSMIT_FIXED_LENGTH + payload.len() > MAX_FRAME_LENGTH {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_FRAME_LENGTH - TRANSMIT_FIXED_LENGTH,
        });
    }
    let network = network.unwrap_or(Address16::UNKNOWN);

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + TRANSMIT_FIXED_LENGTH + payload.len() + 1);
    buf.put_u8(FRAME_DELIMITER);
    buf.put_u16(0); // length, patched by seal
    buf.put_u8(FrameKind::Transmit.type_byte());
    buf.put_u8(TRANSMIT_NO_STATUS);
    buf.put_slice(destination);
    buf.put_slice(&network.0);
    buf.put_u8(BROADCAST_RADIUS_MAX);
    buf.put_u8(options);
    buf.put_slice(payload);
    Ok(seal(buf))
}

/// Encode a local AT command frame.
///
/// `command` must be exactly 2 bytes (the two-letter command name). Takes
/// the next id from `ids`, advancing the sequence.
pub fn encode_at_command(
    ids: &mut FrameIdSequence,
    command: &[u8],
    parameter: &[u8],
) -> Result<Bytes> {
    if command.len() != 2 {
        return Err(FrameError::InvalidCommandLength(command.len()));
    }
    if AT_COMMAND_FIXED_LENGTH + parameter.len() > MAX_FRAME_LENGTH {
        return Err(FrameError::PayloadTooLarge {
            size: parameter.len(),
            max: MAX_FRAME_LENGTH - AT_COMMAND_FIXED_LENGTH,
        });
    }
    let frame_id = ids.advance();

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + AT_COMMAND_FIXED_LENGTH + parameter.len() + 1);
    buf.put_u8(FRAME_DELIMITER);
    buf.put_u16(0); // length, patched by seal
    buf.put_u8(FrameKind::AtCommand.type_byte());
    buf.put_u8(frame_id);
    buf.put_slice(command);
    buf.put_slice(parameter);
    Ok(seal(buf))
}

/// Back-patch the length field and append the checksum over the body.
fn seal(mut buf: BytesMut) -> Bytes {
    let length = (buf.len() - HEADER_SIZE) as u16;
    buf[1..HEADER_SIZE].copy_from_slice(&length.to_be_bytes());
    let sum = checksum(&buf[HEADER_SIZE..]);
    buf.put_u8(sum);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_frame, ApiFrame, Address64};

    #[test]
    fn at_command_wire_bytes() {
        let mut ids = FrameIdSequence::new();
        let frame = encode_at_command(&mut ids, b"NJ", &[]).unwrap();
        assert_eq!(
            frame.as_ref(),
            &[0x7E, 0x00, 0x04, 0x08, 0x01, 0x4E, 0x4A, 0x5E]
        );
        assert_eq!(ids.peek(), 2);
    }

    #[test]
    fn at_command_round_trips() {
        let mut ids = FrameIdSequence::new();
        let frame = encode_at_command(&mut ids, b"NJ", &[]).unwrap();
        let decoded = decode_frame(FrameKind::AtCommand, &frame).unwrap();
        match decoded {
            ApiFrame::AtCommand(command) => {
                assert_eq!(command.frame_id, 1);
                assert_eq!(&command.command, b"NJ");
                assert!(command.parameter.is_empty());
            }
            other => panic!("expected AtCommand, got {other:?}"),
        }
    }

    #[test]
    fn at_command_with_parameter_round_trips() {
        let mut ids = FrameIdSequence::new();
        let frame = encode_at_command(&mut ids, b"ID", &[0x33, 0x32]).unwrap();
        let decoded = decode_frame(FrameKind::AtCommand, &frame).unwrap();
        match decoded {
            ApiFrame::AtCommand(command) => {
                assert_eq!(&command.command, b"ID");
                assert_eq!(command.parameter.as_ref(), &[0x33, 0x32]);
            }
            other => panic!("expected AtCommand, got {other:?}"),
        }
    }

    #[test]
    fn frame_ids_advance_and_wrap() {
        let mut ids = FrameIdSequence::new();
        for expected in 1..=3u8 {
            let frame = encode_at_command(&mut ids, b"NJ", &[]).unwrap();
            assert_eq!(frame[4], expected);
        }

        let mut ids = FrameIdSequence::starting_at(0xFF);
        let frame = encode_at_command(&mut ids, b"NJ", &[]).unwrap();
        assert_eq!(frame[4], 0xFF);
        assert_eq!(ids.peek(), 0x00);
    }

    #[test]
    fn transmit_wire_bytes() {
        let destination = [0x00, 0x13, 0xA2, 0x00, 0x40, 0x0A, 0x01, 0x27];
        let frame = encode_transmit(&destination, None, 0x00, b"TxData0A").unwrap();

        let expected = [
            0x7E, 0x00, 0x16, 0x10, 0x00, 0x00, 0x13, 0xA2, 0x00, 0x40, 0x0A, 0x01, 0x27, 0xFF,
            0xFE, 0x00, 0x00, 0x54, 0x78, 0x44, 0x61, 0x74, 0x61, 0x30, 0x41, 0x14,
        ];
        assert_eq!(frame.as_ref(), &expected);
    }

    #[test]
    fn transmit_round_trips() {
        let destination = [0x00, 0x13, 0xA2, 0x00, 0x40, 0x0A, 0x01, 0x27];
        let network = Address16([0x7D, 0x84]);
        let frame = encode_transmit(&destination, Some(network), 0x01, b"payload").unwrap();

        let decoded = decode_frame(FrameKind::Transmit, &frame).unwrap();
        match decoded {
            ApiFrame::Transmit(transmit) => {
                assert_eq!(transmit.frame_id, 0);
                assert_eq!(transmit.destination, Address64(destination));
                assert_eq!(transmit.network, network);
                assert_eq!(transmit.broadcast_radius, 0);
                assert_eq!(transmit.options, 0x01);
                assert_eq!(transmit.payload.as_ref(), b"payload");
            }
            other => panic!("expected Transmit, got {other:?}"),
        }
    }

    #[test]
    fn transmit_defaults_to_unknown_network_address() {
        let destination = [0u8; 8];
        let frame = encode_transmit(&destination, None, 0x00, &[]).unwrap();
        assert_eq!(&frame[13..15], &[0xFF, 0xFE]);
    }

    #[test]
    fn transmit_rejects_bad_address_length() {
        let err = encode_transmit(&[0x01, 0x02, 0x03], None, 0x00, &[]).unwrap_err();
        assert!(matches!(err, FrameError::InvalidAddressLength(3)));
    }

    #[test]
    fn at_command_rejects_bad_command_length() {
        let mut ids = FrameIdSequence::new();
        let err = encode_at_command(&mut ids, b"NJX", &[]).unwrap_err();
        assert!(matches!(err, FrameError::InvalidCommandLength(3)));
        // A rejected encode must not consume a frame id.
        assert_eq!(ids.peek(), 1);
    }

    #[test]
    fn encoded_checksum_validates() {
        let destination = [0x00, 0x13, 0xA2, 0x00, 0x40, 0x0A, 0x01, 0x27];
        let frame = encode_transmit(&destination, None, 0x00, b"abc").unwrap();
        let body = &frame[HEADER_SIZE..frame.len() - 1];
        assert_eq!(checksum(body), frame[frame.len() - 1]);
    }
}
