use std::io::{ErrorKind, Write};

use xbeelink_transport::{LinkConfig, SerialLink};

use crate::codec::Address16;
use crate::encode::{encode_at_command, encode_transmit, FrameIdSequence};
use crate::error::{FrameError, Result};
use crate::reader::transport_to_frame_error;

/// Writes API frames to any `Write` stream.
///
/// Owns the frame-id sequence for outgoing AT commands, so ids assigned
/// through one writer never collide.
pub struct FrameWriter<T> {
    inner: T,
    ids: FrameIdSequence,
}

impl<T: Write> FrameWriter<T> {
    /// Create a frame writer over a byte stream.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            ids: FrameIdSequence::new(),
        }
    }

    /// Encode and send a transmit request.
    pub fn send_transmit(
        &mut self,
        destination: &[u8],
        network: Option<Address16>,
        options: u8,
        payload: &[u8],
    ) -> Result<()> {
        let frame = encode_transmit(destination, network, options, payload)?;
        write_raw(&mut self.inner, &frame)
    }

    /// Encode and send an AT command. Returns the frame id assigned, for
    /// correlating the response frame.
    pub fn send_at_command(&mut self, command: &[u8], parameter: &[u8]) -> Result<u8> {
        let frame_id = self.ids.peek();
        let frame = encode_at_command(&mut self.ids, command, parameter)?;
        write_raw(&mut self.inner, &frame)?;
        Ok(frame_id)
    }

    /// Write pre-encoded frame bytes.
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        write_raw(&mut self.inner, frame)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameWriter<SerialLink> {
    /// Open a serial device and write frames to it.
    pub fn open(port: &str, baud: u32) -> Result<Self> {
        let link = SerialLink::open(port, baud).map_err(transport_to_frame_error)?;
        Ok(Self::new(link))
    }

    /// Open a serial device with explicit link configuration.
    pub fn open_with_config(port: &str, config: LinkConfig) -> Result<Self> {
        let link = SerialLink::open_with_config(port, config).map_err(transport_to_frame_error)?;
        Ok(Self::new(link))
    }
}

/// Write a complete byte span, handling short writes, then flush.
///
/// `Interrupted` and `WouldBlock` are retried; a zero-length write means
/// the stream is gone. Shared by the frame writer and the engine's
/// outbound drain.
pub fn write_raw<T: Write>(inner: &mut T, frame: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < frame.len() {
        match inner.write(&frame[offset..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }

    loop {
        match inner.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
}
