use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use xbeelink_transport::{LinkConfig, SerialLink};

use crate::codec::ApiFrame;
use crate::error::{FrameError, Result};
use crate::sync::next_frame;

/// Inbound buffer capacity; matches the engine's default.
const INBOUND_BUFFER_CAPACITY: usize = 256;
const READ_CHUNK_SIZE: usize = 64;

/// Reads complete, validated API frames from any `Read` stream.
///
/// Handles partial reads and stream noise internally — callers always get
/// whole decoded frames in arrival order.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Read> FrameReader<T> {
    /// Create a frame reader over a byte stream.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INBOUND_BUFFER_CAPACITY),
        }
    }

    /// Read the next frame (blocking).
    ///
    /// A validation failure surfaces as an error without desynchronizing
    /// the stream; the next call continues after the rejected frame.
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<ApiFrame> {
        loop {
            if let Some(result) = next_frame(&mut self.buf) {
                return result;
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameReader<SerialLink> {
    /// Open a serial device and read frames from it.
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

pub(crate) fn transport_to_frame_error(err: xbeelink_transport::TransportError) -> FrameError {
    match err {
        xbeelink_transport::TransportError::Io(io) => FrameError::Io(io),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
