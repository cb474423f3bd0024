use std::io;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The decoder was invoked with a frame whose type byte does not match
    /// the expected kind. Reaching this through the registry indicates a
    /// dispatch bug.
    #[error("frame type mismatch (expected 0x{expected:02X}, got 0x{actual:02X})")]
    TypeMismatch { expected: u8, actual: u8 },

    /// The declared length field disagrees with the actual frame span.
    #[error("frame length mismatch (declared {declared}, actual {actual})")]
    LengthMismatch { declared: usize, actual: usize },

    /// The frame is shorter than the minimum its type's fixed fields need.
    #[error("frame too short for type 0x{type_byte:02X} (length {length}, min {min})")]
    TooShort {
        type_byte: u8,
        length: usize,
        min: usize,
    },

    /// The trailing checksum byte does not match the frame contents.
    #[error("checksum mismatch (expected 0x{expected:02X}, got 0x{actual:02X})")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// A well-delimited frame carries a type byte not in the registry.
    #[error("unsupported frame type 0x{0:02X}")]
    UnsupportedType(u8),

    /// A transmit destination address was not exactly 8 bytes.
    #[error("destination address must be 8 bytes (got {0})")]
    InvalidAddressLength(usize),

    /// An AT command name was not exactly 2 bytes.
    #[error("AT command must be 2 bytes (got {0})")]
    InvalidCommandLength(usize),

    /// The payload exceeds what the length field can represent.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
