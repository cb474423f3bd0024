//! XBee API-mode framing engine and serial toolkit.
//!
//! xbeelink turns the byte stream of a radio module's binary API mode into
//! discrete, checksum-validated frames and back — resynchronizing past
//! stream noise, dispatching decoded frames to callbacks, and queueing
//! structured sends.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial link abstraction over `serialport`
//! - [`frame`] — Checksummed, length-prefixed API-mode framing (the core)
//! - [`engine`] — Background processing loop and handler dispatch (behind
//!   the `engine` feature)

/// Re-export transport types.
pub mod transport {
    pub use xbeelink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use xbeelink_frame::*;
}

/// Re-export engine types (requires `engine` feature).
#[cfg(feature = "engine")]
pub mod engine {
    pub use xbeelink_engine::*;
}
