//! Serial transport layer for XBee API-mode links.
//!
//! Wraps a platform serial device behind [`SerialLink`], the `Read + Write`
//! stream the framing layer builds on. The codec and the engine are generic
//! over any `Read + Write`, so this crate is the only place that touches
//! real hardware.

pub mod error;
pub mod link;

pub use error::{Result, TransportError};
pub use link::{available_ports, LinkConfig, SerialLink};
