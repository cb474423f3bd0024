//! Human-readable decodes for status bytes carried in received frames.
//!
//! Pure lookups; unknown codes get an "Unknown" description rather than an
//! error.

/// Describe a modem status byte.
pub fn modem_status_description(status: u8) -> &'static str {
    match status {
        0x00 => "Hardware reset",
        0x01 => "Watchdog timer reset",
        0x02 => "Joined network",
        0x03 => "Disassociated",
        0x06 => "Coordinator started",
        0x07 => "Network security key was updated",
        0x0D => "Voltage supply limit exceeded",
        0x11 => "Modem configuration changed while join in progress",
        _ => "Unknown modem status",
    }
}

/// Describe the delivery status byte of a transmit status frame.
pub fn delivery_status_description(status: u8) -> &'static str {
    match status {
        0x00 => "Success",
        0x01 => "MAC ACK failure",
        0x02 => "CCA failure",
        0x15 => "Invalid destination endpoint",
        0x21 => "Network ACK failure",
        0x22 => "Not joined to network",
        0x23 => "Self-addressed",
        0x24 => "Address not found",
        0x25 => "Route not found",
        0x26 => "Broadcast source failed to hear a neighbor relay the message",
        0x2B => "Invalid binding table index",
        0x2C => "Resource error: lack of free buffers, timers, etc.",
        0x2D => "Attempted broadcast with APS transmission",
        0x2E => "Attempted unicast with APS transmission, but EE=0",
        0x32 => "Resource error: lack of free buffers, timers, etc.",
        0x74 => "Data payload too large",
        _ => "Unknown delivery status",
    }
}

/// Describe the route discovery status byte of a transmit status frame.
pub fn discovery_status_description(status: u8) -> &'static str {
    match status {
        0x00 => "No discovery overhead",
        0x01 => "Address discovery",
        0x02 => "Route discovery",
        0x03 => "Address and route discovery",
        0x40 => "Extended timeout discovery",
        _ => "Unknown discovery status",
    }
}

/// Receive options bit: packet was acknowledged.
pub const RECEIVE_ACKNOWLEDGED: u8 = 0x01;
/// Receive options bit: packet was a broadcast.
pub const RECEIVE_BROADCAST: u8 = 0x02;
/// Receive options bit: packet was APS-encrypted.
pub const RECEIVE_APS_ENCRYPTED: u8 = 0x20;
/// Receive options bit: packet came from an end device.
pub const RECEIVE_FROM_END_DEVICE: u8 = 0x40;

/// Describe the set bits of a receive options byte.
pub fn receive_options_description(options: u8) -> String {
    let mut parts = Vec::new();
    if options & RECEIVE_ACKNOWLEDGED != 0 {
        parts.push("acknowledged");
    }
    if options & RECEIVE_BROADCAST != 0 {
        parts.push("broadcast");
    }
    if options & RECEIVE_APS_ENCRYPTED != 0 {
        parts.push("APS-encrypted");
    }
    if options & RECEIVE_FROM_END_DEVICE != 0 {
        parts.push("from end device");
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}
