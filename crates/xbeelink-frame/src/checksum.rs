//! API-mode checksum: `0xFF` minus the wrapping 8-bit sum of the span.

/// Compute the checksum over `data` — the bytes from the frame type byte
/// through the end of the body. Pure; a valid frame's body plus its checksum
/// byte always sums to `0xFF`.
pub fn checksum(data: &[u8]) -> u8 {
    0xFFu8.wrapping_sub(data.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte)))
}
