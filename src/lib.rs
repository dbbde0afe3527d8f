//! Codec for an unreliable datagram segment (RFC 768 style).
//!
//! The crate owns the segment's structured representation, its fixed
//! 8-byte-header wire format and the one's-complement checksum over it.
//! Socket I/O, delivery and retry policy belong to the transport layer
//! embedding this crate.

pub mod checksum;
pub mod udp_segment;

pub use udp_segment::udp_segment::{UdpSegment, HEADER_SIZE, MAX_PAYLOAD};

use std::fmt;

/// Errors reported by the segment codec.
///
/// A checksum mismatch is deliberately not an error: a corrupted but
/// parseable segment still decodes, and reports through
/// `UdpSegment::is_valid()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RudpError {
    /// Output buffer cannot hold the serialized segment.
    BufError(&'static str),
    /// Fewer than the 8 header bytes were supplied to the decoder.
    TruncatedHeader { have: usize },
    /// The header's length field disagrees with the bytes actually present.
    LengthMismatch { declared: u16, actual: usize },
    /// Payload larger than `MAX_PAYLOAD`.
    PayloadTooLarge { len: usize },
}

impl fmt::Display for RudpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RudpError::BufError(msg) => write!(f, "buffer error: {}", msg),
            RudpError::TruncatedHeader { have } => {
                write!(f, "truncated header: got {} of {} bytes", have, HEADER_SIZE)
            }
            RudpError::LengthMismatch { declared, actual } => {
                write!(f, "length field declares {} bytes, {} present", declared, actual)
            }
            RudpError::PayloadTooLarge { len } => {
                write!(f, "payload of {} bytes exceeds the {}-byte maximum", len, MAX_PAYLOAD)
            }
        }
    }
}

impl std::error::Error for RudpError {}
