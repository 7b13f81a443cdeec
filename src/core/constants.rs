//! Default envelope metadata and frame constants.
//!
//! Every value here is only a default; [`StackConfig`](super::StackConfig)
//! carries the values a stack is actually built with.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};

// =============================================================================
// APPLICATION / SESSION / TRANSPORT METADATA
// =============================================================================

/// Protocol tag attached by the application layer.
pub const DEFAULT_PROTOCOL: &str = "HTTP";

/// Session state tag attached by the session layer.
pub const DEFAULT_SESSION_STATE: &str = "Active";

/// Sequence label attached by the transport layer.
pub const DEFAULT_SEQUENCE: u32 = 1;

// =============================================================================
// ADDRESSING
// =============================================================================

/// Simulated hardware address used by the data link layer.
pub const DEFAULT_HARDWARE_ADDRESS: [u8; 6] = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];

/// Placeholder network address used when no provider answers.
pub const FALLBACK_NETWORK_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));

/// Reference host the UDP probe "connects" to. Nothing is ever sent.
pub const DEFAULT_PROBE_TARGET: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(8, 8, 8, 8), 80));

// =============================================================================
// PHYSICAL FRAME
// =============================================================================

/// Size of the big-endian length prefix.
pub const FRAME_LENGTH_SIZE: usize = 4;

/// Size of the CRC-32 trailer.
pub const FRAME_CHECK_SIZE: usize = 4;

/// Per-frame overhead (length prefix + checksum).
pub const FRAME_OVERHEAD: usize = FRAME_LENGTH_SIZE + FRAME_CHECK_SIZE;

// =============================================================================
// PRESENTATION
// =============================================================================

/// Upper bound on a presentation blob, in bytes.
///
/// Keeps a hostile length prefix from asking the decoder for gigabytes.
pub const MAX_PRESENTATION_SIZE: u64 = 64 * 1024 * 1024;
