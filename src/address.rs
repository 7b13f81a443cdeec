//! Address providers for the network layer.
//!
//! - [`StaticAddress`]: a fixed address, for tests and deterministic output
//! - [`Offline`]: always fails, exercising the placeholder fallback
//! - [`UdpProbe`]: asks the OS which local address routes to a reference host

use std::net::IpAddr;
#[cfg(feature = "probe")]
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use crate::core::{AddressLookupError, AddressProvider};
#[cfg(feature = "probe")]
use crate::core::DEFAULT_PROBE_TARGET;

/// Provider that always returns the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAddress(pub IpAddr);

impl AddressProvider for StaticAddress {
    fn local_address(&self) -> Result<IpAddr, AddressLookupError> {
        Ok(self.0)
    }
}

/// Provider for hosts with no network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl AddressProvider for Offline {
    fn local_address(&self) -> Result<IpAddr, AddressLookupError> {
        Err(AddressLookupError::Unavailable("offline".to_string()))
    }
}

/// Discovers the outbound local address with a throwaway UDP socket.
///
/// `connect` on a UDP socket only selects a route; no datagram leaves the
/// host. The socket lives for the duration of one lookup and is closed on
/// every return path.
#[cfg(feature = "probe")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpProbe {
    target: SocketAddr,
}

#[cfg(feature = "probe")]
impl Default for UdpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TARGET)
    }
}

#[cfg(feature = "probe")]
impl UdpProbe {
    /// Create a probe routed towards `target`.
    pub fn new(target: SocketAddr) -> Self {
        Self { target }
    }

    /// The reference host.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    fn bind_addr(&self) -> SocketAddr {
        match self.target {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        }
    }
}

#[cfg(feature = "probe")]
impl AddressProvider for UdpProbe {
    fn local_address(&self) -> Result<IpAddr, AddressLookupError> {
        let socket = UdpSocket::bind(self.bind_addr())?;
        socket.connect(self.target)?;
        let local = socket.local_addr()?.ip();
        drop(socket);

        if local.is_unspecified() {
            return Err(AddressLookupError::Unspecified);
        }
        tracing::trace!(target_addr = %self.target, %local, "probed local address");
        Ok(local)
    }
}
