//! Network layer: stamps the local network address on each packet.
//!
//! The address comes from an injected [`AddressProvider`]. A failed lookup
//! is logged and replaced by the configured placeholder; it never fails the
//! send.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::data_link::DataLinkLayer;
use super::envelope::{from_json, render, to_json, unhex};
use crate::address::StaticAddress;
use crate::core::{AddressProvider, FALLBACK_NETWORK_ADDRESS, Layer, LayerKind, StackResult};

/// Network envelope.
///
/// Wire form: `{"address":"192.168.1.1","payload":"<hex>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Packet {
    /// Source address, carried as text and never validated.
    pub address: String,
    /// Hex-encoded payload from the transport layer.
    pub payload: String,
}

/// Routes payloads by wrapping them with a source address.
#[derive(Clone)]
pub struct NetworkLayer<L = DataLinkLayer> {
    provider: Arc<dyn AddressProvider>,
    fallback: IpAddr,
    lower: L,
}

impl<L: fmt::Debug> fmt::Debug for NetworkLayer<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkLayer")
            .field("fallback", &self.fallback)
            .field("lower", &self.lower)
            .finish_non_exhaustive()
    }
}

impl<L: Layer> NetworkLayer<L> {
    /// Create a network layer on top of `lower`.
    pub fn new(provider: Arc<dyn AddressProvider>, fallback: IpAddr, lower: L) -> Self {
        Self {
            provider,
            fallback,
            lower,
        }
    }

    /// Create a network layer that always stamps `address`.
    pub fn with_static_address(address: IpAddr, lower: L) -> Self {
        Self::new(Arc::new(StaticAddress(address)), FALLBACK_NETWORK_ADDRESS, lower)
    }

    /// The placeholder used when the provider fails.
    pub fn fallback_address(&self) -> IpAddr {
        self.fallback
    }

    /// Resolve the source address for the next packet.
    pub fn source_address(&self) -> IpAddr {
        match self.provider.local_address() {
            Ok(address) => address,
            Err(err) => {
                warn!(error = %err, fallback = %self.fallback, "address lookup failed, using placeholder");
                self.fallback
            }
        }
    }

    /// The layer below.
    pub fn lower(&self) -> &L {
        &self.lower
    }
}

impl<L: Layer> Layer for NetworkLayer<L> {
    const KIND: LayerKind = LayerKind::Network;

    fn encapsulate(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        to_json(
            Self::KIND,
            &Packet {
                address: self.source_address().to_string(),
                payload: hex::encode(payload),
            },
        )
    }

    fn decapsulate(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        let packet: Packet = from_json(Self::KIND, data)?;
        trace!(layer = %Self::KIND, address = %packet.address, "received packet");
        unhex(Self::KIND, &packet.payload)
    }

    fn encode(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        let packet = self.encapsulate(payload)?;
        debug!(layer = %Self::KIND, bytes = packet.len(), "routing data");
        trace!(layer = %Self::KIND, envelope = %render(&packet));
        self.lower.encode(&packet)
    }

    fn decode(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        let packet = self.lower.decode(data)?;
        let payload = self.decapsulate(&packet)?;
        debug!(layer = %Self::KIND, bytes = payload.len(), "unrouted data");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Offline;
    use crate::core::{AddressLookupError, StackError};
    use crate::layers::PhysicalLayer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn address_of(envelope: &[u8]) -> String {
        let packet: Packet = serde_json::from_slice(envelope).unwrap();
        packet.address
    }

    #[test]
    fn test_round_trip() {
        let layer = NetworkLayer::with_static_address("10.0.0.2".parse().unwrap(), PhysicalLayer);
        for payload in [&b""[..], &b"segment"[..], &[0xde, 0xad, 0xbe, 0xef][..]] {
            let wire = layer.encode(payload).unwrap();
            assert_eq!(layer.decode(&wire).unwrap(), payload);
        }
    }

    #[test]
    fn test_provider_address_is_stamped() {
        let layer = NetworkLayer::with_static_address("10.0.0.2".parse().unwrap(), PhysicalLayer);
        let envelope = layer.encapsulate(b"abc").unwrap();
        assert_eq!(address_of(&envelope), "10.0.0.2");
    }

    #[test]
    fn test_fallback_on_provider_failure() {
        let fallback: IpAddr = "192.168.1.1".parse().unwrap();
        let layer = NetworkLayer::new(Arc::new(Offline), fallback, PhysicalLayer);

        let envelope = layer.encapsulate(b"abc").unwrap();
        assert_eq!(address_of(&envelope), "192.168.1.1");

        let wire = layer.encode(b"abc").unwrap();
        assert_eq!(layer.decode(&wire).unwrap(), b"abc");
    }

    #[test]
    fn test_provider_consulted_per_packet() {
        struct Counting(AtomicUsize);

        impl AddressProvider for Counting {
            fn local_address(&self) -> std::result::Result<IpAddr, AddressLookupError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Err(AddressLookupError::Unspecified)
            }
        }

        let provider = Arc::new(Counting(AtomicUsize::new(0)));
        let layer = NetworkLayer::new(provider.clone(), FALLBACK_NETWORK_ADDRESS, PhysicalLayer);
        layer.encode(b"one").unwrap();
        layer.encode(b"two").unwrap();
        assert_eq!(provider.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_deterministic_output() {
        let layer = NetworkLayer::with_static_address("10.9.8.7".parse().unwrap(), PhysicalLayer);
        assert_eq!(layer.encode(b"same").unwrap(), layer.encode(b"same").unwrap());
    }

    #[test]
    fn test_decode_rejects_link_frame_shape() {
        let layer = NetworkLayer::with_static_address(FALLBACK_NETWORK_ADDRESS, PhysicalLayer);
        let foreign = br#"{"address":"1.2.3.4","payload":"00","MAC":"x"}"#;
        assert!(matches!(
            layer.decapsulate(foreign),
            Err(StackError::MalformedEnvelope {
                layer: LayerKind::Network,
                ..
            })
        ));
    }
}
