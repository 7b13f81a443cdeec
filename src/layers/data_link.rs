//! Data link layer: stamps a hardware address on each frame.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::envelope::{from_json, render, to_json, unhex};
use super::physical::PhysicalLayer;
use crate::core::{Layer, LayerKind, MacAddress, StackResult};

/// Data link envelope.
///
/// Wire form: `{"address":"AA:BB:CC:DD:EE:FF","payload":"<hex>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkFrame {
    /// Hardware address, carried as text and never validated.
    pub address: String,
    /// Hex-encoded payload from the network layer.
    pub payload: String,
}

/// Frames payloads with a hardware address.
#[derive(Debug, Clone)]
pub struct DataLinkLayer<L = PhysicalLayer> {
    hardware_address: MacAddress,
    lower: L,
}

impl<L: Layer> DataLinkLayer<L> {
    /// Create a data link layer on top of `lower`.
    pub fn new(hardware_address: MacAddress, lower: L) -> Self {
        Self {
            hardware_address,
            lower,
        }
    }

    /// The address stamped on outgoing frames.
    pub fn hardware_address(&self) -> MacAddress {
        self.hardware_address
    }

    /// The layer below.
    pub fn lower(&self) -> &L {
        &self.lower
    }
}

impl<L: Layer> Layer for DataLinkLayer<L> {
    const KIND: LayerKind = LayerKind::DataLink;

    fn encapsulate(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        to_json(
            Self::KIND,
            &LinkFrame {
                address: self.hardware_address.to_string(),
                payload: hex::encode(payload),
            },
        )
    }

    fn decapsulate(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        let frame: LinkFrame = from_json(Self::KIND, data)?;
        trace!(layer = %Self::KIND, address = %frame.address, "received frame");
        unhex(Self::KIND, &frame.payload)
    }

    fn encode(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        let framed = self.encapsulate(payload)?;
        debug!(layer = %Self::KIND, bytes = framed.len(), "framing data");
        trace!(layer = %Self::KIND, envelope = %render(&framed));
        self.lower.encode(&framed)
    }

    fn decode(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        let framed = self.lower.decode(data)?;
        let payload = self.decapsulate(&framed)?;
        debug!(layer = %Self::KIND, bytes = payload.len(), "unframed data");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StackError;

    fn layer() -> DataLinkLayer {
        DataLinkLayer::new(MacAddress::default(), PhysicalLayer)
    }

    #[test]
    fn test_round_trip() {
        let layer = layer();
        for payload in [&b""[..], &b"packet"[..], &[0u8, 1, 2, 254, 255][..]] {
            let wire = layer.encode(payload).unwrap();
            assert_eq!(layer.decode(&wire).unwrap(), payload);
            assert_eq!(
                layer.decapsulate(&layer.encapsulate(payload).unwrap()).unwrap(),
                payload
            );
        }
    }

    #[test]
    fn test_envelope_shape() {
        let envelope = layer().encapsulate(b"\x01\xabhi").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&envelope).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["address", "payload"]);
        assert_eq!(object["address"], "AA:BB:CC:DD:EE:FF");
        assert_eq!(object["payload"], hex::encode(b"\x01\xabhi"));
    }

    #[test]
    fn test_encode_reaches_physical() {
        let layer = layer();
        let wire = layer.encode(b"x").unwrap();
        let framed = PhysicalLayer.decode(&wire).unwrap();
        assert_eq!(framed, layer.encapsulate(b"x").unwrap());
    }

    #[test]
    fn test_address_not_checked_on_decode() {
        let foreign = br#"{"address":"not a mac","payload":"6869"}"#;
        assert_eq!(layer().decapsulate(foreign).unwrap(), b"hi");
    }

    #[test]
    fn test_malformed_frame() {
        let layer = layer();
        for bad in [
            &b"not json"[..],
            &br#"{"address":"x"}"#[..],
            &br#"{"payload":"00"}"#[..],
        ] {
            assert!(matches!(
                layer.decapsulate(bad),
                Err(StackError::MalformedEnvelope {
                    layer: LayerKind::DataLink,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_bad_payload_hex() {
        let bad = br#"{"address":"AA:BB:CC:DD:EE:FF","payload":"0g"}"#;
        assert!(matches!(
            layer().decapsulate(bad),
            Err(StackError::PayloadDecodeFailure {
                layer: LayerKind::DataLink,
                ..
            })
        ));
    }
}
