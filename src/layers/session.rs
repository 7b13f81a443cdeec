//! Session layer: tags payloads with the session state.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::envelope::{from_json, render, to_json, unhex};
use super::transport::TransportLayer;
use crate::core::{Layer, LayerKind, StackResult};

/// Session envelope.
///
/// Wire form: `{"session":"Active","payload":"<hex>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionRecord {
    /// Session state tag.
    pub session: String,
    /// Hex-encoded payload from the presentation layer.
    pub payload: String,
}

/// Tags payloads with a fixed session state. There is no session table.
#[derive(Debug, Clone)]
pub struct SessionLayer<L = TransportLayer> {
    state: String,
    lower: L,
}

impl<L: Layer> SessionLayer<L> {
    /// Create a session layer on top of `lower`.
    pub fn new(state: impl Into<String>, lower: L) -> Self {
        Self {
            state: state.into(),
            lower,
        }
    }

    /// The tag stamped on outgoing records.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// The layer below.
    pub fn lower(&self) -> &L {
        &self.lower
    }
}

impl<L: Layer> Layer for SessionLayer<L> {
    const KIND: LayerKind = LayerKind::Session;

    fn encapsulate(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        to_json(
            Self::KIND,
            &SessionRecord {
                session: self.state.clone(),
                payload: hex::encode(payload),
            },
        )
    }

    fn decapsulate(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        let record: SessionRecord = from_json(Self::KIND, data)?;
        trace!(layer = %Self::KIND, session = %record.session, "received session data");
        unhex(Self::KIND, &record.payload)
    }

    fn encode(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        let record = self.encapsulate(payload)?;
        debug!(layer = %Self::KIND, bytes = record.len(), "managing session");
        trace!(layer = %Self::KIND, envelope = %render(&record));
        self.lower.encode(&record)
    }

    fn decode(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        let record = self.lower.decode(data)?;
        let payload = self.decapsulate(&record)?;
        debug!(layer = %Self::KIND, bytes = payload.len(), "session data received");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{PhysicalLayer, TransportLayer};

    #[test]
    fn test_round_trip() {
        let layer = SessionLayer::new("Active", PhysicalLayer);
        for payload in [&b""[..], &b"\x80\x04presentation"[..]] {
            let wire = layer.encode(payload).unwrap();
            assert_eq!(layer.decode(&wire).unwrap(), payload);
        }
    }

    #[test]
    fn test_envelope_wire_form() {
        let envelope = SessionLayer::new("Active", PhysicalLayer)
            .encapsulate(b"\x00\xff")
            .unwrap();
        assert_eq!(envelope, br#"{"session":"Active","payload":"00ff"}"#);
    }

    #[test]
    fn test_state_tag_with_quotes_is_escaped() {
        let layer = SessionLayer::new(r#"Re"sumed"#, PhysicalLayer);
        let record: SessionRecord =
            serde_json::from_slice(&layer.encapsulate(b"x").unwrap()).unwrap();
        assert_eq!(record.session, r#"Re"sumed"#);
    }

    #[test]
    fn test_over_transport() {
        let layer = SessionLayer::new("Active", TransportLayer::new(3, PhysicalLayer));
        let wire = layer.encode(b"nested").unwrap();
        assert_eq!(layer.decode(&wire).unwrap(), b"nested");
        assert_eq!(layer.lower().sequence(), 3);
    }
}
