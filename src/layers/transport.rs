//! Transport layer: labels each segment with a sequence number.
//!
//! The number is a label only; nothing is reordered or retransmitted.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::envelope::{from_json, render, to_json, unhex};
use super::network::NetworkLayer;
use crate::core::{Layer, LayerKind, StackResult};

/// Transport envelope.
///
/// Wire form: `{"sequence":1,"payload":"<hex>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Segment {
    /// Sequence label.
    pub sequence: u32,
    /// Hex-encoded payload from the session layer.
    pub payload: String,
}

/// Wraps payloads in sequenced segments.
#[derive(Debug, Clone)]
pub struct TransportLayer<L = NetworkLayer> {
    sequence: u32,
    lower: L,
}

impl<L: Layer> TransportLayer<L> {
    /// Create a transport layer on top of `lower`.
    pub fn new(sequence: u32, lower: L) -> Self {
        Self { sequence, lower }
    }

    /// The label stamped on outgoing segments.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The layer below.
    pub fn lower(&self) -> &L {
        &self.lower
    }
}

impl<L: Layer> Layer for TransportLayer<L> {
    const KIND: LayerKind = LayerKind::Transport;

    fn encapsulate(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        to_json(
            Self::KIND,
            &Segment {
                sequence: self.sequence,
                payload: hex::encode(payload),
            },
        )
    }

    fn decapsulate(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        let segment: Segment = from_json(Self::KIND, data)?;
        trace!(layer = %Self::KIND, sequence = segment.sequence, "received segment");
        unhex(Self::KIND, &segment.payload)
    }

    fn encode(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        let segment = self.encapsulate(payload)?;
        debug!(layer = %Self::KIND, bytes = segment.len(), sequence = self.sequence, "segmenting data");
        trace!(layer = %Self::KIND, envelope = %render(&segment));
        self.lower.encode(&segment)
    }

    fn decode(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        let segment = self.lower.decode(data)?;
        let payload = self.decapsulate(&segment)?;
        debug!(layer = %Self::KIND, bytes = payload.len(), "reassembled segment");
        Ok(payload)
    }
}
