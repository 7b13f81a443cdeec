//! Application layer: the public entry point of the stack.
//!
//! Wraps a caller value in an HTTP-like request envelope,
//! `{"protocol":"HTTP","request":<value>}`, and hands the JSON down to the
//! presentation layer.

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, trace};

use super::envelope::{from_json, render};
use super::finite;
use super::presentation::PresentationLayer;
use crate::core::{Layer, LayerKind, StackError, StackResult};

/// Application envelope as received.
///
/// The request stays as a JSON tree until the caller names its type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Request {
    /// Protocol tag, carried and never validated.
    pub protocol: String,
    /// The caller's value.
    pub request: serde_json::Value,
}

/// Borrowed form of [`Request`] used on the send path.
struct OutboundRequest<'a, T: ?Sized> {
    protocol: &'a str,
    request: &'a T,
}

impl<T: Serialize + ?Sized> Serialize for OutboundRequest<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Request", 2)?;
        state.serialize_field("protocol", self.protocol)?;
        state.serialize_field("request", self.request)?;
        state.end()
    }
}

/// Builds request envelopes around caller values.
#[derive(Debug, Clone)]
pub struct ApplicationLayer<L = PresentationLayer> {
    protocol: String,
    lower: L,
}

impl<L: Layer> ApplicationLayer<L> {
    /// Which layer this is.
    pub const KIND: LayerKind = LayerKind::Application;

    /// Create an application layer on top of `lower`.
    pub fn new(protocol: impl Into<String>, lower: L) -> Self {
        Self {
            protocol: protocol.into(),
            lower,
        }
    }

    /// The protocol tag stamped on outgoing requests.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// The layer below.
    pub fn lower(&self) -> &L {
        &self.lower
    }

    /// Wrap `value` in a request envelope without descending the stack.
    ///
    /// Values holding a `NaN` or infinite float are refused: JSON would
    /// carry them as `null`.
    pub fn encapsulate<T: Serialize + ?Sized>(&self, value: &T) -> StackResult<Vec<u8>> {
        finite::check(value).map_err(|e| StackError::encode(Self::KIND, e))?;
        let request = OutboundRequest {
            protocol: &self.protocol,
            request: value,
        };
        serde_json::to_vec(&request).map_err(|e| StackError::encode(Self::KIND, e))
    }

    /// Unwrap a request envelope without descending the stack.
    pub fn decapsulate<T: DeserializeOwned>(&self, data: &[u8]) -> StackResult<T> {
        let envelope: Request = from_json(Self::KIND, data)?;
        trace!(layer = %Self::KIND, protocol = %envelope.protocol, "received request");
        serde_json::from_value(envelope.request).map_err(|e| StackError::payload(Self::KIND, e))
    }

    /// Send `value` through the whole stack.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> StackResult<Vec<u8>> {
        let request = self.encapsulate(value)?;
        debug!(layer = %Self::KIND, bytes = request.len(), "sending request");
        trace!(layer = %Self::KIND, envelope = %render(&request));
        self.lower.encode(&request)
    }

    /// Receive bytes from the bottom of the stack and recover the value.
    pub fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> StackResult<T> {
        let request = self.lower.decode(data)?;
        let value = self.decapsulate(&request)?;
        debug!(layer = %Self::KIND, bytes = request.len(), "received request");
        Ok(value)
    }
}
