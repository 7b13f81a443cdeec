//! Presentation layer: generic structured serialization.
//!
//! Unlike the text-envelope layers, this one carries a self-describing
//! [`Value`] in a tagged, length-prefixed binary encoding (bincode, fixed-width
//! integers). Every variant is written as a `u32` tag followed by its body;
//! strings, byte strings, lists and maps carry a `u64` length prefix.
//!
//! In the byte pipeline the payload travels as [`Value::Bytes`]. Any other
//! shape can be sent through [`PresentationLayer::encode_value`].

use std::collections::BTreeMap;

use bincode::Options;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::session::SessionLayer;
use crate::core::{Layer, LayerKind, MAX_PRESENTATION_SIZE, StackError, StackResult};

/// A dynamically shaped value the presentation layer can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Ordered sequence.
    List(Vec<Value>),
    /// String-keyed mapping.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_PRESENTATION_SIZE)
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Translates between values and their binary form.
#[derive(Debug, Clone)]
pub struct PresentationLayer<L = SessionLayer> {
    lower: L,
}

impl<L: Layer> PresentationLayer<L> {
    /// Create a presentation layer on top of `lower`.
    pub fn new(lower: L) -> Self {
        Self { lower }
    }

    /// The layer below.
    pub fn lower(&self) -> &L {
        &self.lower
    }

    /// Serialize a value to its binary form.
    pub fn serialize_value(&self, value: &Value) -> StackResult<Vec<u8>> {
        codec()
            .serialize(value)
            .map_err(|e| StackError::encode(LayerKind::Presentation, e))
    }

    /// Parse a binary form back into a value.
    pub fn deserialize_value(&self, blob: &[u8]) -> StackResult<Value> {
        codec()
            .deserialize(blob)
            .map_err(|e| StackError::payload(LayerKind::Presentation, e))
    }

    /// Serialize `value` and send it down the stack.
    pub fn encode_value(&self, value: &Value) -> StackResult<Vec<u8>> {
        let blob = self.serialize_value(value)?;
        debug!(layer = %LayerKind::Presentation, bytes = blob.len(), kind = value.kind(), "encoding data");
        trace!(layer = %LayerKind::Presentation, blob = %hex::encode(&blob));
        self.lower.encode(&blob)
    }

    /// Receive a blob from below and parse it into a value.
    pub fn decode_value(&self, data: &[u8]) -> StackResult<Value> {
        let blob = self.lower.decode(data)?;
        let value = self.deserialize_value(&blob)?;
        debug!(layer = %LayerKind::Presentation, kind = value.kind(), "decoded data");
        Ok(value)
    }
}

impl<L: Layer> Layer for PresentationLayer<L> {
    const KIND: LayerKind = LayerKind::Presentation;

    fn encapsulate(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        self.serialize_value(&Value::Bytes(payload.to_vec()))
    }

    fn decapsulate(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        match self.deserialize_value(data)? {
            Value::Bytes(bytes) => Ok(bytes),
            other => Err(StackError::malformed(
                Self::KIND,
                format!("expected bytes, found {}", other.kind()),
            )),
        }
    }

    fn encode(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
        let blob = self.encapsulate(payload)?;
        debug!(layer = %Self::KIND, bytes = blob.len(), "encoding data");
        trace!(layer = %Self::KIND, blob = %hex::encode(&blob));
        self.lower.encode(&blob)
    }

    fn decode(&self, data: &[u8]) -> StackResult<Vec<u8>> {
        let blob = self.lower.decode(data)?;
        let payload = self.decapsulate(&blob)?;
        debug!(layer = %Self::KIND, bytes = payload.len(), "decoded data");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::PhysicalLayer;

    fn layer() -> PresentationLayer<PhysicalLayer> {
        PresentationLayer::new(PhysicalLayer)
    }

    fn nested() -> Value {
        let mut inner = BTreeMap::new();
        inner.insert("port".to_string(), Value::Integer(8080));
        inner.insert("secure".to_string(), Value::Bool(false));

        let mut outer = BTreeMap::new();
        outer.insert("host".to_string(), Value::from("example.org"));
        outer.insert("options".to_string(), Value::Map(inner));
        outer.insert(
            "tags".to_string(),
            Value::List(vec![Value::from("a"), Value::Null, Value::Float(0.5)]),
        );
        Value::Map(outer)
    }

    #[test]
    fn test_bytes_round_trip() {
        let layer = layer();
        for payload in [&b""[..], &b"{\"protocol\":\"HTTP\"}"[..], &[0u8, 255, 128][..]] {
            let wire = layer.encode(payload).unwrap();
            assert_eq!(layer.decode(&wire).unwrap(), payload);
        }
    }

    #[test]
    fn test_value_round_trip() {
        let layer = layer();
        let values = [
            Value::Null,
            Value::Bool(true),
            Value::Integer(-42),
            Value::Integer(i64::MAX),
            Value::Float(3.25),
            Value::from("Hello, Network!"),
            Value::Bytes(vec![1, 2, 3]),
            Value::List(vec![]),
            nested(),
        ];
        for value in values {
            let wire = layer.encode_value(&value).unwrap();
            assert_eq!(layer.decode_value(&wire).unwrap(), value);
        }
    }

    #[test]
    fn test_tagged_layout() {
        let blob = layer().serialize_value(&Value::from("hi")).unwrap();
        // tag 4 (Text), u64 length 2, then the bytes
        assert_eq!(blob, [4, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, b'h', b'i']);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let layer = layer();
        let mut blob = layer.serialize_value(&Value::Integer(1)).unwrap();
        blob.push(0);
        assert!(matches!(
            layer.deserialize_value(&blob),
            Err(StackError::PayloadDecodeFailure {
                layer: LayerKind::Presentation,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let blob = [99, 0, 0, 0];
        assert!(layer().deserialize_value(&blob).unwrap_err().is_corruption());
    }

    #[test]
    fn test_oversized_length_rejected() {
        let mut blob = vec![5, 0, 0, 0];
        blob.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(layer().deserialize_value(&blob).is_err());
    }

    #[test]
    fn test_non_bytes_value_in_byte_pipeline() {
        let layer = layer();
        let blob = layer.serialize_value(&Value::Integer(7)).unwrap();
        assert!(matches!(
            layer.decapsulate(&blob),
            Err(StackError::MalformedEnvelope {
                layer: LayerKind::Presentation,
                ..
            })
        ));
    }
}
