//! Text envelope helpers shared by the addressing and labelling layers.
//!
//! Those layers render their envelope as a JSON object whose `payload`
//! field holds the nested bytes as lowercase hex.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::{LayerKind, StackError, StackResult};

/// Serialize an envelope to JSON bytes.
pub(crate) fn to_json<T: Serialize>(layer: LayerKind, envelope: &T) -> StackResult<Vec<u8>> {
    serde_json::to_vec(envelope).map_err(|e| StackError::encode(layer, e))
}

/// Parse an envelope from JSON bytes.
///
/// Anything that is not exactly the expected object is malformed.
pub(crate) fn from_json<T: DeserializeOwned>(layer: LayerKind, data: &[u8]) -> StackResult<T> {
    serde_json::from_slice(data).map_err(|e| StackError::malformed(layer, e))
}

/// Decode the hex `payload` field of an envelope.
pub(crate) fn unhex(layer: LayerKind, payload: &str) -> StackResult<Vec<u8>> {
    hex::decode(payload).map_err(|e| StackError::payload(layer, e))
}

/// Lossy rendering of an envelope for trace output.
pub(crate) fn render(envelope: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        tag: String,
        payload: String,
    }

    #[test]
    fn test_json_round_trip() {
        let sample = Sample {
            tag: "x".into(),
            payload: "00ff".into(),
        };
        let bytes = to_json(LayerKind::Session, &sample).unwrap();
        let back: Sample = from_json(LayerKind::Session, &bytes).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_unknown_field_is_malformed() {
        let err = from_json::<Sample>(
            LayerKind::Session,
            br#"{"tag":"x","payload":"","extra":1}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StackError::MalformedEnvelope {
                layer: LayerKind::Session,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_hex_is_payload_failure() {
        assert!(matches!(
            unhex(LayerKind::Network, "abc"),
            Err(StackError::PayloadDecodeFailure { .. })
        ));
        assert!(matches!(
            unhex(LayerKind::Network, "zz"),
            Err(StackError::PayloadDecodeFailure { .. })
        ));
        assert_eq!(unhex(LayerKind::Network, "").unwrap(), Vec::<u8>::new());
    }
}
