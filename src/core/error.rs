//! Error types for the protocol stack.

use std::io;

use thiserror::Error;

use super::layer::LayerKind;

/// Errors raised while looking up a local network address.
///
/// These are always recoverable: the network layer falls back to its
/// placeholder address instead of propagating them.
#[derive(Debug, Error)]
pub enum AddressLookupError {
    /// Socket creation, connect, or local address query failed.
    #[error("socket probe failed: {0}")]
    Io(#[from] io::Error),

    /// The OS reported the unspecified address (no route).
    #[error("no route: local endpoint is unspecified")]
    Unspecified,

    /// The provider has no address to give.
    #[error("address unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while moving a payload through the stack.
#[derive(Debug, Error)]
pub enum StackError {
    /// An envelope did not parse as the structure its layer expects.
    #[error("malformed {layer} envelope: {reason}")]
    MalformedEnvelope {
        /// Layer whose envelope was rejected.
        layer: LayerKind,
        /// Parser diagnostic.
        reason: String,
    },

    /// The envelope parsed but its payload could not be reconstructed.
    #[error("{layer} payload could not be reconstructed: {reason}")]
    PayloadDecodeFailure {
        /// Layer whose payload was rejected.
        layer: LayerKind,
        /// Decoder diagnostic.
        reason: String,
    },

    /// The outbound value could not be serialized.
    #[error("{layer} failed to encode payload: {reason}")]
    EncodeFailure {
        /// Layer that failed.
        layer: LayerKind,
        /// Serializer diagnostic.
        reason: String,
    },

    /// Address lookup failed and the caller asked for it directly.
    #[error("address lookup failed: {0}")]
    AddressLookup(#[from] AddressLookupError),
}

impl StackError {
    pub(crate) fn malformed(layer: LayerKind, reason: impl ToString) -> Self {
        Self::MalformedEnvelope {
            layer,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn payload(layer: LayerKind, reason: impl ToString) -> Self {
        Self::PayloadDecodeFailure {
            layer,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encode(layer: LayerKind, reason: impl ToString) -> Self {
        Self::EncodeFailure {
            layer,
            reason: reason.to_string(),
        }
    }

    /// Layer that raised the error, if any.
    pub fn layer(&self) -> Option<LayerKind> {
        match self {
            StackError::MalformedEnvelope { layer, .. }
            | StackError::PayloadDecodeFailure { layer, .. }
            | StackError::EncodeFailure { layer, .. } => Some(*layer),
            StackError::AddressLookup(_) => Some(LayerKind::Network),
        }
    }

    /// Check if this error means the received bytes were damaged or foreign.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            StackError::MalformedEnvelope { .. } | StackError::PayloadDecodeFailure { .. }
        )
    }
}

/// Result type for stack operations.
pub type StackResult<T> = Result<T, StackError>;
