//! Core traits for the protocol stack.
//!
//! [`Layer`] is the capability every byte-level layer shares, and
//! [`AddressProvider`] is the seam between the network layer and the host.

use std::net::IpAddr;
use std::sync::Arc;

use super::error::{AddressLookupError, StackResult};
use super::layer::LayerKind;

/// One stage of the encapsulation pipeline.
///
/// A layer knows how to put its own envelope around a payload
/// ([`encapsulate`](Layer::encapsulate)) and take it off again
/// ([`decapsulate`](Layer::decapsulate)). [`encode`](Layer::encode) and
/// [`decode`](Layer::decode) run the whole pipeline from this layer down.
///
/// # Requirements
///
/// - `decapsulate(encapsulate(x)) == x` for every payload `x`
/// - `decode(encode(x)) == x` for every payload `x`
/// - Both directions are pure: same input, same output
///
/// # Example
///
/// ```ignore
/// struct Echo;
///
/// impl Layer for Echo {
///     const KIND: LayerKind = LayerKind::Physical;
///
///     fn encapsulate(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
///         Ok(payload.to_vec())
///     }
///
///     fn decapsulate(&self, data: &[u8]) -> StackResult<Vec<u8>> {
///         Ok(data.to_vec())
///     }
///
///     fn encode(&self, payload: &[u8]) -> StackResult<Vec<u8>> {
///         self.encapsulate(payload)
///     }
///
///     fn decode(&self, data: &[u8]) -> StackResult<Vec<u8>> {
///         self.decapsulate(data)
///     }
/// }
/// ```
pub trait Layer: Send + Sync {
    /// Which layer this is.
    const KIND: LayerKind;

    /// Wrap `payload` in this layer's envelope only.
    fn encapsulate(&self, payload: &[u8]) -> StackResult<Vec<u8>>;

    /// Remove this layer's envelope only.
    fn decapsulate(&self, data: &[u8]) -> StackResult<Vec<u8>>;

    /// Wrap `payload` and hand it to the layer below.
    fn encode(&self, payload: &[u8]) -> StackResult<Vec<u8>>;

    /// Ask the layer below for its payload, then unwrap it.
    fn decode(&self, data: &[u8]) -> StackResult<Vec<u8>>;
}

/// Source of the local network address stamped by the network layer.
///
/// Implementations may touch the host (see `UdpProbe`) but must not keep
/// any handle open between calls. Failures are never fatal to the stack.
pub trait AddressProvider: Send + Sync {
    /// Look up the local address.
    fn local_address(&self) -> Result<IpAddr, AddressLookupError>;
}

impl<P: AddressProvider + ?Sized> AddressProvider for Box<P> {
    fn local_address(&self) -> Result<IpAddr, AddressLookupError> {
        (**self).local_address()
    }
}

impl<P: AddressProvider + ?Sized> AddressProvider for Arc<P> {
    fn local_address(&self) -> Result<IpAddr, AddressLookupError> {
        (**self).local_address()
    }
}
