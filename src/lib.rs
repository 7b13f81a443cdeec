//! # osi-stack
//!
//! A didactic seven-layer protocol stack. A value sent through it is wrapped
//! once per layer on the way down and unwrapped in reverse order on the way
//! up:
//!
//! Application → Presentation → Session → Transport → Network → Data Link → Physical
//!
//! Nothing leaves the process. The point is the encapsulation pipeline
//! itself: the fixed layer order, each layer's envelope, and the guarantee
//! that decoding exactly reverses encoding.
//!
//! ## Feature Flags
//!
//! - `probe` (default): [`address::UdpProbe`], the system address provider
//! - `demo` (default): the `osi-demo` walk-through binary
//!
//! ## Modules
//!
//! - [`core`]: traits, errors, configuration and constants
//! - [`layers`]: the seven layers
//! - [`address`]: address providers for the network layer
//! - [`stack`]: assembly and the `send`/`receive` surface
//!
//! ## Example Usage
//!
//! ```rust
//! use osi_stack::prelude::*;
//!
//! let stack = ProtocolStack::builder()
//!     .address_provider(StaticAddress("10.0.0.1".parse().unwrap()))
//!     .build();
//!
//! let wire = stack.send("Hello, Network!")?;
//! let back: String = stack.receive(&wire)?;
//! assert_eq!(back, "Hello, Network!");
//! # Ok::<(), osi_stack::StackError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod address;
pub mod core;
pub mod layers;
pub mod stack;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::address::{Offline, StaticAddress};
    #[cfg(feature = "probe")]
    pub use crate::address::UdpProbe;
    pub use crate::core::*;
    pub use crate::layers::*;
    pub use crate::stack::{ProtocolStack, Stack, StackBuilder};
}

// Re-export commonly used items at crate root
pub use crate::core::{
    AddressLookupError, AddressProvider, Layer, LayerKind, StackConfig, StackError, StackResult,
};
pub use stack::{ProtocolStack, StackBuilder};
