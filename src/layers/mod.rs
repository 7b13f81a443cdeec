//! The seven layers.
//!
//! Each layer owns the layer below it, so the pipeline is a single nested
//! value whose type spells out the whole stack:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application   {protocol, request}      │  JSON
//! ├─────────────────────────────────────────┤
//! │  Presentation  tagged binary Value      │  bincode
//! ├─────────────────────────────────────────┤
//! │  Session       {session, payload}       │  JSON + hex
//! ├─────────────────────────────────────────┤
//! │  Transport     {sequence, payload}      │  JSON + hex
//! ├─────────────────────────────────────────┤
//! │  Network       {address, payload}       │  JSON + hex
//! ├─────────────────────────────────────────┤
//! │  Data Link     {address, payload}       │  JSON + hex
//! ├─────────────────────────────────────────┤
//! │  Physical      length | data | crc32    │  binary
//! └─────────────────────────────────────────┘
//! ```
//!
//! Every generic parameter defaults to the next layer down, so
//! `ApplicationLayer` on its own names the full stack. Tests can plug any
//! layer straight onto [`PhysicalLayer`] instead.

mod application;
mod data_link;
mod envelope;
mod finite;
mod network;
mod physical;
mod presentation;
mod session;
mod transport;

pub use application::{ApplicationLayer, Request};
pub use data_link::{DataLinkLayer, LinkFrame};
pub use network::{NetworkLayer, Packet};
pub use physical::PhysicalLayer;
pub use presentation::{PresentationLayer, Value};
pub use session::{SessionLayer, SessionRecord};
pub use transport::{Segment, TransportLayer};
