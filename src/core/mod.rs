//! Core traits, types, and constants.
//!
//! Everything the layers share: identities, errors, configuration and the
//! two trait seams.

mod config;
mod constants;
mod error;
mod hardware;
mod layer;
mod traits;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use hardware::*;
pub use layer::*;
pub use traits::*;
