//! sf-core: shared foundation for signalflow.
//!
//! Contains:
//! - value (vector-valued signal samples + the known-value map)
//! - node (signal identifiers and the anonymous-name marker)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod node;
pub mod numeric;
pub mod value;

// Flat paths for the downstream crates
pub use error::{CoreError, CoreResult};
pub use node::{ANON_MARKER, Node};
pub use numeric::*;
pub use value::{SignalMap, Value};
