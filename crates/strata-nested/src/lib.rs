//! # strata-nested
//!
//! Structural navigation over nested option maps, addressed by
//! [`OptionPath`](strata_core::OptionPath). Knows nothing about layers,
//! validation or defaults; the store builds those on top.

pub mod access;
pub mod flatten;

pub use access::{get, get_mut, has, remove, set};
pub use flatten::flatten;

/// A nested option structure: a map of property names to values, where
/// object values are the next nesting level.
pub type Tree = serde_json::Map<String, serde_json::Value>;
