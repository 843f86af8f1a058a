//! # strata-core
//!
//! Shared vocabulary for the strata workspace: option paths and the
//! error type every other crate reports through.

pub mod error;
pub mod path;

pub use error::{Result, StrataError};
pub use path::{IntoOptionPath, OptionPath, SEPARATOR};
