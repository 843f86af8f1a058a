//! # strata-store
//!
//! A two-layer option store. Reads fall through from the explicitly set
//! **options** layer to the **defaults** layer; writes of raw input pass
//! through per-key transformers and validators before they are committed.
//!
//! Keys are dotted paths (`"db.host"`) addressing arbitrarily nested values.

pub mod builder;
pub mod pipeline;
pub mod settings;
pub mod store;

pub use builder::StoreBuilder;
pub use pipeline::{Transformer, TypedValidator, Validate, Validator, Verdict, WriteOutcome};
pub use settings::StoreSettings;
pub use store::OptionStore;

pub use strata_core::{IntoOptionPath, OptionPath, Result, StrataError};
pub use strata_nested::Tree;
