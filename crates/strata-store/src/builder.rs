use serde_json::Value;
use std::collections::HashMap;
use strata_core::{IntoOptionPath, OptionPath, Result};
use tracing::debug;

use crate::pipeline::{Transformer, Validator};
use crate::settings::StoreSettings;
use crate::store::{OptionStore, into_tree};

/// Collects everything an [`OptionStore`] is constructed with.
///
/// Validators and transformers can only be registered here; a built store
/// never changes its pipeline. Key and shape errors are reported by
/// [`build`](Self::build).
#[derive(Debug, Default)]
pub struct StoreBuilder {
    options: Option<Value>,
    defaults: Option<Value>,
    validators: Vec<(Result<OptionPath>, Validator)>,
    transformers: Vec<(Result<OptionPath>, Transformer)>,
    error_on_miss: bool,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial options layer. Must be an object.
    pub fn options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Initial defaults layer. Must be an object.
    pub fn defaults(mut self, defaults: Value) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Register a validator for one leaf key. A later registration for the
    /// same key replaces the earlier one.
    pub fn validator(mut self, key: impl IntoOptionPath, validator: Validator) -> Self {
        self.validators.push((key.into_option_path(), validator));
        self
    }

    /// Register a transformer for one leaf key.
    pub fn transformer(mut self, key: impl IntoOptionPath, transformer: Transformer) -> Self {
        self.transformers.push((key.into_option_path(), transformer));
        self
    }

    pub fn error_on_miss(mut self, enabled: bool) -> Self {
        self.error_on_miss = enabled;
        self
    }

    pub fn settings(mut self, settings: &StoreSettings) -> Self {
        self.error_on_miss = settings.error_on_miss;
        self
    }

    pub fn build(self) -> Result<OptionStore> {
        let options = match self.options {
            Some(value) => into_tree(value, "options")?,
            None => Default::default(),
        };
        let defaults = match self.defaults {
            Some(value) => into_tree(value, "defaults")?,
            None => Default::default(),
        };

        let mut validators = HashMap::with_capacity(self.validators.len());
        for (path, validator) in self.validators {
            validators.insert(path?, validator);
        }
        let mut transformers = HashMap::with_capacity(self.transformers.len());
        for (path, transformer) in self.transformers {
            transformers.insert(path?, transformer);
        }

        debug!(
            validators = validators.len(),
            transformers = transformers.len(),
            error_on_miss = self.error_on_miss,
            "option store built"
        );

        Ok(OptionStore::from_parts(
            options,
            defaults,
            validators,
            transformers,
            self.error_on_miss,
        ))
    }
}
