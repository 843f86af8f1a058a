use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use strata_core::{IntoOptionPath, OptionPath, Result, StrataError};
use strata_nested::{self as nested, Tree};
use tracing::{debug, trace};

use crate::builder::StoreBuilder;
use crate::pipeline::{Transformer, Validator, Verdict, WriteOutcome};

/// The layered option store.
///
/// Holds two independent nested structures, the explicitly set **options**
/// and the fallback **defaults**, plus the per-key validators and
/// transformers applied to writes into the options layer.
///
/// Reads resolve options first, then defaults. Writes never touch the other
/// layer.
#[derive(Debug, Default)]
pub struct OptionStore {
    options: Tree,
    defaults: Tree,
    validators: HashMap<OptionPath, Validator>,
    transformers: HashMap<OptionPath, Transformer>,
    error_on_miss: bool,
}

impl OptionStore {
    /// An empty store that returns `None` on read misses.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub(crate) fn from_parts(
        options: Tree,
        defaults: Tree,
        validators: HashMap<OptionPath, Validator>,
        transformers: HashMap<OptionPath, Transformer>,
        error_on_miss: bool,
    ) -> Self {
        Self {
            options,
            defaults,
            validators,
            transformers,
            error_on_miss,
        }
    }

    pub fn error_on_miss(&self) -> bool {
        self.error_on_miss
    }

    /// The options layer as-is.
    pub fn options(&self) -> &Tree {
        &self.options
    }

    /// The defaults layer as-is.
    pub fn defaults(&self) -> &Tree {
        &self.defaults
    }

    pub fn has_validator(&self, key: impl IntoOptionPath) -> Result<bool> {
        Ok(self.validators.contains_key(&key.into_option_path()?))
    }

    pub fn has_transformer(&self, key: impl IntoOptionPath) -> Result<bool> {
        Ok(self.transformers.contains_key(&key.into_option_path()?))
    }

    // ── Options: writes ────────────────────────────────────────

    /// Write a validated value into the options layer.
    ///
    /// Without a validator for `key` the value is committed as-is. With one,
    /// the verdict decides: accept commits the value, replace commits the
    /// validator's data, reject or a validator error leaves the store
    /// untouched. Validator errors never reach the caller.
    ///
    /// A committed value whose path cannot be placed in the stored structure
    /// (a non-index segment on an array, or an index past its end) fails with
    /// [`StrataError::PathConflict`] and nothing is written.
    pub fn set(&mut self, key: impl IntoOptionPath, value: Value) -> Result<WriteOutcome> {
        let path = key.into_option_path()?;
        self.set_path(&path, value)
    }

    /// Write several keys, one independent [`set`](Self::set) per entry in
    /// iteration order. A rejected key does not undo earlier ones.
    ///
    /// All keys are parsed before anything is written; a malformed key fails
    /// the whole call with no writes. A path conflict stops the call at that
    /// key and earlier writes stay.
    pub fn set_all<I, K>(&mut self, values: I) -> Result<Vec<(OptionPath, WriteOutcome)>>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: IntoOptionPath,
    {
        let entries = parse_entries(values)?;
        entries
            .into_iter()
            .map(|(path, value)| {
                let outcome = self.set_path(&path, value)?;
                Ok((path, outcome))
            })
            .collect()
    }

    /// Write every leaf of a nested object through [`set`](Self::set).
    pub fn merge(&mut self, value: Value) -> Result<Vec<(OptionPath, WriteOutcome)>> {
        let tree = into_tree(value, "merge input")?;
        let leaves = nested::flatten(&tree)?;
        self.set_all(leaves)
    }

    /// Write possibly unvalidated input.
    ///
    /// A registered transformer normalizes the input first and the result
    /// goes through [`set`](Self::set), so validation still applies. Without
    /// a transformer the input goes to `set` unchanged, but only if a
    /// validator is registered. Keys with neither are dropped.
    pub fn set_raw(&mut self, key: impl IntoOptionPath, raw: Value) -> Result<WriteOutcome> {
        let path = key.into_option_path()?;
        self.set_raw_path(&path, raw)
    }

    /// Object form of [`set_raw`](Self::set_raw), same rules as
    /// [`set_all`](Self::set_all).
    pub fn set_raw_all<I, K>(&mut self, values: I) -> Result<Vec<(OptionPath, WriteOutcome)>>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: IntoOptionPath,
    {
        let entries = parse_entries(values)?;
        entries
            .into_iter()
            .map(|(path, raw)| {
                let outcome = self.set_raw_path(&path, raw)?;
                Ok((path, outcome))
            })
            .collect()
    }

    fn set_path(&mut self, path: &OptionPath, value: Value) -> Result<WriteOutcome> {
        let value = match self.validators.get(path) {
            None => value,
            Some(validator) => match validator.validate(&value) {
                Ok(Verdict::Accept) => value,
                Ok(Verdict::Replace(data)) => data,
                Ok(Verdict::Reject) => {
                    debug!(path = %path, "validator rejected value, write discarded");
                    return Ok(WriteOutcome::Rejected);
                }
                Err(e) => {
                    debug!(path = %path, error = %e, "validator failed, write discarded");
                    return Ok(WriteOutcome::ValidatorFailed(e.to_string()));
                }
            },
        };
        nested::set(&mut self.options, path, value)?;
        trace!(path = %path, "option committed");
        Ok(WriteOutcome::Committed)
    }

    fn set_raw_path(&mut self, path: &OptionPath, raw: Value) -> Result<WriteOutcome> {
        if let Some(transformer) = self.transformers.get(path) {
            let value = transformer.apply(raw);
            return self.set_path(path, value);
        }
        if self.validators.contains_key(path) {
            return self.set_path(path, raw);
        }
        debug!(path = %path, "no transformer or validator registered, raw write dropped");
        Ok(WriteOutcome::Unregistered)
    }

    // ── Options: reads ─────────────────────────────────────────

    /// True if `key` is set in the options layer. Defaults are not consulted.
    pub fn has(&self, key: impl IntoOptionPath) -> Result<bool> {
        Ok(nested::has(&self.options, &key.into_option_path()?))
    }

    /// Resolve `key`: options first, then defaults.
    ///
    /// A key absent from both layers yields `Ok(None)`, or
    /// [`StrataError::MissingOption`] when the store was built with
    /// `error_on_miss`.
    pub fn get(&self, key: impl IntoOptionPath) -> Result<Option<&Value>> {
        let path = key.into_option_path()?;
        if let Some(value) = nested::get(&self.options, &path) {
            return Ok(Some(value));
        }
        if let Some(value) = nested::get(&self.defaults, &path) {
            return Ok(Some(value));
        }
        if self.error_on_miss {
            return Err(StrataError::missing(path.to_string()));
        }
        Ok(None)
    }

    /// Resolve `key` and deserialize it into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: impl IntoOptionPath) -> Result<Option<T>> {
        let path = key.into_option_path()?;
        let Some(value) = self.get(&path)? else {
            return Ok(None);
        };
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| StrataError::Deserialize {
                path: path.to_string(),
                source,
            })
    }

    /// Merged view of both layers, resolved per top-level key.
    ///
    /// Covers the union of top-level keys (defaults first, then keys only
    /// present in options). A top-level key set in options wins as a whole;
    /// nested objects are not deep-merged.
    pub fn get_all(&self) -> Tree {
        let mut merged = Tree::new();
        for key in self.defaults.keys().chain(self.options.keys()) {
            if merged.contains_key(key) {
                continue;
            }
            if let Some(value) = self.options.get(key).or_else(|| self.defaults.get(key)) {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Deserialize the merged view into `T`. A shape mismatch is reported as
    /// [`StrataError::Deserialize`] with an empty path, meaning the root.
    pub fn snapshot<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.get_all())).map_err(|source| {
            StrataError::Deserialize {
                path: String::new(),
                source,
            }
        })
    }

    // ── Options: resets ────────────────────────────────────────

    /// Clear the options layer.
    pub fn reset(&mut self) {
        self.options = Tree::new();
        debug!("options reset");
    }

    /// Remove `key` from the options layer. Absent keys are a no-op.
    pub fn reset_path(&mut self, key: impl IntoOptionPath) -> Result<()> {
        let path = key.into_option_path()?;
        if nested::remove(&mut self.options, &path).is_some() {
            debug!(path = %path, "option reset");
        }
        Ok(())
    }

    /// Remove several keys from the options layer. All keys are parsed
    /// before anything is removed.
    pub fn reset_paths<I, K>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: IntoOptionPath,
    {
        for path in parse_keys(keys)? {
            self.reset_path(path)?;
        }
        Ok(())
    }

    // ── Defaults ───────────────────────────────────────────────

    /// Write a default. Defaults bypass validators and transformers.
    pub fn set_default(&mut self, key: impl IntoOptionPath, value: Value) -> Result<()> {
        let path = key.into_option_path()?;
        nested::set(&mut self.defaults, &path, value)?;
        trace!(path = %path, "default committed");
        Ok(())
    }

    /// Object form of [`set_default`](Self::set_default). All keys are parsed
    /// before anything is written.
    pub fn set_defaults<I, K>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: IntoOptionPath,
    {
        for (path, value) in parse_entries(values)? {
            nested::set(&mut self.defaults, &path, value)?;
        }
        Ok(())
    }

    /// Replace the defaults layer with the serialized form of `defaults`.
    pub fn load_defaults<T: Serialize>(&mut self, defaults: &T) -> Result<()> {
        let value = serde_json::to_value(defaults)?;
        self.defaults = into_tree(value, "defaults")?;
        debug!(keys = self.defaults.len(), "defaults loaded");
        Ok(())
    }

    pub fn has_default(&self, key: impl IntoOptionPath) -> Result<bool> {
        Ok(nested::has(&self.defaults, &key.into_option_path()?))
    }

    /// Look up `key` in the defaults layer only. Never fails on a miss.
    pub fn get_default(&self, key: impl IntoOptionPath) -> Result<Option<&Value>> {
        Ok(nested::get(&self.defaults, &key.into_option_path()?))
    }

    /// Clear the defaults layer.
    pub fn reset_defaults(&mut self) {
        self.defaults = Tree::new();
        debug!("defaults reset");
    }

    pub fn reset_default(&mut self, key: impl IntoOptionPath) -> Result<()> {
        let path = key.into_option_path()?;
        if nested::remove(&mut self.defaults, &path).is_some() {
            debug!(path = %path, "default reset");
        }
        Ok(())
    }

    pub fn reset_default_paths<I, K>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: IntoOptionPath,
    {
        for path in parse_keys(keys)? {
            self.reset_default(path)?;
        }
        Ok(())
    }
}

fn parse_entries<I, K>(values: I) -> Result<Vec<(OptionPath, Value)>>
where
    I: IntoIterator<Item = (K, Value)>,
    K: IntoOptionPath,
{
    values
        .into_iter()
        .map(|(key, value)| Ok((key.into_option_path()?, value)))
        .collect()
}

fn parse_keys<I, K>(keys: I) -> Result<Vec<OptionPath>>
where
    I: IntoIterator<Item = K>,
    K: IntoOptionPath,
{
    keys.into_iter().map(IntoOptionPath::into_option_path).collect()
}

pub(crate) fn into_tree(value: Value, what: &str) -> Result<Tree> {
    match value {
        Value::Object(tree) => Ok(tree),
        other => Err(StrataError::NotAnObject(format!(
            "{} must be an object, got {}",
            what,
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
