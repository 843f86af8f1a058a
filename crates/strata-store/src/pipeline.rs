use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// What a validator decided about a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Commit the value unchanged.
    Accept,
    /// Discard the write.
    Reject,
    /// Commit this value instead of the input.
    Replace(Value),
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok { Verdict::Accept } else { Verdict::Reject }
    }
}

/// Result of a single-key write into the options layer.
///
/// Only `Committed` changes the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Committed,
    /// The validator returned a rejecting verdict.
    Rejected,
    /// The validator itself failed; carries its error message.
    ValidatorFailed(String),
    /// Raw write for a key with neither a transformer nor a validator.
    Unregistered,
}

impl WriteOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, WriteOutcome::Committed)
    }
}

/// A validation rule for one option key.
pub trait Validate: Send + Sync {
    fn validate(&self, value: &Value) -> anyhow::Result<Verdict>;
}

impl<F> Validate for F
where
    F: Fn(&Value) -> anyhow::Result<Verdict> + Send + Sync,
{
    fn validate(&self, value: &Value) -> anyhow::Result<Verdict> {
        self(value)
    }
}

/// A registered validator.
pub struct Validator {
    rule: Box<dyn Validate>,
}

impl Validator {
    /// Wrap a rule with the full contract: accept, reject, replace, or fail.
    pub fn new(rule: impl Validate + 'static) -> Self {
        Self {
            rule: Box::new(rule),
        }
    }

    /// Boolean form: `true` commits the value, `false` discards it.
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::from_fn(move |value| Ok(Verdict::from(check(value))))
    }

    /// Closure form of [`Validator::new`].
    pub fn from_fn<F>(rule: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Verdict> + Send + Sync + 'static,
    {
        Self::new(rule)
    }

    /// Accept values that deserialize into `T`, committing `T`'s own
    /// serialized form.
    pub fn typed<T>() -> Self
    where
        T: DeserializeOwned + Serialize + 'static,
    {
        Self::new(TypedValidator::<T>::new())
    }

    pub fn validate(&self, value: &Value) -> anyhow::Result<Verdict> {
        self.rule.validate(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

/// Validates by round-tripping through a Rust type.
///
/// Values that do not deserialize are rejected. Values that do are replaced
/// by the type's serialized form, so serde defaults and normalization show
/// up in the committed value.
pub struct TypedValidator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedValidator<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TypedValidator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Validate for TypedValidator<T>
where
    T: DeserializeOwned + Serialize,
{
    fn validate(&self, value: &Value) -> anyhow::Result<Verdict> {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) => Ok(Verdict::Replace(serde_json::to_value(parsed)?)),
            Err(_) => Ok(Verdict::Reject),
        }
    }
}

type TransformFn = dyn Fn(Value) -> Value + Send + Sync;

/// Normalizes raw input for one option key before validation.
pub struct Transformer {
    transform: Box<TransformFn>,
}

impl Transformer {
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self {
            transform: Box::new(transform),
        }
    }

    pub fn apply(&self, raw: Value) -> Value {
        (self.transform)(raw)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer").finish_non_exhaustive()
    }
}
