use thiserror::Error;

/// Unified error type for the strata workspace.
#[derive(Error, Debug)]
pub enum StrataError {
    // ── Read errors ────────────────────────────────────────────
    #[error("missing option: {path}")]
    MissingOption { path: String },

    #[error("option {path} has an unexpected shape: {source}")]
    Deserialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // ── Path errors ────────────────────────────────────────────
    #[error("invalid option path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("option path '{path}' does not fit the stored value: {reason}")]
    PathConflict { path: String, reason: String },

    // ── Structure errors ───────────────────────────────────────
    #[error("expected an object: {0}")]
    NotAnObject(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StrataError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingOption { path: path.into() }
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn path_conflict(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PathConflict {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True if this is the read-miss error raised under `error_on_miss`.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingOption { .. })
    }
}

pub type Result<T> = std::result::Result<T, StrataError>;
