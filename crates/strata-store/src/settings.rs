use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Environment variable overriding [`StoreSettings::error_on_miss`].
pub const ENV_ERROR_ON_MISS: &str = "STRATA_ERROR_ON_MISS";

/// Store behavior that is fixed at construction.
///
/// Deserializable from whatever source the host application already uses
/// for its own configuration; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Fail reads of keys absent from both layers instead of returning `None`.
    pub error_on_miss: bool,
}

impl StoreSettings {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().apply_env_overrides()
    }

    /// Apply env var overrides (STRATA_ERROR_ON_MISS) by handing the process
    /// environment to [`apply_overrides`](Self::apply_overrides).
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup`, which maps a variable name to
    /// its value. Unparseable values are ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_ERROR_ON_MISS) {
            match parse_flag(&raw) {
                Some(flag) => {
                    debug!(var = ENV_ERROR_ON_MISS, value = flag, "settings override applied");
                    self.error_on_miss = flag;
                }
                None => {
                    warn!(var = ENV_ERROR_ON_MISS, value = %raw, "ignoring unparseable boolean override");
                }
            }
        }
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
