use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StrataError};

/// Separator between segments of a dotted option key.
pub const SEPARATOR: char = '.';

/// A parsed option key: an ordered, non-empty list of property names, one
/// per nesting level.
///
/// Dotted strings are split exactly once, at the API boundary. Empty keys and
/// empty segments (`"a..b"`, `".a"`, `"a."`) are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionPath {
    segments: Vec<String>,
}

impl OptionPath {
    /// Parse a dotted key such as `"db.host"`.
    pub fn parse(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(StrataError::invalid_path(key, "key is empty"));
        }
        let segments: Vec<String> = key.split(SEPARATOR).map(String::from).collect();
        if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
            return Err(StrataError::invalid_path(
                key,
                format!("segment {} is empty", pos + 1),
            ));
        }
        Ok(Self { segments })
    }

    /// Build a path from already-split segments.
    ///
    /// Each segment must be non-empty and must not contain the separator.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(StrataError::invalid_path("", "path has no segments"));
        }
        for segment in &segments {
            check_segment(&segments, segment)?;
        }
        Ok(Self { segments })
    }

    /// Path consisting of a single top-level key.
    pub fn key(segment: impl Into<String>) -> Result<Self> {
        Self::from_segments([segment.into()])
    }

    /// Extend this path by one level.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self> {
        let segment = segment.into();
        check_segment(&self.segments, &segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of nesting levels addressed by this path.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// The top-level key.
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    /// The property name at the deepest level.
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// The path one level up, or `None` for a top-level key.
    pub fn parent(&self) -> Option<Self> {
        if self.is_nested() {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        } else {
            None
        }
    }

    /// Split into the intermediate segments and the final one.
    pub fn split_leaf(&self) -> (&[String], &str) {
        let last = self.segments.len() - 1;
        (&self.segments[..last], self.segments[last].as_str())
    }
}

fn check_segment(segments: &[String], segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(StrataError::invalid_path(
            segments.join("."),
            "segment is empty",
        ));
    }
    if segment.contains(SEPARATOR) {
        return Err(StrataError::invalid_path(
            segments.join("."),
            format!("segment '{}' contains '{}'", segment, SEPARATOR),
        ));
    }
    Ok(())
}

impl fmt::Display for OptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for OptionPath {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for OptionPath {
    type Error = StrataError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for OptionPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OptionPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Anything that can name an option: dotted strings or parsed paths.
pub trait IntoOptionPath {
    fn into_option_path(self) -> Result<OptionPath>;
}

impl IntoOptionPath for OptionPath {
    fn into_option_path(self) -> Result<OptionPath> {
        Ok(self)
    }
}

impl IntoOptionPath for &OptionPath {
    fn into_option_path(self) -> Result<OptionPath> {
        Ok(self.clone())
    }
}

impl IntoOptionPath for &str {
    fn into_option_path(self) -> Result<OptionPath> {
        OptionPath::parse(self)
    }
}

impl IntoOptionPath for String {
    fn into_option_path(self) -> Result<OptionPath> {
        OptionPath::parse(&self)
    }
}

impl IntoOptionPath for &String {
    fn into_option_path(self) -> Result<OptionPath> {
        OptionPath::parse(self)
    }
}
