//! PlayerIdentity - display name supplied once at session start
//!
//! Uses Arc<str> internally; every outbound one-shot message clones it.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Player display name.
///
/// Never empty: blank input falls back to [`PlayerIdentity::DEFAULT_NAME`].
/// Immutable once created.
///
/// # Examples
/// ```
/// use contracts::PlayerIdentity;
///
/// assert_eq!(PlayerIdentity::new("  Ada ").as_str(), "Ada");
/// assert_eq!(PlayerIdentity::new("").as_str(), PlayerIdentity::DEFAULT_NAME);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PlayerIdentity(Arc<str>);

impl PlayerIdentity {
    /// Name used when the user supplies none
    pub const DEFAULT_NAME: &'static str = "Player";

    /// Create an identity from user input, trimming whitespace
    pub fn new(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(Arc::from(trimmed))
        }
    }

    /// Create from optional input (e.g. an unset CLI flag)
    pub fn from_optional(name: Option<&str>) -> Self {
        name.map(Self::new).unwrap_or_default()
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the fallback name is in use
    pub fn is_default(&self) -> bool {
        self.as_str() == Self::DEFAULT_NAME
    }
}

impl Default for PlayerIdentity {
    fn default() -> Self {
        Self(Arc::from(Self::DEFAULT_NAME))
    }
}

impl Deref for PlayerIdentity {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for PlayerIdentity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlayerIdentity {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerIdentity({:?})", self.0)
    }
}

impl PartialEq<&str> for PlayerIdentity {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for PlayerIdentity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
