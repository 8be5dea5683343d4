//! Secret handling and persistent key/value storage.
//!
//! [`Secret`] keeps access tokens out of logs and serialized output;
//! [`store`] persists them, along with other small values, between runs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

/// A secret value that is redacted in logs and debug output.
///
/// # Example
///
/// ```rust
/// use tokensync_common_secret::Secret;
///
/// let token = Secret::new("ghp_abc123".to_string());
/// assert_eq!(format!("{}", token), "[REDACTED]");
/// assert_eq!(format!("{:?}", token), "Secret([REDACTED])");
/// assert_eq!(token.expose(), "ghp_abc123");
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret<T: Zeroize>(T);

impl<T: Zeroize> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the secret value.
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T: Zeroize> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED])")
    }
}

impl<T: Zeroize + PartialEq> PartialEq for Secret<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<'de, T: Zeroize + Deserialize<'de>> Deserialize<'de> for Secret<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Secret::new)
    }
}

// Serialized form is always redacted.
impl<T: Zeroize + Serialize> Serialize for Secret<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        "[REDACTED]".serialize(serializer)
    }
}

/// Type alias for a secret string.
pub type SecretString = Secret<String>;

impl SecretString {
    /// Whether the secret is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Secret::new(value)
    }
}

static GITHUB_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(gh[pousr]_[A-Za-z0-9]{20,}|github_pat_[A-Za-z0-9_]{20,})\b")
        .expect("valid regex")
});

/// Recognizes and masks access tokens.
pub struct TokenRedactor;

impl TokenRedactor {
    /// Whether the whole string has the shape of a GitHub access token.
    pub fn looks_like_github_token(s: &str) -> bool {
        GITHUB_TOKEN
            .find(s.trim())
            .map(|m| m.as_str().len() == s.trim().len())
            .unwrap_or(false)
    }

    /// Show only the last four characters of a token.
    pub fn mask(token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() <= 8 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }

    /// Replace anything that looks like an access token.
    pub fn redact(s: &str) -> String {
        GITHUB_TOKEN.replace_all(s, "[TOKEN]").into_owned()
    }
}
