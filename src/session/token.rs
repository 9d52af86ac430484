//! Opaque session token type.

use std::fmt;
use std::str::FromStr;

/// Prefix carried by tokens issued by [`SessionToken::generate`].
const PREFIX: &str = "sess_";

/// Number of characters shown when a token is displayed.
const VISIBLE: usize = 8;

/// Opaque bearer token identifying a stored session.
///
/// The full value is only reachable through [`SessionToken::as_str`];
/// `Display` and `Debug` print only the first few characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Issue a new random token.
    pub fn generate() -> Self {
        Self(format!("{PREFIX}{}", uuid::Uuid::new_v4().simple()))
    }

    /// Wrap an existing token value.
    ///
    /// Returns `None` for empty values or values containing characters
    /// that cannot appear in a cookie or header token.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let valid = !value.is_empty()
            && value
                .bytes()
                .all(|b| b.is_ascii_graphic() && b != b';' && b != b',' && b != b'"');
        valid.then_some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn shortened(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(VISIBLE)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}…", self.shortened())
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({}…)", self.shortened())
    }
}

impl FromStr for SessionToken {
    type Err = InvalidToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or(InvalidToken)
    }
}

/// Returned when a string is not a usable token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidToken;

impl fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid session token")
    }
}

impl std::error::Error for InvalidToken {}
