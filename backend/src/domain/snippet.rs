//! Snippet data model.
//!
//! A snippet is a titled piece of text with a creation timestamp and an
//! expiry timestamp. It is *live* while the current time is strictly before
//! `expires`; every read path excludes snippets that are no longer live.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned snippet identifier.
///
/// Identifiers handed out by the store are always positive. Parsing through
/// [`FromStr`] enforces the same rule so request input can be rejected before
/// it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(i32);

/// Errors raised when parsing a [`SnippetId`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnippetIdError {
    /// The input was not an integer.
    #[error("snippet id must be an integer: {0}")]
    NotAnInteger(#[from] ParseIntError),
    /// The input was zero or negative.
    #[error("snippet id must be positive, got {0}")]
    NotPositive(i32),
}

impl SnippetId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Examples
    /// ```
    /// use snippetbox::domain::SnippetId;
    ///
    /// assert!(SnippetId::new(1).is_ok());
    /// assert!(SnippetId::new(0).is_err());
    /// ```
    pub fn new(raw: i32) -> Result<Self, SnippetIdError> {
        if raw < 1 {
            return Err(SnippetIdError::NotPositive(raw));
        }
        Ok(Self(raw))
    }

    /// Wrap an identifier read back from the store.
    pub(crate) const fn from_store(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl FromStr for SnippetId {
    type Err = SnippetIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.parse::<i32>()?)
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A snippet as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl Snippet {
    /// Whether the snippet is still visible at `now`.
    #[must_use]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires
    }
}

/// Input for inserting a snippet.
///
/// Retention is relative; the store turns it into an absolute expiry when the
/// row is written. Length and retention constraints are enforced by
/// [`crate::domain::SnippetForm`], not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub title: String,
    pub content: String,
    pub retention_days: u32,
}

impl NewSnippet {
    /// Build an insert request.
    pub fn new(title: impl Into<String>, content: impl Into<String>, retention_days: u32) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            retention_days,
        }
    }

    /// Placeholder snippet written when a create request carries no form data.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(
            "O snail",
            "O snail\nClimb Mount Fuji,\nBut slowly, slowly!\n\n– Kobayashi Issa",
            7,
        )
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Duration;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", 1)]
    #[case("42", 42)]
    #[case("2147483647", i32::MAX)]
    fn parses_positive_ids(#[case] input: &str, #[case] expected: i32) {
        let id: SnippetId = input.parse().expect("valid id");
        assert_eq!(id.get(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    fn rejects_non_positive_ids(#[case] input: &str) {
        let err = input.parse::<SnippetId>().expect_err("id must be rejected");
        assert!(matches!(err, SnippetIdError::NotPositive(_)));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1.5")]
    #[case("99999999999")]
    fn rejects_non_numeric_ids(#[case] input: &str) {
        let err = input.parse::<SnippetId>().expect_err("id must be rejected");
        assert!(matches!(err, SnippetIdError::NotAnInteger(_)));
    }

    #[rstest]
    fn liveness_is_strictly_before_expiry() {
        let created = Utc::now();
        let snippet = Snippet {
            id: SnippetId::from_store(1),
            title: "t".to_owned(),
            content: "c".to_owned(),
            created,
            expires: created + Duration::days(1),
        };

        assert!(snippet.is_live_at(created));
        assert!(!snippet.is_live_at(snippet.expires));
        assert!(!snippet.is_live_at(snippet.expires + Duration::seconds(1)));
    }

    #[rstest]
    fn placeholder_keeps_a_week() {
        let snippet = NewSnippet::placeholder();
        assert_eq!(snippet.title, "O snail");
        assert_eq!(snippet.retention_days, 7);
    }
}
