//! Form validation helpers.
//!
//! [`FormErrors`] collects messages per field during a validation pass; the
//! rendering layer asks it for the first message of each field.
//! [`SnippetForm`] is the create-snippet form and validates itself into a
//! [`NewSnippet`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::snippet::NewSnippet;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Retention periods, in days, the create form accepts.
pub const PERMITTED_RETENTION_DAYS: [u32; 3] = [1, 7, 365];

/// Validation messages keyed by form field name.
///
/// Messages for one field keep their insertion order. Nothing is deduplicated.
///
/// # Examples
/// ```
/// use snippetbox::domain::FormErrors;
///
/// let mut errors = FormErrors::default();
/// errors.add("title", "required");
/// errors.add("title", "too short");
/// assert_eq!(errors.get("title"), "required");
/// assert_eq!(errors.get("missing"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(HashMap<String, Vec<String>>);

impl FormErrors {
    /// Append a message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// First message recorded for `field`, or an empty string.
    #[must_use]
    pub fn get(&self, field: &str) -> &str {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map_or("", String::as_str)
    }

    /// True when no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields carrying at least one message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First message per field, for templates.
    #[must_use]
    pub fn first_messages(&self) -> HashMap<&str, &str> {
        self.0
            .keys()
            .map(|field| (field.as_str(), self.get(field)))
            .collect()
    }
}

/// Raw create-snippet form as submitted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnippetForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
}

impl SnippetForm {
    /// True when the submission carried none of the form fields.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.expires.is_none()
    }

    /// Validate the submission.
    ///
    /// # Errors
    /// Returns every failed rule, keyed by field name.
    ///
    /// # Examples
    /// ```
    /// use snippetbox::domain::SnippetForm;
    ///
    /// let form = SnippetForm {
    ///     title: Some("Haiku".to_owned()),
    ///     content: Some("An old silent pond".to_owned()),
    ///     expires: Some("7".to_owned()),
    /// };
    /// let snippet = form.validate().expect("form is valid");
    /// assert_eq!(snippet.retention_days, 7);
    /// ```
    pub fn validate(&self) -> Result<NewSnippet, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.as_deref().unwrap_or_default();
        if title.trim().is_empty() {
            errors.add("title", "This field cannot be blank");
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.add(
                "title",
                format!("This field is too long (maximum is {TITLE_MAX_CHARS} characters)"),
            );
        }

        let content = self.content.as_deref().unwrap_or_default();
        if content.trim().is_empty() {
            errors.add("content", "This field cannot be blank");
        }

        let retention_days = self
            .expires
            .as_deref()
            .map(str::trim)
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|days| PERMITTED_RETENTION_DAYS.contains(days));
        if retention_days.is_none() {
            errors.add("expires", "This field is invalid");
        }

        match retention_days {
            Some(days) if errors.is_empty() => Ok(NewSnippet::new(title, content, days)),
            _ => Err(errors),
        }
    }
}
