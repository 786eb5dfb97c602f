//! Declarative validation of submitted field data.
//!
//! A [`Form`] wraps the submitted [`FormData`] and accumulates violations in
//! [`FormErrors`] as rules are applied. Rules never short-circuit: every rule
//! runs, and each erroring field keeps all of its messages with the first
//! one used for display.
//!
//! # Examples
//!
//! ```
//! use bookings::forms::{Form, FormData};
//!
//! let data: FormData = [("first_name", "Al"), ("email", "al@example")]
//!     .into_iter()
//!     .collect();
//!
//! let mut form = Form::new(data);
//! form.required(&["first_name", "last_name", "email"]);
//! form.min_length("first_name", 3);
//! form.is_email("email");
//!
//! assert!(!form.valid());
//! assert_eq!(form.errors().get("last_name"), Some("This field cannot be blank"));
//! assert!(form.errors().get("first_name").is_some());
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod proptests;

const BLANK_MESSAGE: &str = "This field cannot be blank";
const EMAIL_MESSAGE: &str = "Invalid email address";

// Local part per RFC 5322 atext plus dots; domain of dot-separated labels
// with at least one dot.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Returns `true` if `value` is a syntactically valid email address.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    value.len() <= 254 && email_regex().is_match(value)
}

/// Submitted field data: each field name maps to one or more values.
///
/// Only the first value of a field is consulted by the rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, Vec<String>>);

impl FormData {
    /// Creates empty form data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to `field`.
    pub fn add(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(value.into());
    }

    /// First value of `field`, if submitted.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns `true` if nothing was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (field, value) in iter {
            data.add(field, value);
        }
        data
    }
}

/// Violations recorded per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Records a message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// First message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Every message recorded for `field`, oldest first.
    #[must_use]
    pub fn all(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Names of the fields that have errors, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of fields with at least one error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Submitted data plus the violations found so far.
#[derive(Debug, Clone, Default)]
pub struct Form {
    data: FormData,
    errors: FormErrors,
}

impl Form {
    /// Wraps submitted data with an empty error set.
    #[must_use]
    pub fn new(data: FormData) -> Self {
        Self {
            data,
            errors: FormErrors::default(),
        }
    }

    /// Value of `field`, or `""` when absent.
    #[must_use]
    pub fn get(&self, field: &str) -> &str {
        self.data.get(field).unwrap_or("")
    }

    /// Presence check; records nothing.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Records a blank-field error for each field that is absent or
    /// whitespace only.
    pub fn required(&mut self, fields: &[&str]) {
        for field in fields {
            if self.get(field).trim().is_empty() {
                self.errors.add(*field, BLANK_MESSAGE);
            }
        }
    }

    /// Records an error if `field`, ignoring surrounding whitespace, has
    /// fewer than `min` characters.
    ///
    /// Returns whether the rule passed.
    pub fn min_length(&mut self, field: &str, min: usize) -> bool {
        if self.get(field).trim().chars().count() < min {
            self.errors.add(
                field,
                format!("This field must be at least {min} characters long"),
            );
            return false;
        }
        true
    }

    /// Records an error if `field`, ignoring surrounding whitespace, is not a
    /// valid email address.
    ///
    /// Returns whether the rule passed.
    pub fn is_email(&mut self, field: &str) -> bool {
        if !is_valid_email(self.get(field).trim()) {
            self.errors.add(field, EMAIL_MESSAGE);
            return false;
        }
        true
    }

    /// `true` iff no rule has recorded an error.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors recorded so far.
    #[must_use]
    pub const fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// The submitted data.
    #[must_use]
    pub const fn data(&self) -> &FormData {
        &self.data
    }

    /// Consumes the form, returning its errors.
    #[must_use]
    pub fn into_errors(self) -> FormErrors {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> Form {
        Form::new(pairs.iter().copied().collect())
    }

    #[test]
    fn test_empty_form_is_valid() {
        assert!(Form::new(FormData::new()).valid());
    }

    #[test]
    fn test_required() {
        let mut empty = form(&[]);
        empty.required(&["a", "b", "c"]);
        assert!(!empty.valid());
        assert_eq!(empty.errors().len(), 3);

        let mut full = form(&[("a", "a"), ("b", "b"), ("c", "c")]);
        full.required(&["a", "b", "c"]);
        assert!(full.valid());
    }

    #[test]
    fn test_required_treats_whitespace_as_blank() {
        let mut f = form(&[("a", "   ")]);
        f.required(&["a"]);
        assert_eq!(f.errors().get("a"), Some(BLANK_MESSAGE));
    }

    #[test]
    fn test_has() {
        let f = form(&[("a", "a")]);
        assert!(f.has("a"));
        assert!(!f.has("e"));
        assert!(f.valid());
    }

    #[test]
    fn test_min_length() {
        let mut f = form(&[("a", "aaa")]);
        assert!(f.min_length("a", 3));
        assert!(f.valid());
        assert!(f.errors().get("a").is_none());

        let mut f = form(&[("b", "bb")]);
        assert!(!f.min_length("b", 3));
        assert!(!f.valid());
        assert!(f.errors().get("b").unwrap().contains('3'));
    }

    #[test]
    fn test_min_length_counts_characters() {
        let mut f = form(&[("name", "Zoë")]);
        assert!(f.min_length("name", 3));
    }

    #[test]
    fn test_min_length_ignores_padding() {
        let mut f = form(&[("name", "Al "), ("other", "  x  ")]);
        assert!(!f.min_length("name", 3));
        assert!(!f.min_length("other", 2));
        assert_eq!(f.errors().len(), 2);
    }

    #[test]
    fn test_is_email() {
        let mut f = form(&[("email", "email@gmai.com")]);
        assert!(f.is_email("email"));
        assert!(f.valid());

        let mut f = form(&[("email", "32efds@")]);
        assert!(!f.is_email("email"));
        assert_eq!(f.errors().get("email"), Some(EMAIL_MESSAGE));

        let mut f = form(&[("email", " email@gmai.com ")]);
        assert!(f.is_email("email"));
    }

    #[test]
    fn test_email_shapes() {
        for ok in ["a@b.co", "first.last+tag@sub.example.org", "x_y@host-name.io"] {
            assert!(is_valid_email(ok), "{ok} should be valid");
        }
        for bad in ["", "plain", "@example.com", "a@", "a@b", "a b@example.com", "a@-x.com"] {
            assert!(!is_valid_email(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn test_first_error_wins_for_display() {
        let mut f = form(&[]);
        f.required(&["first_name"]);
        f.min_length("first_name", 3);
        assert_eq!(f.errors().get("first_name"), Some(BLANK_MESSAGE));
        assert_eq!(f.errors().all("first_name").len(), 2);
        assert_eq!(f.errors().len(), 1);
    }

    #[test]
    fn test_rules_do_not_mutate_input() {
        let data: FormData = [("email", " not-an-email ")].into_iter().collect();
        let mut f = Form::new(data.clone());
        f.required(&["email"]);
        f.is_email("email");
        assert_eq!(f.data(), &data);
    }

    #[test]
    fn test_first_value_is_used() {
        let data: FormData = [("a", ""), ("a", "second")].into_iter().collect();
        let f = Form::new(data);
        assert!(!f.has("a"));
    }
}
