//! Field-level checks for incoming requests. Each check appends a
//! `"field: message"` entry; [`Violations::finish`] turns a non-empty list
//! into a single validation error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ApiError;

pub const MAX_FIELD_LEN: usize = 100;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$")
        .expect("email pattern is valid")
});

#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present, not blank, and within the length limit.
    pub fn required(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.trim().is_empty() => {
                self.max_len(field, Some(v));
            }
            _ => self.0.push(format!("{field}: must not be blank")),
        }
        self
    }

    /// Absent is fine; present must not be blank.
    pub fn not_blank_if_present(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            if v.trim().is_empty() {
                self.0.push(format!("{field}: must not be blank"));
            } else {
                self.max_len(field, Some(v));
            }
        }
        self
    }

    pub fn max_len(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            if v.chars().count() > MAX_FIELD_LEN {
                self.0.push(format!("{field}: size must be at most {MAX_FIELD_LEN}"));
            }
        }
        self
    }

    /// Absent or empty is fine; anything else must look like an address.
    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            if !EMAIL_PATTERN.is_match(v) {
                self.0.push(format!("{field}: must be a well-formed email address"));
            }
            self.max_len(field, Some(v));
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(std::mem::take(&mut self.0).join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_and_length() {
        assert!(Violations::new().required("username", Some("test")).finish().is_ok());
        assert!(Violations::new().required("username", None).finish().is_err());
        assert!(Violations::new().required("username", Some("  ")).finish().is_err());

        let long = "x".repeat(MAX_FIELD_LEN + 1);
        assert!(Violations::new().required("name", Some(&long)).finish().is_err());
        assert!(Violations::new().max_len("name", Some(&"x".repeat(MAX_FIELD_LEN))).finish().is_ok());
    }

    #[test]
    fn test_email_format() {
        assert!(Violations::new().email("email", Some("salah@example.com")).finish().is_ok());
        assert!(Violations::new().email("email", None).finish().is_ok());
        assert!(Violations::new().email("email", Some("salah")).finish().is_err());
        assert!(Violations::new().email("email", Some("a@b@c")).finish().is_err());
    }

    #[test]
    fn test_messages_are_joined() {
        let err = Violations::new()
            .required("firstName", Some(""))
            .email("email", Some("salah"))
            .finish()
            .unwrap_err();
        match err {
            ApiError::Validation(message) => {
                assert!(message.contains("firstName: must not be blank"));
                assert!(message.contains("email: must be a well-formed email address"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
