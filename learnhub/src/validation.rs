//! Field-level form validation.
//!
//! Forms are checked before anything is dispatched. A failed check yields
//! [`FormErrors`], one message per offending field, and the state is left
//! untouched.

use std::collections::BTreeMap;
use thiserror::Error;

/// Minimum password length at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validation failures keyed by field name
#[derive(Error, Clone, Debug, Default, PartialEq, Eq)]
#[error("{}", join_fields(.fields))]
pub struct FormErrors {
    fields: BTreeMap<&'static str, String>,
}

impl FormErrors {
    /// No errors
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for `field`, keeping the first message per field
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    /// Message for `field`, if it failed
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns true when every field passed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failing fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Failing fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// `field: message` pairs joined with `; `
fn join_fields(fields: &BTreeMap<&'static str, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Loose email shape check: something `@` something `.` something
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let chars: Vec<char> = email.chars().collect();
    chars.iter().enumerate().any(|(at, c)| {
        if *c != '@' || at == 0 || chars[at - 1].is_whitespace() {
            return false;
        }
        let domain = &chars[at + 1..];
        let host_len = domain.iter().take_while(|c| !c.is_whitespace()).count();
        domain[..host_len]
            .iter()
            .enumerate()
            .skip(1)
            .any(|(dot, c)| *c == '.' && dot + 1 < domain.len() && !domain[dot + 1].is_whitespace())
    })
}

fn require(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field, format!("{label} is required"));
    }
}

fn check_email(errors: &mut FormErrors, email: &str) {
    if email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email");
    }
}

/// Sign-in form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email
    pub email: String,
    /// Password
    pub password: String,
}

impl LoginForm {
    /// Checks required fields and email shape
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        }
        errors.into_result()
    }
}

/// Sign-up form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    /// Display name
    pub name: String,
    /// Email
    pub email: String,
    /// Password
    pub password: String,
    /// Password again
    pub confirm_password: String,
}

impl RegisterForm {
    /// Checks required fields, email shape, password length and confirmation
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        require(&mut errors, "name", "Name", &self.name);
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if self.password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match");
        }
        errors.into_result()
    }
}

/// Contact form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub message: String,
}

impl ContactForm {
    /// Checks that every field is filled in and the email is well formed
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        require(&mut errors, "name", "Name", &self.name);
        check_email(&mut errors, &self.email);
        require(&mut errors, "subject", "Subject", &self.subject);
        require(&mut errors, "message", "Message", &self.message);
        errors.into_result()
    }
}

/// Course review form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewForm {
    /// Stars
    pub rating: u8,
    /// Review text
    pub comment: String,
}

impl ReviewForm {
    /// Checks the rating is 1 to 5 stars and the comment is present
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if !(1..=5).contains(&self.rating) {
            errors.insert("rating", "Rating must be between 1 and 5");
        }
        require(&mut errors, "comment", "Comment", &self.comment);
        errors.into_result()
    }
}
