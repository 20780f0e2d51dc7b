//! Demo authentication.
//!
//! There is no backend: a single demo account signs in, and registration
//! always succeeds once the form is valid. Both run as simulated tasks so
//! callers can show a loading state and cancel.

use crate::task::SimulatedTask;
use crate::types::{User, UserId};
use crate::validation::{FormErrors, LoginForm, RegisterForm};
use std::time::Duration;
use thiserror::Error;

/// Demo account email
pub const DEMO_EMAIL: &str = "student@learnhub.com";
/// Demo account password
pub const DEMO_PASSWORD: &str = "password123";
/// Demo account display name
pub const DEMO_NAME: &str = "Demo Student";

/// Authentication failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email and password do not match the demo account
    #[error("Invalid email or password. Use the demo credentials shown below.")]
    InvalidCredentials,

    /// The form failed validation
    #[error("{0}")]
    Validation(#[from] FormErrors),
}

/// The user a successful demo login produces
#[must_use]
pub fn demo_user() -> User {
    User::new(UserId::new(1), DEMO_NAME, DEMO_EMAIL)
}

/// Checks credentials against the demo account
///
/// # Errors
///
/// Returns [`AuthError::Validation`] for an invalid form and
/// [`AuthError::InvalidCredentials`] for anything but the demo account.
pub fn login(form: &LoginForm) -> Result<User, AuthError> {
    form.validate()?;
    if form.email == DEMO_EMAIL && form.password == DEMO_PASSWORD {
        tracing::info!(email = %form.email, "Signed in");
        Ok(demo_user())
    } else {
        tracing::warn!(email = %form.email, "Rejected sign-in");
        Err(AuthError::InvalidCredentials)
    }
}

/// Creates the account described by a valid registration form
///
/// # Errors
///
/// Returns [`AuthError::Validation`] for an invalid form.
pub fn register(form: &RegisterForm) -> Result<User, AuthError> {
    form.validate()?;
    tracing::info!(email = %form.email, "Registered");
    Ok(User::new(UserId::new(1), form.name.trim(), form.email.trim()))
}

/// Validates now, then checks credentials after `delay`
///
/// # Errors
///
/// Returns the form errors immediately without starting a task.
pub fn submit_login(
    form: LoginForm,
    delay: Duration,
) -> Result<SimulatedTask<Result<User, AuthError>>, FormErrors> {
    form.validate()?;
    Ok(SimulatedTask::spawn(delay, move || login(&form)))
}

/// Validates now, then creates the account after `delay`
///
/// # Errors
///
/// Returns the form errors immediately without starting a task.
pub fn submit_registration(
    form: RegisterForm,
    delay: Duration,
) -> Result<SimulatedTask<Result<User, AuthError>>, FormErrors> {
    form.validate()?;
    Ok(SimulatedTask::spawn(delay, move || register(&form)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;

    fn demo_form() -> LoginForm {
        LoginForm {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
        }
    }

    #[test]
    fn demo_credentials_sign_in() {
        let user = login(&demo_form()).unwrap();
        assert_eq!(user, demo_user());
        assert_eq!(user.id, UserId::new(1));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let form = LoginForm {
            password: "hunter22".to_string(),
            ..demo_form()
        };
        assert_eq!(login(&form), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn invalid_form_is_a_validation_error() {
        let result = login(&LoginForm::default());
        assert!(matches!(result, Err(AuthError::Validation(e)) if e.len() == 2));
    }

    #[test]
    fn registration_creates_user() {
        let form = RegisterForm {
            name: " Jane Doe ".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        };
        let user = register(&form).unwrap();
        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email, "jane@example.com");
    }

    #[tokio::test]
    async fn submitted_login_resolves_after_delay() {
        let task = submit_login(demo_form(), Duration::from_millis(5)).unwrap();
        assert_eq!(task.join().await.unwrap(), Ok(demo_user()));
    }

    #[tokio::test]
    async fn submitted_login_fails_fast_on_invalid_form() {
        assert!(submit_login(LoginForm::default(), Duration::from_secs(60)).is_err());
    }
}
