//! Sign-in and registration against the auth endpoints.
//!
//! Registration input is validated locally before any request goes out;
//! a [`RegistrationError`] is a caller mistake, not a gateway failure,
//! and is the one place the facade rejects instead of degrading.

use paperback_core::{Email, EmailError};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::config::DataMode;

use super::client::ApiClient;
use super::fixtures;
use super::types::LoginResponse;
use super::Sourced;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;
/// Minimum accepted display-name length.
const MIN_NAME_LEN: usize = 2;

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    mode: DataMode,
}

/// Registration form contents, validated by [`AuthService::register`].
pub struct RegistrationInput {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// Why a registration form was rejected before reaching the gateway.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("name must be at least {MIN_NAME_LEN} characters")]
    NameTooShort,
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Rough password strength, 0 (unusable) to 4 (strong).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PasswordStrength(pub u8);

/// Score a password: one point each for length, mixed case, a digit,
/// and a symbol.
#[must_use]
pub fn password_strength(password: &str) -> PasswordStrength {
    let mut score = 0;
    if password.len() >= MIN_PASSWORD_LEN {
        score += 1;
    }
    if password.chars().any(char::is_uppercase) && password.chars().any(char::is_lowercase) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_alphanumeric()) {
        score += 1;
    }
    PasswordStrength(score)
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl AuthService {
    pub(super) fn new(client: ApiClient, mode: DataMode) -> Self {
        Self { client, mode }
    }

    /// Attempt a sign-in.
    ///
    /// `None` means the credentials were not accepted (or, when degraded,
    /// that the gateway could not be reached); the caller decides whether
    /// to surface the degradation cause. Fixture mode accepts any
    /// credentials and synthesizes a session.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Sourced<Option<LoginResponse>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(Some(fixtures::demo_login(email)));
        }

        let body = LoginBody {
            email,
            password: password.expose_secret(),
        };
        match self.client.post("/auth/login", &body).await {
            Ok(response) => Sourced::Live(Some(response)),
            Err(cause) => {
                warn!(error = %cause, "Login failed");
                Sourced::Degraded(None, cause)
            }
        }
    }

    /// Validate a registration form and, if it passes, create the account.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] when the form itself is invalid;
    /// nothing is sent to the gateway in that case.
    #[instrument(skip(self, input))]
    pub async fn register(
        &self,
        input: &RegistrationInput,
    ) -> Result<Sourced<Option<LoginResponse>>, RegistrationError> {
        let email = validate_registration(input)?;

        if self.mode.is_fixtures() {
            return Ok(Sourced::Fixture(Some(fixtures::demo_login(email.as_str()))));
        }

        let body = RegisterBody {
            name: &input.name,
            email: email.as_str(),
            password: input.password.expose_secret(),
        };
        Ok(match self.client.post("/auth/register", &body).await {
            Ok(response) => Sourced::Live(Some(response)),
            Err(cause) => {
                warn!(error = %cause, "Registration failed");
                Sourced::Degraded(None, cause)
            }
        })
    }
}

fn validate_registration(input: &RegistrationInput) -> Result<Email, RegistrationError> {
    if input.name.trim().chars().count() < MIN_NAME_LEN {
        return Err(RegistrationError::NameTooShort);
    }
    let email = Email::parse(&input.email)?;
    if input.password.expose_secret().len() < MIN_PASSWORD_LEN {
        return Err(RegistrationError::PasswordTooShort);
    }
    if input.password.expose_secret() != input.confirm_password.expose_secret() {
        return Err(RegistrationError::PasswordMismatch);
    }
    Ok(email)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::session::{MemoryCredentialStore, SessionEvents};

    fn fixture_auth() -> AuthService {
        let config = BackendConfig::fixtures();
        let client =
            ApiClient::new(&config, MemoryCredentialStore::shared(), SessionEvents::new())
                .unwrap();
        AuthService::new(client, config.mode)
    }

    fn valid_input() -> RegistrationInput {
        RegistrationInput {
            name: "Reader".to_string(),
            email: "reader@example.com".to_string(),
            password: SecretString::from("correct horse 1!"),
            confirm_password: SecretString::from("correct horse 1!"),
        }
    }

    #[tokio::test]
    async fn test_fixture_login_synthesizes_session() {
        let auth = fixture_auth();
        let result = auth
            .login("reader@example.com", &SecretString::from("anything"))
            .await;

        let response = result.data().as_ref().unwrap();
        assert_eq!(response.email, "reader@example.com");
        assert!(!response.token.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_short_name() {
        let auth = fixture_auth();
        let mut input = valid_input();
        input.name = "R".to_string();
        assert!(matches!(
            auth.register(&input).await,
            Err(RegistrationError::NameTooShort)
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email() {
        let auth = fixture_auth();
        let mut input = valid_input();
        input.email = "not-an-email".to_string();
        assert!(matches!(
            auth.register(&input).await,
            Err(RegistrationError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_short_or_mismatched_passwords() {
        let auth = fixture_auth();

        let mut input = valid_input();
        input.password = SecretString::from("short");
        input.confirm_password = SecretString::from("short");
        assert!(matches!(
            auth.register(&input).await,
            Err(RegistrationError::PasswordTooShort)
        ));

        let mut input = valid_input();
        input.confirm_password = SecretString::from("different horse 1!");
        assert!(matches!(
            auth.register(&input).await,
            Err(RegistrationError::PasswordMismatch)
        ));
    }

    #[tokio::test]
    async fn test_register_accepts_valid_input() {
        let auth = fixture_auth();
        let result = auth.register(&valid_input()).await.unwrap();
        assert!(result.data().is_some());
    }

    #[test]
    fn test_password_strength_scoring() {
        assert_eq!(password_strength(""), PasswordStrength(0));
        assert_eq!(password_strength("abcdefgh"), PasswordStrength(1));
        assert_eq!(password_strength("Abcdefgh"), PasswordStrength(2));
        assert_eq!(password_strength("Abcdefg1"), PasswordStrength(3));
        assert_eq!(password_strength("Abcdef1!"), PasswordStrength(4));
        // Strong characters but too short still lose the length point.
        assert_eq!(password_strength("Ab1!"), PasswordStrength(3));
    }
}
