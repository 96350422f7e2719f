//! Dashboard session tokens and the single admin credential.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::warn;

use crate::config::AuthSettings;

pub const SESSION_COOKIE_NAME: &str = "mb_dashboard_token";
pub const SESSION_TTL: Duration = Duration::days(7);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("required auth setting `{key}` is not configured")]
    MissingConfiguration { key: &'static str },
    #[error("failed to sign session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Payload carried by a dashboard session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone, Default)]
pub struct SessionConfig {
    pub jwt_secret: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("admin_email", &self.admin_email)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl From<&AuthSettings> for SessionConfig {
    fn from(settings: &AuthSettings) -> Self {
        Self {
            jwt_secret: settings.jwt_secret.clone(),
            admin_email: settings.admin_email.clone(),
            admin_password: settings.admin_password.clone(),
        }
    }
}

/// Issues and verifies HS256 session tokens.
///
/// Missing secrets are reported as [`AuthError::MissingConfiguration`] when a
/// token or credential is actually needed, never silently accepted.
#[derive(Debug, Clone)]
pub struct SessionService {
    config: SessionConfig,
}

impl SessionService {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        self.issue_at(email, OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, email: &str, issued_at: OffsetDateTime) -> Result<String, AuthError> {
        let secret = self.secret()?;
        let claims = SessionClaims {
            email: email.to_string(),
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + SESSION_TTL).unix_timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify signature and expiry. Any token failure yields `Ok(None)`.
    pub fn verify(&self, token: &str) -> Result<Option<SessionClaims>, AuthError> {
        let secret = self.secret()?;
        if token.is_empty() {
            return Ok(None);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        match decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => Ok(Some(data.claims)),
            Err(err) => {
                warn!(
                    target = "application::auth::verify",
                    error = %err,
                    "Rejected dashboard session token"
                );
                Ok(None)
            }
        }
    }

    /// Compare against the configured admin pair in constant time.
    pub fn validate_credentials(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        let expected_email = self
            .config
            .admin_email
            .as_deref()
            .ok_or(AuthError::MissingConfiguration { key: "EMAIL_APP" })?;
        let expected_password = self
            .config
            .admin_password
            .as_deref()
            .ok_or(AuthError::MissingConfiguration {
                key: "PASSWORD_APP",
            })?;

        let email_ok = email.as_bytes().ct_eq(expected_email.as_bytes());
        let password_ok = password.as_bytes().ct_eq(expected_password.as_bytes());
        Ok(bool::from(email_ok & password_ok))
    }

    fn secret(&self) -> Result<&str, AuthError> {
        self.config
            .jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .ok_or(AuthError::MissingConfiguration { key: "JWT_SECRET" })
    }
}
