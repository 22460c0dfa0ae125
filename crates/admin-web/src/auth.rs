//! Authentication error codes and password hashing.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::http::StatusCode;
use rand_core::OsRng;
use serde::Serialize;

use crate::error::AdminError;

/// Authentication failures shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthErrorCode {
    InvalidCredential,
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    MissingSession,
    UnknownSession,
    SessionExpired,
}

/// Fixed operator-facing text for each authentication error code.
const MESSAGES: &[(&str, &str)] = &[
    ("invalid-credential", "Invalid email or password."),
    ("email-already-in-use", "An account with this email already exists."),
    ("invalid-email", "Please enter a valid email address."),
    ("weak-password", "Password must be at least 8 characters."),
    ("missing-session", "Please sign in to continue."),
    ("unknown-session", "Your session is no longer valid. Please sign in again."),
    ("session-expired", "Your session has ended. Please sign in again."),
];

const FALLBACK_MESSAGE: &str = "Authentication failed. Please try again.";

/// Look up the text for an error code, with a generic fallback.
pub fn message_for(code: &str) -> &'static str {
    MESSAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, message)| *message)
        .unwrap_or(FALLBACK_MESSAGE)
}

impl AuthErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            AuthErrorCode::InvalidCredential => "invalid-credential",
            AuthErrorCode::EmailAlreadyInUse => "email-already-in-use",
            AuthErrorCode::InvalidEmail => "invalid-email",
            AuthErrorCode::WeakPassword => "weak-password",
            AuthErrorCode::MissingSession => "missing-session",
            AuthErrorCode::UnknownSession => "unknown-session",
            AuthErrorCode::SessionExpired => "session-expired",
        }
    }

    pub fn message(&self) -> &'static str {
        message_for(self.code())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthErrorCode::InvalidCredential
            | AuthErrorCode::MissingSession
            | AuthErrorCode::UnknownSession
            | AuthErrorCode::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthErrorCode::EmailAlreadyInUse => StatusCode::CONFLICT,
            AuthErrorCode::InvalidEmail | AuthErrorCode::WeakPassword => StatusCode::BAD_REQUEST,
        }
    }
}

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, AdminError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AdminError::Internal(format!("argon2 error: {e}")))
}

/// Check a password against a stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
