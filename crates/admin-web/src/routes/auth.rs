//! Sign-up, sign-in, and sign-out.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::validation::{validate_email, validate_password};
use database::{admin, Admin, DatabaseError, NewAdmin, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{hash_password, verify_password, AuthErrorCode};
use crate::error::{AdminError, Result};
use crate::session::CurrentAdmin;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// A started session.
#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub admin: Admin,
}

#[derive(Serialize)]
pub struct SignOutResponse {
    pub signed_out: bool,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create an administrator account and sign it in.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let email = normalize_email(&req.email);
    validate_email(&email).map_err(|_| AdminError::Auth(AuthErrorCode::InvalidEmail))?;
    validate_password(&req.password).map_err(|err| match err {
        ValidationError::TooShort { .. } | ValidationError::Empty(_) => {
            AdminError::Auth(AuthErrorCode::WeakPassword)
        }
        other => AdminError::Validation(other),
    })?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Empty("name".to_string()).into());
    }

    let new_admin = NewAdmin {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        email,
        password_hash: hash_password(&req.password)?,
    };

    let admin = admin::create_admin(state.db.pool(), &new_admin)
        .await
        .map_err(|err| match err {
            DatabaseError::AlreadyExists { .. } => {
                AdminError::Auth(AuthErrorCode::EmailAlreadyInUse)
            }
            other => AdminError::Database(other),
        })?;
    info!(admin_id = %admin.id, "Admin account created");

    let token = state.sessions.sign_in(&admin).await;
    Ok((StatusCode::CREATED, Json(SessionResponse { token, admin })))
}

/// Check credentials and start a session.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SessionResponse>> {
    let email = normalize_email(&req.email);
    let admin = admin::find_admin_by_email(state.db.pool(), &email)
        .await?
        .filter(|admin| verify_password(&req.password, &admin.password_hash))
        .ok_or(AdminError::Auth(AuthErrorCode::InvalidCredential))?;

    let token = state.sessions.sign_in(&admin).await;
    Ok(Json(SessionResponse { token, admin }))
}

/// End the caller's session.
pub async fn sign_out(
    State(state): State<AppState>,
    current: CurrentAdmin,
) -> Json<SignOutResponse> {
    let signed_out = state.sessions.sign_out(&current.token).await;
    Json(SignOutResponse { signed_out })
}
