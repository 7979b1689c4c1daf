//! Handlers for the `/auth` resource (login, refresh, logout, profile).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use woundcare_core::error::CoreError;
use woundcare_db::models::user::{User, UserResponse};
use woundcare_db::repositories::UserRepo;

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::{issue_token, verify_token, TokenKind, TokenSubject};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Request body for `PUT /auth/me/password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Current user profile plus the permissions their role grants.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub permissions: &'static [&'static str],
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns a token pair and sets the
/// `auth-token` cookie to the access token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            tracing::info!(email = %input.email, "Login failed: unknown email");
            AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    if !user.is_active {
        tracing::info!(user_id = user.id, "Login refused: account deactivated");
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    session_response(&state, &user)
}

/// POST /api/auth/refresh
///
/// Exchange a valid refresh token for a new token pair. The user must still
/// exist and be active.
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    let claims = verify_token(&input.refresh_token, TokenKind::Refresh, &state.config.jwt)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected refresh token");
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    session_response(&state, &user)
}

/// POST /api/auth/logout
///
/// Expire the session cookie. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
    )
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<MeResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(MeResponse {
        user: UserResponse::from(&user),
        permissions: auth.permissions(),
    }))
}

/// PUT /api/auth/me/password
///
/// Change the caller's own password after re-checking the current one.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &hashed).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a token pair for `user` and attach the access token as the session cookie.
fn session_response(state: &AppState, user: &User) -> AppResult<impl IntoResponse> {
    let jwt = &state.config.jwt;
    let subject = TokenSubject {
        user_id: user.id,
        email: &user.email,
        name: &user.name,
        role: &user.role,
    };

    let access_token = issue_token(subject, TokenKind::Access, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let refresh_token = issue_token(subject, TokenKind::Refresh, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_in = jwt.ttl_secs(TokenKind::Access);
    let cookie = session_cookie(&access_token, expires_in, state.config.cookie_secure);

    let body = AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer",
        expires_in,
        user: UserResponse::from(user),
    };

    Ok(([(SET_COOKIE, cookie)], Json(body)))
}
