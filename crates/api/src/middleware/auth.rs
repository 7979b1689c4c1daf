//! Token-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use woundcare_core::error::CoreError;
use woundcare_core::permissions::{has_permission, permissions_for};
use woundcare_core::types::DbId;

use crate::auth::cookie::token_from_cookie_header;
use crate::auth::jwt::{verify_token, TokenKind};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The authenticated caller, verified from an access token on every request.
///
/// The token is read from `Authorization: Bearer <token>` when present,
/// otherwise from the `auth-token` cookie. This is the only source of
/// identity handlers use.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     user.require(WOUND_READ)?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub email: String,
    pub name: String,
    /// The user's role name (e.g. `"admin"`, `"nurse"`).
    pub role: String,
}

impl AuthUser {
    /// Fail with 403 unless the caller's role grants `permission`.
    pub fn require(&self, permission: &str) -> AppResult<()> {
        if has_permission(&self.role, permission) {
            Ok(())
        } else {
            tracing::debug!(user_id = self.user_id, role = %self.role, permission, "Permission denied");
            Err(AppError::Core(CoreError::Forbidden(format!(
                "Missing permission '{permission}'"
            ))))
        }
    }

    /// Every permission the caller's role grants.
    pub fn permissions(&self) -> &'static [&'static str] {
        permissions_for(&self.role)
    }
}

/// Pull the raw token out of the request, Bearer header first.
fn extract_token(parts: &Parts) -> AppResult<&str> {
    if let Some(value) = parts.headers.get(AUTHORIZATION) {
        let header = value.to_str().map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid Authorization header".into()))
        })?;
        return header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        });
    }

    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(token_from_cookie_header)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Authentication required".into())))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        let claims = verify_token(token, TokenKind::Access, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        })
    }
}
