//! Handlers for the `/users` resource (user management).
//!
//! Each handler checks its `user:*` permission; only `admin` holds them.

use std::borrow::Cow;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::{Validate, ValidationError};
use woundcare_core::error::CoreError;
use woundcare_core::permissions::{USER_CREATE, USER_DELETE, USER_READ, USER_UPDATE};
use woundcare_core::roles::{validate_role, ROLE_ADMIN};
use woundcare_core::types::DbId;
use woundcare_core::validation::validate_not_blank;
use woundcare_db::models::user::{CreateUser, UpdateUser, UserResponse};
use woundcare_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::query::{PageRequest, PaginationParams};
use crate::response::Paginated;
use crate::state::AppState;

fn validate_known_role(role: &str) -> Result<(), ValidationError> {
    validate_role(role).map_err(|msg| ValidationError::new("role").with_message(Cow::Owned(msg)))
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name is required"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
    #[validate(custom(function = "validate_known_role"))]
    pub role: String,
    /// Professional council registration (e.g. COREN, CRM).
    #[validate(length(max = 50))]
    pub professional_registry: Option<String>,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name cannot be empty"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_known_role"))]
    pub role: Option<String>,
    #[validate(length(max = 50))]
    pub professional_registry: Option<String>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /users/{id}/reset-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users
///
/// Create a user. Validates password strength, hashes it, and returns a
/// safe [`UserResponse`] with 201 Created. A duplicate email is a 409.
pub async fn create(
    State(state): State<AppState>,
    admin: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    admin.require(USER_CREATE)?;

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        password_hash: hashed,
        role: input.role,
        professional_registry: input.professional_registry,
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(user_id = user.id, role = %user.role, created_by = admin.user_id, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    admin: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    admin.require(USER_READ)?;

    let page = PageRequest::from(&params);
    let users = UserRepo::list(&state.pool, page.limit, page.offset).await?;
    let total = UserRepo::count(&state.pool).await?;
    let items = users.iter().map(UserResponse::from).collect();
    Ok(Json(Paginated::new(items, total, page)))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    admin.require(USER_READ)?;

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", id)))?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/users/{id}
///
/// Update profile fields (not password). An admin cannot deactivate their
/// own account or drop their own admin role.
pub async fn update(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    admin.require(USER_UPDATE)?;

    if id == admin.user_id {
        if input.is_active == Some(false) {
            return Err(AppError::BadRequest(
                "You cannot deactivate your own account".into(),
            ));
        }
        if input.role.as_deref().is_some_and(|role| role != ROLE_ADMIN) {
            return Err(AppError::BadRequest(
                "You cannot remove your own admin role".into(),
            ));
        }
    }

    let update_dto = UpdateUser {
        name: input.name.map(|n| n.trim().to_string()),
        email: input.email.map(|e| e.trim().to_string()),
        role: input.role,
        professional_registry: input.professional_registry,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", id)))?;
    tracing::info!(user_id = user.id, updated_by = admin.user_id, "User updated");

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/users/{id}
///
/// Deactivate a user (sets `is_active = false`). Returns 204 No Content.
pub async fn deactivate(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    admin.require(USER_DELETE)?;

    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }

    if UserRepo::deactivate(&state.pool, id).await? {
        tracing::info!(user_id = id, deactivated_by = admin.user_id, "User deactivated");
        return Ok(StatusCode::NO_CONTENT);
    }

    // Either absent or already inactive.
    match UserRepo::find_by_id(&state.pool, id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::Core(CoreError::not_found("User", id))),
    }
}

/// POST /api/users/{id}/reset-password
///
/// Admin-initiated password reset for a user.
pub async fn reset_password(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    admin.require(USER_UPDATE)?;

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if UserRepo::update_password(&state.pool, id, &hashed).await? {
        tracing::info!(user_id = id, reset_by = admin.user_id, "Password reset");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("User", id)))
    }
}
