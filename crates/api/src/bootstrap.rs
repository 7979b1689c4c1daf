//! First-start administrator provisioning.

use woundcare_core::error::CoreError;
use woundcare_core::roles::ROLE_ADMIN;
use woundcare_db::models::user::CreateUser;
use woundcare_db::repositories::UserRepo;
use woundcare_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Outcome of [`ensure_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No bootstrap credentials were configured.
    NotConfigured,
    /// An active administrator already exists.
    AdminPresent,
    /// The configured email belongs to an existing non-admin or inactive user.
    EmailTaken,
    Created,
}

/// Create the configured administrator when the database has no active admin.
///
/// Never modifies an existing account.
pub async fn ensure_admin(
    pool: &DbPool,
    admin: Option<&BootstrapAdmin>,
) -> AppResult<BootstrapOutcome> {
    let Some(admin) = admin else {
        return Ok(BootstrapOutcome::NotConfigured);
    };

    if UserRepo::count_active_admins(pool).await? > 0 {
        tracing::debug!("Active administrator present, skipping bootstrap");
        return Ok(BootstrapOutcome::AdminPresent);
    }

    let email = admin.email.trim().to_string();
    if UserRepo::find_by_email(pool, &email).await?.is_some() {
        tracing::warn!(%email, "Bootstrap admin email already in use, skipping");
        return Ok(BootstrapOutcome::EmailTaken);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(format!("ADMIN_PASSWORD: {msg}"))))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: admin.name.trim().to_string(),
            email,
            password_hash,
            role: ROLE_ADMIN.to_string(),
            professional_registry: None,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap administrator created");

    Ok(BootstrapOutcome::Created)
}
