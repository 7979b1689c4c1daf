//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PHYSICIAN: &str = "physician";
pub const ROLE_NURSE: &str = "nurse";
pub const ROLE_TECHNICIAN: &str = "technician";

/// Every role the service recognises.
pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_PHYSICIAN, ROLE_NURSE, ROLE_TECHNICIAN];

/// Returns `true` if `role` is one of [`ALL_ROLES`].
pub fn is_known_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}

/// Validate that `role` is a known role name.
pub fn validate_role(role: &str) -> Result<(), String> {
    if is_known_role(role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            ALL_ROLES.join(", ")
        ))
    }
}
