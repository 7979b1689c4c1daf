//! Static role → permission table.
//!
//! Permissions are opaque `resource:action` strings. Each role maps to a
//! compile-time slice; [`has_permission`] is a membership test against it.
//! There are no dynamic grants and no per-record ACLs.

use crate::roles::{ROLE_ADMIN, ROLE_NURSE, ROLE_PHYSICIAN, ROLE_TECHNICIAN};

// ---------------------------------------------------------------------------
// Permission names
// ---------------------------------------------------------------------------

pub const PATIENT_CREATE: &str = "patient:create";
pub const PATIENT_READ: &str = "patient:read";
pub const PATIENT_UPDATE: &str = "patient:update";
pub const PATIENT_DELETE: &str = "patient:delete";

pub const WOUND_CREATE: &str = "wound:create";
pub const WOUND_READ: &str = "wound:read";
pub const WOUND_UPDATE: &str = "wound:update";
pub const WOUND_DELETE: &str = "wound:delete";

pub const TREATMENT_CREATE: &str = "treatment:create";
pub const TREATMENT_READ: &str = "treatment:read";
pub const TREATMENT_UPDATE: &str = "treatment:update";
pub const TREATMENT_DELETE: &str = "treatment:delete";

pub const IMAGE_CREATE: &str = "image:create";
pub const IMAGE_READ: &str = "image:read";
pub const IMAGE_UPDATE: &str = "image:update";
pub const IMAGE_DELETE: &str = "image:delete";

pub const REPORT_READ: &str = "report:read";

pub const USER_CREATE: &str = "user:create";
pub const USER_READ: &str = "user:read";
pub const USER_UPDATE: &str = "user:update";
pub const USER_DELETE: &str = "user:delete";

/// Every permission known to the service, in display order.
pub const ALL_PERMISSIONS: &[&str] = &[
    PATIENT_CREATE,
    PATIENT_READ,
    PATIENT_UPDATE,
    PATIENT_DELETE,
    WOUND_CREATE,
    WOUND_READ,
    WOUND_UPDATE,
    WOUND_DELETE,
    TREATMENT_CREATE,
    TREATMENT_READ,
    TREATMENT_UPDATE,
    TREATMENT_DELETE,
    IMAGE_CREATE,
    IMAGE_READ,
    IMAGE_UPDATE,
    IMAGE_DELETE,
    REPORT_READ,
    USER_CREATE,
    USER_READ,
    USER_UPDATE,
    USER_DELETE,
];

// ---------------------------------------------------------------------------
// Role tables
// ---------------------------------------------------------------------------

const PHYSICIAN_PERMISSIONS: &[&str] = &[
    PATIENT_CREATE,
    PATIENT_READ,
    PATIENT_UPDATE,
    WOUND_CREATE,
    WOUND_READ,
    WOUND_UPDATE,
    TREATMENT_CREATE,
    TREATMENT_READ,
    TREATMENT_UPDATE,
    TREATMENT_DELETE,
    IMAGE_CREATE,
    IMAGE_READ,
    IMAGE_UPDATE,
    IMAGE_DELETE,
    REPORT_READ,
];

const NURSE_PERMISSIONS: &[&str] = &[
    PATIENT_CREATE,
    PATIENT_READ,
    PATIENT_UPDATE,
    WOUND_CREATE,
    WOUND_READ,
    WOUND_UPDATE,
    TREATMENT_CREATE,
    TREATMENT_READ,
    TREATMENT_UPDATE,
    IMAGE_CREATE,
    IMAGE_READ,
    IMAGE_UPDATE,
    IMAGE_DELETE,
    REPORT_READ,
];

const TECHNICIAN_PERMISSIONS: &[&str] = &[
    PATIENT_READ,
    WOUND_READ,
    TREATMENT_CREATE,
    TREATMENT_READ,
    IMAGE_CREATE,
    IMAGE_READ,
];

/// The permission set granted to `role`. Unknown roles get an empty set.
pub fn permissions_for(role: &str) -> &'static [&'static str] {
    match role {
        ROLE_ADMIN => ALL_PERMISSIONS,
        ROLE_PHYSICIAN => PHYSICIAN_PERMISSIONS,
        ROLE_NURSE => NURSE_PERMISSIONS,
        ROLE_TECHNICIAN => TECHNICIAN_PERMISSIONS,
        _ => &[],
    }
}

/// Whether `role` may perform `permission`.
pub fn has_permission(role: &str, permission: &str) -> bool {
    permissions_for(role).contains(&permission)
}
