//! Domain building blocks shared by the database and HTTP layers.
//!
//! Nothing in this crate performs I/O: it holds id/timestamp aliases, the
//! domain error type, the static role/permission table, clinical enum
//! values, derived-field rules, and pagination arithmetic.

pub mod error;
pub mod image;
pub mod pagination;
pub mod patient;
pub mod permissions;
pub mod roles;
pub mod treatment;
pub mod types;
pub mod validation;
pub mod wound;
