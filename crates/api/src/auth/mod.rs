//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed access/refresh token issuing and verification.
//! - [`cookie`] -- the `auth-token` session cookie.

pub mod cookie;
pub mod jwt;
pub mod password;
