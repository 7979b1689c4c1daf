//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The verified caller, from the session cookie or a
//!   Bearer token. Per-action checks go through [`auth::AuthUser::require`].

pub mod auth;
