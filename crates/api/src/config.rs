use std::path::PathBuf;

use woundcare_core::image::DEFAULT_MAX_IMAGE_BYTES;

use crate::auth::jwt::JwtConfig;

/// Credentials for the administrator created on first start.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root directory for stored wound images (default: `storage/uploads`).
    pub upload_dir: PathBuf,
    /// Largest accepted image upload in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Administrator to create when the database has none.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3001`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `UPLOAD_DIR`           | `storage/uploads`          |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                 |
    /// | `COOKIE_SECURE`        | `false`                    |
    /// | `ADMIN_EMAIL`          | unset (no bootstrap admin) |
    /// | `ADMIN_PASSWORD`       | unset                      |
    /// | `ADMIN_NAME`           | `Administrator`            |
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values or a missing `JWT_SECRET`, so
    /// misconfiguration stops the server before it binds.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("storage/uploads"));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_IMAGE_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let jwt = JwtConfig::from_env();

        let bootstrap_admin = match (
            std::env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty()),
            std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                email,
                password,
                name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into()),
            }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            max_upload_bytes,
            cookie_secure,
            jwt,
            bootstrap_admin,
        }
    }
}
