//! Signed session tokens.
//!
//! Both access and refresh tokens are HS256 JWTs carrying a [`Claims`]
//! payload. The `kind` claim keeps one from being accepted in place of the
//! other: a refresh token cannot authenticate a request, and an access token
//! cannot be exchanged for a new pair.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use woundcare_core::types::DbId;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Which of the two token types a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub email: String,
    pub name: String,
    /// The user's role name (e.g. `"nurse"`).
    pub role: String,
    pub kind: TokenKind,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Identity a token is issued for.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: DbId,
    pub email: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}

/// Why a presented token was rejected.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Bad signature, malformed, or expired.
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    /// Well-formed and signed, but of the other kind.
    #[error("expected {expected:?} token, got {actual:?}")]
    WrongKind { expected: TokenKind, actual: TokenKind },
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in days (default: 7).
    pub access_token_expiry_days: i64,
    /// Refresh token lifetime in days (default: 30).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in days.
const DEFAULT_ACCESS_EXPIRY_DAYS: i64 = 7;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_DAYS`   | no       | `7`     |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_days: i64 = std::env::var("JWT_ACCESS_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_DAYS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_days,
            refresh_token_expiry_days,
        }
    }

    /// Lifetime of a token of `kind`, in seconds.
    pub fn ttl_secs(&self, kind: TokenKind) -> i64 {
        let days = match kind {
            TokenKind::Access => self.access_token_expiry_days,
            TokenKind::Refresh => self.refresh_token_expiry_days,
        };
        days * SECS_PER_DAY
    }
}

/// Issue an HS256 token of `kind` for `subject`.
pub fn issue_token(
    subject: TokenSubject<'_>,
    kind: TokenKind,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: subject.user_id,
        email: subject.email.to_string(),
        name: subject.name.to_string(),
        role: subject.role.to_string(),
        kind,
        exp: now + config.ttl_secs(kind),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify a token's signature and expiry and require it to be of `expected` kind.
pub fn verify_token(
    token: &str,
    expected: TokenKind,
    config: &JwtConfig,
) -> Result<Claims, TokenError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    let claims = token_data.claims;
    if claims.kind != expected {
        return Err(TokenError::WrongKind {
            expected,
            actual: claims.kind,
        });
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_days: 7,
            refresh_token_expiry_days: 30,
        }
    }

    fn nurse() -> TokenSubject<'static> {
        TokenSubject {
            user_id: 42,
            email: "ana@clinic.test",
            name: "Ana Souza",
            role: "nurse",
        }
    }

    #[test]
    fn access_token_round_trip() {
        let config = test_config();
        let token = issue_token(nurse(), TokenKind::Access, &config).unwrap();

        let claims = verify_token(&token, TokenKind::Access, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ana@clinic.test");
        assert_eq!(claims.name, "Ana Souza");
        assert_eq!(claims.role, "nurse");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 7 * SECS_PER_DAY);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn refresh_token_lives_thirty_days() {
        let config = test_config();
        let token = issue_token(nurse(), TokenKind::Refresh, &config).unwrap();
        let claims = verify_token(&token, TokenKind::Refresh, &config).unwrap();
        assert_eq!(claims.exp - claims.iat, 30 * SECS_PER_DAY);
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let config = test_config();
        let refresh = issue_token(nurse(), TokenKind::Refresh, &config).unwrap();
        assert_matches!(
            verify_token(&refresh, TokenKind::Access, &config),
            Err(TokenError::WrongKind {
                expected: TokenKind::Access,
                actual: TokenKind::Refresh
            })
        );

        let access = issue_token(nurse(), TokenKind::Access, &config).unwrap();
        assert_matches!(
            verify_token(&access, TokenKind::Refresh, &config),
            Err(TokenError::WrongKind { .. })
        );
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();
        // Well past the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "old@clinic.test".to_string(),
            name: "Old".to_string(),
            role: "nurse".to_string(),
            kind: TokenKind::Access,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert_matches!(
            verify_token(&token, TokenKind::Access, &config),
            Err(TokenError::Invalid(_))
        );
    }

    #[test]
    fn different_secret_fails() {
        let config_a = test_config();
        let config_b = JwtConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        };
        let token = issue_token(nurse(), TokenKind::Access, &config_a).unwrap();
        assert_matches!(
            verify_token(&token, TokenKind::Access, &config_b),
            Err(TokenError::Invalid(_))
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_matches!(
            verify_token("not.a.jwt", TokenKind::Access, &test_config()),
            Err(TokenError::Invalid(_))
        );
    }
}
