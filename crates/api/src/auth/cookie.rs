//! The `auth-token` session cookie.
//!
//! Browsers authenticate with this httpOnly cookie; API clients may send the
//! same access token as `Authorization: Bearer` instead.

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth-token";

/// Find the session token in a `Cookie` request header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value carrying `token` for `max_age_secs`.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    format!(
        "{AUTH_COOKIE}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly{}; SameSite=Lax",
        secure_attr(secure)
    )
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub fn clear_session_cookie(secure: bool) -> String {
    format!(
        "{AUTH_COOKIE}=; Path=/; Max-Age=0; HttpOnly{}; SameSite=Lax",
        secure_attr(secure)
    )
}

fn secure_attr(secure: bool) -> &'static str {
    if secure {
        "; Secure"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_token_among_other_cookies() {
        let header = "theme=dark; auth-token=abc.def.ghi; lang=pt-BR";
        assert_eq!(token_from_cookie_header(header), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header("auth-token="), None);
        assert_eq!(token_from_cookie_header(""), None);
    }

    #[test]
    fn similarly_named_cookie_does_not_match() {
        assert_eq!(token_from_cookie_header("x-auth-token=nope"), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("tok", 604800, false);
        assert_eq!(
            cookie,
            "auth-token=tok; Path=/; Max-Age=604800; HttpOnly; SameSite=Lax"
        );
        assert!(session_cookie("tok", 60, true).contains("; Secure;"));
    }

    #[test]
    fn clearing_sets_zero_max_age() {
        let cookie = clear_session_cookie(false);
        assert!(cookie.starts_with("auth-token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
