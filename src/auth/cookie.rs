use cookie::Cookie;

pub const COOKIE_NAME: &str = "session";

/// Session cookie holding the signed token; httpOnly so scripts on the
/// client cannot read it.
pub fn create_cookie(token: String, ttl_days: i64) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .http_only(true)
        .path("/")
        .max_age(cookie::time::Duration::days(ttl_days))
        .into()
}

/// Empty cookie with Max-Age=0, used to invalidate the previous one.
pub fn clear_cookie() -> Cookie<'static> {
    Cookie::build(COOKIE_NAME)
        .http_only(true)
        .path("/")
        .max_age(cookie::time::Duration::ZERO)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_with_a_lifetime() {
        let rendered = create_cookie("token-value".into(), 15).to_string();
        assert!(rendered.starts_with("session=token-value"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=1296000")); // 15 days in seconds
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let rendered = clear_cookie().to_string();
        assert!(rendered.contains("Max-Age=0"));
    }
}
