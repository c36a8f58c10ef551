use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::warn;

use super::claims::SessionClaims;
use super::cookie::COOKIE_NAME;
use super::jwt::JwtKeys;
use crate::error::ApiError;
use crate::state::AppState;

/// Extracts the session cookie and verifies it, rejecting the request with
/// 401 otherwise.
#[derive(Debug)]
pub struct AuthSession(pub SessionClaims);

fn session_token(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookie::Cookie::split_parse(raw)
        .filter_map(Result::ok)
        .find(|c| c.name() == COOKIE_NAME)
        .map(|c| c.value().to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or(ApiError::Unauthorized("No token provided"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify_session(&token).map_err(|e| {
            warn!(error = %e, "session verification failed");
            ApiError::Unauthorized("Invalid token")
        })?;

        Ok(AuthSession(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::User;
    use axum::http::Request;
    use axum::response::IntoResponse;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn parts_with_cookie(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/auth/profile");
        if let Some(v) = value {
            builder = builder.header(header::COOKIE, v);
        }
        builder.body(()).expect("request").into_parts().0
    }

    #[tokio::test]
    async fn missing_cookie_is_rejected() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(None);

        let err = AuthSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), 401);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(Some("session=garbage"));

        let err = AuthSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), 401);
    }

    #[tokio::test]
    async fn valid_cookie_yields_the_claims() {
        let state = AppState::fake();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "ann@x.com".into(),
            password_hash: "hash".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let token = JwtKeys::from_ref(&state)
            .sign_session(&user)
            .expect("sign session");

        let header_value = format!("other=1; session={token}");
        let mut parts = parts_with_cookie(Some(&header_value));

        let AuthSession(claims) = AuthSession::from_request_parts(&mut parts, &state)
            .await
            .expect("extract session");
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.name, "Ann");
    }
}
