use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::{ResetClaims, SessionClaims};
use super::repo::User;
use crate::state::AppState;

/// Signature or expiry failure while decoding a token. Expiry is kept
/// separate so the reset endpoint can answer "Token expired".
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// JWT signing and verification keys plus the two token lifetimes.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub session_ttl: Duration,
    pub reset_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let cfg = &state.config.jwt;
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            session_ttl: Duration::days(cfg.session_ttl_days),
            reset_ttl: Duration::minutes(cfg.reset_ttl_minutes),
        }
    }
}

impl JwtKeys {
    fn sign<C: Serialize>(&self, claims: &C) -> anyhow::Result<String> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        decode::<C>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    /// Session token: 15 days by default, carries id, email and name.
    pub fn sign_session(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = SessionClaims {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.unix_timestamp() as usize,
            exp: (now + self.session_ttl).unix_timestamp() as usize,
        };
        let token = self.sign(&claims)?;
        debug!(user_id = %user.id, "session token signed");
        Ok(token)
    }

    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify(token)
    }

    /// Reset token: 1 hour by default, carries id and email only.
    pub fn sign_reset(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = ResetClaims {
            id: user.id,
            email: user.email.clone(),
            iat: now.unix_timestamp() as usize,
            exp: (now + self.reset_ttl).unix_timestamp() as usize,
        };
        let token = self.sign(&claims)?;
        debug!(user_id = %user.id, "reset token signed");
        Ok(token)
    }

    pub fn verify_reset(&self, token: &str) -> Result<ResetClaims, TokenError> {
        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    fn make_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "ann@x.com".into(),
            password_hash: "hash".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn session_token_round_trips() {
        let keys = make_keys();
        let user = make_user();

        let token = keys.sign_session(&user).expect("sign session");
        let claims = keys.verify_session(&token).expect("verify session");

        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, "ann@x.com");
        assert_eq!(claims.name, "Ann");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn reset_token_round_trips() {
        let keys = make_keys();
        let user = make_user();

        let token = keys.sign_reset(&user).expect("sign reset");
        let claims = keys.verify_reset(&token).expect("verify reset");

        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, user.email);
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        // Past the 60s decode leeway.
        let claims = ResetClaims {
            id: Uuid::new_v4(),
            email: "ann@x.com".into(),
            iat: (now - 3600) as usize,
            exp: (now - 120) as usize,
        };
        let token = keys.sign(&claims).expect("sign expired");

        assert_eq!(keys.verify_reset(&token).unwrap_err(), TokenError::Expired);
    }

    #[tokio::test]
    async fn tampered_token_is_invalid() {
        let keys = make_keys();
        let token = keys.sign_session(&make_user()).expect("sign session");
        let mut tampered = token.clone();
        tampered.push('x');

        assert_eq!(
            keys.verify_session(&tampered).unwrap_err(),
            TokenError::Invalid
        );
        assert_eq!(
            keys.verify_session("not-even-a-jwt").unwrap_err(),
            TokenError::Invalid
        );
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let keys = make_keys();
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"other-secret"),
            decoding: DecodingKey::from_secret(b"other-secret"),
            session_ttl: Duration::days(15),
            reset_ttl: Duration::hours(1),
        };
        let token = other.sign_session(&make_user()).expect("sign session");

        assert_eq!(
            keys.verify_session(&token).unwrap_err(),
            TokenError::Invalid
        );
    }
}
