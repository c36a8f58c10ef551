use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of the session JWT carried in the cookie. Also the body served
/// by `GET /auth/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}

/// Payload of the short-lived password reset JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    pub id: Uuid,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}
