use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Body of a successful login: just enough for the client to show who is
/// signed in. The token itself travels in the cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub name: String,
}

/// Plain `{message}` success body used across auth and post routes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Field checks applied before touching the database; all failures are
/// collected so the client can render them at once.
pub fn validate_registration(req: &RegisterRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if req.name.chars().count() < 3 {
        errors.push(FieldError {
            field: "name",
            message: "Name must be at least 3 characters long",
        });
    }
    if req.password.chars().count() < 5 {
        errors.push(FieldError {
            field: "password",
            message: "Password must be at least 5 characters long",
        });
    }
    if !is_valid_email(&req.email) {
        errors.push(FieldError {
            field: "email",
            message: "Email must be valid",
        });
    }
    errors
}
