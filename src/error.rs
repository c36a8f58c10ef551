use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// A single field validation failure, serialized into the `errors` array.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Errors surfaced to HTTP clients.
///
/// Status codes mirror the contract the frontend already depends on,
/// quirks included: a duplicate registration answers 401 and an unexpected
/// registration failure answers 501.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    /// Covers both unknown email and wrong password with one message.
    #[error("incorrect email or password")]
    IncorrectCredentials,
    #[error("user with this email already exists")]
    EmailTaken,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("token expired")]
    TokenExpired,
    /// Password reset requested for an email with no account.
    #[error("no account for this email")]
    UnknownResetEmail,
    #[error("email not sent: {0}")]
    EmailNotSent(String),
    #[error("registration failed: {0}")]
    RegisterFailed(anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Shorthand for handlers mapping infrastructure failures.
    pub fn internal(e: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal(e.into())
    }
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Serialize)]
struct ErrorsBody {
    errors: Vec<FieldError>,
}

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageBody {
            message: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ErrorsBody { errors })).into_response()
            }
            ApiError::IncorrectCredentials => {
                message(StatusCode::BAD_REQUEST, "Incorrect email or password")
            }
            ApiError::EmailTaken => message(
                StatusCode::UNAUTHORIZED,
                "User with this email already exists",
            ),
            ApiError::Unauthorized(msg) => message(StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => message(StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => message(StatusCode::NOT_FOUND, msg),
            ApiError::TokenExpired => message(StatusCode::BAD_REQUEST, "Token expired"),
            ApiError::UnknownResetEmail => {
                message(StatusCode::BAD_REQUEST, "User with this Email not exist")
            }
            ApiError::EmailNotSent(reason) => {
                message(StatusCode::BAD_REQUEST, format!("Email not sent: {reason}"))
            }
            ApiError::RegisterFailed(source) => {
                error!(error = %source, "registration failed");
                message(StatusCode::NOT_IMPLEMENTED, "Internal server error")
            }
            ApiError::Internal(source) => {
                error!(error = %source, "internal error");
                message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_the_client_contract() {
        let cases = [
            (ApiError::Validation(vec![]), StatusCode::BAD_REQUEST),
            (ApiError::IncorrectCredentials, StatusCode::BAD_REQUEST),
            (ApiError::EmailTaken, StatusCode::UNAUTHORIZED),
            (
                ApiError::Unauthorized("No token provided"),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Forbidden("You are not the author of this post"),
                StatusCode::FORBIDDEN,
            ),
            (ApiError::NotFound("Post not found"), StatusCode::NOT_FOUND),
            (ApiError::TokenExpired, StatusCode::BAD_REQUEST),
            (ApiError::UnknownResetEmail, StatusCode::BAD_REQUEST),
            (
                ApiError::EmailNotSent("relay refused".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::RegisterFailed(anyhow::anyhow!("insert failed")),
                StatusCode::NOT_IMPLEMENTED,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn internal_body_does_not_leak_the_source() {
        let response = ApiError::Internal(anyhow::anyhow!("password hash for bob")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
