use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

use crate::session::machine::TransitionError;

#[derive(Debug, ThisError)]
pub enum SentimindError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Illegal transition: {0}")]
    Transition(#[from] TransitionError),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("User {0} is not an authorized admin")]
    NotAdmin(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Session cookie key error: {0}")]
    CookieKey(String),
}

/// A rejected user input, reported inline; nothing is mutated when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("Fill all fields!")]
    MissingFields,

    #[error("Username must start with a letter and contain only letters and numbers (no spaces).")]
    Username,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    #[error("Password must not contain spaces.")]
    PasswordWhitespace,

    #[error("Password must contain at least one special character.")]
    PasswordMissingSpecial,

    #[error("Please enter a valid input.")]
    EmptyInput,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "MISSING_FIELDS",
            ValidationError::Username => "INVALID_USERNAME",
            ValidationError::PasswordTooShort => "PASSWORD_TOO_SHORT",
            ValidationError::PasswordWhitespace => "PASSWORD_WHITESPACE",
            ValidationError::PasswordMissingSpecial => "PASSWORD_MISSING_SPECIAL",
            ValidationError::EmptyInput => "EMPTY_INPUT",
        }
    }
}

impl IntoResponse for SentimindError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            SentimindError::Validation(rule) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorBody {
                    code: rule.code().to_string(),
                    message: rule.to_string(),
                },
            ),
            SentimindError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid credentials.".to_string(),
                },
            ),
            SentimindError::NotLoggedIn => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "NOT_LOGGED_IN".to_string(),
                    message: "Log in first.".to_string(),
                },
            ),
            SentimindError::NotAdmin(_) => (
                StatusCode::FORBIDDEN,
                ApiErrorBody {
                    code: "FORBIDDEN".to_string(),
                    message: "Only authorized users can view stored sentiment history."
                        .to_string(),
                },
            ),
            SentimindError::Transition(e) => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "ILLEGAL_TRANSITION".to_string(),
                    message: e.to_string(),
                },
            ),
            SentimindError::DatabaseError(_)
            | SentimindError::ModelLoad(_)
            | SentimindError::CookieKey(_) => {
                tracing::error!(error = %self, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
