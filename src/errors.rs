use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use jsonwebtoken::errors::{ErrorKind, Error as JwtError};
use derive_more::Display;

use crate::entities::contact::ContactResponse;

/// HTTP-facing error. Every variant renders in the contact response shape
/// `{success: false, message, errors?}` so the site's form script can show it.
#[derive(Debug, Display)]
pub enum AppError {
    #[display("Validation failed")]
    ValidationFailed(Vec<String>),

    #[display("Invalid submission")]
    InvalidSubmission,

    #[display("Too many requests. Please try again later.")]
    RateLimited,

    #[display("Sorry, there was an error sending your message. Please try again or contact us directly.")]
    MailFailure,

    #[display("Method not allowed")]
    MethodNotAllowed,

    #[display("{_0}")]
    BadRequest(String),

    #[display("Payload too large")]
    PayloadTooLarge,

    #[display("{_0}")]
    Unauthorized(String),

    #[display("An unexpected error occurred. Please try again later.")]
    InternalError(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationFailed(errors) => ContactResponse::failure_with_errors(
                self.to_string(),
                errors.clone(),
            ),
            AppError::InternalError(detail) => {
                tracing::error!("Internal error: {}", detail);
                ContactResponse::failure(self.to_string())
            }
            _ => ContactResponse::failure(self.to_string()),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidSubmission => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::MailFailure => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        tracing::error!("Mail dispatch failed: {}", err);
        AppError::MailFailure
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::PasswordError(detail) => AppError::InternalError(detail),
            AuthError::TokenCreation => AppError::InternalError(err.to_string()),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();

        AppError::ValidationFailed(messages)
    }
}

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Failed to start mail transport: {_0}")]
    Spawn(String),

    #[display("Mail transport exited with status {_0}")]
    TransportStatus(String),

    #[display("Mail transport I/O error: {_0}")]
    Io(String),
}

impl From<std::io::Error> for MailError {
    fn from(err: std::io::Error) -> Self {
        MailError::Io(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum StorageError {
    #[display("IO error on {path}: {message}")]
    Io { path: String, message: String },

    #[display("Corrupt data in {path}: {message}")]
    Corrupt { path: String, message: String },
}

impl StorageError {
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        StorageError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Display, Clone)]
pub enum AuthError {
    #[display("Invalid password")]
    WrongCredentials,

    #[display("Admin access is disabled")]
    AdminDisabled,

    #[display("Missing session")]
    MissingCredentials,

    #[display("Invalid session")]
    InvalidToken,

    #[display("Session expired")]
    TokenExpired,

    #[display("Session revoked")]
    TokenRevoked,

    #[display("Session creation error")]
    TokenCreation,

    #[display("Password error: {_0}")]
    PasswordError(String),
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        AppError::from(self.clone()).error_response()
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenCreation | AuthError::PasswordError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::PasswordError(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}
