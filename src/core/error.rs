use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::types::response;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database migration error: {0}")]
    DatabaseMigration(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("Header decode error: {0}")]
    HeaderDecode(#[from] axum::http::header::ToStrError),
    #[error("No credentials provided")]
    NoCredentials,
    #[error("Expired token")]
    ExpiredToken,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("User not found")]
    UserNotFound,
    #[error("Employee not found")]
    EmployeeNotFound,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Email is already in use by another employee")]
    DuplicateEmail,
    #[error("Invalid username")]
    InvalidUsername,
    #[error("{0}")]
    Validation(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("{:?}", self);

        let (status, message) = match &self {
            Error::Sql(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
            Error::Jwt(_) => (StatusCode::UNAUTHORIZED, "Invalid token"),
            Error::Bcrypt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
            Error::HeaderDecode(_) => (StatusCode::UNAUTHORIZED, "Invalid authorization header"),
            Error::NoCredentials => (StatusCode::UNAUTHORIZED, "No token provided"),
            Error::ExpiredToken => (StatusCode::UNAUTHORIZED, "Expired token"),
            Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid username or password")
            }
            Error::Forbidden => (StatusCode::FORBIDDEN, "Admin access required"),
            Error::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            Error::EmployeeNotFound => (StatusCode::NOT_FOUND, "Employee not found"),
            Error::UsernameTaken => (StatusCode::BAD_REQUEST, "Username already exists"),
            Error::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                "Email is already in use by another employee",
            ),
            Error::InvalidUsername => (StatusCode::BAD_REQUEST, "Invalid username"),
            Error::Validation(detail) => (StatusCode::BAD_REQUEST, detail.as_str()),
        };

        (status, Json(response::Message::new(message))).into_response()
    }
}
