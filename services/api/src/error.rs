//! Custom error types for the API service
//!
//! One variant per failure in the auth and booking taxonomies, so callers
//! match exhaustively instead of inspecting loosely-typed fields. The
//! `IntoResponse` impl is the single boundary that maps every variant to
//! an HTTP status, a machine-readable tag, and a human message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::models::BookingStatus;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access token is required")]
    MissingToken,

    #[error("Invalid or expired access token")]
    InvalidToken,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Your account has been deactivated")]
    AccountDeactivated,

    #[error("Please verify your email address")]
    EmailNotVerified,

    #[error("You don't have permission to access this resource")]
    InsufficientPermissions,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Selected package not found")]
    PackageNotFound,

    #[error("You are not authorized to perform this action on this booking")]
    NotAuthorized,

    #[error("Booking is already in '{0}' status")]
    NoOpTransition(BookingStatus),

    #[error(
        "Cannot change status from '{from}' to '{to}'. Invalid transition or insufficient permissions."
    )]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Booking was modified concurrently, please retry")]
    Conflict,

    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Database error")]
    Database(#[from] common::error::DatabaseError),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Short machine-readable status tag carried in every error body
    pub fn status_tag(&self) -> &'static str {
        match self {
            ApiError::MissingToken => "MISSING_TOKEN",
            ApiError::InvalidToken => "INVALID_TOKEN",
            ApiError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::UserNotFound => "USER_NOT_FOUND",
            ApiError::AccountDeactivated => "ACCOUNT_DEACTIVATED",
            ApiError::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            ApiError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            ApiError::BookingNotFound => "BOOKING_NOT_FOUND",
            ApiError::PackageNotFound => "PACKAGE_NOT_FOUND",
            ApiError::NotAuthorized => "NOT_AUTHORIZED",
            ApiError::NoOpTransition(_) => "ALREADY_IN_STATUS",
            ApiError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ApiError::Conflict => "CONFLICT",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken
            | ApiError::InvalidToken
            | ApiError::InvalidRefreshToken
            | ApiError::InvalidCredentials
            | ApiError::UserNotFound => StatusCode::UNAUTHORIZED,

            ApiError::AccountDeactivated
            | ApiError::EmailNotVerified
            | ApiError::InsufficientPermissions
            | ApiError::NotAuthorized => StatusCode::FORBIDDEN,

            ApiError::NoOpTransition(_)
            | ApiError::InvalidTransition { .. }
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,

            ApiError::BookingNotFound | ApiError::PackageNotFound => StatusCode::NOT_FOUND,

            ApiError::Conflict => StatusCode::CONFLICT,

            ApiError::Database(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Database(err) => {
                error!("database error: {err}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        // Validation failures additionally enumerate every failing field
        let body = match &self {
            ApiError::Validation(errors) => Json(json!({
                "status": self.status_tag(),
                "message": message,
                "errors": errors,
            })),
            _ => Json(json!({
                "status": self.status_tag(),
                "message": message,
            })),
        };

        (self.status_code(), body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
