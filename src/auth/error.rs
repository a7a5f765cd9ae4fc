// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! The wording and status of each rejection is part of the API contract that
//! the booking frontend relies on, including the instructor check answering
//! 401 where the admin check answers 403.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

const UNAUTHORIZED_MESSAGE: &str = "unauthorized access";
const FORBIDDEN_MESSAGE: &str = "forbidden message";
const NOT_INSTRUCTOR_MESSAGE: &str = "Unauthorized access";
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Authentication error type.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    InvalidAuthHeader,
    /// Bad signature, malformed or expired token
    InvalidToken,
    /// Caller is not an admin
    Forbidden,
    /// Caller is not an instructor
    NotInstructor,
    /// Role lookup could not read the user store
    StorageUnavailable,
    /// Signing failed
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: bool,
    message: String,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken
            | AuthError::NotInstructor => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::StorageUnavailable | AuthError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken => f.write_str(UNAUTHORIZED_MESSAGE),
            AuthError::Forbidden => f.write_str(FORBIDDEN_MESSAGE),
            AuthError::NotInstructor => f.write_str(NOT_INSTRUCTOR_MESSAGE),
            AuthError::StorageUnavailable | AuthError::InternalError(_) => {
                f.write_str(INTERNAL_MESSAGE)
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::InternalError(detail) = &self {
            tracing::error!(%detail, "token signing failed");
        }
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: true,
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
