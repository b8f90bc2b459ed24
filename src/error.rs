/*
 * Responsibility
 * - アプリ共通の AppError 定義 (operational な種別 + 下位レイヤのエラー / extractor rejection)
 * - normalize(): どのエラーも {status, message, is_operational} に一元的に分類する
 * - IntoResponse 実装 (production で安全な JSON body)。raw error は response extensions に載せ、
 *   middleware::errors がログ出力と dev 用 stack 付与を行う
 */
use std::{error::Error as StdError, sync::Arc};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::v1::extractors::ValidationErrors;
use crate::repos::error::RepoError;
use crate::services::auth::access_jwt::TokenError;

pub const INTERNAL_MESSAGE: &str = "internal server error";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    /// Unanticipated failure; the message never reaches production clients.
    #[error("{0}")]
    Internal(String),

    // Raised by lower layers and classified in `normalize`.
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Rejection(#[from] JsonRejection),
    #[error(transparent)]
    PathRejected(#[from] PathRejection),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// The stable, user-facing shape every failure is reduced to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedError {
    pub status: StatusCode,
    pub message: String,
    pub is_operational: bool,
}

impl NormalizedError {
    fn operational(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            is_operational: true,
        }
    }

    fn unanticipated(message: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: if message.trim().is_empty() {
                INTERNAL_MESSAGE.to_string()
            } else {
                message
            },
            is_operational: false,
        }
    }

    /// Message safe to show the caller in the given mode.
    pub fn public_message(&self, production: bool) -> &str {
        if production && !self.is_operational {
            INTERNAL_MESSAGE
        } else {
            &self.message
        }
    }
}

impl AppError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classifies any failure. First matching arm wins:
    /// persistence constraint kinds, other persistence failures, input
    /// validation, token errors, then the error's own status and message.
    pub fn normalize(&self) -> NormalizedError {
        use NormalizedError as N;

        match self {
            AppError::Repo(RepoError::UniqueViolation(_)) => N::operational(
                StatusCode::CONFLICT,
                "a resource with this information already exists",
            ),
            AppError::Repo(RepoError::RecordNotFound) => {
                N::operational(StatusCode::NOT_FOUND, "resource not found")
            }
            AppError::Repo(RepoError::ForeignKeyViolation(_)) => N::operational(
                StatusCode::BAD_REQUEST,
                "foreign key constraint violation",
            ),
            AppError::Repo(RepoError::Query(_)) => {
                N::operational(StatusCode::INTERNAL_SERVER_ERROR, "database error")
            }
            AppError::Repo(RepoError::InvalidData(_)) => {
                N::operational(StatusCode::BAD_REQUEST, "invalid data")
            }
            AppError::Validation(errors) => {
                N::operational(StatusCode::BAD_REQUEST, errors.summary())
            }
            AppError::Token(TokenError::Invalid(_) | TokenError::InvalidSubject) => {
                N::operational(StatusCode::UNAUTHORIZED, "invalid token")
            }
            AppError::Token(TokenError::Expired) => {
                N::operational(StatusCode::UNAUTHORIZED, "token expired")
            }

            AppError::Unauthenticated(m) => N::operational(StatusCode::UNAUTHORIZED, m.as_str()),
            AppError::Forbidden(m) => N::operational(StatusCode::FORBIDDEN, m.as_str()),
            AppError::Conflict(m) => N::operational(StatusCode::CONFLICT, m.as_str()),
            AppError::NotFound(m) => N::operational(StatusCode::NOT_FOUND, m.as_str()),
            AppError::BadRequest(m) => N::operational(StatusCode::BAD_REQUEST, m.as_str()),
            AppError::MethodNotAllowed => {
                N::operational(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
            }
            AppError::Rejection(rejection) => {
                N::operational(rejection.status(), rejection.body_text())
            }
            // body_text() carries parser details; only the status is passed on
            AppError::PathRejected(rejection) if rejection.status().is_client_error() => {
                N::operational(rejection.status(), "invalid path parameter")
            }
            AppError::PathRejected(rejection) => N::unanticipated(rejection.body_text()),
            AppError::Internal(m) => N::unanticipated(m.clone()),
            AppError::Unexpected(err) => N::unanticipated(err.to_string()),
        }
    }

    /// Debug rendering plus the `source()` chain, for development responses.
    pub fn trace(&self) -> String {
        let mut out = format!("{self:?}");
        let mut source = self.source();
        while let Some(cause) = source {
            out.push_str("\n  caused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }

    /// Response for this error. `with_stack` is only ever true outside production.
    pub fn render(&self, production: bool, with_stack: bool) -> Response {
        let normalized = self.normalize();
        let body = ErrorResponse {
            success: false,
            error: normalized.public_message(production).to_string(),
            stack: (with_stack && !production).then(|| self.trace()),
        };

        (normalized.status, Json(body)).into_response()
    }
}

/// Raw error carried on a failed response, consumed by the ErrorNormalizer layer.
#[derive(Debug, Clone)]
pub struct ErrorReport(pub Arc<AppError>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = self.render(true, false);
        response
            .extensions_mut()
            .insert(ErrorReport(Arc::new(self)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(err: AppError) -> (u16, String) {
        let n = err.normalize();
        (n.status.as_u16(), n.message)
    }

    fn protocol_error() -> sqlx::Error {
        sqlx::Error::Protocol("simulated driver failure".into())
    }

    #[test]
    fn unique_violation_is_conflict() {
        let (status, message) = normalized(RepoError::UniqueViolation(protocol_error()).into());
        assert_eq!(status, 409);
        assert!(message.contains("already exists"));
    }

    #[test]
    fn persistence_kinds_follow_the_table() {
        assert_eq!(
            normalized(RepoError::RecordNotFound.into()),
            (404, "resource not found".to_string())
        );
        assert_eq!(
            normalized(RepoError::ForeignKeyViolation(protocol_error()).into()),
            (400, "foreign key constraint violation".to_string())
        );
        assert_eq!(
            normalized(RepoError::Query(sqlx::Error::PoolTimedOut).into()),
            (500, "database error".to_string())
        );
        assert_eq!(
            normalized(RepoError::InvalidData(sqlx::Error::ColumnNotFound("email".into())).into()),
            (400, "invalid data".to_string())
        );
    }

    #[test]
    fn validation_issues_are_joined() {
        let mut errors = ValidationErrors::new();
        errors.push(&["email"], "required");
        errors.push(&["lastName"], "must not be empty");

        let (status, message) = normalized(errors.into());
        assert_eq!(status, 400);
        assert_eq!(message, "email: required, lastName: must not be empty");
    }

    #[test]
    fn token_errors_are_unauthenticated() {
        assert_eq!(
            normalized(TokenError::Expired.into()),
            (401, "token expired".to_string())
        );
        assert_eq!(
            normalized(TokenError::InvalidSubject.into()),
            (401, "invalid token".to_string())
        );
    }

    #[test]
    fn operational_variants_keep_their_status_and_message() {
        assert_eq!(
            normalized(AppError::forbidden("insufficient permissions")),
            (403, "insufficient permissions".to_string())
        );
        assert_eq!(
            normalized(AppError::conflict("slot taken")),
            (409, "slot taken".to_string())
        );
        assert_eq!(
            normalized(AppError::not_found("appointment not found")),
            (404, "appointment not found".to_string())
        );
        assert_eq!(
            normalized(AppError::MethodNotAllowed),
            (405, "method not allowed".to_string())
        );
    }

    #[test]
    fn foreign_errors_default_to_500() {
        let err = AppError::from(anyhow::anyhow!("disk on fire"));
        let n = err.normalize();
        assert_eq!(n.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!n.is_operational);
        assert_eq!(n.public_message(true), INTERNAL_MESSAGE);
        assert_eq!(n.public_message(false), "disk on fire");
    }

    #[test]
    fn blank_internal_message_falls_back() {
        let n = AppError::internal("").normalize();
        assert_eq!(n.message, INTERNAL_MESSAGE);
    }

    #[test]
    fn into_response_is_production_safe_and_carries_the_report() {
        let response = AppError::internal("secret detail").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }

    #[test]
    fn trace_includes_the_source_chain() {
        let err = AppError::from(RepoError::Query(protocol_error()));
        let trace = err.trace();
        assert!(trace.contains("Query"));
        assert!(trace.contains("simulated driver failure"));
    }
}
