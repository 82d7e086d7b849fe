//! Error taxonomy shared by every command; rendered as the JSON failure
//! envelope `{"success": false, "error": ..., "code": ...}`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input (empty name, non-positive duration, short route).
    #[error("{0}")]
    Validation(String),

    /// Unknown league / game / activity / invite code.
    #[error("{0}")]
    NotFound(String),

    /// Caller lacks the required role or membership.
    #[error("{0}")]
    Authorization(String),

    /// A member/base-count gate is not met; the message names the condition.
    #[error("{0}")]
    Precondition(String),

    /// The entity is in the wrong lifecycle state for this operation.
    #[error("{0}")]
    State(String),

    /// Duplicate base, duplicate membership, already-processed activity.
    #[error("{0}")]
    Conflict(String),

    /// League is full.
    #[error("{0}")]
    Capacity(String),

    /// Transient storage/transport fault; safe to resubmit.
    #[error("{0}")]
    Retryable(String),
}

impl Error {
    /// Machine-readable error kind for the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::NotFound(_) => "not_found_error",
            Error::Authorization(_) => "authorization_error",
            Error::Precondition(_) => "precondition_error",
            Error::State(_) => "state_error",
            Error::Conflict(_) => "conflict_error",
            Error::Capacity(_) => "capacity_error",
            Error::Retryable(_) => "retryable_error",
        }
    }
}

/// Postgres SQLSTATE classes that are worth an automatic or caller retry:
/// serialization failures, deadlocks, lock / statement timeouts.
const RETRYABLE_SQLSTATES: [&str; 4] = ["40001", "40P01", "55P03", "57014"];

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some("23505") => Error::Conflict("duplicate record".into()),
                Some(code) if RETRYABLE_SQLSTATES.contains(&code) => {
                    Error::Retryable("storage contention, please retry".into())
                }
                _ => {
                    log::error!("database error: {e:?}");
                    Error::Retryable("storage error, please retry".into())
                }
            },
            sqlx::Error::RowNotFound => Error::NotFound("record not found".into()),
            _ => {
                log::error!("storage fault: {e:?}");
                Error::Retryable("storage error, please retry".into())
            }
        }
    }
}

impl Error {
    /// True when the claim path may transparently re-run the transaction.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Retryable(_))
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Authorization(_) => StatusCode::FORBIDDEN,
            Error::Precondition(_) | Error::State(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Capacity(_) => StatusCode::CONFLICT,
            Error::Retryable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
            "code": self.code(),
        }))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
