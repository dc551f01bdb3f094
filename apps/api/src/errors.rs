use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Every collaborator failure is converted into one of these kinds before it reaches a
/// handler's caller, so no raw transport error ever crosses the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session store error: {0}")]
    Session(#[from] redis::RedisError),

    #[error("Integration error: {0}")]
    Integration(String),

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: &'static str, seconds: u64 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_)
            | AppError::Session(_)
            | AppError::Integration(_)
            | AppError::Timeout { .. } => "INTEGRATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "The talent database could not be reached".to_string(),
                )
            }
            AppError::Session(e) => {
                tracing::error!("Session store error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "The session store could not be reached".to_string(),
                )
            }
            AppError::Integration(msg) => {
                tracing::error!("Integration error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "The matching engine could not be reached".to_string(),
                )
            }
            AppError::Timeout { .. } => {
                tracing::error!("{self}");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Configuration(msg) => {
                tracing::warn!("Configuration error: {msg}");
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_failures_share_integration_code() {
        assert_eq!(
            AppError::Integration("boom".into()).code(),
            "INTEGRATION_ERROR"
        );
        assert_eq!(
            AppError::Timeout {
                operation: "match query",
                seconds: 20
            }
            .code(),
            "INTEGRATION_ERROR"
        );
        assert_eq!(AppError::Database(sqlx::Error::PoolTimedOut).code(), "INTEGRATION_ERROR");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Integration("x".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::Configuration("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_timeout_message_names_operation() {
        let err = AppError::Timeout {
            operation: "match query",
            seconds: 20,
        };
        assert_eq!(err.to_string(), "match query timed out after 20s");
    }
}
