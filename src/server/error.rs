use crate::utils::error::DashboardError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

pub const AUTH_FAILED: &str = "Error en autenticación";

/// HTTP-facing error; every variant renders as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound(String),
    /// Body extraction failure; keeps axum's status (400, 415 or 422).
    Rejected(StatusCode, String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected(status, _) => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::Unauthorized => AUTH_FAILED,
            ApiError::NotFound(detail)
            | ApiError::Rejected(_, detail)
            | ApiError::Internal(detail) => detail,
        }
    }

    /// Wraps a failure with the operation that produced it.
    pub fn context(action: &str) -> impl Fn(DashboardError) -> ApiError + '_ {
        move |error| match ApiError::from(error) {
            ApiError::Internal(detail) => ApiError::Internal(format!("{}: {}", action, detail)),
            other => other,
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(error: DashboardError) -> Self {
        match error {
            DashboardError::AuthenticationError { message } => {
                tracing::warn!("🔒 Authentication rejected: {}", message);
                ApiError::Unauthorized
            }
            DashboardError::NotFoundError { message } => ApiError::NotFound(message),
            other => {
                tracing::error!(
                    "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                    other,
                    other.category(),
                    other.severity()
                );
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.detail() });
        (self.status(), Json(body)).into_response()
    }
}
