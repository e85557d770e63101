use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant is terminal for the request that produced it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Could not read document: {0}")]
    DocumentParse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Authentication with the generative API failed: {0}")]
    Authentication(String),

    #[error("Generative API unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code carried in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingInput(_) => "MISSING_INPUT",
            AppError::DocumentParse(_) => "DOCUMENT_PARSE_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Authentication(_) => "AUTHENTICATION_ERROR",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput(_)
            | AppError::Configuration(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DocumentParse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Authentication(_) | AppError::Llm(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Authentication(msg) => AppError::Authentication(msg),
            LlmError::Http(e) => AppError::ServiceUnavailable(e.to_string()),
            LlmError::Unavailable { status, message } => {
                AppError::ServiceUnavailable(format!("status {status}: {message}"))
            }
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejections use the `AppError` body instead of axum's
/// plain-text one.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::MissingInput(msg)
            | AppError::DocumentParse(msg)
            | AppError::Configuration(msg)
            | AppError::Validation(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Authentication(msg) => {
                tracing::error!("Generative API rejected credentials: {msg}");
                "The analysis service rejected the configured API credential".to_string()
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Generative API unavailable: {msg}");
                "The analysis service is currently unavailable".to_string()
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                "An AI processing error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
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
    fn test_input_errors_are_client_errors() {
        assert_eq!(
            AppError::MissingInput("no file".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Configuration("bad mode".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DocumentParse("corrupt".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        let too_large = AppError::PayloadTooLarge("limit".into());
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(too_large.code(), "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn test_upstream_errors_map_to_gateway_statuses() {
        assert_eq!(
            AppError::Authentication("bad key".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::ServiceUnavailable("down".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_llm_error_conversion_keeps_taxonomy() {
        let auth: AppError = LlmError::Authentication("API key not valid".into()).into();
        assert_eq!(auth.code(), "AUTHENTICATION_ERROR");

        let down: AppError = LlmError::Unavailable {
            status: 503,
            message: "overloaded".into(),
        }
        .into();
        assert_eq!(down.code(), "SERVICE_UNAVAILABLE");

        let empty: AppError = LlmError::EmptyContent.into();
        assert_eq!(empty.code(), "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::MissingInput("No file uploaded".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "MISSING_INPUT");
        assert_eq!(body["error"]["message"], "No file uploaded");
    }
}
