use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, AppJson};

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// POST /api/v1/feedback
///
/// Acknowledges user feedback. Only checks that the message is not blank;
/// nothing is stored.
pub async fn handle_feedback(
    AppJson(request): AppJson<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter some feedback before submitting".to_string(),
        ));
    }

    info!("Feedback received ({} chars)", request.message.len());

    Ok(Json(FeedbackResponse {
        status: "received",
        message: "Thank you for your feedback!",
    }))
}
