use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::mode::AnalysisMode;
use crate::extraction::ExtractedText;

/// Inputs to one analysis, after extraction.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub document_text: String,
    pub job_description: String,
    pub mode: AnalysisMode,
}

/// Raw model output. Rendered by the client as-is (may contain Markdown).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnalysisResponse {
    pub text: String,
}

/// A follow-up question. Carries its full context explicitly; nothing is kept
/// server-side between turns.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowUpRequest {
    pub document_text: String,
    pub prior_analysis: String,
    pub question: String,
}

/// Response body of `POST /api/v1/analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub mode: AnalysisMode,
    pub model: String,
    pub document: ExtractedText,
    pub job_description: String,
    pub analysis: AnalysisResponse,
    /// Echo of the client's keyword-optimization toggle. Accepted but not used
    /// by any template.
    pub keyword_optimization: bool,
    pub generated_at: DateTime<Utc>,
}

/// Response body of `POST /api/v1/follow-up`.
#[derive(Debug, Clone, Serialize)]
pub struct FollowUpReport {
    pub answer_id: Uuid,
    pub model: String,
    pub question: String,
    pub answer: AnalysisResponse,
    pub generated_at: DateTime<Utc>,
}
