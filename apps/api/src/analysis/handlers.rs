//! Axum route handlers for the Analysis API.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::analysis::analyzer::{answer_follow_up, run_analysis};
use crate::analysis::mode::AnalysisMode;
use crate::analysis::models::{AnalysisReport, FollowUpReport, FollowUpRequest};
use crate::errors::{AppError, AppJson};
use crate::extraction::UploadedDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Form parsing
// ────────────────────────────────────────────────────────────────────────────

/// Fields of the analyze form after parsing. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct AnalysisForm {
    pub document: Option<UploadedDocument>,
    pub job_description: String,
    pub mode: AnalysisMode,
    pub keyword_optimization: bool,
}

pub async fn read_analysis_form(multipart: &mut Multipart) -> Result<AnalysisForm, AppError> {
    let mut form = AnalysisForm {
        keyword_optimization: true,
        ..AnalysisForm::default()
    };

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().map(str::to_string);
                debug!(
                    "Received resume upload {:?} ({:?})",
                    file_name,
                    field.content_type()
                );
                let bytes = field.bytes().await.map_err(malformed)?;
                form.document = Some(UploadedDocument::new(bytes, file_name));
            }
            "job_description" => form.job_description = text(field).await?,
            "mode" => {
                let raw = text(field).await?;
                if !raw.trim().is_empty() {
                    form.mode = raw.parse()?;
                }
            }
            "keyword_optimization" => {
                form.keyword_optimization = parse_toggle(&text(field).await?)?;
            }
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(form)
}

async fn text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(malformed)
}

fn malformed(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(
            "Upload exceeds the configured size limit".to_string(),
        );
    }
    AppError::Validation(format!("Malformed multipart body: {e}"))
}

/// Parses the checkbox value sent by HTML forms and JSON-minded clients alike.
/// An absent field keeps the default (on); a field sent with an empty value is off.
fn parse_toggle(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "" | "false" | "off" | "0" | "no" => Ok(false),
        other => Err(AppError::Validation(format!(
            "keyword_optimization must be a boolean, got '{other}'"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart form: `resume` (PDF file), `job_description`, `mode`,
/// `keyword_optimization`. Extracts the resume and returns the model's analysis.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let form = read_analysis_form(&mut multipart).await?;

    let report = run_analysis(
        state.llm.as_ref(),
        form.document,
        form.job_description,
        form.mode,
        form.keyword_optimization,
    )
    .await?;

    Ok(Json(report))
}

/// POST /api/v1/follow-up
///
/// Answers a question about a previously analyzed resume. The client sends the
/// document text and prior analysis back with every question.
pub async fn handle_follow_up(
    State(state): State<AppState>,
    AppJson(request): AppJson<FollowUpRequest>,
) -> Result<Json<FollowUpReport>, AppError> {
    let report = answer_follow_up(state.llm.as_ref(), request).await?;
    Ok(Json(report))
}
