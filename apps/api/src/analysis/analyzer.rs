//! Resume analysis: orchestrates one analysis or follow-up.
//!
//! Flow: extract → select template → render prompt → analyze.
//! Follow-up: render follow-up prompt → analyze. One API call per request, never retried.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::mode::AnalysisMode;
use crate::analysis::models::{
    AnalysisReport, AnalysisRequest, AnalysisResponse, FollowUpReport, FollowUpRequest,
};
use crate::analysis::prompts::{render_follow_up, select_template};
use crate::errors::AppError;
use crate::extraction::{extract_blocking, UploadedDocument};
use crate::llm_client::TextGenerator;

/// Sends the document text and prompt to the model as the context of a single
/// completion and returns its text unmodified.
pub async fn analyze(
    llm: &dyn TextGenerator,
    document_text: &str,
    prompt: &str,
) -> Result<AnalysisResponse, AppError> {
    debug!(
        "Calling {} with {} chars of document and {} chars of prompt",
        llm.model(),
        document_text.len(),
        prompt.len()
    );

    let text = llm.generate(&[document_text, prompt]).await?;
    Ok(AnalysisResponse { text })
}

/// Renders the mode's template over the request.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    select_template(request.mode).render(&request.document_text, &request.job_description)
}

/// Runs a full analysis of an uploaded resume.
///
/// A missing document fails before anything else happens, so the model is never
/// called without one.
pub async fn run_analysis(
    llm: &dyn TextGenerator,
    document: Option<UploadedDocument>,
    job_description: String,
    mode: AnalysisMode,
    keyword_optimization: bool,
) -> Result<AnalysisReport, AppError> {
    let document =
        document.ok_or_else(|| AppError::MissingInput("No file uploaded".to_string()))?;

    let analysis_id = Uuid::new_v4();
    info!("Analysis {analysis_id}: mode={mode}, keyword_optimization={keyword_optimization}");

    let extracted = extract_blocking(document).await?;

    let request = AnalysisRequest {
        document_text: extracted.text.clone(),
        job_description,
        mode,
    };
    let prompt = build_prompt(&request);
    let analysis = analyze(llm, &request.document_text, &prompt).await?;

    info!(
        "Analysis {analysis_id} complete: {} chars returned",
        analysis.text.len()
    );

    Ok(AnalysisReport {
        analysis_id,
        mode,
        model: llm.model().to_string(),
        document: extracted,
        job_description: request.job_description,
        analysis,
        keyword_optimization,
        generated_at: Utc::now(),
    })
}

/// Answers a follow-up question with one self-contained call.
pub async fn answer_follow_up(
    llm: &dyn TextGenerator,
    request: FollowUpRequest,
) -> Result<FollowUpReport, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }

    let answer_id = Uuid::new_v4();
    info!("Follow-up {answer_id}: question of {} chars", request.question.len());

    let prompt = render_follow_up(
        &request.document_text,
        &request.prior_analysis,
        &request.question,
    );
    let answer = analyze(llm, &request.document_text, &prompt).await?;

    Ok(FollowUpReport {
        answer_id,
        model: llm.model().to_string(),
        question: request.question,
        answer,
        generated_at: Utc::now(),
    })
}
