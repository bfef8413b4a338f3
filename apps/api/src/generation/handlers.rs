//! Axum route handlers for the Generation API.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::analyze_job_description;
use crate::errors::AppError;
use crate::generation::anecdotes::{load_anecdotes, Anecdote};
use crate::generation::cover_letter::{generate_cover_letter, CoverLetterInput, UserInfo};
use crate::generation::interview_prep::generate_interview_prep;
use crate::generation::optimizer::{
    optimize_resume_iteratively, render_optimization_report, OptimizationResult, ResumeDocument,
};
use crate::generation::research::CompanyResearch;
use crate::generation::templates::Tone;
use crate::state::AppState;
use crate::storage::{
    cover_letter_key, interview_prep_key, optimization_report_key, optimized_resume_key,
    DocumentKind, MARKDOWN,
};
use crate::tracking::repository;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub user: UserInfo,
    #[serde(default)]
    pub research: CompanyResearch,
    pub jd_text: String,
    pub position: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub custom_notes: Option<String>,
    /// Inline anecdotes. When empty, `ANECDOTES_DIR` is read instead.
    #[serde(default)]
    pub anecdotes: Vec<Anecdote>,
    #[serde(default)]
    pub application_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewPrepRequest {
    #[serde(default)]
    pub research: CompanyResearch,
    pub jd_text: String,
    pub position: String,
    #[serde(default)]
    pub anecdotes: Vec<Anecdote>,
    #[serde(default)]
    pub application_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct InterviewPrepResponse {
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeResumeRequest {
    /// Markdown resume with optional YAML frontmatter.
    pub resume_markdown: String,
    pub jd_text: String,
    /// Overrides `ATS_TARGET_SCORE`.
    #[serde(default)]
    pub target_score: Option<f64>,
    /// Overrides `OPTIMIZER_MAX_ITERATIONS`.
    #[serde(default)]
    pub max_iterations: Option<u32>,
    #[serde(default)]
    pub application_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResumeResponse {
    pub result: OptimizationResult,
    pub optimized_markdown: String,
    pub report: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_key: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Inline anecdotes win; otherwise the configured anecdote directory is read.
async fn resolve_anecdotes(state: &AppState, inline: Vec<Anecdote>) -> Result<Vec<Anecdote>, AppError> {
    if !inline.is_empty() {
        return Ok(inline);
    }
    let Some(dir) = state.config.anecdotes_dir.clone() else {
        return Ok(Vec::new());
    };

    let anecdotes = tokio::task::spawn_blocking(move || load_anecdotes(&dir))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("anecdote loading task failed: {e}")))??;
    Ok(anecdotes)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cover-letters
///
/// Generates a cover letter. With `application_id`, the letter is stored and
/// the application is marked as having used it.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    require(&request.jd_text, "jd_text")?;
    require(&request.position, "position")?;

    let analysis = analyze_job_description(&request.jd_text);
    let anecdotes = resolve_anecdotes(&state, request.anecdotes).await?;

    let input = CoverLetterInput {
        user: &request.user,
        research: &request.research,
        analysis: &analysis,
        anecdotes: &anecdotes,
        position: request.position.trim(),
        tone: request.tone,
        custom_notes: request.custom_notes.as_deref(),
    };
    let cover_letter = generate_cover_letter(&input, &mut StdRng::from_entropy());

    let mut document_key = None;
    if let Some(application_id) = request.application_id {
        let key = cover_letter_key(application_id);
        repository::record_cover_letter(&state.db, application_id, &key).await?;
        state
            .store
            .put(&key, cover_letter.clone().into_bytes(), MARKDOWN)
            .await?;
        info!("Stored cover letter for application {application_id}");
        document_key = Some(key);
    }

    Ok(Json(CoverLetterResponse {
        cover_letter,
        document_key,
    }))
}

/// GET /api/v1/applications/:id/documents/:kind
///
/// Returns a stored document as markdown. `kind` is one of `resume`,
/// `cover-letter`, `interview-prep` or `optimization-report`.
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path((application_id, kind)): Path<(Uuid, DocumentKind)>,
) -> Result<Response, AppError> {
    let body = state.store.get(&kind.key(application_id)).await?;
    Ok(([(header::CONTENT_TYPE, MARKDOWN)], body).into_response())
}

/// POST /api/v1/interview-prep
pub async fn handle_generate_interview_prep(
    State(state): State<AppState>,
    Json(request): Json<InterviewPrepRequest>,
) -> Result<Json<InterviewPrepResponse>, AppError> {
    require(&request.jd_text, "jd_text")?;
    require(&request.position, "position")?;

    let analysis = analyze_job_description(&request.jd_text);
    let anecdotes = resolve_anecdotes(&state, request.anecdotes).await?;
    let document = generate_interview_prep(
        &request.research,
        &analysis,
        &anecdotes,
        request.position.trim(),
    );

    let mut document_key = None;
    if let Some(application_id) = request.application_id {
        // 404 before anything is written for an unknown application
        repository::get_application(&state.db, application_id).await?;
        let key = interview_prep_key(application_id);
        state
            .store
            .put(&key, document.clone().into_bytes(), MARKDOWN)
            .await?;
        info!("Stored interview prep for application {application_id}");
        document_key = Some(key);
    }

    Ok(Json(InterviewPrepResponse {
        document,
        document_key,
    }))
}

/// POST /api/v1/resumes/optimize
///
/// Iteratively works missing JD keywords into a markdown resume. With
/// `application_id`, the optimized resume and its report are stored and the
/// application's `resume_path` is updated.
pub async fn handle_optimize_resume(
    State(state): State<AppState>,
    Json(request): Json<OptimizeResumeRequest>,
) -> Result<Json<OptimizeResumeResponse>, AppError> {
    require(&request.resume_markdown, "resume_markdown")?;
    require(&request.jd_text, "jd_text")?;

    let target_score = request.target_score.unwrap_or(state.config.ats_target_score);
    if !(0.0..=100.0).contains(&target_score) {
        return Err(AppError::Validation(
            "target_score must be between 0 and 100".to_string(),
        ));
    }
    let max_iterations = request
        .max_iterations
        .unwrap_or(state.config.optimizer_max_iterations);

    let document = ResumeDocument::parse(&request.resume_markdown)
        .map_err(|e| AppError::UnprocessableEntity(format!("invalid resume frontmatter: {e}")))?;
    let analysis = analyze_job_description(&request.jd_text);

    let result = optimize_resume_iteratively(document, &analysis, target_score, max_iterations);
    let optimized_markdown = result
        .final_resume
        .to_markdown()
        .map_err(|e| AppError::Internal(e.into()))?;
    let report = render_optimization_report(&result);
    info!(
        "Optimized resume in {} iteration(s), final score {:.1}",
        result.iterations.len(),
        result.final_score
    );

    let (mut resume_key, mut report_key) = (None, None);
    if let Some(application_id) = request.application_id {
        let resume = optimized_resume_key(application_id);
        let report_path = optimization_report_key(application_id);
        repository::record_resume_path(&state.db, application_id, &resume).await?;
        state
            .store
            .put(&resume, optimized_markdown.clone().into_bytes(), MARKDOWN)
            .await?;
        state
            .store
            .put(&report_path, report.clone().into_bytes(), MARKDOWN)
            .await?;
        resume_key = Some(resume);
        report_key = Some(report_path);
    }

    Ok(Json(OptimizeResumeResponse {
        result,
        optimized_markdown,
        report,
        resume_key,
        report_key,
    }))
}
