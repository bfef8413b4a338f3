//! Axum route handlers for the JD Analysis API.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analysis::jd_analyzer::{analyze_job_description, JdAnalysis};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct AnalyzeJdRequest {
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJdResponse {
    pub analysis: JdAnalysis,
}

/// POST /api/v1/jd/analyze
///
/// Runs keyword, requirement and seniority extraction over a raw JD.
pub async fn handle_analyze_jd(
    Json(request): Json<AnalyzeJdRequest>,
) -> Result<Json<AnalyzeJdResponse>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let analysis = analyze_job_description(&request.jd_text);
    tracing::debug!(
        keywords = analysis.ats_keywords.len(),
        seniority = ?analysis.seniority,
        "JD analyzed"
    );

    Ok(Json(AnalyzeJdResponse { analysis }))
}
