//! Axum route handlers for the ATS Scoring API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::scoring::ats::score_resume;
use crate::scoring::models::AtsScore;
use crate::state::AppState;
use crate::tracking::repository;

#[derive(Debug, Deserialize)]
pub struct AtsScoreRequest {
    pub resume_text: String,
    pub jd_text: String,
    /// When set, the overall score is recorded on this application.
    #[serde(default)]
    pub application_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AtsScoreResponse {
    pub score: AtsScore,
}

/// POST /api/v1/ats/score
///
/// Scores a resume against a JD: keyword match, formatting, skills alignment
/// and section structure, plus prioritized recommendations.
pub async fn handle_ats_score(
    State(state): State<AppState>,
    Json(request): Json<AtsScoreRequest>,
) -> Result<Json<AtsScoreResponse>, AppError> {
    let score = score_resume(&request.resume_text, &request.jd_text)?;

    if let Some(application_id) = request.application_id {
        repository::record_ats_score(&state.db, application_id, score.overall_score).await?;
        info!(
            "Recorded ATS score {:.2} on application {application_id}",
            score.overall_score
        );
    }

    Ok(Json(AtsScoreResponse { score }))
}
