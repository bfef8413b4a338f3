//! Axum route handlers for the Company Analysis API.

use axum::Json;
use serde::Serialize;

use crate::company::analyzer::{analyze_company, CompanyAnalysis, CompanyProfile};
use crate::errors::AppError;

#[derive(Debug, Serialize)]
pub struct AnalyzeCompanyResponse {
    pub analysis: CompanyAnalysis,
}

/// POST /api/v1/companies/analyze
///
/// Synthesizes flags, talking points and interview insights from
/// user-supplied company research.
pub async fn handle_analyze_company(
    Json(profile): Json<CompanyProfile>,
) -> Result<Json<AnalyzeCompanyResponse>, AppError> {
    if profile.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let analysis = analyze_company(&profile);
    tracing::debug!(
        company = %profile.name,
        green = analysis.green_flags.len(),
        red = analysis.red_flags.len(),
        "Company analyzed"
    );

    Ok(Json(AnalyzeCompanyResponse { analysis }))
}
