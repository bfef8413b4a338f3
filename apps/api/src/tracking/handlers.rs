//! Axum route handlers for the Tracking API.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::tracking::dashboard::{generate_dashboard, parse_date_filter, DashboardFormat, DashboardOptions};
use crate::tracking::models::{
    ActiveApplicationRow, ApplicationRow, ApplicationStageRow, ApplicationStatus,
    ApplicationUpdate, InterviewPerformanceRow, InterviewRow, InterviewUpdate,
    KeywordPerformanceInput, KeywordPerformanceRow, MetricsInput, MetricsRow, NewApplication,
    NewInterview, PipelineSummaryRow, TopKeywordRow,
};
use crate::tracking::repository::{self, ApplicationFilter, InterviewFilter, MetricsFilter};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub format: DashboardFormat,
    /// "last 3 months", "last 30 days", "this year" or "YYYY-MM-DD:YYYY-MM-DD".
    pub filter: Option<String>,
    /// Comma-separated statuses.
    pub include: Option<String>,
    pub exclude: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationRow>,
}

#[derive(Debug, Serialize)]
pub struct ActiveApplicationsResponse {
    pub applications: Vec<ActiveApplicationRow>,
}

#[derive(Debug, Serialize)]
pub struct StagesResponse {
    pub stages: Vec<ApplicationStageRow>,
}

#[derive(Debug, Serialize)]
pub struct InterviewsResponse {
    pub interviews: Vec<InterviewRow>,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: Vec<MetricsRow>,
}

#[derive(Debug, Serialize)]
pub struct TopKeywordsResponse {
    pub keywords: Vec<TopKeywordRow>,
}

#[derive(Debug, Serialize)]
pub struct KeywordPerformanceResponse {
    pub keywords: Vec<KeywordPerformanceRow>,
}

#[derive(Debug, Serialize)]
pub struct PipelineResponse {
    pub pipeline: Vec<PipelineSummaryRow>,
}

#[derive(Debug, Serialize)]
pub struct InterviewPerformanceResponse {
    pub companies: Vec<InterviewPerformanceRow>,
}

fn parse_status_list(raw: Option<&str>) -> Result<Option<Vec<ApplicationStatus>>, AppError> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<ApplicationStatus>, _>>()
    })
    .transpose()
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(new): Json<NewApplication>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let row = repository::create_application(&state.db, &new).await?;
    info!(id = %row.id, company = %row.company, "application created");
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/applications?status=&company=&limit=&offset=&order=
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(filter): Query<ApplicationFilter>,
) -> Result<Json<ApplicationsResponse>, AppError> {
    let applications = repository::list_applications(&state.db, &filter).await?;
    Ok(Json(ApplicationsResponse { applications }))
}

/// GET /api/v1/applications/active
pub async fn handle_active_applications(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ActiveApplicationsResponse>, AppError> {
    let applications = repository::active_applications(&state.db, query.limit).await?;
    Ok(Json(ActiveApplicationsResponse { applications }))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, AppError> {
    Ok(Json(repository::get_application(&state.db, id).await?))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ApplicationUpdate>,
) -> Result<Json<ApplicationRow>, AppError> {
    Ok(Json(repository::update_application(&state.db, id, &update).await?))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    repository::delete_application(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/applications/:id/stages
pub async fn handle_list_stages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StagesResponse>, AppError> {
    let stages = repository::list_stages(&state.db, id).await?;
    Ok(Json(StagesResponse { stages }))
}

// ────────────────────────────────────────────────────────────────────────────
// Interviews
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    Json(new): Json<NewInterview>,
) -> Result<(StatusCode, Json<InterviewRow>), AppError> {
    let row = repository::create_interview(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/interviews?application_id=&limit=&offset=
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    Query(filter): Query<InterviewFilter>,
) -> Result<Json<InterviewsResponse>, AppError> {
    let interviews = repository::list_interviews(&state.db, &filter).await?;
    Ok(Json(InterviewsResponse { interviews }))
}

/// PATCH /api/v1/interviews/:id
pub async fn handle_update_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<InterviewUpdate>,
) -> Result<Json<InterviewRow>, AppError> {
    Ok(Json(repository::update_interview(&state.db, id, &update).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Metrics & keywords
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/metrics?start_date=&end_date=&limit=
pub async fn handle_list_metrics(
    State(state): State<AppState>,
    Query(filter): Query<MetricsFilter>,
) -> Result<Json<MetricsResponse>, AppError> {
    let metrics = repository::list_metrics(&state.db, &filter).await?;
    Ok(Json(MetricsResponse { metrics }))
}

/// PUT /api/v1/metrics
pub async fn handle_upsert_metrics(
    State(state): State<AppState>,
    Json(input): Json<MetricsInput>,
) -> Result<Json<MetricsRow>, AppError> {
    Ok(Json(repository::upsert_metrics(&state.db, &input).await?))
}

/// POST /api/v1/metrics/snapshot
///
/// Computes today's row from the whole pipeline and upserts it.
pub async fn handle_snapshot_metrics(
    State(state): State<AppState>,
) -> Result<Json<MetricsRow>, AppError> {
    let today = Utc::now().date_naive();
    Ok(Json(repository::snapshot_metrics(&state.db, today).await?))
}

/// GET /api/v1/keywords?limit=
pub async fn handle_top_keywords(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<TopKeywordsResponse>, AppError> {
    let keywords = repository::top_keywords(&state.db, query.limit).await?;
    Ok(Json(TopKeywordsResponse { keywords }))
}

/// PUT /api/v1/keywords
pub async fn handle_upsert_keyword(
    State(state): State<AppState>,
    Json(input): Json<KeywordPerformanceInput>,
) -> Result<Json<KeywordPerformanceRow>, AppError> {
    Ok(Json(
        repository::upsert_keyword_performance(&state.db, &input).await?,
    ))
}

/// POST /api/v1/keywords/refresh
pub async fn handle_refresh_keywords(
    State(state): State<AppState>,
) -> Result<Json<KeywordPerformanceResponse>, AppError> {
    let keywords = repository::refresh_keyword_performance(&state.db).await?;
    info!(count = keywords.len(), "keyword performance refreshed");
    Ok(Json(KeywordPerformanceResponse { keywords }))
}

// ────────────────────────────────────────────────────────────────────────────
// Views & dashboard
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/pipeline
pub async fn handle_pipeline_summary(
    State(state): State<AppState>,
) -> Result<Json<PipelineResponse>, AppError> {
    let pipeline = repository::pipeline_summary(&state.db).await?;
    Ok(Json(PipelineResponse { pipeline }))
}

/// GET /api/v1/interview-performance
pub async fn handle_interview_performance(
    State(state): State<AppState>,
) -> Result<Json<InterviewPerformanceResponse>, AppError> {
    let companies = repository::interview_performance(&state.db).await?;
    Ok(Json(InterviewPerformanceResponse { companies }))
}

/// Validates the query before any database work.
fn dashboard_options(query: DashboardQuery) -> Result<DashboardOptions, AppError> {
    let today = Utc::now().date_naive();
    let date_filter = query.filter.filter(|f| !f.trim().is_empty());
    if let Some(filter) = &date_filter {
        if parse_date_filter(filter, today).is_none() {
            return Err(AppError::Validation(format!(
                "unrecognized date filter '{filter}'"
            )));
        }
    }

    Ok(DashboardOptions {
        format: query.format,
        date_filter,
        include: parse_status_list(query.include.as_deref())?,
        exclude: parse_status_list(query.exclude.as_deref())?.unwrap_or_default(),
        today,
    })
}

/// GET /api/v1/dashboard?format=&filter=&include=&exclude=
///
/// Terminal and markdown dashboards are returned as text; json as JSON.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AppError> {
    let options = dashboard_options(query)?;

    let applications = repository::list_all_applications(&state.db).await?;
    let stages = repository::list_all_stages(&state.db).await?;
    let keywords = repository::list_keyword_performance(&state.db).await?;

    let body = generate_dashboard(applications, stages, &keywords, &options)
        .map_err(|e| AppError::Internal(e.into()))?;

    let content_type = match options.format {
        DashboardFormat::Json => "application/json",
        DashboardFormat::Markdown => "text/markdown; charset=utf-8",
        DashboardFormat::Terminal => "text/plain; charset=utf-8",
    };
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_list() {
        assert_eq!(parse_status_list(None).unwrap(), None);
        assert_eq!(
            parse_status_list(Some("offer, rejected,")).unwrap(),
            Some(vec![ApplicationStatus::Offer, ApplicationStatus::Rejected])
        );
        assert!(matches!(
            parse_status_list(Some("offer,ghosted")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_dashboard_options_rejects_unknown_filter() {
        let query = DashboardQuery {
            filter: Some("since forever".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            dashboard_options(query),
            Err(AppError::Validation(_))
        ));

        let query = DashboardQuery {
            format: DashboardFormat::Markdown,
            filter: Some("last 7 days".to_string()),
            exclude: Some("withdrawn".to_string()),
            ..Default::default()
        };
        let options = dashboard_options(query).unwrap();
        assert_eq!(options.format, DashboardFormat::Markdown);
        assert_eq!(options.exclude, vec![ApplicationStatus::Withdrawn]);
        assert!(options.include.is_none());
    }
}
