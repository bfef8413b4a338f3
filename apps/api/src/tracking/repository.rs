//! Postgres access for the tracking tables and views.
//!
//! Dynamic filters and partial updates go through `QueryBuilder`; only
//! whitelisted column names are ever pushed as SQL text.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::postgres::PgQueryResult;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::tracking::dashboard::{build_metrics_snapshot, compute_keyword_performance};
use crate::tracking::models::{
    ActiveApplicationRow, ApplicationRow, ApplicationStageRow, ApplicationStatus,
    ApplicationUpdate, EmploymentType, InterviewPerformanceRow, InterviewResult, InterviewRow,
    InterviewType, InterviewUpdate, KeywordPerformanceInput, KeywordPerformanceRow, MetricsInput,
    MetricsRow, NewApplication, NewInterview, PipelineSummaryRow, TopKeywordRow,
};

const DEFAULT_LIMIT: i64 = 100;
const DEFAULT_METRICS_LIMIT: i64 = 30;
const DEFAULT_TOP_KEYWORDS: i64 = 20;
const MAX_LIMIT: i64 = 1000;

/// Stage rows written by the service itself rather than a user edit.
const SYSTEM_ACTOR: &str = "system";
const MANUAL_ACTOR: &str = "manual";

fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

fn application_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Application {id} not found"))
}

fn keywords_json(keywords: &[String]) -> Option<Value> {
    (!keywords.is_empty()).then(|| json!(keywords))
}

/// Appends `, column = $n` when `value` is present.
fn set_column<'a, T>(qb: &mut QueryBuilder<'a, Postgres>, column: &str, value: Option<T>)
where
    T: 'a + Send + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres>,
{
    if let Some(value) = value {
        qb.push(", ").push(column).push(" = ").push_bind(value);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Query parameters
// ────────────────────────────────────────────────────────────────────────────

/// Whitelisted orderings for the application list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationOrder {
    #[default]
    AppliedDateDesc,
    AppliedDateAsc,
    CreatedAtDesc,
    Company,
    AtsScoreDesc,
}

impl ApplicationOrder {
    fn as_sql(self) -> &'static str {
        match self {
            ApplicationOrder::AppliedDateDesc => "applied_date DESC, created_at DESC",
            ApplicationOrder::AppliedDateAsc => "applied_date ASC, created_at ASC",
            ApplicationOrder::CreatedAtDesc => "created_at DESC",
            ApplicationOrder::Company => "company ASC, applied_date DESC",
            ApplicationOrder::AtsScoreDesc => "ats_score DESC NULLS LAST, applied_date DESC",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    /// Case-insensitive substring of the company name.
    pub company: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    #[serde(default)]
    pub order: ApplicationOrder,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewFilter {
    pub application_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

async fn insert_stage(
    conn: &mut PgConnection,
    application_id: Uuid,
    status: ApplicationStatus,
    stage_date: NaiveDate,
    notes: Option<&str>,
    changed_by: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO application_stages (application_id, status, stage_date, notes, changed_by)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(application_id)
    .bind(status.as_str())
    .bind(stage_date)
    .bind(notes)
    .bind(changed_by)
    .execute(conn)
    .await?;
    Ok(())
}

/// Inserts the application and its initial stage row in one transaction.
pub async fn create_application(
    pool: &PgPool,
    new: &NewApplication,
) -> Result<ApplicationRow, AppError> {
    new.validate()?;
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (
            company, position, job_url, job_description, location,
            salary_range, employment_type, applied_date, status, source,
            resume_version, cover_letter_used, keywords_targeted,
            last_contact_date, next_followup_date, notes,
            resume_path, cover_letter_path
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
        RETURNING *
        "#,
    )
    .bind(new.company.trim())
    .bind(new.position.trim())
    .bind(&new.job_url)
    .bind(&new.job_description)
    .bind(&new.location)
    .bind(&new.salary_range)
    .bind(new.employment_type.as_str())
    .bind(new.applied_date)
    .bind(new.status.as_str())
    .bind(&new.source)
    .bind(&new.resume_version)
    .bind(new.cover_letter_used)
    .bind(keywords_json(&new.keywords_targeted))
    .bind(new.last_contact_date)
    .bind(new.next_followup_date)
    .bind(&new.notes)
    .bind(&new.resume_path)
    .bind(&new.cover_letter_path)
    .fetch_one(&mut *tx)
    .await?;

    insert_stage(
        &mut tx,
        row.id,
        new.status,
        new.applied_date,
        None,
        SYSTEM_ACTOR,
    )
    .await?;
    tx.commit().await?;

    info!("Created application {} ({} at {})", row.id, row.position, row.company);
    Ok(row)
}

pub async fn get_application(pool: &PgPool, id: Uuid) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| application_not_found(id))
}

pub async fn list_applications(
    pool: &PgPool,
    filter: &ApplicationFilter,
) -> Result<Vec<ApplicationRow>, AppError> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM applications WHERE TRUE");

    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(company) = filter.company.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        qb.push(" AND company ILIKE ").push_bind(format!("%{company}%"));
    }

    qb.push(" ORDER BY ").push(filter.order.as_sql());
    qb.push(" LIMIT ").push_bind(clamp_limit(filter.limit, DEFAULT_LIMIT));
    qb.push(" OFFSET ").push_bind(clamp_offset(filter.offset));

    Ok(qb.build_query_as::<ApplicationRow>().fetch_all(pool).await?)
}

/// Every application, newest first. Feeds the dashboard and snapshots.
pub async fn list_all_applications(pool: &PgPool) -> Result<Vec<ApplicationRow>, AppError> {
    Ok(sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications ORDER BY applied_date DESC, created_at DESC",
    )
    .fetch_all(pool)
    .await?)
}

/// Applies the present fields. A status change also appends a stage row
/// dated today.
pub async fn update_application(
    pool: &PgPool,
    id: Uuid,
    update: &ApplicationUpdate,
) -> Result<ApplicationRow, AppError> {
    update.validate()?;
    let mut tx = pool.begin().await?;

    let previous_status: String =
        sqlx::query_scalar("SELECT status FROM applications WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| application_not_found(id))?;

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE applications SET updated_at = NOW()");
    set_column(&mut qb, "company", update.company.as_deref().map(str::trim));
    set_column(&mut qb, "position", update.position.as_deref().map(str::trim));
    set_column(&mut qb, "job_url", update.job_url.as_deref());
    set_column(&mut qb, "job_description", update.job_description.as_deref());
    set_column(&mut qb, "location", update.location.as_deref());
    set_column(&mut qb, "salary_range", update.salary_range.as_deref());
    set_column(
        &mut qb,
        "employment_type",
        update.employment_type.map(EmploymentType::as_str),
    );
    set_column(&mut qb, "applied_date", update.applied_date);
    set_column(&mut qb, "status", update.status.map(ApplicationStatus::as_str));
    set_column(&mut qb, "source", update.source.as_deref());
    set_column(&mut qb, "resume_version", update.resume_version.as_deref());
    set_column(&mut qb, "cover_letter_used", update.cover_letter_used);
    set_column(
        &mut qb,
        "keywords_targeted",
        update.keywords_targeted.as_ref().map(|k| json!(k)),
    );
    set_column(&mut qb, "last_contact_date", update.last_contact_date);
    set_column(&mut qb, "next_followup_date", update.next_followup_date);
    set_column(&mut qb, "notes", update.notes.as_deref());
    set_column(&mut qb, "resume_path", update.resume_path.as_deref());
    set_column(&mut qb, "cover_letter_path", update.cover_letter_path.as_deref());
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    let row = qb
        .build_query_as::<ApplicationRow>()
        .fetch_one(&mut *tx)
        .await?;

    if let Some(status) = update.status.filter(|s| s.as_str() != previous_status) {
        insert_stage(
            &mut tx,
            id,
            status,
            Utc::now().date_naive(),
            update.stage_notes.as_deref(),
            MANUAL_ACTOR,
        )
        .await?;
        info!("Application {id} moved {previous_status} -> {status}");
    }

    tx.commit().await?;
    Ok(row)
}

/// Interviews and stage history go with it (ON DELETE CASCADE).
pub async fn delete_application(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    ensure_updated(result, id)?;
    info!("Deleted application {id}");
    Ok(())
}

fn ensure_updated(result: PgQueryResult, id: Uuid) -> Result<(), AppError> {
    if result.rows_affected() == 0 {
        return Err(application_not_found(id));
    }
    Ok(())
}

pub async fn record_ats_score(pool: &PgPool, id: Uuid, score: f64) -> Result<(), AppError> {
    let result =
        sqlx::query("UPDATE applications SET ats_score = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(score)
            .execute(pool)
            .await?;
    ensure_updated(result, id)
}

/// Stores the cover letter key and marks the letter as used.
pub async fn record_cover_letter(pool: &PgPool, id: Uuid, key: &str) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE applications
        SET cover_letter_path = $2, cover_letter_used = TRUE, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(key)
    .execute(pool)
    .await?;
    ensure_updated(result, id)
}

pub async fn record_resume_path(pool: &PgPool, id: Uuid, key: &str) -> Result<(), AppError> {
    let result =
        sqlx::query("UPDATE applications SET resume_path = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(key)
            .execute(pool)
            .await?;
    ensure_updated(result, id)
}

// ────────────────────────────────────────────────────────────────────────────
// Interviews
// ────────────────────────────────────────────────────────────────────────────

pub async fn create_interview(pool: &PgPool, new: &NewInterview) -> Result<InterviewRow, AppError> {
    new.validate()?;
    get_application(pool, new.application_id).await?;

    let row = sqlx::query_as::<_, InterviewRow>(
        r#"
        INSERT INTO interviews (
            application_id, interview_date, interview_time, duration_minutes,
            interview_type, round_number, interviewer_name, interviewer_title,
            interviewer_email, panel_size, questions_asked, topics_covered,
            technical_assessment, result, feedback_received, personal_notes,
            areas_to_improve, location, meeting_link, timezone
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
        RETURNING *
        "#,
    )
    .bind(new.application_id)
    .bind(new.interview_date)
    .bind(&new.interview_time)
    .bind(new.duration_minutes)
    .bind(new.interview_type.as_str())
    .bind(new.round_number)
    .bind(&new.interviewer_name)
    .bind(&new.interviewer_title)
    .bind(&new.interviewer_email)
    .bind(new.panel_size)
    .bind(&new.questions_asked)
    .bind(&new.topics_covered)
    .bind(&new.technical_assessment)
    .bind(new.result.map(InterviewResult::as_str))
    .bind(&new.feedback_received)
    .bind(&new.personal_notes)
    .bind(&new.areas_to_improve)
    .bind(&new.location)
    .bind(&new.meeting_link)
    .bind(&new.timezone)
    .fetch_one(pool)
    .await?;

    info!(
        "Scheduled {} interview (round {}) for application {}",
        row.interview_type, row.round_number, row.application_id
    );
    Ok(row)
}

pub async fn list_interviews(
    pool: &PgPool,
    filter: &InterviewFilter,
) -> Result<Vec<InterviewRow>, AppError> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM interviews");
    if let Some(application_id) = filter.application_id {
        qb.push(" WHERE application_id = ").push_bind(application_id);
    }
    qb.push(" ORDER BY interview_date DESC, created_at DESC");
    qb.push(" LIMIT ").push_bind(clamp_limit(filter.limit, DEFAULT_LIMIT));
    qb.push(" OFFSET ").push_bind(clamp_offset(filter.offset));

    Ok(qb.build_query_as::<InterviewRow>().fetch_all(pool).await?)
}

pub async fn update_interview(
    pool: &PgPool,
    id: Uuid,
    update: &InterviewUpdate,
) -> Result<InterviewRow, AppError> {
    update.validate()?;

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE interviews SET updated_at = NOW()");
    set_column(&mut qb, "interview_date", update.interview_date);
    set_column(&mut qb, "interview_time", update.interview_time.as_deref());
    set_column(&mut qb, "duration_minutes", update.duration_minutes);
    set_column(
        &mut qb,
        "interview_type",
        update.interview_type.map(InterviewType::as_str),
    );
    set_column(&mut qb, "round_number", update.round_number);
    set_column(&mut qb, "interviewer_name", update.interviewer_name.as_deref());
    set_column(&mut qb, "interviewer_title", update.interviewer_title.as_deref());
    set_column(&mut qb, "interviewer_email", update.interviewer_email.as_deref());
    set_column(&mut qb, "panel_size", update.panel_size);
    set_column(&mut qb, "questions_asked", update.questions_asked.as_deref());
    set_column(&mut qb, "topics_covered", update.topics_covered.as_deref());
    set_column(
        &mut qb,
        "technical_assessment",
        update.technical_assessment.as_deref(),
    );
    set_column(&mut qb, "result", update.result.map(InterviewResult::as_str));
    set_column(&mut qb, "feedback_received", update.feedback_received.as_deref());
    set_column(&mut qb, "personal_notes", update.personal_notes.as_deref());
    set_column(&mut qb, "areas_to_improve", update.areas_to_improve.as_deref());
    set_column(&mut qb, "location", update.location.as_deref());
    set_column(&mut qb, "meeting_link", update.meeting_link.as_deref());
    set_column(&mut qb, "timezone", update.timezone.as_deref());
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    qb.build_query_as::<InterviewRow>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Stages
// ────────────────────────────────────────────────────────────────────────────

/// Stage history for one application, most recent first.
pub async fn list_stages(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Vec<ApplicationStageRow>, AppError> {
    get_application(pool, application_id).await?;
    Ok(sqlx::query_as::<_, ApplicationStageRow>(
        r#"
        SELECT * FROM application_stages
        WHERE application_id = $1
        ORDER BY stage_date DESC, created_at DESC
        "#,
    )
    .bind(application_id)
    .fetch_all(pool)
    .await?)
}

pub async fn list_all_stages(pool: &PgPool) -> Result<Vec<ApplicationStageRow>, AppError> {
    Ok(sqlx::query_as::<_, ApplicationStageRow>(
        "SELECT * FROM application_stages ORDER BY application_id, stage_date, created_at",
    )
    .fetch_all(pool)
    .await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Metrics
// ────────────────────────────────────────────────────────────────────────────

pub async fn list_metrics(pool: &PgPool, filter: &MetricsFilter) -> Result<Vec<MetricsRow>, AppError> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM metrics WHERE TRUE");
    if let Some(start) = filter.start_date {
        qb.push(" AND metric_date >= ").push_bind(start);
    }
    if let Some(end) = filter.end_date {
        qb.push(" AND metric_date <= ").push_bind(end);
    }
    qb.push(" ORDER BY metric_date DESC LIMIT ")
        .push_bind(clamp_limit(filter.limit, DEFAULT_METRICS_LIMIT));

    Ok(qb.build_query_as::<MetricsRow>().fetch_all(pool).await?)
}

/// One row per `metric_date`; an existing row is overwritten.
pub async fn upsert_metrics(pool: &PgPool, metrics: &MetricsInput) -> Result<MetricsRow, AppError> {
    Ok(sqlx::query_as::<_, MetricsRow>(
        r#"
        INSERT INTO metrics (
            metric_date, total_applications, applications_sent_today,
            total_responses, response_rate, total_interviews, interview_rate,
            total_offers, offer_rate, total_rejections,
            avg_response_time_days, avg_time_to_interview_days,
            avg_time_to_offer_days, active_applications, pending_followups
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        ON CONFLICT (metric_date) DO UPDATE SET
            total_applications = EXCLUDED.total_applications,
            applications_sent_today = EXCLUDED.applications_sent_today,
            total_responses = EXCLUDED.total_responses,
            response_rate = EXCLUDED.response_rate,
            total_interviews = EXCLUDED.total_interviews,
            interview_rate = EXCLUDED.interview_rate,
            total_offers = EXCLUDED.total_offers,
            offer_rate = EXCLUDED.offer_rate,
            total_rejections = EXCLUDED.total_rejections,
            avg_response_time_days = EXCLUDED.avg_response_time_days,
            avg_time_to_interview_days = EXCLUDED.avg_time_to_interview_days,
            avg_time_to_offer_days = EXCLUDED.avg_time_to_offer_days,
            active_applications = EXCLUDED.active_applications,
            pending_followups = EXCLUDED.pending_followups,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(metrics.metric_date)
    .bind(metrics.total_applications)
    .bind(metrics.applications_sent_today)
    .bind(metrics.total_responses)
    .bind(metrics.response_rate)
    .bind(metrics.total_interviews)
    .bind(metrics.interview_rate)
    .bind(metrics.total_offers)
    .bind(metrics.offer_rate)
    .bind(metrics.total_rejections)
    .bind(metrics.avg_response_time_days)
    .bind(metrics.avg_time_to_interview_days)
    .bind(metrics.avg_time_to_offer_days)
    .bind(metrics.active_applications)
    .bind(metrics.pending_followups)
    .fetch_one(pool)
    .await?)
}

/// Computes today's pipeline row from the full history and upserts it.
pub async fn snapshot_metrics(pool: &PgPool, today: NaiveDate) -> Result<MetricsRow, AppError> {
    let applications = list_all_applications(pool).await?;
    let stages = list_all_stages(pool).await?;
    let snapshot = build_metrics_snapshot(&applications, &stages, today);
    let row = upsert_metrics(pool, &snapshot).await?;
    info!(
        "Recorded metrics snapshot for {today}: {} applications",
        row.total_applications
    );
    Ok(row)
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword performance
// ────────────────────────────────────────────────────────────────────────────

async fn upsert_keyword_row(
    conn: &mut PgConnection,
    input: &KeywordPerformanceInput,
) -> Result<KeywordPerformanceRow, AppError> {
    Ok(sqlx::query_as::<_, KeywordPerformanceRow>(
        r#"
        INSERT INTO keyword_performance (
            keyword, total_uses, response_count, response_rate,
            interview_count, interview_rate, offer_count, offer_rate,
            category, last_used_date
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (keyword) DO UPDATE SET
            total_uses = EXCLUDED.total_uses,
            response_count = EXCLUDED.response_count,
            response_rate = EXCLUDED.response_rate,
            interview_count = EXCLUDED.interview_count,
            interview_rate = EXCLUDED.interview_rate,
            offer_count = EXCLUDED.offer_count,
            offer_rate = EXCLUDED.offer_rate,
            category = EXCLUDED.category,
            last_used_date = EXCLUDED.last_used_date,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(input.keyword.trim())
    .bind(input.total_uses)
    .bind(input.response_count)
    .bind(input.response_rate)
    .bind(input.interview_count)
    .bind(input.interview_rate)
    .bind(input.offer_count)
    .bind(input.offer_rate)
    .bind(input.category.map(|c| c.as_str()))
    .bind(input.last_used_date)
    .fetch_one(conn)
    .await?)
}

pub async fn upsert_keyword_performance(
    pool: &PgPool,
    input: &KeywordPerformanceInput,
) -> Result<KeywordPerformanceRow, AppError> {
    input.validate()?;
    let mut conn = pool.acquire().await?;
    upsert_keyword_row(&mut conn, input).await
}

/// Rebuilds `keyword_performance` from every application's
/// `keywords_targeted`. Keywords no application targets any more are removed.
pub async fn refresh_keyword_performance(
    pool: &PgPool,
) -> Result<Vec<KeywordPerformanceRow>, AppError> {
    let applications = list_all_applications(pool).await?;
    let computed = compute_keyword_performance(&applications);
    let keywords: Vec<String> = computed.iter().map(|k| k.keyword.clone()).collect();

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM keyword_performance WHERE NOT (keyword = ANY($1))")
        .bind(&keywords)
        .execute(&mut *tx)
        .await?;

    let mut rows = Vec::with_capacity(computed.len());
    for input in &computed {
        rows.push(upsert_keyword_row(&mut tx, input).await?);
    }
    tx.commit().await?;

    info!(
        "Refreshed keyword performance: {} keywords from {} applications",
        rows.len(),
        applications.len()
    );
    Ok(rows)
}

pub async fn list_keyword_performance(
    pool: &PgPool,
) -> Result<Vec<KeywordPerformanceRow>, AppError> {
    Ok(sqlx::query_as::<_, KeywordPerformanceRow>(
        "SELECT * FROM keyword_performance ORDER BY response_rate DESC, total_uses DESC",
    )
    .fetch_all(pool)
    .await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Views
// ────────────────────────────────────────────────────────────────────────────

pub async fn top_keywords(pool: &PgPool, limit: Option<i64>) -> Result<Vec<TopKeywordRow>, AppError> {
    Ok(
        sqlx::query_as::<_, TopKeywordRow>("SELECT * FROM v_top_keywords LIMIT $1")
            .bind(clamp_limit(limit, DEFAULT_TOP_KEYWORDS))
            .fetch_all(pool)
            .await?,
    )
}

pub async fn active_applications(
    pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<ActiveApplicationRow>, AppError> {
    Ok(
        sqlx::query_as::<_, ActiveApplicationRow>("SELECT * FROM v_active_applications LIMIT $1")
            .bind(clamp_limit(limit, DEFAULT_LIMIT))
            .fetch_all(pool)
            .await?,
    )
}

pub async fn pipeline_summary(pool: &PgPool) -> Result<Vec<PipelineSummaryRow>, AppError> {
    Ok(
        sqlx::query_as::<_, PipelineSummaryRow>("SELECT * FROM v_pipeline_summary")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn interview_performance(
    pool: &PgPool,
) -> Result<Vec<InterviewPerformanceRow>, AppError> {
    Ok(
        sqlx::query_as::<_, InterviewPerformanceRow>("SELECT * FROM v_interview_performance")
            .fetch_all(pool)
            .await?,
    )
}
