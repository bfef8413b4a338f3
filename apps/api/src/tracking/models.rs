//! Row structs and request bodies for the tracking tables.
//!
//! Enum-like columns are stored as TEXT; rows carry them as `String` and the
//! enums below validate request bodies at the boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

const MAX_NAME_LEN: usize = 255;

// ────────────────────────────────────────────────────────────────────────────
// Enums
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Screening,
    Interviewing,
    Offer,
    Rejected,
    Accepted,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Screening,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Accepted,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Screening => "screening",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Still waiting on an outcome.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Applied
                | ApplicationStatus::Screening
                | ApplicationStatus::Interviewing
                | ApplicationStatus::Offer
        )
    }

    /// Reached at least the interview stage.
    pub fn reached_interview(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Interviewing | ApplicationStatus::Offer | ApplicationStatus::Accepted
        )
    }

    pub fn reached_offer(self) -> bool {
        matches!(self, ApplicationStatus::Offer | ApplicationStatus::Accepted)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("unknown application status '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl EmploymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Internship => "Internship",
            EmploymentType::Freelance => "Freelance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Phone,
    Video,
    Onsite,
    Technical,
    Behavioral,
    Panel,
    Hr,
    CaseStudy,
    Presentation,
}

impl InterviewType {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewType::Phone => "phone",
            InterviewType::Video => "video",
            InterviewType::Onsite => "onsite",
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::Panel => "panel",
            InterviewType::Hr => "hr",
            InterviewType::CaseStudy => "case_study",
            InterviewType::Presentation => "presentation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewResult {
    Passed,
    Failed,
    Pending,
    Cancelled,
}

impl InterviewResult {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewResult::Passed => "passed",
            InterviewResult::Failed => "failed",
            InterviewResult::Pending => "pending",
            InterviewResult::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    TechnicalSkill,
    SoftSkill,
    Certification,
    Tool,
    Framework,
    Domain,
    Language,
    Methodology,
}

impl KeywordCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordCategory::TechnicalSkill => "technical_skill",
            KeywordCategory::SoftSkill => "soft_skill",
            KeywordCategory::Certification => "certification",
            KeywordCategory::Tool => "tool",
            KeywordCategory::Framework => "framework",
            KeywordCategory::Domain => "domain",
            KeywordCategory::Language => "language",
            KeywordCategory::Methodology => "methodology",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub job_url: Option<String>,
    pub job_description: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: String,
    pub applied_date: NaiveDate,
    pub status: String,
    pub source: Option<String>,
    pub resume_version: Option<String>,
    pub cover_letter_used: bool,
    /// JSON array of keyword strings.
    pub keywords_targeted: Option<Value>,
    pub last_contact_date: Option<NaiveDate>,
    pub next_followup_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub resume_path: Option<String>,
    pub cover_letter_path: Option<String>,
    pub ats_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    /// `None` for a status string outside the known set.
    pub fn parsed_status(&self) -> Option<ApplicationStatus> {
        self.status.parse().ok()
    }

    /// String entries of `keywords_targeted`; anything else is ignored.
    pub fn keywords(&self) -> Vec<&str> {
        match &self.keywords_targeted {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActiveApplicationRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub interview_count: i64,
    pub latest_interview_date: Option<NaiveDate>,
    pub latest_interview_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub interview_date: NaiveDate,
    /// HH:MM
    pub interview_time: Option<String>,
    pub duration_minutes: Option<i32>,
    pub interview_type: String,
    pub round_number: i32,
    pub interviewer_name: Option<String>,
    pub interviewer_title: Option<String>,
    pub interviewer_email: Option<String>,
    pub panel_size: i32,
    pub questions_asked: Option<String>,
    pub topics_covered: Option<String>,
    pub technical_assessment: Option<String>,
    pub result: Option<String>,
    pub feedback_received: Option<String>,
    pub personal_notes: Option<String>,
    pub areas_to_improve: Option<String>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationStageRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub status: String,
    pub stage_date: NaiveDate,
    pub notes: Option<String>,
    pub changed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MetricsRow {
    pub id: Uuid,
    pub metric_date: NaiveDate,
    pub total_applications: i32,
    pub applications_sent_today: i32,
    pub total_responses: i32,
    pub response_rate: f64,
    pub total_interviews: i32,
    pub interview_rate: f64,
    pub total_offers: i32,
    pub offer_rate: f64,
    pub total_rejections: i32,
    pub avg_response_time_days: f64,
    pub avg_time_to_interview_days: f64,
    pub avg_time_to_offer_days: f64,
    pub active_applications: i32,
    pub pending_followups: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KeywordPerformanceRow {
    pub id: Uuid,
    pub keyword: String,
    pub total_uses: i32,
    pub response_count: i32,
    pub response_rate: f64,
    pub interview_count: i32,
    pub interview_rate: f64,
    pub offer_count: i32,
    pub offer_rate: f64,
    pub category: Option<String>,
    pub last_used_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PipelineSummaryRow {
    pub status: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewPerformanceRow {
    pub company: String,
    pub total_applications: i64,
    pub total_interviews: i64,
    pub interviews_per_application: f64,
    pub avg_rounds: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TopKeywordRow {
    pub keyword: String,
    pub category: Option<String>,
    pub total_uses: i32,
    pub response_rate: f64,
    pub interview_rate: f64,
    pub offer_rate: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Request bodies
// ────────────────────────────────────────────────────────────────────────────

fn validate_name(value: &str, field: &str) -> Result<(), AppError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    if len > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_min(value: Option<i32>, min: i32, field: &str) -> Result<(), AppError> {
    match value {
        Some(v) if v < min => Err(AppError::Validation(format!("{field} must be at least {min}"))),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub employment_type: EmploymentType,
    pub applied_date: NaiveDate,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub resume_version: Option<String>,
    #[serde(default)]
    pub cover_letter_used: bool,
    #[serde(default)]
    pub keywords_targeted: Vec<String>,
    #[serde(default)]
    pub last_contact_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_followup_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub resume_path: Option<String>,
    #[serde(default)]
    pub cover_letter_path: Option<String>,
}

impl NewApplication {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.company, "company")?;
        validate_name(&self.position, "position")
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationUpdate {
    pub company: Option<String>,
    pub position: Option<String>,
    pub job_url: Option<String>,
    pub job_description: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub applied_date: Option<NaiveDate>,
    pub status: Option<ApplicationStatus>,
    pub source: Option<String>,
    pub resume_version: Option<String>,
    pub cover_letter_used: Option<bool>,
    pub keywords_targeted: Option<Vec<String>>,
    pub last_contact_date: Option<NaiveDate>,
    pub next_followup_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub resume_path: Option<String>,
    pub cover_letter_path: Option<String>,
    /// Recorded on the stage row when `status` changes.
    #[serde(default)]
    pub stage_notes: Option<String>,
}

impl ApplicationUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(company) = &self.company {
            validate_name(company, "company")?;
        }
        if let Some(position) = &self.position {
            validate_name(position, "position")?;
        }
        Ok(())
    }
}

fn default_one() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInterview {
    pub application_id: Uuid,
    pub interview_date: NaiveDate,
    #[serde(default)]
    pub interview_time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    pub interview_type: InterviewType,
    #[serde(default = "default_one")]
    pub round_number: i32,
    #[serde(default)]
    pub interviewer_name: Option<String>,
    #[serde(default)]
    pub interviewer_title: Option<String>,
    #[serde(default)]
    pub interviewer_email: Option<String>,
    #[serde(default = "default_one")]
    pub panel_size: i32,
    #[serde(default)]
    pub questions_asked: Option<String>,
    #[serde(default)]
    pub topics_covered: Option<String>,
    #[serde(default)]
    pub technical_assessment: Option<String>,
    #[serde(default)]
    pub result: Option<InterviewResult>,
    #[serde(default)]
    pub feedback_received: Option<String>,
    #[serde(default)]
    pub personal_notes: Option<String>,
    #[serde(default)]
    pub areas_to_improve: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl NewInterview {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_min(self.duration_minutes, 0, "duration_minutes")?;
        validate_min(Some(self.round_number), 1, "round_number")?;
        validate_min(Some(self.panel_size), 1, "panel_size")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewUpdate {
    pub interview_date: Option<NaiveDate>,
    pub interview_time: Option<String>,
    pub duration_minutes: Option<i32>,
    pub interview_type: Option<InterviewType>,
    pub round_number: Option<i32>,
    pub interviewer_name: Option<String>,
    pub interviewer_title: Option<String>,
    pub interviewer_email: Option<String>,
    pub panel_size: Option<i32>,
    pub questions_asked: Option<String>,
    pub topics_covered: Option<String>,
    pub technical_assessment: Option<String>,
    pub result: Option<InterviewResult>,
    pub feedback_received: Option<String>,
    pub personal_notes: Option<String>,
    pub areas_to_improve: Option<String>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub timezone: Option<String>,
}

impl InterviewUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_min(self.duration_minutes, 0, "duration_minutes")?;
        validate_min(self.round_number, 1, "round_number")?;
        validate_min(self.panel_size, 1, "panel_size")
    }
}

/// One day's pipeline snapshot, upserted on `metric_date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsInput {
    pub metric_date: NaiveDate,
    pub total_applications: i32,
    pub applications_sent_today: i32,
    pub total_responses: i32,
    pub response_rate: f64,
    pub total_interviews: i32,
    pub interview_rate: f64,
    pub total_offers: i32,
    pub offer_rate: f64,
    pub total_rejections: i32,
    pub avg_response_time_days: f64,
    pub avg_time_to_interview_days: f64,
    pub avg_time_to_offer_days: f64,
    pub active_applications: i32,
    pub pending_followups: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordPerformanceInput {
    pub keyword: String,
    #[serde(default)]
    pub total_uses: i32,
    #[serde(default)]
    pub response_count: i32,
    #[serde(default)]
    pub response_rate: f64,
    #[serde(default)]
    pub interview_count: i32,
    #[serde(default)]
    pub interview_rate: f64,
    #[serde(default)]
    pub offer_count: i32,
    #[serde(default)]
    pub offer_rate: f64,
    #[serde(default)]
    pub category: Option<KeywordCategory>,
    #[serde(default)]
    pub last_used_date: Option<NaiveDate>,
}

impl KeywordPerformanceInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.keyword.trim().is_empty() {
            return Err(AppError::Validation("keyword cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
impl ApplicationRow {
    /// Minimal row for dashboard and model tests.
    pub fn sample(company: &str, status: ApplicationStatus, applied_date: NaiveDate) -> Self {
        ApplicationRow {
            id: Uuid::new_v4(),
            company: company.to_string(),
            position: "Software Engineer".to_string(),
            job_url: None,
            job_description: None,
            location: None,
            salary_range: None,
            employment_type: EmploymentType::FullTime.as_str().to_string(),
            applied_date,
            status: status.as_str().to_string(),
            source: None,
            resume_version: None,
            cover_letter_used: false,
            keywords_targeted: None,
            last_contact_date: None,
            next_followup_date: None,
            notes: None,
            resume_path: None,
            cover_letter_path: None,
            ats_score: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
        assert!("ghosted".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_status_stages() {
        assert!(ApplicationStatus::Offer.is_active());
        assert!(!ApplicationStatus::Rejected.is_active());
        assert!(ApplicationStatus::Accepted.reached_interview());
        assert!(!ApplicationStatus::Screening.reached_interview());
        assert!(ApplicationStatus::Accepted.reached_offer());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_value(EmploymentType::FullTime).unwrap(),
            serde_json::json!("Full-time")
        );
        assert_eq!(
            serde_json::from_value::<InterviewType>(serde_json::json!("case_study")).unwrap(),
            InterviewType::CaseStudy
        );
        assert_eq!(InterviewType::CaseStudy.as_str(), "case_study");
        assert_eq!(KeywordCategory::SoftSkill.as_str(), "soft_skill");
        assert!(serde_json::from_value::<InterviewResult>(serde_json::json!("maybe")).is_err());
    }

    #[test]
    fn test_new_application_defaults_and_validation() {
        let app: NewApplication = serde_json::from_value(serde_json::json!({
            "company": "Acme",
            "position": "Backend Engineer",
            "applied_date": "2026-03-02",
            "keywords_targeted": ["rust", "kafka"]
        }))
        .unwrap();

        assert_eq!(app.status, ApplicationStatus::Applied);
        assert_eq!(app.employment_type, EmploymentType::FullTime);
        assert!(!app.cover_letter_used);
        assert!(app.validate().is_ok());

        let blank = NewApplication {
            company: "  ".to_string(),
            ..app
        };
        assert!(matches!(blank.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_new_application_rejects_bad_date() {
        let result = serde_json::from_value::<NewApplication>(serde_json::json!({
            "company": "Acme",
            "position": "Engineer",
            "applied_date": "03/02/2026"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_interview_validation() {
        let interview: NewInterview = serde_json::from_value(serde_json::json!({
            "application_id": Uuid::nil(),
            "interview_date": "2026-03-10",
            "interview_type": "technical"
        }))
        .unwrap();
        assert_eq!(interview.round_number, 1);
        assert_eq!(interview.panel_size, 1);
        assert!(interview.validate().is_ok());

        let update = InterviewUpdate {
            round_number: Some(0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_keywords_ignores_non_strings() {
        let mut row = ApplicationRow::sample(
            "Acme",
            ApplicationStatus::Screening,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        );
        row.keywords_targeted = Some(serde_json::json!(["rust", 3, "sql"]));

        assert_eq!(row.keywords(), vec!["rust", "sql"]);
        assert_eq!(row.parsed_status(), Some(ApplicationStatus::Screening));
    }
}
