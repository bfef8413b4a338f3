//! Axum route handlers for the Resume Parsing API.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::parser::{ContactInfo, ParsedResume, ResumeParser, ResumeSection};
use crate::state::AppState;
use crate::storage::{resume_key, MARKDOWN};

/// Multipart field carrying the PDF.
const RESUME_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ParsedResumeResponse {
    pub contact_info: ContactInfo,
    pub sections: BTreeMap<ResumeSection, String>,
    pub markdown: String,
    /// Storage key of the markdown. Only set for uploaded PDFs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_key: Option<String>,
}

impl ParsedResumeResponse {
    fn new(parsed: ParsedResume, document_key: Option<String>) -> Self {
        let markdown = parsed.to_markdown();
        Self {
            contact_info: parsed.contact_info,
            sections: parsed.sections,
            markdown,
            document_key,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/parse
///
/// Accepts a multipart PDF upload (field `resume`), converts it to markdown
/// and stores the markdown under `resumes/{uuid}.md`.
pub async fn handle_parse_resume_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParsedResumeResponse>, AppError> {
    let mut pdf_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some(RESUME_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
            pdf_bytes = Some(data);
            break;
        }
    }

    let pdf_bytes = pdf_bytes
        .ok_or_else(|| AppError::Validation(format!("missing '{RESUME_FIELD}' file field")))?;
    if pdf_bytes.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }

    // pdf-extract is CPU-bound
    let parsed = tokio::task::spawn_blocking(move || ResumeParser.parse_pdf_bytes(&pdf_bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))??;

    let key = resume_key(Uuid::new_v4());
    let response = ParsedResumeResponse::new(parsed, Some(key.clone()));
    state
        .store
        .put(&key, response.markdown.clone().into_bytes(), MARKDOWN)
        .await?;

    info!("Parsed uploaded resume into {key}");
    Ok(Json(response))
}

/// POST /api/v1/resumes/parse-text
///
/// Parses already-extracted resume text. Nothing is stored.
pub async fn handle_parse_resume_text(
    Json(request): Json<ParseTextRequest>,
) -> Result<Json<ParsedResumeResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let parsed = ResumeParser.parse_text(&request.text)?;
    Ok(Json(ParsedResumeResponse::new(parsed, None)))
}
