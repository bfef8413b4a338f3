//! Document storage: generated markdown (parsed resumes, cover letters,
//! interview prep, optimization reports) persisted to S3-compatible storage.
//!
//! `AppState` holds an `Arc<dyn DocumentStore>`; handlers never touch the S3
//! client directly.

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;

pub const MARKDOWN: &str = "text/markdown";

// ────────────────────────────────────────────────────────────────────────────
// Keys
// ────────────────────────────────────────────────────────────────────────────

pub fn resume_key(resume_id: Uuid) -> String {
    format!("resumes/{resume_id}.md")
}

pub fn cover_letter_key(application_id: Uuid) -> String {
    format!("applications/{application_id}/cover_letter.md")
}

pub fn interview_prep_key(application_id: Uuid) -> String {
    format!("applications/{application_id}/interview_prep.md")
}

pub fn optimization_report_key(application_id: Uuid) -> String {
    format!("applications/{application_id}/optimization_report.md")
}

/// Optimized resume body, stored alongside its report.
pub fn optimized_resume_key(application_id: Uuid) -> String {
    format!("applications/{application_id}/resume.md")
}

/// Generated documents addressable per application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
    InterviewPrep,
    OptimizationReport,
}

impl DocumentKind {
    pub fn key(self, application_id: Uuid) -> String {
        match self {
            DocumentKind::Resume => optimized_resume_key(application_id),
            DocumentKind::CoverLetter => cover_letter_key(application_id),
            DocumentKind::InterviewPrep => interview_prep_key(application_id),
            DocumentKind::OptimizationReport => optimization_report_key(application_id),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// S3DocumentStore
// ────────────────────────────────────────────────────────────────────────────

pub struct S3DocumentStore {
    client: S3Client,
    bucket: String,
}

impl S3DocumentStore {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Builds a client for MinIO (local) or AWS (production) from config.
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "applywise-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        // MinIO only serves path-style URLs
        let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
            .force_path_style(true)
            .build();

        Self::new(S3Client::from_conf(s3_config), config.s3_bucket.clone())
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload of {key} failed: {e}")))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    AppError::NotFound(format!("Document {key} not found"))
                } else {
                    AppError::Storage(format!("download of {key} failed: {e}"))
                }
            })?;

        let bytes = object
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("reading {key} failed: {e}")))?;

        Ok(bytes.into_bytes().to_vec())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[derive(Default)]
pub struct InMemoryDocumentStore {
    docs: tokio::sync::RwLock<std::collections::HashMap<String, (Vec<u8>, String)>>,
}

#[cfg(test)]
impl InMemoryDocumentStore {
    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.docs.read().await.get(key).map(|(_, ct)| ct.clone())
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.docs.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.docs
            .write()
            .await
            .insert(key.to_string(), (body, content_type.to_string()));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError> {
        self.docs
            .read()
            .await
            .get(key)
            .map(|(body, _)| body.clone())
            .ok_or_else(|| AppError::NotFound(format!("Document {key} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_keys() {
        let id = Uuid::nil();
        assert_eq!(
            cover_letter_key(id),
            "applications/00000000-0000-0000-0000-000000000000/cover_letter.md"
        );
        assert!(interview_prep_key(id).ends_with("/interview_prep.md"));
        assert!(optimization_report_key(id).ends_with("/optimization_report.md"));
        assert!(resume_key(id).starts_with("resumes/"));
    }

    #[test]
    fn test_document_kind_keys() {
        let id = Uuid::nil();
        assert_eq!(DocumentKind::Resume.key(id), optimized_resume_key(id));
        assert_eq!(DocumentKind::CoverLetter.key(id), cover_letter_key(id));
        assert_eq!(DocumentKind::InterviewPrep.key(id), interview_prep_key(id));
        assert_eq!(
            DocumentKind::OptimizationReport.key(id),
            optimization_report_key(id)
        );

        let kind: DocumentKind = serde_json::from_str("\"cover-letter\"").unwrap();
        assert_eq!(kind, DocumentKind::CoverLetter);
    }

    #[tokio::test]
    async fn test_in_memory_store_roundtrip() {
        let store = InMemoryDocumentStore::default();
        store
            .put("resumes/a.md", b"# Resume".to_vec(), MARKDOWN)
            .await
            .unwrap();

        assert_eq!(store.get("resumes/a.md").await.unwrap(), b"# Resume");
        assert_eq!(store.content_type("resumes/a.md").await.as_deref(), Some(MARKDOWN));
        assert!(matches!(
            store.get("missing.md").await,
            Err(AppError::NotFound(_))
        ));
    }
}
