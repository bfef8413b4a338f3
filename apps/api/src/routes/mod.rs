pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::company::handlers as company;
use crate::generation::handlers as generation;
use crate::resume::handlers as resume;
use crate::scoring::handlers as scoring;
use crate::state::AppState;
use crate::tracking::handlers as tracking;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume parsing
        .route("/api/v1/resumes/parse", post(resume::handle_parse_resume_pdf))
        .route(
            "/api/v1/resumes/parse-text",
            post(resume::handle_parse_resume_text),
        )
        // Analysis & scoring
        .route("/api/v1/jd/analyze", post(analysis::handle_analyze_jd))
        .route("/api/v1/ats/score", post(scoring::handle_ats_score))
        .route(
            "/api/v1/companies/analyze",
            post(company::handle_analyze_company),
        )
        // Generation
        .route(
            "/api/v1/cover-letters",
            post(generation::handle_generate_cover_letter),
        )
        .route(
            "/api/v1/interview-prep",
            post(generation::handle_generate_interview_prep),
        )
        .route(
            "/api/v1/resumes/optimize",
            post(generation::handle_optimize_resume),
        )
        // Tracking
        .route(
            "/api/v1/applications",
            get(tracking::handle_list_applications).post(tracking::handle_create_application),
        )
        .route(
            "/api/v1/applications/active",
            get(tracking::handle_active_applications),
        )
        .route(
            "/api/v1/applications/:id",
            get(tracking::handle_get_application)
                .patch(tracking::handle_update_application)
                .delete(tracking::handle_delete_application),
        )
        .route(
            "/api/v1/applications/:id/stages",
            get(tracking::handle_list_stages),
        )
        .route(
            "/api/v1/applications/:id/documents/:kind",
            get(generation::handle_get_document),
        )
        .route(
            "/api/v1/interviews",
            get(tracking::handle_list_interviews).post(tracking::handle_create_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            patch(tracking::handle_update_interview),
        )
        .route(
            "/api/v1/metrics",
            get(tracking::handle_list_metrics).put(tracking::handle_upsert_metrics),
        )
        .route(
            "/api/v1/metrics/snapshot",
            post(tracking::handle_snapshot_metrics),
        )
        .route(
            "/api/v1/keywords",
            get(tracking::handle_top_keywords).put(tracking::handle_upsert_keyword),
        )
        .route(
            "/api/v1/keywords/refresh",
            post(tracking::handle_refresh_keywords),
        )
        .route("/api/v1/dashboard", get(tracking::handle_dashboard))
        .route("/api/v1/pipeline", get(tracking::handle_pipeline_summary))
        .route(
            "/api/v1/interview-performance",
            get(tracking::handle_interview_performance),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::storage::{DocumentStore, InMemoryDocumentStore};

    fn router() -> (Router, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::default());
        (build_router(AppState::for_tests(store.clone())), store)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const JD: &str = "Senior Backend Engineer\n\
        Requirements:\n\
        - 5+ years of experience with Python and PostgreSQL\n\
        - Experience with Docker and Kubernetes\n\
        Nice to have: AWS";

    #[tokio::test]
    async fn test_health() {
        let (app, _) = router();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "applywise");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (app, _) = router();
        let response = app
            .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analyze_jd() {
        let (app, _) = router();
        let response = app
            .oneshot(post_json("/api/v1/jd/analyze", json!({ "jd_text": JD })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["analysis"].is_object());
    }

    #[tokio::test]
    async fn test_analyze_jd_rejects_blank_text() {
        let (app, _) = router();
        let response = app
            .oneshot(post_json("/api/v1/jd/analyze", json!({ "jd_text": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_parse_text_stores_nothing() {
        let (app, store) = router();
        let text = "Jane Doe\njane@example.com\n\nEXPERIENCE\nEngineer at Acme\n\nSKILLS\nRust, SQL";
        let response = app
            .oneshot(post_json("/api/v1/resumes/parse-text", json!({ "text": text })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["markdown"].is_string());
        assert!(body.get("document_key").is_none());
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_stored_document() {
        let (app, store) = router();
        let id = uuid::Uuid::new_v4();
        store
            .put(
                &crate::storage::cover_letter_key(id),
                b"Dear Hiring Team".to_vec(),
                crate::storage::MARKDOWN,
            )
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/api/v1/applications/{id}/documents/cover-letter"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            crate::storage::MARKDOWN
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Dear Hiring Team");

        let missing = app
            .oneshot(
                Request::get(format!("/api/v1/applications/{id}/documents/interview-prep"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_document_rejects_unknown_kind() {
        let (app, _) = router();
        let id = uuid::Uuid::new_v4();
        let response = app
            .oneshot(
                Request::get(format!("/api/v1/applications/{id}/documents/notes"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cover_letter_without_application() {
        let (app, store) = router();
        let response = app
            .oneshot(post_json(
                "/api/v1/cover-letters",
                json!({
                    "user": { "name": "Jane Doe", "email": "jane@example.com" },
                    "research": { "company": "Acme" },
                    "jd_text": JD,
                    "position": "Senior Backend Engineer",
                    "tone": "professional",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["cover_letter"]
            .as_str()
            .unwrap()
            .contains("Senior Backend Engineer"));
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_cover_letter_requires_position() {
        let (app, _) = router();
        let response = app
            .oneshot(post_json(
                "/api/v1/cover-letters",
                json!({ "jd_text": JD, "position": "" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_optimize_rejects_out_of_range_target() {
        let (app, _) = router();
        let response = app
            .oneshot(post_json(
                "/api/v1/resumes/optimize",
                json!({
                    "resume_markdown": "# Jane Doe\n\n## Experience\n\n- Built things",
                    "jd_text": JD,
                    "target_score": 150.0,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_application_validates_before_database() {
        let (app, _) = router();
        let response = app
            .oneshot(post_json(
                "/api/v1/applications",
                json!({ "company": " ", "position": "Engineer", "applied_date": "2024-03-01" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_rejects_unknown_filter() {
        let (app, _) = router();
        let response = app
            .oneshot(
                Request::get("/api/v1/dashboard?filter=since%20forever")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_rejects_out_of_range_filter() {
        let (app, _) = router();
        let response = app
            .oneshot(
                Request::get("/api/v1/dashboard?filter=last%20999999999%20days")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_rejects_unknown_status() {
        let (app, _) = router();
        let response = app
            .oneshot(
                Request::get("/api/v1/dashboard?include=applied,ghosted")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
