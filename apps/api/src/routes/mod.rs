pub mod feedback;
pub mod health;

use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/follow-up", post(handlers::handle_follow_up))
        .route("/api/v1/feedback", post(feedback::handle_feedback))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::fixtures::pdf_with_pages;
    use crate::llm_client::testing::RecordingGenerator;

    const BOUNDARY: &str = "resumeats-test-boundary";

    fn test_app(reply: &str) -> (Router, Arc<RecordingGenerator>) {
        test_app_with_limit(reply, None)
    }

    fn test_app_with_limit(
        reply: &str,
        max_upload_bytes: Option<&str>,
    ) -> (Router, Arc<RecordingGenerator>) {
        let llm = Arc::new(RecordingGenerator::replying(reply));
        let config = Config::from_lookup(|key: &str| match key {
            "GOOGLE_API_KEY" => Some("AIzaTestKey".to_string()),
            "MAX_UPLOAD_BYTES" => max_upload_bytes.map(str::to_string),
            _ => None,
        })
        .unwrap();
        let state = AppState {
            llm: llm.clone(),
            config,
        };
        (build_router(state), llm)
    }

    /// (field name, file name, content)
    fn multipart_body(fields: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, content) in fields {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(file_name) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn analyze_request(fields: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields)))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let (app, _) = test_app("unused");
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "test-model");
    }

    #[tokio::test]
    async fn test_analyze_returns_report() {
        let (app, llm) = test_app("## Quick Scan\nLooks solid.");
        let pdf = pdf_with_pages(&["John Doe, Software Engineer"]);

        let response = app
            .oneshot(analyze_request(&[
                ("resume", Some("resume.pdf"), pdf.as_slice()),
                ("job_description", None, b""),
                ("mode", None, b"Quick Scan"),
                ("keyword_optimization", None, b"off"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["mode"], "quick_scan");
        assert_eq!(body["analysis"], "## Quick Scan\nLooks solid.");
        assert_eq!(body["keyword_optimization"], false);
        assert_eq!(body["document"]["page_count"], 1);
        assert!(body["document"]["text"]
            .as_str()
            .unwrap()
            .contains("John Doe, Software Engineer"));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_analyze_without_file_is_missing_input() {
        let (app, llm) = test_app("unused");

        let response = app
            .oneshot(analyze_request(&[
                ("job_description", None, b"Rust engineer"),
                ("mode", None, b"detailed"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "MISSING_INPUT");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_with_unknown_mode_is_configuration_error() {
        let (app, llm) = test_app("unused");
        let pdf = pdf_with_pages(&["John Doe"]);

        let response = app
            .oneshot(analyze_request(&[
                ("resume", Some("resume.pdf"), pdf.as_slice()),
                ("mode", None, b"exhaustive"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_with_corrupt_pdf_is_unprocessable() {
        let (app, llm) = test_app("unused");

        let response = app
            .oneshot(analyze_request(&[(
                "resume",
                Some("resume.pdf"),
                b"this is not a pdf",
            )]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "DOCUMENT_PARSE_ERROR");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_over_size_limit_is_payload_too_large() {
        let (app, llm) = test_app_with_limit("unused", Some("2000"));
        let mut pdf = pdf_with_pages(&["John Doe, Software Engineer"]);
        pdf.extend(std::iter::repeat(b' ').take(5000));

        let response = app
            .oneshot(analyze_request(&[
                ("resume", Some("resume.pdf"), pdf.as_slice()),
                ("mode", None, b"quick_scan"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_under_size_limit_is_analyzed() {
        let (app, llm) = test_app_with_limit("fits", Some("20000"));
        let pdf = pdf_with_pages(&["John Doe, Software Engineer"]);

        let response = app
            .oneshot(analyze_request(&[("resume", Some("resume.pdf"), pdf.as_slice())]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_missing_field_gets_error_body() {
        let (app, llm) = test_app("unused");

        let response = app
            .oneshot(json_request(
                "/api/v1/follow-up",
                json!({ "document_text": "John Doe", "question": "Anything missing?" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("prior_analysis"));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_feedback_without_json_body_gets_error_body() {
        let (app, _) = test_app("unused");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/feedback")
                    .body(Body::from("Great tool"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_follow_up_round_trip() {
        let (app, llm) = test_app("Lead with your Rust projects.");

        let response = app
            .oneshot(json_request(
                "/api/v1/follow-up",
                json!({
                    "document_text": "John Doe, Software Engineer",
                    "prior_analysis": "Strong systems background.",
                    "question": "What should I put first?"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["answer"], "Lead with your Rust projects.");
        assert_eq!(body["question"], "What should I put first?");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_feedback_requires_text() {
        let (app, _) = test_app("unused");

        let response = app
            .clone()
            .oneshot(json_request("/api/v1/feedback", json!({ "message": "  " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                "/api/v1/feedback",
                json!({ "message": "Great tool" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "received");
    }
}
