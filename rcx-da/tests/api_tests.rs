//! Integration tests for rcx-da API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use rcx_da::config::{DaConfig, IntakeConfig, PipelineConfig};
use rcx_da::AppState;

/// Test helper: app with shrunken intake/pipeline timings
fn create_test_app() -> (Router, AppState) {
    let config = DaConfig {
        intake: IntakeConfig {
            queue_delay_ms: 5,
            extract_base_ms: 10,
            extract_jitter_ms: 0,
            ..Default::default()
        },
        pipeline: PipelineConfig {
            poll_attempts: 40,
            poll_interval_ms: 10,
        },
        ..Default::default()
    };
    let state = AppState::new(config);
    (rcx_da::build_router(state.clone()), state)
}

/// Test helper: multipart upload request with a single `file` field
fn multipart_request(uri: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "rcx-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

/// Poll a job status endpoint until it reports a terminal state
async fn poll_until_terminal(app: &Router, uri: &str) -> serde_json::Value {
    for _ in 0..200 {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let (status, json) = get_json(app, uri).await;
        assert_eq!(status, StatusCode::OK);
        if json["state"] == "complete" || json["state"] == "error" {
            return json;
        }
    }
    panic!("job at {} never reached a terminal state", uri);
}

#[tokio::test]
async fn health_endpoint_reports_module() {
    let (app, _state) = create_test_app();

    let (status, json) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "rcx-da");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn upload_then_poll_then_read_entities() {
    let (app, _state) = create_test_app();

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/documents/upload",
            "harborview_ttm.pdf",
            "application/pdf",
            b"ttm operating statement bytes",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let job_id = json["job_id"].as_str().expect("job_id present").to_string();

    let status = poll_until_terminal(&app, &format!("/jobs/{}/status", job_id)).await;
    assert_eq!(status["state"], "complete");
    assert_eq!(status["progress"], 100);
    let doc_id = status["doc_id"].as_str().expect("doc_id on completion");

    let (status, entities) = get_json(&app, &format!("/documents/{}/entities", doc_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entities["doc_id"], doc_id);
    assert_eq!(entities["document_type"], "ttm_operating_statement");
    assert_eq!(entities["source_file"], "harborview_ttm.pdf");
    assert_eq!(entities["totals"]["effective_gross_income"], 1_642_500.0);
    assert_eq!(entities["totals"]["operating_expenses"], 511_000.0);
    // NOI/DSCR derivation belongs to the mapper, not the raw extraction
    assert!(entities["totals"]["net_operating_income"].is_null());
    assert_eq!(entities["line_items"].as_array().unwrap().len(), 24);
    assert_eq!(entities["rent_roll"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let (app, _state) = create_test_app();

    let boundary = "rcx-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/documents/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn empty_upload_is_rejected_before_any_job_exists() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(multipart_request(
            "/documents/upload",
            "empty.pdf",
            "application/pdf",
            b"",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(state.jobs.len().await, 0);
}

#[tokio::test]
async fn unsupported_content_type_is_rejected() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(multipart_request(
            "/documents/upload",
            "clip.mp4",
            "video/mp4",
            b"not a financial document",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_ids_return_not_found_bodies() {
    let (app, _state) = create_test_app();
    let missing = uuid::Uuid::new_v4();

    for uri in [
        format!("/jobs/{}/status", missing),
        format!("/documents/{}/entities", missing),
        format!("/rune/jobs/{}", missing),
        format!("/deals/{}", missing),
    ] {
        let (status, json) = get_json(&app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {}", uri);
        assert_eq!(json["error"]["code"], "NOT_FOUND", "uri: {}", uri);
        assert!(json["error"]["message"].is_string(), "uri: {}", uri);
    }
}

#[tokio::test]
async fn deals_list_is_empty_before_any_run() {
    let (app, _state) = create_test_app();

    let (status, json) = get_json(&app, "/deals").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}
