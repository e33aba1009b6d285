use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use matricula::config::cors::CorsConfig;
use matricula::modules::students::store::MemoryStudentStore;
use matricula::router::init_router;
use matricula::state::AppState;
use serde_json::{Value, json};
use uuid::Uuid;

/// Builds the full application router over a fresh in-memory store.
pub fn setup_test_app() -> Router {
    let state = AppState {
        store: Arc::new(MemoryStudentStore::new()),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

static NATIONAL_ID_SEQ: AtomicU64 = AtomicU64::new(0);

/// 11-digit national id, unique within the test process.
pub fn unique_national_id() -> String {
    format!("{:011}", NATIONAL_ID_SEQ.fetch_add(1, Ordering::Relaxed))
}

pub fn unique_email() -> String {
    format!("student-{}@test.com", Uuid::new_v4())
}

pub fn student_payload(name: &str, national_id: &str, email: &str) -> Value {
    json!({
        "name": name,
        "national_id": national_id,
        "email": email,
        "course": "LAW",
        "active": true
    })
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
