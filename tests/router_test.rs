//! Router-level tests that drive the app in process with `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use listdesk::config::AppConfig;
use listdesk::db::{demo, MemoryStore};
use listdesk::models::user::{DEMO_ADMIN_ID, DEMO_ADMIN_PASSWORD};
use listdesk::{routes, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";

async fn app() -> Router {
    let store = Arc::new(MemoryStore::default());
    demo::seed(&store).await.unwrap();
    routes::router(AppState {
        store,
        config: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: SECRET.to_string(),
            jwt_access_token_expiry_secs: 600,
            frontend_url: "http://localhost:5173".to_string(),
            seed_demo_data: true,
        },
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "email": "admin@example.com", "password": DEMO_ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["user"]["role"], "admin");
    body["data"]["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn stats_endpoint_returns_camel_case_view() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Request::get(format!("/api/campaigns/stats/{DEMO_ADMIN_ID}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"];
    assert_eq!(stats["active"], 2);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["draft"], 1);
    assert_eq!(stats["totalBudget"], 15000.0);
    assert_eq!(stats["totalLeads"], 3300);
    assert_eq!(stats["totalConversions"], 419);
    assert_eq!(stats["byPlatform"]["LinkedIn"], 1);
}

#[tokio::test]
async fn create_requires_a_bearer_token() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/jobs", None, json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["data"].is_null());
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/jobs", Some("not-a-jwt"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_job_is_a_validation_error() {
    let app = app().await;
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/jobs",
            Some(&token),
            json!({
                "title": "Intern",
                "company": "Acme",
                "location": "Remote",
                "description": "Help out",
                "requirements": ["", "  "],
                "type": "Internship",
                "category": "Development"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["message"],
        "at least one requirement is required"
    );
}

#[tokio::test]
async fn created_job_appears_newest_first() {
    let app = app().await;
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/jobs",
            Some(&token),
            json!({
                "title": "Site Reliability Engineer",
                "company": "Cloud Services Inc.",
                "location": "Remote",
                "description": "Keep things up",
                "requirements": ["Linux", ""],
                "type": "Contract",
                "category": "DevOps"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["requirements"], json!(["Linux"]));
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        Request::get(format!("/api/jobs/user/{DEMO_ADMIN_ID}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let jobs = body["data"].as_array().unwrap();
    assert_eq!(jobs.len(), 7);
    assert_eq!(jobs[0]["id"], id);

    let (status, body) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/jobs/{id}"), Some(&token), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "Job deleted successfully");

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/jobs/{id}"),
            Some(&token),
            json!({ "status": "closed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Job not found");
}

#[tokio::test]
async fn readiness_counts_tables() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Request::get("/health/ready").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["items"], 4);
}
