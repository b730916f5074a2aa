
use reqwest::{header, StatusCode};
use serde_json::{json, Value};
use test_utils::{test_config, TestApp, ADMIN_SECRET};

#[actix_rt::test]
async fn home_banner_reports_version() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_rt::test]
async fn public_health_needs_no_database() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn certifications_filter_by_skill_case_insensitively() {
    let app = TestApp::spawn().await;

    let (status, all) = app.get_json("/api/v1/certifications").await;
    assert_eq!(status, StatusCode::OK);
    assert!(all.as_array().unwrap().len() >= 2);

    let (_, linux) = app.get_json("/api/v1/certifications?skill=LINUX").await;
    let linux = linux.as_array().unwrap();
    assert_eq!(linux.len(), 1);
    assert_eq!(linux[0]["slug"], "linux-foundation-lfcs");
}

#[actix_rt::test]
async fn unknown_certification_is_json_404() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/api/v1/certifications/not-a-cert").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Certification"));
}

#[actix_rt::test]
async fn trailing_slash_is_normalized() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get_json("/api/v1/certifications/").await;

    assert_eq!(status, StatusCode::OK);
}

#[actix_rt::test]
async fn performance_detection_follows_the_heuristic() {
    let app = TestApp::spawn().await;

    let detect = |body: Value| {
        let client = app.client.clone();
        let url = app.url("/api/v1/performance/detect");
        async move {
            let response = client.post(url).json(&body).send().await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            response.json::<Value>().await.unwrap()
        }
    };

    let desktop = detect(json!({"device_memory_gb": 16, "hardware_concurrency": 12})).await;
    assert_eq!(desktop["tier"], "high");
    assert_eq!(desktop["settings"]["particle_count"], 150);

    let calm = detect(json!({
        "device_memory_gb": 16,
        "hardware_concurrency": 12,
        "prefers_reduced_motion": true
    }))
    .await;
    assert_eq!(calm["tier"], "low");

    let forced = detect(json!({"device_memory_gb": 16, "override_tier": "potato"})).await;
    assert_eq!(forced["tier"], "potato");
    assert_eq!(forced["overridden"], true);
}

#[actix_rt::test]
async fn tier_presets_are_listed() {
    let app = TestApp::spawn().await;

    let (status, tiers) = app.get_json("/api/v1/performance/tiers").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = tiers.as_array().unwrap().iter().map(|t| t["tier"].as_str().unwrap()).collect();
    assert_eq!(names, ["high", "medium", "low", "potato"]);
}

#[actix_rt::test]
async fn admin_routes_require_a_bearer_token() {
    let app = TestApp::spawn().await;

    for path in ["/api/v1/admin/dashboard", "/api/v1/admin/blog/posts", "/api/v1/admin/projects"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
    }

    let response = app.client
        .get(app.url("/api/v1/admin/dashboard"))
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn wrong_secret_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.login("definitely-not-it").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn login_issues_bearer_tokens() {
    let app = TestApp::spawn().await;

    let tokens = app.admin_tokens().await;

    assert_eq!(tokens.token_type, "Bearer");
    assert_eq!(tokens.expires_in, app.config.jwt_expiration_minutes * 60);
    assert_ne!(tokens.access_token, tokens.refresh_token);
}

#[actix_rt::test]
async fn login_attempts_are_rate_limited() {
    let mut config = test_config();
    config.login_rate_per_minute = 2;
    let app = TestApp::spawn_with(config).await;

    assert_eq!(app.login("wrong-1").await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.login("wrong-2").await.status(), StatusCode::UNAUTHORIZED);

    let limited = app.login(ADMIN_SECRET).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers().contains_key(header::RETRY_AFTER));
}

#[actix_rt::test]
async fn refresh_exchanges_only_refresh_tokens() {
    let app = TestApp::spawn().await;
    let tokens = app.admin_tokens().await;

    let refreshed = app.client
        .post(app.url("/api/v1/admin/refresh"))
        .json(&json!({ "refresh_token": tokens.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(refreshed.status(), StatusCode::OK);

    let misused = app.client
        .post(app.url("/api/v1/admin/refresh"))
        .json(&json!({ "refresh_token": tokens.access_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(misused.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn refresh_token_cannot_open_admin_routes() {
    let app = TestApp::spawn().await;
    let tokens = app.admin_tokens().await;

    let response = app.client
        .post(app.url("/api/v1/admin/blog/preview"))
        .bearer_auth(&tokens.refresh_token)
        .json(&json!({ "content": [{"type": "paragraph", "text": "hi"}] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn preview_renders_sanitized_html() {
    let app = TestApp::spawn().await;
    let tokens = app.admin_tokens().await;

    let response = app.client
        .post(app.url("/api/v1/admin/blog/preview"))
        .bearer_auth(&tokens.access_token)
        .json(&json!({
            "content": [
                {"type": "heading", "text": "Hello terminal"},
                {"type": "paragraph", "text": "Some **bold** words <script>alert(1)</script>"},
                {"type": "code", "code": "fn main() {}", "language": "rust"}
            ]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let html = body["content_html"].as_str().unwrap();

    assert!(html.contains("<h2"));
    assert!(html.contains("<strong>bold</strong>"));
    assert!(!html.contains("<script>"));
    assert_eq!(body["reading_time_minutes"], 1);
}

#[actix_rt::test]
async fn preview_rejects_empty_content() {
    let app = TestApp::spawn().await;
    let tokens = app.admin_tokens().await;

    let response = app.client
        .post(app.url("/api/v1/admin/blog/preview"))
        .bearer_auth(&tokens.access_token)
        .json(&json!({ "content": [] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "content");
}

#[actix_rt::test]
async fn logout_without_token_store_still_succeeds() {
    let app = TestApp::spawn().await;
    let tokens = app.admin_tokens().await;

    let response = app.client
        .post(app.url("/api/v1/admin/logout"))
        .bearer_auth(&tokens.access_token)
        .json(&json!({ "refresh_token": tokens.refresh_token }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn logout_accepts_an_empty_body() {
    let app = TestApp::spawn().await;
    let tokens = app.admin_tokens().await;

    let response = app.client
        .post(app.url("/api/v1/admin/logout"))
        .bearer_auth(&tokens.access_token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Logged out successfully");
}

#[actix_rt::test]
async fn malformed_json_gets_a_json_error() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/v1/admin/login"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("JSON payload error"));
}

#[actix_rt::test]
async fn unknown_routes_answer_json_404() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/api/v1/nothing-here").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}
