mod test_utils;

use reqwest::StatusCode;
use serde_json::Value;
use test_utils::*;

#[actix_rt::test]
async fn admin_routes_require_a_token() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/v1/admin/projects").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn non_admin_token_is_forbidden() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/v1/admin/dashboard"))
        .bearer_auth(visitor_token())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn tampered_token_is_rejected() {
    let app = TestApp::spawn().await;
    let mut token = admin_token();
    token.push('x');

    let response = app
        .client
        .get(app.url("/api/v1/admin/contacts"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn admin_email_match_ignores_case() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/v1/admin/testimonials"))
        .bearer_auth(token_for("Owner@Example.COM"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn public_routes_need_no_token() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/api/v1/projects").await.status(), StatusCode::OK);
    assert_eq!(app.get("/api/v1/blog/posts").await.status(), StatusCode::OK);
    assert_eq!(app.get("/api/v1/testimonials").await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn health_reports_store_status() {
    let app = TestApp::spawn().await;

    let health: Value = app.get("/api/v1/health").await.json().await.unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["store_backend"], "rest");
}
