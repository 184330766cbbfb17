mod test_utils;

use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

async fn create_draft_post(app: &TestApp) -> Value {
    let response = app
        .admin_post(
            "/api/v1/admin/blog/posts",
            &json!({
                "title_en": "Hello, World!",
                "title_ar": "مرحبا بالعالم",
                "excerpt_en": "First post",
                "excerpt_ar": "أول مقال",
                "content_en": "# Hi\n\n<script>alert(1)</script>Body",
                "content_ar": "محتوى",
                "tags": "rust,  web ,, "
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[actix_rt::test]
async fn new_post_is_a_draft_with_derived_slug() {
    let app = TestApp::spawn().await;

    let post = create_draft_post(&app).await;

    assert_eq!(post["slug"], "hello-world");
    assert_eq!(post["published"], false);
    assert!(post["published_at"].is_null());
    assert_eq!(post["publication"]["state"], "draft");
    assert_eq!(post["tags"], json!(["rust", "web"]));
    assert_eq!(post["tags_text"], "rust, web");

    let public: Vec<Value> = app.get("/api/v1/blog/posts").await.json().await.unwrap();
    assert!(public.is_empty());

    let response = app.get("/api/v1/blog/posts/hello-world").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn republishing_keeps_first_publication_date() {
    let app = TestApp::spawn().await;
    let post = create_draft_post(&app).await;
    let id = post["id"].as_str().unwrap();

    let published: Value = app
        .admin_post(&format!("/api/v1/admin/blog/posts/{}/publish", id), &json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(published["published"], true);
    let first_date = published["published_at"].clone();
    assert!(first_date.is_string());

    let unpublished: Value = app
        .admin_post(&format!("/api/v1/admin/blog/posts/{}/unpublish", id), &json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(unpublished["published"], false);
    assert_eq!(unpublished["published_at"], first_date);

    let republished: Value = app
        .admin_post(&format!("/api/v1/admin/blog/posts/{}/toggle", id), &json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(republished["published"], true);
    assert_eq!(republished["published_at"], first_date);
}

#[actix_rt::test]
async fn published_post_is_rendered_and_counts_views() {
    let app = TestApp::spawn().await;
    let post = create_draft_post(&app).await;
    let id = post["id"].as_str().unwrap();
    app.admin_post(&format!("/api/v1/admin/blog/posts/{}/publish", id), &json!({}))
        .await;

    let first: Value = app.get("/api/v1/blog/posts/hello-world").await.json().await.unwrap();
    assert_eq!(first["views"], 0);
    assert_eq!(first["dir"], "ltr");
    let html = first["content_html"].as_str().unwrap();
    assert!(html.contains("<h1>Hi</h1>"));
    assert!(!html.contains("<script>"));

    let second: Value = app.get("/api/v1/blog/posts/hello-world").await.json().await.unwrap();
    assert_eq!(second["views"], 1);

    let arabic: Value = app
        .get("/api/v1/blog/posts/hello-world?locale=ar")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(arabic["title"], "مرحبا بالعالم");
    assert_eq!(arabic["dir"], "rtl");
}

#[actix_rt::test]
async fn editing_title_rederives_slug() {
    let app = TestApp::spawn().await;
    let post = create_draft_post(&app).await;
    let id = post["id"].as_str().unwrap();

    let response = app
        .admin_patch(
            &format!("/api/v1/admin/blog/posts/{}", id),
            &json!({ "title_en": "Second Thoughts" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["slug"], "second-thoughts");

    let response = app
        .admin_patch(&format!("/api/v1/admin/blog/posts/{}", id), &json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn contact_status_follows_lifecycle() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/v1/contact",
            &json!({
                "name": "  Layla  ",
                "email": "layla@example.com",
                "message": "I need a translation of my thesis."
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let listed: Vec<Value> = app.admin_get("/api/v1/admin/contacts").await.json().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["status"], "new");
    assert_eq!(listed[0]["name"], "Layla");

    let status_url = format!("/api/v1/admin/contacts/{}/status", id);

    let read: Value = app.admin_post(&status_url, &json!({"status": "read"})).await.json().await.unwrap();
    assert_eq!(read["status"], "read");
    assert!(read["replied_at"].is_null());

    let back_to_new = app.admin_post(&status_url, &json!({"status": "new"})).await;
    assert_eq!(back_to_new.status(), StatusCode::BAD_REQUEST);

    let replied: Value = app.admin_post(&status_url, &json!({"status": "replied"})).await.json().await.unwrap();
    assert_eq!(replied["status"], "replied");
    let replied_at = replied["replied_at"].clone();
    assert!(replied_at.is_string());

    let archived: Value = app.admin_post(&status_url, &json!({"status": "archived"})).await.json().await.unwrap();
    assert_eq!(archived["status"], "archived");
    assert_eq!(archived["replied_at"], replied_at);

    let reopened: Value = app.admin_post(&status_url, &json!({"status": "replied"})).await.json().await.unwrap();
    assert_eq!(reopened["status"], "replied");
    assert_eq!(reopened["replied_at"], replied_at);

    let filtered: Vec<Value> = app
        .admin_get("/api/v1/admin/contacts?status=new")
        .await
        .json()
        .await
        .unwrap();
    assert!(filtered.is_empty());
}

#[actix_rt::test]
async fn contact_notes_are_saved() {
    let app = TestApp::spawn().await;
    let created: Value = app
        .post(
            "/api/v1/contact",
            &json!({"name": "Omar", "email": "omar@example.com", "message": "Hello there"}),
        )
        .await
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let updated: Value = app
        .admin_patch(
            &format!("/api/v1/admin/contacts/{}/notes", id),
            &json!({"notes": "Called back on Monday"}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated["notes"], "Called back on Monday");
}

#[actix_rt::test]
async fn contact_form_is_rate_limited() {
    let app = TestApp::spawn().await;
    let body = json!({"name": "Sam", "email": "sam@example.com", "message": "Ping ping ping"});

    for _ in 0..3 {
        let response = app.post("/api/v1/contact", &body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.post("/api/v1/contact", &body).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
}

#[actix_rt::test]
async fn invalid_contact_form_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/v1/contact",
            &json!({"name": "A", "email": "not-an-email", "message": "Hi"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(app.store.rows(portfolio_cms::repositories::Table::ContactSubmissions).is_empty());
}

#[actix_rt::test]
async fn rejected_contact_forms_do_not_use_up_the_window() {
    let app = TestApp::spawn().await;

    for _ in 0..4 {
        let response = app
            .post("/api/v1/contact", &json!({"name": "Sam", "email": "nope", "message": "Ping ping"}))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app
        .post(
            "/api/v1/contact",
            &json!({"name": "Sam", "email": "sam@example.com", "message": "Ping ping"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()["x-ratelimit-remaining"], "2");
}

#[actix_rt::test]
async fn carousel_shows_only_approved_and_featured() {
    let app = TestApp::spawn().await;

    let visible: Value = app
        .admin_post(
            "/api/v1/admin/testimonials",
            &json!({
                "client_name": "Dr. Hana",
                "testimonial_en": "Excellent work",
                "testimonial_ar": "عمل ممتاز",
                "rating": 5,
                "featured": true
            }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(visible["approved"], true);

    let pending: Value = app
        .admin_post(
            "/api/v1/admin/testimonials",
            &json!({
                "client_name": "Yusuf",
                "testimonial_en": "Great",
                "testimonial_ar": "رائع",
                "rating": 4,
                "approved": false,
                "featured": true
            }),
        )
        .await
        .json()
        .await
        .unwrap();

    let carousel: Vec<Value> = app.get("/api/v1/testimonials").await.json().await.unwrap();
    assert_eq!(carousel.len(), 1);
    assert_eq!(carousel[0]["client_name"], "Dr. Hana");
    assert_eq!(carousel[0]["text"], "Excellent work");

    let pending_id = pending["id"].as_str().unwrap();
    app.admin_post(&format!("/api/v1/admin/testimonials/{}/approved", pending_id), &json!({}))
        .await;

    let carousel: Vec<Value> = app.get("/api/v1/testimonials?locale=ar").await.json().await.unwrap();
    assert_eq!(carousel.len(), 2);
    assert!(carousel.iter().all(|t| t["dir"] == "rtl"));

    let bad_rating = app
        .admin_post(
            "/api/v1/admin/testimonials",
            &json!({
                "client_name": "X",
                "testimonial_en": "x",
                "testimonial_ar": "x",
                "rating": 6
            }),
        )
        .await;
    assert_eq!(bad_rating.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn projects_list_reports_categories_and_filters() {
    let app = TestApp::spawn().await;

    for (title, category, featured, order) in [
        ("Thesis Translation", "translation", true, 2),
        ("Field Research", "research", false, 1),
        ("Interview Transcripts", "transcription", true, 3),
    ] {
        let response = app
            .admin_post(
                "/api/v1/admin/projects",
                &json!({
                    "title_en": title,
                    "title_ar": title,
                    "category": category,
                    "featured": featured,
                    "order_index": order
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let all: Value = app.get("/api/v1/projects").await.json().await.unwrap();
    assert_eq!(all["projects"].as_array().unwrap().len(), 3);
    assert_eq!(all["projects"][0]["title"], "Field Research");
    assert_eq!(all["categories"].as_array().unwrap().len(), 3);

    let research: Value = app.get("/api/v1/projects?category=research").await.json().await.unwrap();
    assert_eq!(research["projects"].as_array().unwrap().len(), 1);
    assert_eq!(research["categories"].as_array().unwrap().len(), 3);

    let featured: Vec<Value> = app.get("/api/v1/projects/featured").await.json().await.unwrap();
    assert_eq!(featured.len(), 2);
    assert_eq!(featured[0]["title"], "Thesis Translation");
}

#[actix_rt::test]
async fn unknown_project_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.get(&format!("/api/v1/projects/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/api/v1/projects/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn delete_requires_confirmation() {
    let app = TestApp::spawn().await;
    let project: Value = app
        .admin_post(
            "/api/v1/admin/projects",
            &json!({"title_en": "Temp", "title_ar": "مؤقت", "category": "cv"}),
        )
        .await
        .json()
        .await
        .unwrap();
    let id = project["id"].as_str().unwrap();

    let response = app.admin_delete(&format!("/api/v1/admin/projects/{}", id)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .admin_delete(&format!("/api/v1/admin/projects/{}?confirm=true", id))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let listed: Vec<Value> = app.admin_get("/api/v1/admin/projects").await.json().await.unwrap();
    assert!(listed.is_empty());
}

#[actix_rt::test]
async fn dashboard_counts_content() {
    let app = TestApp::spawn().await;
    create_draft_post(&app).await;
    app.post(
        "/api/v1/contact",
        &json!({"name": "Mia", "email": "mia@example.com", "message": "Quote please"}),
    )
    .await;

    let stats: Value = app.admin_get("/api/v1/admin/dashboard").await.json().await.unwrap();
    assert_eq!(stats["blog_posts"], 1);
    assert_eq!(stats["contacts"], 1);
    assert_eq!(stats["projects"], 0);
    assert_eq!(stats["total_views"], 0);
}

#[actix_rt::test]
async fn analytics_event_is_recorded() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/v1/analytics/events"))
        .header("User-Agent", "integration-test")
        .json(&json!({"event_type": "page_view", "page_path": "/en/blog", "locale": "en"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let rows = app.store.rows(portfolio_cms::repositories::Table::AnalyticsEvents);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_agent"], "integration-test");
}

#[actix_rt::test]
async fn null_on_required_project_fields_is_rejected() {
    let app = TestApp::spawn().await;
    let project: Value = app
        .admin_post(
            "/api/v1/admin/projects",
            &json!({"title_en": "Atlas", "title_ar": "أطلس", "category": "research", "tags": "maps"}),
        )
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/api/v1/admin/projects/{}", project["id"].as_str().unwrap());

    for field in ["category", "title_en", "featured", "tags"] {
        let response = app.admin_patch(&path, &json!({ field: null })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{field}: null");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["details"][0]["field"], field);
    }

    let response = app.get("/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing: Value = response.json().await.unwrap();
    assert_eq!(listing["projects"][0]["title"], "Atlas");
    assert_eq!(listing["projects"][0]["category"], "research");

    let cleared: Value = app
        .admin_patch(&path, &json!({"live_url": null}))
        .await
        .json()
        .await
        .unwrap();
    assert!(cleared["live_url"].is_null());
}

#[actix_rt::test]
async fn null_on_required_post_fields_is_rejected() {
    let app = TestApp::spawn().await;
    let post = create_draft_post(&app).await;
    let path = format!("/api/v1/admin/blog/posts/{}", post["id"].as_str().unwrap());

    for field in ["title_en", "content_ar", "tags", "published"] {
        let response = app.admin_patch(&path, &json!({ field: null })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{field}: null");
    }

    let response = app.admin_get("/api/v1/admin/blog/posts").await;
    assert_eq!(response.status(), StatusCode::OK);
    let posts: Vec<Value> = response.json().await.unwrap();
    assert_eq!(posts[0]["title_en"], "Hello, World!");
    assert_eq!(posts[0]["slug"], "hello-world");
}

#[actix_rt::test]
async fn null_on_required_testimonial_fields_is_rejected() {
    let app = TestApp::spawn().await;
    let testimonial: Value = app
        .admin_post(
            "/api/v1/admin/testimonials",
            &json!({
                "client_name": "Dr. Hana",
                "testimonial_en": "Excellent work",
                "testimonial_ar": "عمل ممتاز",
                "rating": 5,
                "featured": true
            }),
        )
        .await
        .json()
        .await
        .unwrap();
    let path = format!("/api/v1/admin/testimonials/{}", testimonial["id"].as_str().unwrap());

    for field in ["client_name", "rating", "approved"] {
        let response = app.admin_patch(&path, &json!({ field: null })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{field}: null");
    }

    let carousel: Vec<Value> = app.get("/api/v1/testimonials").await.json().await.unwrap();
    assert_eq!(carousel.len(), 1);
    assert_eq!(carousel[0]["client_name"], "Dr. Hana");
}
