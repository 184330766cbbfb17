use async_trait::async_trait;
use chrono::Utc;
use mockall::{mock, predicate::*};
use portfolio_cms::{
    entities::{locale::Locale, project::NewProjectRequest},
    errors::AppError,
    lifecycle::ContactStatus,
    repositories::{ContentStore, Record, SelectQuery, Table},
    use_cases::{
        blog::BlogPostHandler, contact::ContactHandler, dashboard::DashboardHandler,
        projects::ProjectHandler,
    },
};
use serde_json::{json, Value};
use uuid::Uuid;

mock! {
    pub Store {}

    #[async_trait]
    impl ContentStore for Store {
        async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, AppError>;
        async fn insert(&self, table: Table, record: Record) -> Result<Record, AppError>;
        async fn update(&self, table: Table, id: Uuid, changes: Record) -> Result<Record, AppError>;
        async fn delete(&self, table: Table, id: Uuid) -> Result<(), AppError>;
        async fn count(&self, table: Table) -> Result<u64, AppError>;
        async fn ping(&self) -> Result<(), AppError>;
    }
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => panic!("test rows must be objects"),
    }
}

fn project_row(id: Uuid) -> Record {
    let now = Utc::now();
    record(json!({
        "id": id,
        "title_en": "Thesis Translation",
        "title_ar": "ترجمة أطروحة",
        "description_en": "",
        "description_ar": "",
        "category": "translation",
        "tags": ["academic"],
        "featured": false,
        "order_index": 0,
        "created_at": now,
        "updated_at": now
    }))
}

#[actix_rt::test]
async fn dashboard_shows_zero_for_failed_counts() {
    let mut store = MockStore::new();
    store.expect_count().returning(|table| match table {
        Table::Projects => Err(AppError::Store("timeout".into())),
        Table::AnalyticsEvents => Ok(120),
        _ => Ok(3),
    });

    let stats = DashboardHandler::new(store).stats().await;

    assert_eq!(stats.projects, 0);
    assert_eq!(stats.contacts, 3);
    assert_eq!(stats.testimonials, 3);
    assert_eq!(stats.blog_posts, 3);
    assert_eq!(stats.total_views, 120);
}

#[actix_rt::test]
async fn failed_insert_keeps_cached_list() {
    let id = Uuid::new_v4();
    let mut store = MockStore::new();
    store
        .expect_select()
        .times(1)
        .returning(move |_| Ok(vec![project_row(id)]));
    store
        .expect_insert()
        .with(eq(Table::Projects), always())
        .times(1)
        .returning(|_, _| Err(AppError::Store("insert rejected".into())));

    let handler = ProjectHandler::new(store);
    assert_eq!(handler.admin_list(false).await.unwrap().len(), 1);

    let request: NewProjectRequest = serde_json::from_value(json!({
        "title_en": "Field Research",
        "title_ar": "بحث ميداني",
        "category": "research"
    }))
    .unwrap();
    let result = handler.create(request).await;
    assert!(matches!(result, Err(AppError::Store(_))));

    let cached = handler.admin_list(false).await.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].project.id, id);
}

#[actix_rt::test]
async fn failed_view_increment_still_serves_post() {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let row = record(json!({
        "id": id,
        "title_en": "Hello",
        "title_ar": "مرحبا",
        "slug": "hello",
        "content_en": "Body",
        "published": true,
        "published_at": now,
        "views": 7,
        "created_at": now,
        "updated_at": now
    }));

    let mut store = MockStore::new();
    store.expect_select().returning(move |_| Ok(vec![row.clone()]));
    store
        .expect_update()
        .times(1)
        .returning(|_, _, _| Err(AppError::Store("write failed".into())));

    let handler = BlogPostHandler::new(store);
    let post = handler.get_published_by_slug("hello", Locale::En).await.unwrap();

    assert_eq!(post.views, 7);
    assert_eq!(post.title, "Hello");
}

#[actix_rt::test]
async fn unchanged_contact_status_writes_nothing() {
    let id = Uuid::new_v4();
    let row = record(json!({
        "id": id,
        "name": "Layla",
        "email": "layla@example.com",
        "message": "Hello there",
        "status": "read",
        "replied_at": null,
        "notes": "",
        "created_at": Utc::now()
    }));

    let mut store = MockStore::new();
    store.expect_select().returning(move |_| Ok(vec![row.clone()]));
    store.expect_update().never();

    let handler = ContactHandler::new(store);
    let submission = handler.change_status(id, ContactStatus::Read).await.unwrap();

    assert_eq!(submission.status, ContactStatus::Read);
}

#[actix_rt::test]
async fn illegal_contact_transition_writes_nothing() {
    let id = Uuid::new_v4();
    let row = record(json!({
        "id": id,
        "name": "Layla",
        "email": "layla@example.com",
        "message": "Hello there",
        "status": "replied",
        "replied_at": Utc::now(),
        "notes": "",
        "created_at": Utc::now()
    }));

    let mut store = MockStore::new();
    store.expect_select().returning(move |_| Ok(vec![row.clone()]));
    store.expect_update().never();

    let handler = ContactHandler::new(store);
    let result = handler.change_status(id, ContactStatus::New).await;

    assert!(matches!(result, Err(AppError::InvalidTransition(_))));
}
