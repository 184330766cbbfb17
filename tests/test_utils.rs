#![allow(dead_code)]

use std::{
    cmp::Ordering,
    collections::HashMap,
    net::TcpListener,
    sync::{
        atomic::{AtomicBool, Ordering as AtomicOrdering},
        Arc,
    },
    time::Duration,
};

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;
use portfolio_cms::{
    entities::token::Claims,
    errors::AppError,
    middlewares::auth::AuthMiddleware,
    repositories::{
        store::{Direction, FilterValue, Order},
        ContentStore, Record, SelectQuery, SharedStore, Table,
    },
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, StoreBackend},
    AppState,
};
use reqwest::Client;
use serde_json::Value;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "owner@example.com";
const TEST_JWT_SECRET: &str = "test_jwt_secret_that_is_long_enough_for_hs256_1234567890";

/// Content store kept in process memory. Understands the same equality
/// filters, ordering and limits as the real backends.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<HashMap<Table, Vec<Record>>>,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, AtomicOrdering::SeqCst);
    }

    pub fn rows(&self, table: Table) -> Vec<Record> {
        self.tables.lock().get(&table).cloned().unwrap_or_default()
    }

    pub fn seed(&self, table: Table, row: Value) {
        if let Value::Object(map) = row {
            self.tables.lock().entry(table).or_default().push(map);
        }
    }

    fn check_writable(&self, table: Table) -> Result<(), AppError> {
        if self.fail_writes.load(AtomicOrdering::SeqCst) {
            Err(AppError::Store(format!("writes to {} are disabled", table)))
        } else {
            Ok(())
        }
    }
}

fn matches(row: &Record, column: &str, value: &FilterValue) -> bool {
    match (row.get(column), value) {
        (Some(Value::Bool(b)), FilterValue::Bool(expected)) => b == expected,
        (Some(Value::String(s)), FilterValue::Text(expected)) => s == expected,
        (Some(Value::String(s)), FilterValue::Id(expected)) => *s == expected.to_string(),
        _ => false,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => {
            match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        _ => Ordering::Equal,
    }
}

fn compare_rows(a: &Record, b: &Record, order: &[Order]) -> Ordering {
    for o in order {
        let left = a.get(o.column).filter(|v| !v.is_null());
        let right = b.get(o.column).filter(|v| !v.is_null());

        let ordering = match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => match o.direction {
                Direction::Asc => compare_values(x, y),
                Direction::Desc => compare_values(y, x),
            },
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn row_id(row: &Record) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, AppError> {
        let mut rows: Vec<Record> = self
            .rows(query.table)
            .into_iter()
            .filter(|row| query.filters.iter().all(|f| matches(row, f.column, &f.value)))
            .collect();

        rows.sort_by(|a, b| compare_rows(a, b, &query.order));

        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut record: Record) -> Result<Record, AppError> {
        self.check_writable(table)?;
        record
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));

        self.tables.lock().entry(table).or_default().push(record.clone());
        Ok(record)
    }

    async fn update(&self, table: Table, id: Uuid, changes: Record) -> Result<Record, AppError> {
        self.check_writable(table)?;
        let id = id.to_string();

        let mut tables = self.tables.lock();
        let row = tables
            .entry(table)
            .or_default()
            .iter_mut()
            .find(|row| row_id(row) == Some(id.as_str()))
            .ok_or_else(|| AppError::Store(format!("no row in {} with id {}", table, id)))?;

        row.extend(changes);
        Ok(row.clone())
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), AppError> {
        self.check_writable(table)?;
        let id = id.to_string();
        self.tables
            .lock()
            .entry(table)
            .or_default()
            .retain(|row| row_id(row) != Some(id.as_str()));
        Ok(())
    }

    async fn count(&self, table: Table) -> Result<u64, AppError> {
        Ok(self.rows(table).len() as u64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio CMS Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        cors_allowed_origins: vec!["*".to_string()],
        store_backend: StoreBackend::Rest,
        supabase_url: "http://127.0.0.1:1".into(),
        supabase_key: "test-anon-key".into(),
        database_url: String::new(),
        run_migrations: false,
        request_timeout_secs: 2,
        jwt_secret: TEST_JWT_SECRET.into(),
        jwt_audience: None,
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        contact_rate_limit: 3,
        contact_rate_window_secs: 3600,
        trust_forwarded_for: false,
    }
}

pub fn token_for(email: &str) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: Some(email.to_string()),
        role: Some("authenticated".into()),
        exp: now + 3600,
        iat: Some(now),
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()))
        .expect("Failed to sign test token")
}

pub fn admin_token() -> String {
    token_for(ADMIN_EMAIL)
}

pub fn visitor_token() -> String {
    token_for("visitor@example.com")
}

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub store: Arc<InMemoryStore>,
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let shared: SharedStore = store.clone();
        let state = web::Data::new(AppState::new(&config, shared));

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let server_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(server_state.clone())
                .wrap(NormalizePath::trim())
                .wrap(AuthMiddleware)
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(1)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/api/v1/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self { address, client, store, state }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn admin_get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(admin_token())
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn admin_post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(admin_token())
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn admin_patch(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .patch(self.url(path))
            .bearer_auth(admin_token())
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn admin_delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(admin_token())
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
