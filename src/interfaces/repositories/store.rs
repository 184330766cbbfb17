use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;

/// One stored row as the gateway returns it.
pub type Record = serde_json::Map<String, Value>;

pub type SharedStore = Arc<dyn ContentStore>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Projects,
    BlogPosts,
    Testimonials,
    ContactSubmissions,
    AnalyticsEvents,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Projects => "projects",
            Table::BlogPosts => "blog_posts",
            Table::Testimonials => "testimonials",
            Table::ContactSubmissions => "contact_submissions",
            Table::AnalyticsEvents => "analytics_events",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Bool(bool),
    Text(String),
    Id(Uuid),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::Id(id) => write!(f, "{}", id),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Id(value)
    }
}

/// Equality filter on a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: &'static str,
    pub direction: Direction,
    pub nulls_last: bool,
}

/// A read against one table: equality filters, ordering and an optional
/// row limit.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: Table,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<u32>,
}

impl SelectQuery {
    pub fn from(table: Table) -> Self {
        SelectQuery { table, filters: Vec::new(), order: Vec::new(), limit: None }
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<FilterValue>) -> Self {
        self.filters.push(Filter { column, value: value.into() });
        self
    }

    pub fn order_asc(mut self, column: &'static str) -> Self {
        self.order.push(Order { column, direction: Direction::Asc, nulls_last: true });
        self
    }

    pub fn order_desc(mut self, column: &'static str) -> Self {
        self.order.push(Order { column, direction: Direction::Desc, nulls_last: true });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// The hosted content store. Every failure is reported as
/// [`AppError::Store`]; callers get no finer distinction.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, AppError>;
    async fn insert(&self, table: Table, record: Record) -> Result<Record, AppError>;
    async fn update(&self, table: Table, id: Uuid, changes: Record) -> Result<Record, AppError>;
    async fn delete(&self, table: Table, id: Uuid) -> Result<(), AppError>;
    async fn count(&self, table: Table) -> Result<u64, AppError>;
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
impl<T> ContentStore for Arc<T>
where
    T: ContentStore + ?Sized,
{
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, AppError> {
        (**self).select(query).await
    }

    async fn insert(&self, table: Table, record: Record) -> Result<Record, AppError> {
        (**self).insert(table, record).await
    }

    async fn update(&self, table: Table, id: Uuid, changes: Record) -> Result<Record, AppError> {
        (**self).update(table, id, changes).await
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), AppError> {
        (**self).delete(table, id).await
    }

    async fn count(&self, table: Table) -> Result<u64, AppError> {
        (**self).count(table).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        (**self).ping().await
    }
}

// ───── Typed helpers ────────────────────────────────────────────────

pub fn to_record<T: Serialize>(value: &T) -> Result<Record, AppError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::InternalError("record must serialize to a JSON object".into())),
        Err(e) => Err(AppError::InternalError(format!("encoding record: {}", e))),
    }
}

/// Rows that do not match the entity shape count as a failed store call.
pub fn from_record<T: DeserializeOwned>(table: Table, record: Record) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| AppError::Store(format!("malformed row in {}: {}", table, e)))
}

pub async fn fetch_all<S, T>(store: &S, query: &SelectQuery) -> Result<Vec<T>, AppError>
where
    S: ContentStore + ?Sized,
    T: DeserializeOwned,
{
    store
        .select(query)
        .await?
        .into_iter()
        .map(|row| from_record(query.table, row))
        .collect()
}

pub async fn fetch_one<S, T>(store: &S, query: SelectQuery) -> Result<Option<T>, AppError>
where
    S: ContentStore + ?Sized,
    T: DeserializeOwned,
{
    let query = query.limit(1);
    let row = store.select(&query).await?.into_iter().next();
    row.map(|row| from_record(query.table, row)).transpose()
}

pub async fn fetch_by_id<S, T>(store: &S, table: Table, id: Uuid) -> Result<Option<T>, AppError>
where
    S: ContentStore + ?Sized,
    T: DeserializeOwned,
{
    fetch_one(store, SelectQuery::from(table).eq("id", id)).await
}

pub async fn insert_as<S, I, T>(store: &S, table: Table, value: &I) -> Result<T, AppError>
where
    S: ContentStore + ?Sized,
    I: Serialize,
    T: DeserializeOwned,
{
    let row = store.insert(table, to_record(value)?).await?;
    from_record(table, row)
}

pub async fn update_as<S, T>(store: &S, table: Table, id: Uuid, changes: Record) -> Result<T, AppError>
where
    S: ContentStore + ?Sized,
    T: DeserializeOwned,
{
    let row = store.update(table, id, changes).await?;
    from_record(table, row)
}
