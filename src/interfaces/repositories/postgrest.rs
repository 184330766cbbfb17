use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use crate::{
    errors::AppError,
    repositories::store::{ContentStore, Record, SelectQuery, Table},
};

const PREFER: &str = "Prefer";

/// Content store speaking the PostgREST dialect of the hosted gateway.
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    message: Option<String>,
    details: Option<String>,
}

impl PostgrestStore {
    pub fn new(client: Client, base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(PostgrestStore { client, base_url })
    }

    fn endpoint(&self, table: Table) -> Result<Url, AppError> {
        self.base_url
            .join(&format!("rest/v1/{}", table.name()))
            .map_err(|e| AppError::InternalError(format!("building gateway url: {}", e)))
    }

    fn select_params(query: &SelectQuery) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];

        for filter in &query.filters {
            params.push((filter.column.to_string(), format!("eq.{}", filter.value)));
        }

        if !query.order.is_empty() {
            let order = query
                .order
                .iter()
                .map(|o| {
                    let nulls = if o.nulls_last { ".nullslast" } else { "" };
                    format!("{}.{}{}", o.column, o.direction.as_str(), nulls)
                })
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }

        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }

    /// Passes 2xx responses through and turns anything else into a store
    /// error carrying the gateway's message.
    async fn check(table: Table, response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GatewayError>(&body)
            .ok()
            .and_then(|e| match (e.message, e.details) {
                (Some(m), Some(d)) => Some(format!("{} ({})", m, d)),
                (Some(m), None) => Some(m),
                _ => None,
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        Err(AppError::Store(format!("{} on {}: {}", status.as_u16(), table, message)))
    }

    async fn single_row(table: Table, response: Response, missing: impl FnOnce() -> String) -> Result<Record, AppError> {
        let rows: Vec<Record> = Self::check(table, response).await?.json().await?;
        rows.into_iter().next().ok_or_else(|| AppError::Store(missing()))
    }
}

/// Reads the total out of a `Content-Range` header such as `0-24/57` or `*/0`.
pub fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/').and_then(|(_, total)| total.trim().parse().ok())
}

#[async_trait]
impl ContentStore for PostgrestStore {
    #[instrument(skip(self), fields(table = %query.table))]
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, AppError> {
        let response = self
            .client
            .get(self.endpoint(query.table)?)
            .query(&Self::select_params(query))
            .send()
            .await?;

        Ok(Self::check(query.table, response).await?.json().await?)
    }

    #[instrument(skip(self, record))]
    async fn insert(&self, table: Table, record: Record) -> Result<Record, AppError> {
        let response = self
            .client
            .post(self.endpoint(table)?)
            .header(PREFER, "return=representation")
            .json(&record)
            .send()
            .await?;

        Self::single_row(table, response, || format!("insert into {} returned no row", table)).await
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, table: Table, id: Uuid, changes: Record) -> Result<Record, AppError> {
        let response = self
            .client
            .patch(self.endpoint(table)?)
            .query(&[("id", format!("eq.{}", id))])
            .header(PREFER, "return=representation")
            .json(&changes)
            .send()
            .await?;

        Self::single_row(table, response, || format!("no row in {} with id {}", table, id)).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, table: Table, id: Uuid) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.endpoint(table)?)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        Self::check(table, response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(&self, table: Table) -> Result<u64, AppError> {
        let response = self
            .client
            .head(self.endpoint(table)?)
            .query(&[("select", "id")])
            .header(PREFER, "count=exact")
            .send()
            .await?;

        let response = Self::check(table, response).await?;
        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| AppError::Store(format!("count on {} returned no Content-Range total", table)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        let response = self
            .client
            .head(self.endpoint(Table::Projects)?)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(AppError::Store("gateway rejected the project key".into())),
            status => Err(AppError::Store(format!("gateway answered {}", status.as_u16()))),
        }
    }
}
