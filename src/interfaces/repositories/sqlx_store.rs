use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    errors::AppError,
    repositories::store::{ContentStore, FilterValue, Record, SelectQuery, Table},
};

/// Content store over a direct Postgres connection. Rows travel as
/// `jsonb` so the same records flow through both backends.
#[derive(Clone)]
pub struct SqlxStore {
    pub pool: PgPool,
}

impl SqlxStore {
    pub fn new(pool: PgPool) -> Self {
        SqlxStore { pool }
    }
}

/// Column names come from code, but keys of a record are checked anyway
/// before they are spliced into SQL.
fn column(name: &str) -> Result<&str, AppError> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        Ok(name)
    } else {
        Err(AppError::InternalError(format!("invalid column name '{}'", name)))
    }
}

fn into_record(table: Table, value: Value) -> Result<Record, AppError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Store(format!("unexpected row shape from {}: {}", table, other))),
    }
}

#[async_trait]
impl ContentStore for SqlxStore {
    #[instrument(skip(self), fields(table = %query.table))]
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT to_jsonb(t) FROM ");
        qb.push(query.table.name()).push(" AS t");

        for (i, filter) in query.filters.iter().enumerate() {
            qb.push(if i == 0 { " WHERE t." } else { " AND t." });
            qb.push(column(filter.column)?).push(" = ");
            match &filter.value {
                FilterValue::Bool(b) => qb.push_bind(*b),
                FilterValue::Text(s) => qb.push_bind(s.clone()),
                FilterValue::Id(id) => qb.push_bind(*id),
            };
        }

        for (i, order) in query.order.iter().enumerate() {
            qb.push(if i == 0 { " ORDER BY t." } else { ", t." });
            qb.push(column(order.column)?)
                .push(" ")
                .push(order.direction.as_str().to_uppercase());
            if order.nulls_last {
                qb.push(" NULLS LAST");
            }
        }

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = qb
            .build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|row| into_record(query.table, row)).collect()
    }

    #[instrument(skip(self, record))]
    async fn insert(&self, table: Table, record: Record) -> Result<Record, AppError> {
        let columns = record
            .keys()
            .map(|k| column(k))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");

        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
        qb.push(table.name())
            .push(" AS t (")
            .push(&columns)
            .push(") SELECT ")
            .push(&columns)
            .push(" FROM jsonb_populate_record(NULL::")
            .push(table.name())
            .push(", ")
            .push_bind(Value::Object(record))
            .push(") RETURNING to_jsonb(t)");

        let row = qb.build_query_scalar::<Value>().fetch_one(&self.pool).await?;
        into_record(table, row)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, table: Table, id: Uuid, changes: Record) -> Result<Record, AppError> {
        if changes.is_empty() {
            return Err(AppError::Store(format!("empty update for {} {}", table, id)));
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE ");
        qb.push(table.name()).push(" AS t SET ");

        for (i, key) in changes.keys().enumerate() {
            let key = column(key)?;
            if i > 0 {
                qb.push(", ");
            }
            qb.push(key).push(" = r.").push(key);
        }

        qb.push(" FROM jsonb_populate_record(NULL::")
            .push(table.name())
            .push(", ")
            .push_bind(Value::Object(changes))
            .push(") AS r WHERE t.id = ")
            .push_bind(id)
            .push(" RETURNING to_jsonb(t)");

        let row = qb
            .build_query_scalar::<Value>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Store(format!("no row in {} with id {}", table, id)))?;

        into_record(table, row)
    }

    #[instrument(skip(self))]
    async fn delete(&self, table: Table, id: Uuid) -> Result<(), AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM ");
        qb.push(table.name()).push(" WHERE id = ").push_bind(id);
        qb.build().execute(&self.pool).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(&self, table: Table) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
        qb.push(table.name());
        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_are_checked() {
        assert!(column("published_at").is_ok());
        assert!(column("id; DROP TABLE projects").is_err());
        assert!(column("").is_err());
    }
}
