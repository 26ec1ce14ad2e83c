//! `sqlx` implementations of [`AdminStore`]
//!
//! Statements are assembled with [`sqlx::QueryBuilder`] so every value is a
//! bound parameter in the backend's own placeholder syntax. Identifiers are
//! double-quoted, which both SQLite and Postgres accept.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{QueryBuilder, Row};

use super::{AdminStore, DeleteMode, Record};
use crate::coerce::Change;
use crate::config::DatabaseSettings;
use crate::error::AdminError;
use crate::model::{FieldDef, FieldKind, FieldValue};

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Generates a pool-backed store for one `sqlx` backend
///
/// Both backends share the statement shapes; only the pool and row types
/// differ. Decoding falls back to narrower integer/float types and to
/// timezone-aware timestamps so that `INT4`, `REAL` and `TIMESTAMPTZ` columns
/// read on Postgres as well.
macro_rules! sql_store {
    ($(#[$meta:meta])* $store:ident, $db:ty, $pool:ty, $row:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $store {
            pool: $pool,
        }

        impl $store {
            /// Wrap an existing pool
            #[must_use]
            pub const fn new(pool: $pool) -> Self {
                Self { pool }
            }

            /// Underlying pool
            #[must_use]
            pub const fn pool(&self) -> &$pool {
                &self.pool
            }

            fn push_value(query: &mut QueryBuilder<'_, $db>, kind: FieldKind, value: &FieldValue) {
                match value {
                    FieldValue::Bool(b) => query.push_bind(*b),
                    FieldValue::Integer(i) | FieldValue::Duration(i) => query.push_bind(*i),
                    FieldValue::Float(x) => query.push_bind(*x),
                    FieldValue::Timestamp(ts) => query.push_bind(*ts),
                    FieldValue::Text(s) => query.push_bind(s.clone()),
                    FieldValue::Null => match kind {
                        FieldKind::Bool => query.push_bind(None::<bool>),
                        FieldKind::Integer | FieldKind::Duration => query.push_bind(None::<i64>),
                        FieldKind::Float => query.push_bind(None::<f64>),
                        FieldKind::Timestamp | FieldKind::NullableTimestamp => {
                            query.push_bind(None::<NaiveDateTime>)
                        }
                        FieldKind::Text => query.push_bind(None::<String>),
                    },
                };
            }

            fn push_key(query: &mut QueryBuilder<'_, $db>, key: &Change) {
                query.push(" WHERE ").push(quote_ident(&key.column)).push(" = ");
                Self::push_value(query, key.kind, &key.value);
            }

            fn decode(row: &$row, index: usize, kind: FieldKind) -> Result<FieldValue, sqlx::Error> {
                let value = match kind {
                    FieldKind::Bool => row
                        .try_get::<Option<bool>, _>(index)?
                        .map_or(FieldValue::Null, FieldValue::Bool),
                    FieldKind::Integer | FieldKind::Duration => {
                        let int = row
                            .try_get::<Option<i64>, _>(index)
                            .or_else(|_| row.try_get::<Option<i32>, _>(index).map(|v| v.map(i64::from)))
                            .or_else(|_| row.try_get::<Option<i16>, _>(index).map(|v| v.map(i64::from)))?;
                        match (kind, int) {
                            (_, None) => FieldValue::Null,
                            (FieldKind::Duration, Some(secs)) => FieldValue::Duration(secs),
                            (_, Some(i)) => FieldValue::Integer(i),
                        }
                    }
                    FieldKind::Float => row
                        .try_get::<Option<f64>, _>(index)
                        .or_else(|_| row.try_get::<Option<f32>, _>(index).map(|v| v.map(f64::from)))?
                        .map_or(FieldValue::Null, FieldValue::Float),
                    FieldKind::Timestamp | FieldKind::NullableTimestamp => row
                        .try_get::<Option<NaiveDateTime>, _>(index)
                        .or_else(|_| {
                            row.try_get::<Option<DateTime<Utc>>, _>(index)
                                .map(|v| v.map(|ts| ts.naive_utc()))
                        })?
                        .map_or(FieldValue::Null, FieldValue::Timestamp),
                    FieldKind::Text => row
                        .try_get::<Option<String>, _>(index)?
                        .map_or(FieldValue::Null, FieldValue::Text),
                };
                Ok(value)
            }
        }

        #[async_trait]
        impl AdminStore for $store {
            async fn fetch_all(&self, table: &str, fields: &[FieldDef]) -> Result<Vec<Record>, AdminError> {
                if fields.is_empty() {
                    return Ok(Vec::new());
                }

                let mut query = QueryBuilder::<$db>::new("SELECT ");
                {
                    let mut columns = query.separated(", ");
                    for field in fields {
                        columns.push(quote_ident(&field.column));
                    }
                }
                query.push(" FROM ").push(quote_ident(table));

                let rows = query.build().fetch_all(&self.pool).await?;
                tracing::debug!(table, rows = rows.len(), "Fetched admin rows");

                rows.iter()
                    .map(|row| {
                        fields
                            .iter()
                            .enumerate()
                            .map(|(index, field)| Self::decode(row, index, field.kind))
                            .collect::<Result<Record, _>>()
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(AdminError::from)
            }

            async fn update(&self, table: &str, key: &Change, changes: &[Change]) -> Result<u64, AdminError> {
                if changes.is_empty() {
                    return Ok(0);
                }

                let mut query = QueryBuilder::<$db>::new("UPDATE ");
                query.push(quote_ident(table)).push(" SET ");
                for (i, change) in changes.iter().enumerate() {
                    if i > 0 {
                        query.push(", ");
                    }
                    query.push(quote_ident(&change.column)).push(" = ");
                    Self::push_value(&mut query, change.kind, &change.value);
                }
                Self::push_key(&mut query, key);

                let result = query.build().execute(&self.pool).await?;
                Ok(result.rows_affected())
            }

            async fn delete(&self, table: &str, key: &Change, mode: &DeleteMode) -> Result<u64, AdminError> {
                let mut query = match mode {
                    DeleteMode::Hard => {
                        let mut query = QueryBuilder::<$db>::new("DELETE FROM ");
                        query.push(quote_ident(table));
                        query
                    }
                    DeleteMode::Soft { column, at } => {
                        let mut query = QueryBuilder::<$db>::new("UPDATE ");
                        query
                            .push(quote_ident(table))
                            .push(" SET ")
                            .push(quote_ident(column))
                            .push(" = ")
                            .push_bind(*at);
                        query
                    }
                };
                Self::push_key(&mut query, key);

                let result = query.build().execute(&self.pool).await?;
                Ok(result.rows_affected())
            }
        }
    };
}

#[cfg(feature = "sqlite")]
sql_store!(
    /// [`AdminStore`] over a `SQLite` pool
    SqliteStore,
    sqlx::Sqlite,
    sqlx::SqlitePool,
    sqlx::sqlite::SqliteRow
);

#[cfg(feature = "postgres")]
sql_store!(
    /// [`AdminStore`] over a `PostgreSQL` pool
    PostgresStore,
    sqlx::Postgres,
    sqlx::PgPool,
    sqlx::postgres::PgRow
);

/// Open a `SQLite` pool from database settings
///
/// # Errors
///
/// Returns [`AdminError::Database`] if the pool cannot connect.
#[cfg(feature = "sqlite")]
pub async fn connect_sqlite(settings: &DatabaseSettings) -> Result<SqliteStore, AdminError> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.url)
        .await?;
    tracing::info!(url = %settings.url, "Connected admin store (sqlite)");
    Ok(SqliteStore::new(pool))
}

/// Open a `PostgreSQL` pool from database settings
///
/// # Errors
///
/// Returns [`AdminError::Database`] if the pool cannot connect.
#[cfg(feature = "postgres")]
pub async fn connect_postgres(settings: &DatabaseSettings) -> Result<PostgresStore, AdminError> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.url)
        .await?;
    tracing::info!("Connected admin store (postgres)");
    Ok(PostgresStore::new(pool))
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn store() -> SqliteStore {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, \
             is_admin BOOLEAN NOT NULL, deleted_at DATETIME)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO users (id, name, is_admin) VALUES (1, 'Ada', 0), (2, 'Linus', 1)")
            .execute(&pool)
            .await
            .unwrap();
        SqliteStore::new(pool)
    }

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("ID", FieldKind::Integer),
            FieldDef::new("Name", FieldKind::Text),
            FieldDef::new("IsAdmin", FieldKind::Bool),
            FieldDef::new("DeletedAt", FieldKind::NullableTimestamp),
        ]
    }

    fn key(id: i64) -> Change {
        Change {
            column: "id".into(),
            kind: FieldKind::Integer,
            value: FieldValue::Integer(id),
        }
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("users"), "\"users\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[tokio::test]
    async fn test_fetch_decodes_by_kind() {
        let store = store().await;
        let rows = store.fetch_all("users", &fields()).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec![
                FieldValue::Integer(1),
                FieldValue::Text("Ada".into()),
                FieldValue::Bool(false),
                FieldValue::Null,
            ]
        );
    }

    #[tokio::test]
    async fn test_update_binds_values() {
        let store = store().await;
        let changes = vec![
            Change {
                column: "name".into(),
                kind: FieldKind::Text,
                value: FieldValue::Text("Grace".into()),
            },
            Change {
                column: "is_admin".into(),
                kind: FieldKind::Bool,
                value: FieldValue::Bool(true),
            },
        ];

        let affected = store.update("users", &key(1), &changes).await.unwrap();
        assert_eq!(affected, 1);

        let rows = store.fetch_all("users", &fields()).await.unwrap();
        assert_eq!(rows[0][1], FieldValue::Text("Grace".into()));
        assert_eq!(rows[0][2], FieldValue::Bool(true));
    }

    #[tokio::test]
    async fn test_soft_and_hard_delete() {
        let store = store().await;
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let soft = DeleteMode::Soft {
            column: "deleted_at".into(),
            at,
        };

        assert_eq!(store.delete("users", &key(1), &soft).await.unwrap(), 1);
        let rows = store.fetch_all("users", &fields()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][3], FieldValue::Timestamp(at));

        assert_eq!(store.delete("users", &key(2), &DeleteMode::Hard).await.unwrap(), 1);
        let rows = store.fetch_all("users", &fields()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
