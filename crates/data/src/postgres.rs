//! `PostgreSQL` document store.
//!
//! # Table: `documents`
//!
//! One row per document, keyed by `(collection, id)`. The JSON body lives in
//! `data` (JSONB); timestamps are columns maintained by the database.
//! Merge-updates use `data || $patch`, which replaces only the top-level keys
//! present in the patch.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::document::{Collection, Direction, Document, DocumentStore, Query, SortField};
use crate::error::RepositoryError;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = RepositoryError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let Value::Object(data) = row.data.0 else {
            return Err(RepositoryError::DataCorruption(format!(
                "document {} body is not an object",
                row.id
            )));
        };

        Ok(Self {
            id: row.id,
            data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Map a unique-key violation to `Conflict`; pass everything else through.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("document already exists".to_owned());
    }
    RepositoryError::Database(err)
}

const fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
    }
}

const fn sort_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Asc => "ASC",
        Direction::Desc => "DESC",
    }
}

/// Document store backed by the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, shared with the session store.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self, query), fields(collection = %collection))]
    async fn list(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, RepositoryError> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, data, created_at, updated_at FROM documents WHERE collection = ",
        );
        builder.push_bind(collection.as_str());

        if let Some(filter) = &query.filter {
            builder
                .push(" AND data -> ")
                .push_bind(filter.field.clone())
                .push(" = ")
                .push_bind(Json(filter.value.clone()));
        }

        let (column, direction) = query.order_by.map_or(("created_at", "ASC"), |order| {
            (sort_column(order.field), sort_direction(order.direction))
        });
        builder
            .push(" ORDER BY ")
            .push(column)
            .push(" ")
            .push(direction)
            .push(", id ASC");

        let rows: Vec<DocumentRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Document::try_from).collect()
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, RepositoryError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Document::try_from).transpose()
    }

    #[instrument(skip(self, body), fields(collection = %collection))]
    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<Document, RepositoryError> {
        let id = Uuid::new_v4().simple().to_string();
        let row: DocumentRow = sqlx::query_as(
            r"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            RETURNING id, data, created_at, updated_at
            ",
        )
        .bind(collection.as_str())
        .bind(&id)
        .bind(Json(Value::Object(body)))
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Document::try_from(row)
    }

    #[instrument(skip(self, patch), fields(collection = %collection, keys = patch.len()))]
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Document, RepositoryError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r"
            UPDATE documents
            SET data = data || $3, updated_at = clock_timestamp()
            WHERE collection = $1 AND id = $2
            RETURNING id, data, created_at, updated_at
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(Value::Object(patch)))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.ok_or(RepositoryError::NotFound)
            .and_then(Document::try_from)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn count(&self, collection: Collection) -> Result<usize, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await?;

        usize::try_from(count)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid row count: {e}")))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
