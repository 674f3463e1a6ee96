use super::reflections::{Namespace, Reflections};
use super::traits::ReflectionStore;
use crate::error::MemoryError;
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

/// SQLite-backed reflection store. Values are stored as JSON text.
pub struct SqliteReflectionStore {
    pool: SqlitePool,
}

impl SqliteReflectionStore {
    /// Create a new store with an existing pool and ensure the schema.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reflections (
                 namespace  TEXT NOT NULL,
                 key        TEXT NOT NULL,
                 value      TEXT NOT NULL,
                 updated_at TEXT NOT NULL,
                 PRIMARY KEY (namespace, key)
             )",
        )
        .execute(&pool)
        .await
        .context("Failed to create reflections table")?;

        Ok(Self { pool })
    }

    /// Open (or create) the database file at `db_path`.
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .with_context(|| format!("Failed to open reflections DB: {}", db_path.display()))?;

        Self::new(pool).await
    }
}

impl ReflectionStore for SqliteReflectionStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn get<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Reflections>>> + Send + 'a>> {
        Box::pin(async move {
            let row: Option<(String,)> =
                sqlx::query_as("SELECT value FROM reflections WHERE namespace = $1 AND key = $2")
                    .bind(namespace.to_string())
                    .bind(key)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| MemoryError::Query(e.to_string()))?;

            row.map(|(value,)| {
                serde_json::from_str::<Reflections>(&value)
                    .map_err(|e| anyhow::Error::from(MemoryError::Decode(e.to_string())))
            })
            .transpose()
        })
    }

    fn put<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a str,
        reflections: &'a Reflections,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let value = serde_json::to_string(reflections)?;
            sqlx::query(
                "INSERT INTO reflections (namespace, key, value, updated_at)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT(namespace, key) DO UPDATE
                 SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .bind(namespace.to_string())
            .bind(key)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| MemoryError::Query(e.to_string()))?;
            Ok(())
        })
    }

    fn delete<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM reflections WHERE namespace = $1 AND key = $2")
                .bind(namespace.to_string())
                .bind(key)
                .execute(&self.pool)
                .await
                .map_err(|e| MemoryError::Query(e.to_string()))?;
            Ok(result.rows_affected() > 0)
        })
    }
}
