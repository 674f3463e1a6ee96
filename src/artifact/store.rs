use super::types::{Artifact, ArtifactKind, Version};
use crate::error::StoreError;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use uuid::Uuid;

/// One row of `list()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub id: String,
    pub title: String,
    pub kind: ArtifactKind,
    pub current_index: usize,
    pub version_count: usize,
    pub updated_at: String,
}

/// Async artifact persistence contract.
///
/// Callers serialize writes per artifact id; the store does not arbitrate
/// concurrent commits beyond refusing to overwrite a committed version.
pub trait ArtifactStore: Send + Sync {
    fn create<'a>(
        &'a self,
        artifact: &'a Artifact,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    fn load<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Artifact>>> + Send + 'a>>;

    fn commit<'a>(
        &'a self,
        id: &'a str,
        artifact: &'a Artifact,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    fn list(&self) -> Pin<Box<dyn Future<Output = Result<Vec<ArtifactSummary>>> + Send + '_>>;
}

/// SQLite-backed artifact store using sqlx async pool.
pub struct SqliteArtifactStore {
    pool: SqlitePool,
}

const ARTIFACT_SCHEMA_META_TABLE: &str = "
CREATE TABLE IF NOT EXISTS artifact_schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";
const ARTIFACT_SCHEMA_VERSION_KEY: &str = "artifact_schema_version";
const ARTIFACT_SCHEMA_VERSION: u32 = 1;

async fn ensure_artifact_schema_version(pool: &SqlitePool) -> Result<()> {
    sqlx::query(ARTIFACT_SCHEMA_META_TABLE)
        .execute(pool)
        .await
        .context("create artifact_schema_meta table")?;

    let stored_version: Option<(String,)> =
        sqlx::query_as("SELECT value FROM artifact_schema_meta WHERE key = $1")
            .bind(ARTIFACT_SCHEMA_VERSION_KEY)
            .fetch_optional(pool)
            .await
            .context("load artifact schema version")?;

    if let Some((value,)) = stored_version {
        let parsed = value
            .parse::<u32>()
            .with_context(|| format!("invalid artifact schema version value: {value}"))?;
        anyhow::ensure!(
            parsed == ARTIFACT_SCHEMA_VERSION,
            "incompatible artifact schema version: stored={parsed}, expected={ARTIFACT_SCHEMA_VERSION}"
        );
        return Ok(());
    }

    sqlx::query("INSERT INTO artifact_schema_meta (key, value) VALUES ($1, $2)")
        .bind(ARTIFACT_SCHEMA_VERSION_KEY)
        .bind(ARTIFACT_SCHEMA_VERSION.to_string())
        .execute(pool)
        .await
        .context("persist artifact schema version")?;

    Ok(())
}

impl SqliteArtifactStore {
    /// Create a new store with an existing pool and run migrations.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query("PRAGMA foreign_keys = ON;")
            .execute(&pool)
            .await?;

        ensure_artifact_schema_version(&pool).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS artifacts (
                 id            TEXT PRIMARY KEY,
                 current_index INTEGER NOT NULL,
                 created_at    TEXT NOT NULL,
                 updated_at    TEXT NOT NULL
             )",
        )
        .execute(&pool)
        .await
        .context("create artifacts table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS artifact_versions (
                 artifact_id TEXT NOT NULL REFERENCES artifacts(id) ON DELETE CASCADE,
                 idx         INTEGER NOT NULL,
                 kind        TEXT NOT NULL,
                 title       TEXT NOT NULL,
                 language    TEXT,
                 content     TEXT NOT NULL,
                 created_at  TEXT NOT NULL,
                 PRIMARY KEY (artifact_id, idx)
             )",
        )
        .execute(&pool)
        .await
        .context("create artifact_versions table")?;

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
            .with_context(|| format!("Failed to open artifact DB: {}", db_path.display()))?;

        Self::new(pool).await
    }

    async fn fetch_versions(&self, id: &str) -> Result<Vec<Version>> {
        let rows = sqlx::query(
            "SELECT idx, kind, title, language, content
             FROM artifact_versions
             WHERE artifact_id = $1
             ORDER BY idx ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .context("load artifact versions")?;

        rows.iter().map(row_to_version).collect()
    }
}

fn row_to_version(row: &SqliteRow) -> Result<Version> {
    let index: i64 = row.try_get("idx")?;
    let kind: String = row.try_get("kind")?;
    Ok(Version {
        index: usize::try_from(index).context("negative version index in store")?,
        kind: kind
            .parse()
            .with_context(|| format!("unknown artifact kind in store: {kind}"))?,
        title: row.try_get("title")?,
        language: row.try_get("language")?,
        content: row.try_get("content")?,
    })
}

fn index_to_i64(index: usize) -> Result<i64> {
    i64::try_from(index).context("version index does not fit in SQLite INTEGER")
}

async fn insert_version(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: &str,
    version: &Version,
    now: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO artifact_versions (artifact_id, idx, kind, title, language, content, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(id)
    .bind(index_to_i64(version.index)?)
    .bind(version.kind.to_string())
    .bind(&version.title)
    .bind(&version.language)
    .bind(&version.content)
    .bind(now)
    .execute(&mut **tx)
    .await
    .with_context(|| format!("insert version {} of artifact {id}", version.index))?;
    Ok(())
}

impl ArtifactStore for SqliteArtifactStore {
    fn create<'a>(
        &'a self,
        artifact: &'a Artifact,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            artifact.validate()?;
            let id = Uuid::new_v4().to_string();
            let now = Utc::now().to_rfc3339();

            let mut tx = self.pool.begin().await?;
            sqlx::query(
                "INSERT INTO artifacts (id, current_index, created_at, updated_at)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(&id)
            .bind(index_to_i64(artifact.current_index())?)
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .context("insert artifact")?;

            for version in artifact.versions() {
                insert_version(&mut tx, &id, version, &now).await?;
            }
            tx.commit().await?;

            tracing::debug!(artifact_id = %id, versions = artifact.len(), "artifact.created");
            Ok(id)
        })
    }

    fn load<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Artifact>>> + Send + 'a>> {
        Box::pin(async move {
            let current: Option<(i64,)> =
                sqlx::query_as("SELECT current_index FROM artifacts WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .context("load artifact")?;

            let Some((current_index,)) = current else {
                return Ok(None);
            };

            let versions = self.fetch_versions(id).await?;
            let current_index =
                usize::try_from(current_index).context("negative current index in store")?;

            let artifact =
                Artifact::from_parts(current_index, versions).map_err(|source| {
                    StoreError::Corrupt {
                        artifact_id: id.to_string(),
                        source,
                    }
                })?;
            Ok(Some(artifact))
        })
    }

    fn commit<'a>(
        &'a self,
        id: &'a str,
        artifact: &'a Artifact,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            artifact.validate()?;
            let now = Utc::now().to_rfc3339();
            let mut tx = self.pool.begin().await?;

            let updated = sqlx::query(
                "UPDATE artifacts SET current_index = $1, updated_at = $2 WHERE id = $3",
            )
            .bind(index_to_i64(artifact.current_index())?)
            .bind(&now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("update artifact pointer")?;

            if updated.rows_affected() == 0 {
                return Err(StoreError::NotFound(id.to_string()).into());
            }

            let mut inserted = 0_usize;
            for version in artifact.versions() {
                let stored: Option<(String,)> = sqlx::query_as(
                    "SELECT content FROM artifact_versions WHERE artifact_id = $1 AND idx = $2",
                )
                .bind(id)
                .bind(index_to_i64(version.index)?)
                .fetch_optional(&mut *tx)
                .await
                .context("check committed version")?;

                match stored {
                    Some((content,)) if content == version.content => {}
                    Some(_) => {
                        return Err(StoreError::ImmutableVersion {
                            artifact_id: id.to_string(),
                            index: version.index,
                        }
                        .into());
                    }
                    None => {
                        insert_version(&mut tx, id, version, &now).await?;
                        inserted += 1;
                    }
                }
            }
            tx.commit().await?;

            tracing::debug!(
                artifact_id = %id,
                inserted,
                current_index = artifact.current_index(),
                "artifact.committed"
            );
            Ok(())
        })
    }

    fn list(&self) -> Pin<Box<dyn Future<Output = Result<Vec<ArtifactSummary>>> + Send + '_>> {
        Box::pin(async move {
            let rows = sqlx::query(
                "SELECT a.id, a.current_index, a.updated_at, v.title, v.kind,
                        (SELECT COUNT(*) FROM artifact_versions c WHERE c.artifact_id = a.id)
                            AS version_count
                 FROM artifacts a
                 LEFT JOIN artifact_versions v
                   ON v.artifact_id = a.id AND v.idx = a.current_index
                 ORDER BY a.updated_at DESC",
            )
            .fetch_all(&self.pool)
            .await
            .context("list artifacts")?;

            rows.iter()
                .map(|row| -> Result<ArtifactSummary> {
                    let current_index: i64 = row.try_get("current_index")?;
                    let version_count: i64 = row.try_get("version_count")?;
                    let kind: Option<String> = row.try_get("kind")?;
                    Ok(ArtifactSummary {
                        id: row.try_get("id")?,
                        title: row.try_get::<Option<String>, _>("title")?.unwrap_or_default(),
                        kind: kind
                            .as_deref()
                            .and_then(|k| k.parse().ok())
                            .unwrap_or_default(),
                        current_index: usize::try_from(current_index)?,
                        version_count: usize::try_from(version_count)?,
                        updated_at: row.try_get("updated_at")?,
                    })
                })
                .collect::<Result<Vec<_>>>()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ArtifactStore, SqliteArtifactStore};
    use crate::artifact::{Artifact, ArtifactKind};
    use crate::error::StoreError;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> SqliteArtifactStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteArtifactStore::new(pool).await.unwrap()
    }

    #[tokio::test]
    async fn create_then_load_round_trips() {
        let store = store().await;
        let artifact = Artifact::seed(ArtifactKind::Text, "Poem", "roses are red");

        let id = store.create(&artifact).await.unwrap();
        let loaded = store.load(&id).await.unwrap().unwrap();

        assert_eq!(loaded, artifact);
    }

    #[tokio::test]
    async fn load_missing_returns_none() {
        let store = store().await;
        assert!(store.load("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn commit_appends_new_versions() {
        let store = store().await;
        let artifact = Artifact::seed(ArtifactKind::Text, "Poem", "roses are red");
        let id = store.create(&artifact).await.unwrap();

        let source = artifact.current_version().unwrap().clone();
        let next = artifact.append(&source, "violets are blue");
        store.commit(&id, &next).await.unwrap();

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.current_index(), 2);
        assert_eq!(loaded.current_version().unwrap().content, "violets are blue");
    }

    #[tokio::test]
    async fn commit_rejects_rewriting_a_committed_version() {
        let store = store().await;
        let artifact = Artifact::seed(ArtifactKind::Text, "Poem", "roses are red");
        let id = store.create(&artifact).await.unwrap();

        let source = artifact.current_version().unwrap().clone();
        store
            .commit(&id, &artifact.append(&source, "first writer"))
            .await
            .unwrap();

        // A second writer working from the stale artifact collides on index 2.
        let err = store
            .commit(&id, &artifact.append(&source, "second writer"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::ImmutableVersion { index: 2, .. })
        ));
        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.current_version().unwrap().content, "first writer");
    }

    #[tokio::test]
    async fn commit_unknown_artifact_fails() {
        let store = store().await;
        let artifact = Artifact::seed(ArtifactKind::Text, "Poem", "x");
        let err = store.commit("nope", &artifact).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_reports_current_title_and_count() {
        let store = store().await;
        let artifact = Artifact::seed(ArtifactKind::Code, "Fib", "fn fib() {}");
        let id = store.create(&artifact).await.unwrap();
        let source = artifact.current_version().unwrap().clone();
        store
            .commit(&id, &artifact.append(&source, "fn fib(n: u32) {}"))
            .await
            .unwrap();

        let summaries = store.list().await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, id);
        assert_eq!(summaries[0].title, "Fib");
        assert_eq!(summaries[0].kind, ArtifactKind::Code);
        assert_eq!(summaries[0].version_count, 2);
        assert_eq!(summaries[0].current_index, 2);
    }
}
