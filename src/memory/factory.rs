use crate::config::MemoryConfig;

use super::{InMemoryReflectionStore, ReflectionStore, SqliteReflectionStore};

use std::path::Path;
use std::sync::Arc;

pub async fn create_reflection_store(
    config: &MemoryConfig,
    workspace_dir: &Path,
) -> anyhow::Result<Arc<dyn ReflectionStore>> {
    let store: Arc<dyn ReflectionStore> = match config.backend.as_str() {
        "sqlite" => {
            let db_path = workspace_dir.join(&config.db_file);
            Arc::new(SqliteReflectionStore::open(&db_path).await?)
        }
        "in_memory" | "none" => Arc::new(InMemoryReflectionStore::new()),
        other => {
            tracing::warn!("Unknown memory backend '{other}', falling back to in_memory");
            Arc::new(InMemoryReflectionStore::new())
        }
    };

    tracing::debug!(backend = store.name(), "reflection store ready");
    Ok(store)
}
