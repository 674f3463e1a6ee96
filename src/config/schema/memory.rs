use serde::{Deserialize, Serialize};

/// Where reflections and artifacts are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// "sqlite" | "in_memory" | "none"
    #[serde(default = "default_memory_backend")]
    pub backend: String,
    /// Database file name, relative to the workspace directory.
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

fn default_memory_backend() -> String {
    "sqlite".into()
}

fn default_db_file() -> String {
    "palimpsest.db".into()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            backend: default_memory_backend(),
            db_file: default_db_file(),
        }
    }
}
