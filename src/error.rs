use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `palimpsest`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; adapters (providers, stores) continue to
/// use `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum PalimpsestError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Rewrite pipeline ─────────────────────────────────────────────────
    #[error("rewrite: {0}")]
    Rewrite(#[from] RewriteError),

    // ── Prompt / Template ───────────────────────────────────────────────
    #[error("prompt: {0}")]
    Prompt(#[from] PromptError),

    // ── Artifact model ──────────────────────────────────────────────────
    #[error("artifact: {0}")]
    Artifact(#[from] ArtifactError),

    // ── Artifact persistence ────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Reflection memory ───────────────────────────────────────────────
    #[error("memory: {0}")]
    Memory(#[from] MemoryError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Rewrite errors ──────────────────────────────────────────────────────────

/// Failures of a single rewrite invocation.
///
/// Every variant is fatal to the invocation and leaves the artifact without a
/// new version. Nothing is retried.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("`assistant_id` not found in invocation context")]
    MissingAssistantIdentity,

    #[error("no artifact content found at current index {index}")]
    NoCurrentContent { index: usize },

    #[error("no rewrite directive selected")]
    NoDirectiveSelected,

    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// Generation backend failure, passed through as-is.
    #[error(transparent)]
    Backend(anyhow::Error),
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("template render failed: {0}")]
    Render(String),

    #[error("template not found: {0}")]
    NotFound(String),

    #[error("template {template} does not reference parameter `{parameter}`")]
    MissingPlaceholder {
        template: &'static str,
        parameter: &'static str,
    },
}

// ─── Artifact errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("version index must be positive")]
    ZeroIndex,

    #[error("duplicate version index {0}")]
    DuplicateIndex(usize),

    #[error("current index {0} does not reference an existing version")]
    DanglingCurrentIndex(usize),

    #[error("version {0} not found")]
    VersionNotFound(usize),
}

// ─── Store errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("artifact {0} not found")]
    NotFound(String),

    #[error("version {index} of artifact {artifact_id} is already committed with different content")]
    ImmutableVersion { artifact_id: String, index: usize },

    #[error("stored artifact {artifact_id} is invalid: {source}")]
    Corrupt {
        artifact_id: String,
        #[source]
        source: ArtifactError,
    },
}

// ─── Memory errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("query failed: {0}")]
    Query(String),

    #[error("stored reflections are not valid JSON: {0}")]
    Decode(String),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} API key not set")]
    MissingApiKey { provider: String },

    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, PalimpsestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = PalimpsestError::Config(ConfigError::Validation("bad temp".into()));
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn rewrite_backend_error_is_transparent() {
        let err = RewriteError::Backend(anyhow::anyhow!("connection reset"));
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn no_current_content_names_index() {
        let err = PalimpsestError::Rewrite(RewriteError::NoCurrentContent { index: 4 });
        assert!(err.to_string().contains("current index 4"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let err: PalimpsestError = anyhow_err.into();
        assert!(err.to_string().contains("something went wrong"));
    }

    #[test]
    fn store_immutable_version_displays_artifact() {
        let err = StoreError::ImmutableVersion {
            artifact_id: "a-1".into(),
            index: 2,
        };
        assert!(err.to_string().contains("a-1"));
        assert!(err.to_string().contains("version 2"));
    }
}
