mod append;
pub mod store;
pub mod types;

pub use store::{ArtifactStore, ArtifactSummary, SqliteArtifactStore};
pub use types::{Artifact, ArtifactKind, Version};
