use crate::error::ArtifactError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What kind of document a version holds.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArtifactKind {
    #[default]
    Text,
    Code,
}

/// One immutable snapshot of an artifact.
///
/// Everything except `index` and `content` is metadata that a rewrite carries
/// over unchanged from the version it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    pub title: String,
    /// Programming language of a code artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub content: String,
}

impl Version {
    pub fn new(index: usize, kind: ArtifactKind, title: impl Into<String>) -> Self {
        Self {
            index,
            kind,
            title: title.into(),
            language: None,
            content: String::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// Append-only version history plus the pointer to the active version.
///
/// Deserialization goes through [`Artifact::from_parts`], so JSON that breaks
/// the index invariants is rejected at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawArtifact")]
pub struct Artifact {
    #[serde(rename = "currentContentIndex")]
    pub(crate) current_index: usize,
    pub(crate) contents: Vec<Version>,
}

#[derive(Deserialize)]
struct RawArtifact {
    #[serde(rename = "currentContentIndex")]
    current_index: usize,
    contents: Vec<Version>,
}

impl TryFrom<RawArtifact> for Artifact {
    type Error = ArtifactError;

    fn try_from(raw: RawArtifact) -> Result<Self, Self::Error> {
        Self::from_parts(raw.current_index, raw.contents)
    }
}

impl Artifact {
    /// Seed a new artifact with its first version at index 1.
    pub fn seed(kind: ArtifactKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::from_first(Version::new(1, kind, title).with_content(content))
    }

    /// Seed from a fully-built first version, renumbered to index 1.
    pub fn from_first(mut first: Version) -> Self {
        first.index = 1;
        Self {
            current_index: 1,
            contents: vec![first],
        }
    }

    /// Rebuild an artifact from stored parts and check its invariants.
    pub fn from_parts(current_index: usize, contents: Vec<Version>) -> Result<Self, ArtifactError> {
        let artifact = Self {
            current_index,
            contents,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn versions(&self) -> &[Version] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn version(&self, index: usize) -> Option<&Version> {
        self.contents.iter().find(|v| v.index == index)
    }

    /// The version the current pointer references, if any.
    pub fn current_version(&self) -> Option<&Version> {
        self.version(self.current_index)
    }

    /// Check the structural invariants: positive unique indices and a current
    /// pointer that resolves whenever there is at least one version.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let mut seen = HashSet::with_capacity(self.contents.len());
        for version in &self.contents {
            if version.index == 0 {
                return Err(ArtifactError::ZeroIndex);
            }
            if !seen.insert(version.index) {
                return Err(ArtifactError::DuplicateIndex(version.index));
            }
        }

        if !self.contents.is_empty() && !seen.contains(&self.current_index) {
            return Err(ArtifactError::DanglingCurrentIndex(self.current_index));
        }

        Ok(())
    }
}
