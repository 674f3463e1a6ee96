//! Rewrite directives.
//!
//! A [`RequestState`] is the loose, caller-populated shape: every directive
//! field optional. [`Directive`] is the resolved single transformation.

use crate::error::RewriteError;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReadingLevel {
    Child,
    Teenager,
    College,
    Phd,
    /// Informal style; rendered with its own template rather than a phrase.
    Pirate,
}

impl ReadingLevel {
    /// Audience phrase substituted into the reading-level template.
    /// `None` for [`ReadingLevel::Pirate`].
    pub fn audience_phrase(self) -> Option<&'static str> {
        match self {
            Self::Child => Some("elementary school student"),
            Self::Teenager => Some("high school student"),
            Self::College => Some("college student"),
            Self::Phd => Some("PhD student"),
            Self::Pirate => None,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArtifactLength {
    Shortest,
    Short,
    Long,
    Longest,
}

impl ArtifactLength {
    pub fn length_phrase(self) -> &'static str {
        match self {
            Self::Shortest => "much shorter than it currently is",
            Self::Short => "slightly shorter than it currently is",
            Self::Long => "slightly longer than it currently is",
            Self::Longest => "much longer than it currently is",
        }
    }
}

/// Exactly one transformation to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Directive {
    Language(String),
    ReadingLevel(ReadingLevel),
    Length(ArtifactLength),
    Emojis,
}

impl Directive {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Language(_) => "language",
            Self::ReadingLevel(ReadingLevel::Pirate) => "pirate",
            Self::ReadingLevel(_) => "reading_level",
            Self::Length(_) => "length",
            Self::Emojis => "emojis",
        }
    }
}

impl From<Directive> for RequestState {
    fn from(directive: Directive) -> Self {
        let mut state = Self::default();
        match directive {
            Directive::Language(language) => state.language = Some(language),
            Directive::ReadingLevel(level) => state.reading_level = Some(level),
            Directive::Length(length) => state.artifact_length = Some(length),
            Directive::Emojis => state.regenerate_with_emojis = true,
        }
        state
    }
}

/// Caller-populated request carrying at most one directive field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestState {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub reading_level: Option<ReadingLevel>,
    #[serde(default)]
    pub artifact_length: Option<ArtifactLength>,
    #[serde(default)]
    pub regenerate_with_emojis: bool,
}

impl RequestState {
    /// Number of directive fields that are meaningfully set.
    pub fn set_count(&self) -> usize {
        [
            self.language_directive().is_some(),
            self.reading_level.is_some(),
            self.artifact_length.is_some(),
            self.regenerate_with_emojis,
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// Resolve to a single directive.
    ///
    /// Priority when several fields are set: language, reading level, length,
    /// emojis. An empty language string counts as unset.
    pub fn directive(&self) -> Result<Directive, RewriteError> {
        if let Some(language) = self.language_directive() {
            return Ok(Directive::Language(language.to_string()));
        }
        if let Some(level) = self.reading_level {
            return Ok(Directive::ReadingLevel(level));
        }
        if let Some(length) = self.artifact_length {
            return Ok(Directive::Length(length));
        }
        if self.regenerate_with_emojis {
            return Ok(Directive::Emojis);
        }
        Err(RewriteError::NoDirectiveSelected)
    }

    fn language_directive(&self) -> Option<&str> {
        self.language.as_deref().filter(|l| !l.is_empty())
    }
}
