use serde::Serialize;

const CHANGE_LANGUAGE_TEMPLATE: &str = "\
You are tasked with changing the language of the following artifact to {{ new_language }}.

Here is the current content of the artifact:
<artifact>
{{ artifact_content }}
</artifact>

You also have the following reflections on style guidelines and general memories/facts about the user to use when generating your response.
<reflections>
{{ reflections }}
</reflections>

Rules and guidelines:
<rules-guidelines>
- ONLY change the language and nothing else.
- Respond with ONLY the updated artifact, and no additional text before or after.
- Do not wrap it in any XML tags you see in this prompt. Ensure it's just the updated artifact.
</rules-guidelines>";

const CHANGE_READING_LEVEL_TEMPLATE: &str = "\
You are tasked with re-writing the following artifact to be at a {{ new_reading_level }} reading level.
Ensure you do not change the meaning of the artifact, simply change the language to be at the desired reading level.

Here is the current content of the artifact:
<artifact>
{{ artifact_content }}
</artifact>

You also have the following reflections on style guidelines and general memories/facts about the user to use when generating your response.
<reflections>
{{ reflections }}
</reflections>

Rules and guidelines:
<rules-guidelines>
- Respond with ONLY the updated artifact, and no additional text before or after.
- Do not wrap it in any XML tags you see in this prompt. Ensure it's just the updated artifact.
</rules-guidelines>";

const PIRATE_TEMPLATE: &str = "\
You are tasked with re-writing the following artifact to sound like a pirate.
Ensure you do not change the meaning of the artifact, simply change the language to sound like a pirate.

Here is the current content of the artifact:
<artifact>
{{ artifact_content }}
</artifact>

You also have the following reflections on style guidelines and general memories/facts about the user to use when generating your response.
<reflections>
{{ reflections }}
</reflections>

Rules and guidelines:
<rules-guidelines>
- Respond with ONLY the updated artifact, and no additional text before or after.
- Ensure you respond with the entire updated artifact, and not just the new content.
- Do not wrap it in any XML tags you see in this prompt. Ensure it's just the updated artifact.
</rules-guidelines>";

const CHANGE_LENGTH_TEMPLATE: &str = "\
You are tasked with re-writing the following artifact to be {{ new_length }}.
Ensure you do not change the meaning of the artifact, simply change its length as requested.

Here is the current content of the artifact:
<artifact>
{{ artifact_content }}
</artifact>

You also have the following reflections on style guidelines and general memories/facts about the user to use when generating your response.
<reflections>
{{ reflections }}
</reflections>

Rules and guidelines:
<rules-guidelines>
- Respond with ONLY the updated artifact, and no additional text before or after.
- Do not wrap it in any XML tags you see in this prompt. Ensure it's just the updated artifact.
</rules-guidelines>";

const ADD_EMOJIS_TEMPLATE: &str = "\
You are tasked with revising the following artifact by adding emojis to it.
Ensure you do not change the meaning of the artifact, simply add emojis throughout the artifact in appropriate places.

Here is the current content of the artifact:
<artifact>
{{ artifact_content }}
</artifact>

You also have the following reflections on style guidelines and general memories/facts about the user to use when generating your response.
<reflections>
{{ reflections }}
</reflections>

Rules and guidelines:
<rules-guidelines>
- Respond with ONLY the updated artifact, and no additional text before or after.
- Ensure you respond with the entire updated artifact, including the emojis.
- Do not wrap it in any XML tags you see in this prompt. Ensure it's just the updated artifact.
</rules-guidelines>";

pub const ARTIFACT_CONTENT: &str = "artifact_content";
pub const REFLECTIONS: &str = "reflections";
pub const NEW_LANGUAGE: &str = "new_language";
pub const NEW_READING_LEVEL: &str = "new_reading_level";
pub const NEW_LENGTH: &str = "new_length";

/// The closed set of rewrite templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    ChangeLanguage,
    ChangeReadingLevel,
    Pirate,
    ChangeLength,
    AddEmojis,
}

impl TemplateKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::ChangeLanguage => "change_language",
            Self::ChangeReadingLevel => "change_reading_level",
            Self::Pirate => "pirate",
            Self::ChangeLength => "change_length",
            Self::AddEmojis => "add_emojis",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            Self::ChangeLanguage => CHANGE_LANGUAGE_TEMPLATE,
            Self::ChangeReadingLevel => CHANGE_READING_LEVEL_TEMPLATE,
            Self::Pirate => PIRATE_TEMPLATE,
            Self::ChangeLength => CHANGE_LENGTH_TEMPLATE,
            Self::AddEmojis => ADD_EMOJIS_TEMPLATE,
        }
    }

    /// Every parameter the template declares. Rendering supplies exactly these.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Self::ChangeLanguage => &[NEW_LANGUAGE, ARTIFACT_CONTENT, REFLECTIONS],
            Self::ChangeReadingLevel => &[NEW_READING_LEVEL, ARTIFACT_CONTENT, REFLECTIONS],
            Self::ChangeLength => &[NEW_LENGTH, ARTIFACT_CONTENT, REFLECTIONS],
            Self::Pirate | Self::AddEmojis => &[ARTIFACT_CONTENT, REFLECTIONS],
        }
    }
}
