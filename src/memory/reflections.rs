use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder injected into prompts when no reflections are available.
pub const NO_REFLECTIONS: &str = "No reflections found.";

/// Namespace prefix under which reflections are stored.
pub const MEMORY_NAMESPACE_PREFIX: &str = "memories";

/// Key of the reflections record inside an assistant's namespace.
pub const REFLECTION_KEY: &str = "reflection";

/// Long-term memory an assistant has accumulated about a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflections {
    #[serde(default)]
    pub style_rules: Vec<String>,
    #[serde(default)]
    pub content: Vec<String>,
}

impl Reflections {
    /// Render as prompt context: a style-guidelines block and a user-facts block.
    pub fn format(&self) -> String {
        let style = bullet_list(&self.style_rules, "No style guidelines found.");
        let facts = bullet_list(&self.content, "No memories/facts found.");
        format!(
            "The following is a list of style guidelines previously generated by you:\n\
             <style-guidelines>\n{style}\n</style-guidelines>\n\n\
             The following is a list of memories/facts you previously generated about the user:\n\
             <user-facts>\n{facts}\n</user-facts>"
        )
    }
}

fn bullet_list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ordered namespace path for the reflection store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(Vec<String>);

impl Namespace {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// `["memories", assistant_id]`, with surrounding whitespace stripped
    /// from the id.
    pub fn for_assistant(assistant_id: &str) -> Self {
        Self::new([MEMORY_NAMESPACE_PREFIX, assistant_id.trim()])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
