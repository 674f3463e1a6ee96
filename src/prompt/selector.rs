use super::engine::TeraEngine;
use super::templates::{
    ARTIFACT_CONTENT, NEW_LANGUAGE, NEW_LENGTH, NEW_READING_LEVEL, REFLECTIONS, TemplateKind,
};
use crate::directive::{Directive, ReadingLevel};
use crate::error::PromptError;
use strum::IntoEnumIterator;
use tera::Context;

/// A directive resolved to its template and the phrase substituted into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    pub kind: TemplateKind,
    /// `(parameter, value)` for templates that take one besides content and
    /// reflections.
    pub argument: Option<(&'static str, String)>,
}

impl Transform {
    pub fn for_directive(directive: &Directive) -> Self {
        match directive {
            Directive::Language(language) => Self {
                kind: TemplateKind::ChangeLanguage,
                argument: Some((NEW_LANGUAGE, language.clone())),
            },
            Directive::ReadingLevel(ReadingLevel::Pirate) => Self {
                kind: TemplateKind::Pirate,
                argument: None,
            },
            Directive::ReadingLevel(level) => Self {
                kind: TemplateKind::ChangeReadingLevel,
                argument: level
                    .audience_phrase()
                    .map(|phrase| (NEW_READING_LEVEL, phrase.to_string())),
            },
            Directive::Length(length) => Self {
                kind: TemplateKind::ChangeLength,
                argument: Some((NEW_LENGTH, length.length_phrase().to_string())),
            },
            Directive::Emojis => Self {
                kind: TemplateKind::AddEmojis,
                argument: None,
            },
        }
    }
}

/// Prompt text ready for the generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub kind: TemplateKind,
    pub text: String,
}

/// Picks the template for a directive and renders it.
///
/// Rendering is pure: the same directive, content and reflections always
/// produce the same text.
pub struct TransformSelector {
    engine: TeraEngine,
}

impl TransformSelector {
    /// Register every template, refusing any that does not reference one of
    /// its declared parameters.
    pub fn new() -> Result<Self, PromptError> {
        let mut engine = TeraEngine::new();
        for kind in TemplateKind::iter() {
            let source = kind.source();
            for &parameter in kind.parameters() {
                if !source.contains(&format!("{{{{ {parameter} }}}}")) {
                    return Err(PromptError::MissingPlaceholder {
                        template: kind.name(),
                        parameter,
                    });
                }
            }
            engine.add_template(kind.name(), source)?;
        }
        Ok(Self { engine })
    }

    pub fn render(
        &self,
        directive: &Directive,
        artifact_content: &str,
        reflections: &str,
    ) -> Result<RenderedPrompt, PromptError> {
        let transform = Transform::for_directive(directive);

        let mut ctx = Context::new();
        ctx.insert(ARTIFACT_CONTENT, artifact_content);
        ctx.insert(REFLECTIONS, reflections);
        if let Some((parameter, value)) = &transform.argument {
            ctx.insert(*parameter, value);
        }

        let text = self.engine.render(transform.kind.name(), &ctx)?;
        Ok(RenderedPrompt {
            kind: transform.kind,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{ArtifactLength, RequestState};
    use crate::memory::NO_REFLECTIONS;

    fn selector() -> TransformSelector {
        TransformSelector::new().unwrap()
    }

    #[test]
    fn every_template_declares_its_placeholders() {
        for kind in TemplateKind::iter() {
            for parameter in kind.parameters() {
                assert!(
                    kind.source().contains(&format!("{{{{ {parameter} }}}}")),
                    "{} is missing {parameter}",
                    kind.name()
                );
            }
        }
    }

    #[test]
    fn language_directive_renders_language_and_content() {
        let prompt = selector()
            .render(
                &Directive::Language("French".into()),
                "Hello world",
                NO_REFLECTIONS,
            )
            .unwrap();

        assert_eq!(prompt.kind, TemplateKind::ChangeLanguage);
        assert!(prompt.text.contains("changing the language of the following artifact to French."));
        assert!(prompt.text.contains("<artifact>\nHello world\n</artifact>"));
    }

    #[test]
    fn child_reading_level_uses_elementary_phrase() {
        let prompt = selector()
            .render(
                &Directive::ReadingLevel(ReadingLevel::Child),
                "Photosynthesis converts light.",
                NO_REFLECTIONS,
            )
            .unwrap();

        assert_eq!(prompt.kind, TemplateKind::ChangeReadingLevel);
        assert!(prompt.text.contains("at a elementary school student reading level"));
    }

    #[test]
    fn pirate_uses_its_own_template() {
        let prompt = selector()
            .render(
                &Directive::ReadingLevel(ReadingLevel::Pirate),
                "Hello",
                NO_REFLECTIONS,
            )
            .unwrap();

        assert_eq!(prompt.kind, TemplateKind::Pirate);
        assert!(prompt.text.contains("sound like a pirate"));
        assert!(!prompt.text.contains("reading level"));
    }

    #[test]
    fn shortest_length_uses_much_shorter_phrase() {
        let prompt = selector()
            .render(
                &Directive::Length(ArtifactLength::Shortest),
                "A long essay.",
                NO_REFLECTIONS,
            )
            .unwrap();

        assert_eq!(prompt.kind, TemplateKind::ChangeLength);
        assert!(prompt.text.contains("to be much shorter than it currently is."));
    }

    #[test]
    fn emojis_template_substitutes_content_only() {
        let prompt = selector()
            .render(&Directive::Emojis, "Good morning", NO_REFLECTIONS)
            .unwrap();

        assert_eq!(prompt.kind, TemplateKind::AddEmojis);
        assert!(prompt.text.contains("<artifact>\nGood morning\n</artifact>"));
    }

    #[test]
    fn reflections_are_injected_into_every_template() {
        let selector = selector();
        for directive in [
            Directive::Language("German".into()),
            Directive::ReadingLevel(ReadingLevel::Phd),
            Directive::ReadingLevel(ReadingLevel::Pirate),
            Directive::Length(ArtifactLength::Long),
            Directive::Emojis,
        ] {
            let prompt = selector
                .render(&directive, "content", "- prefers bullet points")
                .unwrap();
            assert!(
                prompt
                    .text
                    .contains("<reflections>\n- prefers bullet points\n</reflections>"),
                "{directive:?}"
            );
        }
    }

    #[test]
    fn missing_reflections_render_fallback_literal() {
        let prompt = selector()
            .render(&Directive::Emojis, "content", NO_REFLECTIONS)
            .unwrap();
        assert!(prompt.text.contains("No reflections found."));
    }

    #[test]
    fn rendering_is_deterministic() {
        let selector = selector();
        let directive = Directive::Length(ArtifactLength::Short);
        let a = selector.render(&directive, "same", "same").unwrap();
        let b = selector.render(&directive, "same", "same").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ambiguous_request_renders_exactly_one_template() {
        let state = RequestState {
            language: None,
            reading_level: Some(ReadingLevel::Teenager),
            artifact_length: Some(ArtifactLength::Longest),
            regenerate_with_emojis: true,
        };
        let prompt = selector()
            .render(&state.directive().unwrap(), "text", NO_REFLECTIONS)
            .unwrap();

        assert_eq!(prompt.kind, TemplateKind::ChangeReadingLevel);
        assert!(prompt.text.contains("high school student"));
        assert!(!prompt.text.contains("much longer"));
        assert!(!prompt.text.contains("adding emojis"));
    }

    #[test]
    fn template_syntax_in_content_is_rendered_literally() {
        let prompt = selector()
            .render(&Directive::Emojis, "fn f() { {{ x }} }", NO_REFLECTIONS)
            .unwrap();
        assert!(prompt.text.contains("fn f() { {{ x }} }"));
    }
}
