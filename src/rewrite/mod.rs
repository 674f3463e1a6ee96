//! Theme rewriting: turn one directive into one new artifact version.
//!
//! The pipeline is request-scoped and sequential: identity check, reflection
//! lookup, current-version resolution, directive resolution, prompt
//! rendering, a single generation call, then the append. Any failure leaves
//! the caller's artifact untouched.

use crate::artifact::Artifact;
use crate::config::GenerationConfig;
use crate::directive::{Directive, RequestState};
use crate::error::RewriteError;
use crate::llm::Provider;
use crate::memory::{NO_REFLECTIONS, Namespace, REFLECTION_KEY, ReflectionStore};
use crate::observability::{NoopObserver, RewriteEvent, RewriteObserver};
use crate::prompt::{RenderedPrompt, TransformSelector};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Per-invocation context supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteContext {
    pub assistant_id: Option<String>,
}

impl RewriteContext {
    pub fn for_assistant(assistant_id: impl Into<String>) -> Self {
        Self {
            assistant_id: Some(assistant_id.into()),
        }
    }

    fn assistant_id(&self) -> Result<&str, RewriteError> {
        self.assistant_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(RewriteError::MissingAssistantIdentity)
    }
}

pub struct ThemeRewriter {
    provider: Arc<dyn Provider>,
    reflections: Arc<dyn ReflectionStore>,
    generation: GenerationConfig,
    selector: TransformSelector,
    observer: Arc<dyn RewriteObserver>,
}

impl ThemeRewriter {
    pub fn new(
        provider: Arc<dyn Provider>,
        reflections: Arc<dyn ReflectionStore>,
        generation: GenerationConfig,
    ) -> Result<Self, RewriteError> {
        Ok(Self {
            provider,
            reflections,
            generation,
            selector: TransformSelector::new()?,
            observer: Arc::new(NoopObserver),
        })
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RewriteObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Apply the directive carried by `request` to `artifact`.
    ///
    /// Returns a new artifact with exactly one more version whose content is
    /// the backend's text. When several request fields are set the highest
    /// priority one wins.
    pub async fn rewrite(
        &self,
        ctx: &RewriteContext,
        request: &RequestState,
        artifact: &Artifact,
    ) -> Result<Artifact, RewriteError> {
        let result = self.run(ctx, Requested::State(request), artifact).await;
        self.report(result)
    }

    /// Apply an already-resolved directive.
    pub async fn rewrite_with_directive(
        &self,
        ctx: &RewriteContext,
        directive: &Directive,
        artifact: &Artifact,
    ) -> Result<Artifact, RewriteError> {
        let result = self.run(ctx, Requested::Directive(directive), artifact).await;
        self.report(result)
    }

    fn report(
        &self,
        result: Result<Artifact, (&'static str, RewriteError)>,
    ) -> Result<Artifact, RewriteError> {
        result.map_err(|(stage, err)| {
            self.observer.record_event(&RewriteEvent::Error {
                stage: stage.to_string(),
                message: err.to_string(),
            });
            err
        })
    }

    async fn run(
        &self,
        ctx: &RewriteContext,
        requested: Requested<'_>,
        artifact: &Artifact,
    ) -> Result<Artifact, (&'static str, RewriteError)> {
        let assistant_id = ctx.assistant_id().map_err(|e| ("context", e))?;

        let reflections = self.load_reflections(assistant_id).await;

        let current_index = artifact.current_index();
        let current = artifact
            .current_version()
            .ok_or(("artifact", RewriteError::NoCurrentContent { index: current_index }))?;

        self.observer.record_event(&RewriteEvent::RewriteStart {
            assistant_id: assistant_id.to_string(),
            current_index,
        });

        let directive = match requested {
            Requested::Directive(directive) => directive.clone(),
            Requested::State(request) => resolve_directive(request).map_err(|e| ("directive", e))?,
        };

        let RenderedPrompt { kind, text: prompt } = self
            .selector
            .render(&directive, &current.content, &reflections)
            .map_err(|e| ("prompt", RewriteError::from(e)))?;
        self.observer.record_event(&RewriteEvent::PromptRendered {
            template: kind.name().to_string(),
            prompt_chars: prompt.chars().count(),
        });

        let started = Instant::now();
        let generated = self
            .provider
            .chat(&prompt, &self.generation.model, self.generation.temperature)
            .await
            .map_err(|e| ("generation", RewriteError::Backend(e)))?;
        self.observer.record_event(&RewriteEvent::GenerationEnd {
            provider: self.provider.name().to_string(),
            model: self.generation.model.clone(),
            duration: started.elapsed(),
            output_chars: generated.chars().count(),
        });

        let updated = artifact.append(current, generated);
        self.observer.record_event(&RewriteEvent::VersionAppended {
            index: updated.current_index(),
            version_count: updated.len(),
        });

        Ok(updated)
    }

    /// Formatted reflections for the assistant, or the placeholder when none
    /// are stored or the store is unavailable.
    async fn load_reflections(&self, assistant_id: &str) -> String {
        let namespace = Namespace::for_assistant(assistant_id);
        match self.reflections.get(&namespace, REFLECTION_KEY).await {
            Ok(Some(reflections)) => reflections.format(),
            Ok(None) => NO_REFLECTIONS.to_string(),
            Err(err) => {
                warn!(
                    namespace = %namespace,
                    store = self.reflections.name(),
                    "reflection lookup failed, continuing without reflections: {err:#}"
                );
                NO_REFLECTIONS.to_string()
            }
        }
    }
}

/// What the caller asked for: a resolved directive or a raw request state.
enum Requested<'a> {
    Directive(&'a Directive),
    State(&'a RequestState),
}

fn resolve_directive(request: &RequestState) -> Result<Directive, RewriteError> {
    let directive = request.directive()?;
    let set = request.set_count();
    if set > 1 {
        debug!(
            chosen = directive.label(),
            fields_set = set,
            "multiple rewrite directives set, applying highest priority"
        );
    }
    Ok(directive)
}
