use std::time::Duration;

/// Events emitted by one rewrite invocation, in pipeline order.
#[derive(Debug, Clone, PartialEq)]
pub enum RewriteEvent {
    RewriteStart {
        assistant_id: String,
        current_index: usize,
    },
    PromptRendered {
        template: String,
        prompt_chars: usize,
    },
    GenerationEnd {
        provider: String,
        model: String,
        duration: Duration,
        output_chars: usize,
    },
    VersionAppended {
        index: usize,
        version_count: usize,
    },
    Error {
        stage: String,
        message: String,
    },
}

impl RewriteEvent {
    /// Dotted event name used as the log message.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RewriteStart { .. } => "rewrite.start",
            Self::PromptRendered { .. } => "rewrite.prompt_rendered",
            Self::GenerationEnd { .. } => "rewrite.generation_end",
            Self::VersionAppended { .. } => "rewrite.version_appended",
            Self::Error { .. } => "rewrite.error",
        }
    }
}

/// Observability hook for the rewrite pipeline.
pub trait RewriteObserver: Send + Sync {
    fn record_event(&self, event: &RewriteEvent);

    fn name(&self) -> &str;
}
