use super::traits::{RewriteEvent, RewriteObserver};
use tracing::{info, warn};

/// Log-based observer backed by `tracing`.
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl RewriteObserver for LogObserver {
    fn record_event(&self, event: &RewriteEvent) {
        let name = event.name();
        match event {
            RewriteEvent::RewriteStart {
                assistant_id,
                current_index,
            } => {
                info!(assistant_id = %assistant_id, current_index, "{name}");
            }
            RewriteEvent::PromptRendered {
                template,
                prompt_chars,
            } => {
                info!(template = %template, prompt_chars, "{name}");
            }
            RewriteEvent::GenerationEnd {
                provider,
                model,
                duration,
                output_chars,
            } => {
                let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
                info!(
                    provider = %provider,
                    model = %model,
                    duration_ms = ms,
                    output_chars,
                    "{name}"
                );
            }
            RewriteEvent::VersionAppended {
                index,
                version_count,
            } => {
                info!(index, version_count, "{name}");
            }
            RewriteEvent::Error { stage, message } => {
                warn!(stage = %stage, error = %message, "{name}");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}
