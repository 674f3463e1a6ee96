use super::traits::{RewriteEvent, RewriteObserver};

/// Observer that discards every event.
pub struct NoopObserver;

impl RewriteObserver for NoopObserver {
    #[inline(always)]
    fn record_event(&self, _event: &RewriteEvent) {}

    fn name(&self) -> &str {
        "noop"
    }
}
