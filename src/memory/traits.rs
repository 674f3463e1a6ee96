use super::reflections::{Namespace, Reflections};
use anyhow::Result;
use std::future::Future;
use std::pin::Pin;

/// Key/value store for assistant reflections.
///
/// Dyn-safe so backends can be shared as `Arc<dyn ReflectionStore>`.
pub trait ReflectionStore: Send + Sync {
    /// Backend identifier (e.g. "sqlite", "in_memory").
    fn name(&self) -> &str;

    fn get<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Reflections>>> + Send + 'a>>;

    fn put<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a str,
        reflections: &'a Reflections,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Returns whether a record was removed.
    fn delete<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>>;
}
