use super::reflections::{Namespace, Reflections};
use super::traits::ReflectionStore;
use crate::error::MemoryError;
use anyhow::Result;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

type Records = HashMap<(Namespace, String), Reflections>;

/// Process-local reflection store. Contents vanish with the process.
#[derive(Default)]
pub struct InMemoryReflectionStore {
    records: Mutex<Records>,
}

impl InMemoryReflectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Records>> {
        self.records
            .lock()
            .map_err(|e| MemoryError::Query(e.to_string()).into())
    }
}

impl ReflectionStore for InMemoryReflectionStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn get<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Reflections>>> + Send + 'a>> {
        Box::pin(async move {
            let records = self.lock()?;
            Ok(records.get(&(namespace.clone(), key.to_string())).cloned())
        })
    }

    fn put<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a str,
        reflections: &'a Reflections,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.lock()?
                .insert((namespace.clone(), key.to_string()), reflections.clone());
            Ok(())
        })
    }

    fn delete<'a>(
        &'a self,
        namespace: &'a Namespace,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + 'a>> {
        Box::pin(async move {
            let removed = self
                .lock()?
                .remove(&(namespace.clone(), key.to_string()))
                .is_some();
            Ok(removed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::REFLECTION_KEY;

    #[tokio::test]
    async fn put_get_delete() {
        let store = InMemoryReflectionStore::new();
        let ns = Namespace::for_assistant("a1");
        let reflections = Reflections {
            style_rules: vec!["Be brief".into()],
            content: vec![],
        };

        assert!(store.get(&ns, REFLECTION_KEY).await.unwrap().is_none());
        store.put(&ns, REFLECTION_KEY, &reflections).await.unwrap();
        assert_eq!(
            store.get(&ns, REFLECTION_KEY).await.unwrap(),
            Some(reflections)
        );
        assert!(store.delete(&ns, REFLECTION_KEY).await.unwrap());
        assert!(!store.delete(&ns, REFLECTION_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let store = InMemoryReflectionStore::new();
        let reflections = Reflections {
            style_rules: vec![],
            content: vec!["Likes Rust".into()],
        };
        store
            .put(&Namespace::for_assistant("a1"), REFLECTION_KEY, &reflections)
            .await
            .unwrap();

        let other = store
            .get(&Namespace::for_assistant("a2"), REFLECTION_KEY)
            .await
            .unwrap();
        assert!(other.is_none());
    }
}
