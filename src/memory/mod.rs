pub mod factory;
pub mod in_memory;
pub mod reflections;
pub mod sqlite;
pub mod traits;

pub use factory::create_reflection_store;
pub use in_memory::InMemoryReflectionStore;
pub use reflections::{
    MEMORY_NAMESPACE_PREFIX, NO_REFLECTIONS, Namespace, REFLECTION_KEY, Reflections,
};
pub use sqlite::SqliteReflectionStore;
pub use traits::ReflectionStore;
