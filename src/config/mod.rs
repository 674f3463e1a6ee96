pub mod schema;

pub use schema::{Config, GenerationConfig, MemoryConfig, ObservabilityConfig};
