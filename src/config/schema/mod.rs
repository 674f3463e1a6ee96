mod core;
mod generation;
mod memory;
mod observability;

pub use self::core::Config;
pub use generation::GenerationConfig;
pub use memory::MemoryConfig;
pub use observability::ObservabilityConfig;
