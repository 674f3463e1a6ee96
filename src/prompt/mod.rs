mod engine;
pub mod selector;
pub mod templates;

pub use engine::TeraEngine;
pub use selector::{RenderedPrompt, Transform, TransformSelector};
pub use templates::TemplateKind;
