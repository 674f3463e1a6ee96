use crate::error::PromptError;
use tera::Tera;

/// Tera-backed template engine for rewrite prompts.
///
/// Template names carry no `.html` suffix, so Tera does not autoescape:
/// artifact text with markup is rendered verbatim.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Create with inline templates (no filesystem).
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register a template from a string.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), PromptError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| PromptError::Render(describe(&e)))
    }

    /// Render a named template with the given context.
    pub fn render(&self, template_name: &str, context: &tera::Context) -> Result<String, PromptError> {
        if !self.tera.get_template_names().any(|name| name == template_name) {
            return Err(PromptError::NotFound(template_name.to_string()));
        }
        self.tera
            .render(template_name, context)
            .map_err(|e| PromptError::Render(describe(&e)))
    }
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten Tera's error chain; the top-level message alone rarely names the
/// missing variable.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
