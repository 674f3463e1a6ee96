use super::compatible::{AuthStyle, OpenAiCompatibleProvider};
use super::traits::Provider;
use crate::config::GenerationConfig;
use crate::error::LlmError;
use std::sync::Arc;

/// Resolve API key for a provider from config and environment variables.
///
/// Resolution order:
/// 1. Explicitly provided `api_key` parameter (trimmed, filtered if empty)
/// 2. Provider-specific environment variable (e.g. `OPENAI_API_KEY`)
/// 3. Generic fallback variables (`PALIMPSEST_API_KEY`, `API_KEY`)
pub fn resolve_api_key(name: &str, explicit_api_key: Option<&str>) -> Option<String> {
    if let Some(key) = explicit_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let provider_env: &[&str] = match name {
        "openai" => &["OPENAI_API_KEY"],
        "openrouter" => &["OPENROUTER_API_KEY"],
        "groq" => &["GROQ_API_KEY"],
        "mistral" => &["MISTRAL_API_KEY"],
        "deepseek" => &["DEEPSEEK_API_KEY"],
        "together" | "together-ai" => &["TOGETHER_API_KEY"],
        _ => &[],
    };

    provider_env
        .iter()
        .chain(["PALIMPSEST_API_KEY", "API_KEY"].iter())
        .find_map(|var| {
            std::env::var(var)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
}

/// Maps well-known provider names to `(display_name, default_base_url)`.
pub fn provider_spec(name: &str) -> Option<(&'static str, &'static str)> {
    let spec = match name {
        "openai" => ("OpenAI", "https://api.openai.com/v1"),
        "openrouter" => ("OpenRouter", "https://openrouter.ai/api/v1"),
        "ollama" => ("Ollama", "http://localhost:11434/v1"),
        "groq" => ("Groq", "https://api.groq.com/openai/v1"),
        "mistral" => ("Mistral", "https://api.mistral.ai/v1"),
        "deepseek" => ("DeepSeek", "https://api.deepseek.com"),
        "together" | "together-ai" => ("Together AI", "https://api.together.xyz/v1"),
        _ => return None,
    };
    Some(spec)
}

/// Create the generation backend described by `config`.
///
/// Supported providers:
/// - the names listed in [`provider_spec`]
/// - `"custom:<base_url>"` for any OpenAI-compatible endpoint
///
/// `config.base_url` overrides the provider's default endpoint and
/// `config.auth_header` the header the key is sent in.
pub fn create_provider(
    config: &GenerationConfig,
    api_key: Option<&str>,
) -> anyhow::Result<Arc<dyn Provider>> {
    let name = config.provider.as_str();
    let resolved_key = resolve_api_key(name, api_key);

    let (display_name, default_url) = if let Some(url) = name.strip_prefix("custom:") {
        if url.is_empty() {
            anyhow::bail!("Custom provider requires a URL. Format: custom:https://your-api.com");
        }
        ("Custom", url)
    } else {
        provider_spec(name).ok_or_else(|| LlmError::UnknownProvider(name.to_string()))?
    };

    let base_url = config.base_url.as_deref().unwrap_or(default_url);
    let provider = OpenAiCompatibleProvider::new(
        display_name,
        base_url,
        resolved_key.as_deref(),
        AuthStyle::from_header(config.auth_header.as_deref()),
        config.timeout_secs,
    );

    tracing::debug!(provider = display_name, base_url, "generation provider ready");

    if name == "ollama" {
        Ok(Arc::new(provider.without_key_requirement()))
    } else {
        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generation(provider: &str) -> GenerationConfig {
        GenerationConfig {
            provider: provider.to_string(),
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn explicit_key_wins_and_is_trimmed() {
        assert_eq!(
            resolve_api_key("openai", Some("  sk-explicit  ")).as_deref(),
            Some("sk-explicit")
        );
    }

    #[test]
    fn known_providers_build() {
        for name in ["openai", "openrouter", "ollama", "groq", "mistral", "deepseek", "together"] {
            let provider = create_provider(&generation(name), Some("k")).unwrap();
            assert!(!provider.name().is_empty(), "{name}");
        }
    }

    #[test]
    fn custom_provider_uses_given_url() {
        let provider = create_provider(&generation("custom:http://127.0.0.1:9000/v1"), Some("k"))
            .unwrap();
        assert_eq!(provider.name(), "Custom");
    }

    #[test]
    fn custom_provider_requires_url() {
        let err = create_provider(&generation("custom:"), Some("k"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("requires a URL"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = create_provider(&generation("nonexistent"), Some("k"))
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<LlmError>(),
            Some(LlmError::UnknownProvider(name)) if name == "nonexistent"
        ));
    }
}
