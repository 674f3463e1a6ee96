//! Generic OpenAI-compatible provider.
//! Most hosted and local LLM servers speak the same `/chat/completions`
//! format, so one implementation covers all of them.

use super::http_client::build_provider_client;
use super::scrub::sanitize_api_error;
use super::traits::Provider;
use crate::error::LlmError;
use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// How the provider expects the API key to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `x-api-key: <key>`
    XApiKey,
    /// Custom header name
    Custom(String),
}

impl AuthStyle {
    /// Map a configured header name to an auth style. `None` and
    /// `Authorization` (any case) mean bearer auth.
    pub fn from_header(header: Option<&str>) -> Self {
        match header.map(str::trim) {
            None | Some("") => Self::Bearer,
            Some(h) if h.eq_ignore_ascii_case("authorization") => Self::Bearer,
            Some(h) if h.eq_ignore_ascii_case("x-api-key") => Self::XApiKey,
            Some(h) => Self::Custom(h.to_string()),
        }
    }
}

/// A provider that speaks the OpenAI-compatible chat completions API.
pub struct OpenAiCompatibleProvider {
    name: String,
    api_key: Option<String>,
    /// Local servers accept requests without a key.
    key_required: bool,
    /// Pre-computed `(header_name, header_value)` for auth.
    cached_auth: Option<(String, String)>,
    chat_url: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        name: &str,
        base_url: &str,
        api_key: Option<&str>,
        auth_style: AuthStyle,
        timeout_secs: u64,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let chat_url = if base_url.ends_with("chat/completions") {
            base_url.to_string()
        } else {
            format!("{base_url}/chat/completions")
        };

        let cached_auth = api_key.map(|k| match &auth_style {
            AuthStyle::Bearer => ("Authorization".to_string(), format!("Bearer {k}")),
            AuthStyle::XApiKey => ("x-api-key".to_string(), k.to_string()),
            AuthStyle::Custom(header) => (header.clone(), k.to_string()),
        });

        Self {
            name: name.to_string(),
            api_key: api_key.map(ToString::to_string),
            key_required: true,
            cached_auth,
            chat_url,
            client: build_provider_client(timeout_secs),
        }
    }

    /// Allow requests without an API key (e.g. a local Ollama server).
    #[must_use]
    pub fn without_key_requirement(mut self) -> Self {
        self.key_required = false;
        self
    }

    pub fn chat_completions_url(&self) -> &str {
        &self.chat_url
    }

    fn apply_auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some((name, value)) = &self.cached_auth {
            req.header(name, value)
        } else {
            req
        }
    }

    async fn call_chat_completions(&self, request: &ChatRequest<'_>) -> anyhow::Result<String> {
        if self.key_required && self.api_key.is_none() {
            return Err(LlmError::MissingApiKey {
                provider: self.name.clone(),
            }
            .into());
        }

        let response = self
            .apply_auth_header(self.client.post(&self.chat_url).json(request))
            .send()
            .await
            .with_context(|| format!("{} chat completions request failed", self.name))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
            return Err(LlmError::Request {
                provider: self.name.clone(),
                message: format!("{status}: {}", sanitize_api_error(&body)),
            }
            .into());
        }

        let chat: ChatResponse = response
            .json()
            .await
            .with_context(|| format!("{} chat completions JSON decode failed", self.name))?;

        extract_chat_text(chat, &self.name)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn extract_chat_text(response: ChatResponse, provider_name: &str) -> anyhow::Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| anyhow::anyhow!("No response from {provider_name}"))
}

impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let mut messages = Vec::with_capacity(2);
            if let Some(sys) = system_prompt {
                messages.push(Message {
                    role: "system",
                    content: sys,
                });
            }
            messages.push(Message {
                role: "user",
                content: message,
            });

            let request = ChatRequest {
                model,
                messages,
                temperature,
            };
            self.call_chat_completions(&request).await
        })
    }
}
