//! AI provider abstraction — the single point of entry for all LLM calls.
//!
//! ARCHITECTURAL RULE: no other module may call a vendor API directly.
//! All LLM interactions go through an [`AiProvider`] resolved from the
//! [`factory::ProviderFactory`].

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod deepseek;
pub mod extract;
pub mod factory;
pub mod gemini;
pub mod local;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Required credential or config value missing at construction time.
    /// Never retried — no amount of retry fixes missing configuration.
    #[error("provider not configured: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error (status {status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("provider returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Lowercase form used when flattening a conversation into plain text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of a conversation. Order is meaningful: system first, then user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-call generation overrides. Unset fields use the provider's defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Result of one completion call. Immutable once returned.
#[derive(Debug, Clone)]
pub struct CompletionResult {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

/// Uniform capability set every backend must expose. The factory and the
/// orchestration layer are provider-agnostic: adding a vendor means adding
/// an implementation, not editing call sites.
#[async_trait]
pub trait AiProvider: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Turns an ordered message sequence into a text completion via one
    /// outbound network call. A non-success vendor status fails with
    /// [`ProviderError::Api`] — never a silently empty result.
    async fn generate_completion(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResult, ProviderError>;

    /// Builds a two-message conversation (system, then user), runs the
    /// completion, and hands the raw text to the shared extraction layer.
    /// Does not retry on parse failure.
    async fn generate_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &CompletionOptions,
    ) -> Result<Value, ProviderError> {
        let messages = [Message::system(system_prompt), Message::user(user_prompt)];
        let response = self.generate_completion(&messages, options).await?;
        extract::parse_json_response(&response.content)
    }

    /// Liveness probe only — never used for correctness decisions.
    /// All errors collapse to `false`.
    async fn health_check(&self) -> bool {
        self.generate_completion(&[Message::user("Hi")], &CompletionOptions::default())
            .await
            .is_ok()
    }
}

/// Calls `generate_json` and deserializes the value into the expected shape.
/// A shape mismatch is a [`ProviderError::JsonParse`], same as invalid text.
pub async fn generate_typed<T: DeserializeOwned>(
    provider: &dyn AiProvider,
    system_prompt: &str,
    user_prompt: &str,
    options: &CompletionOptions,
) -> Result<T, ProviderError> {
    let value = provider
        .generate_json(system_prompt, user_prompt, options)
        .await?;
    serde_json::from_value(value).map_err(ProviderError::JsonParse)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// In-process provider double: replays a canned completion or fails
    /// every call. No network.
    #[derive(Debug)]
    pub(crate) struct MockProvider {
        reply: Option<String>,
    }

    impl MockProvider {
        pub(crate) fn replying(content: &str) -> Self {
            Self {
                reply: Some(content.to_string()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self { reply: None }
        }
    }

    #[async_trait]
    impl AiProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn generate_completion(
            &self,
            _messages: &[Message],
            _options: &CompletionOptions,
        ) -> Result<CompletionResult, ProviderError> {
            match &self.reply {
                Some(content) => Ok(CompletionResult {
                    content: content.clone(),
                    usage: None,
                }),
                None => Err(ProviderError::Api {
                    provider: "mock",
                    status: 500,
                    message: "simulated outage".to_string(),
                }),
            }
        }
    }
}
