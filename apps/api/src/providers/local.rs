//! Local inference provider — self-hosted Q&A generation service.
//!
//! The local service speaks its own shape: `POST /generate` with
//! `{prompt, num_questions}` returning `{qa_pairs}`, and `GET /health`
//! for liveness. No credential required.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::providers::{
    AiProvider, CompletionOptions, CompletionResult, Message, ProviderError, Role,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_NUM_QUESTIONS: u32 = 5;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    num_questions: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    qa_pairs: serde_json::Value,
}

#[derive(Debug)]
pub struct LocalApiProvider {
    client: Client,
    base_url: String,
}

impl LocalApiProvider {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
        }
    }
}

/// The local service takes a bare prompt, so only user-role content is sent.
fn user_prompt(messages: &[Message]) -> String {
    messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl AiProvider for LocalApiProvider {
    fn name(&self) -> &'static str {
        "local-api"
    }

    async fn generate_completion(
        &self,
        messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<CompletionResult, ProviderError> {
        let prompt = user_prompt(messages);
        let request_body = GenerateRequest {
            prompt: &prompt,
            num_questions: DEFAULT_NUM_QUESTIONS,
        };

        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: "local-api",
                status: status.as_u16(),
                message: body,
            });
        }

        let generated: GenerateResponse = response.json().await?;
        let content = serde_json::to_string(&generated.qa_pairs)?;

        Ok(CompletionResult {
            content,
            usage: None,
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_keeps_only_user_messages() {
        let messages = vec![
            Message::system("ignored by the local service"),
            Message::user("Generate questions about Rust"),
            Message::assistant("also ignored"),
            Message::user("ownership and borrowing"),
        ];
        assert_eq!(
            user_prompt(&messages),
            "Generate questions about Rust\nownership and borrowing"
        );
    }

    #[test]
    fn test_generate_response_content_is_reserialized_qa_pairs() {
        let body = r#"{"success": true, "qa_pairs": [{"question": "What is Rust?", "answer": "A systems language."}], "count": 1}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        let content = serde_json::to_string(&parsed.qa_pairs).unwrap();
        assert!(content.starts_with('['));
        assert!(content.contains("What is Rust?"));
    }
}
