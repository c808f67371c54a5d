use std::time::Duration;

use anyhow::{Context, Result};

use crate::providers::factory::ProviderSettings;

/// Application configuration loaded from environment variables.
///
/// Provider credentials stay optional at load time: a missing key only
/// becomes an error when the matching provider is first requested.
#[derive(Debug, Clone)]
pub struct Config {
    /// Logical provider selector ("deepseek", "gemini", "local-api").
    pub ai_provider: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub local_ai_api_url: Option<String>,
    /// Per-call network timeout for provider requests.
    pub ai_request_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ai_provider: optional_env("AI_PROVIDER"),
            deepseek_api_key: optional_env("DEEPSEEK_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            local_ai_api_url: optional_env("LOCAL_AI_API_URL"),
            ai_request_timeout_secs: std::env::var("AI_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("AI_REQUEST_TIMEOUT_SECS must be a number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The slice of config the provider factory consumes.
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            provider: self.ai_provider.clone(),
            deepseek_api_key: self.deepseek_api_key.clone(),
            gemini_api_key: self.gemini_api_key.clone(),
            local_api_url: self.local_ai_api_url.clone(),
            request_timeout: Duration::from_secs(self.ai_request_timeout_secs),
        }
    }
}

/// Empty values count as unset — `FOO=` in a .env file is not a credential.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
