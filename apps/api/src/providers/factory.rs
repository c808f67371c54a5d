//! Provider factory — the single source of truth for which provider is
//! active, with lazy, cached construction.
//!
//! The cache holds at most one live instance, keyed by the type that built
//! it. Requesting the same type returns the identical instance; requesting a
//! different type discards the old one (stateless HTTP clients need no
//! teardown) and constructs a fresh client.

use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::info;

use crate::providers::deepseek::DeepSeekProvider;
use crate::providers::gemini::GeminiProvider;
use crate::providers::local::{LocalApiProvider, DEFAULT_BASE_URL};
use crate::providers::{AiProvider, ProviderError};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderType {
    #[default]
    DeepSeek,
    Gemini,
    LocalApi,
}

impl ProviderType {
    /// Parses the configuration selector. Unset or unrecognized values fall
    /// back to the default provider.
    pub fn from_selector(value: Option<&str>) -> Self {
        match value {
            Some("deepseek") => ProviderType::DeepSeek,
            Some("gemini") => ProviderType::Gemini,
            Some("local-api") => ProviderType::LocalApi,
            _ => ProviderType::default(),
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderType::DeepSeek => "deepseek",
            ProviderType::Gemini => "gemini",
            ProviderType::LocalApi => "local-api",
        };
        f.write_str(name)
    }
}

/// The slice of application config the factory needs.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Raw `AI_PROVIDER` selector; parsed through [`ProviderType::from_selector`].
    pub provider: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub local_api_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider: None,
            deepseek_api_key: None,
            gemini_api_key: None,
            local_api_url: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Per-call credential/endpoint overrides, taking precedence over settings.
#[derive(Debug, Clone, Default)]
pub struct ProviderOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

type CacheSlot = Option<(ProviderType, Arc<dyn AiProvider>)>;

pub struct ProviderFactory {
    settings: ProviderSettings,
    cache: RwLock<CacheSlot>,
}

impl ProviderFactory {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            cache: RwLock::new(None),
        }
    }

    /// The only place default-provider policy lives — every call site goes
    /// through this instead of hardcoding a type.
    pub fn default_type(&self) -> ProviderType {
        ProviderType::from_selector(self.settings.provider.as_deref())
    }

    /// Resolves the provider for the configured default type.
    pub fn current(&self) -> Result<Arc<dyn AiProvider>, ProviderError> {
        self.get(self.default_type(), None)
    }

    /// Returns the cached instance unchanged when `ty` matches the cached
    /// type; otherwise constructs a new client and replaces the slot.
    ///
    /// Under a concurrent first call two instances may be built transiently;
    /// construction has no side effects, so last write wins and the slot
    /// stays consistent.
    pub fn get(
        &self,
        ty: ProviderType,
        overrides: Option<&ProviderOverrides>,
    ) -> Result<Arc<dyn AiProvider>, ProviderError> {
        if let Some((cached_ty, provider)) = self
            .cache
            .read()
            .expect("provider cache lock poisoned")
            .as_ref()
        {
            if *cached_ty == ty {
                return Ok(Arc::clone(provider));
            }
        }

        let provider = self.build(ty, overrides)?;
        let mut slot = self.cache.write().expect("provider cache lock poisoned");
        *slot = Some((ty, Arc::clone(&provider)));
        info!("AI provider initialized: {ty}");
        Ok(provider)
    }

    fn build(
        &self,
        ty: ProviderType,
        overrides: Option<&ProviderOverrides>,
    ) -> Result<Arc<dyn AiProvider>, ProviderError> {
        let timeout = self.settings.request_timeout;
        let api_key = overrides.and_then(|o| o.api_key.clone());
        let base_url = overrides.and_then(|o| o.base_url.clone());

        let provider: Arc<dyn AiProvider> = match ty {
            ProviderType::DeepSeek => {
                let key = api_key
                    .or_else(|| self.settings.deepseek_api_key.clone())
                    .ok_or_else(|| {
                        ProviderError::Configuration("DEEPSEEK_API_KEY is not set".to_string())
                    })?;
                Arc::new(DeepSeekProvider::new(key, timeout))
            }
            ProviderType::Gemini => {
                let key = api_key
                    .or_else(|| self.settings.gemini_api_key.clone())
                    .ok_or_else(|| {
                        ProviderError::Configuration("GEMINI_API_KEY is not set".to_string())
                    })?;
                Arc::new(GeminiProvider::new(key, timeout))
            }
            ProviderType::LocalApi => {
                let url = base_url
                    .or_else(|| self.settings.local_api_url.clone())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
                Arc::new(LocalApiProvider::new(url, timeout))
            }
        };

        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_keys() -> ProviderSettings {
        ProviderSettings {
            deepseek_api_key: Some("ds-test-key".to_string()),
            gemini_api_key: Some("gm-test-key".to_string()),
            ..ProviderSettings::default()
        }
    }

    #[test]
    fn test_same_type_returns_identical_cached_instance() {
        let factory = ProviderFactory::new(settings_with_keys());

        let first = factory.get(ProviderType::DeepSeek, None).unwrap();
        let second = factory.get(ProviderType::DeepSeek, None).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_switching_type_replaces_the_cached_instance() {
        let factory = ProviderFactory::new(settings_with_keys());

        let deepseek = factory.get(ProviderType::DeepSeek, None).unwrap();
        let local = factory.get(ProviderType::LocalApi, None).unwrap();
        assert!(!Arc::ptr_eq(&deepseek, &local));
        assert_eq!(local.name(), "local-api");

        // Going back constructs a fresh instance — the slot only remembers one.
        let deepseek_again = factory.get(ProviderType::DeepSeek, None).unwrap();
        assert!(!Arc::ptr_eq(&deepseek, &deepseek_again));
    }

    #[test]
    fn test_missing_credential_is_a_configuration_error() {
        let factory = ProviderFactory::new(ProviderSettings::default());

        let result = factory.get(ProviderType::DeepSeek, None);
        match result {
            Err(ProviderError::Configuration(message)) => {
                assert!(message.contains("DEEPSEEK_API_KEY"));
            }
            other => panic!("expected Configuration error, got {other:?}"),
        }

        let result = factory.get(ProviderType::Gemini, None);
        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }

    #[test]
    fn test_override_key_satisfies_credential_requirement() {
        let factory = ProviderFactory::new(ProviderSettings::default());
        let overrides = ProviderOverrides {
            api_key: Some("override-key".to_string()),
            base_url: None,
        };

        let provider = factory.get(ProviderType::DeepSeek, Some(&overrides)).unwrap();
        assert_eq!(provider.name(), "deepseek");
    }

    #[test]
    fn test_local_provider_needs_no_credential_and_defaults_base_url() {
        let factory = ProviderFactory::new(ProviderSettings::default());
        let provider = factory.get(ProviderType::LocalApi, None).unwrap();
        assert_eq!(provider.name(), "local-api");
    }

    #[test]
    fn test_selector_parsing_with_documented_default() {
        assert_eq!(
            ProviderType::from_selector(Some("gemini")),
            ProviderType::Gemini
        );
        assert_eq!(
            ProviderType::from_selector(Some("local-api")),
            ProviderType::LocalApi
        );
        assert_eq!(ProviderType::from_selector(None), ProviderType::DeepSeek);
        assert_eq!(
            ProviderType::from_selector(Some("not-a-provider")),
            ProviderType::DeepSeek
        );
    }
}
