use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::provider::ProviderKey;
use crate::error::{AppError, AppResult};

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn key(&self) -> ProviderKey;

    fn default_model(&self) -> &str;

    /// The model a call with `model_override` will run against.
    fn resolve_model(&self, model_override: Option<&str>) -> String {
        model_override
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(self.default_model())
            .to_string()
    }

    /// Fails with `ProviderUnavailable` when a call is bound to fail
    /// for lack of local configuration, without touching the network.
    fn ensure_available(&self) -> AppResult<()> {
        Ok(())
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_content: &str,
        model_override: Option<&str>,
    ) -> AppResult<String>;
}

/// Generation providers keyed by the provider they implement.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKey, Arc<dyn GenerationProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn GenerationProvider>) {
        self.providers.insert(provider.key(), provider);
    }

    pub fn with(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn get(&self, key: ProviderKey) -> Option<Arc<dyn GenerationProvider>> {
        self.providers.get(&key).cloned()
    }

    /// Parses `key` and returns the matching provider without touching the network.
    pub fn resolve(&self, key: &str) -> AppResult<Arc<dyn GenerationProvider>> {
        let provider_key = key.parse::<ProviderKey>()?;
        self.get(provider_key)
            .ok_or_else(|| AppError::ProviderUnavailable {
                provider: provider_key,
                reason: "no implementation registered".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticProvider(ProviderKey);

    #[async_trait]
    impl GenerationProvider for StaticProvider {
        fn key(&self) -> ProviderKey {
            self.0
        }

        fn default_model(&self) -> &str {
            "static-model"
        }

        async fn generate(&self, _: &str, _: &str, _: Option<&str>) -> AppResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn resolves_registered_provider() {
        let registry = ProviderRegistry::new()
            .with(Arc::new(StaticProvider(ProviderKey::Hosted)))
            .with(Arc::new(StaticProvider(ProviderKey::Local)));

        let provider = registry.resolve("ollama").unwrap();
        assert_eq!(provider.key(), ProviderKey::Local);
    }

    #[test]
    fn unknown_key_is_invalid_provider() {
        let registry = ProviderRegistry::new().with(Arc::new(StaticProvider(ProviderKey::Local)));
        let err = registry.resolve("carrier-pigeon").err().unwrap();
        assert!(matches!(err, AppError::InvalidProvider(_)));
    }

    #[test]
    fn unregistered_key_is_unavailable() {
        let registry = ProviderRegistry::new().with(Arc::new(StaticProvider(ProviderKey::Local)));
        let err = registry.resolve("hosted").err().unwrap();
        assert!(matches!(
            err,
            AppError::ProviderUnavailable {
                provider: ProviderKey::Hosted,
                ..
            }
        ));
    }

    #[test]
    fn resolve_model_prefers_non_blank_override() {
        let provider = StaticProvider(ProviderKey::Local);
        assert_eq!(provider.resolve_model(None), "static-model");
        assert_eq!(provider.resolve_model(Some("  ")), "static-model");
        assert_eq!(provider.resolve_model(Some("mistral")), "mistral");
    }
}
