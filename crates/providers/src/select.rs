//! Provider selection: turns configuration into a single `Provider`.

use std::sync::Arc;
use std::time::Duration;

use ctxroute_config::{ApiStyle, AppConfig};
use ctxroute_core::provider::Provider;

use crate::openai_compat::OpenAiCompatProvider;
use crate::responses::ResponsesProvider;

/// Build the configured provider, resolving the API key from the
/// environment and config.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    build_with_key(config, config.resolve_api_key())
}

/// Build the configured provider with an explicit credential.
pub fn build_with_key(config: &AppConfig, api_key: Option<String>) -> Arc<dyn Provider> {
    let settings = &config.provider;
    let timeout = settings.timeout_secs.map(Duration::from_secs);

    tracing::debug!(
        api_style = %settings.api_style,
        base_url = %settings.base_url,
        has_key = api_key.is_some(),
        "Building provider"
    );

    let provider: Arc<dyn Provider> = match settings.api_style {
        ApiStyle::ChatCompletions => {
            let mut p = OpenAiCompatProvider::new(&settings.base_url, api_key);
            if let Some(timeout) = timeout {
                p = p.with_timeout(timeout);
            }
            Arc::new(p)
        }
        ApiStyle::Responses => {
            let mut p = ResponsesProvider::new(&settings.base_url, api_key);
            if let Some(timeout) = timeout {
                p = p.with_timeout(timeout);
            }
            Arc::new(p)
        }
    };
    provider
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_chat_completions() {
        let provider = build_with_key(&AppConfig::default(), None);
        assert_eq!(provider.name(), "chat_completions");
    }

    #[test]
    fn responses_style_builds_responses_provider() {
        let mut config = AppConfig::default();
        config.provider.api_style = ApiStyle::Responses;
        config.provider.timeout_secs = Some(30);
        let provider = build_with_key(&config, Some("sk-test".into()));
        assert_eq!(provider.name(), "responses");
    }
}
