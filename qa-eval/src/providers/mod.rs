//! LLM provider implementations

pub mod credentials;
pub mod openai;
pub mod traits;

pub use credentials::resolve_api_key;
pub use openai::OpenAIClient;
pub use traits::{
    CompletionRequest, CompletionResponse, LLMProvider, Message, ProviderError, ProviderResult,
    Role,
};

use crate::config::Config;
use crate::error::{EvalError, EvalResult};
use std::sync::Arc;

/// Create the configured answer provider, resolving its credential first
pub fn create_provider_with_config(
    config: &Config,
) -> EvalResult<Arc<dyn LLMProvider + Send + Sync>> {
    match config.generation.provider.to_lowercase().as_str() {
        "openai" | "gpt" => {
            let api_key = resolve_api_key(&config.openai.api_key_env)?;
            let client = OpenAIClient::from_config(api_key, &config.openai)
                .with_model(&config.generation.model);
            Ok(Arc::new(client))
        }
        other => Err(EvalError::Config(crate::config::ConfigError::Parse(format!(
            "Unknown provider: {}",
            other
        )))),
    }
}
