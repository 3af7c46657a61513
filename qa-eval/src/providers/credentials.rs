//! API credential resolution

use crate::error::{EvalError, EvalResult};

/// Read an API key from the environment, after loading `.env` if present.
///
/// An unset or blank variable is an error; nothing is sent without a key.
pub fn resolve_api_key(env_var: &str) -> EvalResult<String> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Could not read .env file: {}", e),
    }
    api_key_from(env_var, std::env::var(env_var).ok())
}

fn api_key_from(env_var: &str, value: Option<String>) -> EvalResult<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(EvalError::Credential(format!("{} not set", env_var))),
    }
}
