//! OpenAI chat-completions client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::traits::{
    CompletionRequest, CompletionResponse, LLMProvider, Message, ProviderError, ProviderResult,
    Role,
};
use crate::config::OpenAIConfig;

const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_MS: u64 = 120_000;

/// OpenAI API client
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    http_client: Client,
    default_model: String,
    timeout_ms: u64,
}

impl OpenAIClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client: build_http_client(DEFAULT_TIMEOUT_MS),
            default_model: DEFAULT_MODEL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Create from endpoint settings and an already resolved key
    pub fn from_config(api_key: String, config: &OpenAIConfig) -> Self {
        Self::new(api_key)
            .with_base_url(&config.base_url)
            .with_timeout_ms(config.timeout_ms)
    }

    /// Set custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set default model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self.http_client = build_http_client(timeout_ms);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_body(&self, request: &CompletionRequest) -> OpenAIRequest {
        let mut messages: Vec<OpenAIMessage> = Vec::new();

        if let Some(system) = &request.system_prompt {
            messages.push(OpenAIMessage {
                role: Role::System.as_str().to_string(),
                content: Some(system.clone()),
            });
        }

        for msg in &request.messages {
            messages.push(msg.into());
        }

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        // Reasoning models and GPT-5.x take max_completion_tokens and some
        // reject temperature.
        let is_reasoning =
            model.starts_with("o1") || model.starts_with("o3") || model.starts_with("o4");
        let uses_completion_tokens = is_reasoning || model.starts_with("gpt-5");

        OpenAIRequest {
            max_tokens: (!uses_completion_tokens).then_some(request.max_tokens),
            max_completion_tokens: uses_completion_tokens.then_some(request.max_tokens),
            temperature: if is_reasoning { None } else { request.temperature },
            model,
            messages,
        }
    }
}

fn build_http_client(timeout_ms: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        })
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    /// For standard models
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// For reasoning models and GPT-5.x
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
}

impl From<&Message> for OpenAIMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.as_str().to_string(),
            content: Some(msg.content.clone()),
        }
    }
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: OpenAIUsage,
}

#[derive(Deserialize)]
struct Choice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Default, Deserialize)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAIError {
    error: OpenAIErrorDetail,
}

#[derive(Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

/// Decode a successful chat-completions body
fn parse_completion(body: &str, latency_ms: u64) -> ProviderResult<CompletionResponse> {
    let api_response: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Parse(format!("Malformed completion response: {}", e)))?;

    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("No choices in response".to_string()))?;

    let content = choice
        .message
        .content
        .ok_or_else(|| ProviderError::Parse("Choice has no message content".to_string()))?;

    Ok(CompletionResponse {
        content,
        model: api_response.model,
        input_tokens: api_response.usage.prompt_tokens,
        output_tokens: api_response.usage.completion_tokens,
        finish_reason: choice.finish_reason.unwrap_or_else(|| "unknown".to_string()),
        latency_ms,
    })
}

/// Map a non-success status and body to a provider error
fn api_error(status: StatusCode, body: &str) -> ProviderError {
    let message = match serde_json::from_str::<OpenAIError>(body) {
        Ok(error) => error.error.message,
        Err(_) => format!("HTTP {}: {}", status.as_u16(), body),
    };

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return ProviderError::Auth {
            status: status.as_u16(),
            message,
        };
    }

    ProviderError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl LLMProvider for OpenAIClient {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<CompletionResponse> {
        let start = Instant::now();
        let body = self.build_body(request);

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    ProviderError::Http(e)
                }
            })?;

        let status = response.status();
        let text = response.text().await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        let completion = parse_completion(&text, latency_ms)?;
        tracing::debug!(
            "{} answered in {}ms ({} in / {} out tokens, finish={})",
            completion.model,
            completion.latency_ms,
            completion.input_tokens,
            completion.output_tokens,
            completion.finish_reason
        );
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAIClient {
        OpenAIClient::new("sk-test".to_string())
    }

    #[test]
    fn test_body_for_standard_model() {
        let request = CompletionRequest::new(vec![Message::user("What is 2+2?")], 80)
            .with_model("gpt-4.1-mini")
            .with_temperature(0.0)
            .with_system("Be brief.");

        let body = serde_json::to_value(client().build_body(&request)).unwrap();
        assert_eq!(body["model"], "gpt-4.1-mini");
        assert_eq!(body["max_tokens"], 80);
        assert_eq!(body["temperature"], 0.0);
        assert!(body.get("max_completion_tokens").is_none());
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Be brief.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "What is 2+2?");
    }

    #[test]
    fn test_body_for_reasoning_model() {
        let request = CompletionRequest::new(vec![Message::user("Q")], 80)
            .with_model("o3-mini")
            .with_temperature(0.0);

        let body = serde_json::to_value(client().build_body(&request)).unwrap();
        assert_eq!(body["max_completion_tokens"], 80);
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_body_uses_default_model() {
        let request = CompletionRequest::new(vec![Message::user("Q")], 10);
        let body =
            serde_json::to_value(client().with_model("gpt-4o").build_body(&request)).unwrap();
        assert_eq!(body["model"], "gpt-4o");
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "model": "gpt-4.1-mini-2025-04-14",
            "choices": [{
                "message": {"role": "assistant", "content": "  Paris.\n"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 31, "completion_tokens": 3}
        }"#;
        let response = parse_completion(body, 12).unwrap();
        assert_eq!(response.content, "  Paris.\n");
        assert_eq!(response.input_tokens, 31);
        assert_eq!(response.output_tokens, 3);
        assert_eq!(response.finish_reason, "stop");
        assert_eq!(response.latency_ms, 12);
    }

    #[test]
    fn test_parse_completion_failures() {
        assert!(matches!(
            parse_completion(r#"{"choices": []}"#, 0),
            Err(ProviderError::Parse(_))
        ));
        assert!(matches!(
            parse_completion(
                r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
                0
            ),
            Err(ProviderError::Parse(_))
        ));
        assert!(matches!(parse_completion("not json", 0), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_api_error_mapping() {
        let body = r#"{"error": {
            "message": "Incorrect API key provided",
            "type": "invalid_request_error"
        }}"#;
        match api_error(StatusCode::UNAUTHORIZED, body) {
            ProviderError::Auth { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected auth error, got {other:?}"),
        }

        match api_error(StatusCode::INTERNAL_SERVER_ERROR, "upstream down") {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "HTTP 500: upstream down");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_config_trims_base_url() {
        let config = OpenAIConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..OpenAIConfig::default()
        };
        let client = OpenAIClient::from_config("sk-test".to_string(), &config);
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
        assert_eq!(client.default_model(), DEFAULT_MODEL);
    }
}
