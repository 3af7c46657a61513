//! Sequential answer collection

use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::error::{EvalError, EvalResult};
use crate::providers::{CompletionRequest, LLMProvider, Message};

/// Generation parameters attached to every question
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
}

impl From<&GenerationConfig> for GenerationSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system_prompt: config.system_prompt.clone(),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

/// Asks the provider each question in turn, one request in flight at a time
pub struct AnswerCollector {
    provider: Arc<dyn LLMProvider + Send + Sync>,
    settings: GenerationSettings,
    progress: Box<dyn ProgressCallback>,
}

impl AnswerCollector {
    pub fn new(provider: Arc<dyn LLMProvider + Send + Sync>, settings: GenerationSettings) -> Self {
        Self {
            provider,
            settings,
            progress: Box::new(NoOpProgress),
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    fn request_for(&self, question: &str) -> CompletionRequest {
        CompletionRequest::new(vec![Message::user(question)], self.settings.max_tokens)
            .with_model(&self.settings.model)
            .with_temperature(self.settings.temperature)
            .with_system(&self.settings.system_prompt)
    }

    /// Answer a single question, whitespace-trimmed
    pub async fn ask(&self, question: &str) -> crate::providers::ProviderResult<String> {
        let response = self.provider.complete(&self.request_for(question)).await?;
        if response.truncated() {
            tracing::warn!(
                "Answer cut off at {} tokens: {}",
                self.settings.max_tokens,
                question.chars().take(60).collect::<String>()
            );
        }
        Ok(response.content.trim().to_string())
    }

    /// Answer every question in order. The first failure aborts the whole
    /// batch and earlier answers are dropped.
    pub async fn collect(&self, questions: &[String]) -> EvalResult<Vec<String>> {
        let total = questions.len();
        let mut answers = Vec::with_capacity(total);

        tracing::info!(
            "Asking {} question(s) via {} ({})",
            total,
            self.provider.name(),
            self.settings.model
        );

        for (idx, question) in questions.iter().enumerate() {
            self.progress.on_question_start(idx + 1, total, question);

            let answer = match self.ask(question).await {
                Ok(answer) => answer,
                Err(source) => {
                    self.progress.on_question_complete(idx + 1, total, false);
                    tracing::error!("Question {}/{} failed: {}", idx + 1, total, source);
                    return Err(EvalError::Collaborator {
                        index: idx + 1,
                        source,
                    });
                }
            };

            self.progress.on_question_complete(idx + 1, total, true);
            answers.push(answer);
        }

        Ok(answers)
    }
}

/// Progress callback for tracking collection
pub trait ProgressCallback: Send + Sync {
    fn on_question_start(&self, index: usize, total: usize, question: &str);
    fn on_question_complete(&self, index: usize, total: usize, success: bool);
}

/// Default no-op progress callback
pub struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_question_start(&self, _index: usize, _total: usize, _question: &str) {}
    fn on_question_complete(&self, _index: usize, _total: usize, _success: bool) {}
}

/// Console progress callback
pub struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_question_start(&self, index: usize, total: usize, question: &str) {
        let preview: String = question.chars().take(60).collect();
        println!("  [{}/{}] {}", index, total, preview);
    }

    fn on_question_complete(&self, index: usize, total: usize, success: bool) {
        if !success {
            println!("  [{}/{}] FAILED", index, total);
        }
    }
}
