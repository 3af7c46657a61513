//! Question-answering evaluation against gold answers
//!
//! Aligns a question list with a gold question/answer table, asks an
//! OpenAI-compatible chat model each aligned question, and scores the answers
//! against the gold references with sentence BLEU and ROUGE-1/2/Lsum.
//!
//! # Example
//!
//! ```no_run
//! use qa_eval::{
//!     config::Config,
//!     pipeline::{Pipeline, RunOptions},
//!     providers::create_provider_with_config,
//!     reporting::print_console_report,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), qa_eval::EvalError> {
//!     let config = Config::load_or_default();
//!     let provider = create_provider_with_config(&config)?;
//!
//!     let options = RunOptions::from_config(&config, "questions.csv", "gold.csv");
//!     let output = Pipeline::run(&options, provider).await?;
//!
//!     print_console_report(&output.summary);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod reporting;
pub mod runner;

pub use config::Config;
pub use error::{EvalError, EvalResult};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{score_pairs, MetricsRecord, MetricsSummary, Scorer};
    pub use crate::config::Config;
    pub use crate::dataset::{align, load_gold, load_questions, AlignedSet};
    pub use crate::error::{EvalError, EvalResult};
    pub use crate::pipeline::{Pipeline, RunOptions, RunOutput};
    pub use crate::providers::{
        create_provider_with_config, CompletionRequest, CompletionResponse, LLMProvider, Message,
        ProviderError, ProviderResult,
    };
    pub use crate::reporting::{build_report, print_console_report, AnswerRecord, ReportItem};
    pub use crate::runner::{AnswerCollector, GenerationSettings};
}
