//! Error taxonomy for an evaluation run
//!
//! Every variant is terminal: the pipeline never retries and never writes
//! partial output once one of these has been raised.

use crate::config::ConfigError;
use crate::providers::ProviderError;

/// Errors raised while loading, aligning, collecting, scoring or writing
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("{source_name} must have column(s): {}", .missing.join(", "))]
    Schema {
        source_name: String,
        missing: Vec<String>,
    },

    #[error("No overlapping questions between the question list and the gold answers")]
    NoOverlap,

    #[error("Missing credential: {0}")]
    Credential(String),

    #[error("Answer service failed on question {index}: {source}")]
    Collaborator {
        index: usize,
        #[source]
        source: ProviderError,
    },

    #[error(
        "Need equal, non-zero counts of references and predictions (got {references} references, {predictions} predictions)"
    )]
    Shape {
        references: usize,
        predictions: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type EvalResult<T> = Result<T, EvalError>;

impl EvalError {
    /// Check reference/prediction counts before any per-item work
    pub fn check_shape(references: usize, predictions: usize) -> EvalResult<()> {
        if references != predictions || references == 0 {
            return Err(EvalError::Shape {
                references,
                predictions,
            });
        }
        Ok(())
    }
}
