//! Question and gold-answer datasets

pub mod align;
pub mod loader;

pub use align::{align, AlignedSet, ReferenceLookup};
pub use loader::{load_gold, load_gold_from_reader, load_questions, load_questions_from_reader};

use serde::{Deserialize, Serialize};

/// One row of the question list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
}

/// One row of the gold question/answer list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldRecord {
    pub question: String,
    pub answer: String,
}

impl QuestionRecord {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

impl GoldRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Split gold rows into parallel question and answer columns
pub fn gold_columns(records: &[GoldRecord]) -> (Vec<String>, Vec<String>) {
    records
        .iter()
        .map(|r| (r.question.clone(), r.answer.clone()))
        .unzip()
}
