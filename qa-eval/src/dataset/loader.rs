//! CSV loading for the question list and the gold answers

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{GoldRecord, QuestionRecord};
use crate::error::{EvalError, EvalResult};

const QUESTION_COLUMN: &str = "question";
const ANSWER_COLUMN: &str = "answer";

/// Load the question list; requires a `question` column
pub fn load_questions(path: impl AsRef<Path>) -> EvalResult<Vec<QuestionRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = load_questions_from_reader(file, &source_name(path))?;
    tracing::info!("Loaded {} questions from {}", records.len(), path.display());
    Ok(records)
}

/// Load the gold answers; requires `question` and `answer` columns
pub fn load_gold(path: impl AsRef<Path>) -> EvalResult<Vec<GoldRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = load_gold_from_reader(file, &source_name(path))?;
    tracing::info!("Loaded {} gold answers from {}", records.len(), path.display());
    Ok(records)
}

pub fn load_questions_from_reader<R: Read>(
    reader: R,
    source_name: &str,
) -> EvalResult<Vec<QuestionRecord>> {
    let mut rdr = csv_reader(reader);
    let columns = locate_columns(&mut rdr, source_name, &[QUESTION_COLUMN])?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(QuestionRecord {
            question: cell(&row, columns[0]),
        });
    }
    Ok(records)
}

pub fn load_gold_from_reader<R: Read>(reader: R, source_name: &str) -> EvalResult<Vec<GoldRecord>> {
    let mut rdr = csv_reader(reader);
    let columns = locate_columns(&mut rdr, source_name, &[QUESTION_COLUMN, ANSWER_COLUMN])?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(GoldRecord {
            question: cell(&row, columns[0]),
            answer: cell(&row, columns[1]),
        });
    }
    Ok(records)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

/// Resolve the header index of each required column, reporting all missing ones
fn locate_columns<R: Read>(
    rdr: &mut csv::Reader<R>,
    source_name: &str,
    required: &[&str],
) -> EvalResult<Vec<usize>> {
    let headers = rdr.headers()?.clone();
    let mut indices = Vec::with_capacity(required.len());
    let mut missing = Vec::new();

    for name in required {
        match headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == *name)
        {
            Some(idx) => indices.push(idx),
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(EvalError::Schema {
            source_name: source_name.to_string(),
            missing,
        });
    }
    Ok(indices)
}

// Short rows read as empty text.
fn cell(row: &csv::StringRecord, idx: usize) -> String {
    row.get(idx).unwrap_or("").to_string()
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
