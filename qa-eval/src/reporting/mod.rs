//! Results reporting
//!
//! Two JSON artifacts per run, both arrays in alignment order: the raw answers
//! and the per-item metrics report.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::{MetricsRecord, MetricsSummary};
use crate::dataset::AlignedSet;
use crate::error::{EvalError, EvalResult};

/// One entry of the raw-answers artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub openai_answer: String,
}

impl AnswerRecord {
    pub fn pair(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            openai_answer: answer.into(),
        }
    }
}

/// One entry of the metrics report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub question: String,
    pub reference: String,
    pub prediction: String,
    #[serde(flatten)]
    pub metrics: MetricsRecord,
}

/// Pair each aligned question with its answer
pub fn build_answers(
    aligned: &AlignedSet,
    predictions: &[String],
) -> EvalResult<Vec<AnswerRecord>> {
    EvalError::check_shape(aligned.len(), predictions.len())?;
    Ok(aligned
        .questions()
        .iter()
        .zip(predictions)
        .map(|(q, a)| AnswerRecord::pair(q.as_str(), a.as_str()))
        .collect())
}

/// Merge questions, references, predictions and metrics item by item
pub fn build_report(
    aligned: &AlignedSet,
    predictions: &[String],
    metrics: &[MetricsRecord],
) -> EvalResult<Vec<ReportItem>> {
    EvalError::check_shape(aligned.len(), predictions.len())?;
    EvalError::check_shape(aligned.len(), metrics.len())?;

    Ok(aligned
        .iter()
        .zip(predictions)
        .zip(metrics)
        .map(|(((question, reference), prediction), metrics)| ReportItem {
            question: question.to_string(),
            reference: reference.to_string(),
            prediction: prediction.clone(),
            metrics: *metrics,
        })
        .collect())
}

/// Write pretty-printed UTF-8 JSON; non-ASCII text is kept as is
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> EvalResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Generate a console report
pub fn print_console_report(summary: &MetricsSummary) {
    let m = &summary.mean;

    println!("\n=== Evaluation Summary ===\n");
    println!("Items scored: {}\n", summary.items);

    println!("{:<12} {:>10} {:>10} {:>10}", "Metric", "F1", "Precision", "Recall");
    println!("{:-<45}", "");
    println!("{:<12} {:>10.4} {:>10.4} {:>10.4}", "ROUGE-1", m.rouge1_f1, m.rouge1_p, m.rouge1_r);
    println!("{:<12} {:>10.4} {:>10.4} {:>10.4}", "ROUGE-2", m.rouge2_f1, m.rouge2_p, m.rouge2_r);
    println!(
        "{:<12} {:>10.4} {:>10.4} {:>10.4}",
        "ROUGE-Lsum", m.rouge_lsum_f1, m.rouge_lsum_p, m.rouge_lsum_r
    );
    println!("{:-<45}", "");
    println!("Mean sentence BLEU: {:.2}", m.bleu);
    println!("Corpus BLEU:        {:.2}", summary.corpus_bleu);

    println!("\n{:=<45}", "");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::align;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn aligned() -> AlignedSet {
        align(
            &strings(&["Q1", "Q2", "Q3"]),
            &strings(&["Q3", "Q1"]),
            &strings(&["A3", "A1"]),
        )
        .unwrap()
    }

    #[test]
    fn test_build_answers() {
        let answers = build_answers(&aligned(), &strings(&["P1", "P3"])).unwrap();
        assert_eq!(
            answers,
            vec![AnswerRecord::pair("Q1", "P1"), AnswerRecord::pair("Q3", "P3")]
        );
    }

    #[test]
    fn test_build_report_order_and_shape() {
        let metrics = [
            MetricsRecord { bleu: 1.0, ..Default::default() },
            MetricsRecord { bleu: 3.0, ..Default::default() },
        ];
        let report = build_report(&aligned(), &strings(&["P1", "P3"]), &metrics).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].question, "Q1");
        assert_eq!(report[0].reference, "A1");
        assert_eq!(report[0].prediction, "P1");
        assert_eq!(report[1].metrics.bleu, 3.0);

        let err = build_report(&aligned(), &strings(&["P1"]), &metrics).unwrap_err();
        assert!(matches!(err, EvalError::Shape { .. }));
    }

    #[test]
    fn test_report_item_json_layout() {
        let item = ReportItem {
            question: "Q".to_string(),
            reference: "R".to_string(),
            prediction: "P".to_string(),
            metrics: MetricsRecord::default(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.starts_with(
            r#"{"question":"Q","reference":"R","prediction":"P","bleu":0.0,"rouge1_f1""#
        ));
        assert!(json.ends_with(r#""rougeLsum_f1":0.0,"rougeLsum_p":0.0,"rougeLsum_r":0.0}"#));
    }

    #[test]
    fn test_write_json_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openai_answers.json");
        let answers = vec![AnswerRecord::pair(
            "Qu'est-ce que « Le Monde » ?",
            "Un journal français.",
        )];

        write_json(&path, &answers).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("« Le Monde »"));
        assert!(written.contains("français"));
        assert!(written.contains("\n  {\n    \"question\""));

        let parsed: Vec<AnswerRecord> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, answers);
    }
}
