//! Per-item metric computation and aggregation helpers

use serde::{Deserialize, Serialize};

use super::bleu::{corpus_bleu, sentence_bleu};
use super::rouge::RougeScorer;
use crate::error::{EvalError, EvalResult};

/// All metrics for one prediction/reference pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Sentence BLEU, 0-100
    pub bleu: f64,
    pub rouge1_f1: f64,
    pub rouge1_p: f64,
    pub rouge1_r: f64,
    pub rouge2_f1: f64,
    pub rouge2_p: f64,
    pub rouge2_r: f64,
    #[serde(rename = "rougeLsum_f1")]
    pub rouge_lsum_f1: f64,
    #[serde(rename = "rougeLsum_p")]
    pub rouge_lsum_p: f64,
    #[serde(rename = "rougeLsum_r")]
    pub rouge_lsum_r: f64,
}

/// Scores predictions against references with BLEU and stemmed ROUGE
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    rouge: RougeScorer,
}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics for a single pair
    pub fn score(&self, reference: &str, prediction: &str) -> MetricsRecord {
        let r1 = self.rouge.rouge_n(reference, prediction, 1);
        let r2 = self.rouge.rouge_n(reference, prediction, 2);
        let rl = self.rouge.rouge_lsum(reference, prediction);

        MetricsRecord {
            bleu: sentence_bleu(prediction, reference),
            rouge1_f1: r1.fmeasure,
            rouge1_p: r1.precision,
            rouge1_r: r1.recall,
            rouge2_f1: r2.fmeasure,
            rouge2_p: r2.precision,
            rouge2_r: r2.recall,
            rouge_lsum_f1: rl.fmeasure,
            rouge_lsum_p: rl.precision,
            rouge_lsum_r: rl.recall,
        }
    }

    /// Metrics for every pair, in input order. Counts are checked before
    /// anything is scored.
    pub fn score_pairs<R, P>(
        &self,
        references: &[R],
        predictions: &[P],
    ) -> EvalResult<Vec<MetricsRecord>>
    where
        R: AsRef<str>,
        P: AsRef<str>,
    {
        EvalError::check_shape(references.len(), predictions.len())?;

        Ok(references
            .iter()
            .zip(predictions)
            .map(|(r, p)| self.score(r.as_ref(), p.as_ref()))
            .collect())
    }
}

/// Score with a default [`Scorer`]
pub fn score_pairs<R, P>(references: &[R], predictions: &[P]) -> EvalResult<Vec<MetricsRecord>>
where
    R: AsRef<str>,
    P: AsRef<str>,
{
    Scorer::new().score_pairs(references, predictions)
}

/// Arithmetic mean; an empty slice averages to 0.0
pub fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len().max(1) as f64
}

/// Run-level averages, shown on the console only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub items: usize,
    pub mean: MetricsRecord,
    pub corpus_bleu: f64,
}

impl MetricsSummary {
    pub fn from_records<R, P>(
        records: &[MetricsRecord],
        references: &[R],
        predictions: &[P],
    ) -> Self
    where
        R: AsRef<str>,
        P: AsRef<str>,
    {
        let avg = |f: fn(&MetricsRecord) -> f64| mean(&records.iter().map(f).collect::<Vec<_>>());

        Self {
            items: records.len(),
            mean: MetricsRecord {
                bleu: avg(|m| m.bleu),
                rouge1_f1: avg(|m| m.rouge1_f1),
                rouge1_p: avg(|m| m.rouge1_p),
                rouge1_r: avg(|m| m.rouge1_r),
                rouge2_f1: avg(|m| m.rouge2_f1),
                rouge2_p: avg(|m| m.rouge2_p),
                rouge2_r: avg(|m| m.rouge2_r),
                rouge_lsum_f1: avg(|m| m.rouge_lsum_f1),
                rouge_lsum_p: avg(|m| m.rouge_lsum_p),
                rouge_lsum_r: avg(|m| m.rouge_lsum_r),
            },
            corpus_bleu: corpus_bleu(predictions, references),
        }
    }
}
