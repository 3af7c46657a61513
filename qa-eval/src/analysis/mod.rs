//! Answer scoring: BLEU, ROUGE and aggregation

pub mod bleu;
pub mod rouge;
pub mod scoring;
pub mod stemmer;
pub mod tokenize;

pub use bleu::{corpus_bleu, sentence_bleu, BleuStats};
pub use rouge::{RougeScore, RougeScorer};
pub use scoring::{mean, score_pairs, MetricsRecord, MetricsSummary, Scorer};
