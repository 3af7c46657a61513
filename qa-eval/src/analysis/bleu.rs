//! BLEU on the 0-100 scale
//!
//! Follows sacreBLEU defaults: `13a` tokenization, n-grams up to order 4,
//! case-sensitive matching. Sentence scores use exponential smoothing with
//! effective order; corpus scores pool the statistics of every segment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::tokenize::tokenize_13a;

pub const MAX_NGRAM_ORDER: usize = 4;

/// Stand-in for log(0) when a precision is zero
const LOG_ZERO: f64 = -9_999_999_999.0;

/// Sufficient statistics for BLEU
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BleuStats {
    /// Clipped n-gram matches per order
    pub correct: [usize; MAX_NGRAM_ORDER],
    /// Hypothesis n-grams per order
    pub total: [usize; MAX_NGRAM_ORDER],
    pub sys_len: usize,
    pub ref_len: usize,
}

impl BleuStats {
    /// Statistics for one hypothesis against one reference
    pub fn from_segment(hypothesis: &str, reference: &str) -> Self {
        let hyp = tokenize_13a(hypothesis.trim_end());
        let reference = tokenize_13a(reference.trim_end());

        let hyp_ngrams = count_ngrams(&hyp);
        let ref_ngrams = count_ngrams(&reference);

        let mut stats = BleuStats {
            sys_len: hyp.len(),
            ref_len: reference.len(),
            ..Default::default()
        };

        for (ngram, &count) in &hyp_ngrams {
            let n = ngram.len() - 1;
            stats.total[n] += count;
            if let Some(&ref_count) = ref_ngrams.get(ngram) {
                stats.correct[n] += count.min(ref_count);
            }
        }

        stats
    }

    /// Pool another segment's statistics into this one
    pub fn accumulate(&mut self, other: &BleuStats) {
        for n in 0..MAX_NGRAM_ORDER {
            self.correct[n] += other.correct[n];
            self.total[n] += other.total[n];
        }
        self.sys_len += other.sys_len;
        self.ref_len += other.ref_len;
    }

    /// Brevity penalty
    pub fn brevity_penalty(&self) -> f64 {
        if self.sys_len >= self.ref_len {
            1.0
        } else if self.sys_len > 0 {
            (1.0 - self.ref_len as f64 / self.sys_len as f64).exp()
        } else {
            0.0
        }
    }

    /// Score with exponential smoothing of zero-match orders
    pub fn score(&self, effective_order: bool) -> f64 {
        // No unigram matches means nothing else can match either.
        if self.correct[0] == 0 {
            return 0.0;
        }

        let mut precisions = [0.0f64; MAX_NGRAM_ORDER];
        let mut smooth = 1.0;
        let mut order = MAX_NGRAM_ORDER;

        for n in 0..MAX_NGRAM_ORDER {
            if self.total[n] == 0 {
                break;
            }
            if effective_order {
                order = n + 1;
            }
            precisions[n] = if self.correct[n] == 0 {
                smooth *= 2.0;
                100.0 / (smooth * self.total[n] as f64)
            } else {
                100.0 * self.correct[n] as f64 / self.total[n] as f64
            };
        }

        let log_sum: f64 = precisions[..order]
            .iter()
            .map(|&p| if p == 0.0 { LOG_ZERO } else { p.ln() })
            .sum();

        self.brevity_penalty() * (log_sum / order as f64).exp()
    }
}

fn count_ngrams(tokens: &[String]) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    for n in 1..=MAX_NGRAM_ORDER {
        for window in tokens.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
    }
    counts
}

/// Sentence-level BLEU of `hypothesis` against a single `reference`
pub fn sentence_bleu(hypothesis: &str, reference: &str) -> f64 {
    BleuStats::from_segment(hypothesis, reference).score(true)
}

/// Corpus-level BLEU over aligned hypothesis/reference pairs
pub fn corpus_bleu<H, R>(hypotheses: &[H], references: &[R]) -> f64
where
    H: AsRef<str>,
    R: AsRef<str>,
{
    let mut stats = BleuStats::default();
    for (hyp, reference) in hypotheses.iter().zip(references) {
        stats.accumulate(&BleuStats::from_segment(hyp.as_ref(), reference.as_ref()));
    }
    stats.score(false)
}
