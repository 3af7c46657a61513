//! ROUGE-N and ROUGE-Lsum

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::tokenize::{split_sentences, tokenize_rouge};

/// Precision, recall and F1 of one ROUGE variant, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl RougeScore {
    pub fn new(precision: f64, recall: f64) -> Self {
        Self {
            precision,
            recall,
            fmeasure: fmeasure(precision, recall),
        }
    }
}

/// Harmonic mean of precision and recall
pub fn fmeasure(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// ROUGE scorer for a fixed tokenizer configuration
#[derive(Debug, Clone)]
pub struct RougeScorer {
    use_stemmer: bool,
}

impl Default for RougeScorer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RougeScorer {
    pub fn new(use_stemmer: bool) -> Self {
        Self { use_stemmer }
    }

    fn tokens(&self, text: &str) -> Vec<String> {
        tokenize_rouge(text, self.use_stemmer)
    }

    /// N-gram overlap of `prediction` against `reference`
    pub fn rouge_n(&self, reference: &str, prediction: &str, n: usize) -> RougeScore {
        score_ngrams(&self.tokens(reference), &self.tokens(prediction), n)
    }

    /// Summary-level LCS over newline-separated sentences
    pub fn rouge_lsum(&self, reference: &str, prediction: &str) -> RougeScore {
        let ref_sents: Vec<Vec<String>> = split_sentences(reference)
            .into_iter()
            .map(|s| self.tokens(s))
            .collect();
        let pred_sents: Vec<Vec<String>> = split_sentences(prediction)
            .into_iter()
            .map(|s| self.tokens(s))
            .collect();
        summary_level_lcs(&ref_sents, &pred_sents)
    }
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if n == 0 {
        return counts;
    }
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

fn score_ngrams(reference: &[String], prediction: &[String], n: usize) -> RougeScore {
    let ref_ngrams = ngram_counts(reference, n);
    let pred_ngrams = ngram_counts(prediction, n);

    let overlap: usize = ref_ngrams
        .iter()
        .map(|(ngram, &count)| count.min(pred_ngrams.get(ngram).copied().unwrap_or(0)))
        .sum();
    let ref_total: usize = ref_ngrams.values().sum();
    let pred_total: usize = pred_ngrams.values().sum();

    RougeScore::new(
        overlap as f64 / pred_total.max(1) as f64,
        overlap as f64 / ref_total.max(1) as f64,
    )
}

fn lcs_table(reference: &[String], candidate: &[String]) -> Vec<Vec<usize>> {
    let rows = reference.len();
    let cols = candidate.len();
    let mut table = vec![vec![0usize; cols + 1]; rows + 1];
    for i in 1..=rows {
        for j in 1..=cols {
            table[i][j] = if reference[i - 1] == candidate[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }
    table
}

/// Indices into `reference` of one longest common subsequence
fn lcs_indices(reference: &[String], candidate: &[String]) -> Vec<usize> {
    let table = lcs_table(reference, candidate);
    let mut i = reference.len();
    let mut j = candidate.len();
    let mut indices = Vec::new();

    while i > 0 && j > 0 {
        if reference[i - 1] == candidate[j - 1] {
            indices.push(i - 1);
            i -= 1;
            j -= 1;
        } else if table[i][j - 1] > table[i - 1][j] {
            j -= 1;
        } else {
            i -= 1;
        }
    }

    indices.reverse();
    indices
}

/// Tokens of `reference` covered by the LCS with any candidate sentence
fn union_lcs<'a>(reference: &'a [String], candidates: &[Vec<String>]) -> Vec<&'a str> {
    let union: BTreeSet<usize> = candidates
        .iter()
        .flat_map(|c| lcs_indices(reference, c))
        .collect();
    union.into_iter().map(|i| reference[i].as_str()).collect()
}

fn summary_level_lcs(reference: &[Vec<String>], candidate: &[Vec<String>]) -> RougeScore {
    if reference.is_empty() || candidate.is_empty() {
        return RougeScore::default();
    }

    let ref_len: usize = reference.iter().map(Vec::len).sum();
    let cand_len: usize = candidate.iter().map(Vec::len).sum();
    if ref_len == 0 || cand_len == 0 {
        return RougeScore::default();
    }

    let mut ref_counts: HashMap<&str, usize> = HashMap::new();
    let mut cand_counts: HashMap<&str, usize> = HashMap::new();
    for token in reference.iter().flatten() {
        *ref_counts.entry(token.as_str()).or_insert(0) += 1;
    }
    for token in candidate.iter().flatten() {
        *cand_counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut hits = 0usize;
    for sentence in reference {
        for token in union_lcs(sentence, candidate) {
            let (Some(r), Some(c)) = (ref_counts.get_mut(token), cand_counts.get_mut(token)) else {
                continue;
            };
            if *r > 0 && *c > 0 {
                hits += 1;
                *r -= 1;
                *c -= 1;
            }
        }
    }

    RougeScore::new(hits as f64 / cand_len as f64, hits as f64 / ref_len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_identical_text_is_perfect() {
        let scorer = RougeScorer::default();
        let text = "The sky is blue.";
        for score in [
            scorer.rouge_n(text, text, 1),
            scorer.rouge_n(text, text, 2),
            scorer.rouge_lsum(text, text),
        ] {
            assert_eq!(score.fmeasure, 1.0);
            assert_eq!(score.precision, 1.0);
            assert_eq!(score.recall, 1.0);
        }
    }

    #[test]
    fn test_rouge1_partial_overlap() {
        let scorer = RougeScorer::new(false);
        // reference: the cat sat on the mat (6), prediction: the cat lay (3)
        let score = scorer.rouge_n("the cat sat on the mat", "the cat lay", 1);
        assert!(approx(score.precision, 2.0 / 3.0));
        assert!(approx(score.recall, 2.0 / 6.0));
        assert!(approx(score.fmeasure, 2.0 * (2.0 / 3.0) * (1.0 / 3.0) / (2.0 / 3.0 + 1.0 / 3.0)));
    }

    #[test]
    fn test_rouge2_clips_counts() {
        let scorer = RougeScorer::new(false);
        let score = scorer.rouge_n("a b a b", "a b", 2);
        // reference bigrams: ab x2, ba x1; prediction: ab x1
        assert!(approx(score.precision, 1.0));
        assert!(approx(score.recall, 1.0 / 3.0));
    }

    #[test]
    fn test_stemming_matches_inflections() {
        let stemmed = RougeScorer::new(true).rouge_n("dogs jumping", "dog jumps", 1);
        assert_eq!(stemmed.fmeasure, 1.0);

        let plain = RougeScorer::new(false).rouge_n("dogs jumping", "dog jumps", 1);
        assert_eq!(plain.fmeasure, 0.0);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let scorer = RougeScorer::default();
        assert_eq!(scorer.rouge_n("", "", 1), RougeScore::default());
        assert_eq!(scorer.rouge_n("text", "", 2), RougeScore::default());
        assert_eq!(scorer.rouge_lsum("", "text"), RougeScore::default());
        assert_eq!(scorer.rouge_lsum("!!!", "???"), RougeScore::default());
    }

    #[test]
    fn test_lcs_indices() {
        assert_eq!(lcs_indices(&toks("a b c d"), &toks("a x c y")), vec![0, 2]);
        assert!(lcs_indices(&toks("a b"), &toks("c d")).is_empty());
    }

    #[test]
    fn test_lsum_unions_across_sentences() {
        // Reference sentence 1 shares "w1 w2" with candidate 1 and "w3 w5"
        // with candidate 2, so four reference tokens are hits.
        let reference = vec![toks("w1 w2 w3 w4 w5"), toks("w1 w2 w6 w7 w8")];
        let candidate = vec![toks("w1 w2 w9 w10"), toks("w3 w11 w5")];
        let score = summary_level_lcs(&reference, &candidate);

        assert!(approx(score.recall, 4.0 / 10.0));
        assert!(approx(score.precision, 4.0 / 7.0));
    }

    #[test]
    fn test_lsum_splits_on_newlines() {
        let scorer = RougeScorer::new(false);
        let single = scorer.rouge_lsum("a b c", "c b a");
        let split = scorer.rouge_lsum("a b c", "c\nb\na");
        assert!(approx(single.recall, 1.0 / 3.0));
        assert!(approx(split.recall, 1.0));
    }

    #[test]
    fn test_scores_in_unit_range() {
        let scorer = RougeScorer::default();
        let pairs = [
            ("Water boils at 100 degrees Celsius at sea level.", "It boils at 100 °C."),
            ("Mount Everest", "The tallest mountain is Mount Everest, in Nepal."),
            ("Paris", "Paris\nParis"),
        ];
        for (reference, prediction) in pairs {
            for score in [
                scorer.rouge_n(reference, prediction, 1),
                scorer.rouge_n(reference, prediction, 2),
                scorer.rouge_lsum(reference, prediction),
            ] {
                for v in [score.precision, score.recall, score.fmeasure] {
                    assert!((0.0..=1.0).contains(&v), "{v}");
                }
            }
        }
    }
}
