//! Alignment of the question list against the gold answers
//!
//! Output order always follows the question list; the gold file only decides
//! membership and supplies the reference text.

use std::collections::{HashMap, HashSet};

use crate::error::{EvalError, EvalResult};

/// Exact-text map from gold question to gold answer
#[derive(Debug, Clone, Default)]
pub struct ReferenceLookup {
    answers: HashMap<String, String>,
}

impl ReferenceLookup {
    /// Build from parallel columns. A repeated question keeps the answer of
    /// its last occurrence.
    pub fn from_pairs(questions: &[String], answers: &[String]) -> Self {
        let mut map = HashMap::with_capacity(questions.len());
        for (q, a) in questions.iter().zip(answers) {
            map.insert(q.clone(), a.clone());
        }
        Self { answers: map }
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.answers.get(question).map(String::as_str)
    }

    /// Number of distinct questions
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Questions present in both sources, with their references
#[derive(Debug, Clone)]
pub struct AlignedSet {
    questions: Vec<String>,
    references: Vec<String>,
}

impl AlignedSet {
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// `(question, reference)` pairs in alignment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.questions
            .iter()
            .zip(&self.references)
            .map(|(q, r)| (q.as_str(), r.as_str()))
    }
}

/// Keep the questions of `questions_all` that also appear in the gold set.
///
/// Order and duplicates of `questions_all` are preserved. Fails with
/// [`EvalError::NoOverlap`] when nothing is shared.
pub fn align(
    questions_all: &[String],
    gold_questions: &[String],
    gold_answers: &[String],
) -> EvalResult<AlignedSet> {
    let lookup = ReferenceLookup::from_pairs(gold_questions, gold_answers);
    let members: HashSet<&str> = gold_questions.iter().map(String::as_str).collect();

    let mut questions = Vec::new();
    let mut references = Vec::new();
    let mut dropped = 0usize;

    for q in questions_all {
        if !members.contains(q.as_str()) {
            dropped += 1;
            continue;
        }
        // A gold question without a paired answer only happens with unequal
        // column lengths; it is not a match.
        let Some(reference) = lookup.get(q) else {
            dropped += 1;
            continue;
        };
        questions.push(q.clone());
        references.push(reference.to_string());
    }

    tracing::debug!(
        "Alignment kept {} of {} questions ({} without a gold answer)",
        questions.len(),
        questions_all.len(),
        dropped
    );

    if questions.is_empty() {
        return Err(EvalError::NoOverlap);
    }

    Ok(AlignedSet {
        questions,
        references,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_align_keeps_question_order() {
        let aligned = align(
            &strings(&["Q1", "Q2", "Q3"]),
            &strings(&["Q3", "Q1"]),
            &strings(&["A3", "A1"]),
        )
        .unwrap();

        assert_eq!(aligned.questions(), strings(&["Q1", "Q3"]).as_slice());
        assert_eq!(aligned.references(), strings(&["A1", "A3"]).as_slice());
    }

    #[test]
    fn test_duplicate_gold_last_write_wins() {
        let lookup = ReferenceLookup::from_pairs(
            &strings(&["Q1", "Q2", "Q1"]),
            &strings(&["A1", "A2", "A1-dup"]),
        );
        assert_eq!(lookup.get("Q1"), Some("A1-dup"));
        assert_eq!(lookup.len(), 2);

        let aligned = align(
            &strings(&["Q1"]),
            &strings(&["Q1", "Q1"]),
            &strings(&["A1", "A1-dup"]),
        )
        .unwrap();
        assert_eq!(aligned.references(), strings(&["A1-dup"]).as_slice());
    }

    #[test]
    fn test_duplicate_questions_are_kept() {
        let aligned = align(
            &strings(&["Q1", "Q2", "Q1"]),
            &strings(&["Q1"]),
            &strings(&["A1"]),
        )
        .unwrap();
        let pairs: Vec<_> = aligned.iter().collect();
        assert_eq!(pairs, vec![("Q1", "A1"), ("Q1", "A1")]);
    }

    #[test]
    fn test_exact_match_only() {
        let err = align(
            &strings(&["q1", "Q1 ", " Q1"]),
            &strings(&["Q1"]),
            &strings(&["A1"]),
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::NoOverlap));
    }

    #[test]
    fn test_no_overlap() {
        let err = align(&strings(&["Q1"]), &strings(&["Q2"]), &strings(&["A2"])).unwrap_err();
        assert!(matches!(err, EvalError::NoOverlap));

        let err = align(&[], &strings(&["Q2"]), &strings(&["A2"])).unwrap_err();
        assert!(matches!(err, EvalError::NoOverlap));
    }

    #[test]
    fn test_aligned_subset_of_inputs() {
        let questions_all = strings(&["a", "b", "c", "d", "b", "e"]);
        let gold_questions = strings(&["e", "b", "x", "a"]);
        let gold_answers = strings(&["1", "2", "3", "4"]);

        let aligned = align(&questions_all, &gold_questions, &gold_answers).unwrap();
        assert!(aligned.len() <= questions_all.len());
        for q in aligned.questions() {
            assert!(gold_questions.contains(q));
        }
        assert_eq!(aligned.questions(), strings(&["a", "b", "b", "e"]).as_slice());
    }

    #[test]
    fn test_empty_strings_align() {
        let aligned = align(&strings(&["", "Q1"]), &strings(&[""]), &strings(&["blank"])).unwrap();
        assert_eq!(aligned.questions(), strings(&[""]).as_slice());
        assert_eq!(aligned.references(), strings(&["blank"]).as_slice());
    }
}
