//! Tokenizers for BLEU (`13a`) and ROUGE

use regex::Regex;
use std::sync::LazyLock;

use super::stemmer::stem;

/// Punctuation and symbols split off as their own tokens
static RE_SYMBOLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\x7B-\x7E\x5B-\x60\x20-\x26\x28-\x2B\x3A-\x40/])").expect("symbol pattern")
});
/// Period or comma not preceded by a digit
static RE_PUNCT_AFTER_NON_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^0-9])([.,])").expect("punct pattern"));
/// Period or comma not followed by a digit
static RE_PUNCT_BEFORE_NON_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.,])([^0-9])").expect("punct pattern"));
static RE_DASH_AFTER_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9])(-)").expect("dash pattern"));

static RE_NON_ALPHANUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("alphanumeric pattern"));

/// The mteval-v13a tokenizer used for BLEU
pub fn tokenize_13a(line: &str) -> Vec<String> {
    let mut line = line.replace("<skipped>", "").replace("-\n", "").replace('\n', " ");

    if line.contains('&') {
        line = line
            .replace("&quot;", "\"")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">");
    }

    let line = format!(" {} ", line);
    let line = RE_SYMBOLS.replace_all(&line, " ${1} ");
    let line = RE_PUNCT_AFTER_NON_DIGIT.replace_all(&line, "${1} ${2} ");
    let line = RE_PUNCT_BEFORE_NON_DIGIT.replace_all(&line, " ${1} ${2}");
    let line = RE_DASH_AFTER_DIGIT.replace_all(&line, "${1} ${2} ");

    line.split_whitespace().map(str::to_string).collect()
}

/// ROUGE tokenization: lowercase, alphanumeric runs only, optional stemming
/// of tokens longer than three characters
pub fn tokenize_rouge(text: &str, use_stemmer: bool) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = RE_NON_ALPHANUM.replace_all(&lowered, " ");

    cleaned
        .split_whitespace()
        .map(|token| {
            if use_stemmer && token.len() > 3 {
                stem(token)
            } else {
                token.to_string()
            }
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Non-empty lines, the sentence unit of ROUGE-Lsum
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split('\n').filter(|s| !s.is_empty()).collect()
}
