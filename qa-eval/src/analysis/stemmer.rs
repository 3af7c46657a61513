//! Porter stemmer with the NLTK extensions
//!
//! ROUGE stems tokens before matching so that "jumps" and "jumping" count as
//! the same unigram. Input is expected to be lowercase ASCII; anything else is
//! returned unchanged.

#[derive(Clone, Copy)]
enum Cond {
    Always,
    /// measure(stem) > n
    MeasureAbove(usize),
    /// measure(stem) > 1 and the stem ends in `s` or `t`
    IonStem,
}

const STEP1A: &[(&str, &str, Cond)] = &[
    ("sses", "ss", Cond::Always),
    ("ies", "i", Cond::Always),
    ("ss", "ss", Cond::Always),
    ("s", "", Cond::Always),
];

const STEP2: &[(&str, &str, Cond)] = &[
    ("ational", "ate", Cond::MeasureAbove(0)),
    ("tional", "tion", Cond::MeasureAbove(0)),
    ("enci", "ence", Cond::MeasureAbove(0)),
    ("anci", "ance", Cond::MeasureAbove(0)),
    ("izer", "ize", Cond::MeasureAbove(0)),
    ("bli", "ble", Cond::MeasureAbove(0)),
    ("alli", "al", Cond::MeasureAbove(0)),
    ("entli", "ent", Cond::MeasureAbove(0)),
    ("eli", "e", Cond::MeasureAbove(0)),
    ("ousli", "ous", Cond::MeasureAbove(0)),
    ("ization", "ize", Cond::MeasureAbove(0)),
    ("ation", "ate", Cond::MeasureAbove(0)),
    ("ator", "ate", Cond::MeasureAbove(0)),
    ("alism", "al", Cond::MeasureAbove(0)),
    ("iveness", "ive", Cond::MeasureAbove(0)),
    ("fulness", "ful", Cond::MeasureAbove(0)),
    ("ousness", "ous", Cond::MeasureAbove(0)),
    ("aliti", "al", Cond::MeasureAbove(0)),
    ("iviti", "ive", Cond::MeasureAbove(0)),
    ("biliti", "ble", Cond::MeasureAbove(0)),
    ("fulli", "ful", Cond::MeasureAbove(0)),
];

const STEP3: &[(&str, &str, Cond)] = &[
    ("icate", "ic", Cond::MeasureAbove(0)),
    ("ative", "", Cond::MeasureAbove(0)),
    ("alize", "al", Cond::MeasureAbove(0)),
    ("iciti", "ic", Cond::MeasureAbove(0)),
    ("ical", "ic", Cond::MeasureAbove(0)),
    ("ful", "", Cond::MeasureAbove(0)),
    ("ness", "", Cond::MeasureAbove(0)),
];

const STEP4: &[(&str, &str, Cond)] = &[
    ("al", "", Cond::MeasureAbove(1)),
    ("ance", "", Cond::MeasureAbove(1)),
    ("ence", "", Cond::MeasureAbove(1)),
    ("er", "", Cond::MeasureAbove(1)),
    ("ic", "", Cond::MeasureAbove(1)),
    ("able", "", Cond::MeasureAbove(1)),
    ("ible", "", Cond::MeasureAbove(1)),
    ("ant", "", Cond::MeasureAbove(1)),
    ("ement", "", Cond::MeasureAbove(1)),
    ("ment", "", Cond::MeasureAbove(1)),
    ("ent", "", Cond::MeasureAbove(1)),
    ("ion", "", Cond::IonStem),
    ("ou", "", Cond::MeasureAbove(1)),
    ("ism", "", Cond::MeasureAbove(1)),
    ("ate", "", Cond::MeasureAbove(1)),
    ("iti", "", Cond::MeasureAbove(1)),
    ("ous", "", Cond::MeasureAbove(1)),
    ("ive", "", Cond::MeasureAbove(1)),
    ("ize", "", Cond::MeasureAbove(1)),
];

/// Stem a single word
pub fn stem(word: &str) -> String {
    let word = word.to_lowercase();

    if let Some(base) = irregular_form(&word) {
        return base.to_string();
    }
    if word.len() <= 2 || !word.is_ascii() {
        return word;
    }

    let word = step1a(word);
    let word = step1b(word);
    let word = step1c(word);
    let word = step2(word);
    let word = step3(word);
    let word = step4(word);
    let word = step5a(word);
    step5b(word)
}

fn irregular_form(word: &str) -> Option<&'static str> {
    let base = match word {
        "sky" | "skies" => "sky",
        "dying" => "die",
        "lying" => "lie",
        "tying" => "tie",
        "news" => "news",
        "innings" | "inning" => "inning",
        "outings" | "outing" => "outing",
        "cannings" | "canning" => "canning",
        "howe" => "howe",
        "proceed" => "proceed",
        "exceed" => "exceed",
        "succeed" => "succeed",
        _ => return None,
    };
    Some(base)
}

/// A `y` is a consonant unless it follows a consonant, so inside a run of
/// `y`s the answer alternates starting from the letter before the run.
fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => {
            let run = w[..=i].iter().rev().take_while(|&&c| c == b'y').count();
            let first_is_consonant = match i.checked_sub(run) {
                Some(before) => !is_consonant(w, before),
                None => true,
            };
            first_is_consonant == (run % 2 == 1)
        }
        _ => true,
    }
}

/// Consonant flag for every letter, in one pass
fn consonants(w: &[u8]) -> Vec<bool> {
    let mut flags: Vec<bool> = Vec::with_capacity(w.len());
    for (i, &c) in w.iter().enumerate() {
        let flag = match c {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !flags[i - 1],
            _ => true,
        };
        flags.push(flag);
    }
    flags
}

/// Number of vowel-consonant sequences, the `m` of the Porter paper
fn measure(stem: &str) -> usize {
    consonants(stem.as_bytes())
        .windows(2)
        .filter(|pair| !pair[0] && pair[1])
        .count()
}

fn contains_vowel(stem: &str) -> bool {
    consonants(stem.as_bytes()).iter().any(|&c| !c)
}

fn ends_double_consonant(word: &str) -> bool {
    let w = word.as_bytes();
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

fn ends_cvc(word: &str) -> bool {
    let w = word.as_bytes();
    let n = w.len();
    (n >= 3
        && is_consonant(w, n - 3)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 1)
        && !matches!(w[n - 1], b'w' | b'x' | b'y'))
        || (n == 2 && !is_consonant(w, 0) && is_consonant(w, 1))
}

fn holds(cond: Cond, stem: &str) -> bool {
    match cond {
        Cond::Always => true,
        Cond::MeasureAbove(n) => measure(stem) > n,
        Cond::IonStem => measure(stem) > 1 && (stem.ends_with('s') || stem.ends_with('t')),
    }
}

/// Apply the first rule whose suffix matches. `None` when no suffix matched;
/// a matched rule whose condition fails leaves the word as is.
fn apply_rules(word: &str, rules: &[(&str, &str, Cond)]) -> Option<String> {
    for &(suffix, replacement, cond) in rules {
        if let Some(stem) = word.strip_suffix(suffix) {
            return Some(if holds(cond, stem) {
                format!("{}{}", stem, replacement)
            } else {
                word.to_string()
            });
        }
    }
    None
}

fn step1a(word: String) -> String {
    if word.len() == 4 && word.ends_with("ies") {
        return format!("{}ie", &word[..1]);
    }
    apply_rules(&word, STEP1A).unwrap_or(word)
}

fn step1b(word: String) -> String {
    if let Some(stem) = word.strip_suffix("ied") {
        return if word.len() == 4 {
            format!("{}ie", stem)
        } else {
            format!("{}i", stem)
        };
    }

    if let Some(stem) = word.strip_suffix("eed") {
        return if measure(stem) > 0 {
            format!("{}ee", stem)
        } else {
            word
        };
    }

    let stem = match ["ed", "ing"]
        .iter()
        .filter_map(|suffix| word.strip_suffix(suffix))
        .find(|stem| contains_vowel(stem))
    {
        Some(stem) => stem.to_string(),
        None => return word,
    };

    if stem.ends_with("at") || stem.ends_with("bl") || stem.ends_with("iz") {
        return format!("{}e", stem);
    }
    if ends_double_consonant(&stem) {
        let last = stem.as_bytes()[stem.len() - 1];
        return if matches!(last, b'l' | b's' | b'z') {
            stem
        } else {
            stem[..stem.len() - 1].to_string()
        };
    }
    if measure(&stem) == 1 && ends_cvc(&stem) {
        return format!("{}e", stem);
    }
    stem
}

fn step1c(word: String) -> String {
    match word.strip_suffix('y') {
        Some(stem) if stem.len() > 1 && is_consonant(stem.as_bytes(), stem.len() - 1) => {
            format!("{}i", stem)
        }
        _ => word,
    }
}

fn step2(word: String) -> String {
    // "alli" is rewritten first and the result goes through step 2 again.
    if let Some(stem) = word.strip_suffix("alli") {
        if measure(stem) > 0 {
            return step2(format!("{}al", stem));
        }
    }

    if let Some(stemmed) = apply_rules(&word, STEP2) {
        return stemmed;
    }

    // The "l" of "logi" stays with the stem for the measure test.
    if word.ends_with("logi") && measure(&word[..word.len() - 3]) > 0 {
        return word[..word.len() - 1].to_string();
    }
    word
}

fn step3(word: String) -> String {
    apply_rules(&word, STEP3).unwrap_or(word)
}

fn step4(word: String) -> String {
    apply_rules(&word, STEP4).unwrap_or(word)
}

fn step5a(word: String) -> String {
    if let Some(stem) = word.strip_suffix('e') {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_string();
        }
    }
    word
}

fn step5b(word: String) -> String {
    if word.ends_with("ll") && measure(&word[..word.len() - 1]) > 1 {
        return word[..word.len() - 1].to_string();
    }
    word
}
