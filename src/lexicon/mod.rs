//! Keyword, phrase and punctuation scoring shared by every text detector.
//!
//! Matching is plain substring containment on the lower-cased text. There is no
//! tokenisation and no word-boundary check, so "hard" also fires inside
//! "hardware" or "hardly". Classification outputs depend on this, so it is kept
//! as a known accuracy limitation.

pub mod dictionaries;

use serde::{Deserialize, Serialize};

const KEYWORD_FACTOR: f64 = 2.0;
const PHRASE_FACTOR: f64 = 3.0;
const PUNCTUATION_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct CategoryLexicon {
    pub keywords: &'static [&'static str],
    pub phrases: &'static [&'static str],
    pub punctuation: &'static [&'static str],
    pub weight: f64,
}

impl CategoryLexicon {
    pub const fn new(
        keywords: &'static [&'static str],
        phrases: &'static [&'static str],
        punctuation: &'static [&'static str],
        weight: f64,
    ) -> Self {
        Self {
            keywords,
            phrases,
            punctuation,
            weight,
        }
    }

    pub const fn keywords_only(keywords: &'static [&'static str], weight: f64) -> Self {
        Self::new(keywords, &[], &[], weight)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalMatch {
    pub score: f64,
    pub triggers: Vec<String>,
}

impl SignalMatch {
    pub fn is_empty(&self) -> bool {
        self.score <= 0.0
    }
}

/// Scores a single category against `text`.
pub fn extract(text: &str, lexicon: &CategoryLexicon) -> SignalMatch {
    extract_lowered(&text.to_lowercase(), lexicon)
}

fn extract_lowered(lowered: &str, lexicon: &CategoryLexicon) -> SignalMatch {
    let mut signal = SignalMatch::default();
    if lowered.is_empty() {
        return signal;
    }

    for keyword in lexicon.keywords {
        if lowered.contains(keyword) {
            signal.score += lexicon.weight * KEYWORD_FACTOR;
            signal.triggers.push((*keyword).to_string());
        }
    }

    for phrase in lexicon.phrases {
        if lowered.contains(phrase) {
            signal.score += lexicon.weight * PHRASE_FACTOR;
            signal.triggers.push((*phrase).to_string());
        }
    }

    for mark in lexicon.punctuation {
        let count = lowered.matches(mark).count();
        if count > 0 {
            signal.score += count as f64 * lexicon.weight * PUNCTUATION_FACTOR;
            signal.triggers.push(format!("{mark} x{count}"));
        }
    }

    signal
}

/// Scores every category of a table and returns them ranked by descending
/// score. Equal scores keep table order.
pub fn rank<C: Copy>(text: &str, table: &[(C, CategoryLexicon)]) -> Vec<(C, SignalMatch)> {
    let lowered = text.to_lowercase();
    let mut ranked: Vec<(C, SignalMatch)> = table
        .iter()
        .map(|(category, lexicon)| (*category, extract_lowered(&lowered, lexicon)))
        .collect();
    ranked.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));
    ranked
}

/// True when any of `needles` occurs in the lower-cased `text`.
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    needles.iter().any(|needle| lowered.contains(needle))
}
