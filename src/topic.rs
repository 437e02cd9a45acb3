use serde::{Deserialize, Serialize};

use crate::lexicon::{self, dictionaries, CategoryLexicon};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TopicComplexity {
    Low,
    #[default]
    Medium,
    High,
}

impl TopicComplexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" | "easy" => Self::Low,
            "high" | "hard" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn patience_points(&self) -> i32 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicAnalysis {
    pub subject: Option<String>,
    pub complexity: TopicComplexity,
    pub keywords: Vec<String>,
}

static COMPLEXITY_LEXICONS: [(TopicComplexity, CategoryLexicon); 3] = [
    (TopicComplexity::High, dictionaries::HIGH_COMPLEXITY),
    (TopicComplexity::Medium, dictionaries::MEDIUM_COMPLEXITY),
    (TopicComplexity::Low, dictionaries::LOW_COMPLEXITY),
];

static SUBJECT_LEXICONS: [(&str, CategoryLexicon); 5] = [
    ("mathematics", dictionaries::MATHEMATICS),
    ("science", dictionaries::SCIENCE),
    ("programming", dictionaries::PROGRAMMING),
    ("language", dictionaries::LANGUAGE),
    ("history", dictionaries::HISTORY),
];

/// Text without any complexity keyword counts as `Medium`.
pub fn detect_complexity(text: &str) -> TopicComplexity {
    match lexicon::rank(text, &COMPLEXITY_LEXICONS).first() {
        Some((complexity, signal)) if !signal.is_empty() => *complexity,
        _ => TopicComplexity::Medium,
    }
}

pub fn detect_subject(text: &str) -> Option<String> {
    lexicon::rank(text, &SUBJECT_LEXICONS)
        .into_iter()
        .find(|(_, signal)| !signal.is_empty())
        .map(|(subject, _)| subject.to_string())
}

pub fn analyze_topic(text: &str) -> TopicAnalysis {
    let ranked = lexicon::rank(text, &SUBJECT_LEXICONS);
    let keywords = ranked
        .first()
        .map(|(_, signal)| signal.triggers.clone())
        .unwrap_or_default();
    TopicAnalysis {
        subject: detect_subject(text),
        complexity: detect_complexity(text),
        keywords,
    }
}
