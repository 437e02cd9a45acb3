//! Confidence score and patience tier estimation.
//!
//! Confidence starts from a neutral 75 and is overridden by the strongest
//! polarity tier found in the text, nudged by complexity wording, then blended
//! with what the learner history says.

use serde::{Deserialize, Serialize};

use crate::emotion::SupportLevel;
use crate::history::StudentHistory;
use crate::lexicon::{contains_any, dictionaries};
use crate::topic::TopicComplexity;

const BASELINE_CONFIDENCE: f64 = 75.0;
const STRONG_NEGATIVE_SCORE: f64 = 25.0;
const NEGATIVE_SCORE: f64 = 45.0;
const POSITIVE_SCORE: f64 = 85.0;
const STRONG_POSITIVE_SCORE: f64 = 95.0;
const COMPLEXITY_PENALTY: f64 = 10.0;
const SIMPLICITY_BONUS: f64 = 5.0;
const TEXT_WEIGHT: f64 = 0.7;
const HISTORY_WEIGHT: f64 = 0.3;
/// Performance gap (in points) that maps to a full trend of ±1.
const TREND_SPAN: f64 = 20.0;
const TREND_SCALE: f64 = 5.0;
const VELOCITY_SCALE: f64 = 20.0;
const MIN_CONFIDENCE: f64 = 10.0;
const MAX_CONFIDENCE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Polarity {
    StrongNegative,
    Negative,
    #[default]
    Neutral,
    Positive,
    StrongPositive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceEstimate {
    pub score: f64,
    pub polarity: Polarity,
    /// Points contributed by the recent-performance trend.
    pub trend: f64,
    /// Points contributed by learning velocity.
    pub velocity: f64,
}

pub fn estimate_confidence(text: &str, history: Option<&StudentHistory>) -> ConfidenceEstimate {
    let polarity = detect_polarity(text);
    let mut score = match polarity {
        Polarity::StrongNegative => STRONG_NEGATIVE_SCORE,
        Polarity::Negative => NEGATIVE_SCORE,
        Polarity::Neutral => BASELINE_CONFIDENCE,
        Polarity::Positive => POSITIVE_SCORE,
        Polarity::StrongPositive => STRONG_POSITIVE_SCORE,
    };

    if contains_any(text, dictionaries::COMPLEXITY_INDICATORS) {
        score -= COMPLEXITY_PENALTY;
    }
    if contains_any(text, dictionaries::SIMPLICITY_INDICATORS) {
        score += SIMPLICITY_BONUS;
    }

    let mut trend = 0.0;
    let mut velocity = 0.0;
    if let Some(history) = history {
        if history.has_sessions() {
            score = score * TEXT_WEIGHT + history.average_confidence * HISTORY_WEIGHT;
        }
        if let Some(delta) = history.performance_trend() {
            trend = (delta / TREND_SPAN).clamp(-1.0, 1.0) * TREND_SCALE;
        }
        if let Some(v) = history.learning_velocity() {
            velocity = v * VELOCITY_SCALE;
        }
    }

    ConfidenceEstimate {
        score: (score + trend + velocity).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
        polarity,
        trend,
        velocity,
    }
}

fn detect_polarity(text: &str) -> Polarity {
    let tiers = [
        (Polarity::StrongNegative, dictionaries::STRONG_NEGATIVE),
        (Polarity::Negative, dictionaries::NEGATIVE),
        (Polarity::StrongPositive, dictionaries::STRONG_POSITIVE),
        (Polarity::Positive, dictionaries::POSITIVE),
    ];
    tiers
        .into_iter()
        .find(|(_, keywords)| contains_any(text, keywords))
        .map(|(polarity, _)| polarity)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatienceTier {
    Standard,
    Moderate,
    High,
    Maximum,
}

impl PatienceTier {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 6 => Self::Maximum,
            s if s >= 4 => Self::High,
            s if s >= 2 => Self::Moderate,
            _ => Self::Standard,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Maximum => "Maximum Patience Required",
            Self::High => "High Patience",
            Self::Moderate => "Moderate Patience",
            Self::Standard => "Standard Patience",
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            Self::Maximum => &[
                "Break every explanation into the smallest possible steps",
                "Confirm understanding after each step before continuing",
                "Offer lots of reassurance and praise effort, not just results",
                "Avoid introducing new terms until the basics feel solid",
            ],
            Self::High => &[
                "Use simple language and concrete examples",
                "Check understanding frequently",
                "Acknowledge that the topic is challenging",
            ],
            Self::Moderate => &[
                "Give clear explanations with an example",
                "Invite questions before moving on",
            ],
            Self::Standard => &["Keep a normal pace and offer extension ideas"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatienceAssessment {
    pub tier: PatienceTier,
    pub score: i32,
    pub label: String,
    pub recommendations: Vec<String>,
}

pub fn assess_patience(
    confidence: f64,
    complexity: TopicComplexity,
    support: SupportLevel,
) -> PatienceAssessment {
    let confidence_points = match confidence {
        c if c < 30.0 => 4,
        c if c < 50.0 => 3,
        c if c < 70.0 => 2,
        c if c < 85.0 => 1,
        _ => 0,
    };
    let score = confidence_points + complexity.patience_points() + support.patience_points();
    let tier = PatienceTier::from_score(score);

    PatienceAssessment {
        tier,
        score,
        label: tier.label().to_string(),
        recommendations: tier.recommendations().iter().map(|r| (*r).to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_without_signal() {
        let estimate = estimate_confidence("what is photosynthesis", None);
        assert_eq!(estimate.polarity, Polarity::Neutral);
        assert_eq!(estimate.score, 75.0);
    }

    #[test]
    fn test_polarity_tiers() {
        assert_eq!(estimate_confidence("I have no idea", None).score, 25.0);
        assert_eq!(estimate_confidence("I'm struggling", None).score, 45.0);
        assert_eq!(estimate_confidence("I got it", None).score, 85.0);
        assert_eq!(estimate_confidence("I nailed it", None).score, 95.0);
    }

    #[test]
    fn test_strong_positive_with_simplicity_clamps() {
        let estimate = estimate_confidence("This is easy, I totally get it!", None);
        assert_eq!(estimate.polarity, Polarity::StrongPositive);
        assert_eq!(estimate.score, 100.0);
    }

    #[test]
    fn test_negative_tier_wins_over_positive() {
        let estimate = estimate_confidence("I don't understand, nothing makes sense", None);
        assert_eq!(estimate.polarity, Polarity::StrongNegative);
    }

    #[test]
    fn test_complexity_nudges_down() {
        assert_eq!(estimate_confidence("this is a complex idea", None).score, 65.0);
    }

    #[test]
    fn test_history_blend_trend_and_velocity() {
        let mut history = StudentHistory::new("u1");
        history.total_sessions = 3;
        history.average_confidence = 50.0;
        let estimate = estimate_confidence("what is photosynthesis", Some(&history));
        // 75 * 0.7 + 50 * 0.3
        assert!((estimate.score - 67.5).abs() < 1e-9);

        for score in [40.0, 80.0, 80.0, 80.0] {
            history.record_performance(score);
        }
        for correct in [true, true, false, false] {
            history.record_answer(correct);
        }
        let estimate = estimate_confidence("what is photosynthesis", Some(&history));
        // trend: +40 points -> +1 -> +5; velocity: 0.7 - 0.5 = 0.2 -> +4
        assert!((estimate.trend - 5.0).abs() < 1e-9);
        assert!((estimate.velocity - 4.0).abs() < 1e-9);
        assert!((estimate.score - 76.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_stays_in_range() {
        let mut history = StudentHistory::new("u1");
        for score in [100.0, 100.0, 0.0, 0.0, 0.0] {
            history.record_performance(score);
        }
        for _ in 0..10 {
            history.record_answer(true);
        }
        let estimate = estimate_confidence("I give up", Some(&history));
        assert_eq!(estimate.score, 10.0);
    }

    #[test]
    fn test_patience_tiers() {
        let max = assess_patience(20.0, TopicComplexity::High, SupportLevel::Maximum);
        assert_eq!(max.tier, PatienceTier::Maximum);
        assert_eq!(max.score, 9);
        assert_eq!(max.label, "Maximum Patience Required");

        let high = assess_patience(45.0, TopicComplexity::Medium, SupportLevel::Standard);
        assert_eq!(high.tier, PatienceTier::High);

        let moderate = assess_patience(80.0, TopicComplexity::Medium, SupportLevel::Standard);
        assert_eq!(moderate.tier, PatienceTier::Moderate);

        let standard = assess_patience(95.0, TopicComplexity::Low, SupportLevel::Elevated);
        assert_eq!(standard.tier, PatienceTier::Standard);
        assert_eq!(standard.recommendations.len(), 1);
    }
}
