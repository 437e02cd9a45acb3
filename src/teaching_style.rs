use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::affinity::{COMPLEXITY_TEACHING, EMOTION_TEACHING, LEARNING_TEACHING};
use crate::emotion::EmotionalState;
use crate::learning_style::LearningStyle;
use crate::topic::TopicComplexity;

const ADAPTIVE_BASELINE: f64 = 2.0;
const PREFERENCE_BONUS: f64 = 5.0;
const LOW_CONFIDENCE: f64 = 40.0;
const LOW_CONFIDENCE_BONUS: f64 = 3.0;
const HIGH_CONFIDENCE: f64 = 80.0;
const HIGH_CONFIDENCE_BONUS: f64 = 2.0;
const NEUTRAL_EFFECTIVENESS: f64 = 50.0;
const EFFECTIVENESS_SCALE: f64 = 25.0;
const ALTERNATIVES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeachingStyle {
    Playful,
    Logical,
    Encouraging,
    Professional,
    Socratic,
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingStyleProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub prompt_modifier: &'static str,
}

impl TeachingStyle {
    pub const ALL: [TeachingStyle; 6] = [
        Self::Playful,
        Self::Logical,
        Self::Encouraging,
        Self::Professional,
        Self::Socratic,
        Self::Adaptive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playful => "playful",
            Self::Logical => "logical",
            Self::Encouraging => "encouraging",
            Self::Professional => "professional",
            Self::Socratic => "socratic",
            Self::Adaptive => "adaptive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        let parsed = Self::ALL.into_iter().find(|style| style.as_str() == lowered);
        if parsed.is_none() {
            warn!(style = %s, "unknown teaching style preference ignored");
        }
        parsed
    }

    pub fn profile(&self) -> &'static TeachingStyleProfile {
        match self {
            Self::Playful => &PLAYFUL,
            Self::Logical => &LOGICAL,
            Self::Encouraging => &ENCOURAGING,
            Self::Professional => &PROFESSIONAL,
            Self::Socratic => &SOCRATIC,
            Self::Adaptive => &ADAPTIVE,
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

static PLAYFUL: TeachingStyleProfile = TeachingStyleProfile {
    name: "Playful Pal",
    description: "Light-hearted explanations with games, jokes and analogies",
    prompt_modifier: "Be playful and upbeat. Use fun analogies, small games and emoji where they help, while keeping every fact correct.",
};

static LOGICAL: TeachingStyleProfile = TeachingStyleProfile {
    name: "Logic Guide",
    description: "Structured, step-by-step reasoning from first principles",
    prompt_modifier: "Explain in a clear logical order. Number the steps, state each rule before using it and show why each step follows.",
};

static ENCOURAGING: TeachingStyleProfile = TeachingStyleProfile {
    name: "Encouraging Coach",
    description: "Warm, supportive guidance that builds confidence",
    prompt_modifier: "Be warm and encouraging. Acknowledge effort, normalise mistakes and celebrate every bit of progress.",
};

static PROFESSIONAL: TeachingStyleProfile = TeachingStyleProfile {
    name: "Professional Tutor",
    description: "Precise, formal and academically rigorous",
    prompt_modifier: "Use a precise, professional tone. Prefer correct terminology, concise definitions and well-organised answers.",
};

static SOCRATIC: TeachingStyleProfile = TeachingStyleProfile {
    name: "Socratic Mentor",
    description: "Guides the student to answers through questions",
    prompt_modifier: "Do not give the answer directly. Ask one guiding question at a time and build on the student's replies.",
};

static ADAPTIVE: TeachingStyleProfile = TeachingStyleProfile {
    name: "Adaptive Tutor",
    description: "Blends styles based on how the student is doing",
    prompt_modifier: "Adapt to the student as the conversation goes. Mix explanation, questions and encouragement based on their replies.",
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleFeedback {
    pub style: TeachingStyle,
    /// 0-100, 50 means no better or worse than expected.
    pub effectiveness: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleSelectionInput {
    pub preferred: Option<TeachingStyle>,
    pub emotion: Option<EmotionalState>,
    pub learning_style: Option<LearningStyle>,
    /// 0-100.
    pub confidence: Option<f64>,
    pub topic_complexity: Option<TopicComplexity>,
    pub feedback: Vec<StyleFeedback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleScore {
    pub style: TeachingStyle,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingStyleRecommendation {
    pub style: TeachingStyle,
    pub confidence: f64,
    pub score: f64,
    pub reasoning: Vec<String>,
    pub alternatives: Vec<StyleScore>,
}

pub fn select_teaching_style(input: &StyleSelectionInput) -> TeachingStyleRecommendation {
    let mut scores = [0.0_f64; TeachingStyle::ALL.len()];
    let mut reasoning = Vec::new();

    scores[TeachingStyle::Adaptive.index()] += ADAPTIVE_BASELINE;

    if let Some(preferred) = input.preferred {
        if preferred != TeachingStyle::Adaptive {
            scores[preferred.index()] += PREFERENCE_BONUS;
            reasoning.push(format!("student prefers the {} style", preferred.as_str()));
        }
    }

    if let Some(emotion) = input.emotion {
        apply_weights(&mut scores, EMOTION_TEACHING.weights(emotion));
        if !EMOTION_TEACHING.weights(emotion).is_empty() {
            reasoning.push(format!("student seems {}", emotion.as_str()));
        }
    }

    if let Some(style) = input.learning_style {
        let weights = LEARNING_TEACHING.weights(style);
        apply_weights(&mut scores, weights);
        if !weights.is_empty() {
            reasoning.push(format!("{} learner", style.as_str()));
        }
    }

    if let Some(confidence) = input.confidence {
        if confidence < LOW_CONFIDENCE {
            scores[TeachingStyle::Encouraging.index()] += LOW_CONFIDENCE_BONUS;
            reasoning.push(format!("low confidence ({confidence:.0}) calls for encouragement"));
        } else if confidence > HIGH_CONFIDENCE {
            scores[TeachingStyle::Socratic.index()] += HIGH_CONFIDENCE_BONUS;
            reasoning.push(format!("high confidence ({confidence:.0}) allows questioning"));
        }
    }

    if let Some(complexity) = input.topic_complexity {
        apply_weights(&mut scores, COMPLEXITY_TEACHING.weights(complexity));
        reasoning.push(format!("{} complexity topic", complexity.as_str()));
    }

    for feedback in &input.feedback {
        scores[feedback.style.index()] +=
            (feedback.effectiveness - NEUTRAL_EFFECTIVENESS) / EFFECTIVENESS_SCALE;
    }
    if !input.feedback.is_empty() {
        reasoning.push(format!(
            "{} past sessions of effectiveness feedback",
            input.feedback.len()
        ));
    }

    let mut ranked: Vec<StyleScore> = TeachingStyle::ALL
        .iter()
        .map(|style| StyleScore {
            style: *style,
            score: scores[style.index()],
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    let top = ranked[0];
    let second = ranked[1];
    let confidence = ((top.score - second.score) * 20.0 + 60.0).clamp(0.0, 100.0);

    TeachingStyleRecommendation {
        style: top.style,
        confidence,
        score: top.score,
        reasoning,
        alternatives: ranked[1..=ALTERNATIVES].to_vec(),
    }
}

fn apply_weights(scores: &mut [f64], weights: &[(TeachingStyle, f64)]) {
    for (style, weight) in weights {
        scores[style.index()] += weight;
    }
}
