use serde::{Deserialize, Serialize};

use crate::affinity;
use crate::lexicon::{self, dictionaries, CategoryLexicon};

const HISTORY_WINDOW: usize = 5;
const HISTORY_DOMINANCE: usize = 3;
const HISTORY_OVERRIDE_CONFIDENCE: f64 = 40.0;
const LOW_PERFORMANCE: f64 = 40.0;
const HIGH_PERFORMANCE: f64 = 80.0;
const LONG_SESSION_MINUTES: f64 = 45.0;
const MIN_INTENSITY: u8 = 1;
const MAX_INTENSITY: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalState {
    Excited,
    Curious,
    Confused,
    Frustrated,
    Overwhelmed,
    Confident,
    Anxious,
    Tired,
    #[default]
    Neutral,
}

impl EmotionalState {
    pub const ALL: [EmotionalState; 9] = [
        Self::Excited,
        Self::Curious,
        Self::Confused,
        Self::Frustrated,
        Self::Overwhelmed,
        Self::Confident,
        Self::Anxious,
        Self::Tired,
        Self::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excited => "excited",
            Self::Curious => "curious",
            Self::Confused => "confused",
            Self::Frustrated => "frustrated",
            Self::Overwhelmed => "overwhelmed",
            Self::Confident => "confident",
            Self::Anxious => "anxious",
            Self::Tired => "tired",
            Self::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|e| e.as_str() == lowered)
    }

    /// Emotions the tutor treats as distress.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            Self::Confused | Self::Frustrated | Self::Overwhelmed | Self::Anxious | Self::Tired
        )
    }
}

/// Scaffolding tier recommended for the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SupportLevel {
    #[default]
    Standard,
    Elevated,
    High,
    Maximum,
}

impl SupportLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Elevated => "elevated",
            Self::High => "high",
            Self::Maximum => "maximum",
        }
    }

    /// Contribution to the patience score.
    pub fn patience_points(&self) -> i32 {
        match self {
            Self::Standard => 0,
            Self::Elevated => 1,
            Self::High => 2,
            Self::Maximum => 3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmotionContext {
    /// Oldest first.
    pub previous_emotions: Vec<EmotionalState>,
    pub session_duration_minutes: Option<f64>,
    /// 0-100 scores, oldest first.
    pub recent_performance: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAnalysis {
    pub primary: EmotionalState,
    pub secondary: Option<EmotionalState>,
    pub confidence: f64,
    pub intensity: u8,
    pub triggers: Vec<String>,
    pub recommended_response: SupportLevel,
    pub adjustments: Vec<String>,
}

impl EmotionAnalysis {
    fn neutral() -> Self {
        Self {
            primary: EmotionalState::Neutral,
            secondary: None,
            confidence: 0.0,
            intensity: MIN_INTENSITY,
            triggers: Vec::new(),
            recommended_response: SupportLevel::Standard,
            adjustments: Vec::new(),
        }
    }
}

static EMOTION_LEXICONS: [(EmotionalState, CategoryLexicon); 8] = [
    (EmotionalState::Excited, dictionaries::EXCITED),
    (EmotionalState::Curious, dictionaries::CURIOUS),
    (EmotionalState::Confused, dictionaries::CONFUSED),
    (EmotionalState::Frustrated, dictionaries::FRUSTRATED),
    (EmotionalState::Overwhelmed, dictionaries::OVERWHELMED),
    (EmotionalState::Confident, dictionaries::CONFIDENT),
    (EmotionalState::Anxious, dictionaries::ANXIOUS),
    (EmotionalState::Tired, dictionaries::TIRED),
];

pub fn detect_emotion(text: &str, context: Option<&EmotionContext>) -> EmotionAnalysis {
    let ranked = lexicon::rank(text, &EMOTION_LEXICONS);
    let mut analysis = match ranked.as_slice() {
        [(top, top_signal), rest @ ..] if !top_signal.is_empty() => {
            let (secondary, runner_up) = rest
                .first()
                .filter(|(_, signal)| !signal.is_empty())
                .map(|(emotion, signal)| (Some(*emotion), signal.score))
                .unwrap_or((None, 0.0));
            let confidence =
                (top_signal.score / (top_signal.score + runner_up) * 100.0).clamp(0.0, 100.0);
            EmotionAnalysis {
                primary: *top,
                secondary,
                confidence,
                intensity: clamp_intensity(top_signal.score.ceil() as i64),
                triggers: top_signal.triggers.clone(),
                recommended_response: SupportLevel::Standard,
                adjustments: Vec::new(),
            }
        }
        _ => EmotionAnalysis::neutral(),
    };

    if let Some(context) = context {
        apply_context(&mut analysis, context);
    }

    analysis.recommended_response = affinity::support_level(analysis.primary, analysis.intensity);
    analysis
}

fn apply_context(analysis: &mut EmotionAnalysis, context: &EmotionContext) {
    let frustrated_recently = context
        .previous_emotions
        .iter()
        .rev()
        .take(HISTORY_WINDOW)
        .filter(|e| **e == EmotionalState::Frustrated)
        .count();
    if frustrated_recently >= HISTORY_DOMINANCE && analysis.primary == EmotionalState::Neutral {
        analysis.primary = EmotionalState::Anxious;
        analysis.confidence = HISTORY_OVERRIDE_CONFIDENCE;
        analysis
            .adjustments
            .push(format!("{frustrated_recently} of the last {HISTORY_WINDOW} turns were frustrated; treating calm wording as lingering anxiety"));
    }

    if !context.recent_performance.is_empty() {
        let average = context.recent_performance.iter().sum::<f64>()
            / context.recent_performance.len() as f64;
        if average < LOW_PERFORMANCE {
            analysis.intensity = clamp_intensity(analysis.intensity as i64 + 2);
            analysis
                .adjustments
                .push(format!("recent performance {average:.0}% raised intensity"));
        } else if average > HIGH_PERFORMANCE {
            analysis.intensity = clamp_intensity(analysis.intensity as i64 - 1);
            analysis
                .adjustments
                .push(format!("recent performance {average:.0}% lowered intensity"));
        }
    }

    if let Some(minutes) = context.session_duration_minutes {
        if minutes >= LONG_SESSION_MINUTES
            && matches!(
                analysis.primary,
                EmotionalState::Tired | EmotionalState::Overwhelmed
            )
        {
            analysis.intensity = clamp_intensity(analysis.intensity as i64 + 1);
            analysis
                .adjustments
                .push(format!("{minutes:.0} minute session raised intensity"));
        }
    }
}

fn clamp_intensity(value: i64) -> u8 {
    value.clamp(MIN_INTENSITY as i64, MAX_INTENSITY as i64) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseGuidance {
    pub tone: &'static str,
    pub pacing: &'static str,
    pub strategies: Vec<&'static str>,
}

/// Tone, pacing and concrete moves for replying to a student in this state.
pub fn response_guidance(analysis: &EmotionAnalysis) -> ResponseGuidance {
    let (tone, pacing, strategies): (&str, &str, &[&str]) = match analysis.primary {
        EmotionalState::Excited => (
            "energetic and celebratory",
            "keep momentum",
            &["Match their enthusiasm", "Offer a stretch challenge"],
        ),
        EmotionalState::Curious => (
            "inquisitive",
            "follow their questions",
            &["Answer with a guiding question", "Point to related ideas worth exploring"],
        ),
        EmotionalState::Confused => (
            "calm and clear",
            "slow down",
            &[
                "Restate the idea in simpler words",
                "Use a concrete example",
                "Check understanding before moving on",
            ],
        ),
        EmotionalState::Frustrated => (
            "patient and reassuring",
            "slow down and shrink the steps",
            &[
                "Acknowledge the frustration",
                "Try a completely different explanation",
                "Celebrate small wins",
            ],
        ),
        EmotionalState::Overwhelmed => (
            "gentle and structured",
            "one idea at a time",
            &["Break the topic into small chunks", "Say what can be ignored for now"],
        ),
        EmotionalState::Confident => (
            "collaborative",
            "move faster",
            &["Raise the difficulty", "Ask them to explain it back"],
        ),
        EmotionalState::Anxious => (
            "warm and steady",
            "unhurried",
            &["Normalise mistakes", "Focus on what they already know"],
        ),
        EmotionalState::Tired => (
            "light and brief",
            "short bursts",
            &["Keep replies short", "Suggest a break if the session is long"],
        ),
        EmotionalState::Neutral => (
            "friendly",
            "normal",
            &["Check in on how they are finding the topic"],
        ),
    };

    let mut strategies = strategies.to_vec();
    if analysis.recommended_response == SupportLevel::Maximum {
        strategies.push("Work through a single smallest step and check in after it");
    }

    ResponseGuidance {
        tone,
        pacing,
        strategies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frustrated_utterance() {
        let analysis = detect_emotion("I'm so frustrated, I don't understand this at all!", None);
        assert_eq!(analysis.primary, EmotionalState::Frustrated);
        assert_eq!(analysis.intensity, 10);
        assert_eq!(analysis.recommended_response, SupportLevel::Maximum);
        assert!(analysis.confidence > 90.0);
        assert_eq!(analysis.secondary, Some(EmotionalState::Excited));
    }

    #[test]
    fn test_confident_utterance() {
        let analysis = detect_emotion("This is easy, I totally get it!", None);
        assert_eq!(analysis.primary, EmotionalState::Confident);
        assert_eq!(analysis.recommended_response, SupportLevel::Standard);
    }

    #[test]
    fn test_no_signal_is_neutral() {
        let analysis = detect_emotion("", None);
        assert_eq!(analysis, EmotionAnalysis::neutral());

        let analysis = detect_emotion("the mitochondria", None);
        assert_eq!(analysis.primary, EmotionalState::Neutral);
        assert_eq!(analysis.intensity, 1);
    }

    #[test]
    fn test_single_category_gives_full_confidence() {
        let analysis = detect_emotion("i am tired", None);
        assert_eq!(analysis.primary, EmotionalState::Tired);
        assert_eq!(analysis.confidence, 100.0);
        assert!(analysis.secondary.is_none());
    }

    #[test]
    fn test_frustration_history_turns_neutral_into_anxious() {
        let context = EmotionContext {
            previous_emotions: vec![
                EmotionalState::Frustrated,
                EmotionalState::Neutral,
                EmotionalState::Frustrated,
                EmotionalState::Frustrated,
            ],
            ..Default::default()
        };
        let analysis = detect_emotion("the mitochondria", Some(&context));
        assert_eq!(analysis.primary, EmotionalState::Anxious);
        assert_eq!(analysis.adjustments.len(), 1);
    }

    #[test]
    fn test_history_only_considers_last_five() {
        let mut previous = vec![EmotionalState::Frustrated; 3];
        previous.extend([EmotionalState::Neutral; 5]);
        let context = EmotionContext {
            previous_emotions: previous,
            ..Default::default()
        };
        let analysis = detect_emotion("the mitochondria", Some(&context));
        assert_eq!(analysis.primary, EmotionalState::Neutral);
    }

    #[test]
    fn test_history_does_not_override_detected_emotion() {
        let context = EmotionContext {
            previous_emotions: vec![EmotionalState::Frustrated; 5],
            ..Default::default()
        };
        let analysis = detect_emotion("this is so cool", Some(&context));
        assert_eq!(analysis.primary, EmotionalState::Excited);
    }

    #[test]
    fn test_performance_adjusts_intensity() {
        let low = EmotionContext {
            recent_performance: vec![20.0, 30.0],
            ..Default::default()
        };
        let high = EmotionContext {
            recent_performance: vec![90.0, 95.0],
            ..Default::default()
        };
        // "i am tired" scores 2.2 -> intensity 3
        assert_eq!(detect_emotion("i am tired", None).intensity, 3);
        assert_eq!(detect_emotion("i am tired", Some(&low)).intensity, 5);
        assert_eq!(detect_emotion("i am tired", Some(&high)).intensity, 2);
        assert_eq!(detect_emotion("", Some(&high)).intensity, 1);
    }

    #[test]
    fn test_low_performance_escalates_support() {
        let low = EmotionContext {
            recent_performance: vec![10.0],
            ..Default::default()
        };
        // "i'm worried" scores 2.6 -> intensity 3 -> +2 -> 5
        let analysis = detect_emotion("i'm worried", Some(&low));
        assert_eq!(analysis.primary, EmotionalState::Anxious);
        assert_eq!(analysis.recommended_response, SupportLevel::High);
    }

    #[test]
    fn test_long_session_raises_tiredness() {
        let context = EmotionContext {
            session_duration_minutes: Some(60.0),
            ..Default::default()
        };
        assert_eq!(detect_emotion("i am tired", Some(&context)).intensity, 4);
    }

    #[test]
    fn test_guidance_adds_step_for_maximum_support() {
        let analysis = detect_emotion("I'm so frustrated, I don't understand this at all!", None);
        let guidance = response_guidance(&analysis);
        assert_eq!(guidance.tone, "patient and reassuring");
        assert_eq!(guidance.strategies.len(), 4);
    }

    #[test]
    fn test_parse_round_trips_names() {
        for emotion in EmotionalState::ALL {
            assert_eq!(EmotionalState::parse(emotion.as_str()), Some(emotion));
        }
        assert_eq!(EmotionalState::parse("ecstatic"), None);
    }
}
