use serde::{Deserialize, Serialize};

use crate::lexicon::{self, dictionaries, CategoryLexicon};

/// Top two styles closer than this are reported as `Mixed`.
const MIXED_MARGIN: f64 = 2.0;
const HISTORY_WEIGHT: f64 = 2.0;
const PREFERRED_MEDIA_BONUS: f64 = 2.0;
const RESPONSE_SCORE_SCALE: f64 = 3.0;
const ATTENTION_SPAN_FULL_MINUTES: f64 = 30.0;
const ATTENTION_SPAN_SCALE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    Reading,
    Mixed,
    #[default]
    Unknown,
}

impl LearningStyle {
    /// Styles with their own dictionary, in scoring order.
    pub const SINGLE: [LearningStyle; 4] = [
        Self::Visual,
        Self::Auditory,
        Self::Kinesthetic,
        Self::Reading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::Reading => "reading",
            Self::Mixed => "mixed",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "visual" => Self::Visual,
            "auditory" => Self::Auditory,
            "kinesthetic" => Self::Kinesthetic,
            "reading" => Self::Reading,
            "mixed" => Self::Mixed,
            _ => Self::Unknown,
        }
    }

    pub fn is_single(&self) -> bool {
        Self::SINGLE.contains(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleScores {
    pub visual: f64,
    pub auditory: f64,
    pub kinesthetic: f64,
    pub reading: f64,
}

impl StyleScores {
    pub fn get(&self, style: LearningStyle) -> f64 {
        match style {
            LearningStyle::Visual => self.visual,
            LearningStyle::Auditory => self.auditory,
            LearningStyle::Kinesthetic => self.kinesthetic,
            LearningStyle::Reading => self.reading,
            LearningStyle::Mixed | LearningStyle::Unknown => 0.0,
        }
    }

    pub fn add(&mut self, style: LearningStyle, amount: f64) {
        match style {
            LearningStyle::Visual => self.visual += amount,
            LearningStyle::Auditory => self.auditory += amount,
            LearningStyle::Kinesthetic => self.kinesthetic += amount,
            LearningStyle::Reading => self.reading += amount,
            LearningStyle::Mixed | LearningStyle::Unknown => {}
        }
    }

    pub fn total(&self) -> f64 {
        self.visual + self.auditory + self.kinesthetic + self.reading
    }

    /// Single styles by descending score; ties keep `LearningStyle::SINGLE` order.
    pub fn ranked(&self) -> Vec<(LearningStyle, f64)> {
        let mut ranked: Vec<(LearningStyle, f64)> = LearningStyle::SINGLE
            .iter()
            .map(|style| (*style, self.get(*style)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
    Diagram,
    Audio,
    Podcast,
    Interactive,
    Simulation,
    Text,
    Article,
}

impl MediaType {
    pub fn style(&self) -> LearningStyle {
        match self {
            Self::Video | Self::Image | Self::Diagram => LearningStyle::Visual,
            Self::Audio | Self::Podcast => LearningStyle::Auditory,
            Self::Interactive | Self::Simulation => LearningStyle::Kinesthetic,
            Self::Text | Self::Article => LearningStyle::Reading,
        }
    }
}

/// Per-modality measurements, each optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModalityMetrics {
    pub visual: Option<f64>,
    pub auditory: Option<f64>,
    pub kinesthetic: Option<f64>,
    pub reading: Option<f64>,
}

impl ModalityMetrics {
    fn iter(&self) -> impl Iterator<Item = (LearningStyle, f64)> + '_ {
        [
            (LearningStyle::Visual, self.visual),
            (LearningStyle::Auditory, self.auditory),
            (LearningStyle::Kinesthetic, self.kinesthetic),
            (LearningStyle::Reading, self.reading),
        ]
        .into_iter()
        .filter_map(|(style, value)| value.map(|v| (style, v)))
    }
}

/// Behaviour the client observed, as opposed to what the student wrote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BehaviorPatterns {
    pub preferred_media: Vec<MediaType>,
    /// 1-10 self-reported or measured response per modality.
    pub response_scores: ModalityMetrics,
    /// Minutes of sustained attention per modality.
    pub attention_span_minutes: ModalityMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStyleAnalysis {
    pub style: LearningStyle,
    pub confidence: f64,
    pub scores: StyleScores,
    pub evidence: Vec<String>,
    pub recommendations: Vec<String>,
}

static STYLE_LEXICONS: [(LearningStyle, CategoryLexicon); 4] = [
    (LearningStyle::Visual, dictionaries::VISUAL),
    (LearningStyle::Auditory, dictionaries::AUDITORY),
    (LearningStyle::Kinesthetic, dictionaries::KINESTHETIC),
    (LearningStyle::Reading, dictionaries::READING),
];

pub fn detect_learning_style(text: &str) -> LearningStyleAnalysis {
    let (scores, evidence) = score_text(text);
    classify(scores, evidence)
}

/// Classifies `text`, reinforced by earlier messages and observed behaviour.
pub fn analyze_with_history(
    text: &str,
    history: &[String],
    behavior: Option<&BehaviorPatterns>,
) -> LearningStyleAnalysis {
    let (mut scores, mut evidence) = score_text(text);

    for message in history {
        let past = detect_learning_style(message);
        if past.style.is_single() {
            scores.add(past.style, HISTORY_WEIGHT * past.confidence / 100.0);
            evidence.push(format!("history: earlier message leaned {}", past.style.as_str()));
        }
    }

    if let Some(behavior) = behavior {
        apply_behavior(&mut scores, &mut evidence, behavior);
    }

    classify(scores, evidence)
}

fn score_text(text: &str) -> (StyleScores, Vec<String>) {
    let mut scores = StyleScores::default();
    let mut evidence = Vec::new();
    for (style, signal) in lexicon::rank(text, &STYLE_LEXICONS) {
        if signal.is_empty() {
            continue;
        }
        scores.add(style, signal.score);
        evidence.extend(
            signal
                .triggers
                .iter()
                .map(|trigger| format!("{}: {trigger}", style.as_str())),
        );
    }
    (scores, evidence)
}

fn apply_behavior(scores: &mut StyleScores, evidence: &mut Vec<String>, behavior: &BehaviorPatterns) {
    for media in &behavior.preferred_media {
        scores.add(media.style(), PREFERRED_MEDIA_BONUS);
        evidence.push(format!("behavior: prefers {media:?} content").to_lowercase());
    }

    for (style, score) in behavior.response_scores.iter() {
        let normalized = (score.clamp(1.0, 10.0)) / 10.0;
        scores.add(style, normalized * RESPONSE_SCORE_SCALE);
    }

    for (style, minutes) in behavior.attention_span_minutes.iter() {
        let normalized = (minutes.max(0.0) / ATTENTION_SPAN_FULL_MINUTES).min(1.0);
        scores.add(style, normalized * ATTENTION_SPAN_SCALE);
    }
}

fn classify(scores: StyleScores, evidence: Vec<String>) -> LearningStyleAnalysis {
    let total = scores.total();
    if total <= 0.0 {
        return LearningStyleAnalysis {
            style: LearningStyle::Unknown,
            confidence: 0.0,
            scores,
            evidence,
            recommendations: owned(recommendations(LearningStyle::Unknown)),
        };
    }

    let ranked = scores.ranked();
    let (top_style, top_score) = ranked[0];
    let second_score = ranked[1].1;
    let style = if top_score - second_score < MIXED_MARGIN {
        LearningStyle::Mixed
    } else {
        top_style
    };

    LearningStyleAnalysis {
        style,
        confidence: (top_score / total * 100.0).clamp(0.0, 100.0),
        scores,
        evidence,
        recommendations: owned(recommendations(style)),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub fn recommendations(style: LearningStyle) -> &'static [&'static str] {
    match style {
        LearningStyle::Visual => &[
            "Use diagrams, charts and colour-coded notes",
            "Summarise ideas as mind maps",
            "Show worked examples step by step on screen",
        ],
        LearningStyle::Auditory => &[
            "Explain ideas conversationally",
            "Encourage reading explanations aloud",
            "Use rhymes or verbal mnemonics",
        ],
        LearningStyle::Kinesthetic => &[
            "Give a hands-on exercise straight away",
            "Use real-world scenarios and experiments",
            "Keep practice interactive with frequent attempts",
        ],
        LearningStyle::Reading => &[
            "Provide written summaries and definitions",
            "Suggest taking structured notes",
            "Offer lists and further reading",
        ],
        LearningStyle::Mixed => &[
            "Combine visuals, explanation and practice",
            "Offer the same idea in more than one format",
        ],
        LearningStyle::Unknown => &[
            "Try a mix of formats and watch what resonates",
            "Ask how they prefer to learn",
        ],
    }
}
