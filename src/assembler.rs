//! Runs every detector over one student message and folds the results into
//! the insight bundle and system prompt handed to the tutor model.

use serde::{Deserialize, Serialize};

use crate::confidence::{assess_patience, estimate_confidence, ConfidenceEstimate, PatienceAssessment};
use crate::emotion::{detect_emotion, response_guidance, EmotionAnalysis, EmotionContext, ResponseGuidance};
use crate::gamification::{Difficulty, TutorInteraction, TutorRewardOutcome};
use crate::history::StudentHistory;
use crate::learning_style::{
    analyze_with_history, detect_learning_style, BehaviorPatterns, LearningStyleAnalysis,
};
use crate::teaching_style::{
    select_teaching_style, StyleFeedback, StyleSelectionInput, TeachingStyle, TeachingStyleRecommendation,
};
use crate::topic::{analyze_topic, TopicAnalysis, TopicComplexity};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisRequest {
    pub text: String,
    pub history: Option<StudentHistory>,
    pub emotion_context: Option<EmotionContext>,
    /// Earlier student messages, oldest first.
    pub conversation: Vec<String>,
    pub behavior: Option<BehaviorPatterns>,
    pub preferred_style: Option<TeachingStyle>,
    pub style_feedback: Vec<StyleFeedback>,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorInsights {
    pub topic: TopicAnalysis,
    pub emotion: EmotionAnalysis,
    pub guidance: ResponseGuidance,
    pub learning_style: LearningStyleAnalysis,
    pub confidence: ConfidenceEstimate,
    pub patience: PatienceAssessment,
    pub teaching_style: TeachingStyleRecommendation,
    pub system_prompt: String,
}

impl TutorInsights {
    /// Reward input for a graded turn, carrying the detected state along.
    pub fn interaction(&self, correct: bool) -> TutorInteraction {
        TutorInteraction {
            correct,
            difficulty: Some(match self.topic.complexity {
                TopicComplexity::Low => Difficulty::Easy,
                TopicComplexity::Medium => Difficulty::Medium,
                TopicComplexity::High => Difficulty::Hard,
            }),
            confidence: Some(self.confidence.score),
            streak: 0,
            emotion: Some(self.emotion.primary),
            patience: Some(self.patience.tier),
            topic: self.topic.subject.clone(),
        }
    }
}

/// What the chat surface consumes for one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorResponse {
    pub insights: TutorInsights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<TutorRewardOutcome>,
}

pub fn assemble(request: &AnalysisRequest) -> TutorInsights {
    let text = request.text.as_str();

    let topic = analyze_topic(text);
    let emotion = detect_emotion(text, request.emotion_context.as_ref());
    let guidance = response_guidance(&emotion);
    let learning_style = if request.conversation.is_empty() && request.behavior.is_none() {
        detect_learning_style(text)
    } else {
        analyze_with_history(text, &request.conversation, request.behavior.as_ref())
    };
    let confidence = estimate_confidence(text, request.history.as_ref());
    let patience = assess_patience(confidence.score, topic.complexity, emotion.recommended_response);
    let teaching_style = select_teaching_style(&StyleSelectionInput {
        preferred: request.preferred_style,
        emotion: Some(emotion.primary),
        learning_style: Some(learning_style.style),
        confidence: Some(confidence.score),
        topic_complexity: Some(topic.complexity),
        feedback: request.style_feedback.clone(),
    });

    let system_prompt = build_system_prompt(&teaching_style, &emotion, &guidance, &learning_style, &patience);

    tracing::debug!(
        emotion = emotion.primary.as_str(),
        learning_style = learning_style.style.as_str(),
        teaching_style = teaching_style.style.as_str(),
        confidence = confidence.score,
        patience = patience.tier.label(),
        "Message analysed"
    );

    TutorInsights {
        topic,
        emotion,
        guidance,
        learning_style,
        confidence,
        patience,
        teaching_style,
        system_prompt,
    }
}

fn bullet_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_system_prompt(
    teaching: &TeachingStyleRecommendation,
    emotion: &EmotionAnalysis,
    guidance: &ResponseGuidance,
    learning_style: &LearningStyleAnalysis,
    patience: &PatienceAssessment,
) -> String {
    let mut sections = vec![teaching.style.profile().prompt_modifier.to_string()];

    sections.push(format!(
        "The student seems {} (intensity {}/10). Keep the tone {} and the pacing {}.\n{}",
        emotion.primary.as_str(),
        emotion.intensity,
        guidance.tone,
        guidance.pacing,
        bullet_list(guidance.strategies.iter().copied()),
    ));

    if learning_style.style.is_single() || !learning_style.recommendations.is_empty() {
        sections.push(format!(
            "Learning style: {}.\n{}",
            learning_style.style.as_str(),
            bullet_list(learning_style.recommendations.iter().map(String::as_str)),
        ));
    }

    sections.push(format!(
        "{}.\n{}",
        patience.label,
        bullet_list(patience.recommendations.iter().map(String::as_str)),
    ));

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::PatienceTier;
    use crate::emotion::EmotionalState;
    use crate::learning_style::LearningStyle;

    #[test]
    fn test_frustrated_student_gets_maximum_patience() {
        let insights = assemble(&AnalysisRequest::new(
            "I'm so frustrated, I don't understand this at all!",
        ));
        assert_eq!(insights.emotion.primary, EmotionalState::Frustrated);
        assert_eq!(insights.patience.tier, PatienceTier::Maximum);
        assert_eq!(insights.teaching_style.style, TeachingStyle::Encouraging);
        assert!(insights.system_prompt.contains("Maximum Patience Required"));
    }

    #[test]
    fn test_confident_student_gets_socratic() {
        let insights = assemble(&AnalysisRequest::new("This is easy, I totally get it!"));
        assert!(insights.confidence.score >= 85.0);
        assert_eq!(insights.teaching_style.style, TeachingStyle::Socratic);
    }

    #[test]
    fn test_empty_text_degrades_to_defaults() {
        let insights = assemble(&AnalysisRequest::new(""));
        assert_eq!(insights.emotion.primary, EmotionalState::Neutral);
        assert_eq!(insights.learning_style.style, LearningStyle::Unknown);
        assert_eq!(insights.confidence.score, 75.0);
        assert!(!insights.system_prompt.is_empty());
    }

    #[test]
    fn test_conversation_feeds_learning_style() {
        let mut request = AnalysisRequest::new("can you help with this");
        request.conversation = vec![
            "can you show me a diagram".to_string(),
            "a chart would help me see it".to_string(),
        ];
        let insights = assemble(&request);
        assert_eq!(insights.learning_style.style, LearningStyle::Visual);
    }

    #[test]
    fn test_interaction_carries_state() {
        let insights = assemble(&AnalysisRequest::new("I'm so frustrated with calculus!"));
        let interaction = insights.interaction(true);
        assert_eq!(interaction.emotion, Some(EmotionalState::Frustrated));
        assert_eq!(interaction.difficulty, Some(Difficulty::Hard));
        assert_eq!(interaction.topic.as_deref(), Some("mathematics"));
    }
}
