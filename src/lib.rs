pub mod affinity;
pub mod assembler;
pub mod config;
pub mod confidence;
pub mod emotion;
pub mod gamification;
pub mod history;
pub mod learning_style;
pub mod lexicon;
pub mod logging;
pub mod storage;
pub mod teaching_style;
pub mod topic;

pub use assembler::{assemble, AnalysisRequest, TutorInsights, TutorResponse};
pub use emotion::{detect_emotion, EmotionAnalysis, EmotionContext, EmotionalState, SupportLevel};
pub use gamification::GamificationEngine;
pub use history::{SessionTracker, StudentHistory};
pub use learning_style::{detect_learning_style, LearningStyle, LearningStyleAnalysis};
pub use teaching_style::{select_teaching_style, TeachingStyle, TeachingStyleRecommendation};
