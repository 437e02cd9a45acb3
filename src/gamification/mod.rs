pub mod achievements;
pub mod engine;
pub mod integration;
pub mod xp;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use achievements::{
    check_achievements, find_achievement, AchievementCategory, AchievementDefinition, UnlockedAchievement,
    ACHIEVEMENTS,
};
pub use engine::{Clock, FixedClock, GamificationEngine, SystemClock, XpAward};
pub use integration::{
    compute_tutor_rewards, motivational_message, TutorInteraction, TutorRewardOutcome, TutorRewards, XpBonus,
};
pub use xp::{calculate_level, find_action, XpAction, XpContext, XP_ACTIONS};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MASTERY_FULL_DIFFICULTY: f64 = 3.0;
const MASTERY_FULL_EXPOSURE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            _ => Self::Medium,
        }
    }

    pub fn xp_multiplier(&self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 1.5,
            Self::Hard => 2.0,
        }
    }

    /// Weight used for the rolling topic difficulty; 3 counts as full weight.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 2.0,
            Self::Hard => 3.0,
        }
    }

    pub fn correct_action(&self) -> &'static str {
        match self {
            Self::Easy => "easy_correct",
            Self::Medium => "medium_correct",
            Self::Hard => "hard_correct",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicProgress {
    pub questions_answered: u64,
    pub correct_answers: u64,
    pub average_difficulty: f64,
    /// 0-100.
    pub mastery_level: u32,
    pub last_practiced: Option<String>,
}

/// Mastery needs accuracy, difficulty and sustained exposure at once.
pub fn mastery_level(correct: u64, answered: u64, average_difficulty: f64) -> u32 {
    if answered == 0 {
        return 0;
    }
    let accuracy = correct.min(answered) as f64 / answered as f64;
    let difficulty_weight = (average_difficulty / MASTERY_FULL_DIFFICULTY).clamp(0.0, 1.0);
    let experience_weight = (answered as f64 / MASTERY_FULL_EXPOSURE).min(1.0);
    (accuracy * difficulty_weight * experience_weight * 100.0).floor() as u32
}

/// Gamification state for one user.
///
/// Stored as JSON; every field has a default so blobs written by older
/// versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    pub user_id: String,
    pub xp_points: u64,
    pub level: u32,
    pub streak: u32,
    /// ISO date of the last streak-earning day.
    pub last_active_date: Option<String>,
    pub achievements: Vec<UnlockedAchievement>,
    pub topic_progress: BTreeMap<String, TopicProgress>,
    pub total_questions_answered: u64,
    pub total_correct_answers: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            xp_points: 0,
            level: 1,
            streak: 0,
            last_active_date: None,
            achievements: Vec::new(),
            topic_progress: BTreeMap::new(),
            total_questions_answered: 0,
            total_correct_answers: 0,
            created_at: None,
            updated_at: None,
        }
    }
}

impl UserProgress {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }

    /// Re-derives fields that must not drift from the stored XP.
    pub(crate) fn normalize(&mut self, user_id: &str) {
        if self.user_id.is_empty() {
            self.user_id = user_id.to_string();
        }
        self.level = calculate_level(self.xp_points);
        let mut seen = std::collections::HashSet::new();
        self.achievements.retain(|a| seen.insert(a.id.clone()));
    }

    pub fn record_answer(&mut self, correct: bool) {
        self.total_questions_answered += 1;
        if correct {
            self.total_correct_answers += 1;
        }
    }

    /// Daily streak by calendar date.
    ///
    /// A correct answer on a new day extends the streak when the last active
    /// day is exactly yesterday and restarts it at 1 otherwise. A wrong answer
    /// on a new day zeroes it. Nothing changes for answers on the same day.
    pub fn update_streak(&mut self, correct: bool, today: NaiveDate) {
        let today_str = today.format(DATE_FORMAT).to_string();
        if self.last_active_date.as_deref() == Some(today_str.as_str()) {
            return;
        }

        if correct {
            let yesterday = today.pred_opt().map(|d| d.format(DATE_FORMAT).to_string());
            self.streak = if yesterday.is_some() && self.last_active_date == yesterday {
                self.streak + 1
            } else {
                1
            };
            self.last_active_date = Some(today_str);
        } else {
            self.streak = 0;
        }
    }

    pub fn update_topic(
        &mut self,
        topic: &str,
        correct: bool,
        difficulty: Difficulty,
        today: NaiveDate,
    ) -> &TopicProgress {
        let entry = self.topic_progress.entry(topic.to_string()).or_default();
        entry.questions_answered += 1;
        if correct {
            entry.correct_answers += 1;
        }
        let n = entry.questions_answered as f64;
        entry.average_difficulty = (entry.average_difficulty * (n - 1.0) + difficulty.weight()) / n;
        entry.mastery_level = mastery_level(
            entry.correct_answers,
            entry.questions_answered,
            entry.average_difficulty,
        );
        entry.last_practiced = Some(today.format(DATE_FORMAT).to_string());
        entry
    }

    /// True when the record was last written on an earlier day.
    pub fn is_returning_on(&self, today: NaiveDate) -> bool {
        let today_str = today.format(DATE_FORMAT).to_string();
        matches!(self.updated_at.as_deref(), Some(ts) if !ts.starts_with(&today_str))
    }
}
