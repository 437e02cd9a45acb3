use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserProgress;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    #[default]
    Milestone,
    Accuracy,
    Streak,
    Experience,
    Exploration,
    Mastery,
    Habit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AchievementCondition {
    QuestionsAnswered(u64),
    CorrectAnswers(u64),
    Streak(u32),
    XpPoints(u64),
    Level(u32),
    TopicsExplored(usize),
    TopicMastery(u32),
    /// Local hour window `[start, end)`, wrapping past midnight when start > end.
    HourWindow { start: u32, end: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub xp_reward: u64,
    pub condition: AchievementCondition,
}

const fn def(
    id: &'static str,
    name: &'static str,
    emoji: &'static str,
    description: &'static str,
    category: AchievementCategory,
    xp_reward: u64,
    condition: AchievementCondition,
) -> AchievementDefinition {
    AchievementDefinition {
        id,
        name,
        emoji,
        description,
        category,
        xp_reward,
        condition,
    }
}

use AchievementCategory as Cat;
use AchievementCondition as Cond;

pub static ACHIEVEMENTS: &[AchievementDefinition] = &[
    def("first_steps", "First Steps", "👣", "Answer your first question", Cat::Milestone, 10, Cond::QuestionsAnswered(1)),
    def("quick_learner", "Quick Learner", "⚡", "Answer 10 questions", Cat::Milestone, 25, Cond::QuestionsAnswered(10)),
    def("century", "Century Club", "💯", "Answer 100 questions", Cat::Milestone, 100, Cond::QuestionsAnswered(100)),
    def("sharp_shooter", "Sharp Shooter", "🎯", "Get 50 answers right", Cat::Accuracy, 75, Cond::CorrectAnswers(50)),
    def("on_fire", "On Fire", "🔥", "Keep a 3 day streak", Cat::Streak, 30, Cond::Streak(3)),
    def("week_warrior", "Week Warrior", "📅", "Keep a 7 day streak", Cat::Streak, 70, Cond::Streak(7)),
    def("unstoppable", "Unstoppable", "🏆", "Keep a 30 day streak", Cat::Streak, 300, Cond::Streak(30)),
    def("xp_hunter", "XP Hunter", "💎", "Earn 500 XP", Cat::Experience, 50, Cond::XpPoints(500)),
    def("xp_legend", "XP Legend", "👑", "Earn 2000 XP", Cat::Experience, 200, Cond::XpPoints(2000)),
    def("rising_star", "Rising Star", "⭐", "Reach level 5", Cat::Experience, 50, Cond::Level(5)),
    def("scholar", "Scholar", "🎓", "Reach level 10", Cat::Experience, 100, Cond::Level(10)),
    def("explorer", "Explorer", "🧭", "Study 3 different topics", Cat::Exploration, 40, Cond::TopicsExplored(3)),
    def("polymath", "Polymath", "🌍", "Study 5 different topics", Cat::Exploration, 80, Cond::TopicsExplored(5)),
    def("topic_master", "Topic Master", "🧠", "Reach 80% mastery in a topic", Cat::Mastery, 150, Cond::TopicMastery(80)),
    def("night_owl", "Night Owl", "🦉", "Study between 10pm and 5am", Cat::Habit, 20, Cond::HourWindow { start: 22, end: 5 }),
    def("early_bird", "Early Bird", "🐦", "Study between 5am and 8am", Cat::Habit, 20, Cond::HourWindow { start: 5, end: 8 }),
];

/// Unknown ids are logged and yield `None`.
pub fn find_achievement(id: &str) -> Option<&'static AchievementDefinition> {
    let found = ACHIEVEMENTS.iter().find(|a| a.id == id);
    if found.is_none() {
        tracing::warn!(achievement = %id, "Unknown achievement id");
    }
    found
}

/// Unlock record stored in [`UserProgress::achievements`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UnlockedAchievement {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub category: AchievementCategory,
    pub xp_reward: u64,
    pub unlocked_at: String,
    pub record_id: String,
}

impl UnlockedAchievement {
    fn unlock(def: &AchievementDefinition, now: NaiveDateTime) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            emoji: def.emoji.to_string(),
            category: def.category,
            xp_reward: def.xp_reward,
            unlocked_at: now.format(TIMESTAMP_FORMAT).to_string(),
            record_id: Uuid::new_v4().to_string(),
        }
    }
}

fn is_eligible(condition: &AchievementCondition, progress: &UserProgress, now: NaiveDateTime) -> bool {
    match *condition {
        Cond::QuestionsAnswered(n) => progress.total_questions_answered >= n,
        Cond::CorrectAnswers(n) => progress.total_correct_answers >= n,
        Cond::Streak(n) => progress.streak >= n,
        Cond::XpPoints(n) => progress.xp_points >= n,
        Cond::Level(n) => progress.level >= n,
        Cond::TopicsExplored(n) => progress.topic_progress.len() >= n,
        Cond::TopicMastery(n) => progress.topic_progress.values().any(|t| t.mastery_level >= n),
        Cond::HourWindow { start, end } => {
            let hour = now.hour();
            if start <= end {
                hour >= start && hour < end
            } else {
                hour >= start || hour < end
            }
        }
    }
}

/// Appends every newly earned achievement to `progress` and returns them.
///
/// Ids already present are skipped, so repeated calls never duplicate.
pub fn check_achievements(progress: &mut UserProgress, now: NaiveDateTime) -> Vec<UnlockedAchievement> {
    let unlocked: Vec<UnlockedAchievement> = ACHIEVEMENTS
        .iter()
        .filter(|def| !progress.has_achievement(def.id))
        .filter(|def| is_eligible(&def.condition, progress, now))
        .map(|def| UnlockedAchievement::unlock(def, now))
        .collect();

    progress.achievements.extend(unlocked.iter().cloned());
    unlocked
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::gamification::{Difficulty, UserProgress};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<_> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ACHIEVEMENTS.len());
        assert!(find_achievement("night_owl").is_some());
    }

    #[test]
    fn test_unknown_achievement_id_is_none() {
        assert!(find_achievement("not_a_badge").is_none());
        assert!(find_achievement("").is_none());
        assert!(find_achievement("Night_Owl").is_none());
    }

    #[test]
    fn test_fresh_progress_unlocks_nothing_at_noon() {
        let mut progress = UserProgress::new("u1");
        assert!(check_achievements(&mut progress, at(12)).is_empty());
    }

    #[test]
    fn test_threshold_unlocks_once() {
        let mut progress = UserProgress::new("u1");
        progress.total_questions_answered = 10;
        let first = check_achievements(&mut progress, at(12));
        let ids: Vec<_> = first.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["first_steps", "quick_learner"]);

        assert!(check_achievements(&mut progress, at(12)).is_empty());
        assert_eq!(progress.achievements.len(), 2);
    }

    #[test]
    fn test_hour_windows() {
        let mut night = UserProgress::new("u1");
        let unlocked = check_achievements(&mut night, at(23));
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "night_owl");

        let mut late = UserProgress::new("u1");
        assert_eq!(check_achievements(&mut late, at(4))[0].id, "night_owl");

        let mut early = UserProgress::new("u1");
        assert_eq!(check_achievements(&mut early, at(6))[0].id, "early_bird");

        let mut morning = UserProgress::new("u1");
        assert!(check_achievements(&mut morning, at(8)).is_empty());
    }

    #[test]
    fn test_topic_conditions() {
        let mut progress = UserProgress::new("u1");
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        for topic in ["algebra", "biology", "rust"] {
            progress.update_topic(topic, true, Difficulty::Medium, day);
        }
        let ids: Vec<_> = check_achievements(&mut progress, at(12))
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["explorer".to_string()]);

        for _ in 0..20 {
            progress.update_topic("rust", true, Difficulty::Hard, day);
        }
        let ids: Vec<_> = check_achievements(&mut progress, at(12))
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["topic_master".to_string()]);
    }
}
