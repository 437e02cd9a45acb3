use serde::{Deserialize, Serialize};

use super::Difficulty;

pub const XP_PER_LEVEL: u64 = 100;
/// Streak multipliers only kick in above this many days.
pub const STREAK_BONUS_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpAction {
    pub key: &'static str,
    pub xp: u64,
    pub streak_multiplier: f64,
    pub description: &'static str,
}

const fn action(key: &'static str, xp: u64, streak_multiplier: f64, description: &'static str) -> XpAction {
    XpAction {
        key,
        xp,
        streak_multiplier,
        description,
    }
}

pub static XP_ACTIONS: &[XpAction] = &[
    action("easy_correct", 15, 1.2, "Answered an easy question correctly"),
    action("medium_correct", 25, 1.3, "Answered a medium question correctly"),
    action("hard_correct", 40, 1.5, "Answered a hard question correctly"),
    action("incorrect_attempt", 5, 1.0, "Gave it a try"),
    action("daily_return", 20, 1.5, "Came back for another day"),
    action("streak_bonus", 10, 2.0, "Kept the streak alive"),
    action("topic_mastered", 100, 1.0, "Mastered a topic"),
    action("flashcard_review", 5, 1.1, "Reviewed a flashcard"),
    action("quiz_completed", 50, 1.2, "Finished a quiz"),
    action("perfect_quiz", 100, 1.5, "Finished a quiz without mistakes"),
    action("notes_generated", 10, 1.0, "Generated study notes"),
    action("ask_question", 5, 1.0, "Asked the tutor a question"),
];

pub fn find_action(key: &str) -> Option<&'static XpAction> {
    XP_ACTIONS.iter().find(|a| a.key == key)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct XpContext {
    pub streak: Option<u32>,
    pub difficulty: Option<Difficulty>,
}

impl XpContext {
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty: Some(difficulty),
            ..Default::default()
        }
    }
}

pub fn calculate_level(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL).unwrap_or(u32::MAX - 1) + 1
}

pub fn xp_to_next_level(xp: u64) -> u64 {
    XP_PER_LEVEL - xp % XP_PER_LEVEL
}

pub fn calculate_action_xp(action: &XpAction, ctx: &XpContext) -> u64 {
    let mut xp = action.xp as f64;
    if ctx.streak.is_some_and(|s| s > STREAK_BONUS_THRESHOLD) {
        xp *= action.streak_multiplier;
    }
    if let Some(difficulty) = ctx.difficulty {
        xp *= difficulty.xp_multiplier();
    }
    xp.round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(99), 1);
        assert_eq!(calculate_level(100), 2);
        assert_eq!(calculate_level(105), 2);
        assert_eq!(calculate_level(1999), 20);
        assert_eq!(xp_to_next_level(105), 95);
    }

    #[test]
    fn test_find_action() {
        assert_eq!(find_action("hard_correct").map(|a| a.xp), Some(40));
        assert!(find_action("nonexistent_action").is_none());
    }

    #[test]
    fn test_multipliers() {
        let easy = find_action("easy_correct").unwrap();
        assert_eq!(calculate_action_xp(easy, &XpContext::default()), 15);
        assert_eq!(calculate_action_xp(easy, &XpContext::with_difficulty(Difficulty::Easy)), 15);

        let hard = find_action("hard_correct").unwrap();
        let ctx = XpContext {
            streak: Some(3),
            difficulty: Some(Difficulty::Hard),
        };
        // 40 * 1.5 * 2
        assert_eq!(calculate_action_xp(hard, &ctx), 120);

        let short_streak = XpContext {
            streak: Some(2),
            difficulty: None,
        };
        assert_eq!(calculate_action_xp(hard, &short_streak), 40);
    }
}
