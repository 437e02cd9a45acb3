//! Reward calculation for tutor-chat turns.
//!
//! Layered on the same progress record as the rest of the engine; only the XP
//! amount and the copy shown to the learner differ.

use serde::{Deserialize, Serialize};

use super::engine::XpAward;
use super::Difficulty;
use crate::confidence::PatienceTier;
use crate::emotion::EmotionalState;

const CORRECT_BASE_XP: u64 = 20;
const EFFORT_BASE_XP: u64 = 8;
const LOW_CONFIDENCE: f64 = 50.0;
const VERY_LOW_CONFIDENCE: f64 = 30.0;
const STREAK_BONUS_MIN: u32 = 3;
const STREAK_BONUS_CAP: u32 = 10;
const STREAK_BONUS_PER_DAY: f64 = 0.05;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TutorInteraction {
    pub correct: bool,
    pub difficulty: Option<Difficulty>,
    /// Estimated confidence 0-100 at the time of the turn.
    pub confidence: Option<f64>,
    pub streak: u32,
    pub emotion: Option<EmotionalState>,
    pub patience: Option<PatienceTier>,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpBonus {
    pub label: &'static str,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorRewards {
    pub base_xp: u64,
    pub bonuses: Vec<XpBonus>,
    pub total_multiplier: f64,
    pub total_xp: u64,
    pub achievement_hints: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorRewardOutcome {
    pub rewards: TutorRewards,
    pub award: XpAward,
    pub message: String,
}

pub fn compute_tutor_rewards(interaction: &TutorInteraction) -> TutorRewards {
    let base_xp = if interaction.correct {
        CORRECT_BASE_XP
    } else {
        EFFORT_BASE_XP
    };
    let mut bonuses = Vec::new();

    match interaction.difficulty {
        Some(Difficulty::Medium) => bonuses.push(XpBonus {
            label: "Challenge bonus",
            multiplier: 1.25,
        }),
        Some(Difficulty::Hard) => bonuses.push(XpBonus {
            label: "Challenge bonus",
            multiplier: 1.5,
        }),
        _ => {}
    }

    if interaction.confidence.is_some_and(|c| c < LOW_CONFIDENCE) {
        bonuses.push(if interaction.correct {
            XpBonus {
                label: "Pushed through doubt",
                multiplier: 1.3,
            }
        } else {
            XpBonus {
                label: "Kept trying",
                multiplier: 1.2,
            }
        });
    }

    if interaction.streak >= STREAK_BONUS_MIN {
        bonuses.push(XpBonus {
            label: "Streak bonus",
            multiplier: 1.0 + interaction.streak.min(STREAK_BONUS_CAP) as f64 * STREAK_BONUS_PER_DAY,
        });
    }

    if interaction.correct && interaction.emotion.is_some_and(|e| e.is_negative()) {
        bonuses.push(XpBonus {
            label: "Emotional resilience",
            multiplier: 1.2,
        });
    }

    if matches!(interaction.patience, Some(PatienceTier::High | PatienceTier::Maximum)) {
        bonuses.push(XpBonus {
            label: "Perseverance",
            multiplier: 1.15,
        });
    }

    let total_multiplier: f64 = bonuses.iter().map(|b| b.multiplier).product();
    let total_xp = (base_xp as f64 * total_multiplier).round() as u64;

    let mut achievement_hints = Vec::new();
    if interaction.correct && interaction.confidence.is_some_and(|c| c < VERY_LOW_CONFIDENCE) {
        achievement_hints.push("Brave Learner");
    }
    if interaction.correct && interaction.emotion == Some(EmotionalState::Frustrated) {
        achievement_hints.push("Comeback Kid");
    }
    if interaction.streak >= 5 {
        achievement_hints.push("Hot Streak");
    }

    TutorRewards {
        base_xp,
        bonuses,
        total_multiplier,
        total_xp,
        achievement_hints,
    }
}

const BIG_GAIN: &[&str] = &[
    "Incredible work! +{xp} XP 🚀",
    "You're on a roll! +{xp} XP earned 🌟",
    "Huge progress! +{xp} XP 💪",
];
const SOLID_GAIN: &[&str] = &[
    "Great job! +{xp} XP ✨",
    "Nice thinking! +{xp} XP 👏",
    "Well done! +{xp} XP 🎯",
];
const SMALL_GAIN: &[&str] = &[
    "Good effort! +{xp} XP 👍",
    "Keep it up! +{xp} XP 📚",
];
const EFFORT: &[&str] = &[
    "Every step counts. +{xp} XP 🌱",
    "Learning takes practice. +{xp} XP 💡",
];

/// Picks a template by XP bracket. Selection inside a bracket is
/// deterministic in `xp_gained`.
pub fn motivational_message(xp_gained: u64, leveled_up: bool, level: u32) -> String {
    if leveled_up {
        return format!("Level up! You reached level {level}. +{xp_gained} XP 🎉");
    }
    let templates = match xp_gained {
        50.. => BIG_GAIN,
        25..=49 => SOLID_GAIN,
        10..=24 => SMALL_GAIN,
        _ => EFFORT,
    };
    let template = templates[xp_gained as usize % templates.len()];
    template.replace("{xp}", &xp_gained.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_correct_answer() {
        let rewards = compute_tutor_rewards(&TutorInteraction {
            correct: true,
            ..Default::default()
        });
        assert_eq!(rewards.base_xp, 20);
        assert!(rewards.bonuses.is_empty());
        assert_eq!(rewards.total_xp, 20);
    }

    #[test]
    fn test_bonuses_stack() {
        let rewards = compute_tutor_rewards(&TutorInteraction {
            correct: true,
            difficulty: Some(Difficulty::Hard),
            confidence: Some(20.0),
            streak: 5,
            emotion: Some(EmotionalState::Frustrated),
            patience: Some(PatienceTier::Maximum),
            topic: None,
        });
        let labels: Vec<_> = rewards.bonuses.iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            vec![
                "Challenge bonus",
                "Pushed through doubt",
                "Streak bonus",
                "Emotional resilience",
                "Perseverance"
            ]
        );
        // 20 * 1.5 * 1.3 * 1.25 * 1.2 * 1.15
        assert_eq!(rewards.total_xp, 67);
        assert_eq!(rewards.achievement_hints, vec!["Brave Learner", "Comeback Kid", "Hot Streak"]);
    }

    #[test]
    fn test_wrong_answer_effort() {
        let rewards = compute_tutor_rewards(&TutorInteraction {
            correct: false,
            confidence: Some(40.0),
            emotion: Some(EmotionalState::Anxious),
            ..Default::default()
        });
        assert_eq!(rewards.base_xp, 8);
        // no resilience bonus without a correct answer
        assert_eq!(rewards.bonuses.len(), 1);
        assert_eq!(rewards.total_xp, 10);
    }

    #[test]
    fn test_motivational_message_brackets() {
        assert!(motivational_message(120, true, 3).starts_with("Level up! You reached level 3."));
        assert!(motivational_message(60, false, 1).contains("+60 XP"));
        assert!(SOLID_GAIN.iter().any(|t| t.replace("{xp}", "30") == motivational_message(30, false, 1)));
        assert!(EFFORT.iter().any(|t| t.replace("{xp}", "5") == motivational_message(5, false, 1)));
    }
}
