use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::achievements::{check_achievements, UnlockedAchievement, TIMESTAMP_FORMAT};
use super::integration::{compute_tutor_rewards, motivational_message, TutorInteraction, TutorRewardOutcome};
use super::xp::{calculate_action_xp, calculate_level, find_action, xp_to_next_level, XpContext};
use super::{Difficulty, TopicProgress, UserProgress};
use crate::storage::{progress_key, KeyValueStore};

const MAX_CAS_ATTEMPTS: usize = 5;

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall-clock time; streak days follow the learner's calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct XpOutcome {
    pub xp_gained: u64,
    pub achievement_xp: u64,
    pub leveled_up: bool,
    pub new_achievements: Vec<UnlockedAchievement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpAward {
    pub progress: UserProgress,
    pub leveled_up: bool,
    pub xp_gained: u64,
    /// Bonus XP from achievements unlocked by this award.
    pub achievement_xp: u64,
    pub new_achievements: Vec<UnlockedAchievement>,
    pub xp_to_next_level: u64,
}

impl XpAward {
    fn unchanged(progress: UserProgress) -> Self {
        Self::new(progress, XpOutcome::default())
    }

    pub(crate) fn new(progress: UserProgress, outcome: XpOutcome) -> Self {
        Self {
            xp_to_next_level: xp_to_next_level(progress.xp_points),
            progress,
            leveled_up: outcome.leveled_up,
            xp_gained: outcome.xp_gained,
            achievement_xp: outcome.achievement_xp,
            new_achievements: outcome.new_achievements,
        }
    }
}

/// Per-user XP, streak, topic and achievement bookkeeping.
///
/// Storage failures never reach the caller: reads fall back to a fresh
/// progress record and writes report `false` after logging.
#[derive(Clone)]
pub struct GamificationEngine {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl GamificationEngine {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn timestamp(&self) -> String {
        self.clock.now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// Sets `updated_at`, and `created_at` on first write.
    fn touch(&self, progress: &mut UserProgress) {
        let now = self.timestamp();
        if progress.created_at.is_none() {
            progress.created_at = Some(now.clone());
        }
        progress.updated_at = Some(now);
    }

    pub fn load_progress(&self, user_id: &str) -> UserProgress {
        self.read(user_id).0
    }

    /// Returns the parsed progress together with the raw blob it came from,
    /// which is the expected value for a later compare-and-swap.
    fn read(&self, user_id: &str) -> (UserProgress, Option<String>) {
        let key = progress_key(user_id);
        match self.store.get_item(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<UserProgress>(&raw) {
                Ok(mut progress) => {
                    progress.normalize(user_id);
                    (progress, Some(raw))
                }
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Corrupt progress blob, starting fresh");
                    (UserProgress::new(user_id), Some(raw))
                }
            },
            Ok(None) => (UserProgress::new(user_id), None),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to read progress, starting fresh");
                (UserProgress::new(user_id), None)
            }
        }
    }

    pub fn save_progress(&self, progress: &UserProgress) -> bool {
        let json = match serde_json::to_string(progress) {
            Ok(json) => json,
            Err(e) => {
                warn!(user_id = %progress.user_id, error = %e, "Failed to serialize progress");
                return false;
            }
        };
        match self.store.set_item(&progress_key(&progress.user_id), &json) {
            Ok(()) => true,
            Err(e) => {
                warn!(user_id = %progress.user_id, error = %e, "Failed to save progress");
                false
            }
        }
    }

    /// Read-modify-write with compare-and-swap, retried on conflicting writes.
    ///
    /// `apply` may run more than once. When storage keeps failing the last
    /// computed state is returned unsaved.
    pub fn update_progress<R>(
        &self,
        user_id: &str,
        mut apply: impl FnMut(&mut UserProgress) -> R,
    ) -> (UserProgress, R) {
        let key = progress_key(user_id);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let (mut progress, raw) = self.read(user_id);
            let result = apply(&mut progress);
            self.touch(&mut progress);

            let json = match serde_json::to_string(&progress) {
                Ok(json) => json,
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Failed to serialize progress");
                    return (progress, result);
                }
            };

            match self.store.compare_and_swap(&key, raw.as_deref(), &json) {
                Ok(true) => return (progress, result),
                Ok(false) if attempt < MAX_CAS_ATTEMPTS => {
                    debug!(user_id = %user_id, attempt, "Progress changed underneath, retrying");
                }
                Ok(false) => {
                    warn!(user_id = %user_id, attempts = attempt, "Gave up saving progress after repeated conflicts");
                    return (progress, result);
                }
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Failed to save progress");
                    return (progress, result);
                }
            }
        }
    }

    /// Adds `amount` XP, unlocks achievements and recomputes the level.
    fn grant(&self, progress: &mut UserProgress, amount: u64) -> XpOutcome {
        let old_level = calculate_level(progress.xp_points);
        progress.xp_points = progress.xp_points.saturating_add(amount);
        progress.level = calculate_level(progress.xp_points);

        let new_achievements = check_achievements(progress, self.clock.now());
        let achievement_xp: u64 = new_achievements.iter().map(|a| a.xp_reward).sum();
        progress.xp_points = progress.xp_points.saturating_add(achievement_xp);
        progress.level = calculate_level(progress.xp_points);

        for achievement in &new_achievements {
            info!(user_id = %progress.user_id, achievement = %achievement.id, "Achievement unlocked");
        }

        XpOutcome {
            xp_gained: amount,
            achievement_xp,
            leveled_up: progress.level > old_level,
            new_achievements,
        }
    }

    /// Awards an action to an in-hand progress record and saves it.
    ///
    /// Unknown action keys are logged and leave `progress` untouched.
    pub fn award_xp(&self, progress: &UserProgress, action_key: &str, ctx: &XpContext) -> XpAward {
        let Some(action) = find_action(action_key) else {
            warn!(action = %action_key, "Unknown XP action, ignoring");
            return XpAward::unchanged(progress.clone());
        };

        let mut updated = progress.clone();
        let outcome = self.grant(&mut updated, calculate_action_xp(action, ctx));
        self.touch(&mut updated);
        self.save_progress(&updated);

        info!(
            user_id = %updated.user_id,
            action = %action_key,
            xp = outcome.xp_gained,
            level = updated.level,
            "XP awarded"
        );
        XpAward::new(updated, outcome)
    }

    /// Same as [`award_xp`](Self::award_xp) but loads and saves through
    /// [`update_progress`](Self::update_progress).
    pub fn award_xp_for_user(&self, user_id: &str, action_key: &str, ctx: &XpContext) -> XpAward {
        let Some(action) = find_action(action_key) else {
            warn!(action = %action_key, "Unknown XP action, ignoring");
            return XpAward::unchanged(self.load_progress(user_id));
        };

        let xp = calculate_action_xp(action, ctx);
        let (progress, outcome) = self.update_progress(user_id, |p| self.grant(p, xp));
        info!(user_id = %user_id, action = %action_key, xp, level = progress.level, "XP awarded");
        XpAward::new(progress, outcome)
    }

    pub fn update_topic_progress(
        &self,
        progress: &mut UserProgress,
        topic: &str,
        correct: bool,
        difficulty: Difficulty,
    ) -> TopicProgress {
        progress.update_topic(topic, correct, difficulty, self.today()).clone()
    }

    pub fn update_streak(&self, progress: &mut UserProgress, correct: bool) {
        progress.update_streak(correct, self.today());
    }

    /// Counters, streak, topic progress and answer XP in one write.
    pub fn record_answer(
        &self,
        user_id: &str,
        topic: Option<&str>,
        correct: bool,
        difficulty: Difficulty,
    ) -> XpAward {
        let today = self.today();
        let (progress, outcome) = self.update_progress(user_id, |p| {
            p.record_answer(correct);
            p.update_streak(correct, today);
            if let Some(topic) = topic {
                p.update_topic(topic, correct, difficulty, today);
            }

            let action_key = if correct {
                difficulty.correct_action()
            } else {
                "incorrect_attempt"
            };
            let ctx = XpContext {
                streak: Some(p.streak),
                difficulty: correct.then_some(difficulty),
            };
            let xp = find_action(action_key)
                .map(|a| calculate_action_xp(a, &ctx))
                .unwrap_or(0);
            self.grant(p, xp)
        });

        debug!(user_id = %user_id, correct, streak = progress.streak, "Answer recorded");
        XpAward::new(progress, outcome)
    }

    /// Awards `daily_return` once per day to users seen on an earlier day.
    pub fn start_session(&self, user_id: &str) -> Option<XpAward> {
        let today = self.today();
        if !self.load_progress(user_id).is_returning_on(today) {
            return None;
        }

        let xp = find_action("daily_return")
            .map(|a| calculate_action_xp(a, &XpContext::default()))
            .unwrap_or(0);
        let (progress, outcome) = self.update_progress(user_id, |p| {
            if p.is_returning_on(today) {
                Some(self.grant(p, xp))
            } else {
                None
            }
        });
        outcome.map(|outcome| XpAward::new(progress, outcome))
    }

    pub fn award_tutor_interaction(&self, user_id: &str, interaction: &TutorInteraction) -> TutorRewardOutcome {
        let today = self.today();
        let (progress, (rewards, outcome)) = self.update_progress(user_id, |p| {
            p.record_answer(interaction.correct);
            p.update_streak(interaction.correct, today);
            if let Some(topic) = interaction.topic.as_deref() {
                p.update_topic(
                    topic,
                    interaction.correct,
                    interaction.difficulty.unwrap_or_default(),
                    today,
                );
            }

            let rewards = compute_tutor_rewards(&TutorInteraction {
                streak: p.streak,
                ..interaction.clone()
            });
            let outcome = self.grant(p, rewards.total_xp);
            (rewards, outcome)
        });

        let message = motivational_message(
            outcome.xp_gained + outcome.achievement_xp,
            outcome.leveled_up,
            progress.level,
        );
        info!(user_id = %user_id, xp = outcome.xp_gained, correct = interaction.correct, "Tutor interaction rewarded");

        TutorRewardOutcome {
            rewards,
            award: XpAward::new(progress, outcome),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn engine_with(store: Arc<dyn KeyValueStore>) -> GamificationEngine {
        GamificationEngine::with_clock(store, Arc::new(FixedClock(noon())))
    }

    #[test]
    fn test_award_xp_levels_up() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_with(store.clone());
        let mut progress = UserProgress::new("u1");
        progress.xp_points = 90;

        let award = engine.award_xp(&progress, "easy_correct", &XpContext::with_difficulty(Difficulty::Easy));
        assert_eq!(award.xp_gained, 15);
        assert_eq!(award.progress.xp_points, 105);
        assert_eq!(award.progress.level, 2);
        assert!(award.leveled_up);
        assert!(award.new_achievements.is_empty());
        assert_eq!(award.xp_to_next_level, 95);

        let stored = engine.load_progress("u1");
        assert_eq!(stored.xp_points, 105);
        assert_eq!(stored.created_at.as_deref(), Some("2024-03-01T12:00:00"));
        assert_eq!(stored.updated_at, stored.created_at);
    }

    #[test]
    fn test_award_xp_keeps_existing_created_at() {
        let engine = engine_with(Arc::new(MemoryStore::new()));
        let mut progress = UserProgress::new("u1");
        progress.created_at = Some("2024-01-15T08:30:00".to_string());

        let award = engine.award_xp(&progress, "ask_question", &XpContext::default());
        assert_eq!(award.progress.created_at.as_deref(), Some("2024-01-15T08:30:00"));
        assert_eq!(award.progress.updated_at.as_deref(), Some("2024-03-01T12:00:00"));
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_with(store.clone());
        let progress = UserProgress::new("u1");

        let award = engine.award_xp(&progress, "nonexistent_action", &XpContext::default());
        assert_eq!(award.xp_gained, 0);
        assert!(!award.leveled_up);
        assert!(award.new_achievements.is_empty());
        assert_eq!(award.progress, progress);
        assert!(store.is_empty());
    }

    #[test]
    fn test_record_answer_persists_everything() {
        let engine = engine_with(Arc::new(MemoryStore::new()));
        let award = engine.record_answer("u1", Some("algebra"), true, Difficulty::Medium);

        // 25 * 1.5, plus first_steps
        assert_eq!(award.xp_gained, 38);
        assert_eq!(award.achievement_xp, 10);
        assert_eq!(award.new_achievements[0].id, "first_steps");

        let stored = engine.load_progress("u1");
        assert_eq!(stored.xp_points, 48);
        assert_eq!(stored.streak, 1);
        assert_eq!(stored.total_correct_answers, 1);
        assert_eq!(stored.topic_progress["algebra"].questions_answered, 1);
        assert!(stored.created_at.is_some());
    }

    #[test]
    fn test_incorrect_answer_gets_effort_xp() {
        let engine = engine_with(Arc::new(MemoryStore::new()));
        let award = engine.record_answer("u1", None, false, Difficulty::Hard);
        assert_eq!(award.xp_gained, 5);
        assert_eq!(award.progress.total_questions_answered, 1);
        assert_eq!(award.progress.total_correct_answers, 0);
    }

    #[test]
    fn test_start_session_awards_daily_return_once() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut progress = UserProgress::new("u1");
        progress.updated_at = Some("2024-02-28T09:00:00".to_string());
        store
            .set_item(&progress_key("u1"), &serde_json::to_string(&progress).unwrap())
            .unwrap();

        let engine = engine_with(store);
        let award = engine.start_session("u1").unwrap();
        assert_eq!(award.xp_gained, 20);
        assert!(engine.start_session("u1").is_none());
        assert!(engine.start_session("brand_new").is_none());
    }

    /// Succeeds on CAS only after a number of simulated concurrent writes.
    struct ContendedStore {
        inner: MemoryStore,
        conflicts: AtomicUsize,
    }

    impl KeyValueStore for ContendedStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }

        fn clear(&self) -> Result<(), StorageError> {
            self.inner.clear()
        }

        fn compare_and_swap(&self, key: &str, expected: Option<&str>, new: &str) -> Result<bool, StorageError> {
            if self.conflicts.load(Ordering::SeqCst) > 0 {
                self.conflicts.fetch_sub(1, Ordering::SeqCst);
                return Ok(false);
            }
            self.inner.compare_and_swap(key, expected, new)
        }
    }

    #[test]
    fn test_update_progress_retries_on_conflict() {
        let store = Arc::new(ContendedStore {
            inner: MemoryStore::new(),
            conflicts: AtomicUsize::new(2),
        });
        let engine = engine_with(store.clone());
        let mut calls = 0;
        let (progress, _) = engine.update_progress("u1", |p| {
            calls += 1;
            p.xp_points += 10;
        });
        assert_eq!(calls, 3);
        assert_eq!(progress.xp_points, 10);
        assert_eq!(engine.load_progress("u1").xp_points, 10);
    }

    #[test]
    fn test_tutor_interaction_updates_progress() {
        let engine = engine_with(Arc::new(MemoryStore::new()));
        let outcome = engine.award_tutor_interaction(
            "u1",
            &TutorInteraction {
                correct: true,
                topic: Some("biology".to_string()),
                ..Default::default()
            },
        );
        assert!(outcome.award.xp_gained > 0);
        assert_eq!(outcome.award.progress.streak, 1);
        assert!(!outcome.message.is_empty());
        assert_eq!(engine.load_progress("u1").topic_progress.len(), 1);
    }
}
