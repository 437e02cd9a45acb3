use serde::{Deserialize, Serialize};

pub const RECENT_PERFORMANCE_LIMIT: usize = 10;
const TOPIC_HISTORY_LIMIT: usize = 50;
const TREND_RECENT: usize = 3;

/// Long-lived learner record owned by the session layer.
///
/// Classifiers only ever borrow it; `record_*` are for the progress tracker
/// that owns the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentHistory {
    pub user_id: String,
    pub total_sessions: u32,
    /// 0-100.
    pub average_confidence: f64,
    /// 0-100 scores, oldest first, at most `RECENT_PERFORMANCE_LIMIT`.
    pub recent_performance: Vec<f64>,
    pub topic_history: Vec<String>,
    pub streak_days: u32,
    pub total_questions_answered: u64,
    pub total_correct_answers: u64,
}

impl StudentHistory {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn has_sessions(&self) -> bool {
        self.total_sessions > 0
    }

    pub fn record_performance(&mut self, score: f64) {
        self.recent_performance.push(score.clamp(0.0, 100.0));
        if self.recent_performance.len() > RECENT_PERFORMANCE_LIMIT {
            let excess = self.recent_performance.len() - RECENT_PERFORMANCE_LIMIT;
            self.recent_performance.drain(..excess);
        }
    }

    pub fn record_answer(&mut self, correct: bool) {
        self.total_questions_answered += 1;
        if correct {
            self.total_correct_answers += 1;
        }
    }

    /// Running mean, so a session's confidence counts once.
    pub fn record_session(&mut self, confidence: f64) {
        let n = self.total_sessions as f64;
        self.average_confidence = (self.average_confidence * n + confidence.clamp(0.0, 100.0)) / (n + 1.0);
        self.total_sessions += 1;
    }

    pub fn record_topic(&mut self, topic: &str) {
        if self.topic_history.last().map(String::as_str) == Some(topic) {
            return;
        }
        self.topic_history.push(topic.to_string());
        if self.topic_history.len() > TOPIC_HISTORY_LIMIT {
            self.topic_history.remove(0);
        }
    }

    pub fn recent_average(&self) -> Option<f64> {
        mean(&self.recent_performance)
    }

    pub fn lifetime_accuracy(&self) -> Option<f64> {
        (self.total_questions_answered > 0)
            .then(|| self.total_correct_answers as f64 / self.total_questions_answered as f64)
    }

    /// Mean of the last three scores minus the mean of the earlier ones.
    /// Needs at least one earlier score.
    pub fn performance_trend(&self) -> Option<f64> {
        let values = &self.recent_performance;
        if values.len() <= TREND_RECENT {
            return None;
        }
        let split = values.len() - TREND_RECENT;
        Some(mean(&values[split..])? - mean(&values[..split])?)
    }

    /// Recent accuracy against lifetime accuracy, in [-1, 1].
    pub fn learning_velocity(&self) -> Option<f64> {
        let recent = self.recent_average()? / 100.0;
        let lifetime = self.lifetime_accuracy()?;
        Some((recent - lifetime).clamp(-1.0, 1.0))
    }
}

/// Accumulates one run of turns on top of a [`StudentHistory`].
///
/// Answers, scores and topics land in the history as each turn arrives. The
/// session itself is recorded once, by `finish`, with the mean confidence of
/// the run.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    history: StudentHistory,
    confidence_sum: f64,
    turns: u32,
}

impl SessionTracker {
    pub fn new(history: StudentHistory) -> Self {
        Self {
            history,
            confidence_sum: 0.0,
            turns: 0,
        }
    }

    pub fn history(&self) -> &StudentHistory {
        &self.history
    }

    pub fn set_streak(&mut self, days: u32) {
        self.history.streak_days = days;
    }

    pub fn record_turn(&mut self, confidence: f64, subject: Option<&str>, correct: Option<bool>) {
        self.confidence_sum += confidence.clamp(0.0, 100.0);
        self.turns += 1;
        if let Some(subject) = subject {
            self.history.record_topic(subject);
        }
        if let Some(correct) = correct {
            self.history.record_answer(correct);
            self.history.record_performance(if correct { 100.0 } else { 0.0 });
        }
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn mean_confidence(&self) -> Option<f64> {
        (self.turns > 0).then(|| self.confidence_sum / self.turns as f64)
    }

    /// Closes the run. A run without turns leaves the session count alone.
    pub fn finish(mut self) -> StudentHistory {
        if let Some(confidence) = self.mean_confidence() {
            self.history.record_session(confidence);
        }
        self.history
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}
