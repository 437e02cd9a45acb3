use std::io::{self, BufRead, Write};
use std::sync::Arc;

use serde::Deserialize;

use futuropal_engine::config::{Config, StorageBackend};
use futuropal_engine::gamification::XpContext;
use futuropal_engine::logging;
use futuropal_engine::storage::{FileStore, KeyValueStore, MemoryStore};
use futuropal_engine::{assemble, AnalysisRequest, GamificationEngine, SessionTracker, StudentHistory, TutorResponse};

/// One stdin line: either plain message text or a JSON request. A `correct`
/// field marks the turn as a graded answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatTurn {
    #[serde(flatten)]
    request: AnalysisRequest,
    #[serde(default)]
    correct: Option<bool>,
}

fn parse_turn(line: &str) -> ChatTurn {
    if line.trim_start().starts_with('{') {
        match serde_json::from_str::<ChatTurn>(line) {
            Ok(turn) => return turn,
            Err(e) => tracing::warn!(error = %e, "Line looks like JSON but did not parse, treating as text"),
        }
    }
    ChatTurn {
        request: AnalysisRequest::new(line),
        correct: None,
    }
}

fn open_store(backend: &StorageBackend) -> Arc<dyn KeyValueStore> {
    match backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File(dir) => match FileStore::open(dir) {
            Ok(store) => {
                tracing::info!(dir = %store.dir().display(), "Using file storage");
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "File storage unavailable, progress will not persist");
                Arc::new(MemoryStore::new())
            }
        },
    }
}

fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    let engine = GamificationEngine::new(open_store(&config.storage));
    let user_id = config.user_id.as_str();

    if let Some(award) = engine.start_session(user_id) {
        tracing::info!(user_id = %user_id, xp = award.xp_gained, "Welcome back bonus");
    }

    let progress = engine.load_progress(user_id);
    let mut history = StudentHistory::new(user_id);
    history.streak_days = progress.streak;
    history.total_questions_answered = progress.total_questions_answered;
    history.total_correct_answers = progress.total_correct_answers;
    let mut session = SessionTracker::new(history);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let mut turn = parse_turn(&line);
        if turn.request.history.is_none() {
            turn.request.history = Some(session.history().clone());
        }
        let insights = assemble(&turn.request);
        session.record_turn(insights.confidence.score, insights.topic.subject.as_deref(), turn.correct);

        let rewards = match turn.correct {
            Some(correct) => {
                let outcome = engine.award_tutor_interaction(user_id, &insights.interaction(correct));
                session.set_streak(outcome.award.progress.streak);
                Some(outcome)
            }
            None => {
                let streak = engine.load_progress(user_id).streak;
                let ctx = XpContext {
                    streak: Some(streak),
                    difficulty: None,
                };
                engine.award_xp_for_user(user_id, "ask_question", &ctx);
                None
            }
        };

        let response = TutorResponse { insights, rewards };
        let json = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response");
                continue;
            }
        };
        if let Err(e) = writeln!(stdout, "{json}") {
            tracing::error!(error = %e, "Failed to write response");
            break;
        }
    }

    let turns = session.turns();
    let history = session.finish();
    tracing::info!(
        user_id = %user_id,
        turns,
        sessions = history.total_sessions,
        average_confidence = history.average_confidence,
        "Session finished"
    );
}
