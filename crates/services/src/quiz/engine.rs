use std::fmt;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use quiz_core::model::{
    AnswerFeedback, GroupId, OptionId, Question, QuestionLimit, QuizConfig, SessionSnapshot,
    SessionState,
};
use quiz_core::{Clock, shuffle};

use super::view::QuestionView;
use crate::error::{LoadError, QuizError};

/// Externally visible phase of the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    Loading,
    InProgress,
    Completed,
}

impl QuizPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuizPhase::Idle => "idle",
            QuizPhase::Loading => "loading",
            QuizPhase::InProgress => "in progress",
            QuizPhase::Completed => "completed",
        }
    }
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// Share of correct answers in percent; 0 for an empty session.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.score as f64 / self.total as f64;
        ratio * 100.0
    }
}

impl fmt::Display for QuizResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.total)
    }
}

/// Outcome of moving past an answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Index of the question now shown.
    Next(usize),
    Completed(QuizResult),
}

/// Ticket handed out by `begin_start`; pass it back with the load outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    groups: Vec<GroupId>,
    generation: u64,
}

impl LoadRequest {
    #[must_use]
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct PendingStart {
    groups: Vec<GroupId>,
    limit: QuestionLimit,
    generation: u64,
}

/// The quiz state machine: `Idle → Loading → InProgress → Completed → Idle`.
///
/// Owns the session; every mutation goes through one of the transitions below.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    config: QuizConfig,
    clock: Clock,
    rng: StdRng,
    state: SessionState,
    phase: QuizPhase,
    pending: Option<PendingStart>,
    result: Option<QuizResult>,
    generation: u64,
}

impl QuizEngine {
    #[must_use]
    pub fn new(config: QuizConfig) -> Self {
        Self {
            config,
            clock: Clock::default_clock(),
            rng: StdRng::from_os_rng(),
            state: SessionState::new(QuestionLimit::UNLIMITED),
            phase: QuizPhase::Idle,
            pending: None,
            result: None,
            generation: 0,
        }
    }

    /// Use a deterministic shuffle.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> QuizConfig {
        self.config
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == QuizPhase::Loading
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.state.current_question()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<AnswerFeedback> {
        self.state.feedback()
    }

    /// Presentation of the current question, if one is on screen.
    #[must_use]
    pub fn view(&self) -> Option<QuestionView> {
        QuestionView::from_state(&self.state)
    }

    /// Idle → Loading.
    ///
    /// `chosen` is the user's limit; the configured `LimitMode` decides whether
    /// it applies.
    ///
    /// # Errors
    ///
    /// Returns `Selection` for an empty selection, `Busy` while a load is in
    /// flight and `InvalidPhase` once a session is running.
    pub fn begin_start(
        &mut self,
        groups: &[GroupId],
        chosen: QuestionLimit,
    ) -> Result<LoadRequest, QuizError> {
        match self.phase {
            QuizPhase::Idle => {}
            QuizPhase::Loading => return Err(QuizError::Busy),
            phase => {
                return Err(QuizError::InvalidPhase {
                    action: "start",
                    phase: phase.as_str(),
                });
            }
        }
        if groups.is_empty() {
            return Err(QuizError::Selection);
        }

        self.generation += 1;
        let limit = self.config.limit_mode.effective(chosen);
        self.pending = Some(PendingStart {
            groups: groups.to_vec(),
            limit,
            generation: self.generation,
        });
        self.phase = QuizPhase::Loading;
        debug!(groups = groups.len(), %limit, "loading questions");

        Ok(LoadRequest {
            groups: groups.to_vec(),
            generation: self.generation,
        })
    }

    /// Loading → InProgress, or back to Idle when the load failed or came
    /// back empty.
    ///
    /// # Errors
    ///
    /// Returns `StaleLoad` if `request` is not the pending start (the engine
    /// is left untouched), `Load` or `EmptyResult` otherwise.
    pub fn finish_start(
        &mut self,
        request: LoadRequest,
        loaded: Result<Vec<Question>, LoadError>,
    ) -> Result<(), QuizError> {
        let matches = self
            .pending
            .as_ref()
            .is_some_and(|p| p.generation == request.generation);
        if self.phase != QuizPhase::Loading || !matches {
            return Err(QuizError::StaleLoad);
        }
        let Some(pending) = self.pending.take() else {
            return Err(QuizError::StaleLoad);
        };
        self.phase = QuizPhase::Idle;

        let mut questions = loaded?;
        if questions.is_empty() {
            return Err(QuizError::EmptyResult);
        }

        shuffle(&mut questions, &mut self.rng);
        let keep = pending.limit.apply(questions.len());
        questions.truncate(keep);

        let started_at = self.clock.now();
        self.state
            .begin(pending.groups, questions, pending.limit, started_at);
        self.result = None;
        self.phase = QuizPhase::InProgress;
        info!(
            questions = self.state.total(),
            limit = %pending.limit,
            "quiz started"
        );
        Ok(())
    }

    /// Accept the one answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` outside a session and `Session` when the
    /// question is already answered or the option is unknown.
    pub fn answer(&mut self, option: OptionId) -> Result<AnswerFeedback, QuizError> {
        self.require_in_progress("answer")?;
        let feedback = self.state.answer(option)?;
        debug!(
            question = %feedback.question_id,
            chosen = %option,
            correct = feedback.is_correct,
            "answer accepted"
        );
        Ok(feedback)
    }

    /// Move past the answered question, completing the session after the last.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` outside a session and `Session` before an answer.
    pub fn advance(&mut self) -> Result<Advance, QuizError> {
        self.require_in_progress("advance")?;
        if self.state.advance()? {
            Ok(Advance::Next(self.state.current_index()))
        } else {
            Ok(Advance::Completed(self.complete()))
        }
    }

    /// Back to Idle from any phase. Selection, questions and progress are
    /// dropped; configuration and the limit stay. An in-flight load is
    /// orphaned and its result will be rejected as stale.
    pub fn restart(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.result = None;
        self.state.reset();
        self.phase = QuizPhase::Idle;
        debug!("quiz reset");
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&self.state)
    }

    /// Replace the session with a persisted one.
    ///
    /// A snapshot that is not in progress yields Idle; an in-progress snapshot
    /// with no question left completes at once.
    ///
    /// # Errors
    ///
    /// Returns `Busy` while a load is in flight and `Snapshot` for a
    /// snapshot that breaks the session invariants.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<QuizPhase, QuizError> {
        if self.phase == QuizPhase::Loading {
            return Err(QuizError::Busy);
        }
        let state = snapshot.into_state()?;
        self.result = None;

        if !state.in_progress() {
            self.state = SessionState::new(state.limit());
            self.phase = QuizPhase::Idle;
        } else if state.is_exhausted() {
            self.state = state;
            self.state.finish();
            self.complete();
        } else {
            self.state = state;
            self.phase = QuizPhase::InProgress;
            info!(
                question = self.state.current_index() + 1,
                total = self.state.total(),
                "quiz resumed"
            );
        }
        Ok(self.phase)
    }

    fn complete(&mut self) -> QuizResult {
        let completed_at = self.clock.now();
        let result = QuizResult {
            score: self.state.score(),
            total: self.state.total(),
            started_at: self.state.started_at().unwrap_or(completed_at),
            completed_at,
        };
        self.result = Some(result);
        self.phase = QuizPhase::Completed;
        info!(score = result.score, total = result.total, "quiz completed");
        result
    }

    fn require_in_progress(&self, action: &'static str) -> Result<(), QuizError> {
        if self.phase == QuizPhase::InProgress {
            Ok(())
        } else {
            Err(QuizError::InvalidPhase {
                action,
                phase: self.phase.as_str(),
            })
        }
    }
}
