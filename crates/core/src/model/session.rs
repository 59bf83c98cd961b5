use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{GroupId, OptionId, QuestionId};
use crate::model::limit::QuestionLimit;
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("no session in progress")]
    NotInProgress,

    #[error("current question was already answered")]
    AlreadyAnswered,

    #[error("current question has not been answered yet")]
    NotAnswered,

    #[error("option {0} does not belong to the current question")]
    UnknownOption(OptionId),

    #[error("current index {index} is past the question count {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("score {score} exceeds answered question count {answered}")]
    ScoreExceedsProgress { score: usize, answered: usize },
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("invalid session snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    State(#[from] SessionStateError),
}

//
// ─── ANSWER FEEDBACK ───────────────────────────────────────────────────────────
//

/// Outcome of the single accepted answer for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub chosen: OptionId,
    pub correct: OptionId,
    pub is_correct: bool,
}

/// How an option is highlighted once the question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Neutral,
    Correct,
    Incorrect,
}

impl AnswerFeedback {
    /// The correct option is always revealed; a wrong choice is marked incorrect.
    #[must_use]
    pub fn mark(&self, option: OptionId) -> OptionMark {
        if option == self.correct {
            OptionMark::Correct
        } else if option == self.chosen {
            OptionMark::Incorrect
        } else {
            OptionMark::Neutral
        }
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Mutable state of one quiz attempt.
///
/// Invariants: `score <= current_index <= questions.len()`. The score for the
/// current question is committed when the session advances past it, so the
/// invariant holds between an answer and the following advance as well;
/// `live_score` includes the pending point for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    selected_groups: Vec<GroupId>,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    limit: QuestionLimit,
    in_progress: bool,
    answered: Option<OptionId>,
    started_at: Option<DateTime<Utc>>,
}

impl SessionState {
    #[must_use]
    pub fn new(limit: QuestionLimit) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Install a fresh working set and reset progress.
    pub fn begin(
        &mut self,
        selected_groups: Vec<GroupId>,
        questions: Vec<Question>,
        limit: QuestionLimit,
        started_at: DateTime<Utc>,
    ) {
        self.selected_groups = selected_groups;
        self.questions = questions;
        self.current_index = 0;
        self.score = 0;
        self.limit = limit;
        self.in_progress = true;
        self.answered = None;
        self.started_at = Some(started_at);
    }

    #[must_use]
    pub fn selected_groups(&self) -> &[GroupId] {
        &self.selected_groups
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Score including a correct answer on the current, not yet advanced, question.
    #[must_use]
    pub fn live_score(&self) -> usize {
        match self.feedback() {
            Some(feedback) if feedback.is_correct => self.score + 1,
            _ => self.score,
        }
    }

    #[must_use]
    pub fn limit(&self) -> QuestionLimit {
        self.limit
    }

    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.in_progress {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    /// Feedback for the current question, if it has been answered.
    #[must_use]
    pub fn feedback(&self) -> Option<AnswerFeedback> {
        let chosen = self.answered?;
        let question = self.current_question()?;
        Some(AnswerFeedback {
            question_id: question.id(),
            chosen,
            correct: question.correct_option(),
            is_correct: question.is_correct(chosen),
        })
    }

    /// Accept the single answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `NotInProgress` when there is no current question,
    /// `AlreadyAnswered` on a second answer and `UnknownOption` when the id is
    /// not one of the current question's options.
    pub fn answer(&mut self, option: OptionId) -> Result<AnswerFeedback, SessionStateError> {
        let question = self
            .current_question()
            .ok_or(SessionStateError::NotInProgress)?;
        if self.answered.is_some() {
            return Err(SessionStateError::AlreadyAnswered);
        }
        if question.option(option).is_none() {
            return Err(SessionStateError::UnknownOption(option));
        }
        self.answered = Some(option);
        self.feedback().ok_or(SessionStateError::NotInProgress)
    }

    /// Commit the current answer and move to the next question.
    ///
    /// Returns `true` while another question remains; on `false` the session is
    /// no longer in progress.
    ///
    /// # Errors
    ///
    /// Returns `NotInProgress` or `NotAnswered`.
    pub fn advance(&mut self) -> Result<bool, SessionStateError> {
        if !self.in_progress {
            return Err(SessionStateError::NotInProgress);
        }
        let feedback = self.feedback().ok_or(SessionStateError::NotAnswered)?;
        if feedback.is_correct {
            self.score += 1;
        }
        self.answered = None;
        self.current_index += 1;
        if self.is_exhausted() {
            self.in_progress = false;
            return Ok(false);
        }
        Ok(true)
    }

    /// Ends a session that has no question left to show.
    pub fn finish(&mut self) {
        self.answered = None;
        self.in_progress = false;
    }

    /// Clear everything that belongs to one session; the limit is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.limit);
    }

    /// Check the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check(&self) -> Result<(), SessionStateError> {
        let len = self.questions.len();
        if self.current_index > len {
            return Err(SessionStateError::IndexOutOfRange {
                index: self.current_index,
                len,
            });
        }
        if self.score > self.current_index {
            return Err(SessionStateError::ScoreExceedsProgress {
                score: self.score,
                answered: self.current_index,
            });
        }
        if let Some(chosen) = self.answered {
            let question = self
                .current_question()
                .ok_or(SessionStateError::NotInProgress)?;
            if question.option(chosen).is_none() {
                return Err(SessionStateError::UnknownOption(chosen));
            }
        }
        Ok(())
    }
}

//
// ─── PERSISTED SNAPSHOT ────────────────────────────────────────────────────────
//

/// Serialized form of `SessionState`, written after every mutating transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub selected_groups: Vec<GroupId>,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub score: usize,
    pub limit: QuestionLimit,
    pub in_progress: bool,
    #[serde(default)]
    pub answered: Option<OptionId>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    ///
    /// Returns `SnapshotError::Json` for malformed payloads.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild the session, re-checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::State` for an inconsistent snapshot.
    pub fn into_state(self) -> Result<SessionState, SnapshotError> {
        SessionState::try_from(self)
    }
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        Self {
            selected_groups: state.selected_groups.clone(),
            questions: state.questions.clone(),
            current_index: state.current_index,
            score: state.score,
            limit: state.limit,
            in_progress: state.in_progress,
            answered: state.answered,
            started_at: state.started_at,
        }
    }
}

impl TryFrom<SessionSnapshot> for SessionState {
    type Error = SnapshotError;

    fn try_from(snapshot: SessionSnapshot) -> Result<Self, Self::Error> {
        let state = Self {
            selected_groups: snapshot.selected_groups,
            questions: snapshot.questions,
            current_index: snapshot.current_index,
            score: snapshot.score,
            limit: snapshot.limit,
            in_progress: snapshot.in_progress,
            answered: snapshot.answered,
            started_at: snapshot.started_at,
        };
        state.check()?;
        Ok(state)
    }
}
