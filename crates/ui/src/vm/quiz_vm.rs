use quiz_core::model::{GroupId, OptionId, Question, QuestionLimit};
use services::{
    Advance, LoadError, LoadRequest, QuestionView, QuizEngine, QuizError, QuizPhase, QuizResult,
};

use crate::views::ViewError;

/// UI wrapper over the engine; errors come back as `ViewError`.
#[derive(Clone, Debug)]
pub struct QuizVm {
    engine: QuizEngine,
}

impl QuizVm {
    #[must_use]
    pub fn new(engine: QuizEngine) -> Self {
        Self { engine }
    }

    #[must_use]
    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.engine.phase()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.engine.is_loading()
    }

    #[must_use]
    pub fn question(&self) -> Option<QuestionView> {
        self.engine.view()
    }

    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        self.engine.result().copied()
    }

    /// # Errors
    ///
    /// Returns `ViewError::NoSelection` or `ViewError::Busy`.
    pub fn begin_start(
        &mut self,
        groups: &[GroupId],
        limit: QuestionLimit,
    ) -> Result<LoadRequest, ViewError> {
        self.engine
            .begin_start(groups, limit)
            .map_err(|err| ViewError::from(&err))
    }

    /// Returns `Ok(false)` when a restart made the load obsolete.
    ///
    /// # Errors
    ///
    /// Returns the load or empty-result error to show on the start screen.
    pub fn finish_start(
        &mut self,
        request: LoadRequest,
        loaded: Result<Vec<Question>, LoadError>,
    ) -> Result<bool, ViewError> {
        match self.engine.finish_start(request, loaded) {
            Ok(()) => Ok(true),
            Err(QuizError::StaleLoad) => Ok(false),
            Err(err) => Err(ViewError::from(&err)),
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the answer is not accepted.
    pub fn answer(&mut self, option: OptionId) -> Result<(), ViewError> {
        self.engine
            .answer(option)
            .map(|_| ())
            .map_err(|err| ViewError::from(&err))
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` before an answer was given.
    pub fn advance(&mut self) -> Result<QuizPhase, ViewError> {
        match self.engine.advance() {
            Ok(Advance::Next(_)) => Ok(QuizPhase::InProgress),
            Ok(Advance::Completed(_)) => Ok(QuizPhase::Completed),
            Err(err) => Err(ViewError::from(&err)),
        }
    }

    pub fn restart(&mut self) {
        self.engine.restart();
    }
}

impl From<&QuizError> for ViewError {
    fn from(err: &QuizError) -> Self {
        match err {
            QuizError::Selection => ViewError::NoSelection,
            QuizError::Load(load) => ViewError::LoadFailed {
                group: load.group.to_string(),
                reason: load.failure.to_string(),
            },
            QuizError::EmptyResult => ViewError::NoQuestions,
            QuizError::Busy => ViewError::Busy,
            _ => ViewError::Unknown,
        }
    }
}

#[must_use]
pub fn score_label(question: &QuestionView) -> String {
    format!("Score: {}", question.score)
}

#[must_use]
pub fn result_label(result: &QuizResult) -> String {
    format!("Your Score: {} / {}", result.score, result.total)
}
