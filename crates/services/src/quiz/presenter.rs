use std::sync::Arc;

use quiz_core::model::{AnswerFeedback, GroupId, OptionId, QuestionLimit};

use super::engine::{Advance, QuizEngine, QuizPhase, QuizResult};
use super::view::QuestionView;
use super::workflow::QuizLoopService;
use crate::error::QuizError;

/// Capabilities a front end offers to the quiz loop.
pub trait QuizPresenter {
    /// Show a question with its options.
    fn present(&mut self, question: &QuestionView);

    /// Lock the current question and mark the chosen and correct options.
    fn reveal(&mut self, feedback: &AnswerFeedback);

    /// Show the final score.
    fn complete(&mut self, result: &QuizResult);

    /// Tell the user a request was rejected.
    fn report(&mut self, error: &QuizError);
}

/// User input routed into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    AnswerSelected(OptionId),
    Advance,
    Restart,
}

/// Connects a presenter to an engine through the quiz loop service.
///
/// Rejected requests are reported to the presenter rather than returned.
pub struct QuizDriver<P> {
    service: Arc<QuizLoopService>,
    engine: QuizEngine,
    presenter: P,
}

impl<P: QuizPresenter> QuizDriver<P> {
    #[must_use]
    pub fn new(service: Arc<QuizLoopService>, presenter: P) -> Self {
        let engine = service.new_engine();
        Self {
            service,
            engine,
            presenter,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    #[must_use]
    pub fn into_presenter(self) -> P {
        self.presenter
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.engine.phase()
    }

    /// Pick up a saved session, if any, and show where it stopped.
    pub async fn resume(&mut self) -> QuizPhase {
        match self.service.resume(&mut self.engine).await {
            Ok(_) => self.show_phase(),
            Err(err) => self.presenter.report(&err),
        }
        self.engine.phase()
    }

    pub async fn start(&mut self, groups: &[GroupId], limit: QuestionLimit) -> QuizPhase {
        match self.service.start(&mut self.engine, groups, limit).await {
            Ok(()) => self.show_phase(),
            Err(err) => self.presenter.report(&err),
        }
        self.engine.phase()
    }

    pub async fn handle(&mut self, event: QuizEvent) -> QuizPhase {
        match event {
            QuizEvent::AnswerSelected(option) => {
                match self.service.answer(&mut self.engine, option).await {
                    Ok(feedback) => self.presenter.reveal(&feedback),
                    Err(err) => self.presenter.report(&err),
                }
            }
            QuizEvent::Advance => match self.service.advance(&mut self.engine).await {
                Ok(Advance::Next(_)) => self.present_current(),
                Ok(Advance::Completed(result)) => self.presenter.complete(&result),
                Err(err) => self.presenter.report(&err),
            },
            QuizEvent::Restart => self.service.restart(&mut self.engine).await,
        }
        self.engine.phase()
    }

    fn show_phase(&mut self) {
        match self.engine.phase() {
            QuizPhase::InProgress => {
                self.present_current();
                if let Some(feedback) = self.engine.feedback() {
                    self.presenter.reveal(&feedback);
                }
            }
            QuizPhase::Completed => {
                if let Some(result) = self.engine.result().copied() {
                    self.presenter.complete(&result);
                }
            }
            QuizPhase::Idle | QuizPhase::Loading => {}
        }
    }

    fn present_current(&mut self) {
        if let Some(view) = self.engine.view() {
            self.presenter.present(&view);
        }
    }
}
