use crate::model::limit::LimitMode;

/// Startup knobs of the quiz engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    pub limit_mode: LimitMode,
    pub persist_session: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            limit_mode: LimitMode::Adjustable,
            persist_session: true,
        }
    }
}

impl QuizConfig {
    #[must_use]
    pub fn with_limit_mode(mut self, limit_mode: LimitMode) -> Self {
        self.limit_mode = limit_mode;
        self
    }

    #[must_use]
    pub fn with_persist_session(mut self, persist_session: bool) -> Self {
        self.persist_session = persist_session;
        self
    }
}
