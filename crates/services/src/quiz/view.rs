use quiz_core::model::{AnswerFeedback, OptionId, OptionMark, SessionState};

/// One answer button as the presenter should draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub id: OptionId,
    pub text: String,
    pub mark: OptionMark,
    pub enabled: bool,
}

/// Everything needed to draw the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position in the working set.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    /// Score including the answer to this question, if given.
    pub score: usize,
    pub feedback: Option<AnswerFeedback>,
}

impl QuestionView {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Option<Self> {
        let question = state.current_question()?;
        let feedback = state.feedback();
        let options = question
            .options()
            .iter()
            .map(|option| OptionView {
                id: option.id,
                text: option.text.clone(),
                mark: feedback.map_or(OptionMark::Neutral, |f| f.mark(option.id)),
                enabled: feedback.is_none(),
            })
            .collect();

        Some(Self {
            number: state.current_index() + 1,
            total: state.total(),
            prompt: question.prompt().to_string(),
            options,
            score: state.live_score(),
            feedback,
        })
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.feedback.is_some()
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("Question {} / {}", self.number, self.total)
    }
}
