use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least 2 answer options, found {count}")]
    TooFewOptions { count: usize },

    #[error("answer option {index} is empty")]
    EmptyOption { index: usize },

    #[error("duplicate option id {id}")]
    DuplicateOptionId { id: OptionId },

    #[error("correct answer is not one of the options")]
    CorrectAnswerMissing,
}

//
// ─── RESOURCE SHAPE ────────────────────────────────────────────────────────────
//

/// One element of a question-bank resource, exactly as it is stored on disk:
/// `{ "question": ..., "answers": [...], "correctAnswer": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer: String,
}

impl RawQuestion {
    /// Validate the raw element and assign stable option ids by position.
    ///
    /// The correct option is the first option whose text is exactly equal to
    /// `correct_answer`, so duplicate option texts resolve deterministically.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, fewer than two options
    /// are present, an option is blank, or `correct_answer` matches no option.
    pub fn validate(self, id: QuestionId) -> Result<Question, QuestionError> {
        if self.question.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.answers.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: self.answers.len(),
            });
        }
        if let Some(index) = self.answers.iter().position(|a| a.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }

        let correct = self
            .answers
            .iter()
            .position(|a| *a == self.correct_answer)
            .ok_or(QuestionError::CorrectAnswerMissing)?;

        let options = self
            .answers
            .into_iter()
            .zip(0_u32..)
            .map(|(text, idx)| AnswerOption {
                id: OptionId::new(idx),
                text,
            })
            .collect();

        Ok(Question {
            id,
            prompt: self.question,
            options,
            correct: OptionId::new(u32::try_from(correct).unwrap_or(u32::MAX)),
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single answer option with an identifier distinct from its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
}

/// A validated multiple-choice question.
///
/// Invariants: at least two options, option ids are unique, and `correct`
/// names one of the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionParts", into = "QuestionParts")]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<AnswerOption>,
    correct: OptionId,
}

/// Unchecked persisted shape of a `Question`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuestionParts {
    id: QuestionId,
    prompt: String,
    options: Vec<AnswerOption>,
    correct: OptionId,
}

impl Question {
    /// Rehydrate a question from persisted parts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any invariant does not hold.
    pub fn from_persisted(
        id: QuestionId,
        prompt: String,
        options: Vec<AnswerOption>,
        correct: OptionId,
    ) -> Result<Self, QuestionError> {
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }
        for (index, option) in options.iter().enumerate() {
            if option.text.trim().is_empty() {
                return Err(QuestionError::EmptyOption { index });
            }
            if options[..index].iter().any(|o| o.id == option.id) {
                return Err(QuestionError::DuplicateOptionId { id: option.id });
            }
        }
        if !options.iter().any(|o| o.id == correct) {
            return Err(QuestionError::CorrectAnswerMissing);
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == id)
    }

    #[must_use]
    pub fn correct_option(&self) -> OptionId {
        self.correct
    }

    #[must_use]
    pub fn correct_text(&self) -> &str {
        self.option(self.correct).map_or("", |o| o.text.as_str())
    }

    #[must_use]
    pub fn is_correct(&self, id: OptionId) -> bool {
        self.correct == id
    }
}

impl TryFrom<QuestionParts> for Question {
    type Error = QuestionError;

    fn try_from(parts: QuestionParts) -> Result<Self, Self::Error> {
        Self::from_persisted(parts.id, parts.prompt, parts.options, parts.correct)
    }
}

impl From<Question> for QuestionParts {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            prompt: q.prompt,
            options: q.options,
            correct: q.correct,
        }
    }
}
