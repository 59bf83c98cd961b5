//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{GroupId, QuestionError, SessionStateError, SnapshotError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Failure to obtain the raw body of a question resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    #[error("resource not found")]
    NotFound,
    #[error("HTTP error {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("read failed: {0}")]
    Io(String),
    #[error("invalid resource path: {0}")]
    InvalidPath(String),
}

/// Why a single group could not be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadFailure {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("malformed JSON: {0}")]
    Json(String),
    #[error("expected a JSON array of questions")]
    NotAnArray,
    #[error("element {index} is not a question object: {reason}")]
    InvalidElement { index: usize, reason: String },
    #[error("element {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// A batch load failed; names the offending group.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to load {group}: {failure}")]
pub struct LoadError {
    pub group: GroupId,
    pub failure: LoadFailure,
}

/// Errors emitted by the quiz engine and the quiz loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("please select at least one group")]
    Selection,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("no questions found in the selected groups")]
    EmptyResult,
    #[error("questions are already loading")]
    Busy,
    #[error("cannot {action} while the quiz is {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: &'static str,
    },
    #[error("load result no longer matches the pending start")]
    StaleLoad,
    #[error(transparent)]
    Session(#[from] SessionStateError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QuizError {
    /// True for the three failures that end a start attempt and return to idle.
    #[must_use]
    pub fn is_start_failure(&self) -> bool {
        matches!(
            self,
            QuizError::Selection | QuizError::Load(_) | QuizError::EmptyResult
        )
    }
}

/// Errors emitted by `PreferencesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferencesServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Source(#[from] SourceError),
}
