use thiserror::Error;

use crate::model::{CatalogError, LimitError, QuestionError, SessionStateError, SnapshotError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Limit(#[from] LimitError),
    #[error(transparent)]
    Session(#[from] SessionStateError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
