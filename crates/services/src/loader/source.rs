use std::collections::HashMap;

use async_trait::async_trait;
use quiz_core::model::{GroupId, RawQuestion};

use crate::error::SourceError;

/// Where question resources come from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the raw body of the resource behind `group`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the resource is unreachable or missing.
    async fn fetch(&self, group: &GroupId) -> Result<String, SourceError>;
}

/// Resources held in memory; used by tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionSource {
    bodies: HashMap<GroupId, String>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: GroupId, body: impl Into<String>) {
        self.bodies.insert(group, body.into());
    }

    #[must_use]
    pub fn with_body(mut self, group: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(GroupId::new(group), body);
        self
    }

    /// Store `questions` serialized in the on-disk resource format.
    #[must_use]
    pub fn with_questions(self, group: impl Into<String>, questions: &[RawQuestion]) -> Self {
        let body = serde_json::to_string(questions).unwrap_or_else(|_| "[]".to_string());
        self.with_body(group, body)
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn fetch(&self, group: &GroupId) -> Result<String, SourceError> {
        self.bodies.get(group).cloned().ok_or(SourceError::NotFound)
    }
}
