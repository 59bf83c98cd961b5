//! Fetching, validating and concatenating question resources.

mod fs;
mod http;
mod source;

use std::sync::Arc;

use quiz_core::model::{GroupCatalog, GroupId, Question, QuestionId, RawQuestion};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{LoadError, LoadFailure, SourceError};

pub use fs::FileQuestionSource;
pub use http::HttpQuestionSource;
pub use source::{InMemoryQuestionSource, QuestionSource};

/// Pick a source for a location string: `http://` and `https://` locations
/// are fetched over HTTP, anything else is treated as a directory.
///
/// # Errors
///
/// Returns `SourceError::InvalidPath` for an unparsable URL.
pub fn source_for(location: &str) -> Result<Arc<dyn QuestionSource>, SourceError> {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Arc::new(HttpQuestionSource::new(location)?))
    } else {
        Ok(Arc::new(FileQuestionSource::new(location)))
    }
}

/// Outcome of checking a single catalog group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCheck {
    pub group: GroupId,
    pub outcome: Result<usize, LoadFailure>,
}

/// Loads the question sets of selected groups as one atomic batch.
#[derive(Clone)]
pub struct QuestionLoader {
    source: Arc<dyn QuestionSource>,
}

impl QuestionLoader {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self { source }
    }

    /// Load every group in order and concatenate the results.
    ///
    /// Question ids are assigned sequentially across the whole batch, starting
    /// at 1, in concatenation order.
    ///
    /// # Errors
    ///
    /// Returns the first `LoadError`; nothing from earlier groups is returned.
    pub async fn load(&self, groups: &[GroupId]) -> Result<Vec<Question>, LoadError> {
        let mut questions = Vec::new();
        let mut next_id = 1_u64;
        for group in groups {
            let batch = self
                .load_group(group, next_id)
                .await
                .map_err(|failure| {
                    warn!(%group, %failure, "question group failed to load");
                    LoadError {
                        group: group.clone(),
                        failure,
                    }
                })?;
            debug!(%group, count = batch.len(), "loaded question group");
            next_id = next_id.saturating_add(u64::try_from(batch.len()).unwrap_or(u64::MAX));
            questions.extend(batch);
        }
        Ok(questions)
    }

    /// Load a single group, numbering its questions from `first_id`.
    ///
    /// # Errors
    ///
    /// Returns `LoadFailure` for fetch, parse or validation problems.
    pub async fn load_group(
        &self,
        group: &GroupId,
        first_id: u64,
    ) -> Result<Vec<Question>, LoadFailure> {
        let body = self.source.fetch(group).await?;
        parse_questions(&body, first_id)
    }

    /// Validate every group of a catalog independently.
    pub async fn check_all(&self, catalog: &GroupCatalog) -> Vec<GroupCheck> {
        let mut checks = Vec::with_capacity(catalog.len());
        for group in catalog.ids() {
            let outcome = self.load_group(group, 1).await.map(|qs| qs.len());
            checks.push(GroupCheck {
                group: group.clone(),
                outcome,
            });
        }
        checks
    }
}

/// Parse a resource body: a JSON array of `{ question, answers, correctAnswer }`.
///
/// # Errors
///
/// Returns `LoadFailure::Json` for malformed JSON, `NotAnArray` for any other
/// top-level value, and `InvalidElement` / `InvalidQuestion` for the first bad
/// element.
pub fn parse_questions(body: &str, first_id: u64) -> Result<Vec<Question>, LoadFailure> {
    let value: Value = serde_json::from_str(body).map_err(|e| LoadFailure::Json(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(LoadFailure::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw: RawQuestion = serde_json::from_value(item)
                .map_err(|e| LoadFailure::InvalidElement {
                    index,
                    reason: e.to_string(),
                })?;
            let offset = u64::try_from(index).unwrap_or(u64::MAX);
            raw.validate(QuestionId::new(first_id.saturating_add(offset)))
                .map_err(|source| LoadFailure::InvalidQuestion { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Group, QuestionError};

    fn body(prompts: &[&str]) -> String {
        let items: Vec<_> = prompts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "question": p,
                    "answers": ["yes", "no"],
                    "correctAnswer": "yes"
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    fn loader(groups: &[(&str, String)]) -> QuestionLoader {
        let mut source = InMemoryQuestionSource::new();
        for (id, body) in groups {
            source.insert(GroupId::new(*id), body.clone());
        }
        QuestionLoader::new(Arc::new(source))
    }

    #[tokio::test]
    async fn concatenates_in_group_order_with_sequential_ids() {
        let loader = loader(&[
            ("a.json", body(&["a1", "a2"])),
            ("b.json", body(&["b1", "b2", "b3"])),
        ]);
        let questions = loader
            .load(&[GroupId::new("b.json"), GroupId::new("a.json")])
            .await
            .unwrap();

        let prompts: Vec<_> = questions.iter().map(Question::prompt).collect();
        assert_eq!(prompts, vec!["b1", "b2", "b3", "a1", "a2"]);
        let ids: Vec<_> = questions.iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn any_bad_group_fails_the_whole_batch() {
        let loader = loader(&[
            ("a.json", body(&["a1"])),
            ("bad.json", r#"{"question":"not an array"}"#.to_string()),
        ]);
        let err = loader
            .load(&[GroupId::new("a.json"), GroupId::new("bad.json")])
            .await
            .unwrap_err();
        assert_eq!(err.group, GroupId::new("bad.json"));
        assert_eq!(err.failure, LoadFailure::NotAnArray);
    }

    #[tokio::test]
    async fn missing_group_reports_source_error() {
        let loader = loader(&[]);
        let err = loader.load(&[GroupId::new("nope.json")]).await.unwrap_err();
        assert_eq!(err.failure, LoadFailure::Source(SourceError::NotFound));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn parse_reports_offending_element() {
        let body = r#"[
            {"question": "ok", "answers": ["a", "b"], "correctAnswer": "a"},
            {"question": "bad", "answers": ["a", "b"], "correctAnswer": "z"}
        ]"#;
        assert_eq!(
            parse_questions(body, 1).unwrap_err(),
            LoadFailure::InvalidQuestion {
                index: 1,
                source: QuestionError::CorrectAnswerMissing,
            }
        );

        let missing_field = r#"[{"question": "q", "answers": ["a", "b"]}]"#;
        assert!(matches!(
            parse_questions(missing_field, 1),
            Err(LoadFailure::InvalidElement { index: 0, .. })
        ));

        assert!(matches!(parse_questions("[", 1), Err(LoadFailure::Json(_))));
        assert_eq!(parse_questions("[]", 1).unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn check_all_reports_each_group() {
        let catalog = GroupCatalog::new(vec![
            Group::new("A", "a.json").unwrap(),
            Group::new("B", "b.json").unwrap(),
        ])
        .unwrap();
        let loader = loader(&[("a.json", body(&["a1", "a2"]))]);

        let checks = loader.check_all(&catalog).await;
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].outcome, Ok(2));
        assert_eq!(
            checks[1].outcome,
            Err(LoadFailure::Source(SourceError::NotFound))
        );
    }
}
