use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::GroupId;

use super::source::QuestionSource;
use crate::error::SourceError;

/// Reads resources from a directory; a group id is a path relative to it.
#[derive(Debug, Clone)]
pub struct FileQuestionSource {
    base_dir: PathBuf,
}

impl FileQuestionSource {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, group: &GroupId) -> Result<PathBuf, SourceError> {
        let relative = Path::new(group.as_str());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if group.is_empty() || escapes {
            return Err(SourceError::InvalidPath(group.to_string()));
        }
        Ok(self.base_dir.join(relative))
    }
}

#[async_trait]
impl QuestionSource for FileQuestionSource {
    async fn fetch(&self, group: &GroupId) -> Result<String, SourceError> {
        let path = self.resolve(group)?;
        tokio::fs::read_to_string(&path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                SourceError::NotFound
            } else {
                SourceError::Io(format!("{}: {err}", path.display()))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_relative_files() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::create_dir_all(dir.path().join("questions"))
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("questions/group1.json"), "[]")
            .await
            .unwrap();

        let source = FileQuestionSource::new(dir.path());
        let body = source
            .fetch(&GroupId::new("questions/group1.json"))
            .await
            .unwrap();
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileQuestionSource::new(dir.path());
        let err = source.fetch(&GroupId::new("nope.json")).await.unwrap_err();
        assert_eq!(err, SourceError::NotFound);
    }

    #[tokio::test]
    async fn refuses_paths_outside_base_dir() {
        let source = FileQuestionSource::new("questions");
        for id in ["../secret.json", "/etc/passwd"] {
            let err = source.fetch(&GroupId::new(id)).await.unwrap_err();
            assert!(matches!(err, SourceError::InvalidPath(_)), "{id}");
        }
    }
}
