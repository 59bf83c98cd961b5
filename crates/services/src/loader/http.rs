use async_trait::async_trait;
use quiz_core::model::GroupId;
use reqwest::{Client, Url};

use super::source::QuestionSource;
use crate::error::SourceError;

/// Fetches resources relative to a base URL.
///
/// Requests carry no timeout: a stalled server leaves the load pending.
#[derive(Debug, Clone)]
pub struct HttpQuestionSource {
    client: Client,
    base: Url,
}

impl HttpQuestionSource {
    /// # Errors
    ///
    /// Returns `SourceError::InvalidPath` if `base_url` is not a valid URL.
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let mut raw = base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|e| SourceError::InvalidPath(format!("{raw}: {e}")))?;
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn resolve(&self, group: &GroupId) -> Result<Url, SourceError> {
        if group.is_empty() || group.as_str().starts_with('/') {
            return Err(SourceError::InvalidPath(group.to_string()));
        }
        self.base
            .join(group.as_str())
            .map_err(|e| SourceError::InvalidPath(format!("{group}: {e}")))
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch(&self, group: &GroupId) -> Result<String, SourceError> {
        let url = self.resolve(group)?;
        tracing::debug!(%url, "fetching question resource");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_relative_to_base_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/questions/group1.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let source = HttpQuestionSource::new(&format!("{}/questions", server.uri())).unwrap();
        let body = source.fetch(&GroupId::new("group1.json")).await.unwrap();
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = HttpQuestionSource::new(&server.uri()).unwrap();
        let err = source.fetch(&GroupId::new("group1.json")).await.unwrap_err();
        assert_eq!(err, SourceError::Status(500));
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            HttpQuestionSource::new("not a url"),
            Err(SourceError::InvalidPath(_))
        ));
    }
}
