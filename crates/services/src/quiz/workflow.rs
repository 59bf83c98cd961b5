use std::sync::Arc;

use tracing::{debug, warn};

use quiz_core::Clock;
use quiz_core::model::{
    AnswerFeedback, GroupId, OptionId, Question, QuestionLimit, QuizConfig,
};
use storage::repository::{SessionSnapshotRepository, StorageError};

use super::engine::{Advance, LoadRequest, QuizEngine, QuizPhase};
use crate::error::{LoadError, QuizError};
use crate::loader::QuestionLoader;

/// Scope used when none is configured.
pub const DEFAULT_SCOPE: &str = "default";

/// Orchestrates question loading and snapshot persistence around the engine.
#[derive(Clone)]
pub struct QuizLoopService {
    loader: QuestionLoader,
    snapshots: Arc<dyn SessionSnapshotRepository>,
    scope: String,
    config: QuizConfig,
    clock: Clock,
    seed: Option<u64>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        loader: QuestionLoader,
        snapshots: Arc<dyn SessionSnapshotRepository>,
        config: QuizConfig,
    ) -> Self {
        Self {
            loader,
            snapshots,
            scope: DEFAULT_SCOPE.to_string(),
            config,
            clock: Clock::default_clock(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Seed the shuffle of engines created by `new_engine`.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn config(&self) -> QuizConfig {
        self.config
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    #[must_use]
    pub fn loader(&self) -> &QuestionLoader {
        &self.loader
    }

    /// A fresh idle engine carrying this service's configuration.
    #[must_use]
    pub fn new_engine(&self) -> QuizEngine {
        let engine = QuizEngine::new(self.config).with_clock(self.clock);
        match self.seed {
            Some(seed) => engine.with_seed(seed),
            None => engine,
        }
    }

    /// Begin, load and finish a start in one call.
    ///
    /// # Errors
    ///
    /// Returns `Selection`, `Busy`, `Load` or `EmptyResult`; the engine is
    /// back in Idle for the last two.
    pub async fn start(
        &self,
        engine: &mut QuizEngine,
        groups: &[GroupId],
        limit: QuestionLimit,
    ) -> Result<(), QuizError> {
        let request = engine.begin_start(groups, limit)?;
        let loaded = self.load(&request).await;
        self.complete_start(engine, request, loaded).await
    }

    /// Fetch the questions for a pending start without touching the engine.
    ///
    /// # Errors
    ///
    /// Returns the `LoadError` of the first failing group.
    pub async fn load(&self, request: &LoadRequest) -> Result<Vec<Question>, LoadError> {
        self.loader.load(request.groups()).await
    }

    /// Hand a load outcome to the engine and persist a started session.
    ///
    /// # Errors
    ///
    /// Same as `QuizEngine::finish_start`.
    pub async fn complete_start(
        &self,
        engine: &mut QuizEngine,
        request: LoadRequest,
        loaded: Result<Vec<Question>, LoadError>,
    ) -> Result<(), QuizError> {
        engine.finish_start(request, loaded)?;
        self.persist_quietly(engine).await;
        Ok(())
    }

    /// # Errors
    ///
    /// Same as `QuizEngine::answer`.
    pub async fn answer(
        &self,
        engine: &mut QuizEngine,
        option: OptionId,
    ) -> Result<AnswerFeedback, QuizError> {
        let feedback = engine.answer(option)?;
        self.persist_quietly(engine).await;
        Ok(feedback)
    }

    /// # Errors
    ///
    /// Same as `QuizEngine::advance`.
    pub async fn advance(&self, engine: &mut QuizEngine) -> Result<Advance, QuizError> {
        let advance = engine.advance()?;
        self.persist_quietly(engine).await;
        Ok(advance)
    }

    /// Reset the engine and drop the stored snapshot.
    pub async fn restart(&self, engine: &mut QuizEngine) {
        engine.restart();
        self.clear_saved().await;
    }

    /// Restore an in-progress session saved under this scope.
    ///
    /// Unreadable or inconsistent snapshots are discarded.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the backend fails and `Busy` while loading.
    pub async fn resume(&self, engine: &mut QuizEngine) -> Result<QuizPhase, QuizError> {
        if !self.config.persist_session {
            return Ok(engine.phase());
        }

        let snapshot = match self.snapshots.load_snapshot(&self.scope).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Ok(engine.phase()),
            Err(StorageError::Serialization(reason)) => {
                warn!(scope = %self.scope, %reason, "discarding unreadable session snapshot");
                self.clear_saved().await;
                return Ok(engine.phase());
            }
            Err(err) => return Err(err.into()),
        };

        match engine.restore(snapshot) {
            Ok(phase) => {
                debug!(scope = %self.scope, %phase, "session snapshot restored");
                Ok(phase)
            }
            Err(QuizError::Snapshot(err)) => {
                warn!(scope = %self.scope, error = %err, "discarding inconsistent session snapshot");
                self.clear_saved().await;
                Ok(engine.phase())
            }
            Err(err) => Err(err),
        }
    }

    /// Write the engine's session under this scope, overwriting any previous one.
    ///
    /// Does nothing when persistence is disabled.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the snapshot cannot be written.
    pub async fn persist(&self, engine: &QuizEngine) -> Result<(), QuizError> {
        if !self.config.persist_session {
            return Ok(());
        }
        self.snapshots
            .save_snapshot(&self.scope, &engine.snapshot())
            .await?;
        Ok(())
    }

    async fn persist_quietly(&self, engine: &QuizEngine) {
        if let Err(err) = self.persist(engine).await {
            warn!(scope = %self.scope, error = %err, "failed to save session snapshot");
        }
    }

    /// Remove the stored snapshot of this scope; failures are only logged.
    pub async fn clear_saved(&self) {
        if !self.config.persist_session {
            return;
        }
        if let Err(err) = self.snapshots.clear_snapshot(&self.scope).await {
            warn!(scope = %self.scope, error = %err, "failed to clear session snapshot");
        }
    }
}
