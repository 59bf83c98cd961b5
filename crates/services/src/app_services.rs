use std::sync::Arc;

use quiz_core::model::{GroupCatalog, QuizConfig};
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::loader::{QuestionLoader, QuestionSource, source_for};
use crate::preferences_service::PreferencesService;
use crate::quiz::{DEFAULT_SCOPE, QuizLoopService};

/// Knobs of the quiz loop chosen at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOptions {
    pub config: QuizConfig,
    pub scope: String,
    pub seed: Option<u64>,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            config: QuizConfig::default(),
            scope: DEFAULT_SCOPE.to_string(),
            seed: None,
        }
    }
}

/// Assembles app-facing services around one catalog and one question source.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<GroupCatalog>,
    quiz_loop: Arc<QuizLoopService>,
    preferences: Arc<PreferencesService>,
}

impl AppServices {
    #[must_use]
    pub fn new(
        storage: &Storage,
        source: Arc<dyn QuestionSource>,
        catalog: GroupCatalog,
        options: QuizOptions,
        clock: Clock,
    ) -> Self {
        let quiz_loop = QuizLoopService::new(
            QuestionLoader::new(source),
            Arc::clone(&storage.snapshots),
            options.config,
        )
        .with_scope(options.scope)
        .with_clock(clock)
        .with_seed(options.seed);

        Self {
            catalog: Arc::new(catalog),
            quiz_loop: Arc::new(quiz_loop),
            preferences: Arc::new(PreferencesService::new(Arc::clone(&storage.preferences))),
        }
    }

    /// Build services backed by `SQLite` storage and the source at `source_location`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// source location is not usable.
    pub async fn new_sqlite(
        db_url: &str,
        source_location: &str,
        catalog: GroupCatalog,
        options: QuizOptions,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let source = source_for(source_location)?;
        Ok(Self::new(&storage, source, catalog, options, clock))
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<GroupCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }

    #[must_use]
    pub fn config(&self) -> QuizConfig {
        self.quiz_loop.config()
    }
}
