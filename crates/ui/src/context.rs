use std::sync::Arc;

use quiz_core::model::{GroupCatalog, QuizConfig};
use services::{AppServices, PreferencesService, QuizLoopService};

pub trait UiApp: Send + Sync {
    fn catalog(&self) -> Arc<GroupCatalog>;
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn preferences(&self) -> Arc<PreferencesService>;
}

impl UiApp for AppServices {
    fn catalog(&self) -> Arc<GroupCatalog> {
        AppServices::catalog(self)
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        AppServices::quiz_loop(self)
    }

    fn preferences(&self) -> Arc<PreferencesService> {
        AppServices::preferences(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    catalog: Arc<GroupCatalog>,
    quiz_loop: Arc<QuizLoopService>,
    preferences: Arc<PreferencesService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            catalog: app.catalog(),
            quiz_loop: app.quiz_loop(),
            preferences: app.preferences(),
        }
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
