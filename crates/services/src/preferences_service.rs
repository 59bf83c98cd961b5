use std::sync::Arc;

use quiz_core::model::{Preferences, QuestionLimit, Theme};
use storage::repository::PreferencesRepository;
use tokio::sync::Mutex;

use crate::error::PreferencesServiceError;

/// Display preferences that outlive any single session.
///
/// Single-field updates hold `write_lock` across their load and save so a
/// theme toggle and a limit change never overwrite each other.
#[derive(Clone)]
pub struct PreferencesService {
    repo: Arc<dyn PreferencesRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(repo: Arc<dyn PreferencesRepository>) -> Self {
        Self {
            repo,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load persisted preferences (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on storage failures.
    pub async fn load(&self) -> Result<Preferences, PreferencesServiceError> {
        let preferences = self.repo.get_preferences().await?;
        Ok(preferences.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `PreferencesServiceError` if persistence fails.
    pub async fn save(&self, preferences: Preferences) -> Result<(), PreferencesServiceError> {
        let _guard = self.write_lock.lock().await;
        self.repo.save_preferences(&preferences).await?;
        Ok(())
    }

    /// Flip the theme and persist it; returns the new theme.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on storage failures.
    pub async fn toggle_theme(&self) -> Result<Theme, PreferencesServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut preferences = self.load().await?;
        preferences.theme = preferences.theme.toggled();
        self.repo.save_preferences(&preferences).await?;
        Ok(preferences.theme)
    }

    /// Remember the limit chosen on the start screen.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on storage failures.
    pub async fn set_limit(&self, limit: QuestionLimit) -> Result<(), PreferencesServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut preferences = self.load().await?;
        preferences.limit = limit;
        self.repo.save_preferences(&preferences).await?;
        Ok(())
    }
}
