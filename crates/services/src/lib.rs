#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod loader;
pub mod preferences_service;
pub mod quiz;

pub use quiz_core::Clock;

pub use app_services::{AppServices, QuizOptions};
pub use error::{
    AppServicesError, LoadError, LoadFailure, PreferencesServiceError, QuizError, SourceError,
};
pub use loader::{
    FileQuestionSource, GroupCheck, HttpQuestionSource, InMemoryQuestionSource, QuestionLoader,
    QuestionSource,
};
pub use preferences_service::PreferencesService;
pub use quiz::{
    Advance, LoadRequest, OptionView, QuestionView, QuizDriver, QuizEngine, QuizEvent,
    QuizLoopService, QuizPhase, QuizPresenter, QuizResult,
};
