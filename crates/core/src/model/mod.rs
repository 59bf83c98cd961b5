mod config;
mod group;
mod ids;
mod limit;
mod preferences;
mod question;
mod session;

pub use config::QuizConfig;
pub use group::{CatalogError, Group, GroupCatalog, GroupSelection};
pub use ids::{GroupId, OptionId, ParseIdError, QuestionId};
pub use limit::{
    DEFAULT_FIXED_LIMIT, LIMIT_PRESETS, LIMIT_STEP, LimitError, LimitMode, LimitSettings,
    QuestionLimit,
};
pub use preferences::{ParseThemeError, Preferences, Theme};
pub use question::{AnswerOption, Question, QuestionError, RawQuestion};
pub use session::{
    AnswerFeedback, OptionMark, SessionSnapshot, SessionState, SessionStateError, SnapshotError,
};
