//! The quiz state machine and the services that drive it.

mod engine;
mod presenter;
mod view;
mod workflow;

pub use engine::{Advance, LoadRequest, QuizEngine, QuizPhase, QuizResult};
pub use presenter::{QuizDriver, QuizEvent, QuizPresenter};
pub use view::{OptionView, QuestionView};
pub use workflow::{DEFAULT_SCOPE, QuizLoopService};
