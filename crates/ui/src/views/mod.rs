mod question;
mod quiz;
mod result;
mod start;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use question::QuestionScreen;
pub use quiz::QuizView;
pub use result::ResultScreen;
pub use start::StartScreen;
pub use state::{ViewError, ViewState, view_state_from_resource};
