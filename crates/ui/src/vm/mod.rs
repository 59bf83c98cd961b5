mod quiz_vm;
mod start_vm;

pub use quiz_vm::{QuizVm, result_label, score_label};
pub use start_vm::{GroupRowVm, LimitControlVm, PresetVm, StartFormVm};
