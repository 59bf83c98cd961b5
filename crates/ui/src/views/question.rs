use dioxus::prelude::*;

use quiz_core::model::{OptionId, OptionMark};
use services::QuestionView;

use crate::vm::score_label;

fn option_class(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::Neutral => "answer-btn",
        OptionMark::Correct => "answer-btn correct",
        OptionMark::Incorrect => "answer-btn incorrect",
    }
}

#[component]
pub fn QuestionScreen(
    question: QuestionView,
    on_answer: EventHandler<OptionId>,
    on_next: EventHandler<()>,
) -> Element {
    let progress = question.progress_label();
    let score = score_label(&question);
    let can_advance = question.can_advance();
    let prompt = question.prompt.clone();
    let options = question.options.clone();

    rsx! {
        section { class: "screen test-screen",
            div { class: "test-header",
                span { class: "progress", "{progress}" }
                span { class: "score", "{score}" }
            }
            h2 { class: "question-text", "{prompt}" }
            div { class: "answers",
                for option in options {
                    button {
                        key: "{option.id}",
                        class: option_class(option.mark),
                        disabled: !option.enabled,
                        onclick: {
                            let id = option.id;
                            move |_| on_answer.call(id)
                        },
                        "{option.text}"
                    }
                }
            }
            button {
                class: "next-btn",
                disabled: !can_advance,
                onclick: move |_| on_next.call(()),
                "Next"
            }
        }
    }
}
