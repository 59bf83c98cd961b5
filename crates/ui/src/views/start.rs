use dioxus::prelude::*;

use quiz_core::model::{GroupId, QuestionLimit};

use crate::views::ViewError;
use crate::vm::{GroupRowVm, LimitControlVm};

#[component]
pub fn StartScreen(
    rows: Vec<GroupRowVm>,
    toggle_all_label: String,
    limit: LimitControlVm,
    loading: bool,
    error: Option<ViewError>,
    on_toggle_group: EventHandler<GroupId>,
    on_toggle_all: EventHandler<()>,
    on_toggle_preset: EventHandler<QuestionLimit>,
    on_step_down: EventHandler<()>,
    on_step_up: EventHandler<()>,
    on_start: EventHandler<()>,
) -> Element {
    let start_label = if loading { "Loading..." } else { "Start Test" };
    let error_message = error.as_ref().map(ViewError::message);

    rsx! {
        section { class: "screen start-screen",
            h2 { "Select Categories" }
            if let Some(message) = error_message {
                div { class: "error-banner", role: "alert", "{message}" }
            }
            div { class: "group-controls",
                for row in rows {
                    label { key: "{row.id}", class: "group-item",
                        input {
                            r#type: "checkbox",
                            value: "{row.id}",
                            checked: row.selected,
                            onchange: {
                                let id = row.id.clone();
                                move |_| on_toggle_group.call(id.clone())
                            },
                        }
                        span { "{row.name}" }
                    }
                }
            }
            button {
                class: "toggle-all-btn",
                onclick: move |_| on_toggle_all.call(()),
                "{toggle_all_label}"
            }
            LimitControls {
                control: limit,
                on_toggle_preset,
                on_step_down,
                on_step_up,
            }
            button {
                class: "start-btn",
                disabled: loading,
                onclick: move |_| on_start.call(()),
                "{start_label}"
            }
        }
    }
}

#[component]
fn LimitControls(
    control: LimitControlVm,
    on_toggle_preset: EventHandler<QuestionLimit>,
    on_step_down: EventHandler<()>,
    on_step_up: EventHandler<()>,
) -> Element {
    match control {
        LimitControlVm::Hidden => rsx! {},
        LimitControlVm::Fixed(current) => rsx! {
            p { class: "limit-fixed", "Questions per test: {current}" }
        },
        LimitControlVm::Adjustable { presets, label: current } => rsx! {
            div { class: "limit-controls",
                div { class: "limit-presets",
                    for preset in presets {
                        label { key: "{preset.label}", class: "limit-toggle",
                            input {
                                r#type: "checkbox",
                                checked: preset.active,
                                onchange: {
                                    let value = preset.limit;
                                    move |_| on_toggle_preset.call(value)
                                },
                            }
                            "{preset.label}"
                        }
                    }
                }
                div { class: "limit-stepper",
                    button { class: "limit-down", onclick: move |_| on_step_down.call(()), "−" }
                    span { class: "current-limit", "{current}" }
                    button { class: "limit-up", onclick: move |_| on_step_up.call(()), "+" }
                }
            }
        },
    }
}
