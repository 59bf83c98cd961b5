use dioxus::prelude::*;

#[component]
pub fn ResultScreen(summary: String, on_restart: EventHandler<()>) -> Element {
    rsx! {
        section { class: "screen end-screen",
            h2 { "Test Completed!" }
            p { class: "final-result", "{summary}" }
            button {
                class: "restart-btn",
                onclick: move |_| on_restart.call(()),
                "Restart"
            }
        }
    }
}
