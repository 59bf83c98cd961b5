use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};
use tracing::warn;

use quiz_core::model::Theme;

use crate::context::AppContext;
use crate::views::QuizView;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", QuizView)] Quiz {},
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let preferences = ctx.preferences();
    let theme = use_signal(Theme::default);

    let _saved_theme = {
        let preferences = preferences.clone();
        use_resource(move || {
            let preferences = preferences.clone();
            let mut theme = theme;
            async move {
                match preferences.load().await {
                    Ok(saved) => theme.set(saved.theme),
                    Err(err) => warn!(error = %err, "failed to load preferences"),
                }
            }
        })
    };

    let toggle_theme = use_callback(move |()| {
        let preferences = preferences.clone();
        let mut theme = theme;
        spawn(async move {
            match preferences.toggle_theme().await {
                Ok(next) => theme.set(next),
                Err(err) => warn!(error = %err, "failed to save theme"),
            }
        });
    });

    let current = theme();
    let class = if current.is_dark() { "app dark-mode" } else { "app" };
    let icon = current.toggle_icon();

    rsx! {
        div { class: "{class}",
            header { class: "app-header",
                h1 { "Medical Quiz" }
                button {
                    class: "theme-toggle",
                    title: "Toggle theme",
                    onclick: move |_| toggle_theme.call(()),
                    "{icon}"
                }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
