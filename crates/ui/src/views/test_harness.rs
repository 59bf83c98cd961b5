use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{Group, GroupCatalog, QuizConfig, RawQuestion};
use quiz_core::time::fixed_now;
use services::{AppServices, Clock, InMemoryQuestionSource, QuizOptions};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::QuizView;
use crate::views::quiz::{QuizIntent, QuizTestHandles};

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    handles: QuizTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    rsx! { QuizView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until pending tasks settle.
    pub async fn settle(&mut self) {
        for _ in 0..6 {
            self.drive_async().await;
        }
    }

    pub fn dispatch(&mut self, intent: QuizIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

fn raw(prompt: &str, correct: &str) -> RawQuestion {
    RawQuestion {
        question: prompt.to_string(),
        answers: vec!["Mitral".into(), "Aortic".into(), "Tricuspid".into()],
        correct_answer: correct.to_string(),
    }
}

pub fn test_catalog() -> GroupCatalog {
    GroupCatalog::new(vec![
        Group::new("Cardiology", "cardio.json").expect("group"),
        Group::new("Surgery", "surgery.json").expect("group"),
        Group::new("Empty", "empty.json").expect("group"),
    ])
    .expect("catalog")
}

pub fn test_source() -> InMemoryQuestionSource {
    InMemoryQuestionSource::new()
        .with_questions(
            "cardio.json",
            &[raw("Valve between LA and LV?", "Mitral"), raw("Valve after LV?", "Aortic")],
        )
        .with_questions("surgery.json", &[raw("Right AV valve?", "Tricuspid")])
        .with_body("empty.json", "[]")
}

pub fn setup_view_harness(config: QuizConfig) -> ViewHarness {
    setup_view_harness_with_storage(config, Storage::in_memory())
}

pub fn setup_view_harness_with_storage(config: QuizConfig, storage: Storage) -> ViewHarness {
    let options = QuizOptions {
        config,
        seed: Some(5),
        ..QuizOptions::default()
    };
    let app = Arc::new(AppServices::new(
        &storage,
        Arc::new(test_source()),
        test_catalog(),
        options,
        Clock::fixed(fixed_now()),
    ));
    let handles = QuizTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        handles,
    }
}
