use std::sync::Arc;

use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use tracing::warn;

use quiz_core::model::{GroupId, OptionId, QuestionLimit};
use services::{PreferencesService, QuizLoopService, QuizPhase};

use crate::context::AppContext;
use crate::views::{
    QuestionScreen, ResultScreen, StartScreen, ViewError, ViewState, view_state_from_resource,
};
use crate::vm::{QuizVm, StartFormVm, result_label};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    ToggleGroup(GroupId),
    ToggleAll,
    TogglePreset(QuestionLimit),
    StepDown,
    StepUp,
    Start,
    Answer(OptionId),
    Next,
    Restart,
}

fn persist_session(quiz_loop: Arc<QuizLoopService>, vm: Signal<QuizVm>) {
    let engine = vm.peek().engine().clone();
    spawn(async move {
        if let Err(err) = quiz_loop.persist(&engine).await {
            warn!(error = %err, "failed to save session snapshot");
        }
    });
}

fn remember_limit(preferences: Arc<PreferencesService>, limit: QuestionLimit) {
    spawn(async move {
        if let Err(err) = preferences.set_limit(limit).await {
            warn!(error = %err, "failed to save question limit");
        }
    });
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let quiz_loop = ctx.quiz_loop();
    let preferences = ctx.preferences();
    let config = ctx.config();

    let vm = use_signal({
        let quiz_loop = quiz_loop.clone();
        move || QuizVm::new(quiz_loop.new_engine())
    });
    let form = use_signal(StartFormVm::default);
    let error = use_signal(|| None::<ViewError>);

    let resource = {
        let quiz_loop = quiz_loop.clone();
        let preferences = preferences.clone();
        use_resource(move || {
            let quiz_loop = quiz_loop.clone();
            let preferences = preferences.clone();
            let mut vm = vm;
            let mut form = form;
            async move {
                let saved = preferences
                    .load()
                    .await
                    .map_err(|_| ViewError::Unknown)?;
                form.write().set_limit(saved.limit);

                let mut engine = vm.peek().engine().clone();
                quiz_loop
                    .resume(&mut engine)
                    .await
                    .map_err(|err| ViewError::from(&err))?;
                vm.set(QuizVm::new(engine));
                Ok::<_, ViewError>(())
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let dispatch = {
        let catalog = Arc::clone(&catalog);
        let quiz_loop = Arc::clone(&quiz_loop);
        let preferences = Arc::clone(&preferences);
        use_callback(move |intent: QuizIntent| {
            let mut vm = vm;
            let mut form = form;
            let mut error = error;

            match intent {
                QuizIntent::ToggleGroup(id) => form.write().toggle_group(id),
                QuizIntent::ToggleAll => form.write().toggle_all(&catalog),
                QuizIntent::TogglePreset(limit) => {
                    form.write().toggle_preset(limit);
                    remember_limit(Arc::clone(&preferences), form.peek().limit());
                }
                QuizIntent::StepDown => {
                    form.write().step_down();
                    remember_limit(Arc::clone(&preferences), form.peek().limit());
                }
                QuizIntent::StepUp => {
                    form.write().step_up();
                    remember_limit(Arc::clone(&preferences), form.peek().limit());
                }
                QuizIntent::Start => {
                    let (groups, limit) = {
                        let form = form.peek();
                        (form.groups_to_start(&catalog), form.limit())
                    };
                    let begun = vm.write().begin_start(&groups, limit);
                    let request = match begun {
                        Ok(request) => request,
                        Err(err) => {
                            error.set(Some(err));
                            return;
                        }
                    };
                    error.set(None);

                    let quiz_loop = Arc::clone(&quiz_loop);
                    spawn(async move {
                        let loaded = quiz_loop.load(&request).await;
                        let finished = vm.write().finish_start(request, loaded);
                        match finished {
                            Ok(true) => persist_session(quiz_loop, vm),
                            Ok(false) => {}
                            Err(err) => error.set(Some(err)),
                        }
                    });
                }
                QuizIntent::Answer(option) => {
                    let answered = vm.write().answer(option);
                    match answered {
                        Ok(()) => persist_session(Arc::clone(&quiz_loop), vm),
                        Err(err) => error.set(Some(err)),
                    }
                }
                QuizIntent::Next => {
                    let advanced = vm.write().advance();
                    match advanced {
                        Ok(_) => persist_session(Arc::clone(&quiz_loop), vm),
                        Err(err) => error.set(Some(err)),
                    }
                }
                QuizIntent::Restart => {
                    vm.write().restart();
                    error.set(None);
                    let quiz_loop = Arc::clone(&quiz_loop);
                    spawn(async move { quiz_loop.clear_saved().await });
                }
            }
        })
    };

    {
        let quiz_loop = Arc::clone(&quiz_loop);
        use_drop(move || {
            let Ok(current) = vm.try_peek() else {
                return;
            };
            if current.phase() != QuizPhase::InProgress {
                return;
            }
            let engine = current.engine().clone();
            let _ = spawn_forever(async move {
                if let Err(err) = quiz_loop.persist(&engine).await {
                    warn!(error = %err, "failed to save session snapshot on close");
                }
            });
        });
    }

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch, vm);
            }
        }
    }

    let retry = use_callback(move |()| {
        let mut resource = resource;
        resource.restart();
    });

    let body = match state {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { class: "loading", "Loading..." }
        },
        ViewState::Error(err) => {
            let message = err.message();
            rsx! {
                div { class: "error",
                    p { "{message}" }
                    button { onclick: move |_| retry.call(()), "Retry" }
                }
            }
        }
        ViewState::Ready(()) => {
            let vm_guard = vm.read();
            match vm_guard.phase() {
                QuizPhase::Idle | QuizPhase::Loading => {
                    let form_guard = form.read();
                    rsx! {
                        StartScreen {
                            rows: form_guard.group_rows(&catalog),
                            toggle_all_label: form_guard.toggle_all_label(&catalog).to_string(),
                            limit: form_guard.limit_control(config.limit_mode),
                            loading: vm_guard.is_loading(),
                            error: error(),
                            on_toggle_group: move |id: GroupId| dispatch.call(QuizIntent::ToggleGroup(id)),
                            on_toggle_all: move |()| dispatch.call(QuizIntent::ToggleAll),
                            on_toggle_preset: move |limit: QuestionLimit| dispatch.call(QuizIntent::TogglePreset(limit)),
                            on_step_down: move |()| dispatch.call(QuizIntent::StepDown),
                            on_step_up: move |()| dispatch.call(QuizIntent::StepUp),
                            on_start: move |()| dispatch.call(QuizIntent::Start),
                        }
                    }
                }
                QuizPhase::InProgress => match vm_guard.question() {
                    Some(question) => rsx! {
                        QuestionScreen {
                            question,
                            on_answer: move |option: OptionId| dispatch.call(QuizIntent::Answer(option)),
                            on_next: move |()| dispatch.call(QuizIntent::Next),
                        }
                    },
                    None => rsx! {},
                },
                QuizPhase::Completed => {
                    let summary = vm_guard
                        .result()
                        .map(|result| result_label(&result))
                        .unwrap_or_default();
                    rsx! {
                        ResultScreen {
                            summary,
                            on_restart: move |()| dispatch.call(QuizIntent::Restart),
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "page quiz", {body} }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<QuizVm>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<QuizVm>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<QuizVm> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
