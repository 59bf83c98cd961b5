use dioxus::prelude::ReadableExt;
use quiz_core::model::{
    GroupId, LimitMode, OptionId, QuestionId, QuestionLimit, QuizConfig, RawQuestion,
    SessionSnapshot,
};
use quiz_core::time::fixed_now;
use services::QuizPhase;
use storage::repository::Storage;

use super::quiz::QuizIntent;
use super::test_harness::{ViewHarness, setup_view_harness, setup_view_harness_with_storage};

fn current_correct(harness: &ViewHarness) -> OptionId {
    harness.dom.in_runtime(|| {
        harness
            .handles
            .vm()
            .peek()
            .engine()
            .current_question()
            .expect("question in progress")
            .correct_option()
    })
}

#[tokio::test(flavor = "current_thread")]
async fn start_screen_lists_groups_and_limit_controls() {
    let mut harness = setup_view_harness(QuizConfig::default());
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Cardiology"), "missing group in {html}");
    assert!(html.contains("Surgery"), "missing group in {html}");
    assert!(html.contains("Select All"), "missing toggle in {html}");
    assert!(html.contains("No Limit"), "missing limit label in {html}");
    assert!(html.contains("Start Test"), "missing start button in {html}");

    harness.dispatch(QuizIntent::TogglePreset(QuestionLimit::new(100)));
    harness.dispatch(QuizIntent::ToggleAll);
    let html = harness.render();
    assert!(
        html.contains(r#"<span class="current-limit">100 Questions</span>"#),
        "missing chosen limit in {html}"
    );
    assert!(html.contains("Deselect All"), "missing toggle in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn fixed_limit_mode_hides_adjusters() {
    let config =
        QuizConfig::default().with_limit_mode(LimitMode::Fixed(QuestionLimit::new(100)));
    let mut harness = setup_view_harness(config);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Questions per test: 100 Questions"),
        "missing fixed limit in {html}"
    );
    assert!(!html.contains("limit-stepper"), "unexpected stepper in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn start_without_selection_shows_error() {
    let mut harness = setup_view_harness(QuizConfig::default());
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(QuizIntent::Start);
    let html = harness.render();
    assert!(
        html.contains("Please select at least one category!"),
        "missing selection error in {html}"
    );
    let phase = harness
        .dom
        .in_runtime(|| harness.handles.vm().peek().phase());
    assert_eq!(phase, QuizPhase::Idle);
}

#[tokio::test(flavor = "current_thread")]
async fn empty_group_reports_no_questions() {
    let mut harness = setup_view_harness(QuizConfig::default());
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(QuizIntent::ToggleGroup(GroupId::new("empty.json")));
    harness.dispatch(QuizIntent::Start);
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("No questions found in selected categories."),
        "missing empty error in {html}"
    );
    assert!(html.contains("Start Test"), "start screen not shown in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_loop_marks_answers_and_shows_result() {
    let mut harness = setup_view_harness(QuizConfig::default());
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(QuizIntent::ToggleGroup(GroupId::new("cardio.json")));
    harness.dispatch(QuizIntent::Start);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Question 1 / 2"), "missing progress in {html}");
    assert!(html.contains("Score: 0"), "missing score in {html}");

    let correct = current_correct(&harness);
    let wrong = if correct == OptionId::new(2) {
        OptionId::new(1)
    } else {
        OptionId::new(2)
    };

    harness.dispatch(QuizIntent::Answer(wrong));
    let html = harness.render();
    assert!(html.contains("answer-btn incorrect"), "missing incorrect mark in {html}");
    assert!(html.contains("answer-btn correct"), "missing correct mark in {html}");

    harness.dispatch(QuizIntent::Next);
    let html = harness.render();
    assert!(html.contains("Question 2 / 2"), "missing progress in {html}");

    let correct = current_correct(&harness);
    harness.dispatch(QuizIntent::Answer(correct));
    harness.dispatch(QuizIntent::Next);
    let html = harness.render();
    assert!(html.contains("Your Score: 1 / 2"), "missing result in {html}");

    harness.dispatch(QuizIntent::Restart);
    let html = harness.render();
    assert!(html.contains("Start Test"), "start screen not shown in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn saved_session_is_resumed_on_mount() {
    let storage = Storage::in_memory();
    let question = RawQuestion {
        question: "Resumed question?".into(),
        answers: vec!["yes".into(), "no".into()],
        correct_answer: "yes".into(),
    }
    .validate(QuestionId::new(1))
    .expect("valid question");
    let snapshot = SessionSnapshot {
        selected_groups: vec![GroupId::new("cardio.json")],
        questions: vec![question],
        current_index: 0,
        score: 0,
        limit: QuestionLimit::UNLIMITED,
        in_progress: true,
        answered: None,
        started_at: Some(fixed_now()),
    };
    storage
        .snapshots
        .save_snapshot("default", &snapshot)
        .await
        .expect("save snapshot");

    let mut harness = setup_view_harness_with_storage(QuizConfig::default(), storage);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Resumed question?"), "missing resumed question in {html}");
    assert!(html.contains("Question 1 / 1"), "missing progress in {html}");
}
