use std::sync::Arc;

use quiz_core::model::{GroupId, QuestionLimit, QuizConfig};
use services::{
    HttpQuestionSource, LoadFailure, QuestionLoader, QuizError, QuizLoopService, QuizPhase,
    SourceError,
};
use storage::repository::InMemoryRepository;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUP_ONE: &str = r#"[
    {"question": "Normal resting heart rate?", "answers": ["60-100", "20-40"], "correctAnswer": "60-100"},
    {"question": "Valve between LA and LV?", "answers": ["Mitral", "Tricuspid", "Aortic"], "correctAnswer": "Mitral"}
]"#;

async fn server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/questions/group1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GROUP_ONE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/questions/broken.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"question": "x"}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

fn service(server: &MockServer) -> QuizLoopService {
    let source = HttpQuestionSource::new(&format!("{}/questions/", server.uri())).unwrap();
    QuizLoopService::new(
        QuestionLoader::new(Arc::new(source)),
        Arc::new(InMemoryRepository::new()),
        QuizConfig::default(),
    )
}

#[tokio::test]
async fn loads_questions_over_http() {
    let server = server().await;
    let service = service(&server);
    let mut engine = service.new_engine();

    service
        .start(
            &mut engine,
            &[GroupId::new("group1.json")],
            QuestionLimit::UNLIMITED,
        )
        .await
        .unwrap();
    assert_eq!(engine.phase(), QuizPhase::InProgress);
    assert_eq!(engine.state().total(), 2);
}

#[tokio::test]
async fn not_found_resource_fails_the_start() {
    let server = server().await;
    let service = service(&server);
    let mut engine = service.new_engine();

    let err = service
        .start(
            &mut engine,
            &[GroupId::new("group1.json"), GroupId::new("group99.json")],
            QuestionLimit::UNLIMITED,
        )
        .await
        .unwrap_err();

    let QuizError::Load(load) = err else {
        panic!("expected a load error, got {err:?}");
    };
    assert_eq!(load.group, GroupId::new("group99.json"));
    assert_eq!(load.failure, LoadFailure::Source(SourceError::Status(404)));
    assert_eq!(engine.phase(), QuizPhase::Idle);
    assert!(engine.current_question().is_none());
}

#[tokio::test]
async fn non_array_payload_fails_the_start() {
    let server = server().await;
    let service = service(&server);
    let mut engine = service.new_engine();

    let err = service
        .start(
            &mut engine,
            &[GroupId::new("broken.json")],
            QuestionLimit::UNLIMITED,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QuizError::Load(ref load) if load.failure == LoadFailure::NotAnArray
    ));
}
