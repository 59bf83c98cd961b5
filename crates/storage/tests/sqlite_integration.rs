use quiz_core::model::{
    GroupId, OptionId, Preferences, QuestionId, QuestionLimit, RawQuestion, SessionSnapshot, Theme,
};
use quiz_core::time::fixed_now;
use storage::repository::{PreferencesRepository, SessionSnapshotRepository, StorageError};
use storage::sqlite::SqliteRepository;

fn in_progress_snapshot() -> SessionSnapshot {
    let questions = (1..=3)
        .map(|id| {
            RawQuestion {
                question: format!("Question {id}"),
                answers: vec!["yes".into(), "no".into()],
                correct_answer: "yes".into(),
            }
            .validate(QuestionId::new(id))
            .unwrap()
        })
        .collect();

    SessionSnapshot {
        selected_groups: vec![GroupId::new("group1.json"), GroupId::new("group4.json")],
        questions,
        current_index: 1,
        score: 1,
        limit: QuestionLimit::new(3),
        in_progress: true,
        answered: Some(OptionId::new(1)),
        started_at: Some(fixed_now()),
    }
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_snapshot_round_trip_and_overwrite() {
    let repo = connect("memdb_snapshots").await;
    let snapshot = in_progress_snapshot();

    repo.save_snapshot("default", &snapshot).await.unwrap();
    let loaded = repo.load_snapshot("default").await.unwrap().unwrap();
    assert_eq!(loaded, snapshot);

    let mut advanced = snapshot.clone();
    advanced.current_index = 2;
    advanced.answered = None;
    repo.save_snapshot("default", &advanced).await.unwrap();
    let loaded = repo.load_snapshot("default").await.unwrap().unwrap();
    assert_eq!(loaded.current_index, 2);
    assert_eq!(loaded.answered, None);

    assert!(repo.load_snapshot("other").await.unwrap().is_none());

    repo.clear_snapshot("default").await.unwrap();
    assert!(repo.load_snapshot("default").await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_rejects_corrupt_snapshot_payload() {
    let repo = connect("memdb_corrupt").await;
    sqlx::query(
        "INSERT INTO session_snapshots (scope, payload, updated_at) VALUES ('x', '[1,2', '2024-01-01T00:00:00Z')",
    )
    .execute(repo.pool())
    .await
    .unwrap();

    let err = repo.load_snapshot("x").await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn sqlite_preferences_upsert() {
    let repo = connect("memdb_preferences").await;
    assert!(repo.get_preferences().await.unwrap().is_none());

    let prefs = Preferences {
        theme: Theme::Dark,
        limit: QuestionLimit::new(150),
    };
    repo.save_preferences(&prefs).await.unwrap();
    repo.save_preferences(&Preferences {
        theme: Theme::Light,
        ..prefs
    })
    .await
    .unwrap();

    let loaded = repo.get_preferences().await.unwrap().unwrap();
    assert_eq!(loaded.theme, Theme::Light);
    assert_eq!(loaded.limit, QuestionLimit::new(150));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
