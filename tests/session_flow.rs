//! End-to-end play-throughs of the session engine through the library API.

use std::{sync::Arc, time::Duration};

use geoquiz_back::{
    catalog::MemoryCatalog,
    dao::{
        best_record::{BestRecord, BestRecordStore, RecordUpdate},
        record_store::FileRecordStore,
    },
    services::session_service,
    state::{
        AppState, SessionHandle, SessionOptions, SseHub,
        answers::AnswerStatus,
        scoring::Tier,
        selector::RandomSource,
        session::{GameSession, GuessKind},
        state_machine::SessionPhase,
    },
};
use tempfile::TempDir;
use uuid::Uuid;

/// Always picks the first remaining name.
struct FirstPick;

impl RandomSource for FirstPick {
    fn next_unit(&mut self) -> f64 {
        0.0
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

fn handle(hub: SseHub) -> SessionHandle {
    let session = GameSession::new(Uuid::new_v4(), "pair", Box::new(FirstPick));
    SessionHandle::new(session, Duration::from_millis(1_000), hub)
}

#[tokio::test(start_paused = true)]
async fn two_targets_with_a_hint_grade_five() {
    let handle = handle(SseHub::new(32));
    let snapshot = handle.start(names(&["Alpha", "Beta"])).await.unwrap();
    assert_eq!(snapshot.current_target.as_deref(), Some("Alpha"));
    assert_eq!(snapshot.message, "Find: Alpha");

    let (outcome, snapshot) = handle.submit_guess("Alpha").await;
    assert_eq!(
        outcome.kind,
        GuessKind::Correct {
            tier: Tier::Correct,
            points: 1.0
        }
    );
    assert_eq!((snapshot.score, snapshot.total), (1, 2));
    assert_eq!(snapshot.current_target.as_deref(), Some("Beta"));

    let (outcome, _) = handle.submit_guess("Alpha").await;
    assert_eq!(outcome.kind, GuessKind::AlreadySolved);
    for (guess, attempts) in [("Gamma", 1), ("Delta", 2)] {
        let (outcome, _) = handle.submit_guess(guess).await;
        assert_eq!(
            outcome.kind,
            GuessKind::Incorrect {
                attempts,
                hint: false
            }
        );
    }

    let (outcome, snapshot) = handle.submit_guess("Epsilon").await;
    assert_eq!(
        outcome.kind,
        GuessKind::Incorrect {
            attempts: 3,
            hint: true
        }
    );
    assert_eq!(snapshot.answers.get("Beta"), Some(&AnswerStatus::Blinking));

    let (outcome, snapshot) = handle.submit_guess("Beta").await;
    assert_eq!(
        outcome.kind,
        GuessKind::Correct {
            tier: Tier::Tier3,
            points: 0.0
        }
    );
    let run = outcome.completion.expect("last target completes the quiz");
    assert_eq!(run.grade, 5.0);
    assert_eq!(snapshot.phase, SessionPhase::Won);
    assert_eq!(snapshot.current_target, None);
    assert_eq!(snapshot.points, 1.0);
    assert_eq!(snapshot.message, "Victory! You completed the map!");
}

#[tokio::test(start_paused = true)]
async fn wrong_guess_flash_clears_after_the_delay() {
    let handle = handle(SseHub::new(32));
    handle.start(names(&["Alpha", "Beta"])).await.unwrap();

    let (_, snapshot) = handle.submit_guess("Beta").await;
    assert_eq!(snapshot.answers.get("Beta"), Some(&AnswerStatus::Incorrect));

    tokio::time::sleep(Duration::from_millis(1_001)).await;
    tokio::task::yield_now().await;
    assert_eq!(handle.snapshot().await.answers.get("Beta"), None);
}

#[tokio::test]
async fn best_record_policy_on_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("records.json");
    let records = BestRecordStore::new(Arc::new(FileRecordStore::new(&path)));

    records.submit("soria", 6.0, 90_000).await.unwrap();
    assert!(records.submit("soria", 6.0, 80_000).await.unwrap().is_new_best());
    assert_eq!(
        records.submit("soria", 5.9, 10_000).await.unwrap(),
        RecordUpdate::Kept
    );

    let reopened = BestRecordStore::new(Arc::new(FileRecordStore::new(&path)));
    assert_eq!(
        reopened.get("soria").await.unwrap(),
        Some(BestRecord {
            quiz_id: "soria".into(),
            grade: 6.0,
            elapsed_ms: 80_000,
        })
    );

    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["geoquiz_best_score_soria"], "6.0");
    assert_eq!(raw["geoquiz_best_time_soria"], "80000");
}

#[tokio::test]
async fn service_round_persists_a_perfect_run() {
    let tmp = TempDir::new().unwrap();
    let catalog = MemoryCatalog::new().with_names("trio", ["Uno", "Dos", "Tres"]);
    let records = BestRecordStore::new(Arc::new(FileRecordStore::new(
        tmp.path().join("records.json"),
    )));
    let state = AppState::new(
        Arc::new(catalog),
        records,
        SessionOptions {
            rng_seed: Some(11),
            ..SessionOptions::default()
        },
    );

    let mut snapshot = session_service::init_session(&state, "trio").await.unwrap();
    let id = snapshot.session_id;
    let mut completions = 0;
    while let Some(target) = snapshot.current_target.clone() {
        let result = session_service::submit_guess(&state, id, &target).await.unwrap();
        if result.new_best.is_some() {
            completions += 1;
        }
        snapshot = result.snapshot;
    }

    assert_eq!(completions, 1);
    assert_eq!(snapshot.phase, SessionPhase::Won);
    assert_eq!(snapshot.grade, 10.0);

    let record = state.records().get("trio").await.unwrap().unwrap();
    assert_eq!(record.grade, 10.0);
    assert_eq!(record.elapsed_ms, snapshot.elapsed_ms);
}
