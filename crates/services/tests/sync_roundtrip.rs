use std::fs;

use chrono::NaiveDate;
use services::{AppServices, Clock, SyncError, default_backup_file_name};
use thesis_core::model::{Priority, Snapshot};
use thesis_core::state::{AppState, Intent};
use thesis_core::time::fixed_now;

#[tokio::test]
async fn file_sync_carries_a_dataset_between_databases() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(default_backup_file_name(fixed_now()));

    let clock = Clock::fixed(fixed_now());
    let mut source = AppServices::new_sqlite(
        "sqlite:file:memdb_sync_source?mode=memory&cache=shared",
        clock,
    )
    .await
    .expect("boot source");

    source
        .tracker_mut()
        .dispatch(Intent::AddTask {
            text: "Ship the appendix".into(),
            priority: Priority::Medium,
            deadline: NaiveDate::from_ymd_opt(2024, 3, 1),
        })
        .await;

    source
        .file_sync_mut()
        .create(&path)
        .await
        .expect("create backup file");
    assert!(source.file_sync().is_connected());
    assert_eq!(
        source.file_sync().file_name(),
        Some("thesis-backup-2023-11-14.json")
    );
    assert_eq!(source.file_sync().last_synced_at(), Some(fixed_now()));

    // the file on disk is one pretty-printed snapshot
    let written = fs::read_to_string(&path).expect("read backup");
    let snapshot: Snapshot = serde_json::from_str(&written).expect("parse backup");
    assert_eq!(snapshot.exported_at, fixed_now());
    assert_eq!(snapshot.chapters.len(), 5);
    assert_eq!(snapshot.tasks.len(), 4);

    // an unrelated database opens the same file and takes over its data
    let mut target = AppServices::new_sqlite(
        "sqlite:file:memdb_sync_target?mode=memory&cache=shared",
        clock,
    )
    .await
    .expect("boot target");
    let first_task = target.tracker().state().tasks()[0].id();
    target
        .tracker_mut()
        .dispatch(Intent::DeleteTask(first_task))
        .await;
    assert_eq!(target.tracker().state().tasks().len(), 2);

    let outcome = target
        .file_sync_mut()
        .open(&path)
        .await
        .expect("open backup");
    assert_eq!(outcome.tasks, Some(4));
    assert_eq!(outcome.chapters, Some(5));
    target.tracker_mut().rehydrate().await;

    let tasks = target.tracker().state().tasks();
    assert_eq!(tasks.len(), 4);
    assert!(tasks.iter().any(|t| t.text() == "Ship the appendix"));
}

#[tokio::test]
async fn save_and_load_refresh_through_the_linked_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("linked.json");

    let clock = Clock::fixed(fixed_now());
    let mut services = AppServices::new_sqlite(
        "sqlite:file:memdb_sync_linked?mode=memory&cache=shared",
        clock,
    )
    .await
    .expect("boot services");
    services.file_sync_mut().create(&path).await.expect("create");

    // push later work out to the linked file
    services
        .tracker_mut()
        .dispatch(Intent::AddTask {
            text: "Update the acknowledgements".into(),
            priority: Priority::Low,
            deadline: None,
        })
        .await;
    assert!(services.file_sync_mut().save().await.expect("save"));

    // wipe the database, then pull the file back in
    services
        .tracker_mut()
        .replace_state(AppState::default())
        .await
        .expect("replace state");
    assert!(services.tracker().state().tasks().is_empty());

    let outcome = services
        .file_sync_mut()
        .load()
        .await
        .expect("load")
        .expect("a linked file");
    assert_eq!(outcome.tasks, Some(4));
    services.tracker_mut().rehydrate().await;
    assert_eq!(services.tracker().state().tasks().len(), 4);

    // once disconnected the file sync goes quiet
    services.file_sync_mut().disconnect();
    assert!(services.file_sync().file_name().is_none());
    assert!(!services.file_sync_mut().save().await.expect("unlinked save"));
}

#[tokio::test]
async fn open_rejects_a_malformed_file_and_stays_unlinked() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ this is not json").expect("write junk");

    let clock = Clock::fixed(fixed_now());
    let mut services = AppServices::new_sqlite(
        "sqlite:file:memdb_sync_broken?mode=memory&cache=shared",
        clock,
    )
    .await
    .expect("boot services");

    let err = services
        .file_sync_mut()
        .open(&path)
        .await
        .expect_err("junk must be rejected");
    assert!(matches!(err, SyncError::Parse(_)));
    assert!(!services.file_sync().is_connected());

    // the starter dataset is still intact underneath
    services.tracker_mut().rehydrate().await;
    assert_eq!(services.tracker().state().chapters().len(), 5);
    assert_eq!(services.tracker().state().tasks().len(), 3);
}
