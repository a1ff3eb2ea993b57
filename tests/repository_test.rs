//! Integration tests for the connection lifecycle and the todo repository.
//!
//! These run against a live MongoDB named by `TODODACTYL_TEST_DB_URI`. Each
//! test works in its own throwaway database. Without the variable the tests
//! return early.

use std::sync::Arc;

use chrono::NaiveDate;
use tododactyl::{ConnectionManager, ConnectionState, StoreConfig, TodoItem, TodoRepository};
use uuid::Uuid;

const URI_VAR: &str = "TODODACTYL_TEST_DB_URI";

/// Helper: connected manager on a fresh database, or `None` when no server is configured.
async fn setup() -> Option<(Arc<ConnectionManager>, TodoRepository)> {
    let Ok(uri) = std::env::var(URI_VAR) else {
        eprintln!("{URI_VAR} not set, skipping");
        return None;
    };
    let database = format!("tododactyl_test_{}", Uuid::new_v4().simple());
    let manager = Arc::new(ConnectionManager::new(
        StoreConfig::new(uri, database).unwrap(),
    ));
    manager.connect().await.unwrap();
    let repo = TodoRepository::new(manager.clone());
    Some((manager, repo))
}

async fn teardown(manager: &ConnectionManager) {
    manager.store().await.unwrap().drop().await.unwrap();
    manager.disconnect().await.unwrap();
}

fn todo(description: &str) -> TodoItem {
    TodoItem::new(
        description,
        ["sample", "test"],
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    )
}

// -----------------------------------------------------------------------
// Connection lifecycle
// -----------------------------------------------------------------------

#[tokio::test]
async fn connect_and_disconnect_are_idempotent() {
    let Some((manager, _repo)) = setup().await else {
        return;
    };

    manager.connect().await.unwrap();
    assert_eq!(manager.state().await, ConnectionState::Connected);
    assert!(manager.store().await.is_ok());

    manager.store().await.unwrap().drop().await.unwrap();
    manager.disconnect().await.unwrap();
    manager.disconnect().await.unwrap();
    assert_eq!(manager.state().await, ConnectionState::Disconnected);
    assert!(manager.store().await.unwrap_err().is_not_connected());
}

#[tokio::test]
async fn reconnect_after_disconnect() {
    let Some((manager, repo)) = setup().await else {
        return;
    };

    manager.disconnect().await.unwrap();
    assert!(repo.list_all().await.unwrap_err().is_not_connected());

    manager.connect().await.unwrap();
    assert!(repo.list_all().await.unwrap().is_empty());

    teardown(&manager).await;
}

// -----------------------------------------------------------------------
// Repository
// -----------------------------------------------------------------------

#[tokio::test]
async fn insert_three_assigns_distinct_ids() {
    let Some((manager, repo)) = setup().await else {
        return;
    };

    for description in ["Learn Rust", "Build a Todo App", "Write Unit Tests"] {
        repo.insert(todo(description)).await.unwrap();
    }

    let mut ids: Vec<i64> = repo.list_all().await.unwrap().iter().map(|t| t.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);

    teardown(&manager).await;
}

#[tokio::test]
async fn insert_then_find_round_trips() {
    let Some((manager, repo)) = setup().await else {
        return;
    };

    let original = todo("Round trip");
    let inserted = repo.insert(original.clone()).await.unwrap();
    assert_ne!(inserted.id, 0);

    let fetched = repo.find_by_id(inserted.id).await.unwrap().unwrap();
    assert_eq!(fetched, inserted);
    assert_eq!(fetched, original.with_id(inserted.id));

    teardown(&manager).await;
}

#[tokio::test]
async fn explicit_ids_are_kept_and_generation_continues_above_them() {
    let Some((manager, repo)) = setup().await else {
        return;
    };

    let explicit = repo.insert(todo("explicit").with_id(10)).await.unwrap();
    assert_eq!(explicit.id, 10);

    let generated = repo.insert(todo("generated")).await.unwrap();
    assert_eq!(generated.id, 11);

    let duplicate = repo.insert(todo("again").with_id(10)).await.unwrap_err();
    assert!(matches!(duplicate, tododactyl::TodoError::DuplicateId(10)));

    let negative = repo.insert(todo("negative").with_id(-1)).await.unwrap_err();
    assert!(matches!(negative, tododactyl::TodoError::InvalidId(-1)));
    assert_eq!(repo.list_all().await.unwrap().len(), 2);

    teardown(&manager).await;
}

#[tokio::test]
async fn generated_ids_are_not_reused_after_removal() {
    let Some((manager, repo)) = setup().await else {
        return;
    };

    let first = repo.insert(todo("first")).await.unwrap();
    let second = repo.insert(todo("second")).await.unwrap();
    repo.remove_by_id(second.id).await.unwrap();

    let third = repo.insert(todo("third")).await.unwrap();
    assert!(third.id > second.id);
    assert_ne!(third.id, first.id);

    teardown(&manager).await;
}

#[tokio::test]
async fn concurrent_inserts_get_unique_ids() {
    let Some((manager, repo)) = setup().await else {
        return;
    };

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.insert(todo(&format!("todo {i}"))).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);

    teardown(&manager).await;
}

#[tokio::test]
async fn update_changes_fields_and_keeps_id() {
    let Some((manager, repo)) = setup().await else {
        return;
    };

    let inserted = repo.insert(todo("Learn Rust")).await.unwrap();
    let updated = TodoItem {
        description: "Learn Advanced Rust".into(),
        ..inserted.clone()
    };
    repo.update(&updated).await.unwrap();

    let fetched = repo.find_by_id(inserted.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, inserted.id);
    assert_eq!(fetched.description, "Learn Advanced Rust");
    assert_eq!(fetched.tags, inserted.tags);

    teardown(&manager).await;
}

#[tokio::test]
async fn update_missing_is_not_found_and_does_not_insert() {
    let Some((manager, repo)) = setup().await else {
        return;
    };

    repo.insert(todo("existing")).await.unwrap();
    let before = repo.list_all().await.unwrap();

    let err = repo.update(&todo("ghost").with_id(999)).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(repo.list_all().await.unwrap(), before);

    teardown(&manager).await;
}

#[tokio::test]
async fn remove_then_find_returns_none() {
    let Some((manager, repo)) = setup().await else {
        return;
    };

    let inserted = repo.insert(todo("to remove")).await.unwrap();
    let removed = repo.remove_by_id(inserted.id).await.unwrap();
    assert_eq!(removed, inserted);

    assert!(repo.find_by_id(inserted.id).await.unwrap().is_none());

    let again = repo.remove_by_id(inserted.id).await.unwrap_err();
    assert!(again.is_not_found());

    teardown(&manager).await;
}

#[tokio::test]
async fn empty_collection_lists_nothing() {
    let Some((manager, repo)) = setup().await else {
        return;
    };

    assert!(repo.list_all().await.unwrap().is_empty());
    assert!(repo.find_by_id(1).await.unwrap().is_none());

    teardown(&manager).await;
}

#[tokio::test]
async fn repositories_on_different_collections_are_independent() {
    let Some((manager, repo)) = setup().await else {
        return;
    };
    let archive = TodoRepository::with_collection(manager.clone(), "archive");

    repo.insert(todo("active")).await.unwrap();
    let archived = archive.insert(todo("archived")).await.unwrap();

    assert_eq!(archived.id, 1);
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
    assert_eq!(archive.list_all().await.unwrap().len(), 1);

    teardown(&manager).await;
}
