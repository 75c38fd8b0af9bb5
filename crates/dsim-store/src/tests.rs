use dsim_agent::StateUpdate;

use crate::{MemoryBackend, StateStore};

fn update(order_key: &str, value: serde_json::Value) -> StateUpdate {
    StateUpdate::new("people", order_key, "set_state", vec![value])
}

#[test]
fn flush_applies_updates_in_order_key_order() {
    let mut store = StateStore::new("people", MemoryBackend::new());
    store.handle_update(update("b", serde_json::json!(2)));
    store.handle_update(update("a", serde_json::json!(1)));

    let report = store.flush().unwrap();
    assert_eq!(report.updates_applied, 2);
    assert_eq!(store.backend().get("a"), Some(&serde_json::json!(1)));
    assert_eq!(store.backend().get("b"), Some(&serde_json::json!(2)));
}

#[test]
fn later_update_to_the_same_key_wins() {
    let mut store = StateStore::new("people", MemoryBackend::new());
    store.handle_update(update("a", serde_json::json!("first")));
    store.handle_update(update("a", serde_json::json!("second")));
    store.flush().unwrap();
    assert_eq!(store.backend().get("a"), Some(&serde_json::json!("second")));
}

#[test]
fn flush_clears_the_buffer() {
    let mut store = StateStore::new("people", MemoryBackend::new());
    store.handle_update(update("a", serde_json::json!(1)));
    store.flush().unwrap();
    assert_eq!(store.pending_len(), 0);
}

#[test]
fn unknown_method_is_an_error() {
    let mut store = StateStore::new("people", MemoryBackend::new());
    store.handle_update(StateUpdate::new("people", "a", "nonexistent", vec![]));
    assert!(store.flush().is_err());
}

#[test]
fn delete_removes_a_row() {
    let mut store = StateStore::new("people", MemoryBackend::new());
    store.handle_update(update("a", serde_json::json!(1)));
    store.flush().unwrap();
    store.handle_update(StateUpdate::new("people", "a", "delete", vec![]));
    store.flush().unwrap();
    assert!(store.backend().get("a").is_none());
}

#[cfg(feature = "sqlite")]
mod sqlite_backend {
    use super::update;
    use crate::{SqliteBackend, StateStore};

    #[test]
    fn round_trips_through_sqlite() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let mut store = StateStore::new("people", backend);
        store.handle_update(update("a", serde_json::json!({"age": 30})));
        store.flush().unwrap();
        assert_eq!(
            store.backend().get("a").unwrap(),
            Some(serde_json::json!({"age": 30}))
        );
    }

    #[test]
    fn finish_is_idempotent_and_preserves_reads() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let mut store = StateStore::new("people", backend);
        store.handle_update(update("a", serde_json::json!({"age": 30})));
        store.flush().unwrap();

        store.backend_mut().finish().unwrap();
        store.backend_mut().finish().unwrap();

        assert_eq!(
            store.backend().get("a").unwrap(),
            Some(serde_json::json!({"age": 30}))
        );
    }
}
