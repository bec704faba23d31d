use std::sync::atomic::{AtomicUsize, Ordering};

use platform::{SESSION_KEY, TOKEN_KEY};

use super::*;

fn scratch() -> FileStore {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!("lll-cli-store-{}-{n}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);
    FileStore::new(path)
}

#[test]
fn missing_file_reads_as_empty() {
    let store = scratch();
    assert_eq!(store.get(TOKEN_KEY), None);
}

#[test]
fn values_survive_a_new_handle() {
    let store = scratch();
    store.set(TOKEN_KEY, "tok");
    store.set(SESSION_KEY, r#"{"id":1}"#);

    let reopened = FileStore::new(store.path());
    assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("tok"));
    assert_eq!(reopened.get(SESSION_KEY).as_deref(), Some(r#"{"id":1}"#));
    reopened.remove(TOKEN_KEY);
    reopened.remove(SESSION_KEY);
}

#[test]
fn removing_last_key_deletes_file() {
    let store = scratch();
    store.set(TOKEN_KEY, "tok");
    assert!(store.path().exists());

    store.remove(TOKEN_KEY);
    assert!(!store.path().exists());
    store.remove(TOKEN_KEY);
}

#[test]
fn corrupt_file_is_treated_as_empty() {
    let store = scratch();
    std::fs::write(store.path(), "not json").unwrap();

    assert_eq!(store.get(TOKEN_KEY), None);
    store.set(TOKEN_KEY, "fresh");
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("fresh"));
    store.remove(TOKEN_KEY);
}
