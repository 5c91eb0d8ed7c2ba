use hearth_state::{StateError, StateStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

// ── Read / patch / replace contract ──────────────────────────────

#[test]
fn patch_deep_merges_and_preserves_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::open(dir.path()).unwrap();

    store
        .replace("physique", json!({"needs": {"energy": 80, "hunger": 30}}))
        .unwrap();
    store.patch("physique", json!({"needs": {"energy": 50}})).unwrap();

    let (doc, _) = store.read("physique").unwrap();
    assert_eq!(doc, json!({"needs": {"energy": 50, "hunger": 30}}));
}

#[test]
fn patch_never_removes_absent_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::open(dir.path()).unwrap();

    store
        .replace("identity", json!({"name": "Ada", "traits": {"curious": true}}))
        .unwrap();
    store.patch("identity", json!({"mood": "bright"})).unwrap();

    let (doc, _) = store.read("identity").unwrap();
    assert_eq!(
        doc,
        json!({"name": "Ada", "traits": {"curious": true}, "mood": "bright"})
    );
}

#[test]
fn replace_shrinks_domain() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::open(dir.path()).unwrap();

    store.replace("world", json!({"weather": "rain", "season": "spring"})).unwrap();
    store.replace("world", json!({"weather": "sun"})).unwrap();

    let (doc, _) = store.read("world").unwrap();
    assert_eq!(doc, json!({"weather": "sun"}));
}

#[test]
fn versions_strictly_increase_per_domain() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::open(dir.path()).unwrap();

    let mut last = store.read("counter").unwrap().1;
    for i in 0..10 {
        let v = store.patch("counter", json!({"i": i})).unwrap();
        assert!(v > last, "version {v} not greater than {last}");
        last = v;
    }
    let v = store.replace("counter", json!({})).unwrap();
    assert!(v > last);
}

#[test]
fn failed_patch_does_not_bump_version() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::open(dir.path()).unwrap();

    store.patch("social", json!({"friends": 2})).unwrap();
    let before = store.read("social").unwrap().1;

    assert!(matches!(
        store.patch("social", json!("not a document")),
        Err(StateError::TypeMismatch { .. })
    ));
    assert_eq!(store.read("social").unwrap().1, before);
}

// ── Persistence ──────────────────────────────────────────────────

#[test]
fn mutation_writes_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::open(dir.path()).unwrap();

    store.patch("vault", json!({"locked": true})).unwrap();

    let on_disk: serde_json::Value =
        serde_json::from_slice(&std::fs::read(store.snapshot_path("vault")).unwrap()).unwrap();
    assert_eq!(on_disk, json!({"locked": true}));
    assert_eq!(store.failed_writes(), 0);
}

#[test]
fn no_temp_file_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::open(dir.path()).unwrap();
    store.replace("hobby", json!({"current": "pottery"})).unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn reopen_preloads_persisted_domains() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = StateStore::open(dir.path()).unwrap();
        store.replace("avatar", json!({"pose": "idle"})).unwrap();
        store.replace("bios", json!({"awake": true})).unwrap();
    }

    let store = StateStore::open(dir.path()).unwrap();
    assert_eq!(store.domains(), vec!["avatar", "bios"]);
    let (doc, version) = store.read("avatar").unwrap();
    assert_eq!(doc, json!({"pose": "idle"}));
    // Version counters are process-lifetime, so a fresh open starts at 0.
    assert_eq!(version, 0);
}

#[test]
fn malformed_snapshot_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), b"{not json").unwrap();
    std::fs::write(dir.path().join("fine.json"), b"{\"ok\": 1}").unwrap();

    let store = StateStore::open(dir.path()).unwrap();
    assert_eq!(store.domains(), vec!["fine"]);
}

// ── Concurrency ──────────────────────────────────────────────────

#[test]
fn distinct_domains_mutate_concurrently() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(StateStore::open(dir.path()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let domain = format!("worker_{t}");
                for i in 0..50 {
                    store.patch(&domain, json!({"i": i})).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    for t in 0..8 {
        let (doc, version) = store.read(&format!("worker_{t}")).unwrap();
        assert_eq!(doc, json!({"i": 49}));
        assert_eq!(version, 50);
    }
}

#[test]
fn same_domain_mutations_serialize() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(StateStore::open(dir.path()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    store.patch("shared", json!({"touched": true})).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // 100 mutations, each bumping the version exactly once.
    assert_eq!(store.read("shared").unwrap().1, 100);
}

// ── Change notification ──────────────────────────────────────────

#[test]
fn change_listener_sees_every_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::open(dir.path()).unwrap();

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.set_change_listener(move |domain, version| {
        sink.lock().unwrap().push((domain.to_string(), version));
    });

    store.patch("desktop", json!({"open": "editor"})).unwrap();
    store.replace("desktop", json!({})).unwrap();
    store.read("desktop").unwrap(); // reads do not notify

    assert_eq!(
        *seen.lock().unwrap(),
        vec![("desktop".to_string(), 1), ("desktop".to_string(), 2)]
    );
}
