use std::fs;
use std::sync::Arc;
use std::thread;

use cite_core::corpus::CorpusSource;
use cite_core::store::CitationStore;

fn one_record(id: &str) -> String {
    format!(
        r#"[{{"id":"{id}","title":"T","url":"https://x.example","domain":"x.example","publishedAt":"2024-01-01","keyFinding":"k","confidence":"High"}}]"#
    )
}

#[test]
fn reload_swaps_snapshot_and_detects_change() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("citations.json");
    fs::write(&path, one_record("FIRST")).expect("write");

    let store = CitationStore::new(CorpusSource::JsonFile(path.clone()));
    let before = store.corpus().expect("load");
    assert!(before.get("FIRST").is_some());

    let unchanged = store.reload().expect("reload");
    assert!(!unchanged.changed);

    fs::write(&path, one_record("SECOND")).expect("rewrite");
    let outcome = store.reload().expect("reload");
    assert!(outcome.changed);
    assert_eq!(outcome.report.accepted, 1);

    // Old snapshot is untouched; new callers see the new corpus.
    assert!(before.get("FIRST").is_some());
    let after = store.corpus().expect("corpus");
    assert!(after.get("SECOND").is_some());
    assert!(after.get("FIRST").is_none());
}

#[test]
fn failed_reload_keeps_previous_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("citations.json");
    fs::write(&path, one_record("KEEP")).expect("write");

    let store = CitationStore::new(CorpusSource::JsonFile(path.clone()));
    store.corpus().expect("load");

    fs::write(&path, "{ not json").expect("corrupt");
    let err = store.reload().unwrap_err();
    assert_eq!(err.code, "CORPUS_MALFORMED");
    assert!(store.corpus().expect("still loaded").get("KEEP").is_some());
}

#[test]
fn concurrent_readers_share_one_snapshot() {
    let store = Arc::new(CitationStore::new(CorpusSource::Builtin));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.corpus().expect("corpus").len())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().expect("join"), 12);
    }
}
