//! Searching documents whose indexes live in a store.

use demo_data::{DEMO_DOCUMENTS, DEMO_QUERIES, ENGLISH, FOX, FRENCH};
use fuzzmark::{
    FindOptions, HookResult, IndexDatabase, IndexRead, IndexStore, MemoryStore, SeekError, SeekOptions, SeekService,
    Seeker,
};
use std::sync::Arc;
use tempfile::TempDir;

fn options_for(locale: Option<&str>) -> FindOptions {
    FindOptions {
        locale: locale.map(str::to_string),
        ..FindOptions::default()
    }
}

#[test]
fn lazy_reads_agree_with_in_memory_index() {
    let database = IndexDatabase::open_in_memory().unwrap();
    let seeker = Seeker::new(SeekOptions::default()).unwrap().with_store(database);

    for doc in DEMO_DOCUMENTS {
        let index = seeker.index(doc.text, Some(doc.id), doc.locale).unwrap();
        for &(query, exact, consecutive) in DEMO_QUERIES {
            let find = options_for(doc.locale).exact(exact).consecutive(consecutive);
            let terms = seeker.query_terms(query, doc.locale).unwrap();
            let direct = seeker.match_index(&index, &terms, &find).unwrap();
            let stored = seeker.match_stored(doc.id, &terms, &find).unwrap();
            assert_eq!(direct, stored, "{} / {query}", doc.id);
        }
    }
}

#[test]
fn whole_index_reads_agree_with_per_key_reads() {
    let per_key = Seeker::new(SeekOptions::default())
        .unwrap()
        .with_store(IndexDatabase::open_in_memory().unwrap());
    let whole = Seeker::new(SeekOptions::default())
        .unwrap()
        .with_store(IndexDatabase::open_in_memory().unwrap().with_whole_index_limit(usize::MAX));

    for seeker in [&per_key, &whole] {
        seeker.index(FOX.text, Some(FOX.id), None).unwrap();
    }
    let find = FindOptions::default().consecutive(true);
    let a = per_key.find(&[FOX.id], "quikc brown", &find).unwrap();
    let b = whole.find(&[FOX.id], "quikc brown", &find).unwrap();
    assert_eq!(a, b);
    assert_eq!(a[0].marks.len(), 2);
}

#[test]
fn whole_reads_hit_the_store_once() {
    let store = Arc::new(MemoryStore::serving_whole());
    let seeker = Seeker::new(SeekOptions::default())
        .unwrap()
        .with_shared_store(store.clone());
    seeker.index(ENGLISH.text, Some(ENGLISH.id), ENGLISH.locale).unwrap();

    let hits = seeker
        .find(&[ENGLISH.id], "ointur sevrants weddings", &options_for(ENGLISH.locale))
        .unwrap();
    assert_eq!(hits[0].marks.len(), 3);
    assert_eq!(store.reads(), 1);
}

#[test]
fn unknown_documents_rank_last() {
    let database = IndexDatabase::open_in_memory().unwrap();
    let seeker = Seeker::new(SeekOptions::default()).unwrap().with_store(database);
    seeker.index(FOX.text, Some(FOX.id), None).unwrap();

    let hits = seeker
        .find(&["missing", FOX.id], "brown fox", &FindOptions::default())
        .unwrap();
    assert_eq!(hits[0].document, FOX.id);
    assert_eq!(hits[1].document, "missing");
    assert!(hits[1].marks.is_empty());

    let matched = seeker
        .find(&["missing", FOX.id], "brown fox", &FindOptions::default().matched_only(true))
        .unwrap();
    assert_eq!(matched.len(), 1);
}

#[test]
fn on_disk_index_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.db");
    {
        let seeker = Seeker::new(SeekOptions::default())
            .unwrap()
            .with_store(IndexDatabase::open(&path).unwrap());
        for doc in DEMO_DOCUMENTS {
            seeker.index(doc.text, Some(doc.id), doc.locale).unwrap();
        }
    }

    let database = IndexDatabase::open(&path).unwrap();
    let mut ids = database.documents().unwrap();
    ids.sort();
    let mut expected: Vec<String> = DEMO_DOCUMENTS.iter().map(|d| d.id.to_string()).collect();
    expected.sort();
    assert_eq!(ids, expected);

    let seeker = Seeker::new(SeekOptions::default()).unwrap().with_store(database);
    let hits = seeker
        .find(&[FRENCH.id], "mais ne pas maintenant", &options_for(FRENCH.locale).consecutive(true))
        .unwrap();
    assert_eq!(hits[0].marks.len(), 4);
}

struct FailingStore;

impl IndexStore for FailingStore {
    fn read_index(&self, _document: &str, _key: &str, _locale: Option<&str>) -> HookResult<Option<IndexRead>> {
        Err("store offline".into())
    }
}

#[test]
fn store_failure_aborts_find() {
    let seeker = Seeker::new(SeekOptions::default()).unwrap().with_store(FailingStore);
    let err = seeker
        .find(&[FOX.id], "brown", &FindOptions::default())
        .unwrap_err();
    assert!(matches!(err, SeekError::Hook { .. }));
}

#[tokio::test]
async fn service_finds_across_stored_documents() {
    let seeker = Seeker::new(SeekOptions::default())
        .unwrap()
        .with_store(IndexDatabase::open_in_memory().unwrap());
    let service = SeekService::new(seeker);

    for doc in DEMO_DOCUMENTS {
        service
            .index(doc.text.to_string(), Some(doc.id.to_string()), doc.locale.map(str::to_string))
            .await
            .unwrap();
    }

    let ids: Vec<String> = DEMO_DOCUMENTS.iter().map(|d| d.id.to_string()).collect();
    let hits = service
        .find(ids, "quick brown".to_string(), FindOptions::default().matched_only(true))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document, FOX.id);
}
