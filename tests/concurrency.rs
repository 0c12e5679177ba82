//! Concurrency Tests
//!
//! - One engine serves parallel attempts with per-attempt isolation
//! - Concurrent resolution of one identifier loads the schema once
//! - Different identifiers load independently

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use pdsgate::artifact::ArtifactBuilder;
use pdsgate::schema::{SchemaId, SourceError};
use pdsgate::{GateConfig, Outcome, SchemaCache, SchemaSource, ValidationEngine};

// =============================================================================
// Helper Functions
// =============================================================================

/// Source that counts fetches per identifier and is slow enough for loads
/// to race.
struct CountingSource {
    documents: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl CountingSource {
    fn new(ids: &[&str]) -> Self {
        let documents = ids
            .iter()
            .map(|id| {
                let doc = format!(
                    r#"{{"schema_id":"{}","schema_version":"1","fields":[
                        {{"name":"count","type":"int","required":true,
                          "range":{{"min":0,"max":100}}}}]}}"#,
                    id
                );
                (id.to_string(), doc)
            })
            .collect();
        Self {
            documents,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl SchemaSource for CountingSource {
    fn fetch(&self, id: &SchemaId, _max_bytes: usize) -> Result<Vec<u8>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        self.documents
            .get(id.as_str())
            .map(|doc| doc.clone().into_bytes())
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}

fn artifact(count: i64) -> Vec<u8> {
    ArtifactBuilder::new().int("count", count).build().unwrap()
}

// =============================================================================
// Parallel Attempts
// =============================================================================

#[test]
fn test_parallel_attempts_are_isolated() {
    let source = Arc::new(CountingSource::new(&["reading"]));
    let engine = ValidationEngine::new(&GateConfig::default(), source)
        .with_cache(Arc::new(SchemaCache::new()));

    let inputs: Vec<(Vec<u8>, Outcome)> = (0..16)
        .map(|i| match i % 4 {
            0 => (artifact(i), Outcome::Success),
            1 => (artifact(1000 + i), Outcome::RangeViolation),
            2 => (b"PDSA\x01".to_vec(), Outcome::CorruptedStruct),
            _ => (
                ArtifactBuilder::new().string("count", "many").build().unwrap(),
                Outcome::TypeMismatch,
            ),
        })
        .collect();

    thread::scope(|s| {
        for (raw, expected) in &inputs {
            let engine = &engine;
            s.spawn(move || {
                for _ in 0..10 {
                    assert_eq!(engine.validate("reading", raw), *expected);
                }
            });
        }
    });
}

// =============================================================================
// Single Load Per Identifier
// =============================================================================

#[test]
fn test_concurrent_resolution_loads_once() {
    let source = Arc::new(CountingSource::new(&["reading"]));
    let cache = Arc::new(SchemaCache::new());
    let engine = ValidationEngine::new(&GateConfig::default(), source.clone())
        .with_cache(Arc::clone(&cache));

    let threads = 8;
    let barrier = Barrier::new(threads);
    let raw = artifact(5);

    thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                barrier.wait();
                assert_eq!(engine.validate("reading", &raw), Outcome::Success);
            });
        }
    });

    assert_eq!(source.fetches(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_distinct_identifiers_load_independently() {
    let ids = ["a", "b", "c", "d"];
    let source = Arc::new(CountingSource::new(&ids));
    let cache = Arc::new(SchemaCache::new());
    let engine = ValidationEngine::new(&GateConfig::default(), source.clone())
        .with_cache(Arc::clone(&cache));
    let raw = artifact(1);

    thread::scope(|s| {
        for id in ids {
            for _ in 0..3 {
                let (engine, raw) = (&engine, &raw);
                s.spawn(move || assert_eq!(engine.validate(id, raw), Outcome::Success));
            }
        }
    });

    assert_eq!(source.fetches(), ids.len());
    assert_eq!(cache.len(), ids.len());
}

#[test]
fn test_without_cache_every_attempt_fetches() {
    let source = Arc::new(CountingSource::new(&["reading"]));
    let engine = ValidationEngine::new(&GateConfig::default(), source.clone());

    for _ in 0..3 {
        assert_eq!(engine.validate("reading", &artifact(1)), Outcome::Success);
    }
    assert_eq!(source.fetches(), 3);
}

#[test]
fn test_unknown_identifier_is_not_cached() {
    let source = Arc::new(CountingSource::new(&[]));
    let cache = Arc::new(SchemaCache::new());
    let engine = ValidationEngine::new(&GateConfig::default(), source.clone())
        .with_cache(Arc::clone(&cache));

    assert_eq!(engine.validate("ghost", &artifact(1)), Outcome::SchemaNotFound);
    assert_eq!(engine.validate("ghost", &artifact(1)), Outcome::SchemaNotFound);
    assert_eq!(source.fetches(), 2);
    assert!(cache.is_empty());
}
