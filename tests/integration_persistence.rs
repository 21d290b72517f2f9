use std::time::{Duration, Instant};

use chrono::Local;
use keytally::store::{all_keys, CounterStore, SqliteCounterStore, TOTAL_KEY};
use keytally::{Category, KeyStroke, KeyTally};
use tempfile::tempdir;

#[test]
fn counts_survive_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("counters.db");
    let t0 = Instant::now();

    {
        let store = SqliteCounterStore::open(&path).unwrap();
        let mut tally = KeyTally::new(Box::new(store));
        for (i, (key, code)) in [("a", "KeyA"), ("b", "KeyB"), ("1", "Digit1"), ("F5", "F5")]
            .into_iter()
            .enumerate()
        {
            tally.record(
                &KeyStroke::new(key, code),
                t0 + Duration::from_millis(i as u64 * 100),
                Local::now(),
            );
        }
    }

    let store = SqliteCounterStore::open(&path).unwrap();
    assert_eq!(store.read(TOTAL_KEY).unwrap().as_deref(), Some("4"));
    let tally = KeyTally::new(Box::new(store));
    assert_eq!(tally.counters().total(), 4);
    assert_eq!(tally.counters().get(Category::Letter), 2);
    assert_eq!(tally.counters().get(Category::Number), 1);
    assert_eq!(tally.counters().get(Category::FunctionKey), 1);
    // session state is not persisted
    assert_eq!(tally.rate(), 0.0);
    assert!(tally.history().is_empty());
}

#[test]
fn reset_deletes_stored_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("counters.db");

    let mut tally = KeyTally::new(Box::new(SqliteCounterStore::open(&path).unwrap()));
    tally.record(&KeyStroke::new(" ", "Space"), Instant::now(), Local::now());
    tally.reset();
    drop(tally);

    let store = SqliteCounterStore::open(&path).unwrap();
    for key in all_keys() {
        assert_eq!(store.read(key).unwrap(), None, "{key} should be gone");
    }
}

#[test]
fn malformed_stored_value_reads_as_zero() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("counters.db");
    {
        let mut store = SqliteCounterStore::open(&path).unwrap();
        store.write("number_count", "twelve").unwrap();
        store.write("other_key_count", "3").unwrap();
    }

    let tally = KeyTally::new(Box::new(SqliteCounterStore::open(&path).unwrap()));
    assert_eq!(tally.counters().get(Category::Number), 0);
    assert_eq!(tally.counters().get(Category::Other), 3);
    assert_eq!(tally.counters().total(), 3);
}
