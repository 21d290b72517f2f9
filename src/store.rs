use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::app_dirs::AppDirs;
use crate::classify::Category;
use crate::counters::CounterState;
use crate::error::Result;

pub const TOTAL_KEY: &str = "keyboard_count";

/// Storage key for a category's tally
pub fn category_key(category: Category) -> &'static str {
    match category {
        Category::Letter => "letter_count",
        Category::Number => "number_count",
        Category::FunctionKey => "function_key_count",
        Category::Other => "other_key_count",
    }
}

pub fn all_keys() -> [&'static str; 5] {
    [
        TOTAL_KEY,
        category_key(Category::Letter),
        category_key(Category::Number),
        category_key(Category::FunctionKey),
        category_key(Category::Other),
    ]
}

/// Decimal string to count. Absent or malformed values count as zero.
pub fn parse_count(key: &str, raw: Option<&str>) -> u64 {
    match raw {
        None => 0,
        Some(s) => match s.trim().parse::<u64>() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("ignoring malformed value {s:?} for {key}: {e}");
                0
            }
        },
    }
}

/// Flat key/value store of decimal-string counters.
pub trait CounterStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Read all tallies once at startup. The total is derived from the
    /// categories so the sum invariant holds even if the stored total drifted.
    fn load_counters(&self) -> CounterState {
        let read = |key: &str| -> u64 {
            match self.read(key) {
                Ok(raw) => parse_count(key, raw.as_deref()),
                Err(e) => {
                    log::warn!("failed to read {key}: {e}");
                    0
                }
            }
        };

        let mut values = [0u64; 4];
        let mut sum = 0u64;
        for category in Category::ALL {
            let key = category_key(category);
            let value = read(key);
            match sum.checked_add(value) {
                Some(next) => {
                    sum = next;
                    values[category.index()] = value;
                }
                None => log::warn!("ignoring {key}={value}, the total would overflow"),
            }
        }
        let [letter, number, function_key, other] = values;
        let state = CounterState::from_parts(letter, number, function_key, other);

        let stored_total = read(TOTAL_KEY);
        if stored_total != state.total() {
            log::warn!(
                "stored total {stored_total} disagrees with category sum {}, using the sum",
                state.total()
            );
        }
        state
    }

    /// Persist the category that just changed plus the total.
    fn save_counters(&mut self, category: Category, state: &CounterState) -> Result<()> {
        self.write(category_key(category), &state.get(category).to_string())?;
        self.write(TOTAL_KEY, &state.total().to_string())
    }

    fn clear_counters(&mut self) -> Result<()> {
        for key in all_keys() {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// SQLite-backed store, one row per key.
#[derive(Debug)]
pub struct SqliteCounterStore {
    conn: Connection,
}

impl SqliteCounterStore {
    /// Open (creating if needed) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        log::info!("opened counter store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Open the store under the per-user state directory.
    pub fn open_default() -> Result<Self> {
        let path = Self::default_path();
        Self::open(path)
    }

    pub fn default_path() -> PathBuf {
        AppDirs::db_path().unwrap_or_else(|| PathBuf::from("keytally_counters.db"))
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS counters (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }
}

impl CounterStore for SqliteCounterStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM counters WHERE key = ?1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO counters (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM counters WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Volatile store for `--no-persist` and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryCounterStore {
    values: HashMap<String, String>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl CounterStore for MemoryCounterStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_count_defaults_to_zero() {
        assert_eq!(parse_count("k", None), 0);
        assert_eq!(parse_count("k", Some("abc")), 0);
        assert_eq!(parse_count("k", Some("-3")), 0);
        assert_eq!(parse_count("k", Some("")), 0);
        assert_eq!(parse_count("k", Some(" 42 ")), 42);
    }

    #[test]
    fn empty_store_loads_zero() {
        let store = SqliteCounterStore::in_memory().unwrap();
        assert_eq!(store.load_counters(), CounterState::default());
    }

    #[test]
    fn save_writes_category_and_total() {
        let mut store = SqliteCounterStore::in_memory().unwrap();
        let mut state = CounterState::default();
        state.record(Category::Number);
        state.record(Category::Number);
        store.save_counters(Category::Number, &state).unwrap();

        assert_eq!(store.read("number_count").unwrap().as_deref(), Some("2"));
        assert_eq!(store.read(TOTAL_KEY).unwrap().as_deref(), Some("2"));
        assert_eq!(store.read("letter_count").unwrap(), None);
    }

    #[test]
    fn write_overwrites_existing_value() {
        let mut store = SqliteCounterStore::in_memory().unwrap();
        store.write("letter_count", "1").unwrap();
        store.write("letter_count", "9").unwrap();
        assert_eq!(store.read("letter_count").unwrap().as_deref(), Some("9"));
    }

    #[test]
    fn malformed_value_is_treated_as_absent() {
        let mut store = MemoryCounterStore::new();
        store.write("letter_count", "lots").unwrap();
        store.write("other_key_count", "5").unwrap();
        store.write(TOTAL_KEY, "5").unwrap();

        let state = store.load_counters();
        assert_eq!(state.get(Category::Letter), 0);
        assert_eq!(state.get(Category::Other), 5);
        assert_eq!(state.total(), 5);
    }

    #[test]
    fn huge_stored_values_do_not_overflow() {
        let mut store = MemoryCounterStore::new();
        store.write("letter_count", "18446744073709551615").unwrap();
        store.write("number_count", "1").unwrap();

        let state = store.load_counters();
        assert_eq!(state.get(Category::Letter), u64::MAX);
        assert_eq!(state.get(Category::Number), 0);
        assert_eq!(state.total(), u64::MAX);
        let sum = state.iter().fold(0u64, |acc, (_, v)| acc + v);
        assert_eq!(state.total(), sum);
    }

    #[test]
    fn clear_removes_all_keys() {
        let mut store = MemoryCounterStore::new();
        for key in all_keys() {
            store.write(key, "3").unwrap();
        }
        store.clear_counters().unwrap();
        assert!(store.is_empty());
        // clearing an empty store is fine
        store.clear_counters().unwrap();
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("counters.db");

        {
            let mut store = SqliteCounterStore::open(&path).unwrap();
            let state = CounterState::from_parts(4, 0, 1, 2);
            for c in Category::ALL {
                store.save_counters(c, &state).unwrap();
            }
        }

        let store = SqliteCounterStore::open(&path).unwrap();
        assert_eq!(store.load_counters(), CounterState::from_parts(4, 0, 1, 2));
    }
}
