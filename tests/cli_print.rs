use assert_cmd::Command;
use keytally::store::{CounterStore, SqliteCounterStore};
use tempfile::tempdir;

#[test]
fn print_reports_stored_counts_without_a_tty() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("counters.db");
    {
        let mut store = SqliteCounterStore::open(&db).unwrap();
        store.write("letter_count", "7").unwrap();
        store.write("function_key_count", "2").unwrap();
        store.write("keyboard_count", "9").unwrap();
    }

    let output = Command::cargo_bin("keytally")
        .unwrap()
        .env("HOME", dir.path())
        .args(["--log-level", "off", "--print", "--db"])
        .arg(&db)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Total") && lines[0].ends_with("9"));
    assert!(lines[1].starts_with("Letter Keys") && lines[1].ends_with("7"));
    assert!(lines[3].starts_with("Function Keys") && lines[3].ends_with("2"));
}

#[test]
fn reset_with_print_clears_counts() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("counters.db");
    {
        let mut store = SqliteCounterStore::open(&db).unwrap();
        store.write("other_key_count", "4").unwrap();
    }

    let output = Command::cargo_bin("keytally")
        .unwrap()
        .env("HOME", dir.path())
        .args(["--log-level", "off", "--reset", "--print", "--db"])
        .arg(&db)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|l| l.ends_with('0')));
}
