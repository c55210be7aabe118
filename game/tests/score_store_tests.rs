use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use game2048::score_store::{FileScoreStore, HighScore, ScoreStore};

fn unique_temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir()
        .join(format!("game2048_score_store_{name}_{nanos}"))
        .join("highscore")
}

/// One session: load the record, observe the final score, persist if beaten.
fn finish_session(store: &impl ScoreStore, final_score: u64) -> u64 {
    let mut high = HighScore::new(store.load());
    if let Some(best) = high.observe(final_score) {
        store.save(best).unwrap();
    }
    high.best()
}

#[test]
fn missing_file_is_created_with_zero() {
    let path = unique_temp_path("missing");
    let store = FileScoreStore::new(&path);
    assert!(!path.exists());

    assert_eq!(store.load(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "0");

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn record_survives_across_sessions() {
    let path = unique_temp_path("sessions");
    let store = FileScoreStore::new(&path);
    store.save(500).unwrap();

    assert_eq!(finish_session(&store, 800), 800);
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "800");

    assert_eq!(finish_session(&store, 300), 800);
    assert_eq!(FileScoreStore::new(&path).load(), 800);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn save_replaces_the_whole_file() {
    let path = unique_temp_path("replace");
    let store = FileScoreStore::new(&path);
    store.save(123456).unwrap();
    store.save(7).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "7");

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn malformed_file_reads_as_zero() {
    let path = unique_temp_path("malformed");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "not a number").unwrap();

    let store = FileScoreStore::new(&path);
    assert_eq!(store.load(), 0);
    assert_eq!(finish_session(&store, 40), 40);
    assert_eq!(store.load(), 40);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    let path = unique_temp_path("whitespace");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, " 2048\n").unwrap();
    assert_eq!(FileScoreStore::new(&path).load(), 2048);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}
