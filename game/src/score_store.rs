use std::cell::Cell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Persists the single best score.
pub trait ScoreStore {
    /// Never fails: a missing or unreadable record counts as 0.
    fn load(&self) -> u64;
    fn save(&self, score: u64) -> io::Result<()>;
}

/// One text file holding one base-10 integer.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(text) => match text.trim().parse::<u64>() {
                Ok(score) => score,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "high score file is malformed; using 0");
                    0
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if let Err(err) = self.save(0) {
                    tracing::warn!(path = %self.path.display(), %err, "could not create high score file");
                }
                0
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "could not read high score file; using 0");
                0
            }
        }
    }

    fn save(&self, score: u64) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, score.to_string())
    }
}

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    value: Cell<u64>,
    writes: Cell<usize>,
}

impl MemoryScoreStore {
    pub fn new(value: u64) -> Self {
        Self {
            value: Cell::new(value),
            writes: Cell::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> u64 {
        self.value.get()
    }

    fn save(&self, score: u64) -> io::Result<()> {
        self.value.set(score);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// In-memory best score for the running process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Returns the new record to persist when `score` beats the best so far.
    pub fn observe(&mut self, score: u64) -> Option<u64> {
        if score > self.best {
            self.best = score;
            Some(score)
        } else {
            None
        }
    }
}
