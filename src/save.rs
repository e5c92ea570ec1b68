/// Persistence: lifetime total points and the single save-and-quit record.
///
/// Reads never fail: a missing or unreadable record is treated as absent and
/// logged.  Writes report their failures so the front end can surface them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entities::GameState;
use crate::error::{StoreError, StoreResult};
use crate::upgrades::Upgrades;

const TOTAL_POINTS_FILE: &str = "total_points.json";
const SAVED_GAME_FILE: &str = "saved_game.json";

/// Snapshot written on "save and quit", consumed by "continue".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub upgrades: Upgrades,
    pub score: f64,
    pub health: u32,
}

impl SaveRecord {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            upgrades: state.upgrades.clone(),
            score: state.score,
            health: state.player.health,
        }
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored record.  Anything malformed, or a record of a run that
    /// had already ended, reads as `None`.
    pub fn from_json(text: &str) -> Option<Self> {
        match serde_json::from_str::<SaveRecord>(text) {
            Ok(record) if !record.upgrades.in_range() => {
                tracing::warn!("ignoring save record with out-of-range upgrade levels");
                None
            }
            Ok(record) if record.health > 0 && record.score.is_finite() && record.score >= 0.0 => {
                Some(record)
            }
            Ok(_) => {
                tracing::warn!("ignoring save record of a finished run");
                None
            }
            Err(err) => {
                tracing::warn!("ignoring corrupt save record: {err}");
                None
            }
        }
    }
}

pub trait Store {
    fn total_points(&self) -> u64;
    fn add_total_points(&mut self, points: u64) -> StoreResult<u64>;
    fn load_save(&self) -> Option<SaveRecord>;
    fn write_save(&mut self, record: &SaveRecord) -> StoreResult<()>;
    fn clear_save(&mut self) -> StoreResult<()>;

    fn has_save(&self) -> bool {
        self.load_save().is_some()
    }
}

/// Book-keeping at the end of a run that ended in death: bank the score and
/// erase the save so it cannot be continued.  Returns the new total.
pub fn settle_game_over(store: &mut impl Store, state: &GameState) -> StoreResult<u64> {
    let total = store.add_total_points(state.display_score())?;
    store.clear_save()?;
    tracing::info!(final_score = state.display_score(), total_points = total, "run settled");
    Ok(total)
}

/// Hand out the save record for a "continue" and erase it, so one snapshot
/// can be continued only once.  Saving again writes a fresh record.
pub fn take_save(store: &mut impl Store) -> StoreResult<Option<SaveRecord>> {
    let Some(record) = store.load_save() else {
        return Ok(None);
    };
    store.clear_save()?;
    Ok(Some(record))
}

// ── File-backed store ─────────────────────────────────────────────────────────

/// Keeps each record as a JSON file inside one directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$HOME/.upgrade_shooter`, or the working directory without a home.
    pub fn default_dir() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".upgrade_shooter")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read(&self, name: &str) -> Option<String> {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %path.display(), "failed to read record: {err}");
                None
            }
        }
    }

    fn write(&self, name: &str, contents: &str) -> StoreResult<()> {
        let path = self.path(name);
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, contents).map_err(|source| StoreError::Io { path, source })
    }
}

impl Store for FileStore {
    fn total_points(&self) -> u64 {
        self.read(TOTAL_POINTS_FILE)
            .and_then(|s| serde_json::from_str(s.trim()).ok())
            .unwrap_or(0)
    }

    fn add_total_points(&mut self, points: u64) -> StoreResult<u64> {
        let total = self.total_points().saturating_add(points);
        self.write(TOTAL_POINTS_FILE, &serde_json::to_string(&total)?)?;
        Ok(total)
    }

    fn load_save(&self) -> Option<SaveRecord> {
        self.read(SAVED_GAME_FILE).and_then(|s| SaveRecord::from_json(&s))
    }

    fn write_save(&mut self, record: &SaveRecord) -> StoreResult<()> {
        self.write(SAVED_GAME_FILE, &record.to_json()?)?;
        tracing::info!(score = record.score, health = record.health, "game saved");
        Ok(())
    }

    fn clear_save(&mut self) -> StoreResult<()> {
        let path = self.path(SAVED_GAME_FILE);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("save record erased");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Store that keeps raw JSON in memory; behaves like [`FileStore`] without
/// touching the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    total: u64,
    saved: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored save with arbitrary text (e.g. to simulate corruption).
    pub fn put_raw_save(&mut self, text: impl Into<String>) {
        self.saved = Some(text.into());
    }
}

impl Store for MemoryStore {
    fn total_points(&self) -> u64 {
        self.total
    }

    fn add_total_points(&mut self, points: u64) -> StoreResult<u64> {
        self.total = self.total.saturating_add(points);
        Ok(self.total)
    }

    fn load_save(&self) -> Option<SaveRecord> {
        self.saved.as_deref().and_then(SaveRecord::from_json)
    }

    fn write_save(&mut self, record: &SaveRecord) -> StoreResult<()> {
        self.saved = Some(record.to_json()?);
        Ok(())
    }

    fn clear_save(&mut self) -> StoreResult<()> {
        self.saved = None;
        Ok(())
    }
}
