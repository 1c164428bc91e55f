//! Durable progress store
//!
//! Maps identity keys ("<document path>-<bar name>") to dated progress
//! records. A record is only valid for the calendar day it was written;
//! anything older is swept out at startup. The backing file is rewritten
//! wholesale on every mutation, and `update` serializes the whole
//! read-modify-write cycle so bars sharing one store cannot lose updates.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// One persisted progress entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Calendar day the progress was recorded (YYYY-MM-DD)
    pub date: NaiveDate,
    pub progress: i64,
}

impl ProgressRecord {
    /// A record from any other day is treated as absent
    pub fn is_valid_for(&self, today: NaiveDate) -> bool {
        self.date == today
    }
}

/// Composite key identifying one bar within one document
pub fn identity_key(document_path: &str, name: &str) -> String {
    format!("{document_path}-{name}")
}

/// Storage abstraction for progress records
pub trait ProgressStore {
    /// Read the full mapping; empty when no store exists yet
    fn load(&self) -> Result<HashMap<String, ProgressRecord>>;

    /// Fully overwrite the store with `records` (a replace, not a merge)
    fn save(&self, records: &HashMap<String, ProgressRecord>) -> Result<()>;

    /// Run one serialized read-modify-write cycle
    fn update(&self, apply: &mut dyn FnMut(&mut HashMap<String, ProgressRecord>)) -> Result<()>;
}

/// File-backed store, one human-readable JSON object per file
pub struct JsonStore {
    path: PathBuf,
    /// Held across the whole load-modify-save cycle
    lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::files::APP_DIR);
        path.push(crate::constants::files::STORE_FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> Result<HashMap<String, ProgressRecord>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read progress store from {:?}", self.path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse progress store JSON from {:?}", self.path))
    }

    fn write_records(&self, records: &HashMap<String, ProgressRecord>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory {:?}", parent))?;
        }

        let json =
            serde_json::to_string_pretty(records).context("Failed to serialize progress store")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write progress store to {:?}", self.path))?;

        Ok(())
    }
}

impl ProgressStore for JsonStore {
    fn load(&self) -> Result<HashMap<String, ProgressRecord>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_records()
    }

    fn save(&self, records: &HashMap<String, ProgressRecord>) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write_records(records)
    }

    fn update(&self, apply: &mut dyn FnMut(&mut HashMap<String, ProgressRecord>)) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut records = self.read_records()?;
        apply(&mut records);
        self.write_records(&records)
    }
}

/// In-memory store, used when the backing file is unusable and in tests
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, ProgressRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<HashMap<String, ProgressRecord>> {
        Ok(self.records.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, records: &HashMap<String, ProgressRecord>) -> Result<()> {
        *self.records.lock().unwrap_or_else(|e| e.into_inner()) = records.clone();
        Ok(())
    }

    fn update(&self, apply: &mut dyn FnMut(&mut HashMap<String, ProgressRecord>)) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        apply(&mut records);
        Ok(())
    }
}

/// Startup sweep: drop every record not dated `today` and persist the pruned
/// map. Runs once, before any bar seeds from the store. Returns how many
/// entries were removed.
pub fn prune_stale(store: &dyn ProgressStore, today: NaiveDate) -> Result<usize> {
    let mut removed = 0;
    store.update(&mut |records| {
        let before = records.len();
        records.retain(|_, record| record.is_valid_for(today));
        removed = before - records.len();
    })?;

    if removed > 0 {
        info!(removed = removed, "Pruned stale progress entries");
    }
    Ok(removed)
}
