//! Progress state for one rendered bar
//!
//! Seeds from a same-day persisted record, mutates through
//! `apply_increment`/`reset`, and writes every transition back through the
//! store before returning. Transitions return event descriptors; applying
//! visuals is the owner's job.

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::BarConfig;
use crate::store::{ProgressRecord, ProgressStore, identity_key};

/// Effective phase of a bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Below capacity; increments accumulate
    Filling,
    /// At capacity; the next increment wraps back to zero
    AtCapacity,
}

/// Event descriptor returned by every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Incremented { from: i64, to: i64 },
    /// An increment at capacity wrapped the bar back to zero
    Wrapped,
    Reset,
}

pub struct ProgressState {
    pub config: BarConfig,
    identity_key: String,
    progress: i64,
    store: Arc<dyn ProgressStore>,
    /// Set after a store failure; the bar keeps working in memory only
    degraded: bool,
}

impl ProgressState {
    /// Build state for one bar, seeding progress from a same-day record.
    ///
    /// A record from another day is treated as absent. The configured
    /// initialProgress is parsed but never applied here; a bar always starts
    /// from its persisted same-day value or zero.
    pub fn initialize(config: BarConfig, document_path: &str, store: Arc<dyn ProgressStore>) -> Self {
        Self::initialize_at(config, document_path, store, Local::now().date_naive())
    }

    /// `initialize` with an explicit day, for deterministic tests
    pub fn initialize_at(
        config: BarConfig,
        document_path: &str,
        store: Arc<dyn ProgressStore>,
        today: NaiveDate,
    ) -> Self {
        let identity_key = identity_key(document_path, &config.name);

        let (progress, degraded) = match store.load() {
            Ok(records) => {
                let seeded = records
                    .get(&identity_key)
                    .filter(|record| record.is_valid_for(today))
                    .map(|record| record.progress)
                    .unwrap_or(0);
                (seeded.clamp(0, config.total), false)
            }
            Err(e) => {
                error!(key = %identity_key, error = %e, "Progress store unreadable, continuing in memory");
                (0, true)
            }
        };

        debug!(key = %identity_key, progress = progress, "Initialized bar state");

        Self {
            config,
            identity_key,
            progress,
            store,
            degraded,
        }
    }

    pub fn progress(&self) -> i64 {
        self.progress
    }

    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }

    /// True when a store failure has forced memory-only operation
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn phase(&self) -> Phase {
        if self.progress < self.config.total {
            Phase::Filling
        } else {
            Phase::AtCapacity
        }
    }

    /// Advance the bar: accumulate while filling, wrap to zero at capacity.
    /// The new value is persisted before this returns.
    pub fn apply_increment(&mut self) -> Transition {
        let transition = match self.phase() {
            Phase::Filling => {
                let from = self.progress;
                self.progress = (self.progress + self.config.increment).clamp(0, self.config.total);
                Transition::Incremented {
                    from,
                    to: self.progress,
                }
            }
            Phase::AtCapacity => {
                self.progress = 0;
                Transition::Wrapped
            }
        };
        self.persist();
        transition
    }

    /// Return to zero unconditionally. Persisted before this returns.
    pub fn reset(&mut self) -> Transition {
        self.progress = 0;
        self.persist();
        Transition::Reset
    }

    /// Write the current progress under this bar's key, dated today.
    /// A failed write logs one notice and flips the bar into memory-only
    /// mode for the rest of the session.
    fn persist(&mut self) {
        if self.degraded {
            return;
        }

        let record = ProgressRecord {
            date: Local::now().date_naive(),
            progress: self.progress,
        };
        let key = self.identity_key.clone();

        if let Err(e) = self.store.update(&mut |records| {
            records.insert(key.clone(), record.clone());
        }) {
            error!(key = %self.identity_key, error = %e, "Failed to save progress, continuing in memory");
            self.degraded = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::store::MemoryStore;
    use std::collections::HashMap;

    fn config(source: &str) -> BarConfig {
        crate::config::parse(source, &Settings::default())
    }

    fn store_with(key: &str, record: ProgressRecord) -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        let mut records = HashMap::new();
        records.insert(key.to_string(), record);
        store.save(&records).unwrap();
        Arc::new(store)
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    #[test]
    fn test_initialize_seeds_from_same_day_record() {
        let store = store_with(
            "notes.md-reading",
            ProgressRecord { date: today(), progress: 40 },
        );
        let state = ProgressState::initialize_at(
            config("initialProgress: 99\ntotal: 200\nname: reading"),
            "notes.md",
            store,
            today(),
        );

        // The persisted value wins over initialProgress
        assert_eq!(state.progress(), 40);
    }

    #[test]
    fn test_initialize_treats_stale_record_as_absent() {
        let yesterday = today() - chrono::Duration::days(1);
        let store = store_with(
            "notes.md-reading",
            ProgressRecord { date: yesterday, progress: 40 },
        );
        let state = ProgressState::initialize_at(
            config("total: 200\nname: reading"),
            "notes.md",
            store,
            today(),
        );

        assert_eq!(state.progress(), 0);
    }

    #[test]
    fn test_initialize_without_record_seeds_zero() {
        let state = ProgressState::initialize_at(
            config("initialProgress: 50\ntotal: 200\nname: reading"),
            "notes.md",
            Arc::new(MemoryStore::new()),
            today(),
        );

        // initialProgress never applies, with or without a record
        assert_eq!(state.progress(), 0);
    }

    #[test]
    fn test_initialize_clamps_oversized_record() {
        // A record written under a larger total must not break the invariant
        let store = store_with(
            "notes.md-reading",
            ProgressRecord { date: today(), progress: 500 },
        );
        let state = ProgressState::initialize_at(
            config("total: 100\nname: reading"),
            "notes.md",
            store,
            today(),
        );

        assert_eq!(state.progress(), 100);
    }

    #[test]
    fn test_increment_accumulates_and_clamps() {
        let mut state = ProgressState::initialize_at(
            config("total: 25\nincrement: 10\nname: a"),
            "notes.md",
            Arc::new(MemoryStore::new()),
            today(),
        );

        assert_eq!(state.apply_increment(), Transition::Incremented { from: 0, to: 10 });
        assert_eq!(state.apply_increment(), Transition::Incremented { from: 10, to: 20 });
        // 20 + 10 overshoots; clamped to the total
        assert_eq!(state.apply_increment(), Transition::Incremented { from: 20, to: 25 });
        assert_eq!(state.phase(), Phase::AtCapacity);
    }

    #[test]
    fn test_increment_at_capacity_wraps_to_zero() {
        let mut state = ProgressState::initialize_at(
            config("total: 20\nincrement: 10\nname: a"),
            "notes.md",
            Arc::new(MemoryStore::new()),
            today(),
        );

        state.apply_increment();
        state.apply_increment();
        assert_eq!(state.progress(), 20);

        assert_eq!(state.apply_increment(), Transition::Wrapped);
        assert_eq!(state.progress(), 0);
        assert_eq!(state.phase(), Phase::Filling);
    }

    #[test]
    fn test_full_cycle_length() {
        // ceil(total/increment) increments reach the total, one more wraps
        let mut state = ProgressState::initialize_at(
            config("total: 100\nincrement: 30\nname: a"),
            "notes.md",
            Arc::new(MemoryStore::new()),
            today(),
        );

        for _ in 0..4 {
            state.apply_increment();
        }
        assert_eq!(state.progress(), 100);

        state.apply_increment();
        assert_eq!(state.progress(), 0);
    }

    #[test]
    fn test_invariant_holds_across_transitions() {
        let mut state = ProgressState::initialize_at(
            config("total: 7\nincrement: 3\nname: a"),
            "notes.md",
            Arc::new(MemoryStore::new()),
            today(),
        );

        for _ in 0..50 {
            state.apply_increment();
            assert!(state.progress() >= 0 && state.progress() <= 7);
        }
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut state = ProgressState::initialize_at(
            config("total: 20\nincrement: 10\nname: a"),
            "notes.md",
            Arc::new(MemoryStore::new()),
            today(),
        );

        assert_eq!(state.reset(), Transition::Reset);
        assert_eq!(state.progress(), 0);

        state.apply_increment();
        state.apply_increment();
        assert_eq!(state.reset(), Transition::Reset);
        assert_eq!(state.progress(), 0);
    }

    #[test]
    fn test_transitions_persist_before_returning() {
        let store: Arc<dyn ProgressStore> = Arc::new(MemoryStore::new());
        let mut state = ProgressState::initialize_at(
            config("total: 100\nincrement: 10\nname: reading"),
            "notes.md",
            Arc::clone(&store),
            today(),
        );

        state.apply_increment();
        let records = store.load().unwrap();
        let record = &records["notes.md-reading"];
        assert_eq!(record.progress, 10);
        assert_eq!(record.date, today());

        state.reset();
        let records = store.load().unwrap();
        assert_eq!(records["notes.md-reading"].progress, 0);
    }

    #[test]
    fn test_zero_increment_stays_in_place() {
        let mut state = ProgressState::initialize_at(
            config("total: 10\nincrement: 0\nname: a"),
            "notes.md",
            Arc::new(MemoryStore::new()),
            today(),
        );

        state.apply_increment();
        assert_eq!(state.progress(), 0);
        assert_eq!(state.phase(), Phase::Filling);
    }
}
