//! Production ledger: the persistent list of planned video slots and
//! which of them have been completed.
//!
//! The ledger and the completion set live in a single versioned document
//! written atomically per mutation, so an interrupted write can never
//! leave the two halves out of sync.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use reelsmith_error::{
    PipelineError, PipelineErrorKind, ReelsmithResult, StorageError, StorageErrorKind,
};
use serde::{Deserialize, Serialize};

/// Number of slots in one production phase.
pub const PHASE_SIZE: u32 = 5;

/// Single versioned document holding the topic ledger and completion set.
///
/// Topic keys are contiguous starting at 1 with no gaps; all mutation
/// paths preserve that invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionLedger {
    version: u64,
    topics: BTreeMap<u32, String>,
    completed: BTreeSet<u32>,
}

impl ProductionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document version, bumped once per persisted mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Highest slot number in the ledger, or 0 when empty.
    pub fn last_slot(&self) -> u32 {
        self.topics.keys().next_back().copied().unwrap_or(0)
    }

    /// Label for a slot, if the slot exists.
    pub fn label(&self, slot: u32) -> Option<&str> {
        self.topics.get(&slot).map(String::as_str)
    }

    pub fn topics(&self) -> &BTreeMap<u32, String> {
        &self.topics
    }

    pub fn completed(&self) -> &BTreeSet<u32> {
        &self.completed
    }

    pub fn is_completed(&self, slot: u32) -> bool {
        self.completed.contains(&slot)
    }

    /// Append a single topic at slot `last + 1`.
    ///
    /// Returns the slot number it was assigned.
    pub fn add_topic(&mut self, label: impl Into<String>) -> u32 {
        let slot = self.last_slot() + 1;
        self.topics.insert(slot, label.into());
        slot
    }

    /// Merge a batch of strategist-planned topics into the ledger.
    ///
    /// # Errors
    ///
    /// The batch must cover exactly slots `last+1 ..= last+PHASE_SIZE`;
    /// anything else is rejected without mutating the ledger.
    pub fn extend_phase(&mut self, batch: &BTreeMap<u32, String>) -> ReelsmithResult<()> {
        let start = self.last_slot() + 1;
        let end = start + PHASE_SIZE - 1;
        let expected: Vec<u32> = (start..=end).collect();
        let got: Vec<u32> = batch.keys().copied().collect();

        if got != expected {
            return Err(PipelineError::new(PipelineErrorKind::StrategistRange {
                expected_start: start,
                expected_end: end,
                got: format!("{got:?}"),
            })
            .into());
        }

        for (slot, label) in batch {
            self.topics.insert(*slot, label.clone());
        }
        Ok(())
    }

    /// Mark a slot as completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is not in the ledger.
    pub fn mark_completed(&mut self, slot: u32) -> ReelsmithResult<()> {
        if !self.topics.contains_key(&slot) {
            return Err(PipelineError::new(PipelineErrorKind::UnknownSlot(slot)).into());
        }
        self.completed.insert(slot);
        Ok(())
    }

    /// Whether every existing slot of the ledger's final phase is completed.
    ///
    /// A phase is the block of up to [`PHASE_SIZE`] contiguous slots ending
    /// at the ledger's last slot. An empty ledger has no complete phase.
    pub fn current_phase_complete(&self) -> bool {
        let last = self.last_slot();
        if last == 0 {
            return false;
        }
        let phase = last.div_ceil(PHASE_SIZE);
        self.phase_complete(phase)
    }

    /// Whether phase `k` (1-based) is complete: every slot in
    /// `[PHASE_SIZE*k - PHASE_SIZE + 1, PHASE_SIZE*k]` that exists in the
    /// ledger is in the completion set.
    pub fn phase_complete(&self, phase: u32) -> bool {
        if phase == 0 {
            return false;
        }
        let start = PHASE_SIZE * (phase - 1) + 1;
        let end = PHASE_SIZE * phase;
        let mut saw_any = false;
        for slot in start..=end {
            if self.topics.contains_key(&slot) {
                saw_any = true;
                if !self.completed.contains(&slot) {
                    return false;
                }
            }
        }
        saw_any
    }

    /// Verify the contiguity invariant on a freshly loaded document.
    fn check_contiguity(&self) -> ReelsmithResult<()> {
        for (expected, actual) in (1..).zip(self.topics.keys()) {
            if expected != *actual {
                return Err(PipelineError::new(PipelineErrorKind::LedgerContiguity(
                    format!("expected slot {expected}, found {actual}"),
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// File-backed store for the [`ProductionLedger`].
///
/// Every save writes the whole document to a temp file and renames it into
/// place, so readers only ever see a complete document.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger from disk, returning an empty ledger when the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error on unreadable or corrupt documents, or when the
    /// stored document violates the slot contiguity invariant.
    pub fn load(&self) -> ReelsmithResult<ProductionLedger> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no ledger file, starting empty");
            return Ok(ProductionLedger::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;
        let ledger: ProductionLedger = serde_json::from_str(&contents).map_err(|e| {
            StorageError::new(StorageErrorKind::Corrupt(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;
        ledger.check_contiguity()?;
        Ok(ledger)
    }

    /// Persist the ledger, bumping its version.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// document cannot be written.
    pub fn save(&self, ledger: &mut ProductionLedger) -> ReelsmithResult<()> {
        ledger.version += 1;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                        "{}: {}",
                        parent.display(),
                        e
                    )))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(ledger).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!("serialize ledger: {e}")))
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                tmp.display(),
                e
            )))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            version = ledger.version,
            "ledger saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(n: u32) -> ProductionLedger {
        let mut ledger = ProductionLedger::new();
        for i in 1..=n {
            ledger.add_topic(format!("Educational / Topic {i}"));
        }
        ledger
    }

    #[test]
    fn manual_add_appends_at_next_slot() {
        let mut ledger = seeded(5);
        let slot = ledger.add_topic("Promo / New offer");
        assert_eq!(slot, 6);
        assert_eq!(ledger.label(6), Some("Promo / New offer"));
        assert_eq!(ledger.last_slot(), 6);
    }

    #[test]
    fn extend_phase_adds_exactly_next_five() {
        let mut ledger = seeded(5);
        let batch: BTreeMap<u32, String> = (6..=10)
            .map(|i| (i, format!("Educational / Topic {i}")))
            .collect();
        ledger.extend_phase(&batch).unwrap();
        assert_eq!(ledger.last_slot(), 10);
        assert_eq!(
            ledger.topics().keys().copied().collect::<Vec<_>>(),
            (1..=10).collect::<Vec<_>>()
        );
    }

    #[test]
    fn extend_phase_rejects_wrong_range() {
        let mut ledger = seeded(5);
        let batch: BTreeMap<u32, String> =
            (7..=11).map(|i| (i, format!("Topic {i}"))).collect();
        assert!(ledger.extend_phase(&batch).is_err());
        // Ledger untouched on rejection
        assert_eq!(ledger.last_slot(), 5);
    }

    #[test]
    fn phase_completion_requires_all_existing_slots() {
        let mut ledger = seeded(5);
        for slot in 1..=4 {
            ledger.mark_completed(slot).unwrap();
        }
        assert!(!ledger.current_phase_complete());

        ledger.mark_completed(5).unwrap();
        assert!(ledger.current_phase_complete());
    }

    #[test]
    fn partial_final_phase_counts_existing_slots_only() {
        let mut ledger = seeded(7);
        for slot in 1..=7 {
            ledger.mark_completed(slot).unwrap();
        }
        // Phase 2 has only slots 6 and 7; both done, so it is complete.
        assert!(ledger.current_phase_complete());
    }

    #[test]
    fn mark_completed_rejects_unknown_slot() {
        let mut ledger = seeded(3);
        assert!(ledger.mark_completed(9).is_err());
    }

    #[test]
    fn store_round_trips_and_bumps_version() {
        let dir = std::env::temp_dir().join(format!("reelsmith-ledger-{}", std::process::id()));
        let store = LedgerStore::new(dir.join("ledger.json"));

        let mut ledger = seeded(5);
        ledger.mark_completed(1).unwrap();
        store.save(&mut ledger).unwrap();
        assert_eq!(ledger.version(), 1);

        let loaded = store.load().unwrap();
        assert_eq!(loaded, ledger);

        store.save(&mut ledger).unwrap();
        assert_eq!(ledger.version(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_missing_file_yields_empty_ledger() {
        let store = LedgerStore::new("/nonexistent/reelsmith/ledger.json");
        let ledger = store.load().unwrap();
        assert_eq!(ledger.last_slot(), 0);
        assert!(!ledger.current_phase_complete());
    }

    #[test]
    fn load_rejects_gapped_ledger() {
        let dir = std::env::temp_dir().join(format!("reelsmith-gap-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ledger.json");
        std::fs::write(
            &path,
            r#"{"version":1,"topics":{"1":"a","3":"c"},"completed":[]}"#,
        )
        .unwrap();

        let store = LedgerStore::new(&path);
        assert!(store.load().is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
