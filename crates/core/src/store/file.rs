//! JSON-file-backed slot store.
//!
//! Each physician gets one ledger file under the slot data directory:
//! `<data_dir>/<physician>/slots.json`. The ledger is the exact wire
//! structure defined here; unknown keys are rejected so a hand-edited or
//! foreign file fails loudly instead of being half-read.
//!
//! Atomicity is in-process: a single mutex spans every load-mutate-persist
//! cycle, which satisfies the [`SlotStore`] contract for one process.
//! Cross-process locking belongs to a real storage engine, not this
//! reference implementation.

use crate::constants::LEDGER_FILE_NAME;
use crate::error::{SlotError, SlotResult};
use crate::slot::{Slot, SlotKey, SlotState, SlotStatus};
use crate::store::SlotStore;
use agenda_types::{PatientId, PhysicianId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

type Ledger = BTreeMap<(NaiveDate, NaiveTime), SlotState>;

/// A [`SlotStore`] persisting one JSON ledger per physician.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    /// Creates a store rooted at `data_dir`. The directory is created
    /// lazily on the first write.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            guard: Mutex::new(()),
        }
    }

    fn lock(&self) -> SlotResult<MutexGuard<'_, ()>> {
        self.guard
            .lock()
            .map_err(|_| SlotError::StoreUnavailable("ledger mutex poisoned".into()))
    }

    fn ledger_path(&self, physician: &PhysicianId) -> PathBuf {
        self.data_dir.join(physician.as_str()).join(LEDGER_FILE_NAME)
    }

    /// Load a physician's ledger. A missing file is an empty ledger.
    fn load_ledger(&self, physician: &PhysicianId) -> SlotResult<Ledger> {
        let path = self.ledger_path(physician);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Ledger::new()),
            Err(e) => return Err(SlotError::LedgerRead(e)),
        };

        let wire: LedgerWire = serde_json::from_str(&text).map_err(SlotError::Deserialization)?;

        let mut ledger = Ledger::new();
        for row in wire.slots {
            let state = row_state(&row)?;
            ledger.insert((row.date, row.time), state);
        }
        Ok(ledger)
    }

    fn persist_ledger(&self, physician: &PhysicianId, ledger: &Ledger) -> SlotResult<()> {
        let dir = self.data_dir.join(physician.as_str());
        fs::create_dir_all(&dir).map_err(SlotError::LedgerWrite)?;

        let wire = LedgerWire {
            slots: ledger
                .iter()
                .map(|(&(date, time), state)| SlotRowWire {
                    date,
                    time,
                    status: state.status(),
                    patient: state.patient().cloned(),
                })
                .collect(),
        };
        let text = serde_json::to_string_pretty(&wire).map_err(SlotError::Serialization)?;
        fs::write(dir.join(LEDGER_FILE_NAME), text).map_err(SlotError::LedgerWrite)
    }
}

impl SlotStore for FileStore {
    fn get(&self, key: &SlotKey) -> SlotResult<Option<Slot>> {
        let _guard = self.lock()?;
        let ledger = self.load_ledger(&key.physician)?;
        Ok(ledger.get(&(key.date, key.time)).map(|state| Slot {
            key: key.clone(),
            state: state.clone(),
        }))
    }

    fn conditional_insert(&self, key: &SlotKey, initial: SlotState) -> SlotResult<bool> {
        let _guard = self.lock()?;
        let mut ledger = self.load_ledger(&key.physician)?;
        if ledger.contains_key(&(key.date, key.time)) {
            return Ok(false);
        }
        ledger.insert((key.date, key.time), initial);
        self.persist_ledger(&key.physician, &ledger)?;
        Ok(true)
    }

    fn conditional_update(
        &self,
        key: &SlotKey,
        expected: SlotStatus,
        next: SlotState,
    ) -> SlotResult<bool> {
        let _guard = self.lock()?;
        let mut ledger = self.load_ledger(&key.physician)?;
        match ledger.get_mut(&(key.date, key.time)) {
            Some(state) if state.status() == expected => {
                *state = next;
            }
            _ => return Ok(false),
        }
        self.persist_ledger(&key.physician, &ledger)?;
        Ok(true)
    }

    fn query_open(&self, physician: &PhysicianId, date: NaiveDate) -> SlotResult<Vec<Slot>> {
        let _guard = self.lock()?;
        let ledger = self.load_ledger(physician)?;
        Ok(ledger
            .iter()
            .filter(|(&(row_date, _), state)| {
                row_date == date && state.status() == SlotStatus::Open
            })
            .map(|(&(row_date, time), state)| Slot {
                key: SlotKey::new(physician.clone(), row_date, time),
                state: state.clone(),
            })
            .collect())
    }

    /// Walks every physician directory under the data dir. Directories
    /// that are not valid physician ids and ledgers that fail to parse
    /// are logged and skipped; enumeration must not die on one bad
    /// entry. Transitions never take this forgiving path.
    fn query_by_patient(&self, patient: &PatientId) -> SlotResult<Vec<Slot>> {
        let _guard = self.lock()?;

        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SlotError::LedgerRead(e)),
        };

        let mut held = Vec::new();
        for entry in entries.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            let dir_name = entry.file_name();
            let physician = match dir_name.to_str().map(PhysicianId::new) {
                Some(Ok(physician)) => physician,
                _ => {
                    tracing::warn!(
                        "skipping non-physician directory: {}",
                        entry.path().display()
                    );
                    continue;
                }
            };

            let ledger = match self.load_ledger(&physician) {
                Ok(ledger) => ledger,
                Err(e) => {
                    tracing::warn!("skipping unreadable ledger for {physician}: {e}");
                    continue;
                }
            };

            held.extend(
                ledger
                    .iter()
                    .filter(|(_, state)| state.patient() == Some(patient))
                    .map(|(&(date, time), state)| Slot {
                        key: SlotKey::new(physician.clone(), date, time),
                        state: state.clone(),
                    }),
            );
        }

        held.sort_by(|a, b| (a.key.date, a.key.time).cmp(&(b.key.date, b.key.time)));
        Ok(held)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// On-disk shape of a physician's ledger.
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct LedgerWire {
    slots: Vec<SlotRowWire>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct SlotRowWire {
    date: NaiveDate,
    time: NaiveTime,
    status: SlotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    patient: Option<PatientId>,
}

/// Rebuild a [`SlotState`] from a wire row, enforcing the patient
/// invariant: a patient exists exactly when the row is reserved or
/// fulfilled.
fn row_state(row: &SlotRowWire) -> SlotResult<SlotState> {
    match (row.status, row.patient.clone()) {
        (SlotStatus::Open, None) => Ok(SlotState::Open),
        (SlotStatus::Closed, None) => Ok(SlotState::Closed),
        (SlotStatus::Reserved, Some(patient)) => Ok(SlotState::Reserved(patient)),
        (SlotStatus::Fulfilled, Some(patient)) => Ok(SlotState::Fulfilled(patient)),
        (status, Some(_)) => Err(SlotError::StoreUnavailable(
            format!(
                "ledger row {} {} is {status} but carries a patient",
                row.date, row.time
            )
            .into(),
        )),
        (status, None) => Err(SlotError::StoreUnavailable(
            format!(
                "ledger row {} {} is {status} without a patient",
                row.date, row.time
            )
            .into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn physician() -> PhysicianId {
        PhysicianId::new("123").unwrap()
    }

    fn patient(id: &str) -> PatientId {
        PatientId::new(id).unwrap()
    }

    fn key(day: u32, hour: u32) -> SlotKey {
        SlotKey::new(
            physician(),
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn rows_survive_a_store_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let key = key(8, 9);

        let store = FileStore::new(temp_dir.path().to_path_buf());
        assert!(store
            .conditional_insert(&key, SlotState::Open)
            .expect("insert"));
        store
            .conditional_update(&key, SlotStatus::Open, SlotState::Reserved(patient("p1")))
            .expect("update");

        let reopened = FileStore::new(temp_dir.path().to_path_buf());
        let slot = reopened.get(&key).expect("get").expect("slot exists");
        assert_eq!(slot.state, SlotState::Reserved(patient("p1")));
    }

    #[test]
    fn missing_ledger_reads_as_absent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path().to_path_buf());
        assert!(store.get(&key(8, 9)).expect("get").is_none());
        assert!(store
            .query_open(&physician(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap())
            .expect("query")
            .is_empty());
    }

    #[test]
    fn conditional_insert_preserves_existing_rows() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path().to_path_buf());
        let key = key(8, 9);

        store
            .conditional_insert(&key, SlotState::Reserved(patient("p1")))
            .expect("insert");
        assert!(!store
            .conditional_insert(&key, SlotState::Open)
            .expect("second insert"));

        let slot = store.get(&key).expect("get").expect("slot exists");
        assert_eq!(slot.state, SlotState::Reserved(patient("p1")));
    }

    #[test]
    fn conditional_update_rejects_stale_expectation() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path().to_path_buf());
        let key = key(8, 9);

        store
            .conditional_insert(&key, SlotState::Closed)
            .expect("insert");
        let applied = store
            .conditional_update(&key, SlotStatus::Open, SlotState::Reserved(patient("p1")))
            .expect("update");
        assert!(!applied);

        let slot = store.get(&key).expect("get").expect("slot exists");
        assert_eq!(slot.state, SlotState::Closed);
    }

    #[test]
    fn query_by_patient_walks_all_physicians() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path().to_path_buf());

        let key_a = SlotKey::new(
            PhysicianId::new("123").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        let key_b = SlotKey::new(
            PhysicianId::new("456").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        );
        store
            .conditional_insert(&key_a, SlotState::Reserved(patient("p1")))
            .expect("insert");
        store
            .conditional_insert(&key_b, SlotState::Fulfilled(patient("p1")))
            .expect("insert");

        let held = store.query_by_patient(&patient("p1")).expect("query");
        assert_eq!(held.len(), 2);
        // Chronological: the January 5th appointment comes first.
        assert_eq!(held[0].key, key_b);
        assert_eq!(held[1].key, key_a);
    }

    #[test]
    fn query_by_patient_skips_foreign_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path().to_path_buf());

        store
            .conditional_insert(&key(8, 9), SlotState::Reserved(patient("p1")))
            .expect("insert");

        // A directory whose ledger is garbage must not break enumeration.
        let rogue = temp_dir.path().join("999");
        fs::create_dir_all(&rogue).expect("create rogue dir");
        fs::write(rogue.join(LEDGER_FILE_NAME), "not json at all").expect("write garbage");

        let held = store.query_by_patient(&patient("p1")).expect("query");
        assert_eq!(held.len(), 1);
    }

    #[test]
    fn corrupt_reserved_row_is_a_store_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path().to_path_buf());

        let dir = temp_dir.path().join("123");
        fs::create_dir_all(&dir).expect("create dir");
        fs::write(
            dir.join(LEDGER_FILE_NAME),
            r#"{"slots":[{"date":"2024-01-08","time":"09:00:00","status":"reserved"}]}"#,
        )
        .expect("write ledger");

        let err = store.get(&key(8, 9)).expect_err("should reject corrupt row");
        assert!(matches!(err, SlotError::StoreUnavailable(_)));
    }

    #[test]
    fn unknown_ledger_keys_are_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path().to_path_buf());

        let dir = temp_dir.path().join("123");
        fs::create_dir_all(&dir).expect("create dir");
        fs::write(
            dir.join(LEDGER_FILE_NAME),
            r#"{"slots":[],"surprise":true}"#,
        )
        .expect("write ledger");

        let err = store.get(&key(8, 9)).expect_err("should reject unknown key");
        assert!(matches!(err, SlotError::Deserialization(_)));
    }
}
