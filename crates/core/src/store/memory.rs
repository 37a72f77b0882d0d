//! In-memory slot store.

use crate::error::{SlotError, SlotResult};
use crate::slot::{Slot, SlotKey, SlotState, SlotStatus};
use crate::store::SlotStore;
use agenda_types::{PatientId, PhysicianId};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// A [`SlotStore`] backed by a mutexed `BTreeMap`.
///
/// Conditional operations run under the lock, which gives them the
/// check-then-set atomicity the trait requires. The ordered map keeps
/// queries chronological without extra sorting.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<BTreeMap<SlotKey, SlotState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> SlotResult<MutexGuard<'_, BTreeMap<SlotKey, SlotState>>> {
        self.slots
            .lock()
            .map_err(|_| SlotError::StoreUnavailable("slot table mutex poisoned".into()))
    }
}

impl SlotStore for MemoryStore {
    fn get(&self, key: &SlotKey) -> SlotResult<Option<Slot>> {
        let slots = self.lock()?;
        Ok(slots.get(key).map(|state| Slot {
            key: key.clone(),
            state: state.clone(),
        }))
    }

    fn conditional_insert(&self, key: &SlotKey, initial: SlotState) -> SlotResult<bool> {
        let mut slots = self.lock()?;
        if slots.contains_key(key) {
            return Ok(false);
        }
        slots.insert(key.clone(), initial);
        Ok(true)
    }

    fn conditional_update(
        &self,
        key: &SlotKey,
        expected: SlotStatus,
        next: SlotState,
    ) -> SlotResult<bool> {
        let mut slots = self.lock()?;
        match slots.get_mut(key) {
            Some(state) if state.status() == expected => {
                *state = next;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn query_open(&self, physician: &PhysicianId, date: NaiveDate) -> SlotResult<Vec<Slot>> {
        let slots = self.lock()?;
        Ok(slots
            .iter()
            .filter(|(key, state)| {
                key.physician == *physician
                    && key.date == date
                    && state.status() == SlotStatus::Open
            })
            .map(|(key, state)| Slot {
                key: key.clone(),
                state: state.clone(),
            })
            .collect())
    }

    fn query_by_patient(&self, patient: &PatientId) -> SlotResult<Vec<Slot>> {
        let slots = self.lock()?;
        let mut held: Vec<Slot> = slots
            .iter()
            .filter(|(_, state)| state.patient() == Some(patient))
            .map(|(key, state)| Slot {
                key: key.clone(),
                state: state.clone(),
            })
            .collect();
        held.sort_by(|a, b| (a.key.date, a.key.time).cmp(&(b.key.date, b.key.time)));
        Ok(held)
    }
}
