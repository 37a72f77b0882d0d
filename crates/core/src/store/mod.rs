//! The slot persistence seam.
//!
//! The engine only ever talks to a [`SlotStore`]; concrete persistence is
//! a collaborator injected at construction time, never a process-wide
//! singleton. Two reference implementations ship with this crate:
//! [`MemoryStore`] for tests and embedders, [`FileStore`] for the CLI.

use crate::error::SlotResult;
use crate::slot::{Slot, SlotKey, SlotState, SlotStatus};
use agenda_types::{PatientId, PhysicianId};
use chrono::NaiveDate;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A persistent keyed table of slots.
///
/// Implementations must make [`conditional_insert`] and
/// [`conditional_update`] atomic: the existence (or status) check and the
/// write happen in one isolated unit, so concurrent callers cannot both
/// succeed on the same key. That is the entire concurrency contract of
/// the engine; no operation blocks indefinitely and none is retried by
/// the engine.
///
/// [`conditional_insert`]: SlotStore::conditional_insert
/// [`conditional_update`]: SlotStore::conditional_update
pub trait SlotStore: Send + Sync {
    /// Fetch the slot at `key`, if one exists.
    fn get(&self, key: &SlotKey) -> SlotResult<Option<Slot>>;

    /// Insert a slot at `key` with the given initial state, unless a row
    /// already exists there.
    ///
    /// Returns `true` only if the row was inserted; an existing row is
    /// left untouched and reported as `false`.
    fn conditional_insert(&self, key: &SlotKey, initial: SlotState) -> SlotResult<bool>;

    /// Write `next` at `key` only if the current status equals
    /// `expected`.
    ///
    /// Returns `true` if the write was applied. Returns `false` both when
    /// the row is missing and when its status no longer matches; callers
    /// wanting to distinguish the two re-fetch with [`get`].
    ///
    /// [`get`]: SlotStore::get
    fn conditional_update(
        &self,
        key: &SlotKey,
        expected: SlotStatus,
        next: SlotState,
    ) -> SlotResult<bool>;

    /// All open slots for `physician` on `date`, in time order.
    fn query_open(&self, physician: &PhysicianId, date: NaiveDate) -> SlotResult<Vec<Slot>>;

    /// Every slot held by `patient`, across physicians and dates, in
    /// chronological order.
    fn query_by_patient(&self, patient: &PatientId) -> SlotResult<Vec<Slot>>;
}
