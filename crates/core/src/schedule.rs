//! The slot lifecycle engine.
//!
//! [`ScheduleService`] materialises a full year of slots per physician
//! and exposes the transitions of the slot state machine. Every
//! transition is a single compare-and-set against the store; a lost race
//! surfaces as `PreconditionFailed`, never as an overwrite, and nothing
//! is retried here.

use crate::calendar::{self, DayKind};
use crate::config::CoreConfig;
use crate::error::{SlotError, SlotResult};
use crate::slot::{Slot, SlotKey, SlotState, SlotStatus};
use crate::store::SlotStore;
use agenda_types::{PatientId, PhysicianId};
use chrono::NaiveDate;
use std::sync::Arc;

/// Outcome of a generation pass: how many slots were created and how many
/// already existed and were left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub created: usize,
    pub preserved: usize,
}

/// Slot scheduling operations against an injected [`SlotStore`].
#[derive(Clone)]
pub struct ScheduleService<S> {
    store: S,
    cfg: Arc<CoreConfig>,
}

impl<S: SlotStore> ScheduleService<S> {
    /// Creates a new service over `store`, using the slot template from
    /// `cfg`.
    pub fn new(store: S, cfg: Arc<CoreConfig>) -> Self {
        Self { store, cfg }
    }

    /// Ensure every slot of `year` exists for `physician`.
    ///
    /// Walks the year's calendar crossed with the daily template and
    /// issues one conditional insert per (date, time) pair: slots on
    /// workdays start open, slots on weekend days start closed, and any
    /// pre-existing row is left exactly as it is. Re-running after a
    /// partial failure, or concurrently for the same physician, creates
    /// each slot at most once and resets nothing.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::InvalidInput` for an unrepresentable year and
    /// propagates store failures as-is.
    pub fn ensure_year_schedule(
        &self,
        physician: &PhysicianId,
        year: i32,
    ) -> SlotResult<GenerationSummary> {
        let mut summary = GenerationSummary::default();

        for day in calendar::year_days(year)? {
            let initial = match day.kind {
                DayKind::Workday => SlotState::Open,
                DayKind::NonWorkday => SlotState::Closed,
            };

            for &time in self.cfg.template().times() {
                let key = SlotKey::new(physician.clone(), day.date, time);
                if self.store.conditional_insert(&key, initial.clone())? {
                    summary.created += 1;
                } else {
                    summary.preserved += 1;
                }
            }
        }

        tracing::info!(
            physician = %physician,
            year,
            created = summary.created,
            preserved = summary.preserved,
            "year schedule ensured"
        );
        Ok(summary)
    }

    /// Reserve an open slot for `patient`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the slot does not exist, `PreconditionFailed` if it
    /// is not open at write time.
    pub fn reserve(&self, key: &SlotKey, patient: PatientId) -> SlotResult<Slot> {
        self.transition(key, SlotStatus::Open, SlotState::Reserved(patient))
    }

    /// Cancel a reservation, returning the slot to open.
    ///
    /// # Errors
    ///
    /// `NotFound` if the slot does not exist, `PreconditionFailed` if it
    /// is not reserved at write time.
    pub fn cancel(&self, key: &SlotKey) -> SlotResult<Slot> {
        self.transition(key, SlotStatus::Reserved, SlotState::Open)
    }

    /// Mark a reserved slot's appointment as having taken place. The
    /// patient stays on the slot.
    ///
    /// # Errors
    ///
    /// `NotFound` if the slot does not exist, `PreconditionFailed` if it
    /// is not reserved.
    pub fn fulfill(&self, key: &SlotKey) -> SlotResult<Slot> {
        let current = self.fetch(key)?;
        match current.state {
            SlotState::Reserved(patient) => {
                self.transition(key, SlotStatus::Reserved, SlotState::Fulfilled(patient))
            }
            other => Err(SlotError::PreconditionFailed {
                key: key.clone(),
                expected: SlotStatus::Reserved,
                actual: other.status(),
            }),
        }
    }

    /// Administratively close a slot, whatever it currently holds.
    ///
    /// An existing reservation is silently dropped; that is the override
    /// contract, not an accident. Closing an already-closed slot is a
    /// no-op success.
    ///
    /// # Errors
    ///
    /// `NotFound` if the slot does not exist, `PreconditionFailed` if a
    /// concurrent writer changed the slot between read and write.
    pub fn close(&self, key: &SlotKey) -> SlotResult<Slot> {
        self.override_state(key, SlotState::Closed)
    }

    /// Administratively open a slot, whatever it currently holds.
    ///
    /// The mirror of [`close`](Self::close): an existing reservation is
    /// silently dropped, and opening an already-open slot is a no-op
    /// success.
    ///
    /// # Errors
    ///
    /// `NotFound` if the slot does not exist, `PreconditionFailed` if a
    /// concurrent writer changed the slot between read and write.
    pub fn open(&self, key: &SlotKey) -> SlotResult<Slot> {
        self.override_state(key, SlotState::Open)
    }

    /// The bookable slots of `physician` on `date`, in time order.
    pub fn open_slots(&self, physician: &PhysicianId, date: NaiveDate) -> SlotResult<Vec<Slot>> {
        self.store.query_open(physician, date)
    }

    /// Every slot held by `patient`, across physicians and dates.
    pub fn patient_history(&self, patient: &PatientId) -> SlotResult<Vec<Slot>> {
        self.store.query_by_patient(patient)
    }

    fn fetch(&self, key: &SlotKey) -> SlotResult<Slot> {
        self.store
            .get(key)?
            .ok_or_else(|| SlotError::NotFound { key: key.clone() })
    }

    fn override_state(&self, key: &SlotKey, target: SlotState) -> SlotResult<Slot> {
        let current = self.fetch(key)?;
        if current.state == target {
            return Ok(current);
        }
        if let Some(patient) = current.patient() {
            tracing::warn!(
                key = %key,
                patient = %patient,
                to = %target.status(),
                "administrative override drops the patient from the slot"
            );
        }
        self.transition(key, current.status(), target)
    }

    /// One atomic check-then-set. On a refused write, re-fetches once to
    /// tell "the slot vanished" apart from "the slot moved" for the error
    /// report; that read is context, not a retry.
    fn transition(&self, key: &SlotKey, expected: SlotStatus, next: SlotState) -> SlotResult<Slot> {
        if self.store.conditional_update(key, expected, next.clone())? {
            tracing::debug!(key = %key, from = %expected, to = %next.status(), "slot transition");
            return Ok(Slot {
                key: key.clone(),
                state: next,
            });
        }

        match self.store.get(key)? {
            None => Err(SlotError::NotFound { key: key.clone() }),
            Some(current) => Err(SlotError::PreconditionFailed {
                key: key.clone(),
                expected,
                actual: current.status(),
            }),
        }
    }
}
