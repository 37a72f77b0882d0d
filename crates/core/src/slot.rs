//! Slot data model.
//!
//! A slot is a single bookable (physician, date, time-of-day) unit. Its
//! identity is the composite [`SlotKey`]; its lifecycle state is a
//! [`SlotState`]. A patient reference exists exactly when the slot is
//! reserved or fulfilled, which [`SlotState`] guarantees by construction.

use agenda_types::{PatientId, PhysicianId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite identity of a slot: (physician, date, time-of-day).
///
/// No two slots share a key. The derived ordering (physician, then date,
/// then time) keeps keyed collections chronological per physician.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub physician: PhysicianId,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl SlotKey {
    pub fn new(physician: PhysicianId, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            physician,
            date,
            time,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.physician, self.date, self.time)
    }
}

/// Lifecycle state of a slot.
///
/// Reserved and fulfilled slots carry the patient holding them, so the
/// "patient present iff reserved or fulfilled" invariant cannot be
/// violated by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Bookable.
    Open,
    /// Not bookable (weekend day, or administratively withdrawn).
    Closed,
    /// Booked by a patient; the appointment has not happened yet.
    Reserved(PatientId),
    /// The appointment took place.
    Fulfilled(PatientId),
}

impl SlotState {
    /// The status discriminant of this state.
    pub fn status(&self) -> SlotStatus {
        match self {
            SlotState::Open => SlotStatus::Open,
            SlotState::Closed => SlotStatus::Closed,
            SlotState::Reserved(_) => SlotStatus::Reserved,
            SlotState::Fulfilled(_) => SlotStatus::Fulfilled,
        }
    }

    /// The patient holding this slot, if any.
    pub fn patient(&self) -> Option<&PatientId> {
        match self {
            SlotState::Reserved(patient) | SlotState::Fulfilled(patient) => Some(patient),
            SlotState::Open | SlotState::Closed => None,
        }
    }
}

/// Status discriminant of a [`SlotState`], without the patient payload.
///
/// Used for compare-and-set expectations, queries, and the ledger wire
/// format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Open,
    Closed,
    Reserved,
    Fulfilled,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Open => write!(f, "open"),
            SlotStatus::Closed => write!(f, "closed"),
            SlotStatus::Reserved => write!(f, "reserved"),
            SlotStatus::Fulfilled => write!(f, "fulfilled"),
        }
    }
}

/// A slot row as handed back by stores and the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub key: SlotKey,
    pub state: SlotState,
}

impl Slot {
    pub fn status(&self) -> SlotStatus {
        self.state.status()
    }

    pub fn patient(&self) -> Option<&PatientId> {
        self.state.patient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientId {
        PatientId::new("patientA").unwrap()
    }

    #[test]
    fn state_projects_onto_status() {
        assert_eq!(SlotState::Open.status(), SlotStatus::Open);
        assert_eq!(SlotState::Closed.status(), SlotStatus::Closed);
        assert_eq!(SlotState::Reserved(patient()).status(), SlotStatus::Reserved);
        assert_eq!(
            SlotState::Fulfilled(patient()).status(),
            SlotStatus::Fulfilled
        );
    }

    #[test]
    fn patient_is_present_only_when_held() {
        assert!(SlotState::Open.patient().is_none());
        assert!(SlotState::Closed.patient().is_none());
        assert_eq!(
            SlotState::Reserved(patient()).patient(),
            Some(&patient())
        );
        assert_eq!(
            SlotState::Fulfilled(patient()).patient(),
            Some(&patient())
        );
    }

    #[test]
    fn key_display_reads_as_one_line() {
        let key = SlotKey::new(
            PhysicianId::new("123").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        assert_eq!(key.to_string(), "123 2024-01-08 09:00:00");
    }

    #[test]
    fn keys_order_physician_then_date_then_time() {
        let earlier = SlotKey::new(
            PhysicianId::new("123").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        );
        let later = SlotKey::new(
            PhysicianId::new("123").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        );
        assert!(earlier < later);
    }
}
