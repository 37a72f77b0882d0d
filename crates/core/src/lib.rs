//! # Agenda Core
//!
//! Slot lifecycle engine for the clinic agenda system.
//!
//! This crate owns the one subsystem of the clinic with real design
//! content: materialising a full calendar year of bookable time slots per
//! physician and policing each slot's state machine (open, closed,
//! reserved, fulfilled). Slots are never deleted; the full history stays
//! available for reporting.
//!
//! **No storage concerns**: the engine talks to slot persistence only
//! through the [`SlotStore`] trait. [`MemoryStore`] and [`FileStore`] are
//! reference implementations; real deployments may plug in anything that
//! honours the trait's atomicity contract.

pub mod calendar;
pub mod config;
pub mod constants;
pub mod error;
pub mod schedule;
pub mod slot;
pub mod store;
pub mod template;

pub use agenda_types::{IdError, PatientId, PhysicianId};
pub use calendar::{year_days, CalendarDay, DayKind};
pub use config::CoreConfig;
pub use error::{SlotError, SlotResult};
pub use schedule::{GenerationSummary, ScheduleService};
pub use slot::{Slot, SlotKey, SlotState, SlotStatus};
pub use store::{FileStore, MemoryStore, SlotStore};
pub use template::SlotTemplate;
