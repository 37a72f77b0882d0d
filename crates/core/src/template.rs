//! The daily slot template.
//!
//! Every physician gets the same fixed set of time-of-day values on every
//! date; the template is configuration data, not derived from anything.

use crate::constants::CONSULTATION_HOURS;
use crate::error::{SlotError, SlotResult};
use chrono::NaiveTime;

/// An ordered set of daily consultation times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotTemplate {
    times: Vec<NaiveTime>,
}

impl SlotTemplate {
    /// Creates a template from an explicit list of times.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::InvalidInput` if the list is empty or the
    /// times are not strictly ascending (which also rules out
    /// duplicates).
    pub fn new(times: Vec<NaiveTime>) -> SlotResult<Self> {
        if times.is_empty() {
            return Err(SlotError::InvalidInput(
                "slot template cannot be empty".into(),
            ));
        }
        if times.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(SlotError::InvalidInput(
                "slot template times must be strictly ascending".into(),
            ));
        }
        Ok(Self { times })
    }

    /// The standard clinic day: 07:00–10:00 and 13:00–17:00 on the hour,
    /// nine slots in total.
    pub fn standard() -> Self {
        let times = CONSULTATION_HOURS
            .iter()
            .filter_map(|&hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .collect();
        Self { times }
    }

    /// The times of this template, ascending.
    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    /// Number of slots per day.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
