//! Per-day attendance bookkeeping
//!
//! The ledger records check-in/check-out transitions for identified
//! persons: the first event of a day checks in, the second checks out,
//! and anything after that is a no-op.

mod ledger;
mod store;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

pub use ledger::AttendanceLedger;
pub use store::{AttendanceStore, SqliteStore};

/// One attendance row for a person on a calendar date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub person_id: String,
    pub date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}

/// Outcome of recording an attendance event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventResult {
    /// First event of the day; check-in time was set
    CheckedIn,
    /// Second event of the day; check-out time was set
    CheckedOut,
    /// The day is already complete; nothing was mutated
    AlreadyComplete,
}

/// Wall-clock source, injected so tests can supply fixed timestamps
pub trait Clock: Send + Sync {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;
}

/// System wall clock (local timezone, day granularity for dates)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
