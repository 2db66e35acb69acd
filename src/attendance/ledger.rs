//! The attendance ledger
//!
//! Owns the in-memory record set and applies the per-day state machine:
//! absent -> checked in -> checked out (terminal). Every mutation is
//! persisted through the durable store before it becomes visible, so a
//! failed write leaves the ledger exactly as it was.

use chrono::{NaiveDate, NaiveDateTime};

use super::{AttendanceRecord, AttendanceStore, Clock, EventResult};
use crate::{Error, Result};

/// Records and queries per-day attendance transitions
pub struct AttendanceLedger {
    store: Box<dyn AttendanceStore>,
    clock: Box<dyn Clock>,
    records: Vec<AttendanceRecord>,
}

impl AttendanceLedger {
    /// Open the ledger, loading the full record set from durable storage
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store cannot be read
    pub fn open(store: Box<dyn AttendanceStore>, clock: Box<dyn Clock>) -> Result<Self> {
        let records = store.load()?;
        tracing::debug!(records = records.len(), "attendance ledger loaded");

        Ok(Self {
            store,
            clock,
            records,
        })
    }

    /// Record an attendance event for a person at the given timestamp
    ///
    /// The first event on a date checks the person in, the second checks
    /// them out, and any further event on that date is a no-op. The
    /// mutated record set is written to durable storage before the
    /// in-memory state is replaced; on a write failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Attendance`] for an empty person id and
    /// [`Error::Storage`] if the durable write fails
    pub fn record_event(
        &mut self,
        person_id: &str,
        timestamp: NaiveDateTime,
    ) -> Result<EventResult> {
        if person_id.is_empty() {
            return Err(Error::Attendance("person id must not be empty".to_string()));
        }

        let date = timestamp.date();
        let time = timestamp.time();

        let mut updated = self.records.clone();
        let result = match updated
            .iter_mut()
            .find(|r| r.person_id == person_id && r.date == date)
        {
            None => {
                updated.push(AttendanceRecord {
                    person_id: person_id.to_string(),
                    date,
                    check_in: Some(time),
                    check_out: None,
                });
                EventResult::CheckedIn
            }
            Some(record) if record.check_out.is_none() => {
                record.check_out = Some(time);
                EventResult::CheckedOut
            }
            Some(_) => EventResult::AlreadyComplete,
        };

        if result == EventResult::AlreadyComplete {
            tracing::info!(person = %person_id, %date, "already checked out today");
            return Ok(result);
        }

        // Write-then-acknowledge: the new set becomes visible only after
        // the store confirms it.
        self.store.save(&updated)?;
        self.records = updated;

        tracing::info!(person = %person_id, %date, %time, ?result, "attendance event recorded");
        Ok(result)
    }

    /// Record an event at the injected clock's current time
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::record_event`]
    pub fn record_now(&mut self, person_id: &str) -> Result<EventResult> {
        let now = self.clock.now();
        self.record_event(person_id, now)
    }

    /// The person's record for the current date, if any event was recorded
    #[must_use]
    pub fn query_today(&self, person_id: &str) -> Option<AttendanceRecord> {
        self.query_on(person_id, self.clock.now().date())
    }

    /// The person's record for an explicit date
    #[must_use]
    pub fn query_on(&self, person_id: &str, date: NaiveDate) -> Option<AttendanceRecord> {
        self.records
            .iter()
            .find(|r| r.person_id == person_id && r.date == date)
            .cloned()
    }

    /// Number of records in the ledger
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDateTime;

    use super::*;

    /// Store that keeps records in memory and can be told to fail
    #[derive(Default)]
    struct MemStore {
        records: Mutex<Vec<AttendanceRecord>>,
        fail_saves: Mutex<bool>,
    }

    impl MemStore {
        fn set_failing(&self, failing: bool) {
            *self.fail_saves.lock().unwrap() = failing;
        }
    }

    impl AttendanceStore for MemStore {
        fn load(&self) -> Result<Vec<AttendanceRecord>> {
            Ok(self.records.lock().unwrap().clone())
        }

        fn save(&self, records: &[AttendanceRecord]) -> Result<()> {
            if *self.fail_saves.lock().unwrap() {
                return Err(Error::Storage("store offline".to_string()));
            }
            *self.records.lock().unwrap() = records.to_vec();
            Ok(())
        }
    }

    /// Clock pinned to a fixed instant
    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn ledger_at(now: &str) -> AttendanceLedger {
        AttendanceLedger::open(
            Box::new(MemStore::default()),
            Box::new(FixedClock(dt(now))),
        )
        .unwrap()
    }

    #[test]
    fn test_first_event_checks_in() {
        let mut ledger = ledger_at("2024-03-01T12:00:00");

        let result = ledger
            .record_event("alice", dt("2024-03-01T09:00:00"))
            .unwrap();
        assert_eq!(result, EventResult::CheckedIn);

        let record = ledger.query_today("alice").unwrap();
        assert_eq!(record.check_in.unwrap().to_string(), "09:00:00");
        assert!(record.check_out.is_none());
    }

    #[test]
    fn test_second_event_checks_out() {
        let mut ledger = ledger_at("2024-03-01T12:00:00");

        ledger
            .record_event("alice", dt("2024-03-01T09:00:00"))
            .unwrap();
        let result = ledger
            .record_event("alice", dt("2024-03-01T18:00:00"))
            .unwrap();
        assert_eq!(result, EventResult::CheckedOut);

        let record = ledger.query_today("alice").unwrap();
        assert_eq!(record.check_in.unwrap().to_string(), "09:00:00");
        assert_eq!(record.check_out.unwrap().to_string(), "18:00:00");
        assert_eq!(record.date.to_string(), "2024-03-01");
    }

    #[test]
    fn test_third_event_is_a_no_op() {
        let mut ledger = ledger_at("2024-03-01T12:00:00");

        ledger
            .record_event("alice", dt("2024-03-01T09:00:00"))
            .unwrap();
        ledger
            .record_event("alice", dt("2024-03-01T18:00:00"))
            .unwrap();
        let result = ledger
            .record_event("alice", dt("2024-03-01T19:30:00"))
            .unwrap();
        assert_eq!(result, EventResult::AlreadyComplete);

        // Times are untouched
        let record = ledger.query_today("alice").unwrap();
        assert_eq!(record.check_in.unwrap().to_string(), "09:00:00");
        assert_eq!(record.check_out.unwrap().to_string(), "18:00:00");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_one_record_per_person_and_date() {
        let mut ledger = ledger_at("2024-03-01T12:00:00");

        for ts in [
            "2024-03-01T09:00:00",
            "2024-03-01T12:30:00",
            "2024-03-01T18:00:00",
            "2024-03-01T19:00:00",
        ] {
            ledger.record_event("alice", dt(ts)).unwrap();
        }

        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_dates_do_not_interfere() {
        let mut ledger = ledger_at("2024-03-02T12:00:00");

        ledger
            .record_event("alice", dt("2024-03-01T09:00:00"))
            .unwrap();
        ledger
            .record_event("alice", dt("2024-03-01T18:00:00"))
            .unwrap();

        // A new day starts a fresh record
        let result = ledger
            .record_event("alice", dt("2024-03-02T08:45:00"))
            .unwrap();
        assert_eq!(result, EventResult::CheckedIn);
        assert_eq!(ledger.len(), 2);

        let today = ledger.query_today("alice").unwrap();
        assert_eq!(today.check_in.unwrap().to_string(), "08:45:00");
        assert!(today.check_out.is_none());

        let yesterday = ledger
            .query_on("alice", dt("2024-03-01T00:00:00").date())
            .unwrap();
        assert_eq!(yesterday.check_out.unwrap().to_string(), "18:00:00");
    }

    #[test]
    fn test_persons_do_not_interfere() {
        let mut ledger = ledger_at("2024-03-01T12:00:00");

        ledger
            .record_event("alice", dt("2024-03-01T09:00:00"))
            .unwrap();
        let result = ledger
            .record_event("bob", dt("2024-03-01T09:05:00"))
            .unwrap();
        assert_eq!(result, EventResult::CheckedIn);

        let bob = ledger.query_today("bob").unwrap();
        assert_eq!(bob.check_in.unwrap().to_string(), "09:05:00");
        assert!(bob.check_out.is_none());
    }

    #[test]
    fn test_failed_save_leaves_state_unchanged() {
        let store = Box::new(MemStore::default());
        store.set_failing(true);
        let mut ledger = AttendanceLedger::open(
            store,
            Box::new(FixedClock(dt("2024-03-01T12:00:00"))),
        )
        .unwrap();

        let err = ledger
            .record_event("alice", dt("2024-03-01T09:00:00"))
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));

        // No partial commit
        assert!(ledger.query_today("alice").is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_failed_save_does_not_lose_checkin() {
        let store = MemStore::default();
        store.records.lock().unwrap().push(AttendanceRecord {
            person_id: "alice".to_string(),
            date: dt("2024-03-01T00:00:00").date(),
            check_in: Some(dt("2024-03-01T09:00:00").time()),
            check_out: None,
        });
        store.set_failing(true);

        let mut ledger = AttendanceLedger::open(
            Box::new(store),
            Box::new(FixedClock(dt("2024-03-01T12:00:00"))),
        )
        .unwrap();

        ledger
            .record_event("alice", dt("2024-03-01T18:00:00"))
            .unwrap_err();

        let record = ledger.query_today("alice").unwrap();
        assert!(record.check_out.is_none());
    }

    #[test]
    fn test_empty_person_id_rejected() {
        let mut ledger = ledger_at("2024-03-01T12:00:00");

        let err = ledger
            .record_event("", dt("2024-03-01T09:00:00"))
            .unwrap_err();
        assert!(matches!(err, Error::Attendance(_)));
    }

    #[test]
    fn test_query_today_missing_person() {
        let ledger = ledger_at("2024-03-01T12:00:00");
        assert!(ledger.query_today("nobody").is_none());
    }

    #[test]
    fn test_record_now_uses_injected_clock() {
        let mut ledger = ledger_at("2024-03-01T09:05:00");

        let result = ledger.record_now("bob").unwrap();
        assert_eq!(result, EventResult::CheckedIn);

        let record = ledger.query_today("bob").unwrap();
        assert_eq!(record.check_in.unwrap().to_string(), "09:05:00");
    }
}
