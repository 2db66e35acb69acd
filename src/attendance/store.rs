//! Durable storage for the attendance record set

use chrono::{NaiveDate, NaiveTime};

use super::AttendanceRecord;
use crate::db::DbPool;
use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Opaque, atomic-per-call persistence for the full record set
pub trait AttendanceStore: Send + Sync {
    /// Load every record
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store cannot be read
    fn load(&self) -> Result<Vec<AttendanceRecord>>;

    /// Replace the stored record set
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store cannot be written
    fn save(&self, records: &[AttendanceRecord]) -> Result<()>;
}

/// `SQLite`-backed store
///
/// One row per (person, date); dates are `YYYY-MM-DD` text, times
/// `HH:MM:SS` text with NULL for a missing check-out. `save` rewrites
/// the table in a single transaction.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Create a store over an initialized database pool
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl AttendanceStore for SqliteStore {
    fn load(&self) -> Result<Vec<AttendanceRecord>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Storage(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT person_id, date, check_in_time, check_out_time
                 FROM attendance ORDER BY date, person_id",
            )
            .map_err(|e| Error::Storage(e.to_string()))?;

        let rows: Vec<(String, String, String, Option<String>)> = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })
            .map_err(|e| Error::Storage(e.to_string()))?
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Storage(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for (person_id, date, check_in, check_out) in rows {
            records.push(AttendanceRecord {
                person_id,
                date: parse_date(&date)?,
                check_in: Some(parse_time(&check_in)?),
                check_out: check_out.as_deref().map(parse_time).transpose()?,
            });
        }

        Ok(records)
    }

    fn save(&self, records: &[AttendanceRecord]) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Storage(e.to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| Error::Storage(e.to_string()))?;

        tx.execute("DELETE FROM attendance", [])
            .map_err(|e| Error::Storage(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO attendance (person_id, date, check_in_time, check_out_time)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(|e| Error::Storage(e.to_string()))?;

            for record in records {
                let check_in = record.check_in.ok_or_else(|| {
                    Error::Storage(format!(
                        "record for {} on {} has no check-in time",
                        record.person_id, record.date
                    ))
                })?;

                stmt.execute(rusqlite::params![
                    record.person_id,
                    record.date.format(DATE_FORMAT).to_string(),
                    check_in.format(TIME_FORMAT).to_string(),
                    record
                        .check_out
                        .map(|t| t.format(TIME_FORMAT).to_string()),
                ])
                .map_err(|e| Error::Storage(e.to_string()))?;
            }
        }

        tx.commit().map_err(|e| Error::Storage(e.to_string()))?;
        Ok(())
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| Error::Storage(format!("bad date {s:?}: {e}")))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| Error::Storage(format!("bad time {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory;

    fn record(person: &str, date: &str, check_in: &str, check_out: Option<&str>) -> AttendanceRecord {
        AttendanceRecord {
            person_id: person.to_string(),
            date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            check_in: Some(NaiveTime::parse_from_str(check_in, TIME_FORMAT).unwrap()),
            check_out: check_out.map(|t| NaiveTime::parse_from_str(t, TIME_FORMAT).unwrap()),
        }
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let store = SqliteStore::new(init_memory().unwrap());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let store = SqliteStore::new(init_memory().unwrap());

        let records = vec![
            record("alice", "2024-03-01", "09:00:00", Some("18:00:00")),
            record("bob", "2024-03-01", "09:05:00", None),
        ];
        store.save(&records).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_save_replaces_previous_set() {
        let store = SqliteStore::new(init_memory().unwrap());

        store
            .save(&[record("alice", "2024-03-01", "09:00:00", None)])
            .unwrap();
        store
            .save(&[record("alice", "2024-03-01", "09:00:00", Some("17:30:00"))])
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].check_out.unwrap().to_string(), "17:30:00");
    }

    #[test]
    fn test_ledger_state_survives_reopen() {
        use crate::attendance::{AttendanceLedger, SystemClock};

        let pool = init_memory().unwrap();

        {
            let mut ledger = AttendanceLedger::open(
                Box::new(SqliteStore::new(pool.clone())),
                Box::new(SystemClock),
            )
            .unwrap();
            ledger
                .record_event(
                    "alice",
                    chrono::NaiveDateTime::parse_from_str(
                        "2024-03-01T09:00:00",
                        "%Y-%m-%dT%H:%M:%S",
                    )
                    .unwrap(),
                )
                .unwrap();
        }

        // A fresh ledger over the same pool sees the committed record
        let ledger = AttendanceLedger::open(
            Box::new(SqliteStore::new(pool)),
            Box::new(SystemClock),
        )
        .unwrap();
        let record = ledger
            .query_on(
                "alice",
                NaiveDate::parse_from_str("2024-03-01", DATE_FORMAT).unwrap(),
            )
            .unwrap();
        assert_eq!(record.check_in.unwrap().to_string(), "09:00:00");
    }
}
