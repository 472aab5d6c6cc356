use chrono::NaiveDate;
use serde::Serialize;

use super::attendance_record::AttendanceRecord;

/// Per-student aggregate.
///
/// `records` holds at most one entry per calendar day and stays strictly
/// descending by date after every mutation. The ordering is load-bearing:
/// "most recent N days" displays read it front-to-back.
#[derive(Debug, Clone, Serialize)]
pub struct StudentAttendance {
    pub student_id: String,
    pub student_name: String,
    records: Vec<AttendanceRecord>,
}

impl StudentAttendance {
    pub fn new(student_id: impl Into<String>, student_name: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            student_name: student_name.into(),
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn record(&self, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.records.iter().find(|r| r.date == date)
    }

    pub fn record_mut(&mut self, date: NaiveDate) -> Option<&mut AttendanceRecord> {
        self.records.iter_mut().find(|r| r.date == date)
    }

    /// Find-or-insert by date; an existing record for the day is returned
    /// untouched, never duplicated. Insertion keeps the descending order.
    pub fn record_or_insert_with(
        &mut self,
        date: NaiveDate,
        default: impl FnOnce() -> AttendanceRecord,
    ) -> &mut AttendanceRecord {
        match self.records.iter().position(|r| r.date == date) {
            Some(idx) => &mut self.records[idx],
            None => {
                let record = default();
                debug_assert_eq!(record.date, date);
                let idx = self.records.partition_point(|r| r.date > date);
                self.records.insert(idx, record);
                &mut self.records[idx]
            }
        }
    }

    /// Restore the descending-by-date invariant.
    pub fn sort_records(&mut self) {
        self.records.sort_by(|a, b| b.date.cmp(&a.date));
    }

    /// Days this student has a record for, in storage (descending) order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records.iter().map(|r| r.date)
    }
}
