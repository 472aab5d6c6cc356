use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use super::student_attendance::StudentAttendance;

/// Aggregate root: everything one batch (class/session) knows about its
/// students' attendance, keyed by student id.
#[derive(Debug, Clone, Serialize)]
pub struct BatchAttendance {
    pub batch_id: String,
    students: HashMap<String, StudentAttendance>,
}

impl BatchAttendance {
    pub fn new(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            students: HashMap::new(),
        }
    }

    /// Seed a student from the course roster. An already-known student keeps
    /// its name and records; enrolment never clobbers event-derived state.
    pub fn enroll(&mut self, student_id: &str, student_name: &str) -> &mut StudentAttendance {
        self.students
            .entry(student_id.to_owned())
            .or_insert_with(|| StudentAttendance::new(student_id, student_name))
    }

    /// Lazy creation on first touch by any event. When the event carries no
    /// display name the id doubles as one until the roster fills it in.
    pub fn student_or_create(
        &mut self,
        student_id: &str,
        student_name: Option<&str>,
    ) -> &mut StudentAttendance {
        self.students.entry(student_id.to_owned()).or_insert_with(|| {
            StudentAttendance::new(student_id, student_name.unwrap_or(student_id))
        })
    }

    pub fn student(&self, student_id: &str) -> Option<&StudentAttendance> {
        self.students.get(student_id)
    }

    pub fn students(&self) -> impl Iterator<Item = &StudentAttendance> {
        self.students.values()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Every calendar day with at least one record, across all students.
    pub fn all_dates(&self) -> BTreeSet<NaiveDate> {
        self.students
            .values()
            .flat_map(|s| s.dates())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance_record::AttendanceRecord;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn enroll_does_not_clobber_existing_state() {
        let mut batch = BatchAttendance::new("b1");
        batch
            .student_or_create("s1", None)
            .record_or_insert_with(d("2024-01-05"), || {
                AttendanceRecord::present(d("2024-01-05"), None)
            });

        batch.enroll("s1", "Asha Naidoo");
        let s1 = batch.student("s1").unwrap();
        // name was seeded from the id; records survive
        assert_eq!(s1.student_name, "s1");
        assert_eq!(s1.records().len(), 1);
    }

    #[test]
    fn all_dates_is_the_union_across_students() {
        let mut batch = BatchAttendance::new("b1");
        batch
            .student_or_create("s1", None)
            .record_or_insert_with(d("2024-01-05"), || {
                AttendanceRecord::present(d("2024-01-05"), None)
            });
        batch
            .student_or_create("s2", None)
            .record_or_insert_with(d("2024-01-07"), || {
                AttendanceRecord::present(d("2024-01-07"), None)
            });

        let dates: Vec<NaiveDate> = batch.all_dates().into_iter().collect();
        assert_eq!(dates, vec![d("2024-01-05"), d("2024-01-07")]);
    }
}
