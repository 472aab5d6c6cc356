//! Read-only query façade: attendance for a batch restricted to a date
//! range, full roster included.

use chrono::NaiveDate;
use serde::Serialize;

use ledger::filters::{visible_dates, DateRange, RangePreset};
use ledger::models::attendance_record::AttendanceStatus;
use ledger::store::LedgerStore;

use crate::error::AttendanceError;

/// Three-way status rendered to consumers. `Unavailable` exists only in
/// this view layer: it is the default for a (student, day) with no ledger
/// record and is never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Present,
    Absent,
    Unavailable,
}

impl From<AttendanceStatus> for DisplayStatus {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => DisplayStatus::Present,
            AttendanceStatus::Absent => DisplayStatus::Absent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub status: DisplayStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentAttendanceView {
    pub student_id: String,
    pub student_name: String,
    /// One cell per visible date, same order as [`BatchAttendanceView::dates`].
    pub attendance: Vec<DayCell>,
}

/// Range-restricted read model handed to the display layer and to the
/// export collaborator. Already filtered: consumers must not re-filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchAttendanceView {
    pub batch_id: String,
    /// Visible dates, newest first.
    pub dates: Vec<NaiveDate>,
    pub students: Vec<StudentAttendanceView>,
}

impl BatchAttendanceView {
    /// Case-insensitive student-name search, a pure display helper.
    pub fn filter_students(&self, query: &str) -> Vec<&StudentAttendanceView> {
        let needle = query.trim().to_lowercase();
        self.students
            .iter()
            .filter(|s| s.student_name.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Attendance for `batch_id` restricted to a quick-select preset. The
/// preset is anchored on the most recent recorded date in the batch, not
/// on wall-clock today, so a historical batch still gets meaningful
/// windows. An empty batch has no anchor and reads as no data.
pub fn get_attendance_for_preset(
    store: &LedgerStore,
    batch_id: &str,
    preset: RangePreset,
    today: NaiveDate,
) -> Result<BatchAttendanceView, AttendanceError> {
    let Some(batch) = store.get(batch_id) else {
        return Err(AttendanceError::NoDataInRange);
    };
    let range = {
        let batch = batch.lock().expect("batch lock poisoned");
        preset.resolve_for(&batch.all_dates())
    }
    .ok_or(AttendanceError::NoDataInRange)?;
    get_attendance(store, batch_id, Some(range), today)
}

/// Attendance for `batch_id` restricted to `range` (the default window
/// around `today` when `None`). Never mutates the ledger. The full roster
/// is returned even for students with zero records in range; their cells
/// all read `unavailable`.
pub fn get_attendance(
    store: &LedgerStore,
    batch_id: &str,
    range: Option<DateRange>,
    today: NaiveDate,
) -> Result<BatchAttendanceView, AttendanceError> {
    let Some(batch) = store.get(batch_id) else {
        return Err(AttendanceError::NoDataInRange);
    };
    let batch = batch.lock().expect("batch lock poisoned");
    let dates = visible_dates(&batch.all_dates(), range, today)?;

    let mut students: Vec<StudentAttendanceView> = batch
        .students()
        .map(|student| StudentAttendanceView {
            student_id: student.student_id.clone(),
            student_name: student.student_name.clone(),
            attendance: dates
                .iter()
                .map(|&date| match student.record(date) {
                    Some(record) => DayCell {
                        date,
                        status: record.status.into(),
                        remark: record.remark.clone(),
                        location: record.location.clone(),
                    },
                    None => DayCell {
                        date,
                        status: DisplayStatus::Unavailable,
                        remark: None,
                        location: None,
                    },
                })
                .collect(),
        })
        .collect();
    students.sort_by(|a, b| {
        a.student_name
            .cmp(&b.student_name)
            .then_with(|| a.student_id.cmp(&b.student_id))
    });

    Ok(BatchAttendanceView {
        batch_id: batch.batch_id.clone(),
        dates,
        students,
    })
}
