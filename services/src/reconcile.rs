//! Reconciliation: merging scan events and manual edits into the ledger
//! without violating per-day uniqueness.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use serde::Deserialize;
use validator::Validate;

use ledger::models::attendance_record::{AttendanceRecord, AttendanceStatus};
use ledger::store::LedgerStore;

use crate::checkin_token::{CheckInToken, TokenSigner};
use crate::error::AttendanceError;

/// Operator-entered status change for one (student, day).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ManualEdit {
    #[validate(length(min = 1, message = "student_id is required"))]
    pub student_id: String,
    /// Display name, used only when the student is first seen.
    pub student_name: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// Required (non-empty) when `status` is absent; ignored otherwise.
    pub remark: Option<String>,
    pub location: Option<String>,
}

/// Token scan relayed by the backend after an attendee scans the display.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScanEvent {
    #[validate(length(min = 1, message = "student_id is required"))]
    pub student_id: String,
    pub student_name: Option<String>,
    #[validate(length(min = 1, message = "batch_id is required"))]
    pub batch_id: String,
    pub token: CheckInToken,
    pub scan_time: DateTime<Utc>,
    /// Device or geolocation label captured by the scanner.
    pub location: Option<String>,
}

/// Applies one event to the ledger while holding the batch mutex, so the
/// per-day uniqueness invariant survives concurrent callers. Every
/// operation runs to completion or fails before touching the ledger; no
/// partial write is ever observable.
pub struct ReconciliationEngine {
    store: Arc<LedgerStore>,
    signer: TokenSigner,
}

impl ReconciliationEngine {
    pub fn new(store: Arc<LedgerStore>, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    /// Overwrite the status for `(edit.student_id, edit.date)`, creating the
    /// record on first touch. Switching to present clears the remark;
    /// switching to absent clears the location. An absence without a
    /// non-empty remark is rejected before anything is touched.
    pub fn apply_manual_edit(
        &self,
        batch_id: &str,
        edit: ManualEdit,
    ) -> Result<(), AttendanceError> {
        edit.validate()
            .map_err(|e| AttendanceError::Validation(common::format_validation_errors(&e)))?;
        let remark = edit
            .remark
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());
        if edit.status == AttendanceStatus::Absent && remark.is_none() {
            return Err(AttendanceError::Validation(
                "a remark is required when marking a student absent".into(),
            ));
        }

        let batch = self.store.batch(batch_id);
        let mut batch = batch.lock().expect("batch lock poisoned");
        let student = batch.student_or_create(&edit.student_id, edit.student_name.as_deref());
        let record = student.record_or_insert_with(edit.date, || match edit.status {
            AttendanceStatus::Present => AttendanceRecord::present(edit.date, None),
            AttendanceStatus::Absent => AttendanceRecord::absent(edit.date, ""),
        });
        record.status = edit.status;
        match edit.status {
            AttendanceStatus::Present => {
                record.remark = None;
                record.location = edit.location.clone();
            }
            AttendanceStatus::Absent => {
                record.remark = remark.map(str::to_owned);
                record.location = None;
            }
        }
        student.sort_records();

        debug!(
            "manual edit applied: batch={batch_id} student={} date={} status={}",
            edit.student_id, edit.date, edit.status
        );
        Ok(())
    }

    /// Apply one scan. The token must belong to the batch, carry a valid
    /// signature, and still be inside its validity window; otherwise the
    /// event is discarded without touching the ledger and the caller is
    /// told to re-scan.
    ///
    /// A valid scan marks the day present and records the scan location.
    /// Re-scans on the same day only refresh the location, and a recorded
    /// absence is never flipped by a scan. An errant late scan must not
    /// silently erase an absence justification; that takes an explicit
    /// manual edit.
    pub fn apply_scan_event(&self, event: ScanEvent) -> Result<(), AttendanceError> {
        event
            .validate()
            .map_err(|e| AttendanceError::Validation(common::format_validation_errors(&e)))?;
        if event.token.batch_id != event.batch_id {
            warn!(
                "scan rejected: token for batch {} submitted to batch {}",
                event.token.batch_id, event.batch_id
            );
            return Err(AttendanceError::TokenMismatch);
        }
        self.signer.verify(&event.token)?;
        if !event.token.accepts(event.scan_time) {
            debug!(
                "scan rejected as expired: batch={} student={}",
                event.batch_id, event.student_id
            );
            return Err(AttendanceError::TokenExpired);
        }

        let date = event.scan_time.date_naive();
        let batch = self.store.batch(&event.batch_id);
        let mut batch = batch.lock().expect("batch lock poisoned");
        let student = batch.student_or_create(&event.student_id, event.student_name.as_deref());

        let location = event.location.clone();
        let record = student
            .record_or_insert_with(date, || AttendanceRecord::present(date, location.clone()));
        match record.status {
            AttendanceStatus::Present => {
                if event.location.is_some() {
                    record.location = event.location.clone();
                }
            }
            AttendanceStatus::Absent => {
                debug!(
                    "scan left recorded absence untouched: batch={} student={} date={date}",
                    event.batch_id, event.student_id
                );
            }
        }
        Ok(())
    }
}
