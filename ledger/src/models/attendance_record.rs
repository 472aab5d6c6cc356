use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Recorded status for one (student, day).
///
/// There is deliberately no `unavailable` variant here: "unavailable" is the
/// read model's default for a day with no record and must never be written
/// to the ledger. The display-side three-way status lives in the query view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One attendance cell: a calendar day plus the metadata each status
/// carries. `remark` justifies an absence; `location` is captured
/// opportunistically on a presence scan. The two are mutually informative,
/// never stored together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl AttendanceRecord {
    pub fn present(date: NaiveDate, location: Option<String>) -> Self {
        Self {
            date,
            status: AttendanceStatus::Present,
            remark: None,
            location,
        }
    }

    pub fn absent(date: NaiveDate, remark: impl Into<String>) -> Self {
        Self {
            date,
            status: AttendanceStatus::Absent,
            remark: Some(remark.into()),
            location: None,
        }
    }
}
