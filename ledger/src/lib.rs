pub mod filters;
pub mod models;
pub mod store;

pub use models::attendance_record::{AttendanceRecord, AttendanceStatus};
pub use models::batch_attendance::BatchAttendance;
pub use models::student_attendance::StudentAttendance;
pub use store::LedgerStore;
