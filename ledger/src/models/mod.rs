pub mod attendance_record;
pub mod batch_attendance;
pub mod student_attendance;

pub use attendance_record::{AttendanceRecord, AttendanceStatus};
pub use batch_attendance::BatchAttendance;
pub use student_attendance::StudentAttendance;
