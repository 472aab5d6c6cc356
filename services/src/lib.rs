pub mod checkin_token;
pub mod error;
pub mod export;
pub mod query;
pub mod reconcile;
pub mod token_issuer;

pub use checkin_token::{CheckInToken, TokenSigner};
pub use error::AttendanceError;
pub use query::{get_attendance, get_attendance_for_preset, BatchAttendanceView, DisplayStatus};
pub use reconcile::{ManualEdit, ReconciliationEngine, ScanEvent};
pub use token_issuer::{spawn_rotation, RotationHandle, TokenIssuer};
