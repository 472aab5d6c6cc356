use ledger::filters::FilterError;
use thiserror::Error;

/// Error taxonomy of the check-in core.
///
/// Validation and token errors are local and recoverable; nothing is ever
/// retried automatically (a stale scan is meaningless, the caller must
/// re-scan against the current token). A rejected event leaves the ledger
/// untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttendanceError {
    /// Bad input on a manual edit or event payload; the caller should
    /// re-prompt. Never partially applied.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Scan arrived outside the token's validity window. The issuer has
    /// usually rotated by the time this is observed.
    #[error("check-in token has expired")]
    TokenExpired,

    /// Token was minted for a different batch.
    #[error("check-in token does not belong to this batch")]
    TokenMismatch,

    /// Payload signature does not verify: forged or corrupted token.
    #[error("check-in token signature is invalid")]
    TokenSignature,

    /// Defined empty-result state, distinct from any transport or backend
    /// failure, so consumers can render "no data" instead of "error".
    #[error("no attendance data in the requested date range")]
    NoDataInRange,

    /// Bad issuer setup (e.g. refresh interval not shorter than the token
    /// window). Fatal at startup, never occurs mid-run.
    #[error("invalid issuer configuration: {0}")]
    Configuration(String),
}

impl From<FilterError> for AttendanceError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::NoDataInRange => AttendanceError::NoDataInRange,
            FilterError::InvalidRange { .. } => AttendanceError::Validation(err.to_string()),
        }
    }
}
