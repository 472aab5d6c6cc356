//! Token issuance and the per-batch rotation loop feeding the display.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::checkin_token::{CheckInToken, TokenSigner};
use crate::error::AttendanceError;

/// Default validity window and refresh cadence, in seconds. The refresh must
/// stay shorter than the window so consecutive tokens overlap and there is
/// never an instant with no scannable token.
pub const DEFAULT_WINDOW_SECONDS: u64 = 10;
pub const DEFAULT_REFRESH_SECONDS: u64 = 7;

/// Issues the currently valid token for a batch. Issuance is a pure local
/// computation over the clock; it cannot fail transiently and is never
/// retried.
#[derive(Debug)]
pub struct TokenIssuer {
    signer: TokenSigner,
    window: Duration,
    refresh: StdDuration,
}

impl TokenIssuer {
    pub fn new(
        signer: TokenSigner,
        window: Duration,
        refresh: StdDuration,
    ) -> Result<Self, AttendanceError> {
        if window <= Duration::zero() {
            return Err(AttendanceError::Configuration(
                "token window must be positive".into(),
            ));
        }
        if refresh.is_zero() {
            return Err(AttendanceError::Configuration(
                "refresh interval must be positive".into(),
            ));
        }
        let refresh_span = Duration::from_std(refresh).map_err(|_| {
            AttendanceError::Configuration("refresh interval out of range".into())
        })?;
        if refresh_span >= window {
            return Err(AttendanceError::Configuration(format!(
                "refresh interval ({}s) must be shorter than the validity window ({}s)",
                refresh.as_secs(),
                window.num_seconds()
            )));
        }
        Ok(Self {
            signer,
            window,
            refresh,
        })
    }

    /// Issuer from process configuration; fails fast on a bad cadence.
    pub fn from_config(cfg: &common::config::Config) -> Result<Self, AttendanceError> {
        let signer = TokenSigner::new(cfg.checkin_secret.as_deref())?;
        Self::new(
            signer,
            Duration::seconds(cfg.checkin_window_seconds as i64),
            StdDuration::from_secs(cfg.checkin_refresh_seconds),
        )
    }

    /// Pure issuance: `valid_from = now`, `valid_until = now + window`.
    pub fn issue(&self, batch_id: &str, now: DateTime<Utc>) -> CheckInToken {
        self.signer.mint(batch_id, now, self.window)
    }

    pub fn verify(&self, token: &CheckInToken) -> Result<(), AttendanceError> {
        self.signer.verify(token)
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn refresh_interval(&self) -> StdDuration {
        self.refresh
    }
}

/// Handle to a running rotation loop. Call [`RotationHandle::stop`] when the
/// display is dismissed; no token is issued after it returns and any pending
/// publish is dropped with the task.
pub struct RotationHandle {
    rx: watch::Receiver<CheckInToken>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RotationHandle {
    /// Latest published token.
    pub fn current(&self) -> CheckInToken {
        self.rx.borrow().clone()
    }

    /// Subscribe a display to token updates.
    pub fn subscribe(&self) -> watch::Receiver<CheckInToken> {
        self.rx.clone()
    }

    /// Stop the loop and wait for it to wind down.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// Start the periodic refresh for one batch. The first token is published
/// immediately; a superseding one follows every refresh interval.
pub fn spawn_rotation(issuer: Arc<TokenIssuer>, batch_id: impl Into<String>) -> RotationHandle {
    let batch_id = batch_id.into();
    let refresh = issuer.refresh_interval();
    let (tx, rx) = watch::channel(issuer.issue(&batch_id, Utc::now()));
    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();

    info!(
        "starting check-in rotation for batch {batch_id} (refresh {}s, window {}s)",
        refresh.as_secs(),
        issuer.window().num_seconds()
    );

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(refresh);
        // the zeroth tick fires immediately; the initial token is already out
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = loop_cancel.cancelled() => {
                    debug!("check-in rotation for batch {batch_id} cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    let token = issuer.issue(&batch_id, Utc::now());
                    if tx.send(token).is_err() {
                        // every subscriber is gone
                        break;
                    }
                }
            }
        }
    });

    RotationHandle { rx, cancel, task }
}
