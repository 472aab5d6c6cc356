use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, TimeZone, Utc};
use services::checkin_token::TokenSigner;
use services::error::AttendanceError;
use services::token_issuer::{spawn_rotation, TokenIssuer};

const SECRET: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

fn issuer() -> TokenIssuer {
    TokenIssuer::new(
        TokenSigner::new(Some(SECRET)).expect("signer"),
        Duration::seconds(10),
        StdDuration::from_secs(7),
    )
    .expect("valid cadence")
}

#[test]
fn issued_window_starts_now_and_is_inclusive() {
    let issuer = issuer();
    let t0 = Utc.with_ymd_and_hms(2025, 9, 8, 10, 0, 0).unwrap();
    let token = issuer.issue("batch-1", t0);

    assert_eq!(token.batch_id, "batch-1");
    assert_eq!(token.issued_at, t0);
    assert_eq!(token.valid_from, t0);
    assert_eq!(token.valid_until, t0 + Duration::seconds(10));
    assert_eq!(token.nonce, t0.timestamp_millis());

    assert!(token.accepts(token.valid_from));
    assert!(token.accepts(token.valid_until));
    assert!(!token.accepts(token.valid_until + Duration::milliseconds(1)));
    assert!(!token.accepts(token.valid_from - Duration::milliseconds(1)));
}

#[test]
fn consecutive_windows_overlap_by_three_seconds() {
    let issuer = issuer();
    let t0 = Utc.with_ymd_and_hms(2025, 9, 8, 10, 0, 0).unwrap();
    let first = issuer.issue("batch-1", t0);
    let second = issuer.issue("batch-1", t0 + Duration::seconds(7));

    assert_eq!(first.valid_until - second.valid_from, Duration::seconds(3));

    // a scan inside the overlap is valid against either token
    let overlap_instant = t0 + Duration::seconds(8);
    assert!(first.accepts(overlap_instant));
    assert!(second.accepts(overlap_instant));
}

#[test]
fn refresh_not_shorter_than_window_is_a_fatal_config_error() {
    let cases = [
        (10, 10), // equal: a gap would open at the boundary
        (10, 12), // longer
    ];
    for (window_s, refresh_s) in cases {
        let err = TokenIssuer::new(
            TokenSigner::new(Some(SECRET)).unwrap(),
            Duration::seconds(window_s),
            StdDuration::from_secs(refresh_s),
        )
        .unwrap_err();
        assert!(matches!(err, AttendanceError::Configuration(_)), "{window_s}/{refresh_s}");
    }

    let err = TokenIssuer::new(
        TokenSigner::new(Some(SECRET)).unwrap(),
        Duration::seconds(10),
        StdDuration::ZERO,
    )
    .unwrap_err();
    assert!(matches!(err, AttendanceError::Configuration(_)));
}

#[test]
fn issuer_builds_from_default_config() {
    std::env::set_var(
        "LOG_FILE",
        std::env::temp_dir().join("luminar-checkin-test.log"),
    );
    let cfg = common::config::Config::init(".env.does-not-exist");
    assert_eq!(cfg.checkin_window_seconds, 10);
    assert_eq!(cfg.checkin_refresh_seconds, 7);

    let issuer = TokenIssuer::from_config(cfg).expect("default cadence is valid");
    assert_eq!(issuer.refresh_interval().as_secs(), 7);
    assert_eq!(issuer.window().num_seconds(), 10);
}

#[test]
fn non_hex_secret_is_a_config_error() {
    assert!(matches!(
        TokenSigner::new(Some("not hex")),
        Err(AttendanceError::Configuration(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn rotation_publishes_on_cadence_and_stops_cleanly() {
    let issuer = Arc::new(issuer());
    let handle = spawn_rotation(Arc::clone(&issuer), "batch-1");
    let mut rx = handle.subscribe();

    // the initial token is published before the first tick
    let first = rx.borrow_and_update().clone();
    assert_eq!(first.batch_id, "batch-1");
    assert!(issuer.verify(&first).is_ok());

    // let the rotation task start its interval before the clock moves
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    tokio::time::advance(StdDuration::from_secs(7)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    assert!(rx.has_changed().expect("sender alive"));
    let second = rx.borrow_and_update().clone();
    assert!(issuer.verify(&second).is_ok());

    handle.stop().await;

    // no token is issued after cancellation
    tokio::time::advance(StdDuration::from_secs(30)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    assert_eq!(*rx.borrow(), second);
}
