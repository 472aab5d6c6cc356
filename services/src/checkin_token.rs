use chrono::{DateTime, Duration, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AttendanceError;

type HmacSha256 = Hmac<Sha256>;

/// Time-boxed, batch-scoped credential shown on the display surface.
///
/// Serialized camelCase: this struct is the exact payload the display
/// encodes (e.g. as a QR code) and a scanner submits back. Tokens are
/// superseded, not deleted, on every refresh; consecutive windows overlap
/// so a scan during the overlap is valid against either token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInToken {
    pub batch_id: String,
    pub issued_at: DateTime<Utc>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    /// Millisecond issuance timestamp. Display-side deduplication only,
    /// not a cryptographic nonce.
    pub nonce: i64,
    /// Hex HMAC-SHA256 over the canonical payload fields.
    pub signature: String,
}

impl CheckInToken {
    /// Window acceptance, inclusive on both ends.
    pub fn accepts(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && at <= self.valid_until
    }

    fn canonical_payload(
        batch_id: &str,
        valid_from: DateTime<Utc>,
        valid_until: DateTime<Utc>,
        nonce: i64,
    ) -> String {
        format!(
            "{}|{}|{}|{}",
            batch_id,
            valid_from.to_rfc3339_opts(SecondsFormat::Millis, true),
            valid_until.to_rfc3339_opts(SecondsFormat::Millis, true),
            nonce
        )
    }
}

/// Mints and verifies signed tokens for one issuing authority.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    /// `secret_hex` comes from configuration; a random 256-bit key is
    /// generated when none is configured (tokens then do not survive a
    /// process restart, which is fine for a display credential).
    pub fn new(secret_hex: Option<&str>) -> Result<Self, AttendanceError> {
        let key = match secret_hex {
            Some(s) => hex::decode(s).map_err(|_| {
                AttendanceError::Configuration("CHECKIN_SECRET must be hex-encoded".into())
            })?,
            None => {
                use rand::RngCore;
                let mut buf = [0u8; 32];
                rand::rngs::OsRng.fill_bytes(&mut buf);
                buf.to_vec()
            }
        };
        if key.is_empty() {
            return Err(AttendanceError::Configuration(
                "signing key must not be empty".into(),
            ));
        }
        Ok(Self { key })
    }

    /// Mint a token whose window starts at `now` and lasts `window`.
    pub fn mint(&self, batch_id: &str, now: DateTime<Utc>, window: Duration) -> CheckInToken {
        let valid_from = now;
        let valid_until = now + window;
        let nonce = now.timestamp_millis();
        let signature = self.sign(batch_id, valid_from, valid_until, nonce);
        CheckInToken {
            batch_id: batch_id.to_owned(),
            issued_at: now,
            valid_from,
            valid_until,
            nonce,
            signature,
        }
    }

    fn sign(
        &self,
        batch_id: &str,
        valid_from: DateTime<Utc>,
        valid_until: DateTime<Utc>,
        nonce: i64,
    ) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(
            CheckInToken::canonical_payload(batch_id, valid_from, valid_until, nonce).as_bytes(),
        );
        hex::encode(mac.finalize().into_bytes())
    }

    /// Constant-time signature check. Any altered field invalidates the
    /// token: an unsigned or resigned payload from a client never verifies.
    pub fn verify(&self, token: &CheckInToken) -> Result<(), AttendanceError> {
        let claimed =
            hex::decode(&token.signature).map_err(|_| AttendanceError::TokenSignature)?;
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(
            CheckInToken::canonical_payload(
                &token.batch_id,
                token.valid_from,
                token.valid_until,
                token.nonce,
            )
            .as_bytes(),
        );
        mac.verify_slice(&claimed)
            .map_err(|_| AttendanceError::TokenSignature)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}
