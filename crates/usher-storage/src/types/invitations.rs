//! Invitation record and construction helpers.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::timestamps;
use super::InviteStatus;

/// Length of generated invite codes.
pub const CODE_LENGTH: usize = 8;

/// Default validity window for new invitations, in days.
pub const DEFAULT_VALID_DAYS: i64 = 7;

// Upper- and lowercase ASCII letters; codes never contain digits.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// An invitation record, keyed by `(email, code)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub email: String,
    pub code: String,
    pub invite_status: InviteStatus,
    #[serde(with = "crate::types::timestamps::canonical")]
    pub created_date: DateTime<Utc>,
    #[serde(with = "crate::types::timestamps::canonical")]
    pub expiry_date: DateTime<Utc>,
}

impl Invitation {
    /// Issue a fresh UNCONFIRMED invitation for `email` under `code`, valid
    /// for `valid_days` from now. Timestamps are truncated to whole seconds
    /// so the canonical string form round-trips.
    pub fn issue(email: impl Into<String>, code: impl Into<String>, valid_days: i64) -> Self {
        let now = timestamps::truncate_to_seconds(Utc::now());
        Self {
            email: email.into(),
            code: code.into(),
            invite_status: InviteStatus::Unconfirmed,
            created_date: now,
            expiry_date: now + Duration::days(valid_days),
        }
    }

    /// True once the expiry instant lies strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date < now
    }
}

/// Fields applied by a conditional update. Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct InvitationUpdate {
    pub invite_status: Option<InviteStatus>,
}

impl InvitationUpdate {
    /// Update that moves the record to `status`.
    pub fn status(status: InviteStatus) -> Self {
        Self {
            invite_status: Some(status),
        }
    }
}

/// Random invite code: [`CODE_LENGTH`] letters drawn uniformly from the
/// 52-letter alphabet. Uniqueness is not guaranteed here; the store's
/// put-if-absent create is the backstop.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
