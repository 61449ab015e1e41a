//! Invitation status state machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of an invitation.
///
/// UNCONFIRMED is the only non-terminal state: confirm moves it to
/// CONFIRMED, the expiry sweep moves it to EXPIRED. CONFIRMED, INVALIDATED
/// and EXPIRED are absorbing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Unconfirmed,
    Confirmed,
    Invalidated,
    Expired,
}

impl InviteStatus {
    /// Stable lowercase wire form, also used as the index partition key.
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Unconfirmed => "unconfirmed",
            InviteStatus::Confirmed => "confirmed",
            InviteStatus::Invalidated => "invalidated",
            InviteStatus::Expired => "expired",
        }
    }

    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InviteStatus::Unconfirmed)
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a status string outside the closed set.
#[derive(Debug, Error)]
#[error("unknown invite status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for InviteStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unconfirmed" => Ok(InviteStatus::Unconfirmed),
            "confirmed" => Ok(InviteStatus::Confirmed),
            "invalidated" => Ok(InviteStatus::Invalidated),
            "expired" => Ok(InviteStatus::Expired),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_fromstr_round_trip() {
        for status in [
            InviteStatus::Unconfirmed,
            InviteStatus::Confirmed,
            InviteStatus::Invalidated,
            InviteStatus::Expired,
        ] {
            assert_eq!(status.to_string().parse::<InviteStatus>().unwrap(), status);
        }
    }

    #[test]
    fn fromstr_rejects_unknown_and_uppercase() {
        assert!("pending".parse::<InviteStatus>().is_err());
        assert!("UNCONFIRMED".parse::<InviteStatus>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_strings() {
        let json = serde_json::to_string(&InviteStatus::Unconfirmed).unwrap();
        assert_eq!(json, "\"unconfirmed\"");
        let back: InviteStatus = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(back, InviteStatus::Expired);
    }

    #[test]
    fn only_unconfirmed_is_non_terminal() {
        assert!(!InviteStatus::Unconfirmed.is_terminal());
        assert!(InviteStatus::Confirmed.is_terminal());
        assert!(InviteStatus::Invalidated.is_terminal());
        assert!(InviteStatus::Expired.is_terminal());
    }
}
