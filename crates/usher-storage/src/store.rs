//! The Store trait that backends implement.

use crate::types::*;
use crate::StoreError;

/// The keyed-store abstraction the invitation service runs on.
///
/// The primary key is `(email, code)`; one secondary index over
/// `(invite_status, expiry_date)` serves status queries and the expiry
/// sweep. Paged methods return one page per call and resume from a
/// [`PageToken`] until `next` comes back `None`.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────────────── Lookups ─────────────────────────────────────

    /// Fetch one invitation by its full primary key.
    async fn get_invitation(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<Invitation>, StoreError>;

    // ───────────────────────────────────── Writes ──────────────────────────────────────

    /// Put-if-absent create. An existing `(email, code)` pair yields
    /// `StoreError::AlreadyExists`.
    async fn create_invitation(&self, invitation: &Invitation) -> Result<(), StoreError>;

    /// Conditional update: applies only if the keyed record exists. Key
    /// absent is `Ok(None)`, not an error. Returns the post-update record.
    async fn update_invitation(
        &self,
        email: &str,
        code: &str,
        update: &InvitationUpdate,
    ) -> Result<Option<Invitation>, StoreError>;

    // ─────────────────────────────────── Paged reads ───────────────────────────────────

    /// Walk the whole table. Ordering is backend-defined.
    async fn scan_invitations(&self, start: Option<PageToken>)
        -> Result<InvitationPage, StoreError>;

    /// Primary-key query: every code for `email`, ascending by code. The
    /// single-record `(email, code)` case is [`Store::get_invitation`].
    async fn query_by_email(
        &self,
        email: &str,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError>;

    /// Index query: all records in one status partition, ascending by
    /// expiry date.
    async fn query_by_status(
        &self,
        status: InviteStatus,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError>;
}
