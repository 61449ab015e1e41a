//! Filter translation for read paths.
//!
//! Picks the cheapest store access for a `{invite_status, email, code}`
//! filter and chases continuation tokens until the result is complete:
//!
//! 1. `invite_status` set: index query, with email/code applied client-side.
//! 2. `email` set: keyed get when `code` pins the record, else primary query.
//! 3. nothing set: full table scan.

use std::collections::HashMap;
use usher_storage::{Invitation, InviteStatus, Store, StoreError};

/// The caller filters recognized by review.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    pub invite_status: Option<String>,
    pub email: Option<String>,
    pub code: Option<String>,
}

impl ReviewFilter {
    pub fn from_query_params(params: &HashMap<String, String>) -> Self {
        Self {
            invite_status: params.get("invite_status").cloned(),
            email: params.get("email").cloned(),
            code: params.get("code").cloned(),
        }
    }

    fn matches(&self, invitation: &Invitation) -> bool {
        self.email
            .as_deref()
            .map_or(true, |email| invitation.email == email)
            && self
                .code
                .as_deref()
                .map_or(true, |code| invitation.code == code)
    }
}

/// Resolve a filter into the full matching sequence.
pub async fn run_query(
    store: &dyn Store,
    filter: &ReviewFilter,
) -> Result<Vec<Invitation>, StoreError> {
    if let Some(raw_status) = &filter.invite_status {
        let Ok(status) = raw_status.parse::<InviteStatus>() else {
            // A status outside the closed set matches nothing.
            return Ok(Vec::new());
        };

        let mut items = Vec::new();
        let mut start = None;
        loop {
            let page = store.query_by_status(status, start).await?;
            items.extend(page.items);
            match page.next {
                Some(token) => start = Some(token),
                None => break,
            }
        }
        // email/code narrow the index result client-side.
        items.retain(|invitation| filter.matches(invitation));
        return Ok(items);
    }

    if let Some(email) = &filter.email {
        // Both key components present pins a single record.
        if let Some(code) = &filter.code {
            let item = store.get_invitation(email, code).await?;
            return Ok(item.into_iter().collect());
        }

        let mut items = Vec::new();
        let mut start = None;
        loop {
            let page = store.query_by_email(email, start).await?;
            items.extend(page.items);
            match page.next {
                Some(token) => start = Some(token),
                None => break,
            }
        }
        return Ok(items);
    }

    // No usable filter left; this is the slow path.
    let mut items = Vec::new();
    let mut start = None;
    loop {
        let page = store.scan_invitations(start).await?;
        items.extend(page.items);
        match page.next {
            Some(token) => start = Some(token),
            None => break,
        }
    }
    Ok(items)
}
