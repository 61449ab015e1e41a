//! In-memory store backend.
//!
//! Keeps invitations in ordered tables inside the process: a primary table
//! keyed `(email, code)` and a maintained `(status, expiry)` index, the same
//! shapes the SQL backend gets from its schema. All data is lost when the
//! store is dropped.
//!
//! Suitable for development and tests. Pagination is real: reads return at
//! most `page_size` items per call, so a small `with_page_size` forces
//! multi-page behavior in tests.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};

use tokio::sync::RwLock;
use usher_storage::timestamps;
use usher_storage::{
    paginate, Invitation, InvitationPage, InvitationUpdate, InviteStatus, PageToken, PrimaryKey,
    StatusIndexKey, Store, StoreError, DEFAULT_PAGE_SIZE,
};

/// Primary table key.
type RowKey = (String, String);

/// Index key: (status partition, canonical expiry, email, code). The expiry
/// rides in canonical string form, which sorts chronologically.
type IndexKey = (String, String, String, String);

#[derive(Default)]
struct Tables {
    rows: BTreeMap<RowKey, Invitation>,
    status_index: BTreeMap<IndexKey, ()>,
}

/// In-memory implementation of the [`Store`] trait.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    page_size: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create a store returning at most `page_size` items per paged read.
    pub fn with_page_size(page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        Self {
            tables: RwLock::new(Tables::default()),
            page_size,
        }
    }

    fn index_key(invitation: &Invitation) -> IndexKey {
        (
            invitation.invite_status.as_str().to_string(),
            timestamps::to_canonical(&invitation.expiry_date),
            invitation.email.clone(),
            invitation.code.clone(),
        )
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get_invitation(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<Invitation>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .rows
            .get(&(email.to_string(), code.to_string()))
            .cloned())
    }

    async fn create_invitation(&self, invitation: &Invitation) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let key = (invitation.email.clone(), invitation.code.clone());
        if tables.rows.contains_key(&key) {
            return Err(StoreError::AlreadyExists);
        }
        tables
            .status_index
            .insert(Self::index_key(invitation), ());
        tables.rows.insert(key, invitation.clone());
        Ok(())
    }

    async fn update_invitation(
        &self,
        email: &str,
        code: &str,
        update: &InvitationUpdate,
    ) -> Result<Option<Invitation>, StoreError> {
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;
        let key = (email.to_string(), code.to_string());
        let Some(row) = tables.rows.get_mut(&key) else {
            return Ok(None);
        };

        tables.status_index.remove(&Self::index_key(row));
        if let Some(status) = update.invite_status {
            row.invite_status = status;
        }
        tables.status_index.insert(Self::index_key(row), ());
        Ok(Some(row.clone()))
    }

    async fn scan_invitations(
        &self,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError> {
        let lower = match start {
            Some(token) => {
                let key: PrimaryKey = token.decode()?;
                Excluded((key.email, key.code))
            }
            None => Unbounded,
        };

        let tables = self.tables.read().await;
        paginate(
            tables.rows.range((lower, Unbounded)).map(|(_, v)| v.clone()),
            self.page_size,
            |inv| PrimaryKey {
                email: inv.email.clone(),
                code: inv.code.clone(),
            },
        )
    }

    async fn query_by_email(
        &self,
        email: &str,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError> {
        let lower = match start {
            Some(token) => {
                let key: PrimaryKey = token.decode()?;
                Excluded((key.email, key.code))
            }
            None => Included((email.to_string(), String::new())),
        };

        let tables = self.tables.read().await;
        paginate(
            tables
                .rows
                .range((lower, Unbounded))
                .take_while(|((e, _), _)| e == email)
                .map(|(_, v)| v.clone()),
            self.page_size,
            |inv| PrimaryKey {
                email: inv.email.clone(),
                code: inv.code.clone(),
            },
        )
    }

    async fn query_by_status(
        &self,
        status: InviteStatus,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError> {
        let partition = status.as_str().to_string();
        let lower = match start {
            Some(token) => {
                let key: StatusIndexKey = token.decode()?;
                Excluded((partition.clone(), key.expiry_date, key.email, key.code))
            }
            None => Included((partition.clone(), String::new(), String::new(), String::new())),
        };

        let tables = self.tables.read().await;
        let items = tables
            .status_index
            .range((lower, Unbounded))
            .take_while(|((part, _, _, _), _)| *part == partition)
            .filter_map(|((_, _, email, code), _)| {
                tables.rows.get(&(email.clone(), code.clone())).cloned()
            });

        paginate(items, self.page_size, |inv| StatusIndexKey {
            expiry_date: timestamps::to_canonical(&inv.expiry_date),
            email: inv.email.clone(),
            code: inv.code.clone(),
        })
    }
}
