use std::sync::Arc;
use usher_storage::*;
use usher_store_memory::MemoryStore;
use usher_store_sqlite::SqliteStore;

/// StoreBackend abstracts over the shipped store implementations
#[derive(Clone)]
pub enum StoreBackend {
    Memory(Arc<MemoryStore>),
    Sqlite(Arc<SqliteStore>),
    #[cfg(test)]
    Mock(Arc<MockStore>),
}

#[async_trait::async_trait]
impl Store for StoreBackend {
    async fn get_invitation(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<Invitation>, StoreError> {
        match self {
            StoreBackend::Memory(s) => s.get_invitation(email, code).await,
            StoreBackend::Sqlite(s) => s.get_invitation(email, code).await,
            #[cfg(test)]
            StoreBackend::Mock(s) => s.get_invitation(email, code).await,
        }
    }

    async fn create_invitation(&self, invitation: &Invitation) -> Result<(), StoreError> {
        match self {
            StoreBackend::Memory(s) => s.create_invitation(invitation).await,
            StoreBackend::Sqlite(s) => s.create_invitation(invitation).await,
            #[cfg(test)]
            StoreBackend::Mock(s) => s.create_invitation(invitation).await,
        }
    }

    async fn update_invitation(
        &self,
        email: &str,
        code: &str,
        update: &InvitationUpdate,
    ) -> Result<Option<Invitation>, StoreError> {
        match self {
            StoreBackend::Memory(s) => s.update_invitation(email, code, update).await,
            StoreBackend::Sqlite(s) => s.update_invitation(email, code, update).await,
            #[cfg(test)]
            StoreBackend::Mock(s) => s.update_invitation(email, code, update).await,
        }
    }

    async fn scan_invitations(
        &self,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError> {
        match self {
            StoreBackend::Memory(s) => s.scan_invitations(start).await,
            StoreBackend::Sqlite(s) => s.scan_invitations(start).await,
            #[cfg(test)]
            StoreBackend::Mock(s) => s.scan_invitations(start).await,
        }
    }

    async fn query_by_email(
        &self,
        email: &str,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError> {
        match self {
            StoreBackend::Memory(s) => s.query_by_email(email, start).await,
            StoreBackend::Sqlite(s) => s.query_by_email(email, start).await,
            #[cfg(test)]
            StoreBackend::Mock(s) => s.query_by_email(email, start).await,
        }
    }

    async fn query_by_status(
        &self,
        status: InviteStatus,
        start: Option<PageToken>,
    ) -> Result<InvitationPage, StoreError> {
        match self {
            StoreBackend::Memory(s) => s.query_by_status(status, start).await,
            StoreBackend::Sqlite(s) => s.query_by_status(status, start).await,
            #[cfg(test)]
            StoreBackend::Mock(s) => s.query_by_status(status, start).await,
        }
    }
}
