use crate::backend::StoreBackend;
use crate::config::ServerConfig;
use std::sync::Arc;
use usher_store_memory::MemoryStore;
use usher_store_sqlite::SqliteStore;

/// Shared state behind every handler and the sweep scheduler.
#[derive(Clone)]
pub struct UsherServer {
    pub store: StoreBackend,
    pub config: ServerConfig,
}

impl UsherServer {
    pub fn new(store: StoreBackend, config: ServerConfig) -> Self {
        Self { store, config }
    }

    pub fn new_memory(store: Arc<MemoryStore>, config: ServerConfig) -> Self {
        Self::new(StoreBackend::Memory(store), config)
    }

    pub fn new_sqlite(store: Arc<SqliteStore>, config: ServerConfig) -> Self {
        Self::new(StoreBackend::Sqlite(store), config)
    }

    #[cfg(test)]
    pub fn new_mock(store: Arc<usher_storage::MockStore>, config: ServerConfig) -> Self {
        Self::new(StoreBackend::Mock(store), config)
    }
}
