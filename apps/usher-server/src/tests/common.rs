//! Common test helpers and fixtures for server tests.
//!
//! Provides server constructors over each backend, an invitation builder,
//! the two seeded tables the suites share, and request/response shorthand.

use chrono::{Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use usher_storage::{timestamps, Invitation, InviteStatus, MockStore, Store};
use usher_store_memory::MemoryStore;
use usher_store_sqlite::SqliteStore;

use crate::api::{ApiRequest, ApiResponse};
use crate::config::ServerConfig;
use crate::server::UsherServer;

/// Server over a fresh in-memory table.
pub fn memory_server() -> UsherServer {
    UsherServer::new_memory(Arc::new(MemoryStore::new()), ServerConfig::default())
}

/// Server over an in-memory table with a small page size, forcing
/// multi-page reads.
pub fn memory_server_with_page_size(page_size: usize) -> UsherServer {
    UsherServer::new_memory(
        Arc::new(MemoryStore::with_page_size(page_size)),
        ServerConfig::default(),
    )
}

/// Server over in-memory SQLite.
pub async fn sqlite_server() -> UsherServer {
    let store = SqliteStore::open_in_memory().await.unwrap();
    UsherServer::new_sqlite(Arc::new(store), ServerConfig::default())
}

/// Server over a prepared mock store, for failure-path tests.
pub fn mock_server(store: MockStore) -> UsherServer {
    UsherServer::new_mock(Arc::new(store), ServerConfig::default())
}

/// An invitation expiring `expires_in_days` from now; negative values put
/// it past expiry.
pub fn invitation(
    email: &str,
    code: &str,
    status: InviteStatus,
    expires_in_days: i64,
) -> Invitation {
    let now = timestamps::truncate_to_seconds(Utc::now());
    Invitation {
        email: email.to_string(),
        code: code.to_string(),
        invite_status: status,
        created_date: now - Duration::days(30),
        expiry_date: now + Duration::days(expires_in_days),
    }
}

/// Six invitations across three emails, covering every status plus one
/// stale unconfirmed row.
pub async fn seed_mixed_fixture(server: &UsherServer) {
    let rows = [
        invitation("abc@gmail.com", "AAAAaaaa", InviteStatus::Unconfirmed, 7),
        invitation("abc@gmail.com", "BBBBbbbb", InviteStatus::Confirmed, 7),
        invitation("abc@gmail.com", "CCCCcccc", InviteStatus::Unconfirmed, -1),
        invitation("def@yahoo.com", "DDDDdddd", InviteStatus::Invalidated, 7),
        invitation("def@yahoo.com", "EEEEeeee", InviteStatus::Expired, -1),
        invitation("ghi@proton.me", "FFFFffff", InviteStatus::Unconfirmed, 3),
    ];
    for row in rows {
        server.store.create_invitation(&row).await.unwrap();
    }
}

/// 250 rows for sweep runs: 100 stale unconfirmed, 50 fresh unconfirmed,
/// 50 already expired, 50 confirmed past their expiry.
pub async fn seed_sweep_fixture(store: &dyn Store) {
    for n in 0..100 {
        let row = invitation(
            &format!("stale{n:03}@x.com"),
            "SSSSssss",
            InviteStatus::Unconfirmed,
            -2,
        );
        store.create_invitation(&row).await.unwrap();
    }
    for n in 0..50 {
        let row = invitation(
            &format!("fresh{n:03}@x.com"),
            "FFFFffff",
            InviteStatus::Unconfirmed,
            5,
        );
        store.create_invitation(&row).await.unwrap();
    }
    for n in 0..50 {
        let row = invitation(
            &format!("done{n:03}@x.com"),
            "DDDDdddd",
            InviteStatus::Expired,
            -2,
        );
        store.create_invitation(&row).await.unwrap();
    }
    for n in 0..50 {
        let row = invitation(
            &format!("kept{n:03}@x.com"),
            "KKKKkkkk",
            InviteStatus::Confirmed,
            -2,
        );
        store.create_invitation(&row).await.unwrap();
    }
}

/// A GET request with the given query parameters.
pub fn get_request(params: &[(&str, &str)]) -> ApiRequest {
    ApiRequest {
        method: "GET".to_string(),
        query_params: params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
        body: None,
    }
}

/// A bodied request for POST/PUT/DELETE.
pub fn body_request(method: &str, body: Value) -> ApiRequest {
    ApiRequest {
        method: method.to_string(),
        query_params: HashMap::new(),
        body: Some(body),
    }
}

/// A request with neither query parameters nor body.
pub fn bare_request(method: &str) -> ApiRequest {
    ApiRequest {
        method: method.to_string(),
        query_params: HashMap::new(),
        body: None,
    }
}

/// The data field as a list; empty when absent or not a list.
pub fn data_items(response: &ApiResponse) -> Vec<Value> {
    match &response.body.data {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// The message field, or empty string.
pub fn message(response: &ApiResponse) -> &str {
    response.body.message.as_deref().unwrap_or("")
}
