//! Storage abstraction for usher.
//!
//! Backend crates (e.g., usher-store-memory, usher-store-sqlite) implement the
//! [`Store`] trait so the invitation service doesn't depend on any specific
//! engine or schema details.

use thiserror::Error;

pub mod store;
mod types;

pub use store::*;
pub use types::*;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("already exists")]
    AlreadyExists,
    #[error("backend error: {0}")]
    Backend(String),
}
