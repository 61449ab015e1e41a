//! Server unit and integration tests.
//!
//! Tests are organized into modules by feature area:
//! - `common` - shared fixtures and request builders
//! - `handlers` - lifecycle handler tests over the response envelope
//! - `query` - filter translation and pagination-follow tests
//! - `sweep` - expiry sweep pipeline tests

pub mod common;

mod query;
