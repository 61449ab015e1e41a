//! Type definitions for usher storage.

mod invitations;
mod pages;
mod status;
pub mod timestamps;

// Re-export all types from submodules
pub use invitations::*;
pub use pages::*;
pub use status::*;
