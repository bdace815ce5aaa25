//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod books;
pub mod entries;
pub mod export;
pub mod insights;

// Re-export all handlers for use in router
pub use auth::*;
pub use books::*;
pub use entries::*;
pub use export::*;
pub use insights::*;
