//! HTTP request handlers for the Taylor-Made web server
//!
//! Handlers are organized by functionality; auth and dashboard handlers
//! live next to their guards in `auth` and `dashboard`.

pub mod catalog;
pub mod health;
pub mod journal;
pub mod proxy;
pub mod registry;
pub mod types;

pub use catalog::*;
pub use health::*;
pub use journal::*;
pub use proxy::*;
pub use registry::*;

// Re-export all types for convenience
pub use types::*;
