//! Request and response types used by the handlers

pub mod auth;
pub mod catalog;
pub mod common;
pub mod journal;

pub use auth::*;
pub use catalog::*;
pub use common::*;
pub use journal::*;
