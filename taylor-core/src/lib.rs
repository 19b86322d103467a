//! Taylor-Made Core - shared domain types, configuration, logging and errors
//!
//! Every other crate in the workspace builds on the definitions here.

pub mod async_utils;
pub mod config;
pub mod error;
pub mod logging;
pub mod routing;
pub mod types;

pub use async_utils::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use routing::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
