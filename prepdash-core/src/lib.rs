//! Prepdash Core - shared foundation for the admin client
//!
//! Defines the error model, configuration handling, logging setup and
//! the domain types shared by every crate in the workspace.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tokio;
pub use tracing;
