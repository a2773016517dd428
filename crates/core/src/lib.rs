// Jobtrack Core - Domain Logic, Ports & Tracking Cache
// NO transport dependencies: the application store is reached through ports only

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
