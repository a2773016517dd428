// Jobtrack Infrastructure - HTTP Adapter
// Implements: ApplicationStore against the REST `applications` resource

mod config;
mod envelope;
mod error;
mod store;

pub use config::{HttpStoreConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::HttpStoreError;
pub use store::HttpApplicationStore;
