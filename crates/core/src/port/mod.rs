// Port Layer - Interfaces for external collaborators

pub mod application_store;
pub mod notification_sink;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use application_store::{ApplicationStore, StoreError};
pub use notification_sink::NotificationSink;
pub use time_provider::TimeProvider;
