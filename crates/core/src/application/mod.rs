// Application Layer - Use Cases and Business Logic

pub mod identity;
pub mod reconciler;
pub mod tracking_cache;

// Re-exports
pub use identity::derive_id;
pub use reconciler::ApplicationRef;
pub use tracking_cache::{StatusBoard, TrackOutcome, TrackingCache, TrackingCacheState, UntrackOutcome};
