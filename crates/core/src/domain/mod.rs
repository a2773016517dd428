// Domain Layer - Pure business logic and entities

pub mod application;
pub mod error;
pub mod job;
pub mod notification;
mod timestamp;

// Re-exports
pub use application::{Application, ApplicationId, ApplicationPatch, ApplicationStatus};
pub use error::DomainError;
pub use job::Job;
pub use notification::{Notification, NotificationKind};
