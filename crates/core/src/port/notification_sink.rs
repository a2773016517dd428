// Notification Sink Port
// The tracker only calls into the sink; it never owns or reads its state.

use crate::domain::NotificationKind;

/// Receives human-readable outcome events for the user
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, title: &str, message: Option<&str>);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::Notification;
    use std::sync::Mutex;

    /// Sink that records every notification in delivery order
    #[derive(Default)]
    pub struct RecordingSink {
        received: Mutex<Vec<Notification>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn notifications(&self) -> Vec<Notification> {
            self.received.lock().unwrap().clone()
        }

        pub fn last(&self) -> Option<Notification> {
            self.received.lock().unwrap().last().cloned()
        }

        pub fn count(&self) -> usize {
            self.received.lock().unwrap().len()
        }

        pub fn count_of(&self, kind: NotificationKind) -> usize {
            self.received
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.kind == kind)
                .count()
        }
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, kind: NotificationKind, title: &str, message: Option<&str>) {
            self.received
                .lock()
                .unwrap()
                .push(Notification::new(kind, title, message));
        }
    }
}
