// Time Provider Port (for testability)

use chrono::{DateTime, Utc};

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time
    fn now(&self) -> DateTime<Utc>;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Mutex;

    /// Clock that advances by a fixed step on every read
    ///
    /// Makes "last_update moved forward" observable without sleeping.
    pub struct StepClock {
        current: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl StepClock {
        pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                current: Mutex::new(start),
                step,
            }
        }

        /// 2024-01-01T00:00:00Z, one second per read
        pub fn starting_2024() -> Self {
            Self::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Duration::seconds(1),
            )
        }
    }

    impl TimeProvider for StepClock {
        fn now(&self) -> DateTime<Utc> {
            let mut current = self.current.lock().unwrap();
            let now = *current;
            *current = now + self.step;
            now
        }
    }
}
