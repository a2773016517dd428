// Application Store Port (Interface)
// Remote persistence for tracked applications; every call yields a typed outcome

use crate::domain::{Application, ApplicationId, ApplicationPatch, Job};
use async_trait::async_trait;
use thiserror::Error;

/// Generic message shown when the store could not be reached or understood
pub const UNREACHABLE_MESSAGE: &str =
    "Could not reach the application service. Please try again.";

/// Store failures
///
/// `Remote` and `NotFound` carry the store's own message. `Transport` and
/// `Malformed` carry diagnostics meant for logs, not for the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store answered with `success: false` or an error status
    #[error("{0}")]
    Remote(String),

    /// Store reports the application does not exist
    #[error("{0}")]
    NotFound(String),

    /// Network unreachable, timeout, connection reset
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response could not be parsed or lacked required data
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl StoreError {
    /// True for failures that never reached a well-formed store answer
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Transport(_) | StoreError::Malformed(_))
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Remote(msg) | StoreError::NotFound(msg) => msg.clone(),
            StoreError::Transport(_) | StoreError::Malformed(_) => UNREACHABLE_MESSAGE.to_string(),
        }
    }
}

/// CRUD interface to the remote application store
///
/// Implementations touch no local state; callers decide what to do with results.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Full snapshot of tracked applications
    async fn list(&self) -> Result<Vec<Application>, StoreError>;

    /// Track a job; the store assigns `id`, timestamps and the initial status
    async fn create(&self, job: &Job) -> Result<Application, StoreError>;

    /// Partial update; the store recomputes `last_update`
    async fn patch(&self, id: &str, patch: &ApplicationPatch)
        -> Result<Application, StoreError>;

    /// Stop tracking
    ///
    /// # Errors
    /// - StoreError::NotFound if no application has this ID
    async fn remove(&self, id: &str) -> Result<(), StoreError>;
}

/// ID the reference store assigns: hex MD5 of the job link
pub fn store_id_for_link(link: &str) -> ApplicationId {
    format!("{:x}", md5::compute(link.as_bytes()))
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::port::time_provider::{SystemTimeProvider, TimeProvider};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// In-memory store with the reference backend's semantics
    ///
    /// - IDs are `store_id_for_link(job.link)`; creating an already stored
    ///   link returns the existing application
    /// - `list` orders by `last_update`, newest first
    /// - queued failures are returned (once each) before any real work
    pub struct InMemoryApplicationStore {
        state: Mutex<StoreState>,
        clock: Arc<dyn TimeProvider>,
        latency: Option<Duration>,
    }

    #[derive(Default)]
    struct StoreState {
        applications: Vec<Application>,
        failures: VecDeque<StoreError>,
        calls: usize,
    }

    impl Default for InMemoryApplicationStore {
        fn default() -> Self {
            Self::new()
        }
    }

    impl InMemoryApplicationStore {
        pub fn new() -> Self {
            Self::with_clock(Arc::new(SystemTimeProvider))
        }

        pub fn with_clock(clock: Arc<dyn TimeProvider>) -> Self {
            Self {
                state: Mutex::new(StoreState::default()),
                clock,
                latency: None,
            }
        }

        /// Delay every call (after failure injection is consumed)
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        /// Insert an application as-is, keeping whatever ID it carries
        pub fn seed(&self, application: Application) {
            self.state.lock().unwrap().applications.push(application);
        }

        /// Fail the next call with `error`
        pub fn fail_next(&self, error: StoreError) {
            self.state.lock().unwrap().failures.push_back(error);
        }

        pub fn call_count(&self) -> usize {
            self.state.lock().unwrap().calls
        }

        pub fn stored(&self) -> Vec<Application> {
            self.state.lock().unwrap().applications.clone()
        }

        fn begin_call(&self) -> Result<(), StoreError> {
            let mut state = self.state.lock().unwrap();
            state.calls += 1;
            match state.failures.pop_front() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }

        async fn simulate_latency(&self) {
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
        }
    }

    #[async_trait]
    impl ApplicationStore for InMemoryApplicationStore {
        async fn list(&self) -> Result<Vec<Application>, StoreError> {
            self.begin_call()?;
            self.simulate_latency().await;

            let mut applications = self.stored();
            applications.sort_by(|a, b| b.last_update.cmp(&a.last_update));
            Ok(applications)
        }

        async fn create(&self, job: &Job) -> Result<Application, StoreError> {
            self.begin_call()?;
            self.simulate_latency().await;

            let mut state = self.state.lock().unwrap();
            if let Some(existing) = state.applications.iter().find(|a| a.job.link == job.link) {
                return Ok(existing.clone());
            }

            let application =
                Application::new(store_id_for_link(&job.link), job.clone(), self.clock.now());
            state.applications.push(application.clone());
            Ok(application)
        }

        async fn patch(
            &self,
            id: &str,
            patch: &ApplicationPatch,
        ) -> Result<Application, StoreError> {
            self.begin_call()?;
            self.simulate_latency().await;

            let now = self.clock.now();
            let mut state = self.state.lock().unwrap();
            let application = state
                .applications
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| StoreError::NotFound(format!("Application with ID {id} not found")))?;

            application.apply(patch, now);
            Ok(application.clone())
        }

        async fn remove(&self, id: &str) -> Result<(), StoreError> {
            self.begin_call()?;
            self.simulate_latency().await;

            let mut state = self.state.lock().unwrap();
            let before = state.applications.len();
            state.applications.retain(|a| a.id != id);
            if state.applications.len() == before {
                return Err(StoreError::NotFound(format!(
                    "Application with ID {id} not found"
                )));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::InMemoryApplicationStore;
    use super::*;
    use crate::domain::ApplicationStatus;

    fn job(link: &str) -> Job {
        Job::new("C", "T", "L", link, "M")
    }

    #[test]
    fn test_store_id_is_md5_hex_of_link() {
        assert_eq!(store_id_for_link("https://a/b"), "177e8bf5dbadc1b8260c1a0e3d269c84");
    }

    #[tokio::test]
    async fn test_in_memory_create_is_idempotent_per_link() {
        let store = InMemoryApplicationStore::new();
        let first = store.create(&job("https://a/b")).await.unwrap();
        let second = store.create(&job("https://a/b")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.stored().len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_patch_and_remove() {
        let store = InMemoryApplicationStore::new();
        let created = store.create(&job("https://a/b")).await.unwrap();

        let patched = store
            .patch(&created.id, &ApplicationPatch::status(ApplicationStatus::Applied))
            .await
            .unwrap();
        assert_eq!(patched.status, ApplicationStatus::Applied);

        store.remove(&created.id).await.unwrap();
        assert!(matches!(
            store.remove(&created.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_in_memory_injected_failure_is_consumed_once() {
        let store = InMemoryApplicationStore::new();
        store.fail_next(StoreError::Transport("connection reset".to_string()));

        assert!(store.list().await.is_err());
        assert!(store.list().await.is_ok());
        assert_eq!(store.call_count(), 2);
    }

    #[test]
    fn test_error_classification() {
        assert!(StoreError::Transport("x".into()).is_transport());
        assert!(StoreError::Malformed("x".into()).is_transport());
        assert!(!StoreError::Remote("x".into()).is_transport());
        assert_eq!(StoreError::NotFound("gone".into()).user_message(), "gone");
        assert_eq!(
            StoreError::Malformed("eof".into()).user_message(),
            UNREACHABLE_MESSAGE
        );
    }
}
