// Tracking Cache - local view of tracked applications, kept in step with the store

mod board;
mod single_flight;
mod state;


pub use board::StatusBoard;
pub use state::TrackingCacheState;

use single_flight::{FlightGuard, SingleFlight};

use crate::application::identity::derive_id;
use crate::application::reconciler::{self, ApplicationRef};
use crate::domain::{
    Application, ApplicationId, ApplicationPatch, ApplicationStatus, Job, NotificationKind,
};
use crate::error::{AppError, Result};
use crate::port::{ApplicationStore, NotificationSink, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

/// Result of `track`
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    /// Store created (or returned) the application
    Tracked(Application),
    /// Job was already tracked; nothing was sent to the store
    AlreadyTracked(ApplicationId),
}

/// Result of `untrack`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntrackOutcome {
    Removed(ApplicationId),
    /// Store no longer had it; treated as removed
    AlreadyGone(ApplicationId),
}

/// Tracking Cache
///
/// One instance per session. Owns the only mutable copy of
/// [`TrackingCacheState`]; consumers read snapshots.
///
/// Every operation:
/// - validates input before any store call
/// - claims a per-key single-flight slot (overlapping mutations of the same
///   application are rejected, not queued)
/// - applies the store-confirmed result on success, leaves state untouched
///   on failure
/// - emits exactly one notification (`load` only records `error`)
pub struct TrackingCache {
    store: Arc<dyn ApplicationStore>,
    sink: Arc<dyn NotificationSink>,
    state: RwLock<TrackingCacheState>,
    in_flight: AtomicUsize,
    flights: SingleFlight,
}

impl TrackingCache {
    pub fn new(store: Arc<dyn ApplicationStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            store,
            sink,
            state: RwLock::new(TrackingCacheState::default()),
            in_flight: AtomicUsize::new(0),
            flights: SingleFlight::new(),
        }
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    /// Copy of the current state
    pub fn snapshot(&self) -> TrackingCacheState {
        self.read_state().clone()
    }

    pub fn applications(&self) -> Vec<Application> {
        self.read_state().applications().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().loading()
    }

    pub fn error(&self) -> Option<String> {
        self.read_state().error().map(str::to_string)
    }

    /// True if the job is tracked under either ID scheme
    pub fn is_tracked(&self, job: &Job) -> bool {
        self.is_link_tracked(&job.link)
    }

    pub fn is_link_tracked(&self, link: &str) -> bool {
        let state = self.read_state();
        state.tracked_ids().contains(&derive_id(link)) || state.contains_link(link)
    }

    /// Cached application a reference points at, if any
    pub fn find(&self, target: &ApplicationRef) -> Option<Application> {
        reconciler::find(self.read_state().applications(), target).cloned()
    }

    pub fn board(&self) -> StatusBoard {
        StatusBoard::from_applications(self.read_state().applications())
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Replace the cache with the store's snapshot
    ///
    /// Store IDs become authoritative here: any legacy ID drift is dropped.
    /// Failures populate `error` for inline display and do not notify.
    pub async fn load(&self) -> Result<usize> {
        let _loading = self.begin();

        match self.store.list().await {
            Ok(applications) => {
                let count = applications.len();
                self.write_state().replace_all(applications);
                info!(count = count, "Applications loaded");
                Ok(count)
            }
            Err(e) => {
                log_store_failure("load", &e);
                let err = AppError::from(e);
                self.write_state().set_error(Some(err.user_message()));
                Err(err)
            }
        }
    }

    /// Start tracking a job
    ///
    /// Tracking an already tracked job is a no-op with an informational
    /// notification.
    pub async fn track(&self, job: &Job) -> Result<TrackOutcome> {
        const FAILED: &str = "Failed to track job";

        if let Err(e) = job.validate() {
            return Err(self.reject(FAILED, e.into()));
        }

        let derived = derive_id(&job.link);
        if self.is_tracked(job) {
            let id = self
                .find(&ApplicationRef::from(job))
                .map(|app| app.id)
                .unwrap_or_else(|| derived.clone());
            debug!(application_id = %id, link = %job.link, "Job already tracked");
            self.sink.notify(
                NotificationKind::Info,
                "Job already tracked",
                Some(&format!(
                    "{} at {} is already in your tracking list",
                    job.title, job.company
                )),
            );
            return Ok(TrackOutcome::AlreadyTracked(id));
        }

        let _flight = self.claim(&derived)?;
        let _loading = self.begin();

        match self.store.create(job).await {
            Ok(application) => {
                info!(
                    application_id = %application.id,
                    derived_id = %derived,
                    link = %job.link,
                    "Job tracked"
                );
                self.write_state().prepend(application.clone());
                self.sink.notify(
                    NotificationKind::Success,
                    "Job tracked successfully",
                    Some(&format!(
                        "Added {} at {} to your tracking list",
                        job.title, job.company
                    )),
                );
                Ok(TrackOutcome::Tracked(application))
            }
            Err(e) => Err(self.store_failure("track", FAILED, e)),
        }
    }

    /// Stop tracking
    ///
    /// A store "not found" counts as success: already gone is the goal.
    pub async fn untrack(&self, target: impl Into<ApplicationRef>) -> Result<UntrackOutcome> {
        const FAILED: &str = "Failed to untrack job";

        let id = self.resolve(&target.into());
        let _flight = self.claim(&id)?;
        let _loading = self.begin();

        let outcome = match self.store.remove(&id).await {
            Ok(()) => UntrackOutcome::Removed(id.clone()),
            Err(StoreError::NotFound(msg)) => {
                debug!(application_id = %id, reason = %msg, "Application already gone from store");
                UntrackOutcome::AlreadyGone(id.clone())
            }
            Err(e) => return Err(self.store_failure("untrack", FAILED, e)),
        };

        self.write_state().remove(&id);
        info!(application_id = %id, "Job untracked");
        self.sink.notify(
            NotificationKind::Success,
            "Job untracked",
            Some("Removed job from your tracking list"),
        );
        Ok(outcome)
    }

    /// Move an application to any status
    pub async fn update_status(
        &self,
        target: impl Into<ApplicationRef>,
        status: ApplicationStatus,
    ) -> Result<Application> {
        self.apply_patch(
            target.into(),
            ApplicationPatch::status(status),
            "Status updated",
            format!("Application status changed to {status}"),
            "Failed to update status",
        )
        .await
    }

    /// Like `update_status` for untyped input
    ///
    /// A value outside the status enumeration is rejected before any store call.
    pub async fn update_status_str(
        &self,
        target: impl Into<ApplicationRef>,
        status: &str,
    ) -> Result<Application> {
        match status.parse::<ApplicationStatus>() {
            Ok(status) => self.update_status(target, status).await,
            Err(e) => Err(self.reject("Failed to update status", e.into())),
        }
    }

    /// Replace an application's notes
    pub async fn update_notes(
        &self,
        target: impl Into<ApplicationRef>,
        notes: impl Into<String>,
    ) -> Result<Application> {
        self.apply_patch(
            target.into(),
            ApplicationPatch::notes(notes),
            "Notes updated",
            "Application notes have been saved".to_string(),
            "Failed to update notes",
        )
        .await
    }

    async fn apply_patch(
        &self,
        target: ApplicationRef,
        patch: ApplicationPatch,
        success_title: &str,
        success_message: String,
        failure_title: &str,
    ) -> Result<Application> {
        if patch.is_empty() {
            return Err(self.reject(
                failure_title,
                AppError::Validation("Nothing to update".to_string()),
            ));
        }

        let id = self.resolve(&target);
        let _flight = self.claim(&id)?;
        let _loading = self.begin();

        match self.store.patch(&id, &patch).await {
            Ok(application) => {
                info!(
                    application_id = %id,
                    status = %application.status,
                    "Application updated"
                );
                self.write_state().replace(&id, application.clone());
                self.sink
                    .notify(NotificationKind::Success, success_title, Some(&success_message));
                Ok(application)
            }
            Err(e) => Err(self.store_failure("patch", failure_title, e)),
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn resolve(&self, target: &ApplicationRef) -> ApplicationId {
        let id = reconciler::resolve(self.read_state().applications(), target);
        debug!(target = ?target, application_id = %id, "Resolved application reference");
        id
    }

    /// Claim the single-flight slot for `key`, or reject with a warning
    fn claim<'a>(&'a self, key: &str) -> Result<FlightGuard<'a>> {
        self.flights.try_claim(key).ok_or_else(|| {
            warn!(key = %key, "Mutation already in flight, rejecting");
            self.sink.notify(
                NotificationKind::Warning,
                "Operation in progress",
                Some("This application is already being updated"),
            );
            AppError::Conflict(format!("An operation on {key} is already in progress"))
        })
    }

    /// Mark an operation as started; `loading` clears when the guard drops
    fn begin(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let mut state = self.write_state();
        state.set_loading(true);
        state.set_error(None);
        LoadingGuard { cache: self }
    }

    /// Record a failure that never reached the store
    fn reject(&self, title: &str, err: AppError) -> AppError {
        warn!(error = %err, "Rejected before contacting store");
        self.fail(title, err)
    }

    fn store_failure(&self, operation: &'static str, title: &str, e: StoreError) -> AppError {
        log_store_failure(operation, &e);
        self.fail(title, AppError::from(e))
    }

    fn fail(&self, title: &str, err: AppError) -> AppError {
        let message = err.user_message();
        self.write_state().set_error(Some(message.clone()));
        self.sink
            .notify(NotificationKind::Error, title, Some(&message));
        err
    }

    fn read_state(&self) -> RwLockReadGuard<'_, TrackingCacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, TrackingCacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears `loading` once the last concurrent operation finishes
struct LoadingGuard<'a> {
    cache: &'a TrackingCache,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let remaining = self.cache.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        self.cache.write_state().set_loading(remaining > 0);
    }
}

fn log_store_failure(operation: &'static str, e: &StoreError) {
    match e {
        StoreError::Transport(detail) => {
            error!(operation = operation, error = %detail, "Application store unreachable");
        }
        StoreError::Malformed(detail) => {
            error!(operation = operation, error = %detail, "Malformed store response");
        }
        StoreError::Remote(msg) | StoreError::NotFound(msg) => {
            warn!(operation = operation, error = %msg, "Application store reported failure");
        }
    }
}
