// Tracking Cache State
// `tracked_ids` is rebuilt from `applications` after every mutation, so the
// two can never diverge.

use crate::domain::{Application, ApplicationId};
use std::collections::HashSet;

/// Local view of the tracked applications
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingCacheState {
    tracked_ids: HashSet<ApplicationId>,
    applications: Vec<Application>,
    loading: bool,
    error: Option<String>,
}

impl TrackingCacheState {
    /// IDs of every cached application
    pub fn tracked_ids(&self) -> &HashSet<ApplicationId> {
        &self.tracked_ids
    }

    /// Cached applications, most recently tracked first
    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Last failure message, cleared when the next operation starts
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn get(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|app| app.id == id)
    }

    pub fn contains_link(&self, link: &str) -> bool {
        self.applications.iter().any(|app| app.job.link == link)
    }

    /// `tracked_ids` equals the set of application IDs
    pub fn is_consistent(&self) -> bool {
        self.tracked_ids.len() == self.applications.len()
            && self
                .applications
                .iter()
                .all(|app| self.tracked_ids.contains(&app.id))
    }

    pub(super) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub(super) fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Replace everything with a store snapshot
    pub(super) fn replace_all(&mut self, applications: Vec<Application>) {
        self.applications = applications;
        self.dedup();
        self.reindex();
    }

    /// Insert at the front, dropping any stale copy with the same ID
    pub(super) fn prepend(&mut self, application: Application) {
        self.applications.retain(|app| app.id != application.id);
        self.applications.insert(0, application);
        self.reindex();
    }

    /// Swap the copy cached under `id` for the store's confirmed copy, in place
    pub(super) fn replace(&mut self, id: &str, application: Application) {
        match self.applications.iter().position(|app| app.id == id) {
            Some(index) => {
                self.applications[index] = application;
                self.dedup();
                self.reindex();
            }
            None => self.prepend(application),
        }
    }

    pub(super) fn remove(&mut self, id: &str) -> Option<Application> {
        let index = self.applications.iter().position(|app| app.id == id)?;
        let removed = self.applications.remove(index);
        self.reindex();
        Some(removed)
    }

    // Keeps the first occurrence of each ID
    fn dedup(&mut self) {
        let mut seen = HashSet::with_capacity(self.applications.len());
        self.applications.retain(|app| seen.insert(app.id.clone()));
    }

    fn reindex(&mut self) {
        self.tracked_ids = self.applications.iter().map(|app| app.id.clone()).collect();
    }
}
