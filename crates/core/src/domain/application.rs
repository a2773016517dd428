// Application Domain Model

use crate::domain::error::DomainError;
use crate::domain::job::Job;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Application ID
///
/// Opaque string. Either derived by a client from the job link or assigned
/// by the store; the store-assigned form is authoritative.
pub type ApplicationId = String;

/// Application Status
///
/// Flat state machine: every status may move to every other status.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ApplicationStatus {
    #[default]
    Interested,
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// Every status in pipeline column order
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Interested,
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Interested => "Interested",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidStatus(s.to_string()))
    }
}

/// Tracked Application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job: Job,
    pub status: ApplicationStatus,

    #[serde(with = "crate::domain::timestamp")]
    pub date_added: DateTime<Utc>,
    #[serde(with = "crate::domain::timestamp")]
    pub last_update: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Application {
    /// Create a freshly tracked application (status `Interested`)
    ///
    /// # Arguments
    ///
    /// * `id` - Store-assigned ID (injected, not generated)
    /// * `job` - Tracked job posting
    /// * `now` - Creation timestamp (injected, not system time)
    pub fn new(id: impl Into<ApplicationId>, job: Job, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            job,
            status: ApplicationStatus::default(),
            date_added: now,
            last_update: now,
            notes: None,
        }
    }

    /// Apply a partial update and stamp `last_update`
    pub fn apply(&mut self, patch: &ApplicationPatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
        self.last_update = now;
    }
}

/// Partial update body (`PATCH /applications/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ApplicationPatch {
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            notes: None,
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            status: None,
            notes: Some(notes.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none()
    }
}
