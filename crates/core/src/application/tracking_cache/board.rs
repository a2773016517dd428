// Status Board - applications grouped into pipeline columns

use crate::domain::{Application, ApplicationStatus};
use std::collections::BTreeMap;

/// Applications grouped by status, in pipeline order
///
/// Each column is sorted by `last_update`, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBoard {
    columns: BTreeMap<ApplicationStatus, Vec<Application>>,
}

impl StatusBoard {
    pub fn from_applications(applications: &[Application]) -> Self {
        let mut columns: BTreeMap<ApplicationStatus, Vec<Application>> = ApplicationStatus::ALL
            .into_iter()
            .map(|status| (status, Vec::new()))
            .collect();

        for app in applications {
            columns.entry(app.status).or_default().push(app.clone());
        }
        for column in columns.values_mut() {
            column.sort_by(|a, b| b.last_update.cmp(&a.last_update));
        }

        Self { columns }
    }

    pub fn column(&self, status: ApplicationStatus) -> &[Application] {
        self.columns.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.column(status).len()
    }

    pub fn total(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Columns in pipeline order, empty ones included
    pub fn columns(&self) -> impl Iterator<Item = (ApplicationStatus, &[Application])> {
        self.columns
            .iter()
            .map(|(status, apps)| (*status, apps.as_slice()))
    }
}
