// Identifier Reconciler
// Two generations of clients computed "the" application ID differently: a
// derived ID from the job link, and the ID the store assigns. Everything
// that turns a UI-supplied reference into a store ID lives here, so this
// module can be deleted once every client uses store IDs.

use crate::application::identity::derive_id;
use crate::domain::{Application, ApplicationId, Job};
use tracing::debug;

/// Reference to a tracked application as supplied by UI code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationRef {
    /// Store ID or legacy derived ID
    Id(ApplicationId),
    /// Canonical job link
    Link(String),
}

impl ApplicationRef {
    /// Parse free-form input: absolute http(s) URLs are links, anything else an ID
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ApplicationRef::Link(trimmed.to_string())
        } else {
            ApplicationRef::Id(trimmed.to_string())
        }
    }
}

impl From<&str> for ApplicationRef {
    fn from(id: &str) -> Self {
        ApplicationRef::Id(id.to_string())
    }
}

impl From<String> for ApplicationRef {
    fn from(id: String) -> Self {
        ApplicationRef::Id(id)
    }
}

impl From<&Job> for ApplicationRef {
    fn from(job: &Job) -> Self {
        ApplicationRef::Link(job.link.clone())
    }
}

/// Find the cached application a reference points at.
///
/// - Link: exact `job.link` match only. Derived IDs collide across links
///   sharing a prefix, so a link never matches through them.
/// - ID: exact store ID match, then the first application whose
///   `derive_id(job.link)` equals the supplied ID
pub fn find<'a>(applications: &'a [Application], target: &ApplicationRef) -> Option<&'a Application> {
    match target {
        ApplicationRef::Link(link) => applications.iter().find(|app| &app.job.link == link),
        ApplicationRef::Id(id) => applications
            .iter()
            .find(|app| &app.id == id)
            .or_else(|| find_by_derived(applications, id)),
    }
}

/// Resolve a reference to the ID the store should be called with.
///
/// Unmatched references pass through unchanged (a link becomes its derived
/// ID); the store is the final arbiter and reports failure if it is wrong.
pub fn resolve(applications: &[Application], target: &ApplicationRef) -> ApplicationId {
    if let Some(app) = find(applications, target) {
        return app.id.clone();
    }

    debug!(target = ?target, "No cached application for reference, passing through");
    match target {
        ApplicationRef::Id(id) => id.clone(),
        ApplicationRef::Link(link) => derive_id(link),
    }
}

fn find_by_derived<'a>(applications: &'a [Application], derived: &str) -> Option<&'a Application> {
    if derived.is_empty() {
        return None;
    }
    applications
        .iter()
        .find(|app| derive_id(&app.job.link) == derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn app(id: &str, link: &str) -> Application {
        Application::new(id, Job::new("C", "T", "L", link, "M"), Utc::now())
    }

    #[test]
    fn test_derived_id_resolves_to_store_id() {
        let apps = vec![app("SRV123", "https://x/y")];
        let derived = derive_id("https://x/y");
        assert_ne!(derived, "SRV123");

        assert_eq!(resolve(&apps, &ApplicationRef::Id(derived)), "SRV123");
    }

    #[test]
    fn test_link_match_is_preferred_over_derived_collision() {
        // Both links derive to the same 16-character ID
        let apps = vec![
            app("SRV-A", "https://jobs.example.com/a"),
            app("SRV-B", "https://jobs.example.com/b"),
        ];

        let target = ApplicationRef::Link("https://jobs.example.com/b".to_string());
        assert_eq!(resolve(&apps, &target), "SRV-B");
    }

    #[test]
    fn test_derived_collision_first_match_wins() {
        let apps = vec![
            app("SRV-A", "https://jobs.example.com/a"),
            app("SRV-B", "https://jobs.example.com/b"),
        ];

        let derived = derive_id("https://jobs.example.com/b");
        assert_eq!(resolve(&apps, &ApplicationRef::Id(derived)), "SRV-A");
    }

    #[test]
    fn test_store_id_resolves_to_itself() {
        let apps = vec![app("SRV123", "https://x/y")];
        assert_eq!(resolve(&apps, &ApplicationRef::from("SRV123")), "SRV123");
    }

    #[test]
    fn test_unknown_id_passes_through() {
        let apps = vec![app("SRV123", "https://x/y")];
        assert_eq!(resolve(&apps, &ApplicationRef::from("nope")), "nope");
    }

    #[test]
    fn test_untracked_link_never_matches_through_derived_collision() {
        let apps = vec![app("SRV-A", "https://www.a.com/1")];
        let other = "https://www.b.com/2";
        assert_eq!(derive_id(other), derive_id("https://www.a.com/1"));

        let target = ApplicationRef::Link(other.to_string());
        assert!(find(&apps, &target).is_none());
        assert_eq!(resolve(&apps, &target), derive_id(other));
    }

    #[test]
    fn test_unknown_link_passes_through_as_derived_id() {
        let target = ApplicationRef::Link("https://a/b".to_string());
        assert_eq!(resolve(&[], &target), derive_id("https://a/b"));
    }

    #[test]
    fn test_parse_distinguishes_links_from_ids() {
        assert_eq!(
            ApplicationRef::parse(" https://a/b "),
            ApplicationRef::Link("https://a/b".to_string())
        );
        assert_eq!(
            ApplicationRef::parse("SRV123"),
            ApplicationRef::Id("SRV123".to_string())
        );
    }
}
