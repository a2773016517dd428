// Job Listing Model (supplied by the listing provider)

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Job posting as seen by the tracker.
///
/// Only `link` is guaranteed unique and stable, so every identity derived
/// for a posting starts from it. The listing provider's numeric `id` is a
/// surrogate that the tracker never relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub company: String,
    pub title: String,
    pub location: String,
    pub link: String,
    #[serde(default)]
    pub module: String, // Source feed name
    #[serde(default)]
    pub new: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_tags: Option<Vec<String>>,
}

impl Job {
    /// Create a job with the mandatory listing fields; optional fields start empty.
    pub fn new(
        company: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
        link: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            company: company.into(),
            title: title.into(),
            location: location.into(),
            link: link.into(),
            module: module.into(),
            new: false,
            tags: None,
            match_score: None,
            matching_tags: None,
        }
    }

    /// Check the fields the tracker depends on before anything leaves the process.
    ///
    /// `link` must be an absolute URL with a host.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::InvalidJob("title must not be empty".to_string()));
        }

        let url = Url::parse(&self.link)
            .map_err(|e| DomainError::InvalidJob(format!("link '{}': {}", self.link, e)))?;
        if url.host_str().map_or(true, str::is_empty) {
            return Err(DomainError::InvalidJob(format!(
                "link '{}' has no host",
                self.link
            )));
        }

        Ok(())
    }
}
