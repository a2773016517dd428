// Identity Deriver
// Client-side surrogate IDs for job postings, computed from the link alone

use crate::domain::ApplicationId;
use base64::{engine::general_purpose::STANDARD, Engine};

/// Maximum length of a derived ID
pub const DERIVED_ID_LEN: usize = 16;

/// Derive the legacy client-side application ID for a job link.
///
/// Base64 of the UTF-8 link with every non-alphanumeric character removed,
/// truncated to [`DERIVED_ID_LEN`] characters. Links that share a long
/// common prefix collide; no uniqueness check is made, so colliding links
/// are treated as the same application.
pub fn derive_id(link: &str) -> ApplicationId {
    STANDARD
        .encode(link.as_bytes())
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(DERIVED_ID_LEN)
        .collect()
}
