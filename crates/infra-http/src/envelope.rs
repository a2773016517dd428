// Response envelope: `{ success, data?, error? }`
// Error responses may instead be FastAPI-style `{ detail }` with a 4xx/5xx status.

use jobtrack_core::port::StoreError;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const NOT_FOUND_MESSAGE: &str = "Application not found";

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub detail: Option<Value>,
}

impl<T> Envelope<T> {
    /// Store-supplied failure text: `error`, then `detail`, then `message`
    fn failure_message(&self) -> Option<String> {
        self.error
            .clone()
            .or_else(|| self.detail.as_ref().map(detail_text))
            .or_else(|| self.message.clone())
            .filter(|msg| !msg.trim().is_empty())
    }

    /// Payload of a successful envelope
    pub fn into_data(self) -> Result<T, StoreError> {
        self.data
            .ok_or_else(|| StoreError::Malformed("response envelope carried no data".to_string()))
    }
}

/// Read and classify a store response
///
/// - 404: `NotFound`
/// - other error status, or `success: false`: `Remote` with the store's message
/// - body that does not parse: `Malformed`
pub(crate) async fn read<T>(response: Response) -> Result<Envelope<T>, StoreError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| StoreError::Transport(format!("failed to read response body: {e}")))?;

    classify(status, &body)
}

pub(crate) fn classify<T>(status: StatusCode, body: &str) -> Result<Envelope<T>, StoreError>
where
    T: DeserializeOwned,
{
    let envelope = match serde_json::from_str::<Envelope<T>>(body) {
        Ok(envelope) => envelope,
        Err(e) if status == StatusCode::NOT_FOUND => {
            debug!(error = %e, body = %snippet(body), "Unparseable 404 body");
            return Err(StoreError::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }
        Err(e) if status.is_success() => {
            return Err(StoreError::Malformed(e.to_string()));
        }
        Err(_) => {
            return Err(StoreError::Malformed(format!(
                "unexpected status {status}: {}",
                snippet(body)
            )));
        }
    };

    if status == StatusCode::NOT_FOUND {
        let message = envelope
            .failure_message()
            .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string());
        return Err(StoreError::NotFound(message));
    }

    if !status.is_success() || !envelope.success {
        let message = envelope
            .failure_message()
            .unwrap_or_else(|| default_message(status));
        return Err(StoreError::Remote(message));
    }

    Ok(envelope)
}

fn detail_text(detail: &Value) -> String {
    match detail {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn default_message(status: StatusCode) -> String {
    if status.is_success() {
        "Request was not successful".to_string()
    } else {
        format!("Request failed with status {status}")
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((index, _)) => format!("{}...", &body[..index]),
        None => body.to_string(),
    }
}
