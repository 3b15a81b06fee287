//! DTOs for decoding users endpoint error bodies.
//!
//! Success payloads decode straight into domain [`crate::domain::User`]
//! records; only failures need a transport-side shape.

use serde::Deserialize;

/// JSON error body. Servers that reject a request may explain why in a
/// top-level `message` string.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl ErrorBodyDto {
    /// Extract a non-blank `message` from `body`, if it is such a JSON object.
    pub(super) fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .and_then(|dto| dto.message)
            .map(|message| message.trim().to_owned())
            .filter(|message| !message.is_empty())
    }
}
