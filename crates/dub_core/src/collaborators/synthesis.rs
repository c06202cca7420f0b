//! HTTP client for the speech synthesis service.

use std::time::Duration;

use reqwest::blocking::Client;

use super::{CollaboratorError, CollaboratorResult, SynthesisService};

const SERVICE: &str = "synthesis service";

/// Client posting text + language as JSON and expecting the response
/// body to be a playable audio asset.
pub struct HttpSynthesisClient {
    client: Client,
    endpoint: String,
}

impl HttpSynthesisClient {
    /// Build a client with a bounded per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> CollaboratorResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CollaboratorError::RequestFailed {
                service: SERVICE,
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl SynthesisService for HttpSynthesisClient {
    fn synthesize(
        &self,
        text: &str,
        language: &str,
        voice: Option<&str>,
    ) -> CollaboratorResult<Vec<u8>> {
        let mut body = serde_json::json!({
            "text": text,
            "language": language,
        });
        if let Some(voice) = voice {
            body["voice"] = serde_json::Value::String(voice.to_string());
        }

        tracing::debug!(
            "Requesting synthesis of {} chars in '{}'",
            text.len(),
            language
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| CollaboratorError::RequestFailed {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CollaboratorError::ErrorStatus {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| CollaboratorError::RequestFailed {
                service: SERVICE,
                message: e.to_string(),
            })?;

        if bytes.is_empty() {
            return Err(CollaboratorError::InvalidResponse {
                service: SERVICE,
                message: "empty audio response".to_string(),
            });
        }

        Ok(bytes.to_vec())
    }
}
