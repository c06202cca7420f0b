//! HTTP client for the transcription/translation service.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

use super::{CollaboratorError, CollaboratorResult, TranscriptionService};

const SERVICE: &str = "transcription service";

/// Client posting the media file as multipart form data and expecting
/// a JSON body with a `transcription` field.
pub struct HttpTranscriptionClient {
    client: Client,
    endpoint: String,
}

impl HttpTranscriptionClient {
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

impl TranscriptionService for HttpTranscriptionClient {
    fn transcribe(
        &self,
        media: &Path,
        source_lang: &str,
        target_lang: &str,
    ) -> CollaboratorResult<String> {
        let bytes = std::fs::read(media).map_err(|e| CollaboratorError::RequestFailed {
            service: SERVICE,
            message: format!("failed to read {}: {}", media.display(), e),
        })?;

        let file_name = media
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "media".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| CollaboratorError::RequestFailed {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let form = Form::new()
            .part("file", part)
            .text("source_lang", source_lang.to_string())
            .text("target_lang", target_lang.to_string());

        tracing::debug!(
            "Requesting transcription of {} ({} -> {})",
            media.display(),
            source_lang,
            target_lang
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
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

        let json: serde_json::Value =
            response
                .json()
                .map_err(|e| CollaboratorError::InvalidResponse {
                    service: SERVICE,
                    message: e.to_string(),
                })?;

        json.get("transcription")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
            .ok_or_else(|| CollaboratorError::InvalidResponse {
                service: SERVICE,
                message: "missing 'transcription' field".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_media_file_is_a_request_failure() {
        let client =
            HttpTranscriptionClient::new("http://localhost:1/transcribe", Duration::from_secs(1))
                .unwrap();
        let result = client.transcribe(Path::new("/nonexistent/clip.mp4"), "en", "es");
        assert!(matches!(
            result,
            Err(CollaboratorError::RequestFailed { .. })
        ));
    }

    #[test]
    fn error_messages_name_the_service() {
        let err = CollaboratorError::ErrorStatus {
            service: SERVICE,
            status: 500,
            body: "model not loaded".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("transcription service"));
        assert!(msg.contains("500"));
        assert!(msg.contains("model not loaded"));
    }
}
