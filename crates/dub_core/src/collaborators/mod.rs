//! External collaborator interfaces.
//!
//! The core treats transcription/translation and speech synthesis as
//! black boxes behind traits, with HTTP clients as the production
//! implementations. Tests substitute mocks.

mod synthesis;
mod transcription;

pub use synthesis::HttpSynthesisClient;
pub use transcription::HttpTranscriptionClient;

use std::path::Path;

use thiserror::Error;

/// Failure talking to an external collaborator service. Surfaced
/// verbatim in the failed job's error field.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// Transport-level failure (connect, timeout, I/O).
    #[error("{service} request failed: {message}")]
    RequestFailed { service: &'static str, message: String },

    /// The service answered with a non-success status.
    #[error("{service} returned status {status}: {body}")]
    ErrorStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The service answered 2xx but the body was not usable.
    #[error("Invalid {service} response: {message}")]
    InvalidResponse { service: &'static str, message: String },
}

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Transcribes and translates a media file's speech.
///
/// Whether translation happens in one hop or via an intermediate
/// language is the collaborator's business.
pub trait TranscriptionService: Send + Sync {
    /// Return the translated transcript of `media`'s audio.
    fn transcribe(
        &self,
        media: &Path,
        source_lang: &str,
        target_lang: &str,
    ) -> CollaboratorResult<String>;
}

/// Synthesizes speech audio from text.
pub trait SynthesisService: Send + Sync {
    /// Return the synthesized speech as an encoded audio asset
    /// (i.e. the bytes of a playable audio file).
    fn synthesize(
        &self,
        text: &str,
        language: &str,
        voice: Option<&str>,
    ) -> CollaboratorResult<Vec<u8>>;
}
