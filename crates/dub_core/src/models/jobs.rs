//! Job request and record structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::enums::JobStage;

/// A dubbing request as accepted at the submission boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    /// Path to the uploaded video file.
    pub media_path: PathBuf,
    /// Spoken language of the source audio (e.g. "en").
    pub source_lang: String,
    /// Language to dub into (e.g. "es").
    pub target_lang: String,
    /// Optional voice parameter forwarded to the synthesis collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

/// One end-to-end dubbing job, as visible to status pollers.
///
/// Records live in the job store and are only ever mutated through
/// `JobStore::update_atomic`, so a poller can never observe a stage
/// without its matching progress value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Opaque unique identifier, immutable after creation.
    pub id: String,
    /// File name of the submitted media (for display).
    pub media_name: String,
    /// Source language of the request.
    pub source_lang: String,
    /// Target language of the request.
    pub target_lang: String,
    /// Current stage in the state machine.
    pub stage: JobStage,
    /// Percent complete; monotonically non-decreasing while not failed.
    pub progress: u32,
    /// Translated transcript; empty until transcription completes.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transcription: String,
    /// Final dubbed video artifact; set on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_path: Option<PathBuf>,
    /// Failure description; set only on transition to `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the job was created (RFC 3339).
    pub created_at: String,
    /// When the record last changed (RFC 3339).
    pub updated_at: String,
}

impl JobRecord {
    /// Create a fresh record in the `Uploaded` stage.
    pub fn new(id: impl Into<String>, request: &JobRequest) -> Self {
        let now = chrono::Local::now().to_rfc3339();
        let media_name = request
            .media_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| request.media_path.display().to_string());
        Self {
            id: id.into(),
            media_name,
            source_lang: request.source_lang.clone(),
            target_lang: request.target_lang.clone(),
            stage: JobStage::Uploaded,
            progress: JobStage::Uploaded.progress_percent().unwrap_or(0),
            transcription: String::new(),
            result_path: None,
            error: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Advance to the next stage if the transition is legal.
    ///
    /// Progress is bumped to the stage's fixed percent (never lowered).
    /// Returns false and leaves the record untouched for an illegal
    /// transition, including any transition out of a terminal stage.
    pub fn advance(&mut self, next: JobStage) -> bool {
        if !self.stage.can_transition_to(next) {
            return false;
        }
        self.stage = next;
        if let Some(percent) = next.progress_percent() {
            self.progress = self.progress.max(percent);
        }
        self.touch();
        true
    }

    /// Move the record to `Error`, freezing progress at its last value.
    ///
    /// No-op if the job is already terminal.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.stage.is_terminal() {
            return;
        }
        self.stage = JobStage::Error;
        self.error = Some(message.into());
        self.touch();
    }

    /// Record the final artifact and move to `Completed`.
    pub fn complete(&mut self, result_path: PathBuf) -> bool {
        if !self.advance(JobStage::Completed) {
            return false;
        }
        self.result_path = Some(result_path);
        true
    }

    /// Whether the job reached a terminal stage.
    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Local::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JobRequest {
        JobRequest {
            media_path: PathBuf::from("/videos/talk.mp4"),
            source_lang: "en".to_string(),
            target_lang: "es".to_string(),
            voice: None,
        }
    }

    #[test]
    fn new_record_starts_uploaded() {
        let record = JobRecord::new("job-1", &request());
        assert_eq!(record.stage, JobStage::Uploaded);
        assert_eq!(record.progress, 10);
        assert_eq!(record.media_name, "talk.mp4");
        assert!(record.transcription.is_empty());
        assert!(record.result_path.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn advance_walks_the_happy_path() {
        let mut record = JobRecord::new("job-2", &request());
        assert!(record.advance(JobStage::Transcribing));
        assert_eq!(record.progress, 30);
        assert!(record.advance(JobStage::Transcribed));
        assert!(record.advance(JobStage::Synthesizing));
        assert!(record.advance(JobStage::Assembling));
        assert!(record.advance(JobStage::Remuxing));
        assert!(record.complete(PathBuf::from("/out/talk_es_dubbed.mp4")));
        assert_eq!(record.stage, JobStage::Completed);
        assert_eq!(record.progress, 100);
    }

    #[test]
    fn advance_rejects_stage_skips() {
        let mut record = JobRecord::new("job-3", &request());
        assert!(!record.advance(JobStage::Remuxing));
        assert_eq!(record.stage, JobStage::Uploaded);
        assert_eq!(record.progress, 10);
    }

    #[test]
    fn fail_freezes_progress() {
        let mut record = JobRecord::new("job-4", &request());
        record.advance(JobStage::Transcribing);
        record.fail("transcription service unavailable");
        assert_eq!(record.stage, JobStage::Error);
        assert_eq!(record.progress, 30);
        assert_eq!(
            record.error.as_deref(),
            Some("transcription service unavailable")
        );
    }

    #[test]
    fn terminal_records_are_immutable() {
        let mut record = JobRecord::new("job-5", &request());
        record.fail("boom");
        let before = record.clone();

        assert!(!record.advance(JobStage::Transcribing));
        record.fail("second failure");
        assert_eq!(record.stage, before.stage);
        assert_eq!(record.error, before.error);
        assert_eq!(record.progress, before.progress);
    }

    #[test]
    fn record_serializes_for_pollers() {
        let record = JobRecord::new("job-6", &request());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"id\":\"job-6\""));
        assert!(json.contains("\"stage\":\"uploaded\""));
        // Empty transcription and unset options are omitted
        assert!(!json.contains("transcription"));
        assert!(!json.contains("result_path"));
    }
}
