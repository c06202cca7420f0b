//! Core types for the orchestrator pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use crate::collaborators::{SynthesisService, TranscriptionService};
use crate::config::Settings;
use crate::logging::JobLogger;
use crate::models::{AudioTrack, JobRequest, JobStage, SpeechWindow};
use crate::remux::RemuxOutput;

/// Event emitted by the pipeline as a job moves through its stages.
#[derive(Debug, Clone)]
pub enum StageEvent {
    /// The job entered a new stage.
    Entered(JobStage),
    /// The transcription text became available.
    TranscriptReady(String),
}

/// Callback type for observing stage events.
pub type StageCallback = Box<dyn Fn(StageEvent) + Send + Sync>;

/// Read-only context passed to pipeline steps.
///
/// Contains job configuration and shared resources that steps can read
/// but not modify. Mutable state goes in `PipelineState`.
pub struct Context {
    /// The dubbing request (media path, languages, voice).
    pub request: JobRequest,
    /// Application settings.
    pub settings: Settings,
    /// Job identifier.
    pub job_id: String,
    /// Job-specific working directory (under temp_root).
    pub work_dir: PathBuf,
    /// Output directory for the final dubbed file.
    pub output_dir: PathBuf,
    /// Per-job logger.
    pub logger: Arc<JobLogger>,
    /// Transcription/translation service.
    pub transcriber: Arc<dyn TranscriptionService>,
    /// Speech synthesis service.
    pub synthesizer: Arc<dyn SynthesisService>,
    /// Optional stage event callback.
    stage_callback: Option<StageCallback>,
}

impl Context {
    /// Create a new context for a job.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        request: JobRequest,
        settings: Settings,
        job_id: impl Into<String>,
        work_dir: PathBuf,
        output_dir: PathBuf,
        logger: Arc<JobLogger>,
        transcriber: Arc<dyn TranscriptionService>,
        synthesizer: Arc<dyn SynthesisService>,
    ) -> Self {
        Self {
            request,
            settings,
            job_id: job_id.into(),
            work_dir,
            output_dir,
            logger,
            transcriber,
            synthesizer,
            stage_callback: None,
        }
    }

    /// Set the stage event callback.
    pub fn with_stage_callback(mut self, callback: StageCallback) -> Self {
        self.stage_callback = Some(callback);
        self
    }

    /// Notify the callback of a stage event (if set).
    pub fn notify(&self, event: StageEvent) {
        if let Some(ref callback) = self.stage_callback {
            callback(event);
        }
    }
}

/// Mutable job state that accumulates results from pipeline steps.
///
/// Steps add new data but do not overwrite earlier sections.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    /// Transcribed and translated text (from Transcribe step).
    pub transcription: Option<String>,
    /// Synthesis results (from Synthesize step).
    pub synthesis: Option<SynthesisOutput>,
    /// Assembly results (from Assemble step).
    pub assembly: Option<AssemblyOutput>,
    /// Remux results (from Remux step).
    pub remux: Option<RemuxOutput>,
}

impl PipelineState {
    /// Check if transcription has been recorded.
    pub fn has_transcription(&self) -> bool {
        self.transcription.is_some()
    }

    /// Check if synthesis has been completed.
    pub fn has_synthesis(&self) -> bool {
        self.synthesis.is_some()
    }

    /// Check if the dubbed track has been assembled.
    pub fn has_assembly(&self) -> bool {
        self.assembly.is_some()
    }
}

/// Output from the Synthesize step.
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    /// Path to the synthesized speech audio file.
    pub speech_path: PathBuf,
}

/// Output from the Assemble step.
#[derive(Debug, Clone)]
pub struct AssemblyOutput {
    /// The fully assembled dubbed audio track.
    pub track: AudioTrack,
    /// Speech window detected in the original audio.
    pub window: SpeechWindow,
    /// Stretch factor applied to the translated speech.
    pub stretch_factor: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_state_tracks_completion() {
        let mut state = PipelineState::default();
        assert!(!state.has_transcription());
        assert!(!state.has_synthesis());

        state.transcription = Some("hola mundo".to_string());
        state.synthesis = Some(SynthesisOutput {
            speech_path: PathBuf::from("/tmp/speech.wav"),
        });

        assert!(state.has_transcription());
        assert!(state.has_synthesis());
        assert!(!state.has_assembly());
    }
}
