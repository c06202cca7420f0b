//! Transcribe step: send the media file to the transcription service.
//!
//! The service transcribes the original speech and translates it to
//! the target language in one call. The text is published through the
//! stage callback as soon as it arrives, so pollers can read it while
//! later steps are still running.

use crate::models::JobStage;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, PipelineState, StageEvent};

/// Pipeline step that obtains translated transcription text.
pub struct TranscribeStep;

impl PipelineStep for TranscribeStep {
    fn name(&self) -> &str {
        "Transcribe"
    }

    fn stage(&self) -> JobStage {
        JobStage::Transcribing
    }

    fn completion_stage(&self) -> Option<JobStage> {
        Some(JobStage::Transcribed)
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.request.media_path.exists() {
            return Err(StepError::invalid_input(format!(
                "media file not found: {}",
                ctx.request.media_path.display()
            )));
        }
        if ctx.request.source_lang.is_empty() || ctx.request.target_lang.is_empty() {
            return Err(StepError::invalid_input(
                "source and target languages are required",
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut PipelineState) -> StepResult<()> {
        ctx.logger.info(&format!(
            "Transcribing {} ({} -> {})",
            ctx.request.media_path.display(),
            ctx.request.source_lang,
            ctx.request.target_lang
        ));

        let text = ctx.transcriber.transcribe(
            &ctx.request.media_path,
            &ctx.request.source_lang,
            &ctx.request.target_lang,
        )?;

        if text.trim().is_empty() {
            // Silent media is not an error; synthesis will produce an
            // empty track and the original audio carries through.
            ctx.logger.warn("Transcription came back empty");
        } else {
            ctx.logger
                .info(&format!("Transcription ({} chars)", text.len()));
        }

        ctx.notify(StageEvent::TranscriptReady(text.clone()));
        state.transcription = Some(text);
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &PipelineState) -> StepResult<()> {
        if !state.has_transcription() {
            return Err(StepError::invalid_output("transcription not recorded"));
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Transcribe and translate the original speech"
    }
}
