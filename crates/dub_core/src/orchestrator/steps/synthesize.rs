//! Synthesize step: turn the translated text into speech audio.
//!
//! The synthesis service returns encoded audio bytes which are written
//! to the job's working directory for the assemble step to decode.

use std::fs;

use crate::models::JobStage;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, PipelineState, SynthesisOutput};

/// Pipeline step that synthesizes translated speech.
pub struct SynthesizeStep;

impl PipelineStep for SynthesizeStep {
    fn name(&self) -> &str {
        "Synthesize"
    }

    fn stage(&self) -> JobStage {
        JobStage::Synthesizing
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut PipelineState) -> StepResult<()> {
        let text = state
            .transcription
            .as_ref()
            .ok_or_else(|| StepError::invalid_input("no transcription to synthesize"))?;

        // Sentence punctuation and line breaks trip up some TTS
        // backends; flatten to a single run of words.
        let normalized = text.replace('\n', " ").replace(". ", " ");

        let voice = ctx
            .request
            .voice
            .as_deref()
            .or(ctx.settings.collaborators.voice.as_deref());

        ctx.logger.info(&format!(
            "Synthesizing {} chars in '{}'",
            normalized.len(),
            ctx.request.target_lang
        ));

        let audio = ctx
            .synthesizer
            .synthesize(&normalized, &ctx.request.target_lang, voice)?;

        fs::create_dir_all(&ctx.work_dir)
            .map_err(|e| StepError::io_error("create work directory", e))?;
        let speech_path = ctx.work_dir.join("speech.wav");
        fs::write(&speech_path, &audio)
            .map_err(|e| StepError::io_error("write synthesized speech", e))?;

        ctx.logger.info(&format!(
            "Wrote {} bytes to {}",
            audio.len(),
            speech_path.display()
        ));

        state.synthesis = Some(SynthesisOutput { speech_path });
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &PipelineState) -> StepResult<()> {
        let Some(synthesis) = &state.synthesis else {
            return Err(StepError::invalid_output("synthesis not recorded"));
        };
        if !synthesis.speech_path.exists() {
            return Err(StepError::invalid_output(format!(
                "speech file missing: {}",
                synthesis.speech_path.display()
            )));
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Synthesize translated speech audio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::test_support::test_context;
    use tempfile::tempdir;

    #[test]
    fn writes_speech_file_from_transcription() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path());

        let mut state = PipelineState::default();
        state.transcription = Some("uno dos tres".to_string());

        let step = SynthesizeStep;
        step.execute(&ctx, &mut state).unwrap();
        step.validate_output(&ctx, &state).unwrap();

        let synthesis = state.synthesis.unwrap();
        assert!(synthesis.speech_path.exists());
        assert!(fs::read(&synthesis.speech_path).unwrap().len() > 0);
    }

    #[test]
    fn missing_transcription_is_invalid_input() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path());

        let mut state = PipelineState::default();
        let step = SynthesizeStep;
        let err = step.execute(&ctx, &mut state).unwrap_err();
        assert!(matches!(err, StepError::InvalidInput(_)));
    }
}
