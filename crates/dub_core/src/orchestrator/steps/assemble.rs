//! Assemble step: build the dubbed audio track.
//!
//! Decodes the original audio, locates its speech window, conforms the
//! synthesized speech to the original format, stretches it toward the
//! window's duration, and splices intro + speech + outro together.

use crate::analysis::{decode_audio, find_speech_window};
use crate::assembly::assemble;
use crate::models::JobStage;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{AssemblyOutput, Context, PipelineState};
use crate::sync::compute_stretch_factor;

/// Pipeline step that assembles the dubbed audio track.
pub struct AssembleStep;

impl PipelineStep for AssembleStep {
    fn name(&self) -> &str {
        "Assemble"
    }

    fn stage(&self) -> JobStage {
        JobStage::Assembling
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.request.media_path.exists() {
            return Err(StepError::invalid_input(format!(
                "media file not found: {}",
                ctx.request.media_path.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut PipelineState) -> StepResult<()> {
        let speech_path = state
            .synthesis
            .as_ref()
            .map(|s| s.speech_path.clone())
            .ok_or_else(|| StepError::invalid_input("no synthesized speech to assemble"))?;

        let sync = &ctx.settings.sync;

        ctx.logger.section("Speech analysis");
        let original = decode_audio(&ctx.request.media_path, None, None)?;
        ctx.logger.info(&format!(
            "Original audio: {} ms, {} Hz, {} ch",
            original.duration_ms(),
            original.sample_rate,
            original.channels
        ));

        let window = find_speech_window(
            &original,
            sync.min_silence_ms,
            sync.min_speech_run_ms,
            sync.silence_threshold_offset_db,
        );
        ctx.logger
            .info(&format!("Speech window: {}", window));

        let intro = original.slice_ms(0, window.start_ms);
        let outro = original.slice_ms(window.end_ms, original.duration_ms());

        // Conform the synthesized speech to the original's format so
        // the three segments splice cleanly.
        let translated = decode_audio(
            &speech_path,
            Some(original.sample_rate),
            Some(original.channels),
        )?;

        ctx.logger.section("Assembly");
        let factor = compute_stretch_factor(
            window.duration_ms(),
            translated.duration_ms(),
            sync.min_stretch_factor,
            sync.max_stretch_factor,
        );
        ctx.logger.info(&format!(
            "Stretch factor {:.3} (window {} ms, translated {} ms)",
            factor,
            window.duration_ms(),
            translated.duration_ms()
        ));

        let track = assemble(&intro, &translated, &outro, factor, sync.crossfade_ms)?;
        ctx.logger
            .info(&format!("Assembled track: {} ms", track.duration_ms()));

        state.assembly = Some(AssemblyOutput {
            track,
            window,
            stretch_factor: factor,
        });
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &PipelineState) -> StepResult<()> {
        let Some(assembly) = &state.assembly else {
            return Err(StepError::invalid_output("assembly not recorded"));
        };
        if assembly.track.is_empty() {
            return Err(StepError::invalid_output("assembled track is empty"));
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Assemble the dubbed audio track"
    }
}
