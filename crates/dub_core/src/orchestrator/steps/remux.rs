//! Remux step: mux the assembled track back into the video.

use crate::models::JobStage;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, PipelineState};
use crate::remux::Remuxer;

/// Pipeline step that replaces the video's audio with the dubbed track.
pub struct RemuxStep;

impl PipelineStep for RemuxStep {
    fn name(&self) -> &str {
        "Remux"
    }

    fn stage(&self) -> JobStage {
        JobStage::Remuxing
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
        let assembly = state
            .assembly
            .as_ref()
            .ok_or_else(|| StepError::invalid_input("no assembled track to remux"))?;

        let stem = ctx
            .request
            .media_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let output_name = format!("{}_{}_dubbed.mp4", stem, ctx.request.target_lang);
        let output_path = ctx.output_dir.join(output_name);

        let remuxer = Remuxer::new(&ctx.settings.remux);
        let output = remuxer.remux(
            &ctx.request.media_path,
            &assembly.track,
            &output_path,
            &ctx.logger,
        )?;

        ctx.logger
            .info(&format!("Dubbed video written to {}", output.output_path.display()));

        state.remux = Some(output);
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &PipelineState) -> StepResult<()> {
        let Some(remux) = &state.remux else {
            return Err(StepError::invalid_output("remux not recorded"));
        };
        if !remux.output_path.exists() {
            return Err(StepError::invalid_output(format!(
                "output file missing: {}",
                remux.output_path.display()
            )));
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Mux the dubbed track into the video"
    }
}
