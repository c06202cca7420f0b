//! Pipeline step trait definition.
//!
//! All pipeline steps implement this trait, providing a consistent
//! interface for validation and execution.

use super::errors::StepResult;
use super::types::{Context, PipelineState};
use crate::models::JobStage;

/// Trait for pipeline steps.
///
/// Each step in the pipeline implements this trait. The pipeline runner
/// calls these methods in order:
///
/// 1. `validate_input` - Check preconditions before execution
/// 2. `execute` - Perform the step's work
/// 3. `validate_output` - Verify the step produced valid output
///
/// # Example
///
/// ```ignore
/// struct TranscribeStep;
///
/// impl PipelineStep for TranscribeStep {
///     fn name(&self) -> &str { "Transcribe" }
///
///     fn stage(&self) -> JobStage { JobStage::Transcribing }
///
///     fn validate_input(&self, ctx: &Context) -> StepResult<()> {
///         if !ctx.request.media_path.exists() {
///             return Err(StepError::invalid_input("media file missing"));
///         }
///         Ok(())
///     }
///
///     fn execute(&self, ctx: &Context, state: &mut PipelineState) -> StepResult<()> {
///         // Call the transcription service...
///         state.transcription = Some(text);
///         Ok(())
///     }
///
///     fn validate_output(&self, _ctx: &Context, state: &PipelineState) -> StepResult<()> {
///         if !state.has_transcription() {
///             return Err(StepError::invalid_output("transcription not recorded"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait PipelineStep: Send + Sync {
    /// Get the step name (for logging and error context).
    fn name(&self) -> &str;

    /// The job stage this step runs under.
    ///
    /// The pipeline announces this stage before the step executes.
    fn stage(&self) -> JobStage;

    /// The stage the job enters when this step completes, if any.
    ///
    /// Most steps have none (the next step's `stage()` takes over);
    /// steps whose completion is itself an observable state return it.
    fn completion_stage(&self) -> Option<JobStage> {
        None
    }

    /// Validate inputs before execution.
    ///
    /// Called before `execute`. Should check that all required
    /// preconditions are met (files exist, previous steps completed, etc.).
    fn validate_input(&self, ctx: &Context) -> StepResult<()>;

    /// Execute the step's main work.
    ///
    /// Should perform the step's processing and record results in `state`.
    /// Use `ctx.logger` for logging.
    fn execute(&self, ctx: &Context, state: &mut PipelineState) -> StepResult<()>;

    /// Validate outputs after execution.
    ///
    /// Called after `execute` succeeds. Should verify that the step
    /// produced valid output (files exist, state populated, etc.).
    fn validate_output(&self, ctx: &Context, state: &PipelineState) -> StepResult<()>;

    /// Human-readable description of what this step does.
    fn description(&self) -> &str {
        self.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStep {
        name: &'static str,
    }

    impl PipelineStep for MockStep {
        fn name(&self) -> &str {
            self.name
        }

        fn stage(&self) -> JobStage {
            JobStage::Transcribing
        }

        fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut PipelineState) -> StepResult<()> {
            Ok(())
        }

        fn validate_output(&self, _ctx: &Context, _state: &PipelineState) -> StepResult<()> {
            Ok(())
        }
    }

    #[test]
    fn step_trait_object_works() {
        let step: Box<dyn PipelineStep> = Box::new(MockStep { name: "TestStep" });

        assert_eq!(step.name(), "TestStep");
        assert_eq!(step.stage(), JobStage::Transcribing);
        assert!(step.completion_stage().is_none());
    }
}
