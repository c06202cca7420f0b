//! Pipeline orchestrator for coordinating job execution.
//!
//! This module provides the infrastructure for running multi-step
//! dubbing pipelines. Each job consists of a sequence of steps that
//! validate, execute, and record their results.
//!
//! # Architecture
//!
//! ```text
//! Pipeline
//!     ├── Step: Transcribe
//!     ├── Step: Synthesize
//!     ├── Step: Assemble
//!     └── Step: Remux
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dub_core::orchestrator::{create_standard_pipeline, Context, PipelineState};
//!
//! let pipeline = create_standard_pipeline();
//!
//! let ctx = Context::new(
//!     request, settings, "job-1", work_dir, output_dir,
//!     logger, transcriber, synthesizer,
//! );
//! let mut state = PipelineState::default();
//!
//! let result = pipeline.run(&ctx, &mut state)?;
//! println!("Completed: {:?}", result.steps_completed);
//! ```

mod errors;
mod pipeline;
mod step;
pub mod steps;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{CancelHandle, Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use steps::{AssembleStep, RemuxStep, SynthesizeStep, TranscribeStep};
pub use types::{
    AssemblyOutput, Context, PipelineState, StageCallback, StageEvent, SynthesisOutput,
};

/// Create a standard pipeline with all steps in the correct order.
///
/// The standard pipeline executes these steps:
/// 1. Transcribe - transcribe and translate the original speech
/// 2. Synthesize - synthesize translated speech audio
/// 3. Assemble - build the dubbed audio track
/// 4. Remux - mux the dubbed track into the video
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(TranscribeStep)
        .with_step(SynthesizeStep)
        .with_step(AssembleStep)
        .with_step(RemuxStep)
}
