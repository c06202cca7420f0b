//! Pipeline runner that executes steps in sequence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::errors::{PipelineError, PipelineResult};
use super::step::PipelineStep;
use super::types::{Context, PipelineState, StageEvent};

/// Pipeline that runs a sequence of steps.
///
/// The pipeline executes steps in order, running validation before
/// and after each step. It handles cancellation, announces stage
/// transitions, and tracks which steps were executed.
pub struct Pipeline {
    /// Steps to execute in order.
    steps: Vec<Box<dyn PipelineStep>>,
    /// Cancellation flag.
    cancelled: Arc<AtomicBool>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Add a step to the pipeline.
    pub fn add_step<S: PipelineStep + 'static>(&mut self, step: S) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add a step (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.add_step(step);
        self
    }

    /// Get a cancellation handle.
    ///
    /// Call `cancel()` on the returned handle to stop the pipeline
    /// at the next step boundary.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// Check if pipeline has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Run the pipeline with the given context and state.
    ///
    /// Executes each step in order:
    /// 1. Check for cancellation
    /// 2. Announce the step's stage
    /// 3. Run `validate_input`
    /// 4. Run `execute`
    /// 5. Run `validate_output`
    /// 6. Announce the step's completion stage (if it has one)
    ///
    /// Returns which steps ran on success, or a `PipelineError` on failure.
    pub fn run(&self, ctx: &Context, state: &mut PipelineState) -> PipelineResult<PipelineRunResult> {
        let mut result = PipelineRunResult {
            steps_completed: Vec::new(),
        };

        for step in self.steps.iter() {
            // Check for cancellation
            if self.is_cancelled() {
                ctx.logger
                    .warn(&format!("Pipeline cancelled before step '{}'", step.name()));
                return Err(PipelineError::cancelled(&ctx.job_id));
            }

            let step_name = step.name();
            ctx.notify(StageEvent::Entered(step.stage()));
            ctx.logger.phase(step_name);

            // Validate input
            ctx.logger
                .debug(&format!("Validating input for '{}'", step_name));
            if let Err(e) = step.validate_input(ctx) {
                ctx.logger.error(&format!("Input validation failed: {}", e));
                return Err(PipelineError::step_failed(&ctx.job_id, step_name, e));
            }

            // Execute
            ctx.logger.debug(&format!("Executing '{}'", step_name));
            step.execute(ctx, state).map_err(|e| {
                ctx.logger.error(&format!("Execution failed: {}", e));
                PipelineError::step_failed(&ctx.job_id, step_name, e)
            })?;

            // Validate output
            ctx.logger
                .debug(&format!("Validating output for '{}'", step_name));
            if let Err(e) = step.validate_output(ctx, state) {
                ctx.logger.error(&format!("Output validation failed: {}", e));
                return Err(PipelineError::step_failed(&ctx.job_id, step_name, e));
            }

            if let Some(stage) = step.completion_stage() {
                ctx.notify(StageEvent::Entered(stage));
            }

            ctx.logger.success(&format!("{} completed", step_name));
            result.steps_completed.push(step_name.to_string());
        }

        ctx.logger.success("Pipeline completed successfully");

        Ok(result)
    }

    /// Get the number of steps in the pipeline.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for cancelling a running pipeline.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Cancel the pipeline.
    ///
    /// The pipeline will stop at the next step boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRunResult {
    /// Steps that completed successfully.
    pub steps_completed: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::errors::{StepError, StepResult};
    use crate::orchestrator::test_support::test_context;
    use crate::models::JobStage;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tempfile::tempdir;

    // Mock step for testing
    struct CountingStep {
        name: &'static str,
        stage: JobStage,
        execute_count: Arc<AtomicUsize>,
        fail: bool,
    }

    impl PipelineStep for CountingStep {
        fn name(&self) -> &str {
            self.name
        }

        fn stage(&self) -> JobStage {
            self.stage
        }

        fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut PipelineState) -> StepResult<()> {
            self.execute_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StepError::other("mock failure"))
            } else {
                Ok(())
            }
        }

        fn validate_output(&self, _ctx: &Context, _state: &PipelineState) -> StepResult<()> {
            Ok(())
        }
    }

    fn counting_step(name: &'static str, stage: JobStage, fail: bool) -> (CountingStep, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        (
            CountingStep {
                name,
                stage,
                execute_count: Arc::clone(&count),
                fail,
            },
            count,
        )
    }

    #[test]
    fn pipeline_builds_correctly() {
        let (s1, _) = counting_step("Step1", JobStage::Transcribing, false);
        let (s2, _) = counting_step("Step2", JobStage::Synthesizing, false);
        let pipeline = Pipeline::new().with_step(s1).with_step(s2);

        assert_eq!(pipeline.step_count(), 2);
        assert_eq!(pipeline.step_names(), vec!["Step1", "Step2"]);
    }

    #[test]
    fn runs_steps_in_order_and_announces_stages() {
        let dir = tempdir().unwrap();
        let (s1, c1) = counting_step("Step1", JobStage::Transcribing, false);
        let (s2, c2) = counting_step("Step2", JobStage::Synthesizing, false);
        let pipeline = Pipeline::new().with_step(s1).with_step(s2);

        let seen: Arc<Mutex<Vec<JobStage>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let ctx = test_context(dir.path()).with_stage_callback(Box::new(move |event| {
            if let StageEvent::Entered(stage) = event {
                seen_clone.lock().push(stage);
            }
        }));

        let mut state = PipelineState::default();
        let result = pipeline.run(&ctx, &mut state).unwrap();

        assert_eq!(result.steps_completed, vec!["Step1", "Step2"]);
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
        assert_eq!(
            *seen.lock(),
            vec![JobStage::Transcribing, JobStage::Synthesizing]
        );
    }

    #[test]
    fn failing_step_halts_pipeline() {
        let dir = tempdir().unwrap();
        let (s1, c1) = counting_step("Step1", JobStage::Transcribing, true);
        let (s2, c2) = counting_step("Step2", JobStage::Synthesizing, false);
        let pipeline = Pipeline::new().with_step(s1).with_step(s2);

        let ctx = test_context(dir.path());
        let mut state = PipelineState::default();
        let err = pipeline.run(&ctx, &mut state).unwrap_err();

        assert!(matches!(err, PipelineError::StepFailed { .. }));
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancelled_pipeline_stops_before_next_step() {
        let dir = tempdir().unwrap();
        let (s1, c1) = counting_step("Step1", JobStage::Transcribing, false);
        let pipeline = Pipeline::new().with_step(s1);

        pipeline.cancel_handle().cancel();

        let ctx = test_context(dir.path());
        let mut state = PipelineState::default();
        let err = pipeline.run(&ctx, &mut state).unwrap_err();

        assert!(matches!(err, PipelineError::Cancelled { .. }));
        assert_eq!(c1.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_handle_works() {
        let pipeline = Pipeline::new();
        let handle = pipeline.cancel_handle();

        assert!(!pipeline.is_cancelled());
        assert!(!handle.is_cancelled());

        handle.cancel();

        assert!(pipeline.is_cancelled());
        assert!(handle.is_cancelled());
    }
}
