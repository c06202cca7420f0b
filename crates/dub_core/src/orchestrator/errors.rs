//! Error types for the orchestrator pipeline.
//!
//! Errors carry context that chains through layers:
//! Job → Step → Operation → Detail

use std::io;

use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::assembly::AssemblyError;
use crate::collaborators::CollaboratorError;
use crate::remux::RemuxError;

/// Top-level pipeline error with job context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during execution.
    #[error("Job '{job_name}' failed at step '{step_name}': {source}")]
    StepFailed {
        job_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Pipeline was cancelled.
    #[error("Job '{job_name}' was cancelled")]
    Cancelled { job_name: String },

    /// Failed to set up job (create directories, etc.).
    #[error("Job '{job_name}' setup failed: {message}")]
    SetupFailed { job_name: String, message: String },
}

impl PipelineError {
    /// Create a step failed error.
    pub fn step_failed(
        job_name: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            job_name: job_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    /// Create a cancelled error.
    pub fn cancelled(job_name: impl Into<String>) -> Self {
        Self::Cancelled {
            job_name: job_name.into(),
        }
    }

    /// Create a setup failed error.
    pub fn setup_failed(job_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            job_name: job_name.into(),
            message: message.into(),
        }
    }
}

/// Error from a pipeline step with operation context.
#[derive(Error, Debug)]
pub enum StepError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    /// A collaborator service call failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// Audio decode or probe failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Track assembly failed.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Remux failed.
    #[error(transparent)]
    Remux(#[from] RemuxError),

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// Generic step error with message.
    #[error("{0}")]
    Other(String),
}

impl StepError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }

    /// Create a generic error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_error_displays_context() {
        let err = StepError::io_error(
            "write speech audio",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("write speech audio"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn pipeline_error_chains_context() {
        let step_err = StepError::invalid_input("media file missing");
        let pipeline_err = PipelineError::step_failed("job-7", "Transcribe", step_err);

        let msg = pipeline_err.to_string();
        assert!(msg.contains("job-7"));
        assert!(msg.contains("Transcribe"));
        assert!(msg.contains("media file missing"));
    }

    #[test]
    fn collaborator_error_surfaces_verbatim() {
        let collab = CollaboratorError::ErrorStatus {
            service: "transcription service",
            status: 503,
            body: "overloaded".to_string(),
        };
        let expected = collab.to_string();
        let step_err: StepError = collab.into();
        assert_eq!(step_err.to_string(), expected);
    }
}
