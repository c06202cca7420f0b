//! Dubbing service: accepts jobs, runs them on a bounded worker pool,
//! and exposes their state for polling.
//!
//! Submission validates the request synchronously and returns a job ID
//! immediately; a fixed pool of worker threads drains a bounded queue
//! and drives each job through the standard pipeline. Stage
//! transitions flow back into the shared [`JobStore`] through the
//! pipeline's stage callback, so pollers observe progress while the
//! job is still running.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use thiserror::Error;

use super::store::JobStore;
use crate::collaborators::{SynthesisService, TranscriptionService};
use crate::config::Settings;
use crate::logging::{JobLogger, LogConfig};
use crate::models::{JobRecord, JobRequest, JobStage};
use crate::orchestrator::{
    create_standard_pipeline, CancelHandle, Context, Pipeline, PipelineError, PipelineState,
    StageEvent,
};

/// Errors rejected at submission time.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Media file not found: {0}")]
    MediaNotFound(String),

    #[error("Media file is empty: {0}")]
    EmptyMedia(String),

    #[error("Source and target languages are required")]
    MissingLanguage,

    #[error("Job queue is full")]
    QueueFull,

    #[error("Service is shut down")]
    Shutdown,

    #[error("Failed to inspect media file: {0}")]
    Io(#[from] io::Error),
}

/// Errors when fetching a finished job's artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Unknown job: {0}")]
    UnknownJob(String),

    #[error("Job is not completed (stage: {0})")]
    NotCompleted(JobStage),

    #[error("Failed to read artifact: {0}")]
    Io(#[from] io::Error),
}

/// Factory producing a fresh pipeline per job.
///
/// Injectable so tests can run the service against mock steps.
pub type PipelineFactory = Arc<dyn Fn() -> Pipeline + Send + Sync>;

/// A job waiting in the queue.
struct QueuedJob {
    id: String,
    request: JobRequest,
}

/// The dubbing service.
///
/// Owns the worker pool, the submission queue, and the job store.
/// Dropping the service shuts the pool down and joins the workers.
pub struct DubService {
    store: JobStore,
    settings: Settings,
    sender: Option<Sender<QueuedJob>>,
    workers: Vec<JoinHandle<()>>,
    cancels: Arc<Mutex<HashMap<String, CancelHandle>>>,
    next_id: AtomicU64,
}

impl DubService {
    /// Create a service running the standard dubbing pipeline.
    pub fn new(
        settings: Settings,
        transcriber: Arc<dyn TranscriptionService>,
        synthesizer: Arc<dyn SynthesisService>,
    ) -> Self {
        Self::with_pipeline_factory(
            settings,
            transcriber,
            synthesizer,
            Arc::new(create_standard_pipeline),
        )
    }

    /// Create a service with a custom pipeline factory.
    pub fn with_pipeline_factory(
        settings: Settings,
        transcriber: Arc<dyn TranscriptionService>,
        synthesizer: Arc<dyn SynthesisService>,
        factory: PipelineFactory,
    ) -> Self {
        let (sender, receiver) = bounded::<QueuedJob>(settings.jobs.queue_capacity);
        let store = JobStore::new();
        let cancels: Arc<Mutex<HashMap<String, CancelHandle>>> = Arc::new(Mutex::new(HashMap::new()));

        let worker_count = settings.jobs.max_concurrent.max(1);
        let mut workers = Vec::with_capacity(worker_count);
        for worker_index in 0..worker_count {
            let receiver: Receiver<QueuedJob> = receiver.clone();
            let store = store.clone();
            let settings = settings.clone();
            let transcriber = Arc::clone(&transcriber);
            let synthesizer = Arc::clone(&synthesizer);
            let cancels = Arc::clone(&cancels);
            let factory = Arc::clone(&factory);

            let handle = std::thread::Builder::new()
                .name(format!("dub-worker-{}", worker_index))
                .spawn(move || {
                    for job in receiver.iter() {
                        process_job(
                            job,
                            &store,
                            &settings,
                            Arc::clone(&transcriber),
                            Arc::clone(&synthesizer),
                            &cancels,
                            &factory,
                        );
                    }
                })
                .unwrap_or_else(|e| panic!("failed to spawn worker thread: {}", e));
            workers.push(handle);
        }

        Self {
            store,
            settings,
            sender: Some(sender),
            workers,
            cancels,
            next_id: AtomicU64::new(0),
        }
    }

    /// Submit a dubbing job.
    ///
    /// Validates the request, registers the job record, and enqueues
    /// the work. Returns the new job's ID.
    pub fn submit(&self, request: JobRequest) -> Result<String, UploadError> {
        let sender = self.sender.as_ref().ok_or(UploadError::Shutdown)?;

        if !request.media_path.exists() {
            return Err(UploadError::MediaNotFound(
                request.media_path.display().to_string(),
            ));
        }
        if fs::metadata(&request.media_path)?.len() == 0 {
            return Err(UploadError::EmptyMedia(
                request.media_path.display().to_string(),
            ));
        }
        if request.source_lang.is_empty() || request.target_lang.is_empty() {
            return Err(UploadError::MissingLanguage);
        }

        let id = format!("job-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.store.create(JobRecord::new(&id, &request));

        match sender.try_send(QueuedJob {
            id: id.clone(),
            request,
        }) {
            Ok(()) => Ok(id),
            Err(TrySendError::Full(_)) => {
                self.store.remove(&id);
                Err(UploadError::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => {
                self.store.remove(&id);
                Err(UploadError::Shutdown)
            }
        }
    }

    /// Get a snapshot of a job's current state.
    pub fn status(&self, job_id: &str) -> Option<JobRecord> {
        self.store.get(job_id)
    }

    /// Request cancellation of a running job.
    ///
    /// The pipeline stops at its next step boundary. Returns false if
    /// the job is not currently running.
    pub fn cancel(&self, job_id: &str) -> bool {
        match self.cancels.lock().get(job_id) {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Read a completed job's output file.
    pub fn artifact(&self, job_id: &str) -> Result<Vec<u8>, ArtifactError> {
        let record = self
            .store
            .get(job_id)
            .ok_or_else(|| ArtifactError::UnknownJob(job_id.to_string()))?;

        if record.stage != JobStage::Completed {
            return Err(ArtifactError::NotCompleted(record.stage));
        }
        let path = record
            .result_path
            .ok_or(ArtifactError::NotCompleted(JobStage::Completed))?;

        Ok(fs::read(path)?)
    }

    /// Access the underlying job store.
    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Stop accepting jobs, drain the queue, and join the workers.
    pub fn shutdown(&mut self) {
        self.sender.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for DubService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Run one job from the queue through the pipeline.
fn process_job(
    job: QueuedJob,
    store: &JobStore,
    settings: &Settings,
    transcriber: Arc<dyn TranscriptionService>,
    synthesizer: Arc<dyn SynthesisService>,
    cancels: &Arc<Mutex<HashMap<String, CancelHandle>>>,
    factory: &PipelineFactory,
) {
    let QueuedJob { id, request } = job;
    tracing::info!(job_id = %id, "Starting job");

    let work_dir = PathBuf::from(&settings.paths.temp_root).join(&id);
    if let Err(e) = fs::create_dir_all(&work_dir) {
        store.update_atomic(&id, |record| {
            record.fail(format!("Failed to create work directory: {}", e));
        });
        return;
    }

    let logger = match JobLogger::new(
        &id,
        &settings.paths.logs_folder,
        LogConfig::from(&settings.logging),
    ) {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            store.update_atomic(&id, |record| {
                record.fail(format!("Failed to create logger: {}", e));
            });
            return;
        }
    };

    let pipeline = factory();
    cancels.lock().insert(id.clone(), pipeline.cancel_handle());

    let callback_store = store.clone();
    let callback_id = id.clone();
    let callback_logger = Arc::clone(&logger);
    let ctx = Context::new(
        request,
        settings.clone(),
        id.clone(),
        work_dir.clone(),
        PathBuf::from(&settings.paths.output_folder),
        logger,
        transcriber,
        synthesizer,
    )
    .with_stage_callback(Box::new(move |event| match event {
        StageEvent::Entered(stage) => {
            callback_store.update_atomic(&callback_id, |record| {
                record.advance(stage);
            });
            if let Some(percent) = stage.progress_percent() {
                callback_logger.progress(percent);
            }
        }
        StageEvent::TranscriptReady(text) => {
            callback_store.update_atomic(&callback_id, |record| {
                record.transcription = text.clone();
            });
        }
    }));

    let mut state = PipelineState::default();
    let outcome = pipeline.run(&ctx, &mut state);

    cancels.lock().remove(&id);

    match outcome {
        Ok(_) => {
            let media_name = ctx
                .request
                .media_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| id.clone());
            let result_path = state
                .remux
                .as_ref()
                .map(|m| m.output_path.clone())
                .unwrap_or_else(|| ctx.output_dir.join(media_name));
            // Flush before the record turns terminal so pollers that
            // react to completion see the full log.
            ctx.logger.progress(100);
            ctx.logger.flush();
            store.update_atomic(&id, |record| {
                record.complete(result_path.clone());
            });
            tracing::info!(job_id = %id, "Job completed");
        }
        Err(PipelineError::Cancelled { .. }) => {
            store.update_atomic(&id, |record| {
                record.fail("cancelled");
            });
            tracing::info!(job_id = %id, "Job cancelled");
        }
        Err(PipelineError::StepFailed { source, .. }) => {
            // Surface the step's own message; the job ID and step name
            // are already visible in the record and logs.
            store.update_atomic(&id, |record| {
                record.fail(source.to_string());
            });
            tracing::warn!(job_id = %id, error = %source, "Job failed");
        }
        Err(PipelineError::SetupFailed { message, .. }) => {
            store.update_atomic(&id, |record| {
                record.fail(message.clone());
            });
            tracing::warn!(job_id = %id, "Job setup failed");
        }
    }

    // Working files are per-job scratch; nothing references them once
    // the job reaches a terminal state.
    let _ = fs::remove_dir_all(&work_dir);
}
