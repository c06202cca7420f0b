//! Job management: the shared job store and the dubbing service.

mod runner;
mod store;

pub use runner::{ArtifactError, DubService, PipelineFactory, UploadError};
pub use store::JobStore;
