//! Data models for the dubbing service.
//!
//! - Enums for the job state machine
//! - Media structures (decoded audio, speech windows)
//! - Job structures (requests, poller-visible records)

mod enums;
mod jobs;
mod media;

pub use enums::JobStage;
pub use jobs::{JobRecord, JobRequest};
pub use media::{AudioTrack, SpeechWindow};
