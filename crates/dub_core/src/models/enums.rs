//! Core enums used throughout the dubbing service.

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a dubbing job.
///
/// Jobs move strictly forward through the stages; `Error` is reachable
/// from every non-terminal stage. `Completed` and `Error` are terminal
/// and have no outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    /// Media accepted, waiting for a worker.
    Uploaded,
    /// Transcription/translation collaborator call in flight.
    Transcribing,
    /// Translated transcript stored.
    Transcribed,
    /// Speech synthesis collaborator call in flight.
    Synthesizing,
    /// Silence analysis, stretch and concatenation running.
    Assembling,
    /// Dubbed track being muxed back onto the video.
    Remuxing,
    /// Final artifact available.
    Completed,
    /// Job failed; see the record's error field.
    Error,
}

impl JobStage {
    /// Fixed progress percent reported on entering this stage.
    ///
    /// `Error` has no percent of its own - a failed job keeps the last
    /// value it reached. Progress is informational only.
    pub fn progress_percent(&self) -> Option<u32> {
        match self {
            JobStage::Uploaded => Some(10),
            JobStage::Transcribing => Some(30),
            JobStage::Transcribed => Some(40),
            JobStage::Synthesizing => Some(50),
            JobStage::Assembling => Some(70),
            JobStage::Remuxing => Some(90),
            JobStage::Completed => Some(100),
            JobStage::Error => None,
        }
    }

    /// Whether this stage accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStage::Completed | JobStage::Error)
    }

    /// Check whether moving to `next` is a documented transition.
    pub fn can_transition_to(&self, next: JobStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == JobStage::Error {
            return true;
        }
        matches!(
            (self, next),
            (JobStage::Uploaded, JobStage::Transcribing)
                | (JobStage::Transcribing, JobStage::Transcribed)
                | (JobStage::Transcribed, JobStage::Synthesizing)
                | (JobStage::Synthesizing, JobStage::Assembling)
                | (JobStage::Assembling, JobStage::Remuxing)
                | (JobStage::Remuxing, JobStage::Completed)
        )
    }

    /// Display string for status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Uploaded => "uploaded",
            JobStage::Transcribing => "transcribing",
            JobStage::Transcribed => "transcribed",
            JobStage::Synthesizing => "synthesizing",
            JobStage::Assembling => "assembling",
            JobStage::Remuxing => "remuxing",
            JobStage::Completed => "completed",
            JobStage::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_follow_documented_order() {
        let order = [
            JobStage::Uploaded,
            JobStage::Transcribing,
            JobStage::Transcribed,
            JobStage::Synthesizing,
            JobStage::Assembling,
            JobStage::Remuxing,
            JobStage::Completed,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
        // Skipping a stage is not allowed
        assert!(!JobStage::Uploaded.can_transition_to(JobStage::Synthesizing));
        assert!(!JobStage::Transcribing.can_transition_to(JobStage::Remuxing));
    }

    #[test]
    fn error_reachable_from_all_non_terminal_stages() {
        for stage in [
            JobStage::Uploaded,
            JobStage::Transcribing,
            JobStage::Transcribed,
            JobStage::Synthesizing,
            JobStage::Assembling,
            JobStage::Remuxing,
        ] {
            assert!(stage.can_transition_to(JobStage::Error));
        }
    }

    #[test]
    fn terminal_stages_have_no_outgoing_transitions() {
        for terminal in [JobStage::Completed, JobStage::Error] {
            for next in [
                JobStage::Uploaded,
                JobStage::Transcribing,
                JobStage::Completed,
                JobStage::Error,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn progress_is_monotonic_over_the_happy_path() {
        let percents: Vec<u32> = [
            JobStage::Uploaded,
            JobStage::Transcribing,
            JobStage::Transcribed,
            JobStage::Synthesizing,
            JobStage::Assembling,
            JobStage::Remuxing,
            JobStage::Completed,
        ]
        .iter()
        .map(|s| s.progress_percent().unwrap())
        .collect();

        for pair in percents.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(percents.last(), Some(&100));
    }
}
