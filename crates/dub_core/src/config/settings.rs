//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML
//! tables. Each section can be updated independently for atomic
//! section-level updates.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Speech-window detection and stretch bounds.
    #[serde(default)]
    pub sync: SyncSettings,

    /// Collaborator service endpoints.
    #[serde(default)]
    pub collaborators: CollaboratorSettings,

    /// Remux encoding settings.
    #[serde(default)]
    pub remux: RemuxSettings,

    /// Worker pool and queue settings.
    #[serde(default)]
    pub jobs: JobSettings,
}

/// Path configuration for output, temp, and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Output folder for dubbed videos.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Root folder for per-job working files.
    #[serde(default = "default_temp_root")]
    pub temp_root: String,

    /// Folder for per-job log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_output_folder() -> String {
    "translated_videos".to_string()
}

fn default_temp_root() -> String {
    ".work".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            temp_root: default_temp_root(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Use compact log format (filter progress lines).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Number of command-output lines kept for error diagnosis.
    #[serde(default = "default_error_tail")]
    pub error_tail: usize,

    /// Prefix log lines with timestamps.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> usize {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            progress_step: default_progress_step(),
            error_tail: default_error_tail(),
            show_timestamps: true,
        }
    }
}

/// Speech-window detection and duration synchronization parameters.
///
/// Not mutated after a job starts. The defaults are the only
/// documented bounds; per-call overrides are deliberately not offered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Lower bound for the stretch factor.
    #[serde(default = "default_min_stretch")]
    pub min_stretch_factor: f64,

    /// Upper bound for the stretch factor.
    #[serde(default = "default_max_stretch")]
    pub max_stretch_factor: f64,

    /// Silence threshold, in dB below the track's overall dBFS.
    #[serde(default = "default_threshold_offset")]
    pub silence_threshold_offset_db: f64,

    /// Minimum silence length that separates speech runs.
    #[serde(default = "default_min_silence")]
    pub min_silence_ms: u64,

    /// Speech runs shorter than this are treated as stray noise and do
    /// not anchor the speech window.
    #[serde(default = "default_min_speech_run")]
    pub min_speech_run_ms: u64,

    /// Crossfade applied at the two splice points.
    #[serde(default = "default_crossfade")]
    pub crossfade_ms: u64,
}

fn default_min_stretch() -> f64 {
    0.9
}

fn default_max_stretch() -> f64 {
    1.1
}

fn default_threshold_offset() -> f64 {
    14.0
}

fn default_min_silence() -> u64 {
    500
}

fn default_min_speech_run() -> u64 {
    50
}

fn default_crossfade() -> u64 {
    30
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            min_stretch_factor: default_min_stretch(),
            max_stretch_factor: default_max_stretch(),
            silence_threshold_offset_db: default_threshold_offset(),
            min_silence_ms: default_min_silence(),
            min_speech_run_ms: default_min_speech_run(),
            crossfade_ms: default_crossfade(),
        }
    }
}

/// Collaborator service endpoints and call limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorSettings {
    /// Transcription/translation service endpoint.
    #[serde(default = "default_transcription_url")]
    pub transcription_url: String,

    /// Speech synthesis service endpoint.
    #[serde(default = "default_synthesis_url")]
    pub synthesis_url: String,

    /// Per-request timeout for collaborator calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Default voice parameter for synthesis (request may override).
    #[serde(default)]
    pub voice: Option<String>,
}

fn default_transcription_url() -> String {
    "http://localhost:5000/transcribe".to_string()
}

fn default_synthesis_url() -> String {
    "http://localhost:5003/synthesize".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for CollaboratorSettings {
    fn default() -> Self {
        Self {
            transcription_url: default_transcription_url(),
            synthesis_url: default_synthesis_url(),
            request_timeout_secs: default_request_timeout(),
            voice: None,
        }
    }
}

/// Remux encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemuxSettings {
    /// Video codec ("copy" passes the stream through).
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// Audio codec for the dubbed track.
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate in kbit/s.
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate_kbps: u32,
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_bitrate() -> u32 {
    192
}

impl Default for RemuxSettings {
    fn default() -> Self {
        Self {
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            audio_bitrate_kbps: default_audio_bitrate(),
        }
    }
}

/// Worker pool and submission queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSettings {
    /// Number of jobs processed concurrently.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Submissions accepted beyond the in-flight jobs before the
    /// queue rejects new work.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_max_concurrent() -> usize {
    2
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Logging,
    Sync,
    Collaborators,
    Remux,
    Jobs,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Sync => "sync",
            ConfigSection::Collaborators => "collaborators",
            ConfigSection::Remux => "remux",
            ConfigSection::Jobs => "jobs",
        }
    }

    /// All sections in file order.
    pub fn all() -> &'static [ConfigSection] {
        &[
            ConfigSection::Paths,
            ConfigSection::Logging,
            ConfigSection::Sync,
            ConfigSection::Collaborators,
            ConfigSection::Remux,
            ConfigSection::Jobs,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[sync]"));
        assert!(toml.contains("min_stretch_factor"));
        assert!(toml.contains("[collaborators]"));
    }

    #[test]
    fn settings_round_trip() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.paths.output_folder, settings.paths.output_folder);
        assert_eq!(parsed.sync.min_stretch_factor, 0.9);
        assert_eq!(parsed.sync.max_stretch_factor, 1.1);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[sync]\nmax_stretch_factor = 1.2";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        // Custom value preserved
        assert_eq!(parsed.sync.max_stretch_factor, 1.2);
        // Defaults applied for missing
        assert_eq!(parsed.sync.min_stretch_factor, 0.9);
        assert_eq!(parsed.sync.min_silence_ms, 500);
        assert_eq!(parsed.sync.min_speech_run_ms, 50);
        assert_eq!(parsed.jobs.max_concurrent, 2);
        assert_eq!(parsed.collaborators.request_timeout_secs, 120);
    }

    #[test]
    fn section_names_match_tables() {
        let toml = toml::to_string_pretty(&Settings::default()).unwrap();
        for section in ConfigSection::all() {
            assert!(
                toml.contains(&format!("[{}]", section.table_name())),
                "missing table {}",
                section.table_name()
            );
        }
    }
}
