//! Video remuxing - replaces a video's audio stream with an assembled
//! track using FFmpeg, piping raw PCM on stdin.

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use thiserror::Error;

use crate::config::RemuxSettings;
use crate::logging::JobLogger;
use crate::models::AudioTrack;

/// Errors from the remux operation. Fatal for the owning job.
#[derive(Error, Debug)]
pub enum RemuxError {
    /// The original video file does not exist.
    #[error("Video file not found: {0}")]
    SourceNotFound(String),

    /// The replacement track holds no audio.
    #[error("Replacement audio track is empty")]
    EmptyAudio,

    /// FFmpeg could not be spawned or fed.
    #[error("I/O error during remux: {0}")]
    Io(#[from] std::io::Error),

    /// FFmpeg exited non-zero (codec/container incompatibility or
    /// invalid input).
    #[error("ffmpeg failed with exit code {exit_code}: {message}")]
    CommandFailed { exit_code: i32, message: String },

    /// FFmpeg reported success but produced no output file.
    #[error("Remux produced no output: {0}")]
    MissingOutput(String),
}

/// Result of a successful remux.
#[derive(Debug, Clone)]
pub struct RemuxOutput {
    /// Path to the dubbed video artifact.
    pub output_path: PathBuf,
    /// FFmpeg exit code (always 0 on this path).
    pub exit_code: i32,
    /// The command line that was run, for logging.
    pub command: String,
}

/// Audio-replace remuxer configured from `[remux]` settings.
pub struct Remuxer {
    program: String,
    video_codec: String,
    audio_codec: String,
    audio_bitrate_kbps: u32,
}

impl Remuxer {
    pub fn new(settings: &RemuxSettings) -> Self {
        Self {
            program: "ffmpeg".to_string(),
            video_codec: settings.video_codec.clone(),
            audio_codec: settings.audio_codec.clone(),
            audio_bitrate_kbps: settings.audio_bitrate_kbps,
        }
    }

    #[cfg(test)]
    fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Replace `video`'s audio stream with `audio`, writing the result
    /// to `output_path`.
    ///
    /// The artifact's stream durations are left unclamped: a longer or
    /// shorter replacement track is muxed as-is. The video stream is
    /// re-encoded with the configured codec ("copy" passes it through).
    /// FFmpeg's stderr is streamed into the job log's tail buffer and
    /// shown on failure.
    pub fn remux(
        &self,
        video: &Path,
        audio: &AudioTrack,
        output_path: &Path,
        logger: &Arc<JobLogger>,
    ) -> Result<RemuxOutput, RemuxError> {
        if !video.exists() {
            return Err(RemuxError::SourceNotFound(video.display().to_string()));
        }
        if audio.is_empty() {
            return Err(RemuxError::EmptyAudio);
        }
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let args = self.build_args(video, audio, output_path);
        let command = format!("{} {}", self.program, args.join(" "));
        logger.clear_tail();
        logger.command(&command);
        tracing::debug!("Running remux: {}", command);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        // FFmpeg emits decode warnings on stderr while stdin is still
        // being fed; drain it concurrently so neither pipe fills up
        // and stalls the other side.
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RemuxError::CommandFailed {
                exit_code: -1,
                message: "Failed to open ffmpeg stderr".to_string(),
            })?;
        let drain_logger = Arc::clone(logger);
        let drain = std::thread::spawn(move || {
            for line in BufReader::new(stderr).lines() {
                match line {
                    Ok(line) => drain_logger.output_line(&line, true),
                    Err(_) => break,
                }
            }
        });

        // Feed the raw track; dropping the writer closes ffmpeg's stdin.
        {
            let stdin = child
                .stdin
                .take()
                .ok_or_else(|| RemuxError::CommandFailed {
                    exit_code: -1,
                    message: "Failed to open ffmpeg stdin".to_string(),
                })?;
            let mut writer = BufWriter::new(stdin);
            if let Err(e) = feed_samples(&mut writer, audio) {
                // A closed pipe means ffmpeg already exited; the exit
                // status below carries the real error.
                if e.kind() != io::ErrorKind::BrokenPipe {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RemuxError::Io(e));
                }
            }
        }

        let status = child.wait()?;
        let _ = drain.join();
        let exit_code = status.code().unwrap_or(-1);

        if exit_code != 0 {
            logger.show_tail("ffmpeg stderr");
            return Err(RemuxError::CommandFailed {
                exit_code,
                message: logger.get_tail().join("\n"),
            });
        }

        if !output_path.exists() {
            return Err(RemuxError::MissingOutput(
                output_path.display().to_string(),
            ));
        }

        Ok(RemuxOutput {
            output_path: output_path.to_path_buf(),
            exit_code,
            command,
        })
    }

    fn build_args(&self, video: &Path, audio: &AudioTrack, output_path: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-v".to_string(),
            "error".to_string(),
            "-i".to_string(),
            video.display().to_string(),
            "-f".to_string(),
            "f32le".to_string(),
            "-ar".to_string(),
            audio.sample_rate.to_string(),
            "-ac".to_string(),
            audio.channels.to_string(),
            "-i".to_string(),
            "pipe:0".to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            "1:a:0".to_string(),
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-b:a".to_string(),
            format!("{}k", self.audio_bitrate_kbps),
            output_path.display().to_string(),
        ]
    }
}

fn feed_samples(writer: &mut impl Write, audio: &AudioTrack) -> io::Result<()> {
    for sample in &audio.samples {
        writer.write_all(&sample.to_le_bytes())?;
    }
    writer.flush()
}
