//! Command-line front end for the dubbing service.
//!
//! Submits a single video for dubbing and polls the job until it
//! reaches a terminal state, printing stage transitions as they occur.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _};
use clap::Parser;

use dub_core::collaborators::{HttpSynthesisClient, HttpTranscriptionClient};
use dub_core::config::ConfigManager;
use dub_core::jobs::DubService;
use dub_core::logging::{init_tracing, LogLevel};
use dub_core::models::{JobRequest, JobStage};

#[derive(Parser, Debug)]
#[command(name = "dubber", version, about = "Dub a video into another language")]
struct Cli {
    /// Video file to dub.
    input: PathBuf,

    /// Language spoken in the input video.
    #[arg(long = "from")]
    source_lang: String,

    /// Language to dub into.
    #[arg(long = "to")]
    target_lang: String,

    /// Voice to use for synthesis (overrides config).
    #[arg(long)]
    voice: Option<String>,

    /// Path to the config file.
    #[arg(long, default_value = "settings.toml")]
    config: PathBuf,

    /// Enable verbose logging.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    });

    let mut config = ConfigManager::new(&cli.config);
    config
        .load_or_create()
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    config.ensure_dirs_exist().context("creating directories")?;
    let settings = config.settings().clone();

    let timeout = Duration::from_secs(settings.collaborators.request_timeout_secs);
    let transcriber = HttpTranscriptionClient::new(&settings.collaborators.transcription_url, timeout)
        .context("building transcription client")?;
    let synthesizer = HttpSynthesisClient::new(&settings.collaborators.synthesis_url, timeout)
        .context("building synthesis client")?;

    let service = DubService::new(settings, Arc::new(transcriber), Arc::new(synthesizer));

    let job_id = service.submit(JobRequest {
        media_path: cli.input.clone(),
        source_lang: cli.source_lang,
        target_lang: cli.target_lang,
        voice: cli.voice,
    })?;
    println!("Submitted {} as {}", cli.input.display(), job_id);

    let mut last_stage: Option<JobStage> = None;
    let mut transcript_shown = false;
    loop {
        let Some(record) = service.status(&job_id) else {
            bail!("job {} disappeared from the store", job_id);
        };

        if last_stage != Some(record.stage) {
            println!("[{:>3}%] {}", record.progress, record.stage);
            last_stage = Some(record.stage);
        }
        if !transcript_shown && !record.transcription.is_empty() {
            println!("Transcript: {}", record.transcription);
            transcript_shown = true;
        }

        match record.stage {
            JobStage::Completed => {
                match record.result_path {
                    Some(path) => println!("Done: {}", path.display()),
                    None => println!("Done"),
                }
                return Ok(());
            }
            JobStage::Error => {
                bail!(
                    "job failed: {}",
                    record.error.unwrap_or_else(|| "unknown error".to_string())
                );
            }
            _ => {}
        }

        std::thread::sleep(Duration::from_millis(500));
    }
}
