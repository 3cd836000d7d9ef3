//! Emanet - Turkish to French subtitle workflow
//!
//! Entry point of the command line tool: downloads YouTube videos,
//! transcribes them with whisper, translates with ollama and writes SRT files.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use emanet::cli::{Args, Commands};
use emanet::config::Config;
use emanet::progress::{ConsoleProgress, LogProgress, ProgressReporter};
use emanet::setup::SetupManager;
use emanet::workflow::{display_path, format_elapsed, parse_locator_list, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Keep the guard alive for the duration of the program
    let _guard = setup_logging(args.verbose)?;
    info!("Starting Emanet - Turkish to French subtitle workflow");

    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Process { url, output_dir, whisper_model, translation_model, play } => {
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if let Some(model) = whisper_model {
                config.transcriber.model = model;
            }
            if let Some(model) = translation_model {
                config.translate.model = model;
            }

            let workflow = Workflow::new(config)?.with_progress(progress_reporter());
            let outcome = workflow.process_video(&url).await?;
            let srt_path = &outcome.report.subtitle_path;

            println!("\nSubtitles: {}", display_path(srt_path).display());
            println!("Entries: {} ({} translated, {} tagged [{}], {} dropped)",
                outcome.report.entries,
                outcome.report.translated,
                outcome.report.fallbacks.len(),
                workflow.config().languages.fallback_tag(),
                outcome.report.dropped);
            println!("Done in {}", format_elapsed(outcome.elapsed));

            if play {
                workflow.play(&url, srt_path).await?;
            }
        }
        Commands::Batch { input, output_dir, pause } => {
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if let Some(pause) = pause {
                config.batch.pause_secs = pause;
            }

            let content = std::fs::read_to_string(&input)?;
            let locators = parse_locator_list(&content);
            if locators.is_empty() {
                println!("No video URLs found in {}", input.display());
                println!("Add one YouTube URL per line, for example:");
                println!("https://www.youtube.com/watch?v=ABC123  # Episode 1");
                return Ok(());
            }

            let workflow = Workflow::new(config)?.with_progress(Box::new(LogProgress));
            let summary = workflow.process_batch(&locators).await;

            println!("\n=== Summary ===");
            println!("Succeeded: {}", summary.successful.len());
            for (_, outcome) in &summary.successful {
                println!("  {} ({})",
                    display_path(&outcome.report.subtitle_path).display(),
                    format_elapsed(outcome.elapsed));
            }
            println!("Failed: {}", summary.failed.len());
            for (locator, error) in &summary.failed {
                println!("  {} [{}]: {}", locator, error.stage(), error);
            }
            println!("\nSubtitles are in: {}", display_path(&workflow.config().output.dir).display());
        }
        Commands::Subtitle { input, output } => {
            info!("Building subtitles from transcript: {}", input.display());
            let workflow = Workflow::new(config)?.with_progress(progress_reporter());
            let report = workflow.subtitle_transcript(&input, &output).await?;
            println!("Wrote {} entries to {} ({} tagged [{}])",
                report.entries, output.display(), report.fallbacks.len(),
                workflow.config().languages.fallback_tag());
        }
        Commands::Transcribe { input, output } => {
            info!("Transcribing audio: {}", input.display());
            let workflow = Workflow::new(config)?;
            let count = workflow.transcribe_file(&input, &output).await?;
            println!("Wrote {} segments to {}", count, output.display());
        }
        Commands::Play { url, subtitles } => {
            let workflow = Workflow::new(config)?;
            workflow.play(&url, &subtitles).await?;
        }
        Commands::Check => {
            let statuses = SetupManager::new(&config).check_installation().await?;

            println!("\n{:<30} {:<10} {}", "Component", "Status", "Detail");
            println!("{}", "-".repeat(70));
            for status in &statuses {
                let mark = if status.available { "ok" } else { "missing" };
                println!("{:<30} {:<10} {}", status.name, mark, status.detail);
            }

            if statuses.iter().all(|s| s.available) {
                println!("\nEverything is installed.");
            } else {
                println!("\nSome components are missing, see above.");
            }
        }
        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
            }
            config.save_to_file(&output)?;
            println!("Wrote configuration to {}", output.display());
        }
    }

    info!("Emanet finished successfully");
    Ok(())
}

/// Progress bar on a terminal, log lines otherwise
fn progress_reporter() -> Box<dyn ProgressReporter> {
    if std::io::stderr().is_terminal() {
        Box::new(ConsoleProgress::new())
    } else {
        Box::new(LogProgress)
    }
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = std::env::current_dir()?.join(".emanet").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation
    let file_appender = rolling::daily(&log_dir, "emanet.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("emanet.log").display());

    Ok(guard)
}
