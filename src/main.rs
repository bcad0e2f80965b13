//! Application entry point — PDF Audiobook.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the command line.
//! 3. Load [`AppConfig`] (defaults when no `settings.toml` exists) and apply
//!    command-line overrides.
//! 4. Create a current-thread [`tokio`] runtime; windows run one at a time
//!    and the audio backend must stay on this thread.
//! 5. Build the loader, synthesizer and player, then run the requested mode.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use pdf_audiobook::{
    config::{AppConfig, AppPaths},
    extract::LopdfLoader,
    pipeline::{ConversionRequest, Orchestrator, PageSelection},
    playback::{Player, RodioBackend},
    tts::GoogleTtsSynthesizer,
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "pdf-audiobook", version, about = "Read PDF pages aloud")]
struct Cli {
    /// Settings file to use instead of the platform default.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert one page range (or the whole PDF) and play it.
    Convert(ConvertArgs),
    /// Convert a whole PDF in fixed-size page windows, playing each in turn.
    Batch(BatchArgs),
    /// Show or initialise the settings file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
struct SpeechArgs {
    /// Speech language code (e.g. pt, en, es).
    #[arg(long, value_name = "CODE")]
    lang: Option<String>,

    /// Stop each playback after this many seconds.
    #[arg(long, value_name = "SECS")]
    cap_secs: Option<u64>,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    pdf: PathBuf,

    /// First page to read (1-based).
    #[arg(long, value_name = "PAGE")]
    start: Option<String>,

    /// Last page to read (1-based, inclusive).
    #[arg(long, value_name = "PAGE")]
    end: Option<String>,

    /// Read the entire document; --start/--end are ignored.
    #[arg(long)]
    full: bool,

    #[command(flatten)]
    speech: SpeechArgs,
}

#[derive(Debug, Args)]
struct BatchArgs {
    pdf: PathBuf,

    /// Pages per audio file.
    #[arg(long, value_name = "N")]
    pages_per_part: Option<usize>,

    /// Directory for the audio files (default: next to the executable).
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Print the batch report as JSON.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    speech: SpeechArgs,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective settings.
    Show,
    /// Write default settings to the settings file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn settings_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| AppPaths::new().settings_file)
}

fn load_config(path: &Path) -> AppConfig {
    AppConfig::load_from(path).unwrap_or_else(|e| {
        log::warn!("Failed to load config {} ({e}); using defaults", path.display());
        AppConfig::default()
    })
}

fn apply_speech_overrides(config: &mut AppConfig, args: &SpeechArgs) {
    if let Some(lang) = &args.lang {
        config.speech.language = lang.clone();
    }
    if let Some(cap) = args.cap_secs {
        config.playback.cap_secs = cap;
    }
}

fn build_orchestrator(config: AppConfig) -> Orchestrator {
    let tts = Arc::new(GoogleTtsSynthesizer::from_config(&config.speech));
    let player = Player::new(Box::new(RodioBackend::new()), config.playback.poll_interval());
    Orchestrator::new(config, Arc::new(LopdfLoader), tts, player)
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

async fn convert(mut config: AppConfig, args: ConvertArgs) -> Result<()> {
    apply_speech_overrides(&mut config, &args.speech);

    // No page arguments at all means the whole document.
    let full = args.full || (args.start.is_none() && args.end.is_none());
    let selection = PageSelection::from_form(
        full,
        args.start.as_deref().unwrap_or_default(),
        args.end.as_deref().unwrap_or_default(),
    )?;
    let request = ConversionRequest::new(args.pdf, selection);

    let report = build_orchestrator(config).run_single(&request).await?;
    println!("{}", report.summary());
    Ok(())
}

async fn batch(mut config: AppConfig, args: BatchArgs) -> Result<()> {
    apply_speech_overrides(&mut config, &args.speech);
    if let Some(n) = args.pages_per_part {
        config.batch.pages_per_part = n;
    }
    if let Some(dir) = args.out_dir {
        config.output.batch_dir = Some(dir);
    }

    let report = build_orchestrator(config).run_batch(&args.pdf).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for window in &report.windows {
            println!("{}", window.summary());
        }
        println!(
            "{} window(s): {} played, {} without text, {} failed",
            report.windows.len(),
            report.played(),
            report.skipped(),
            report.failed()
        );
    }
    Ok(())
}

fn config_command(path: &Path, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("# {}", path.display());
            print!("{}", load_config(path).to_toml()?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            AppConfig::default()
                .save_to(path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote default settings to {}", path.display());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Command line
    let cli = Cli::parse();
    let path = settings_path(&cli);

    let command = match cli.command {
        Command::Config(command) => return config_command(&path, command),
        other => other,
    };

    // 3. Configuration
    let config = load_config(&path);
    log::debug!("Loaded settings from {}", path.display());

    // 4. Tokio runtime
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 5. Run
    rt.block_on(async move {
        match command {
            Command::Convert(args) => convert(config, args).await,
            Command::Batch(args) => batch(config, args).await,
            Command::Config(_) => Ok(()),
        }
    })
}
