// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use captionsmith::app_config::{Config, LogLevel};
use captionsmith::app_controller::{Controller, ItemOutcome};
use captionsmith::formats::OutputFormat;
use captionsmith::output::ExistsPolicy;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Lrc,
    Srt,
    Vtt,
    Txt,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Lrc => OutputFormat::Lrc,
            CliOutputFormat::Srt => OutputFormat::Srt,
            CliOutputFormat::Vtt => OutputFormat::Vtt,
            CliOutputFormat::Txt => OutputFormat::Txt,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI Wrapper for ExistsPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliExistsPolicy {
    Skip,
    Overwrite,
    Rename,
}

impl From<CliExistsPolicy> for ExistsPolicy {
    fn from(cli_policy: CliExistsPolicy) -> Self {
        match cli_policy {
            CliExistsPolicy::Skip => ExistsPolicy::Skip,
            CliExistsPolicy::Overwrite => ExistsPolicy::Overwrite,
            CliExistsPolicy::Rename => ExistsPolicy::Rename,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Options shared by every processing command
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Path to the configuration file, created with defaults when missing
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Source language code (ISO 639-1 or 639-2), detected when omitted
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code; enables translation
    #[arg(short, long)]
    target_language: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// What to do when the output file already exists
    #[arg(short, long, value_enum)]
    exists: Option<CliExistsPolicy>,

    /// Add the language code to output file names
    #[arg(long)]
    suffix: bool,

    /// Write the transcription next to the translation
    #[arg(long)]
    export_all: bool,

    /// whisper model name
    #[arg(short, long)]
    model: Option<String>,

    /// Device used by whisper (cpu or cuda)
    #[arg(long)]
    device: Option<String>,

    /// Log level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct TranscribeArgs {
    /// Media file or directory searched recursively
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Only pick up files with this extension
    #[arg(long)]
    source_type: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// whisper-style JSON transcript
    #[arg(value_name = "TRANSCRIPT_JSON")]
    transcript_path: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe media files and write caption artifacts (default command)
    Transcribe(TranscribeArgs),

    /// Write caption artifacts from an existing transcript
    Render(RenderArgs),

    /// Generate shell completions for captionsmith
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
#[command(name = "captionsmith")]
#[command(version)]
#[command(about = "Turns speech transcriptions into lyric, subtitle and caption files")]
#[command(long_about = "captionsmith transcribes media files with whisper, optionally translates them \
through a local Ollama server, and writes LRC, SRT, WebVTT, TXT or JSON files next to the media.

Examples:
  captionsmith ./music -f lrc
  captionsmith transcribe talk.mp4 -f srt -s en -t fr --suffix --export-all
  captionsmith render talk.json -f vtt -e rename")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Media file or directory searched recursively
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Only pick up files with this extension
    #[arg(long)]
    source_type: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // Filtering happens through log::set_max_level so the level can change later
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => "✅",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info by default, adjusted once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "captionsmith", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Transcribe(args)) => run_transcribe(args).await,
        Some(Commands::Render(args)) => run_render(args),
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_transcribe(TranscribeArgs {
                input_path,
                source_type: cli.source_type,
                common: cli.common,
            })
            .await
        }
    }
}

/// Loads the config file and applies command line overrides
fn load_config(options: &CommonArgs) -> Result<Config> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let (mut config, created) = Config::load_or_create(&options.config_path)?;
    if created {
        warn!("Config file not found at {:?}, created default config.", options.config_path);
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = Some(source_lang.clone());
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = Some(target_lang.clone());
    }
    if let Some(format) = &options.format {
        config.output.format = format.clone().into();
    }
    if let Some(exists) = &options.exists {
        config.output.exists = exists.clone().into();
    }
    if options.suffix {
        config.output.language_suffix = true;
    }
    if options.export_all {
        config.output.export_all = true;
    }
    if let Some(model) = &options.model {
        config.recognition.model = model.clone();
    }
    if let Some(device) = &options.device {
        config.recognition.device = Some(device.clone());
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

async fn run_transcribe(options: TranscribeArgs) -> Result<()> {
    let config = load_config(&options.common)?;
    let controller = Controller::with_config(config)?;

    let cancel = controller.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current file");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let input_path = &options.input_path;
    if input_path.is_file() && options.source_type.is_none() {
        return match controller.run(input_path).await? {
            ItemOutcome::Failed(message) => Err(anyhow!("Processing failed for {:?}: {}", input_path, message)),
            _ => Ok(()),
        };
    }

    if !input_path.exists() {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    let summary = controller.run_folder(input_path, options.source_type.as_deref()).await?;
    if summary.cancelled {
        warn!("Stopped early: {} of the files were handled", summary.total());
    }
    if summary.failed > 0 {
        return Err(anyhow!("{} file(s) failed", summary.failed));
    }

    Ok(())
}

fn run_render(options: RenderArgs) -> Result<()> {
    let config = load_config(&options.common)?;
    let controller = Controller::with_config(config)?;

    let transcript_path: &Path = &options.transcript_path;
    match controller.render_transcript(transcript_path) {
        ItemOutcome::Written(paths) => {
            info!("Rendered {} artifact(s) from {:?}", paths.len(), transcript_path);
            Ok(())
        }
        ItemOutcome::Skipped(path) => {
            info!("Nothing written, {:?} already exists", path);
            Ok(())
        }
        ItemOutcome::Failed(message) => Err(anyhow!("Rendering failed for {:?}: {}", transcript_path, message)),
    }
}
