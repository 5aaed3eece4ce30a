// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};

use pdfsum::app_config::{self, Config, Credentials};
use pdfsum::app_controller::Controller;
use pdfsum::clipboard::SystemClipboard;
use pdfsum::document::LengthTier;
use pdfsum::file_utils::FileManager;
use pdfsum::presenter::{ExportFormat, SummaryPresenter};
use pdfsum::speech::CommandSpeechEngine;

/// CLI Wrapper for LengthTier to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLengthTier {
    Short,
    Medium,
    Long,
}

impl From<CliLengthTier> for LengthTier {
    fn from(cli_tier: CliLengthTier) -> Self {
        match cli_tier {
            CliLengthTier::Short => LengthTier::Short,
            CliLengthTier::Medium => LengthTier::Medium,
            CliLengthTier::Long => LengthTier::Long,
        }
    }
}

/// CLI Wrapper for ExportFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExportFormat {
    Txt,
    Pdf,
    Html,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(cli_format: CliExportFormat) -> Self {
        match cli_format {
            CliExportFormat::Txt => ExportFormat::Txt,
            CliExportFormat::Pdf => ExportFormat::Pdf,
            CliExportFormat::Html => ExportFormat::Html,
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

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a PDF document (default command)
    #[command(alias = "sum")]
    Summarize(SummarizeArgs),

    /// Generate shell completions for pdfsum
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct SummarizeArgs {
    /// PDF file to summarize
    #[arg(value_name = "PDF")]
    input_path: PathBuf,

    #[command(flatten)]
    options: SummaryOptions,
}

/// Options shared by the default command and `summarize`
#[derive(Args, Debug, Clone)]
struct SummaryOptions {
    /// Summary length
    #[arg(short, long, value_enum)]
    length: Option<CliLengthTier>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short = 'L', long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Write the summary in this format (repeatable)
    #[arg(short, long = "export", value_enum)]
    export: Vec<CliExportFormat>,

    /// Directory receiving exported files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Copy the summary to the clipboard
    #[arg(long)]
    copy: bool,

    /// Read the summary aloud and wait for the end (Ctrl-C stops)
    #[arg(long)]
    speak: bool,

    /// Replace the summary with the content of FILE before exporting
    #[arg(long, value_name = "FILE")]
    edit: Option<PathBuf>,
}

/// pdfsum - PDF summaries from a hosted model
///
/// Extracts the text of a PDF document and summarizes it with a hosted
/// summarization model (Hugging Face Inference API).
#[derive(Parser, Debug)]
#[command(name = "pdfsum")]
#[command(version)]
#[command(about = "Summarize PDF documents with a hosted model")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "pdfsum extracts the text of a PDF document and summarizes it with a hosted model.

EXAMPLES:
    pdfsum report.pdf                           # Summarize using default config
    pdfsum -l short report.pdf                  # Short summary
    pdfsum -e txt -e html -o out/ report.pdf    # Export as text and HTML into out/
    pdfsum --copy --speak report.pdf            # Copy to clipboard and read aloud
    pdfsum --edit notes.txt -e txt report.pdf   # Export an edited summary
    pdfsum completions bash > pdfsum.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

CREDENTIALS:
    The API key is read from the HUGGINGFACE_API_KEY environment variable and is
    never written to the configuration file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// PDF file to summarize
    #[arg(value_name = "PDF")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: SummaryOptions,
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
        // The logger itself accepts everything; `set_max_level` does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
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
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "pdfsum", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Summarize(args)) => run_summarize(args).await,
        None => {
            // Default behavior - top-level args are the summarize args
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("PDF is required when no subcommand is specified")
            })?;

            run_summarize(SummarizeArgs {
                input_path,
                options: cli.options,
            })
            .await
        }
    }
}

async fn run_summarize(args: SummarizeArgs) -> Result<()> {
    let options = args.options;

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    // Fails before any file is read when the credential is missing
    let credentials = Credentials::from_env()?;

    let mut config = load_or_create_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(output_dir) = &options.output_dir {
        config.export.output_dir = output_dir.clone();
    }

    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let tier = options.length.map(LengthTier::from).unwrap_or(config.default_length);

    let mut controller = Controller::with_credentials(&config, &credentials)?;

    let spinner = create_spinner(&format!("Summarizing {} ({})", args.input_path.display(), tier));
    let result = controller.run(&args.input_path, tier).await;
    spinner.finish_and_clear();

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            if let Some(message) = controller.ui_error() {
                error!("{}", message);
            }
            return Err(e.into());
        }
    };

    let mut presenter = SummaryPresenter::new()
        .with_clipboard(Arc::new(SystemClipboard::new()))
        .with_speech_engine(Arc::new(CommandSpeechEngine::from_config(&config.speech)))
        .on_save(|text| debug!("Summary edited ({} chars)", text.chars().count()))
        .on_speech_end(|| debug!("Speech finished"));
    presenter.show(&summary);

    if let Some(edit_path) = &options.edit {
        let edited = FileManager::read_to_string(edit_path)?;
        presenter.toggle_edit();
        presenter.set_text(edited.trim_end())?;
        presenter.save();
        info!("Summary replaced with {}", edit_path.display());
    }

    println!("{}", presenter.current_text());

    if !options.export.is_empty() {
        FileManager::ensure_dir(&config.export.output_dir)?;
    }
    for format in &options.export {
        let artifact = presenter.download((*format).into());
        let path = artifact.write_to(&config.export.output_dir)?;
        info!("Saved {} ({})", path.display(), artifact.mime_type);
    }

    if options.copy {
        match presenter.copy().await {
            Ok(()) => info!("Summary copied to clipboard"),
            Err(e) => warn!("Failed to copy summary: {}", e),
        }
    }

    if options.speak {
        speak_and_wait(&presenter).await?;
    }

    Ok(())
}

// Load the configuration file, writing the defaults when it does not exist
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        Config::from_file(config_path)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config
            .save(config_path)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        Ok(config)
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

// Play the summary and wait until it ends or Ctrl-C cancels it
async fn speak_and_wait(presenter: &SummaryPresenter) -> Result<()> {
    let mut updates = presenter.speaking_updates();
    if !presenter.toggle_speech()? {
        return Ok(());
    }
    info!("Speaking summary, press Ctrl-C to stop");

    tokio::select! {
        finished = updates.wait_for(|speaking| !*speaking) => {
            if finished.is_err() {
                debug!("Speech state channel closed");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            if presenter.is_speaking() {
                presenter.toggle_speech()?;
            }
        }
    }

    Ok(())
}
