// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use rpgtl::app_config::{self, Config, TranslationProvider};
use rpgtl::app_controller::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
    OpenAI,
    Anthropic,
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
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
    /// Translate a data folder (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for rpgtl
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Data folder holding the game's JSON files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'it', 'ja')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Log every translated unit
    #[arg(short, long)]
    verbose: bool,

    /// Write compact JSON instead of indented JSON
    #[arg(long)]
    no_format: bool,

    /// Translate map dialogue line by line, without merging and reflow
    #[arg(long)]
    no_reflow: bool,

    /// Maximum line width of map dialogue, and of common events unless
    /// --max-common-len is given
    #[arg(long)]
    max_len: Option<usize>,

    /// Maximum line width of common events
    #[arg(long)]
    max_common_len: Option<usize>,

    /// Maximum line width of two-line record fields
    #[arg(long)]
    max_record_len: Option<usize>,

    /// Retries per unit before keeping the original text
    #[arg(long)]
    max_retries: Option<u32>,
}

/// rpgtl - machine translation for RPG Maker MV data folders
///
/// Translates map dialogue, common events and database records, merging
/// multi-line message boxes and reflowing the translation to fit.
#[derive(Parser, Debug)]
#[command(name = "rpgtl")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Translate RPG Maker MV data files")]
#[command(long_about = "rpgtl translates the JSON data files of an RPG Maker MV game.

EXAMPLES:
    rpgtl data                              # Translate data/ into data_en/ using conf.json
    rpgtl -s it -t fr data                  # Italian to French
    rpgtl -p ollama -m llama3.2:3b data     # Use a local model
    rpgtl --no-reflow --max-len 40 data     # Keep dialogue line by line
    rpgtl --max-len 40 --max-common-len 50 data  # Separate common event width
    rpgtl -f data                           # Overwrite existing translations
    rpgtl completions bash > rpgtl.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file does
    not exist, a default one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Color and marker for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌"),
            Level::Warn => ("\x1B[1;33m", "🚧"),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍"),
            Level::Trace => ("\x1B[1;35m", "📋"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, marker) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the configured level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "rpgtl", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(source_language) = &options.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.verbose {
        config.verbose = true;
    }
    if options.no_format {
        config.output.pretty = false;
    }
    if options.no_reflow {
        config.layout.reflow_dialogue = false;
    }
    if let Some(max_len) = options.max_len {
        config.layout.dialogue_max_line_width = max_len;
        config.layout.common_events_max_line_width = max_len;
    }
    if let Some(max_common_len) = options.max_common_len {
        config.layout.common_events_max_line_width = max_common_len;
    }
    if let Some(max_record_len) = options.max_record_len {
        config.layout.record_max_line_width = max_record_len;
    }
    if let Some(max_retries) = options.max_retries {
        config.translation.common.retry_count = max_retries;
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_dir = options
        .input_dir
        .clone()
        .ok_or_else(|| anyhow!("INPUT_DIR is required when no subcommand is specified"))?;

    let (mut config, created) = Config::load_or_create(&options.config_path)
        .with_context(|| format!("Failed to load config file: {}", options.config_path))?;
    if created {
        warn!("Config file not found at '{}', created a default config.", options.config_path);
    }

    apply_overrides(&mut config, &options);
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    let summary = controller.run_folder(input_dir, options.force_overwrite).await?;

    info!(
        "Done! Translated {} units into {}",
        summary.translated_units,
        summary.output_dir.display()
    );

    if summary.failed_files > 0 {
        return Err(anyhow!("{} file(s) failed to translate", summary.failed_files));
    }
    Ok(())
}
