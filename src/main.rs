// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use kotoba_stats::app_config::{self, Config};
use kotoba_stats::app_controller::Controller;

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze every series directory under RAW_DIR
    Analyze {
        /// Directory containing one subdirectory per series
        #[arg(value_name = "RAW_DIR")]
        raw_dir: PathBuf,

        /// Output directory for statistics files
        #[arg(short, long, default_value = "stats")]
        output_dir: PathBuf,

        /// Recompute episodes that already have statistics
        #[arg(short, long)]
        force_overwrite: bool,

        /// Only process these series (directory names)
        #[arg(short, long)]
        series: Vec<String>,
    },

    /// Analyze a single subtitle file and print its statistics as JSON
    Episode {
        /// Subtitle file (.srt, .ass, .ssa or .vtt)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Rebuild series.json from existing episode statistics
    Aggregate {
        /// Directory holding <episode>.json files of one series
        #[arg(value_name = "STATS_DIR")]
        stats_dir: PathBuf,
    },

    /// Generate shell completions for kotoba-stats
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// kotoba-stats - Japanese subtitle vocabulary statistics
///
/// Reads Japanese subtitle tracks and computes vocabulary coverage,
/// JLPT and part-of-speech distributions, difficulty and reading speed.
#[derive(Parser, Debug)]
#[command(name = "kotoba-stats")]
#[command(version)]
#[command(about = "Vocabulary and difficulty statistics for Japanese subtitles")]
#[command(long_about = "kotoba-stats turns Japanese subtitle files into learner statistics.

EXAMPLES:
    kotoba-stats analyze raw/                      # Analyze every series under raw/
    kotoba-stats analyze raw/ -o out/ -f           # Recompute all episodes
    kotoba-stats analyze raw/ -s frieren           # Only one series
    kotoba-stats episode raw/frieren/1.ass         # Print one episode's statistics
    kotoba-stats aggregate out/frieren/            # Rebuild series.json after ML enrichment
    kotoba-stats completions bash > kotoba.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Load the configuration, creating a default file when missing
fn load_config(config_path: &str, cli_level: Option<&CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    // Command line log level overrides the config file
    if let Some(level) = cli_level {
        config.log_level = level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the configured level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "kotoba-stats", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Analyze {
            raw_dir,
            output_dir,
            force_overwrite,
            series,
        } => {
            let summary = controller.run_folder(&raw_dir, &output_dir, force_overwrite, &series).await?;
            if summary.series_processed == 0 {
                return Err(anyhow!("No series could be processed"));
            }
        }
        Commands::Episode { file } => {
            if !file.is_file() {
                return Err(anyhow!("Input file does not exist: {:?}", file));
            }
            match controller.analyze_file(&file).await? {
                Some(stats) => {
                    let json = serde_json::to_string_pretty(&stats)?;
                    println!("{}", json);
                }
                None => warn!("No usable text in {:?}", file),
            }
        }
        Commands::Aggregate { stats_dir } => {
            if controller.aggregate_dir(&stats_dir)?.is_none() {
                return Err(anyhow!("No episode statistics found in {:?}", stats_dir));
            }
            info!("Series statistics written to {:?}", stats_dir);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
