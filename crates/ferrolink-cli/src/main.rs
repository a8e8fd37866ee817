//! FerroLink - Idempotent hard-link directory mirroring
//!
//! Mirrors source trees into destination trees made of hard links and keeps
//! an append-only history so that every source file is linked exactly once.

mod display;
mod json_output;
mod progress;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use ferrolink_config::{Config, ConfigLoader, ConfigResult, LoggingConfig};
use ferrolink_sync::{HistoryStore, SyncEngine, SyncOptions};
use ferrolink_types::{RunSummary, SyncPair, ThreadCount};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// Every pair and every file was processed
const EXIT_CLEAN: u8 = 0;
/// The run completed but some files or pairs failed
const EXIT_FAILURES: u8 = 1;
/// The run could not complete
const EXIT_FATAL: u8 = 2;

/// FerroLink - Idempotent hard-link directory mirroring
#[derive(Parser)]
#[command(
    name = "ferrolink",
    version = env!("CARGO_PKG_VERSION"),
    about = "Idempotent hard-link directory mirroring",
    long_about = "FerroLink mirrors source directory trees into destination trees made of\n\
                  hard links. An append-only history log records every linked source file,\n\
                  so repeated runs only link what is new."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror every configured pair
    Run {
        /// Dry run - show what would be linked
        #[arg(long)]
        dry_run: bool,
        /// Number of link workers per pair
        #[arg(short, long)]
        workers: Option<usize>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mirror a single pair without a configuration file
    Link {
        /// Source directory
        source: PathBuf,
        /// Destination directory
        destination: PathBuf,
        /// History log path
        #[arg(long)]
        history: PathBuf,
        /// Dry run - show what would be linked
        #[arg(long)]
        dry_run: bool,
        /// Number of link workers
        #[arg(short, long)]
        workers: Option<usize>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect the history log
    History {
        /// List every recorded source path
        #[arg(long)]
        list: bool,
        /// History log to inspect instead of the configured one
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current configuration
    Show {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
    /// Write an example configuration file
    Init {
        /// Where to write the file; the extension selects the format
        path: PathBuf,
        /// Overwrite without asking
        #[arg(long)]
        force: bool,
    },
    /// Check a configuration file
    Validate {
        /// Configuration file to check
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(code) => code,
        Err(error) => {
            display::display_error(&format!("{:#}", error));
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn execute(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref());
    let logging = config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_logging(cli.debug, cli.quiet, cli.verbose, &logging)?;
    if !logging.colored_output {
        console::set_colors_enabled(false);
    }

    info!("FerroLink v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run {
            dry_run,
            workers,
            json,
        } => {
            let config = config.context("Failed to load configuration")?;
            run_command(&config, dry_run, workers, json, cli.quiet)
        }
        Commands::Link {
            source,
            destination,
            history,
            dry_run,
            workers,
            json,
        } => link_command(
            SyncPair::new(source, destination),
            &history,
            dry_run,
            workers,
            json,
            cli.quiet,
        ),
        Commands::History { list, file } => {
            let history_file = match file {
                Some(file) => file,
                None => {
                    config
                        .context("Failed to load configuration")?
                        .history_file
                }
            };
            history_command(&history_file, list)
        }
        Commands::Config { action } => config_command(action, config),
    }
}

fn load_config(path: Option<&Path>) -> ConfigResult<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load_default(),
    }
}

fn init_logging(
    debug: bool,
    quiet: bool,
    verbose: bool,
    logging: &LoggingConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log filter")?;

    let (writer, guard) = match &logging.log_file {
        Some(log_file) => {
            let directory = log_file
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = log_file
                .file_name()
                .with_context(|| format!("Invalid log file: {}", log_file.display()))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };
    let ansi = logging.colored_output && logging.log_file.is_none();

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if logging.json_format {
        registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()
    };
    installed.context("Failed to initialize logging")?;

    Ok(guard)
}

fn sync_options(dry_run: bool, workers: Option<usize>, configured: ThreadCount) -> Result<SyncOptions> {
    let link_workers = match workers {
        Some(count) => ThreadCount::new(count).map_err(anyhow::Error::msg)?,
        None => configured,
    };
    Ok(SyncOptions {
        dry_run,
        link_workers,
    })
}

fn run_command(
    config: &Config,
    dry_run: bool,
    workers: Option<usize>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode> {
    let options = sync_options(dry_run, workers, config.performance.link_workers)?;
    let pairs = config.sync_pairs();

    if !quiet && !json {
        println!(
            "{} Mirroring {} pairs, history in {}",
            style("→").green().bold(),
            pairs.len(),
            style(config.history_file.display()).cyan()
        );
    }

    execute_sync(
        "run",
        &pairs,
        &config.history_file,
        options,
        json,
        quiet,
    )
}

fn link_command(
    pair: SyncPair,
    history_file: &Path,
    dry_run: bool,
    workers: Option<usize>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode> {
    let options = sync_options(dry_run, workers, ThreadCount::default())?;

    if !quiet && !json {
        println!(
            "{} Linking {} into {}",
            style("→").green().bold(),
            style(pair.source_directory.display()).cyan(),
            style(pair.destination_directory.display()).cyan()
        );
    }

    execute_sync("link", &[pair], history_file, options, json, quiet)
}

fn execute_sync(
    operation: &str,
    pairs: &[SyncPair],
    history_file: &Path,
    options: SyncOptions,
    json: bool,
    quiet: bool,
) -> Result<ExitCode> {
    if options.dry_run && !quiet && !json {
        display::display_info("Dry run mode - no links will be created");
    }

    let reporter = progress::SpinnerReporter::new(quiet || json);
    let result = SyncEngine::with_options(options).run_with_reporter(pairs, history_file, &reporter);

    let (summary, fatal) = match result {
        Ok(summary) => (summary, None),
        Err(aborted) => (aborted.summary, Some(aborted.error)),
    };

    if json {
        let output =
            json_output::SyncResultJson::new(operation, history_file, &summary, fatal.as_ref());
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if !quiet {
            display::display_summary(&summary);
        }
        match &fatal {
            Some(error) => display::display_error(&format!("Run aborted: {}", error)),
            None if quiet => {}
            None if summary.is_clean() => display::display_success("Sync completed"),
            None => display::display_warning("Sync completed with failures"),
        }
    }

    Ok(ExitCode::from(exit_status(&summary, fatal.is_some())))
}

fn exit_status(summary: &RunSummary, aborted: bool) -> u8 {
    if aborted {
        EXIT_FATAL
    } else if summary.is_clean() {
        EXIT_CLEAN
    } else {
        EXIT_FAILURES
    }
}

fn history_command(history_file: &Path, list: bool) -> Result<ExitCode> {
    let history = HistoryStore::new(history_file).load()?;

    println!(
        "{} {} entries in {}",
        style("≡").blue().bold(),
        style(history.len()).green(),
        style(history_file.display()).cyan()
    );

    if list {
        let mut entries: Vec<&Path> = history.iter().collect();
        entries.sort();
        for entry in entries {
            println!("  {}", entry.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn config_command(action: ConfigAction, loaded: ConfigResult<Config>) -> Result<ExitCode> {
    match action {
        ConfigAction::Show { default } => {
            if default {
                println!("{} Default configuration:", style("⚙").blue().bold());
                print!("{}", serde_yaml::to_string(&Config::default())?);
            } else {
                match loaded {
                    Ok(config) => {
                        println!("{} Current configuration:", style("⚙").blue().bold());
                        print!("{}", serde_yaml::to_string(&config)?);
                    }
                    Err(error) => {
                        display::display_warning(&format!("No usable configuration: {}", error));
                        return Ok(ExitCode::from(EXIT_FAILURES));
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                let overwrite = dialoguer::Confirm::new()
                    .with_prompt(format!("{} already exists. Overwrite?", path.display()))
                    .default(false)
                    .interact()?;
                if !overwrite {
                    display::display_warning("Configuration left unchanged");
                    return Ok(ExitCode::SUCCESS);
                }
            }

            ConfigLoader::generate_default_config(&path)?;
            display::display_success(&format!("Wrote example configuration to {}", path.display()));
            Ok(ExitCode::SUCCESS)
        }
        ConfigAction::Validate { path } => match ConfigLoader::validate_file(&path) {
            Ok(()) => {
                display::display_success(&format!("{} is valid", path.display()));
                Ok(ExitCode::SUCCESS)
            }
            Err(error) => {
                display::display_error(&format!("{}: {}", path.display(), error));
                Ok(ExitCode::from(EXIT_FAILURES))
            }
        },
    }
}
