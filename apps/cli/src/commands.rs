//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use coursemigrate_core::batch::{
    BatchConfig, BatchReport, FileOutcome, ProgressReporter, run_batch,
};
use coursemigrate_extract::ExtractOptions;
use coursemigrate_shared::{AppConfig, init_config, resolve_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// coursemigrate: turn an LMS wiki export into course website pages.
#[derive(Parser)]
#[command(
    name = "coursemigrate",
    version,
    about = "Migrate exported LMS wiki pages into the course website.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.coursemigrate/coursemigrate.toml.
    #[arg(long, global = true, env = "COURSEMIGRATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Regenerate every mapped page under the output directory.
    Migrate {
        /// Directory holding the exported wiki pages.
        #[arg(long, visible_alias = "canvas-dir")]
        source_dir: Option<PathBuf>,

        /// Output directory for the website modules.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Show what would be done without reading or writing any page.
        #[arg(long)]
        dry_run: bool,
    },

    /// List the page mapping in effect.
    Mapping,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so they never interleave with the console report.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "coursemigrate=error",
        1 => "coursemigrate=info",
        2 => "coursemigrate=debug",
        _ => "coursemigrate=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Migrate {
            source_dir,
            output_dir,
            dry_run,
        } => cmd_migrate(config_path, source_dir, output_dir, dry_run),
        Command::Mapping => cmd_mapping(config_path),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_migrate(
    config_path: Option<&Path>,
    source_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let table = config.mapping_table()?;
    let opts = ExtractOptions::from(&config.filters);
    let batch = BatchConfig::resolve(&config, source_dir, output_dir, dry_run);

    if !batch.source_root.is_dir() {
        return Err(eyre!(
            "source directory not found: {}",
            batch.source_root.display()
        ));
    }

    info!(
        source = %batch.source_root.display(),
        output = %batch.output_root.display(),
        pages = table.len(),
        dry_run,
        "migrating course content"
    );

    println!("=== Course Content Migration ===");
    println!("Source: {}", batch.source_root.display());
    println!("Target: {}", batch.output_root.display());
    if dry_run {
        println!();
        println!("[DRY RUN MODE - No files will be modified]");
    }
    println!();

    let reporter = CliProgress::new(table.len());
    let report = run_batch(&batch, &table, &opts, &reporter)?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!();
    println!("=== Summary ===");
    println!("✓ Processed: {}", report.processed);
    if report.skipped > 0 {
        println!("⚠ Skipped: {}", report.skipped);
    }
    println!("  Time: {:.1}s", report.elapsed.as_secs_f64());

    if report.dry_run {
        println!();
        println!("Run without --dry-run to actually create files");
    }
}

fn cmd_mapping(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let table = config.mapping_table()?;

    let mut group = None;
    for entry in &table {
        if group != Some(entry.group.as_str()) {
            println!("{}", entry.group);
            group = Some(entry.group.as_str());
        }
        println!("  {:<36} -> {}  ({})", entry.source, entry.output, entry.title);
    }
    println!();
    println!("{} page(s) mapped", table.len());
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config: AppConfig = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Console report plus an indicatif bar tracking position in the table.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }

    /// Print a report line above the bar. Still prints when the bar is hidden (not a TTY).
    fn line(&self, msg: &str) {
        self.bar.suspend(|| println!("{msg}"));
    }
}

impl ProgressReporter for CliProgress {
    fn file_started(&self, source: &str, _current: usize, _total: usize) {
        self.bar.set_message(source.to_string());
        self.line(&format!("Processing: {source}"));
    }

    fn file_finished(&self, source: &str, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Created(path) => {
                self.line(&format!("  ✓ Created: {}", path.display()));
                self.line("");
            }
            FileOutcome::WouldProcess(path) => {
                self.line(&format!("Would process: {source} -> {}", path.display()));
                self.line("");
            }
            FileOutcome::Empty => {
                self.line("  ⚠ No content extracted");
                self.line("");
            }
            FileOutcome::Failed(message) => {
                self.line(&format!("  ✗ Error: {message}"));
                self.line("");
            }
            FileOutcome::SourceMissing => {
                self.line(&format!("⚠ Source not found: {source}"));
            }
        }
        self.bar.inc(1);
    }

    fn done(&self, _report: &BatchReport) {
        self.bar.finish_and_clear();
    }
}
