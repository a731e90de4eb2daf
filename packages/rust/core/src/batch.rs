//! Batch migration: mapping table → extracted, re-templated pages on disk.
//!
//! Entries are processed in table order, one at a time. A problem with one
//! file is recorded against that file and never stops the batch; only a
//! missing source root is fatal.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use coursemigrate_extract::{ExtractOptions, extract};
use coursemigrate_shared::{AppConfig, MappingEntry, MappingTable, MigrateError, Result};

use crate::render::render_page;

/// Runtime batch configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory holding the exported source pages.
    pub source_root: PathBuf,
    /// Root under which each entry's output path is resolved.
    pub output_root: PathBuf,
    /// Resolve and check paths only; read and write nothing.
    pub dry_run: bool,
}

impl BatchConfig {
    /// CLI values win over the config file's `[defaults]`.
    pub fn resolve(
        config: &AppConfig,
        source_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        dry_run: bool,
    ) -> Self {
        Self {
            source_root: source_dir.unwrap_or_else(|| PathBuf::from(&config.defaults.source_dir)),
            output_root: output_dir.unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir)),
            dry_run,
        }
    }
}

/// What happened to a single mapping entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Page written to this path.
    Created(PathBuf),
    /// Dry run: the page would be written to this path.
    WouldProcess(PathBuf),
    /// The source file does not exist.
    SourceMissing,
    /// The body held nothing worth migrating.
    Empty,
    /// Reading or writing failed.
    Failed(String),
}

impl FileOutcome {
    /// Whether this outcome counts towards the processed total (everything else is skipped).
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Created(_) | Self::WouldProcess(_))
    }
}

/// Outcome for one entry, keyed by its source file name.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub source: String,
    pub outcome: FileOutcome,
}

/// Result of a whole batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Per-entry outcomes, in table order.
    pub files: Vec<FileReport>,
    /// Pages written (or that would be written, in a dry run).
    pub processed: usize,
    /// Missing, empty or failed entries.
    pub skipped: usize,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting batch status.
pub trait ProgressReporter: Send + Sync {
    /// Called before an existing source file is read.
    fn file_started(&self, source: &str, current: usize, total: usize);
    /// Called once per entry with its outcome.
    fn file_finished(&self, source: &str, outcome: &FileOutcome);
    /// Called when the batch completes.
    fn done(&self, report: &BatchReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn file_started(&self, _source: &str, _current: usize, _total: usize) {}
    fn file_finished(&self, _source: &str, _outcome: &FileOutcome) {}
    fn done(&self, _report: &BatchReport) {}
}

/// Migrate every entry of `table`.
///
/// Fails only when the source root does not exist, before touching anything.
#[instrument(skip_all, fields(source_root = %config.source_root.display(), entries = table.len(), dry_run = config.dry_run))]
pub fn run_batch(
    config: &BatchConfig,
    table: &MappingTable,
    opts: &ExtractOptions,
    progress: &dyn ProgressReporter,
) -> Result<BatchReport> {
    let start = Instant::now();

    if !config.source_root.is_dir() {
        return Err(MigrateError::config(format!(
            "source directory not found: {}",
            config.source_root.display()
        )));
    }

    info!(output_root = %config.output_root.display(), "starting migration");

    let total = table.len();
    let mut files = Vec::with_capacity(total);

    for (i, entry) in table.iter().enumerate() {
        let source_path = config.source_root.join(&entry.source);
        let output_path = config.output_root.join(&entry.output);

        let outcome = if !source_path.exists() {
            warn!(source = %entry.source, "source not found");
            FileOutcome::SourceMissing
        } else if config.dry_run {
            FileOutcome::WouldProcess(output_path)
        } else {
            progress.file_started(&entry.source, i + 1, total);
            process_file(&source_path, &output_path, entry, opts).unwrap_or_else(|e| {
                warn!(source = %entry.source, error = %e, "migration failed, skipping file");
                FileOutcome::Failed(e.to_string())
            })
        };

        progress.file_finished(&entry.source, &outcome);
        files.push(FileReport {
            source: entry.source.clone(),
            outcome,
        });
    }

    let processed = files.iter().filter(|f| f.outcome.is_processed()).count();
    let report = BatchReport {
        skipped: files.len() - processed,
        processed,
        files,
        dry_run: config.dry_run,
        elapsed: start.elapsed(),
    };

    info!(
        processed = report.processed,
        skipped = report.skipped,
        "migration complete"
    );
    progress.done(&report);

    Ok(report)
}

/// Extract, render and write a single page.
///
/// Returns [`FileOutcome::Empty`] without writing when extraction yields nothing.
#[instrument(skip(entry, opts), fields(source = %entry.source))]
pub fn process_file(
    source_path: &Path,
    output_path: &Path,
    entry: &MappingEntry,
    opts: &ExtractOptions,
) -> Result<FileOutcome> {
    let html =
        std::fs::read_to_string(source_path).map_err(|e| MigrateError::io(source_path, e))?;

    let content = extract(&html, opts);
    if content.is_empty() {
        debug!("no content extracted");
        return Ok(FileOutcome::Empty);
    }

    let page = render_page(&entry.title, &entry.group, &content);

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MigrateError::io(parent, e))?;
    }

    std::fs::write(output_path, page).map_err(|e| MigrateError::io(output_path, e))?;
    debug!(path = %output_path.display(), "wrote page");

    Ok(FileOutcome::Created(output_path.to_path_buf()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cm-batch-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Source + output roots under a fresh temp directory.
    fn make_config(tmp: &Path, dry_run: bool) -> BatchConfig {
        let source_root = tmp.join("wiki_content");
        std::fs::create_dir_all(&source_root).unwrap();
        BatchConfig {
            source_root,
            output_root: tmp.join("modules"),
            dry_run,
        }
    }

    fn make_table() -> MappingTable {
        MappingTable::new(vec![
            MappingEntry::new("intro.html", "week-00-welcome/intro.html", "Week 0", "T"),
            MappingEntry::new("lists.html", "week-01-javascript/lists.html", "Week 1", "Lists"),
            MappingEntry::new("blank.html", "week-01-javascript/blank.html", "Week 1", "Blank"),
        ])
        .unwrap()
    }

    fn write_source(config: &BatchConfig, name: &str, html: &str) {
        std::fs::write(config.source_root.join(name), html).unwrap();
    }

    const INTRO: &str =
        r#"<html><body><p>Hello</p><a href="https://ufl.zoom.us/x">Join</a></body></html>"#;

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn file_started(&self, source: &str, current: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {source} {current}/{total}"));
        }
        fn file_finished(&self, source: &str, outcome: &FileOutcome) {
            let kind = match outcome {
                FileOutcome::Created(_) => "created",
                FileOutcome::WouldProcess(_) => "would",
                FileOutcome::SourceMissing => "missing",
                FileOutcome::Empty => "empty",
                FileOutcome::Failed(_) => "failed",
            };
            self.events.lock().unwrap().push(format!("{kind} {source}"));
        }
        fn done(&self, report: &BatchReport) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {}/{}", report.processed, report.skipped));
        }
    }

    #[test]
    fn end_to_end_minimal_document() {
        let tmp = temp_dir();
        let config = make_config(&tmp, false);
        write_source(&config, "intro.html", INTRO);

        let report =
            run_batch(&config, &make_table(), &ExtractOptions::default(), &SilentProgress).unwrap();

        let out = config.output_root.join("week-00-welcome/intro.html");
        assert_eq!(report.files[0].outcome, FileOutcome::Created(out.clone()));

        let page = std::fs::read_to_string(&out).unwrap();
        assert!(page.contains("<h1>T</h1>"));
        assert!(page.contains("<p>Hello</p>"));
        assert!(page.contains("&gt; Week 0"));
        assert!(!page.contains("zoom.us"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_sources_are_skipped_not_fatal() {
        let tmp = temp_dir();
        let config = make_config(&tmp, false);
        write_source(&config, "intro.html", INTRO);

        let report =
            run_batch(&config, &make_table(), &ExtractOptions::default(), &SilentProgress).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.files[1].outcome, FileOutcome::SourceMissing);
        assert_eq!(report.files[2].outcome, FileOutcome::SourceMissing);
        assert!(!config.output_root.join("week-01-javascript").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_extraction_is_skipped_without_output() {
        let tmp = temp_dir();
        let config = make_config(&tmp, false);
        write_source(&config, "blank.html", "<html><head><title>x</title></head><body>\n<p> </p>\n</body></html>");

        let report =
            run_batch(&config, &make_table(), &ExtractOptions::default(), &SilentProgress).unwrap();

        assert_eq!(report.files[2].outcome, FileOutcome::Empty);
        assert_eq!(report.processed, 0);
        assert!(!config.output_root.join("week-01-javascript/blank.html").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_failure_is_recorded_and_batch_continues() {
        let tmp = temp_dir();
        let config = make_config(&tmp, false);
        write_source(&config, "intro.html", INTRO);
        write_source(&config, "lists.html", "<body><ul><li>one</li></ul></body>");

        // A plain file where the Week 0 directory should go.
        std::fs::create_dir_all(&config.output_root).unwrap();
        std::fs::write(config.output_root.join("week-00-welcome"), "not a dir").unwrap();

        let report =
            run_batch(&config, &make_table(), &ExtractOptions::default(), &SilentProgress).unwrap();

        assert!(matches!(report.files[0].outcome, FileOutcome::Failed(_)));
        assert!(matches!(report.files[1].outcome, FileOutcome::Created(_)));
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 2);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let tmp = temp_dir();
        let config = make_config(&tmp, true);
        write_source(&config, "intro.html", INTRO);
        write_source(&config, "lists.html", "<body><p>x</p></body>");

        let report =
            run_batch(&config, &make_table(), &ExtractOptions::default(), &SilentProgress).unwrap();

        assert!(report.dry_run);
        assert_eq!(
            report.files[0].outcome,
            FileOutcome::WouldProcess(config.output_root.join("week-00-welcome/intro.html"))
        );
        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped, 1);
        assert!(!config.output_root.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_source_root_is_fatal() {
        let tmp = temp_dir();
        let config = BatchConfig {
            source_root: tmp.join("does-not-exist"),
            output_root: tmp.join("modules"),
            dry_run: false,
        };

        let err = run_batch(&config, &make_table(), &ExtractOptions::default(), &SilentProgress)
            .unwrap_err();
        assert!(err.to_string().contains("source directory not found"));
        assert!(!config.output_root.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rerun_regenerates_identical_pages() {
        let tmp = temp_dir();
        let config = make_config(&tmp, false);
        write_source(&config, "intro.html", INTRO);
        let out = config.output_root.join("week-00-welcome/intro.html");

        run_batch(&config, &make_table(), &ExtractOptions::default(), &SilentProgress).unwrap();
        let first = std::fs::read_to_string(&out).unwrap();
        run_batch(&config, &make_table(), &ExtractOptions::default(), &SilentProgress).unwrap();
        let second = std::fs::read_to_string(&out).unwrap();

        assert_eq!(first, second);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn progress_events_follow_table_order() {
        let tmp = temp_dir();
        let config = make_config(&tmp, false);
        write_source(&config, "intro.html", INTRO);
        write_source(&config, "blank.html", "<body></body>");

        let progress = RecordingProgress::default();
        run_batch(&config, &make_table(), &ExtractOptions::default(), &progress).unwrap();

        let events = progress.events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![
                "start intro.html 1/3",
                "created intro.html",
                "missing lists.html",
                "start blank.html 3/3",
                "empty blank.html",
                "done 1/2",
            ]
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn cli_values_override_config_defaults() {
        let app = AppConfig::default();

        let from_config = BatchConfig::resolve(&app, None, None, false);
        assert_eq!(from_config.source_root, PathBuf::from("tobeworkedon/wiki_content"));
        assert_eq!(from_config.output_root, PathBuf::from("modules"));

        let overridden =
            BatchConfig::resolve(&app, Some("export".into()), Some("site/modules".into()), true);
        assert_eq!(overridden.source_root, PathBuf::from("export"));
        assert_eq!(overridden.output_root, PathBuf::from("site/modules"));
        assert!(overridden.dry_run);
    }
}
