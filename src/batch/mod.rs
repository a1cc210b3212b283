//! ES-008: Batch translation: discover, translate concurrently, merge, write.
//!
//! Each file is translated on its own blocking task with no shared state.
//! Results merge in completion order; `sort_by_file` makes the output
//! reproducible by sorting on the file path.

pub mod sample;

use crate::config::FailurePolicy;
use crate::core::assembler;
use crate::core::types::{FileTranslation, SequenceRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub pattern: String,
    pub failure: FailurePolicy,
    pub sort_by_file: bool,
    pub jobs: usize,
}

/// A file that could not be translated.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub translations: Vec<FileTranslation>,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// Records in output order.
    pub fn records(&self) -> Vec<SequenceRecord> {
        self.translations.iter().map(|t| t.record.clone()).collect()
    }

    /// Total instruction lines across all files.
    pub fn total_actions(&self) -> usize {
        self.translations.iter().map(|t| t.record.actions.len()).sum()
    }
}

/// List matching files directly inside `dir` (no recursion).
pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, String> {
    if !dir.is_dir() {
        return Err(format!("input directory {} does not exist", dir.display()));
    }
    let escaped = glob::Pattern::escape(&dir.display().to_string());
    let full = format!("{}/{}", escaped, pattern);
    let paths = glob::glob(&full).map_err(|e| format!("invalid pattern {}: {}", pattern, e))?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| format!("cannot read {}: {}", e.path().display(), e))?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn worker_count(jobs: usize) -> usize {
    if jobs > 0 {
        return jobs;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Translate every matching file under the configured directory.
pub fn run(cfg: &BatchConfig) -> Result<BatchReport, String> {
    let files = discover(&cfg.input_dir, &cfg.pattern)?;
    info!(
        files = files.len(),
        dir = %cfg.input_dir.display(),
        failure = %cfg.failure,
        "starting batch"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_count(cfg.jobs))
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start runtime: {}", e))?;
    runtime.block_on(translate_all(files, cfg))
}

/// Translate a known list of files.
pub async fn translate_all(files: Vec<PathBuf>, cfg: &BatchConfig) -> Result<BatchReport, String> {
    let limit = Arc::new(Semaphore::new(worker_count(cfg.jobs)));
    let mut set = JoinSet::new();

    for path in files {
        let limit = Arc::clone(&limit);
        set.spawn(async move {
            let _permit = limit
                .acquire_owned()
                .await
                .map_err(|e| format!("worker pool closed: {}", e))?;
            let file = path.display().to_string();
            let outcome = tokio::task::spawn_blocking(move || assembler::translate_file(&path))
                .await
                .map_err(|e| format!("worker for {} failed: {}", file, e))?;
            Ok::<_, String>((file, outcome))
        });
    }

    let mut report = BatchReport::default();
    while let Some(joined) = set.join_next().await {
        let (file, outcome) = joined.map_err(|e| format!("worker join error: {}", e))??;
        match outcome {
            Ok(translation) => {
                debug!(file = %file, actions = translation.record.actions.len(), "file done");
                report.translations.push(translation);
            }
            Err(e) => match cfg.failure {
                FailurePolicy::StopOnFirst => {
                    set.abort_all();
                    return Err(e.to_string());
                }
                FailurePolicy::ContinueIndependent => {
                    warn!(file = %file, error = %e, "skipping file");
                    report.failures.push(FileFailure {
                        file,
                        error: e.to_string(),
                    });
                }
            },
        }
    }

    if cfg.sort_by_file {
        report
            .translations
            .sort_by(|a, b| a.record.file.cmp(&b.record.file));
        report.failures.sort_by(|a, b| a.file.cmp(&b.file));
    }

    info!(
        translated = report.translations.len(),
        failed = report.failures.len(),
        actions = report.total_actions(),
        "batch complete"
    );
    Ok(report)
}

/// Write records as a pretty JSON array atomically (write to temp, then rename).
pub fn write_records(path: &Path, records: &[SequenceRecord]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("cannot create dir {}: {}", parent.display(), e))?;
        }
    }

    let json = serde_json::to_string_pretty(records)
        .map_err(|e| format!("JSON serialize error: {}", e))?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json)
        .map_err(|e| format!("cannot write {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        format!(
            "cannot rename {} → {}: {}",
            tmp_path.display(),
            path.display(),
            e
        )
    })?;
    Ok(())
}
