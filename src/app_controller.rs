use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::file_utils::{DocumentFamily, FileManager};
use crate::language_utils;
use crate::providers::{self, Translator};
use crate::translation::{AnomalyLog, DocumentWalker, LogEntry, RetryPolicy, TranslationClient, TranslationTally};

// @module: Application controller for data folder translation

/// Name of the anomaly report written into the output folder
pub const ISSUES_LOG_FILE: &str = "rpgtl.issues.log";

/// Why a file was not translated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The output file already exists
    AlreadyTranslated,
    /// The file holds no player-facing text
    NotTranslatable,
}

/// Result of processing one input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Translated { units: usize },
    Skipped(SkipReason),
}

/// Totals of a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub translated_files: usize,
    pub skipped_files: usize,
    pub failed_files: usize,
    /// Units translated across all files
    pub translated_units: usize,
    /// Anomalies captured across all files
    pub anomalies: usize,
    pub output_dir: PathBuf,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Active translation provider
    translator: Arc<dyn Translator>,
}

impl Controller {
    // @method: Create a new controller with the provider selected in the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let translator = providers::from_config(&config.translation)?;
        Ok(Self::with_translator(config, translator))
    }

    /// Create a controller around an existing translator
    pub fn with_translator(config: Config, translator: Arc<dyn Translator>) -> Self {
        Self { config, translator }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Client shared by every file of a run, so the provider limit is global
    fn build_client(&self) -> Result<TranslationClient> {
        let source = language_utils::provider_code(&self.config.source_language)?;
        let target = language_utils::provider_code(&self.config.target_language)?;

        Ok(TranslationClient::new(self.translator.clone(), source, target)
            .with_retry_policy(RetryPolicy::from_config(&self.config.translation.common))
            .with_concurrency_limit(self.config.translation.get_concurrent_requests()))
    }

    fn bar_style(unit: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
                unit
            ))
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }

    /// Translate one file into `output_path`
    pub async fn translate_file(
        &self,
        walker: &DocumentWalker,
        input_path: &Path,
        output_path: &Path,
        force_overwrite: bool,
        progress: Option<&ProgressBar>,
    ) -> Result<FileOutcome> {
        let file_name = input_path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Input path has no file name: {:?}", input_path))?;

        let Some(family) = DocumentFamily::detect(&file_name) else {
            debug!("Skipping {}, nothing to translate", file_name);
            return Ok(FileOutcome::Skipped(SkipReason::NotTranslatable));
        };

        if FileManager::file_exists(output_path) && !force_overwrite {
            warn!("Skipping {}, translation already exists (use -f to force overwrite)", file_name);
            return Ok(FileOutcome::Skipped(SkipReason::AlreadyTranslated));
        }

        let document = FileManager::read_json(input_path)?;
        debug!("Translating {} as {}", file_name, family.name());

        let (document, units) = walker
            .for_file(&file_name)
            .walk_with_progress(document, family, |done, total| {
                if let Some(bar) = progress {
                    bar.set_length(total as u64);
                    bar.set_position(done as u64);
                }
            })
            .await
            .with_context(|| format!("Failed to translate {}", file_name))?;

        FileManager::write_json(output_path, &document, self.config.output.pretty)?;
        info!("Success: {} ({} units)", output_path.display(), units);

        Ok(FileOutcome::Translated { units })
    }

    /// Translate every JSON file directly inside `input_dir` into `<input_dir>_<target>`.
    /// Files whose output already exists are skipped unless `force_overwrite` is set.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_json_files(&input_dir)?;
        if files.is_empty() {
            return Err(anyhow!("No JSON files found in directory: {:?}", input_dir));
        }

        let output_dir = FileManager::output_dir_for(&input_dir, &self.config.target_language);
        FileManager::ensure_dir(&output_dir)?;

        info!(
            "🚀 rpgtl: {} - {} ({} -> {})",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model(),
            self.config.source_language,
            self.config.target_language
        );

        if let Err(e) = self.translator.check_connection().await {
            warn!("Provider connection check failed, continuing anyway: {}", e);
        }

        let anomalies = AnomalyLog::new();
        let tally = TranslationTally::new();
        let walker = DocumentWalker::from_config(&self.config, self.build_client()?, anomalies.clone(), tally.clone());

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        folder_pb.set_style(Self::bar_style("files"));
        folder_pb.set_message("Processing files");

        let outcomes: Vec<(PathBuf, Result<FileOutcome>)> = stream::iter(files)
            .map(|input_path| {
                let walker = &walker;
                let multi_progress = &multi_progress;
                let folder_pb = &folder_pb;
                let output_path = output_dir.join(input_path.file_name().unwrap_or_default());

                async move {
                    let file_pb = multi_progress.add(ProgressBar::new(0));
                    file_pb.set_style(Self::bar_style("containers"));
                    file_pb.set_message(input_path.file_name().unwrap_or_default().to_string_lossy().to_string());

                    let result = self
                        .translate_file(walker, &input_path, &output_path, force_overwrite, Some(&file_pb))
                        .await;

                    file_pb.finish_and_clear();
                    multi_progress.remove(&file_pb);
                    folder_pb.inc(1);
                    (input_path, result)
                }
            })
            .buffer_unordered(self.config.output.concurrent_files.max(1))
            .collect()
            .await;

        folder_pb.finish_with_message("Folder processing complete");

        let mut summary = RunSummary {
            output_dir: output_dir.clone(),
            ..RunSummary::default()
        };
        for (input_path, outcome) in outcomes {
            match outcome {
                Ok(FileOutcome::Translated { .. }) => summary.translated_files += 1,
                Ok(FileOutcome::Skipped(_)) => summary.skipped_files += 1,
                Err(e) => {
                    error!("Error processing file {:?}: {:#}", input_path, e);
                    summary.failed_files += 1;
                }
            }
        }
        summary.translated_units = tally.get();
        summary.anomalies = anomalies.len();

        let summary_message = format!(
            "Folder processing completed: {} translated, {} skipped, {} errors, {} units in {:.1}s",
            summary.translated_files,
            summary.skipped_files,
            summary.failed_files,
            summary.translated_units,
            start_time.elapsed().as_secs_f64()
        );
        info!("{}", summary_message);

        if !anomalies.is_empty() {
            let mut entries = anomalies.entries();
            entries.push(LogEntry {
                level: "INFO".to_string(),
                message: summary_message,
            });

            let log_file_path = output_dir.join(ISSUES_LOG_FILE);
            let context = format!(
                "{} - {} ({})",
                self.config.translation.provider.display_name(),
                input_dir.display(),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            );
            match Self::write_logs_to_file(&entries, &log_file_path, &context) {
                Ok(()) => info!("{} issues written to {}", summary.anomalies, log_file_path.display()),
                Err(e) => warn!("Failed to write logs to file: {}", e),
            }
        }

        Ok(summary)
    }

    /// Write captured log entries to a log file
    fn write_logs_to_file(logs: &[LogEntry], file_path: &Path, translation_context: &str) -> Result<()> {
        let mut log_content = String::new();

        log_content.push_str(&format!(
            "Translation Log - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        log_content.push_str(&format!("Context: {}\n\n", translation_context));

        for entry in logs {
            log_content.push_str(&format!("[{}] {}\n", entry.level, entry.message));
        }

        FileManager::write_to_file(file_path, &log_content)
    }
}
