use super::file_classifier::{ClassifiedFile, FileClassifier, SortEvent, SortReport};
use crate::component::{confirm_start, tool_artifact_names};
use crate::config::{Config, FileCategory};
use crate::tools::{MoveOutcome, validate_directory_exists};
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rust_i18n::t;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 依類型整理相機檔案元件
pub struct SortByType {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
    working_dir: PathBuf,
}

impl SortByType {
    pub const fn new(
        config: Config,
        shutdown_signal: Arc<AtomicBool>,
        working_dir: PathBuf,
    ) -> Self {
        Self {
            config,
            shutdown_signal,
            working_dir,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style(t!("sort_by_type.title")).cyan().bold());
        println!(
            "{}",
            t!(
                "common.working_dir",
                path = self.working_dir.display().to_string()
            )
        );

        validate_directory_exists(&self.working_dir)?;

        // 預覽只讀取目錄，不做任何變更
        let files = self.classifier().scan_and_classify(&self.working_dir)?;
        self.print_category_summary(&files);

        let table = &self.config.category_table;
        let proceed = confirm_start(&t!(
            "sort_by_type.confirm",
            raw_folder = table.folder_name(FileCategory::Raw),
            processed_folder = table.folder_name(FileCategory::Processed)
        ))?;

        if let Some(report) = self.execute(proceed)? {
            self.print_result(&report);
        }

        Ok(())
    }

    /// 依操作者的決定執行；取消或已收到中斷訊號時不碰任何檔案並回傳 `None`
    pub fn execute(&self, proceed: bool) -> Result<Option<SortReport>> {
        if !proceed {
            println!("{}", style(t!("common.cancelled")).yellow());
            return Ok(None);
        }

        if self.shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷訊號，停止處理");
            println!("{}", style(t!("common.cancelled")).yellow());
            return Ok(None);
        }

        let classifier = self.classifier();
        classifier.prepare_category_folders(&self.working_dir)?;
        let files = classifier.scan_and_classify(&self.working_dir)?;

        let progress_bar = ProgressBar::new(files.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress_bar.set_message(t!("sort_by_type.moving").to_string());

        let report = classifier.move_files_to_categories(&files, &self.working_dir, |event| {
            progress_bar.suspend(|| println!("{}", Self::describe_event(&event)));
            progress_bar.inc(1);
        })?;

        if report.interrupted {
            progress_bar.abandon_with_message(t!("common.interrupted").to_string());
        } else {
            progress_bar.finish_and_clear();
        }

        Ok(Some(report))
    }

    fn classifier(&self) -> FileClassifier {
        FileClassifier::new(
            self.config.category_table.clone(),
            Arc::clone(&self.shutdown_signal),
        )
        .with_excluded_names(tool_artifact_names())
    }

    fn describe_event(event: &SortEvent<'_>) -> String {
        match event {
            SortEvent::Ignored { file_name } => format!(
                "  {} {}",
                style("-").dim(),
                t!("sort_by_type.ignored", file = file_name)
            ),
            SortEvent::Handled {
                file_name,
                folder,
                outcome,
            } => match outcome {
                MoveOutcome::Moved => format!(
                    "  {} {}",
                    style("→").green(),
                    t!("common.moved", file = file_name, folder = folder)
                ),
                MoveOutcome::SkippedExists => format!(
                    "  {} {}",
                    style("⋯").yellow(),
                    t!("common.skipped", file = file_name, folder = folder)
                ),
                MoveOutcome::NotFound => format!(
                    "  {} {}",
                    style("✗").red(),
                    t!("common.vanished", file = file_name)
                ),
                MoveOutcome::Failed(message) => format!(
                    "  {} {}",
                    style("✗").red(),
                    t!("common.move_failed", file = file_name, error = message)
                ),
            },
        }
    }

    fn print_category_summary(&self, files: &[ClassifiedFile]) {
        let mut counts: BTreeMap<Option<FileCategory>, (usize, u64)> = BTreeMap::new();
        for file in files {
            let entry = counts.entry(file.category).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += file.size;
        }

        println!();
        println!(
            "{}",
            style(t!("sort_by_type.found", count = files.len())).green()
        );
        println!();

        for (category, (count, size)) in counts {
            let size_mb = size as f64 / 1024.0 / 1024.0;
            let folder_name = category.map_or_else(
                || t!("sort_by_type.stays_in_place").to_string(),
                |c| self.config.category_table.folder_name(c).to_string(),
            );
            let display_name = category.map_or("-", FileCategory::display_name);

            println!(
                "  {} {} ({}) - {}",
                style("→").dim(),
                style(folder_name).cyan(),
                display_name,
                t!(
                    "sort_by_type.group_line",
                    count = count,
                    size = format!("{size_mb:.2}")
                )
            );
        }

        println!();
    }

    fn print_result(&self, report: &SortReport) {
        let table = &self.config.category_table;

        println!();
        println!("{}", style("=".repeat(50)).dim());
        println!("{}", style(t!("sort_by_type.complete")).cyan().bold());
        println!("{}", style("=".repeat(50)).dim());

        for category in FileCategory::all_categories() {
            println!(
                "  {}",
                t!(
                    "common.moved_count",
                    category = category.display_name(),
                    count = style(report.moved_for(category)).green()
                )
            );
        }
        println!(
            "  {}",
            t!("common.skipped_count", count = style(report.skipped).yellow())
        );
        println!(
            "  {}",
            t!("sort_by_type.ignored_count", count = report.ignored)
        );
        if report.errors > 0 {
            println!(
                "  {}",
                t!("common.error_count", count = style(report.errors).red())
            );
        }
        println!(
            "  {}",
            t!("sort_by_type.total_processed", count = report.total_processed())
        );

        if report.interrupted {
            println!("{}", style(t!("common.interrupted")).yellow());
        }

        println!();
        println!("{}", style(t!("common.folder_contents")).dim());
        for category in FileCategory::all_categories() {
            println!(
                "  {} {}",
                style("•").dim(),
                t!(
                    "sort_by_type.folder_line",
                    folder = table.folder_name(category),
                    count = report.folder_counts.get(&category).copied().unwrap_or(0),
                    category = category.display_name()
                )
            );
        }

        info!(
            "依類型整理完成 - RAW: {}, JPG: {}, 跳過: {}, 略過: {}, 失敗: {}",
            report.moved_for(FileCategory::Raw),
            report.moved_for(FileCategory::Processed),
            report.skipped,
            report.ignored,
            report.errors
        );
    }
}
