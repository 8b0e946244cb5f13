use super::selection_mover::{SelectionEvent, SelectionMover, SelectionReport, unique_identifiers};
use crate::component::confirm_start;
use crate::config::{Config, FileCategory};
use crate::tools::MoveOutcome;
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rust_i18n::t;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 精選照片搬移元件
pub struct SelectedMover {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
    working_dir: PathBuf,
    identifiers: Vec<u32>,
}

impl SelectedMover {
    pub const fn new(
        config: Config,
        shutdown_signal: Arc<AtomicBool>,
        working_dir: PathBuf,
        identifiers: Vec<u32>,
    ) -> Self {
        Self {
            config,
            shutdown_signal,
            working_dir,
            identifiers,
        }
    }

    /// 使用內建精選清單
    #[must_use]
    pub fn with_builtin_selection(
        config: Config,
        shutdown_signal: Arc<AtomicBool>,
        working_dir: PathBuf,
    ) -> Self {
        let identifiers = config.selection.identifiers.clone();
        Self::new(config, shutdown_signal, working_dir, identifiers)
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style(t!("selected_mover.title")).cyan().bold());
        println!(
            "{}",
            t!(
                "common.working_dir",
                path = self.working_dir.display().to_string()
            )
        );
        println!(
            "{}",
            style(t!(
                "selected_mover.identifier_count",
                total = self.identifiers.len(),
                unique = unique_identifiers(&self.identifiers).len()
            ))
            .dim()
        );

        let proceed = confirm_start(&t!(
            "selected_mover.confirm",
            destination = self.config.selection.destination.as_str()
        ))?;

        if let Some(report) = self.execute(proceed)? {
            self.print_result(&report);
        }

        Ok(())
    }

    /// 依操作者的決定執行；取消或已收到中斷訊號時不碰任何檔案並回傳 `None`
    pub fn execute(&self, proceed: bool) -> Result<Option<SelectionReport>> {
        if !proceed {
            println!("{}", style(t!("common.cancelled")).yellow());
            return Ok(None);
        }

        if self.shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷訊號，停止處理");
            println!("{}", style(t!("common.cancelled")).yellow());
            return Ok(None);
        }

        let mover = SelectionMover::new(
            self.config.category_table.clone(),
            self.config.selection.clone(),
            Arc::clone(&self.shutdown_signal),
        );

        // 先檢查來源，避免失敗時仍顯示進度條
        mover.validate_sources(&self.working_dir)?;
        println!(
            "{}",
            t!(
                "selected_mover.target",
                path = mover.destination_dir(&self.working_dir).display().to_string()
            )
        );

        let unique_count = unique_identifiers(&self.identifiers).len();
        let candidate_count = unique_count * FileCategory::all_categories().len();
        let progress_bar = ProgressBar::new(candidate_count as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress_bar.set_message(t!("selected_mover.moving").to_string());

        let report = mover.move_selected(&self.working_dir, &self.identifiers, |event| {
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

    fn describe_event(event: &SelectionEvent<'_>) -> String {
        let file = event.file_name;
        let folder = event.destination;
        match event.outcome {
            MoveOutcome::Moved => format!(
                "  {} {}",
                style("→").green(),
                t!("common.moved", file = file, folder = folder)
            ),
            MoveOutcome::SkippedExists => format!(
                "  {} {}",
                style("⋯").yellow(),
                t!("common.skipped", file = file, folder = folder)
            ),
            MoveOutcome::NotFound => format!(
                "  {} {}",
                style("?").dim(),
                t!(
                    "selected_mover.not_found",
                    category = event.category.display_name(),
                    file = file
                )
            ),
            MoveOutcome::Failed(message) => format!(
                "  {} {}",
                style("✗").red(),
                t!("common.move_failed", file = file, error = message)
            ),
        }
    }

    fn print_result(&self, report: &SelectionReport) {
        println!();
        println!("{}", style("=".repeat(60)).dim());
        println!("{}", style(t!("selected_mover.complete")).cyan().bold());
        println!("{}", style("=".repeat(60)).dim());

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
        for category in FileCategory::all_categories() {
            println!(
                "  {}",
                t!(
                    "selected_mover.not_found_count",
                    category = category.display_name(),
                    count = style(report.not_found_for(category)).yellow()
                )
            );
        }
        let skipped: usize = report.skipped.values().sum();
        if skipped > 0 {
            println!(
                "  {}",
                t!("common.skipped_count", count = style(skipped).yellow())
            );
        }
        println!(
            "  {}",
            t!("common.error_count", count = style(report.errors).red())
        );
        println!(
            "  {}",
            t!(
                "selected_mover.total_processed",
                count = report.identifiers_processed
            )
        );

        if report.interrupted {
            println!("{}", style(t!("common.interrupted")).yellow());
        }

        println!();
        println!(
            "{}",
            style(t!(
                "selected_mover.folder_contents",
                folder = self.config.selection.destination.as_str()
            ))
            .dim()
        );
        for category in FileCategory::all_categories() {
            println!(
                "  {} {}",
                style("•").dim(),
                t!(
                    "selected_mover.folder_line",
                    category = category.display_name(),
                    count = report.destination_counts.get(&category).copied().unwrap_or(0)
                )
            );
        }
        println!(
            "  {}",
            t!(
                "selected_mover.folder_total",
                count = report.destination_total()
            )
        );

        info!(
            "精選搬移結束 - 編號: {}, 失敗: {}",
            report.identifiers_processed, report.errors
        );
    }
}
