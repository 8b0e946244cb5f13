use crate::component::{SelectedMover, SortByType};
use crate::config::Config;
use crate::pause;
use crate::tools::parse_identifiers;
use anyhow::{Context, Result};
use console::{Term, style};
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use log::warn;
use rust_i18n::t;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("無法取得目前的工作目錄")
}

fn report_error(e: &anyhow::Error) {
    warn!("執行失敗: {e:#}");
    eprintln!("{} {:#}", style(t!("common.error_prefix")).red().bold(), e);
}

pub fn run_sort_by_type(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let sorter = SortByType::new(config.clone(), Arc::clone(shutdown_signal), working_dir()?);

    if let Err(e) = sorter.run() {
        report_error(&e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_selected_mover(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let mover = SelectedMover::with_builtin_selection(
        config.clone(),
        Arc::clone(shutdown_signal),
        working_dir()?,
    );

    if let Err(e) = mover.run() {
        report_error(&e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_custom_selected_mover(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let text: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("selected_mover.input_prompt"))
        .allow_empty(true)
        .interact_text()?;

    let identifiers = parse_identifiers(&text);
    if identifiers.is_empty() {
        println!("{}", style(t!("selected_mover.no_identifiers")).yellow());
        pause(term)?;
        return Ok(());
    }

    let mover = SelectedMover::new(
        config.clone(),
        Arc::clone(shutdown_signal),
        working_dir()?,
        identifiers,
    );

    if let Err(e) = mover.run() {
        report_error(&e);
    }

    pause(term)?;
    Ok(())
}
