use crate::config::{CategoryTable, FileCategory};
use anyhow::{Context, Result};
use log::debug;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
}

impl FileInfo {
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// 隱藏檔案（以 `.` 開頭）
#[must_use]
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// 掃描目錄第一層的一般檔案（不遞迴），略過隱藏檔與 `excluded_names`，按檔名排序
///
/// 指向一般檔案的符號連結也算一般檔案
pub fn scan_top_level_files(directory: &Path, excluded_names: &[OsString]) -> Result<Vec<FileInfo>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("無法讀取目錄: {}", directory.display()))?;

        if is_hidden(entry.path()) {
            continue;
        }
        if excluded_names.iter().any(|name| name == entry.file_name()) {
            continue;
        }

        // 符號連結依指向的目標判斷，失效的連結不列入
        let Ok(metadata) = fs::metadata(entry.path()) else {
            debug!("略過無法讀取的項目: {}", entry.path().display());
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        files.push(FileInfo {
            path: entry.into_path(),
            size: metadata.len(),
        });
    }

    Ok(files)
}

/// 重新讀取資料夾，統計各分類的檔案數量（不使用搬移時的計數）
pub fn count_files_by_category(
    directory: &Path,
    table: &CategoryTable,
) -> Result<BTreeMap<FileCategory, usize>> {
    let mut counts: BTreeMap<FileCategory, usize> = FileCategory::all_categories()
        .into_iter()
        .map(|category| (category, 0))
        .collect();

    for file in scan_top_level_files(directory, &[])? {
        if let Some(category) = table.categorize_file(&file.path) {
            *counts.entry(category).or_insert(0) += 1;
        }
    }

    Ok(counts)
}
