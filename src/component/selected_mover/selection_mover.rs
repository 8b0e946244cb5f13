//! 精選照片搬移
//!
//! 依照片編號從 RAW 與 JPG 資料夾找出對應檔案，搬到精選資料夾

use crate::config::{CategoryRule, CategoryTable, FileCategory, SelectionConfig};
use crate::tools::{
    MoveOutcome, count_files_by_category, ensure_directory_exists, move_file_if_absent,
    scan_top_level_files, validate_directory_exists,
};
use anyhow::Result;
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 精選搬移結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionReport {
    /// 去重後處理的編號數量
    pub identifiers_processed: usize,
    pub moved: BTreeMap<FileCategory, usize>,
    /// 精選資料夾已有同名檔案而跳過
    pub skipped: BTreeMap<FileCategory, usize>,
    pub not_found: BTreeMap<FileCategory, usize>,
    pub errors: usize,
    /// 執行後重新讀取的精選資料夾各分類檔案數
    pub destination_counts: BTreeMap<FileCategory, usize>,
    pub interrupted: bool,
}

impl SelectionReport {
    #[must_use]
    pub fn moved_for(&self, category: FileCategory) -> usize {
        self.moved.get(&category).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn skipped_for(&self, category: FileCategory) -> usize {
        self.skipped.get(&category).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn not_found_for(&self, category: FileCategory) -> usize {
        self.not_found.get(&category).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn destination_total(&self) -> usize {
        self.destination_counts.values().sum()
    }

    fn record(&mut self, category: FileCategory, outcome: &MoveOutcome) {
        let counter = match outcome {
            MoveOutcome::Moved => self.moved.entry(category).or_insert(0),
            MoveOutcome::SkippedExists => self.skipped.entry(category).or_insert(0),
            MoveOutcome::NotFound => self.not_found.entry(category).or_insert(0),
            MoveOutcome::Failed(_) => &mut self.errors,
        };
        *counter += 1;
    }
}

/// 單一候選檔案處理完成時的通知
#[derive(Debug)]
pub struct SelectionEvent<'a> {
    pub identifier: u32,
    pub category: FileCategory,
    pub file_name: &'a str,
    pub destination: &'a str,
    pub outcome: &'a MoveOutcome,
}

/// 去重並排序，確保每次執行順序一致
#[must_use]
pub fn unique_identifiers(identifiers: &[u32]) -> Vec<u32> {
    identifiers
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 依命名規則組出候選檔名，例如 `IMG_8442.CR2`
#[must_use]
pub fn candidate_file_name(prefix: &str, identifier: u32, rule: &CategoryRule) -> String {
    format!("{prefix}{identifier}{}", rule.canonical_extension())
}

/// 來源資料夾的檔名索引：主檔名 -> 實際檔名
///
/// 副檔名不分大小寫，同一主檔名有多個符合時以標準副檔名優先
#[derive(Debug, Default)]
struct SourceIndex {
    files: HashMap<String, OsString>,
}

impl SourceIndex {
    fn build(directory: &Path, rule: &CategoryRule) -> Result<Self> {
        let canonical = rule.canonical_extension().trim_start_matches('.');
        let mut files: HashMap<String, OsString> = HashMap::new();

        for file in scan_top_level_files(directory, &[])? {
            if !rule.matches(&file.path) {
                continue;
            }
            // 主檔名不是 UTF-8 時不可能符合命名規則
            let Some(stem) = file.path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(file_name) = file.path.file_name() else {
                continue;
            };
            let is_canonical = file
                .path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy() == canonical);

            if is_canonical || !files.contains_key(stem) {
                files.insert(stem.to_string(), file_name.to_os_string());
            }
        }

        debug!("索引 {}: {} 個檔案", directory.display(), files.len());
        Ok(Self { files })
    }

    fn lookup(&self, stem: &str) -> Option<&OsString> {
        self.files.get(stem)
    }
}

/// 精選照片搬移器
pub struct SelectionMover {
    category_table: CategoryTable,
    selection: SelectionConfig,
    shutdown_signal: Arc<AtomicBool>,
}

impl SelectionMover {
    #[must_use]
    pub const fn new(
        category_table: CategoryTable,
        selection: SelectionConfig,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            category_table,
            selection,
            shutdown_signal,
        }
    }

    #[must_use]
    pub fn source_dir(&self, base_dir: &Path, category: FileCategory) -> PathBuf {
        base_dir.join(self.category_table.folder_name(category))
    }

    #[must_use]
    pub fn destination_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.selection.destination)
    }

    /// 檢查來源資料夾是否都存在
    pub fn validate_sources(&self, base_dir: &Path) -> Result<()> {
        for category in FileCategory::all_categories() {
            validate_directory_exists(&self.source_dir(base_dir, category))?;
        }
        Ok(())
    }

    /// 搬移精選照片
    ///
    /// 來源資料夾不存在時直接回傳錯誤，不會建立精選資料夾；
    /// 每個編號的 RAW 與 JPG 各自獨立處理，單一檔案失敗不影響其他檔案。
    pub fn move_selected(
        &self,
        base_dir: &Path,
        identifiers: &[u32],
        mut on_event: impl FnMut(SelectionEvent<'_>),
    ) -> Result<SelectionReport> {
        self.validate_sources(base_dir)?;

        let destination_dir = self.destination_dir(base_dir);
        ensure_directory_exists(&destination_dir)?;

        let mut indexes: BTreeMap<FileCategory, SourceIndex> = BTreeMap::new();
        for category in FileCategory::all_categories() {
            let index = SourceIndex::build(
                &self.source_dir(base_dir, category),
                self.category_table.rule(category),
            )?;
            indexes.insert(category, index);
        }

        let unique = unique_identifiers(identifiers);
        info!(
            "開始搬移精選照片: {} 個編號（去重後 {} 個）",
            identifiers.len(),
            unique.len()
        );

        let mut report = SelectionReport::default();

        for identifier in unique {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止搬移");
                report.interrupted = true;
                break;
            }

            report.identifiers_processed += 1;
            let stem = format!("{}{identifier}", self.selection.prefix);

            for category in FileCategory::all_categories() {
                let rule = self.category_table.rule(category);
                let (file_name, outcome) = match indexes
                    .get(&category)
                    .and_then(|index| index.lookup(&stem))
                {
                    Some(found) => {
                        let source = self.source_dir(base_dir, category).join(found);
                        let target = destination_dir.join(found);
                        (
                            found.to_string_lossy().to_string(),
                            move_file_if_absent(&source, &target),
                        )
                    }
                    None => (
                        candidate_file_name(&self.selection.prefix, identifier, rule),
                        MoveOutcome::NotFound,
                    ),
                };

                report.record(category, &outcome);
                on_event(SelectionEvent {
                    identifier,
                    category,
                    file_name: &file_name,
                    destination: &self.selection.destination,
                    outcome: &outcome,
                });
            }
        }

        // 檔案已經搬完，重新統計失敗時只記錄警告，仍回傳結果
        report.destination_counts = count_files_by_category(&destination_dir, &self.category_table)
            .unwrap_or_else(|e| {
                warn!("無法重新統計資料夾 {}: {e:#}", destination_dir.display());
                FileCategory::all_categories()
                    .into_iter()
                    .map(|category| (category, 0))
                    .collect()
            });

        info!(
            "精選搬移完成 - 移動 RAW: {}, JPG: {}, 找不到 RAW: {}, JPG: {}, 失敗: {}",
            report.moved_for(FileCategory::Raw),
            report.moved_for(FileCategory::Processed),
            report.not_found_for(FileCategory::Raw),
            report.not_found_for(FileCategory::Processed),
            report.errors
        );

        Ok(report)
    }
}
