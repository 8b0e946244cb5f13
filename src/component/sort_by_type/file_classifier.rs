use crate::config::{CategoryTable, FileCategory};
use crate::tools::{
    FileInfo, MoveOutcome, count_files_by_category, ensure_directory_exists, move_file_if_absent,
    scan_top_level_files,
};
use anyhow::Result;
use log::{info, warn};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 分類結果
///
/// `moved`、`skipped`、`ignored`、`errors` 互斥，加總即為處理過的檔案數
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SortReport {
    /// 各分類成功移動的檔案數
    pub moved: BTreeMap<FileCategory, usize>,
    /// 目標已存在而跳過的檔案數
    pub skipped: usize,
    /// 不屬於任何分類、留在原處的檔案數
    pub ignored: usize,
    /// 移動失敗的檔案數
    pub errors: usize,
    /// 執行後重新讀取的各分類資料夾檔案數
    pub folder_counts: BTreeMap<FileCategory, usize>,
    /// 是否因中斷訊號提前結束
    pub interrupted: bool,
}

impl SortReport {
    #[must_use]
    pub fn moved_for(&self, category: FileCategory) -> usize {
        self.moved.get(&category).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_moved(&self) -> usize {
        self.moved.values().sum()
    }

    /// 取得總處理檔案數
    #[must_use]
    pub fn total_processed(&self) -> usize {
        self.total_moved() + self.skipped + self.ignored + self.errors
    }
}

/// 已分類的檔案，`category` 為 `None` 代表不處理
#[derive(Debug, Clone)]
pub struct ClassifiedFile {
    pub path: PathBuf,
    pub category: Option<FileCategory>,
    pub size: u64,
}

impl ClassifiedFile {
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// 單一檔案處理完成時的通知
#[derive(Debug)]
pub enum SortEvent<'a> {
    Ignored {
        file_name: &'a str,
    },
    Handled {
        file_name: &'a str,
        folder: &'a str,
        outcome: &'a MoveOutcome,
    },
}

/// 檔案分類器
pub struct FileClassifier {
    category_table: CategoryTable,
    shutdown_signal: Arc<AtomicBool>,
    /// 不處理的檔名（程式本身與設定檔）
    excluded_names: Vec<OsString>,
}

impl FileClassifier {
    #[must_use]
    pub const fn new(category_table: CategoryTable, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            category_table,
            shutdown_signal,
            excluded_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_excluded_names(mut self, names: Vec<OsString>) -> Self {
        self.excluded_names = names;
        self
    }

    /// 掃描目錄第一層並分類（唯讀）
    pub fn scan_and_classify(&self, directory: &Path) -> Result<Vec<ClassifiedFile>> {
        info!("開始掃描目錄: {}", directory.display());

        let files = scan_top_level_files(directory, &self.excluded_names)?;

        let classified: Vec<ClassifiedFile> = files
            .into_iter()
            .map(|FileInfo { path, size }| ClassifiedFile {
                category: self.category_table.categorize_file(&path),
                path,
                size,
            })
            .collect();

        info!("掃描到 {} 個檔案", classified.len());

        Ok(classified)
    }

    /// 建立所有分類資料夾
    pub fn prepare_category_folders(&self, base_dir: &Path) -> Result<()> {
        for category in FileCategory::all_categories() {
            ensure_directory_exists(&base_dir.join(self.category_table.folder_name(category)))?;
        }
        Ok(())
    }

    /// 逐一移動檔案到對應的分類資料夾，單一檔案失敗不影響其他檔案
    pub fn move_files_to_categories(
        &self,
        files: &[ClassifiedFile],
        base_dir: &Path,
        mut on_event: impl FnMut(SortEvent<'_>),
    ) -> Result<SortReport> {
        self.prepare_category_folders(base_dir)?;

        let mut report = SortReport::default();

        for file in files {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止移動");
                report.interrupted = true;
                break;
            }

            // 顯示用的檔名，實際搬移使用原始 OsStr
            let file_name = file.file_name();

            let Some(category) = file.category else {
                report.ignored += 1;
                on_event(SortEvent::Ignored {
                    file_name: &file_name,
                });
                continue;
            };

            let folder = self.category_table.folder_name(category);
            let target_path = base_dir
                .join(folder)
                .join(file.path.file_name().unwrap_or_default());
            let outcome = move_file_if_absent(&file.path, &target_path);

            match &outcome {
                MoveOutcome::Moved => *report.moved.entry(category).or_insert(0) += 1,
                MoveOutcome::SkippedExists => report.skipped += 1,
                // 掃描後才消失的檔案也算失敗
                MoveOutcome::NotFound | MoveOutcome::Failed(_) => report.errors += 1,
            }

            on_event(SortEvent::Handled {
                file_name: &file_name,
                folder,
                outcome: &outcome,
            });
        }

        // 檔案已經搬完，重新統計失敗時只記錄警告，仍回傳結果
        for category in FileCategory::all_categories() {
            let folder = base_dir.join(self.category_table.folder_name(category));
            let count = match count_files_by_category(&folder, &self.category_table) {
                Ok(counts) => counts.get(&category).copied().unwrap_or(0),
                Err(e) => {
                    warn!("無法重新統計資料夾 {}: {e:#}", folder.display());
                    0
                }
            };
            report.folder_counts.insert(category, count);
        }

        info!(
            "檔案整理完成 - 移動: {}, 跳過: {}, 略過: {}, 失敗: {}",
            report.total_moved(),
            report.skipped,
            report.ignored,
            report.errors
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_classifier() -> FileClassifier {
        let config = Config::new().expect("Failed to load config");
        let shutdown_signal = Arc::new(AtomicBool::new(false));
        FileClassifier::new(config.category_table, shutdown_signal)
    }

    #[test]
    fn test_scan_and_classify() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::write(base_path.join("IMG_1.CR2"), "raw").unwrap();
        fs::write(base_path.join("IMG_1.JPG"), "jpg").unwrap();
        fs::write(base_path.join("IMG_2.jpeg"), "jpg").unwrap();
        fs::write(base_path.join("notes.txt"), "text").unwrap();

        let classifier = create_test_classifier();
        let files = classifier.scan_and_classify(base_path).unwrap();

        assert_eq!(files.len(), 4);
        let count = |category: Option<FileCategory>| {
            files.iter().filter(|f| f.category == category).count()
        };
        assert_eq!(count(Some(FileCategory::Raw)), 1);
        assert_eq!(count(Some(FileCategory::Processed)), 2);
        assert_eq!(count(None), 1);
    }

    #[test]
    fn test_excluded_names() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::write(base_path.join("camera_file_organize"), "binary").unwrap();
        fs::write(base_path.join("IMG_1.CR2"), "raw").unwrap();

        let classifier = create_test_classifier()
            .with_excluded_names(vec![OsString::from("camera_file_organize")]);
        let files = classifier.scan_and_classify(base_path).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "IMG_1.CR2");
    }

    #[test]
    fn test_move_files_to_categories() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::write(base_path.join("IMG_1.CR2"), "raw").unwrap();
        fs::write(base_path.join("IMG_1.JPG"), "jpg").unwrap();
        fs::write(base_path.join("IMG_2.JPEG"), "jpg").unwrap();
        fs::write(base_path.join("notes.txt"), "text").unwrap();

        let classifier = create_test_classifier();
        let files = classifier.scan_and_classify(base_path).unwrap();
        let report = classifier
            .move_files_to_categories(&files, base_path, |_| {})
            .unwrap();

        assert_eq!(report.moved_for(FileCategory::Raw), 1);
        assert_eq!(report.moved_for(FileCategory::Processed), 2);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.errors, 0);
        assert_eq!(report.total_processed(), 4);
        assert!(!report.interrupted);

        assert!(base_path.join("RAW_Files/IMG_1.CR2").exists());
        assert!(base_path.join("JPG_Files/IMG_1.JPG").exists());
        assert!(base_path.join("JPG_Files/IMG_2.JPEG").exists());
        assert!(base_path.join("notes.txt").exists());

        assert_eq!(report.folder_counts[&FileCategory::Raw], 1);
        assert_eq!(report.folder_counts[&FileCategory::Processed], 2);
    }

    #[test]
    fn test_conflict_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::create_dir(base_path.join("RAW_Files")).unwrap();
        fs::write(base_path.join("RAW_Files/IMG_1.CR2"), "old").unwrap();
        fs::write(base_path.join("IMG_1.CR2"), "new").unwrap();

        let classifier = create_test_classifier();
        let files = classifier.scan_and_classify(base_path).unwrap();

        let mut skipped_names = Vec::new();
        let report = classifier
            .move_files_to_categories(&files, base_path, |event| {
                if let SortEvent::Handled {
                    file_name,
                    outcome: MoveOutcome::SkippedExists,
                    ..
                } = event
                {
                    skipped_names.push(file_name.to_string());
                }
            })
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.total_moved(), 0);
        assert_eq!(skipped_names, vec!["IMG_1.CR2"]);
        assert_eq!(fs::read_to_string(base_path.join("IMG_1.CR2")).unwrap(), "new");
        assert_eq!(
            fs::read_to_string(base_path.join("RAW_Files/IMG_1.CR2")).unwrap(),
            "old"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_kept_when_moving() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        let raw_name = OsStr::from_bytes(b"IMG_\xff1.CR2");
        fs::write(base_path.join(raw_name), "raw").unwrap();

        let classifier = create_test_classifier();
        let files = classifier.scan_and_classify(base_path).unwrap();
        let report = classifier
            .move_files_to_categories(&files, base_path, |_| {})
            .unwrap();

        assert_eq!(report.moved_for(FileCategory::Raw), 1);
        assert!(base_path.join("RAW_Files").join(raw_name).exists());
        let names: Vec<OsString> = fs::read_dir(base_path.join("RAW_Files"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![raw_name.to_os_string()]);
    }

    #[test]
    fn test_failed_move_counted_and_loop_continues() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        // 依檔名排序：A_notes.txt -> IMG_1.CR2 -> IMG_1.JPG
        fs::write(base_path.join("A_notes.txt"), "text").unwrap();
        fs::write(base_path.join("IMG_1.CR2"), "raw").unwrap();
        fs::write(base_path.join("IMG_1.JPG"), "jpg").unwrap();

        let classifier = create_test_classifier();
        let files = classifier.scan_and_classify(base_path).unwrap();

        // 資料夾建立後才被換成一般檔案，讓 RAW 的搬移失敗
        let raw_folder = base_path.join("RAW_Files");
        let mut failed_names = Vec::new();
        let report = classifier
            .move_files_to_categories(&files, base_path, |event| match event {
                SortEvent::Ignored { .. } => {
                    fs::remove_dir(&raw_folder).unwrap();
                    fs::write(&raw_folder, "not a folder").unwrap();
                }
                SortEvent::Handled {
                    file_name,
                    outcome: MoveOutcome::Failed(_),
                    ..
                } => failed_names.push(file_name.to_string()),
                SortEvent::Handled { .. } => {}
            })
            .unwrap();

        assert_eq!(report.errors, 1);
        assert_eq!(failed_names, vec!["IMG_1.CR2"]);
        assert_eq!(report.moved_for(FileCategory::Processed), 1);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.total_processed(), files.len());
        assert!(base_path.join("IMG_1.CR2").exists());
        assert!(base_path.join("JPG_Files/IMG_1.JPG").exists());
    }

    #[test]
    fn test_recount_failure_keeps_report() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::write(base_path.join("IMG_1.CR2"), "raw").unwrap();
        fs::write(base_path.join("IMG_1.JPG"), "jpg").unwrap();

        let classifier = create_test_classifier();
        let files = classifier.scan_and_classify(base_path).unwrap();

        // 最後一個檔案處理完後移除 RAW 資料夾，重新統計時讀不到
        let raw_folder = base_path.join("RAW_Files");
        let report = classifier
            .move_files_to_categories(&files, base_path, |event| {
                if matches!(event, SortEvent::Handled { file_name: "IMG_1.JPG", .. }) {
                    fs::remove_dir_all(&raw_folder).unwrap();
                }
            })
            .unwrap();

        assert_eq!(report.total_moved(), 2);
        assert_eq!(report.folder_counts[&FileCategory::Raw], 0);
        assert_eq!(report.folder_counts[&FileCategory::Processed], 1);
    }

    #[test]
    fn test_shutdown_signal_stops_moving() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::write(base_path.join("IMG_1.CR2"), "raw").unwrap();

        let config = Config::new().unwrap();
        let classifier =
            FileClassifier::new(config.category_table, Arc::new(AtomicBool::new(true)));
        let files = classifier.scan_and_classify(base_path).unwrap();
        let report = classifier
            .move_files_to_categories(&files, base_path, |_| {})
            .unwrap();

        assert!(report.interrupted);
        assert_eq!(report.total_processed(), 0);
        assert!(base_path.join("IMG_1.CR2").exists());
    }
}
