//! 單一檔案搬移
//!
//! 目標已存在時不覆寫，所有結果都以 [`MoveOutcome`] 回報，不會中斷呼叫端的迴圈

use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// 單一檔案的搬移結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// 目標已有同名檔案，來源保留原處
    SkippedExists,
    /// 來源檔案不存在
    NotFound,
    /// 搬移失敗（權限、I/O 等），內含完整錯誤訊息
    Failed(String),
}

/// 目標路徑是否已被佔用（含失效的符號連結）
#[must_use]
pub fn path_is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// 將 `source` 搬到 `target`，目標已存在時跳過
pub fn move_file_if_absent(source: &Path, target: &Path) -> MoveOutcome {
    if !path_is_taken(source) {
        return MoveOutcome::NotFound;
    }

    if path_is_taken(target) {
        debug!("跳過已存在的檔案: {}", target.display());
        return MoveOutcome::SkippedExists;
    }

    match fs::rename(source, target) {
        Ok(()) => {
            debug!("移動檔案: {} -> {}", source.display(), target.display());
            MoveOutcome::Moved
        }
        Err(e) => {
            // 如果 rename 失敗（可能是跨檔案系統），嘗試複製後刪除
            match copy_and_delete(source, target) {
                Ok(()) => {
                    debug!(
                        "以複製方式移動檔案: {} -> {}",
                        source.display(),
                        target.display()
                    );
                    MoveOutcome::Moved
                }
                Err(copy_err) => {
                    warn!(
                        "移動檔案失敗 {}: {:#} (原始錯誤: {})",
                        source.display(),
                        copy_err,
                        e
                    );
                    MoveOutcome::Failed(format!("{e}; {copy_err:#}"))
                }
            }
        }
    }
}

/// 複製檔案後刪除原檔案，複製失敗時清掉不完整的目標檔
fn copy_and_delete(source: &Path, target: &Path) -> Result<()> {
    if let Err(e) = fs::copy(source, target) {
        if path_is_taken(target) {
            let _ = fs::remove_file(target);
        }
        return Err(e).with_context(|| {
            format!("複製檔案失敗: {} -> {}", source.display(), target.display())
        });
    }

    fs::remove_file(source).with_context(|| format!("刪除原檔案失敗: {}", source.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("IMG_1.CR2");
        let target = temp_dir.path().join("moved.CR2");
        fs::write(&source, "raw").unwrap();

        assert_eq!(move_file_if_absent(&source, &target), MoveOutcome::Moved);
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "raw");
    }

    #[test]
    fn test_skip_when_target_exists() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("IMG_1.JPG");
        let target = temp_dir.path().join("existing.JPG");
        fs::write(&source, "new").unwrap();
        fs::write(&target, "old").unwrap();

        assert_eq!(
            move_file_if_absent(&source, &target),
            MoveOutcome::SkippedExists
        );
        assert_eq!(fs::read_to_string(&source).unwrap(), "new");
        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
    }

    #[test]
    fn test_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("IMG_999.CR2");
        let target = temp_dir.path().join("out.CR2");

        assert_eq!(move_file_if_absent(&source, &target), MoveOutcome::NotFound);
        assert!(!target.exists());
    }

    #[test]
    fn test_failed_move_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("IMG_1.CR2");
        fs::write(&source, "raw").unwrap();
        // 目標的上層資料夾不存在
        let target = temp_dir.path().join("missing_dir/IMG_1.CR2");

        let outcome = move_file_if_absent(&source, &target);
        assert!(matches!(outcome, MoveOutcome::Failed(_)));
        assert!(source.exists());
    }
}
