use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

/// 資料夾不存在時建立；同名的一般檔案視為設定失敗
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    } else if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory_exists() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("file.txt");
        std::fs::write(&file_path, "x").unwrap();

        assert!(validate_directory_exists(temp_dir.path()).is_ok());
        assert!(validate_directory_exists(&file_path).is_err());
        assert!(validate_directory_exists(&temp_dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_ensure_directory_exists() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("SELECTED");

        ensure_directory_exists(&target).unwrap();
        assert!(target.is_dir());
        // 已存在時不應失敗
        ensure_directory_exists(&target).unwrap();
    }

    #[test]
    fn test_ensure_directory_rejects_regular_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("RAW_Files");
        std::fs::write(&target, "x").unwrap();

        assert!(ensure_directory_exists(&target).is_err());
        assert!(target.is_file());
    }
}
