use crate::config::types::{SETTINGS_FILE, UserSettings};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// 儲存到執行目錄下的 settings.json
pub fn save_settings(settings: &UserSettings) -> Result<()> {
    save_settings_to(Path::new(SETTINGS_FILE), settings)
}

pub fn save_settings_to(path: &Path, settings: &UserSettings) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Language;
    use crate::config::load::load_settings_from;
    use tempfile::TempDir;

    #[test]
    fn test_settings_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);

        let settings = UserSettings {
            language: Language::ZhTw,
        };
        save_settings_to(&path, &settings).unwrap();

        let loaded = load_settings_from(&path).unwrap();
        assert_eq!(loaded.language, Language::ZhTw);
    }

    #[test]
    fn test_missing_settings_use_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = load_settings_from(&temp_dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(loaded.language, Language::EnUs);
    }

    #[test]
    fn test_broken_settings_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(load_settings_from(&path).is_err());
    }
}
