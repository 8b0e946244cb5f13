use crate::config::types::{CategoryTable, Config, SETTINGS_FILE, SelectionConfig, UserSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::Path;

/// 編譯時嵌入的分類表（不需要外部檔案）
const CATEGORY_TABLE_JSON: &str = include_str!("../../data/category_table.json");

/// 編譯時嵌入的精選清單
const SELECTION_JSON: &str = include_str!("../../data/selection.json");

impl Config {
    pub fn new() -> Result<Self> {
        let category_table = Self::load_embedded_category_table()?;
        let selection = Self::load_embedded_selection()?;
        let settings = load_settings_from(Path::new(SETTINGS_FILE)).unwrap_or_else(|e| {
            warn!("無法載入使用者設定，使用預設值: {e:#}");
            UserSettings::default()
        });

        Ok(Self {
            category_table,
            selection,
            settings,
        })
    }

    /// 從編譯時嵌入的 JSON 載入分類表
    fn load_embedded_category_table() -> Result<CategoryTable> {
        serde_json::from_str(CATEGORY_TABLE_JSON).context("無法解析嵌入的分類設定")
    }

    fn load_embedded_selection() -> Result<SelectionConfig> {
        serde_json::from_str(SELECTION_JSON).context("無法解析嵌入的精選清單")
    }
}

/// 讀取使用者設定，檔案不存在時使用預設值
pub fn load_settings_from(path: &Path) -> Result<UserSettings> {
    if !path.exists() {
        return Ok(UserSettings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings from {}", path.display()))
}
