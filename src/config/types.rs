use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// 設定檔名稱（存放在執行的當前目錄）
pub const SETTINGS_FILE: &str = "settings.json";

/// 檔案分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileCategory {
    /// 相機原始檔（CR2）
    Raw,
    /// 相機輸出的壓縮檔（JPG）
    Processed,
}

impl FileCategory {
    #[must_use]
    pub const fn all_categories() -> [Self; 2] {
        [Self::Raw, Self::Processed]
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::Processed => "JPG",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 單一分類的規則：目標資料夾與可接受的副檔名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub folder: String,
    /// 含前導點，第一個為標準副檔名
    pub extensions: Vec<String>,
}

impl CategoryRule {
    /// 標準副檔名，用於組合選取清單的檔名
    #[must_use]
    pub fn canonical_extension(&self) -> &str {
        self.extensions.first().map_or("", String::as_str)
    }

    /// 副檔名比對（不分大小寫）
    #[must_use]
    pub fn matches_extension(&self, ext: &str) -> bool {
        let dotted = format!(".{}", ext.to_lowercase());
        self.extensions.iter().any(|e| e.to_lowercase() == dotted)
    }

    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.matches_extension(ext))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTable {
    #[serde(rename = "RAW_FILE")]
    pub raw_file: CategoryRule,
    #[serde(rename = "PROCESSED_FILE")]
    pub processed_file: CategoryRule,
}

impl CategoryTable {
    #[must_use]
    pub const fn rule(&self, category: FileCategory) -> &CategoryRule {
        match category {
            FileCategory::Raw => &self.raw_file,
            FileCategory::Processed => &self.processed_file,
        }
    }

    #[must_use]
    pub fn folder_name(&self, category: FileCategory) -> &str {
        &self.rule(category).folder
    }

    /// 依副檔名判斷分類，不屬於任何分類時回傳 `None`
    #[must_use]
    pub fn categorize_file(&self, path: &Path) -> Option<FileCategory> {
        FileCategory::all_categories()
            .into_iter()
            .find(|&category| self.rule(category).matches(path))
    }
}

/// 精選照片設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// 檔名前綴，例如 `IMG_`
    pub prefix: String,
    /// 精選目標資料夾名稱
    pub destination: String,
    /// 內建的精選編號（可能含重複）
    pub identifiers: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub category_table: CategoryTable,
    pub selection: SelectionConfig,
    pub settings: UserSettings,
}
