//! 依類型整理相機檔案元件
//!
//! 掃描資料夾第一層的檔案，依副檔名將 RAW 與 JPG 分別移動到對應的資料夾

mod file_classifier;
mod main;

pub use file_classifier::{ClassifiedFile, FileClassifier, SortEvent, SortReport};
pub use main::SortByType;
