pub mod load;
pub mod save;
pub mod types;

pub use types::{
    CategoryRule, CategoryTable, Config, FileCategory, Language, SETTINGS_FILE, SelectionConfig,
    UserSettings,
};
