//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

mod common;
pub mod selected_mover;
pub mod sort_by_type;

pub use common::{confirm_start, tool_artifact_names};
pub use selected_mover::SelectedMover;
pub use sort_by_type::SortByType;
