//! 精選照片搬移元件
//!
//! 依照片編號把 RAW 與 JPG 從各自的資料夾移動到精選資料夾，並回報找不到的編號

mod main;
mod selection_mover;

pub use main::SelectedMover;
pub use selection_mover::{
    SelectionEvent, SelectionMover, SelectionReport, candidate_file_name, unique_identifiers,
};
