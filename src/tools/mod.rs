mod file_mover;
mod file_scanner;
mod identifier_parser;
mod path_validator;

pub use file_mover::{MoveOutcome, move_file_if_absent};
pub use file_scanner::{FileInfo, count_files_by_category, scan_top_level_files};
pub use identifier_parser::parse_identifiers;
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
