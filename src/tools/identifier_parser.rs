use log::warn;
use regex::Regex;
use std::sync::LazyLock;

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid identifier pattern"));

/// 從自由輸入的文字中取出照片編號
///
/// 任何連續數字都視為一個編號，分隔符號不拘；0 與超出範圍的數字會被略過。
/// 不做去重，保留輸入順序。
#[must_use]
pub fn parse_identifiers(text: &str) -> Vec<u32> {
    NUMBER_PATTERN
        .find_iter(text)
        .filter_map(|m| match m.as_str().parse::<u32>() {
            Ok(0) => {
                warn!("略過無效的編號: 0");
                None
            }
            Ok(id) => Some(id),
            Err(e) => {
                warn!("略過無效的編號 {}: {e}", m.as_str());
                None
            }
        })
        .collect()
}
