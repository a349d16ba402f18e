use crate::{
    clippings::{config::ClippingsConfig, splitter::SEPARATOR},
    utility::str::{replace_invisible, trim_start_invisible},
};

// 目印の行の後ろ何行まで本文を探すか
pub const LOOKAHEAD: usize = 2;

// 目印の次の行から本文らしい最初の行を探す
pub fn recover_quote(
    lines: &[&str],
    marker_index: usize,
    config: &ClippingsConfig,
) -> Option<String> {
    lines
        .iter()
        .skip(marker_index + 1)
        .take(LOOKAHEAD)
        .find_map(|line| clean_candidate(line, config))
}

fn clean_candidate(line: &str, config: &ClippingsConfig) -> Option<String> {
    let cleaned = trim_start_invisible(line.trim());
    let cleaned = replace_invisible(cleaned).trim().to_owned();

    // メタデータ行 ("- Tu resaltado ..." や "Añadido el ...") と区切りは本文ではない
    // 位置のキーワードは目印の検出と同じく大文字・小文字を区別しない
    let is_metadata = line.starts_with('-')
        || contains_ignore_case(line, &config.position_keyword)
        || line.contains(config.added_marker.as_str())
        || line.contains(SEPARATOR);

    if cleaned.is_empty() || is_metadata {
        return None;
    }

    Some(cleaned)
}

fn contains_ignore_case(line: &str, keyword: &str) -> bool {
    line.to_lowercase().contains(&keyword.to_lowercase())
}
