// 電子書籍リーダーの書き出しに紛れ込む不可視文字
// BOM はファイル先頭だけでなく各クリップのタイトル行にも付くことがある
pub const INVISIBLE_CHARS: &[char] = &['\u{feff}', '\u{200b}', '\u{200c}', '\u{200d}'];

const NO_BREAK_SPACE: char = '\u{a0}';

pub fn is_invisible(c: char) -> bool {
    INVISIBLE_CHARS.contains(&c)
}

pub fn trim_start_invisible(s: &str) -> &str {
    s.trim_start_matches(is_invisible)
}

// 不可視文字・ノーブレークスペースの連続を空白 1 つに置き換える
pub fn replace_invisible(s: &str) -> String {
    let mut ret = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if is_invisible(c) || c == NO_BREAK_SPACE {
            if !in_run {
                ret.push(' ');
            }
            in_run = true;
        } else {
            ret.push(c);
            in_run = false;
        }
    }
    ret
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// 文字数で切り詰める (バイト数ではない)
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
