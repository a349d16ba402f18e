use once_cell::sync::Lazy;
use regex::Regex;

use crate::utility::str::{collapse_whitespace, trim_start_invisible};

pub const UNKNOWN_BOOK: &str = "Unknown Book";

// 入手元のサイトが付けるタグ
static NOISE_TAGS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\s*\(z-lib\.org\)",
        r"(?i)\s*\(z-library\)",
        r"(?i)\s*\(www\.\w+\.com\)",
        r"(?i)\s*\(.*?source.*?\)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

// \w はゼロ幅接合子や結合文字も含むので文字・数字を明示する
static REGEX_UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}_\s,\-]").unwrap());

static REGEX_TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*$").unwrap());

// 著者ではなく翻訳者・編者などを示す括弧書き
const ROLE_MARKERS: &[&str] = &[
    "ed",
    "trans",
    "translator",
    "editor",
    "comp",
    "adapt",
    "illus",
    "version",
];

// "Title (Author) (z-lib.org)" のような 1 行目を "Title, Author" にする
pub fn normalize_book_title(line: &str) -> String {
    let mut title = trim_start_invisible(line.trim()).to_owned();
    for tag in NOISE_TAGS.iter() {
        title = tag.replace_all(&title, "").into_owned();
    }

    let parts: Vec<&str> = title
        .split(['(', ')'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let Some((title, rest)) = parts.split_first() else {
        return UNKNOWN_BOOK.to_owned();
    };

    let author = choose_author(rest)
        .map(|author| collapse_whitespace(&author.replace('_', " ")))
        .filter(|author| !author.is_empty());

    let joined = match author {
        Some(author) => format!("{}, {}", title, author),
        None => title.to_string(),
    };

    let joined = REGEX_TRAILING_COMMA.replace(&joined, "");
    let joined = REGEX_UNSAFE_CHARS.replace_all(&joined, " ");
    collapse_whitespace(&joined)
}

// 後ろから見て最初の，役割表記を含まない 3 文字以上の括弧書きを著者とみなす
fn choose_author<'a>(rest: &[&'a str]) -> Option<&'a str> {
    rest.iter()
        .rev()
        .find(|part| part.chars().count() > 2 && !is_role(part))
        .or_else(|| rest.first())
        .copied()
}

fn is_role(part: &str) -> bool {
    let part = part.to_lowercase();
    ROLE_MARKERS.iter().any(|role| part.contains(role))
}
