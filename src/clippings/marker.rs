use anyhow::{Context, Result};
use regex::Regex;

use crate::clippings::config::ClippingsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    ArabicPage,     // página 42
    RomanPage,      // página xiv
    ArabicPosition, // posición 813
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub line_index: usize,
    pub kind: MarkerKind,
    pub keyword: String, // 表示用の接頭辞 (設定したキーワードそのもの)
    pub numeral: String, // 行に書かれていたままの数字
    pub value: u64,      // 並べ替え用
}

impl Marker {
    pub fn label(&self) -> String {
        format!("{} {}", self.keyword, self.numeral)
    }
}

struct MarkerStrategy {
    kind: MarkerKind,
    keyword: String,
    pattern: Regex,
    convert: fn(&str) -> Option<u64>,
}

impl MarkerStrategy {
    fn new(
        kind: MarkerKind,
        keyword: &str,
        numeral: &str,
        convert: fn(&str) -> Option<u64>,
    ) -> Result<Self> {
        let pattern = format!(r"(?i){}\s*({})", regex::escape(keyword), numeral);
        let pattern = Regex::new(&pattern)
            .with_context(|| format!("Failed to build pattern for keyword {:?}", keyword))?;

        Ok(MarkerStrategy {
            kind,
            keyword: keyword.to_owned(),
            pattern,
            convert,
        })
    }

    fn match_line<'a>(&self, line: &'a str) -> Option<(&'a str, u64)> {
        let numeral = self.pattern.captures(line)?.get(1)?.as_str();
        let value = (self.convert)(numeral)?;
        Some((numeral, value))
    }
}

// 行を先頭から見て，最初にページ番号か位置番号が見つかった行を返す
pub struct MarkerLocator {
    config: ClippingsConfig,
    // 先に成功したものを採用する
    strategies: Vec<MarkerStrategy>,
}

impl MarkerLocator {
    pub fn new(config: &ClippingsConfig) -> Result<Self> {
        config.validate()?;

        let strategies = vec![
            MarkerStrategy::new(
                MarkerKind::ArabicPage,
                &config.page_keyword,
                "[0-9]+",
                parse_arabic,
            )?,
            MarkerStrategy::new(
                MarkerKind::RomanPage,
                &config.page_keyword,
                "[ivxlcdm]+",
                roman_to_int,
            )?,
            MarkerStrategy::new(
                MarkerKind::ArabicPosition,
                &config.position_keyword,
                "[0-9]+",
                parse_arabic,
            )?,
        ];

        Ok(MarkerLocator {
            config: config.clone(),
            strategies,
        })
    }

    pub fn config(&self) -> &ClippingsConfig {
        &self.config
    }

    pub fn locate(&self, lines: &[&str]) -> Option<Marker> {
        lines.iter().enumerate().find_map(|(line_index, line)| {
            self.strategies.iter().find_map(|strategy| {
                let (numeral, value) = strategy.match_line(line)?;
                Some(Marker {
                    line_index,
                    kind: strategy.kind,
                    keyword: strategy.keyword.clone(),
                    numeral: numeral.to_owned(),
                    value,
                })
            })
        })
    }
}

fn parse_arabic(numeral: &str) -> Option<u64> {
    numeral.parse().ok()
}

// 減算則だけを見る変換．"IIII" や "VX" のような正規でない書き方も値を持つ
pub fn roman_to_int(roman: &str) -> Option<u64> {
    let mut total: i64 = 0;
    let mut prev = 0;

    for c in roman.chars().rev() {
        let value = match c.to_ascii_uppercase() {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };

        total = if value < prev {
            total.checked_sub(value)?
        } else {
            total.checked_add(value)?
        };
        prev = value;
    }

    u64::try_from(total).ok()
}
