// 電子書籍リーダーの「クリップ」書き出し (My Clippings.txt) の解析
//
// 1 件のクリップは次のような形で "==========" の行で区切られている：
//
//   タイトル (著者)
//   - Tu resaltado en la página 42 | posición 640-641 | Añadido el lunes, ...
//
//   本文
//   ==========
//
// 書き出しの言語によってキーワードが変わるので ClippingsConfig で差し替える．
// 解析に失敗したクリップは全体を止めずに UnprocessedRecord として残す．

pub mod collection;
pub mod config;
pub mod marker;
pub mod quote;
pub mod splitter;
pub mod title;

use anyhow::Result;
use serde::Serialize;

use crate::clippings::{
    collection::{BookCollection, BookCollector, QuotelessMarker, UnprocessedRecord},
    config::ClippingsConfig,
    marker::MarkerLocator,
    splitter::split_clippings,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub label: String,
    pub page: u64,
    pub text: String,
}

#[derive(Debug)]
pub struct ExtractionReport {
    pub books: BookCollection,
    pub unprocessed: Vec<UnprocessedRecord>,
    pub quoteless: Vec<QuotelessMarker>,
    // 空でないクリップの数 (成功率の分母)
    pub record_count: usize,
}

impl ExtractionReport {
    pub fn quote_count(&self) -> usize {
        self.books.values().map(|quotes| quotes.len()).sum()
    }

    pub fn success_rate(&self) -> f64 {
        if self.record_count == 0 {
            return 0.0;
        }
        self.quote_count() as f64 / self.record_count as f64 * 100.0
    }
}

// 書き出し全体を一度に処理する
pub fn extract_quotes(txt: &str, config: &ClippingsConfig) -> Result<ExtractionReport> {
    let locator = MarkerLocator::new(config)?;
    let mut collector = BookCollector::new(locator);

    for record in split_clippings(txt) {
        collector.push(&record);
    }

    Ok(collector.finish())
}
