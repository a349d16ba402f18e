use std::collections::BTreeMap;

use crate::{
    clippings::{
        marker::MarkerLocator, quote::recover_quote, splitter::ClippingRecord,
        title::normalize_book_title, ExtractionReport, Quote,
    },
    utility::str::truncate_chars,
};

pub type BookCollection = BTreeMap<String, Vec<Quote>>;

pub const UNPROCESSED_MAX_CHARS: usize = 1000;
pub const ELLIPSIS: &str = "...";

// ページ番号も位置番号も見つからなかったクリップ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnprocessedRecord {
    pub ordinal: usize,
    pub book: String,
    pub raw: String, // 1000 文字で切って "..." を付けたもの
}

// 目印はあったが本文が見つからなかったクリップ
// UnprocessedRecord には含めない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotelessMarker {
    pub ordinal: usize,
    pub book: String,
    pub label: String,
    pub following_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Quote { book: String, quote: Quote },
    Quoteless(QuotelessMarker),
    Unprocessed(UnprocessedRecord),
}

// 集めてから最後に一度だけ並べ替える
pub struct BookCollector {
    locator: MarkerLocator,
    books: BookCollection,
    unprocessed: Vec<UnprocessedRecord>,
    quoteless: Vec<QuotelessMarker>,
    record_count: usize,
}

impl BookCollector {
    pub fn new(locator: MarkerLocator) -> Self {
        BookCollector {
            locator,
            books: BookCollection::new(),
            unprocessed: Vec::new(),
            quoteless: Vec::new(),
            record_count: 0,
        }
    }

    pub fn parse_record(&self, record: &ClippingRecord) -> RecordOutcome {
        let book = normalize_book_title(record.lines.first().copied().unwrap_or(""));

        let Some(marker) = self.locator.locate(&record.lines) else {
            let mut raw = truncate_chars(record.raw, UNPROCESSED_MAX_CHARS).to_owned();
            raw.push_str(ELLIPSIS);
            return RecordOutcome::Unprocessed(UnprocessedRecord {
                ordinal: record.ordinal,
                book,
                raw,
            });
        };

        match recover_quote(&record.lines, marker.line_index, self.locator.config()) {
            Some(text) => RecordOutcome::Quote {
                book,
                quote: Quote {
                    label: marker.label(),
                    page: marker.value,
                    text,
                },
            },
            None => RecordOutcome::Quoteless(QuotelessMarker {
                ordinal: record.ordinal,
                book,
                label: marker.label(),
                following_lines: record
                    .lines
                    .iter()
                    .skip(marker.line_index + 1)
                    .take(3)
                    .map(|line| line.trim().to_owned())
                    .collect(),
            }),
        }
    }

    pub fn push(&mut self, record: &ClippingRecord) {
        self.record_count += 1;

        match self.parse_record(record) {
            RecordOutcome::Quote { book, quote } => {
                self.books.entry(book).or_default().push(quote);
            }
            RecordOutcome::Quoteless(marker) => {
                tracing::warn!(
                    "{} found but no valid quote in entry {}: {:?}",
                    marker.label,
                    marker.ordinal,
                    marker.following_lines
                );
                self.quoteless.push(marker);
            }
            RecordOutcome::Unprocessed(unprocessed) => {
                self.unprocessed.push(unprocessed);
            }
        }
    }

    pub fn finish(mut self) -> ExtractionReport {
        // sort_by_key は安定ソートなので同じページは出現順のまま
        for quotes in self.books.values_mut() {
            quotes.sort_by_key(|quote| quote.page);
        }

        ExtractionReport {
            books: self.books,
            unprocessed: self.unprocessed,
            quoteless: self.quoteless,
            record_count: self.record_count,
        }
    }
}
