use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{
    clippings::{
        collection::{BookCollection, UnprocessedRecord},
        Quote,
    },
    utility::str::{collapse_whitespace, truncate_chars},
};

pub const DEFAULT_OUTPUT_DIR: &str = "books_by_title";
pub const UNPROCESSED_FILE_NAME: &str = "no-processed.txt";
pub const JSON_FILE_NAME: &str = "quotes.json";

const FILE_STEM_MAX_CHARS: usize = 50;

static REGEX_FILE_NAME_UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}_\s()\-]").unwrap());

pub fn sanitize_file_stem(book: &str) -> String {
    let stem = REGEX_FILE_NAME_UNSAFE.replace_all(book, "");
    let stem = collapse_whitespace(&stem).replace(' ', "_");
    let stem = truncate_chars(&stem, FILE_STEM_MAX_CHARS);

    if stem.is_empty() {
        "Unknown_Book".to_owned()
    } else {
        stem.to_owned()
    }
}

// 正規化後の書名が違っても同じファイル名になることがあるので番号を付けて避ける
fn unique_file_name(book: &str, used: &mut HashSet<String>) -> String {
    let stem = sanitize_file_stem(book);

    let mut name = format!("{}.txt", stem);
    let mut n = 2;
    while used.contains(&name) || name == UNPROCESSED_FILE_NAME {
        name = format!("{}_{}.txt", stem, n);
        n += 1;
    }

    used.insert(name.clone());
    name
}

pub fn render_book(book: &str, quotes: &[Quote]) -> String {
    let mut txt = String::new();

    txt.push_str(&format!("📚 {}\n", book));
    txt.push_str(&format!("{}\n", "=".repeat(60)));
    txt.push_str(&format!("Total quotes: {}\n\n", quotes.len()));

    for quote in quotes {
        txt.push_str(&format!("{}\n", quote.label));
        txt.push_str(&format!("{}\n\n", quote.text));
    }

    txt
}

pub fn render_unprocessed(records: &[UnprocessedRecord]) -> String {
    let mut txt = String::new();

    txt.push_str("⚠️ UNPROCESSED ENTRIES (could not extract page/position or quote)\n");
    txt.push_str(&format!("{}\n\n", "=".repeat(70)));

    for record in records {
        txt.push_str(&format!(
            "🔸 Entry #{} | Book: {}\n",
            record.ordinal, record.book
        ));
        txt.push_str(&format!("{}\n", "-".repeat(50)));
        txt.push_str(&format!("{}\n", record.raw));
        txt.push_str(&format!("\n{}\n\n", "=".repeat(50)));
    }

    txt
}

#[derive(Serialize)]
struct BookExport<'a> {
    book: &'a str,
    quotes: &'a [Quote],
}

pub fn render_json(books: &BookCollection) -> Result<String> {
    let export: Vec<_> = books
        .iter()
        .map(|(book, quotes)| BookExport { book, quotes })
        .collect();

    Ok(serde_json::to_string_pretty(&export)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedFile {
    pub path: PathBuf,
    pub entries: usize,
}

// Null は解析だけ行う (--dry-run)
pub enum BuildOut {
    Null,
    File { root: PathBuf },
}

impl BuildOut {
    pub fn init_file(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create output directory: {}", root.display()))?;

        Ok(Self::File {
            root: root.to_path_buf(),
        })
    }

    fn write(&self, file_name: &str, content: &str, entries: usize) -> Result<Option<CreatedFile>> {
        let BuildOut::File { root } = &self else {
            return Ok(None);
        };

        let path = root.join(file_name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(Some(CreatedFile { path, entries }))
    }

    pub fn save_books(&self, books: &BookCollection) -> Result<Vec<CreatedFile>> {
        let mut used = HashSet::new();
        let mut created = Vec::new();

        for (book, quotes) in books {
            let file_name = unique_file_name(book, &mut used);
            let content = render_book(book, quotes);
            created.extend(self.write(&file_name, &content, quotes.len())?);
        }

        Ok(created)
    }

    pub fn save_unprocessed(&self, records: &[UnprocessedRecord]) -> Result<Option<CreatedFile>> {
        if records.is_empty() {
            return Ok(None);
        }

        self.write(
            UNPROCESSED_FILE_NAME,
            &render_unprocessed(records),
            records.len(),
        )
    }

    pub fn save_json(&self, books: &BookCollection) -> Result<Option<CreatedFile>> {
        let json = render_json(books)?;
        self.write(JSON_FILE_NAME, &json, books.len())
    }
}
