use anyhow::{bail, ensure, Context, Result};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use kindle_quotes::{
    clippings::{
        collection::BookCollector,
        config::{ClippingsConfig, Language},
        marker::MarkerLocator,
        splitter::split_clippings,
        title::normalize_book_title,
    },
    output::{BuildOut, DEFAULT_OUTPUT_DIR},
};

// 端末から書き出すとこの名前になる
const DEFAULT_INPUT: &str = "My Clippings.txt";

struct Args {
    input_path: PathBuf,
    output_path: PathBuf,
    config: ClippingsConfig,
    dry_run: bool,
    json: bool,
}

fn options() -> getopts::Options {
    let mut opts = getopts::Options::new();
    opts.optopt("o", "output", "output directory", "DIR");
    opts.optopt("l", "language", "export language (es, en, de, it, fr)", "CODE");
    opts.optopt("c", "config", "JSON file overriding the keywords", "FILE");
    opts.optopt("", "page-keyword", "word before page numbers", "WORD");
    opts.optopt("", "position-keyword", "word before position numbers", "WORD");
    opts.optopt("", "added-marker", "phrase starting the date-added line", "TEXT");
    opts.optflag("n", "dry-run", "parse and report without writing files");
    opts.optflag("", "json", "also write quotes.json");
    opts.optflag("h", "help", "print this help");
    opts
}

fn get_args() -> Result<Option<Args>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let opts = options();

    let matches = match opts.parse(&args) {
        Ok(m) => m,
        Err(f) => bail!(f),
    };

    if matches.opt_present("h") {
        print!("{}", opts.usage("Usage: kindle-quotes [options] [INPUT]"));
        return Ok(None);
    }

    ensure!(matches.free.len() <= 1, "too many input files: {:?}", matches.free);

    let input_path = PathBuf::from(matches.free.first().map_or(DEFAULT_INPUT, |s| s.as_str()));
    let output_path = PathBuf::from(
        matches
            .opt_str("o")
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_owned()),
    );

    // 言語の既定値 < 設定ファイル < 個別の指定
    let language = match matches.opt_str("l") {
        Some(code) => Language::of(&code)?,
        None => Language::Spanish,
    };
    let mut config = language.config();
    if let Some(path) = matches.opt_str("c") {
        config = config.merge_json_file(Path::new(&path))?;
    }
    if let Some(keyword) = matches.opt_str("page-keyword") {
        config.page_keyword = keyword;
    }
    if let Some(keyword) = matches.opt_str("position-keyword") {
        config.position_keyword = keyword;
    }
    if let Some(marker) = matches.opt_str("added-marker") {
        config.added_marker = marker;
    }

    Ok(Some(Args {
        input_path,
        output_path,
        config,
        dry_run: matches.opt_present("n"),
        json: matches.opt_present("json"),
    }))
}

fn read_clippings(path: &Path) -> Result<String> {
    ensure!(
        path.exists(),
        "File not found: {} (copy \"{}\" from your e-reader to this folder)",
        path.display(),
        DEFAULT_INPUT
    );

    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    // BOM があればそれに従い，なければ UTF-8
    let (txt, encoding, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        tracing::warn!(
            "{} is not valid {}; invalid bytes were replaced",
            path.display(),
            encoding.name()
        );
    }

    Ok(txt.into_owned())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = get_args()? else {
        return Ok(());
    };

    let locator = MarkerLocator::new(&args.config).context("Invalid keyword configuration")?;

    println!("Processing {}...", args.input_path.display());

    let txt = read_clippings(&args.input_path)?;

    let records = split_clippings(&txt);
    println!("Total entries found: {}", records.len());

    let mut collector = BookCollector::new(locator);

    let pb = create_progress_bar(records.len() as u64);
    for record in records.iter().progress_with(pb) {
        if record.ordinal <= 3 {
            let raw_title = record.lines.first().copied().unwrap_or("");
            tracing::debug!(
                "Entry {}: raw title {:?}, clean title {:?}, lines {:?}",
                record.ordinal,
                raw_title,
                normalize_book_title(raw_title),
                &record.lines[..record.lines.len().min(4)]
            );
        }

        collector.push(record);
    }

    let report = collector.finish();

    let out = if args.dry_run {
        BuildOut::Null
    } else {
        BuildOut::init_file(&args.output_path)?
    };

    let mut created = out.save_books(&report.books)?;
    created.extend(out.save_unprocessed(&report.unprocessed)?);
    if args.json {
        created.extend(out.save_json(&report.books)?);
    }

    for file in &created {
        tracing::info!("Created: {} ({} entries)", file.path.display(), file.entries);
    }

    println!("Finished.");
    println!(
        "Processed {} quotes from {} books",
        report.quote_count(),
        report.books.len()
    );
    if !report.unprocessed.is_empty() {
        println!("{} entries could not be processed", report.unprocessed.len());
    }
    if !report.quoteless.is_empty() {
        println!(
            "{} entries had a page or position but no quote",
            report.quoteless.len()
        );
    }
    if !args.dry_run {
        println!(
            "Created {} files in {}",
            created.len(),
            args.output_path.display()
        );
    }
    println!(
        "Success rate: {:.1}% ({}/{})",
        report.success_rate(),
        report.quote_count(),
        report.record_count
    );

    Ok(())
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{percent:>3}% [{wide_bar:.cyan/blue}] {pos}/{len} [{elapsed_precise} < {eta_precise}]",
        )
        .unwrap()
        .progress_chars("#-"),
    );
    pb
}
