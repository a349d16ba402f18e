use std::fs;

use anyhow::Result;
use proptest::prelude::*;

use kindle_quotes::{
    clippings::{
        collection::{ELLIPSIS, UNPROCESSED_MAX_CHARS},
        config::{ClippingsConfig, Language},
        extract_quotes,
        marker::roman_to_int,
    },
    output::{BuildOut, JSON_FILE_NAME, UNPROCESSED_FILE_NAME},
};

static CLIPPINGS_PATH: &str = "./tests/my_clippings.txt";

fn texts<'a>(quotes: &'a [kindle_quotes::clippings::Quote]) -> Vec<&'a str> {
    quotes.iter().map(|quote| quote.text.as_str()).collect()
}

#[test]
fn test_spanish_export() -> Result<()> {
    let txt = fs::read_to_string(CLIPPINGS_PATH)?;
    let report = extract_quotes(&txt, &ClippingsConfig::default())?;

    assert_eq!(
        report.books.keys().collect::<Vec<_>>(),
        vec!["El nombre del viento, Patrick Rothfuss", "Sapiens, Harari, Yuval Noah"]
    );

    let sapiens = &report.books["Sapiens, Harari, Yuval Noah"];
    assert_eq!(
        texts(sapiens),
        vec![
            "La revolución cognitiva.",
            "Prólogo citado.",
            "Somos lo que compartimos."
        ]
    );
    assert_eq!(
        sapiens.iter().map(|q| q.label.as_str()).collect::<Vec<_>>(),
        vec!["página 7", "página xiv", "página 42"]
    );

    let viento = &report.books["El nombre del viento, Patrick Rothfuss"];
    assert_eq!(viento.len(), 1);
    assert_eq!(viento[0].label, "posición 813");
    assert_eq!(viento[0].page, 813);

    assert_eq!(report.unprocessed.len(), 1);
    assert_eq!(report.unprocessed[0].ordinal, 5);
    assert_eq!(report.unprocessed[0].book, "Notas sueltas");

    assert_eq!(report.quoteless.len(), 1);
    assert_eq!(report.quoteless[0].ordinal, 4);
    assert_eq!(report.quoteless[0].label, "posición 900");

    assert_eq!(report.record_count, 6);
    assert_eq!(report.quote_count(), 4);
    assert!((report.success_rate() - 66.666).abs() < 0.01);

    Ok(())
}

#[test]
fn test_english_export() -> Result<()> {
    let txt = "\
The Hobbit (J.R.R. Tolkien)
- Your Highlight on page 12 | Location 170-171 | Added on Monday, 3 March 2024 10:15:02

In a hole in the ground there lived a hobbit.
==========
The Hobbit (J.R.R. Tolkien)
- Your Highlight on Location 95-96 | Added on Monday, 3 March 2024 10:16:00

Not a nasty, dirty, wet hole.
==========
";
    let report = extract_quotes(txt, &Language::English.config())?;

    let hobbit = &report.books["The Hobbit, J R R Tolkien"];
    assert_eq!(
        hobbit.iter().map(|q| q.label.as_str()).collect::<Vec<_>>(),
        vec!["page 12", "location 95"]
    );
    assert!(report.unprocessed.is_empty());

    // 既定のスペイン語設定では何も見つからない
    let report = extract_quotes(txt, &ClippingsConfig::default())?;
    assert!(report.books.is_empty());
    assert_eq!(report.unprocessed.len(), 2);

    Ok(())
}

#[test]
fn test_write_output_directory() -> Result<()> {
    let txt = fs::read_to_string(CLIPPINGS_PATH)?;
    let report = extract_quotes(&txt, &ClippingsConfig::default())?;

    let dir = tempfile::tempdir()?;
    let root = dir.path().join("books_by_title");
    let out = BuildOut::init_file(&root)?;

    let created = out.save_books(&report.books)?;
    assert_eq!(
        created.iter().map(|file| file.entries).collect::<Vec<_>>(),
        vec![1, 3]
    );

    let sapiens = fs::read_to_string(root.join("Sapiens_Harari_Yuval_Noah.txt"))?;
    assert!(sapiens.starts_with("📚 Sapiens, Harari, Yuval Noah\n"));
    assert!(sapiens.contains("Total quotes: 3\n"));
    assert!(sapiens.contains("página xiv\nPrólogo citado.\n\n"));

    let unprocessed = out.save_unprocessed(&report.unprocessed)?.unwrap();
    assert_eq!(unprocessed.path, root.join(UNPROCESSED_FILE_NAME));
    let unprocessed = fs::read_to_string(&unprocessed.path)?;
    assert!(unprocessed.contains("🔸 Entry #5 | Book: Notas sueltas\n"));

    out.save_json(&report.books)?;
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join(JSON_FILE_NAME))?)?;
    assert_eq!(json[1]["book"], "Sapiens, Harari, Yuval Noah");
    assert_eq!(json[1]["quotes"][0]["page"], 7);

    Ok(())
}

#[test]
fn test_blank_input() -> Result<()> {
    let report = extract_quotes("\n==========\n \n==========\n", &ClippingsConfig::default())?;
    assert!(report.books.is_empty());
    assert!(report.unprocessed.is_empty());
    assert_eq!(report.record_count, 0);
    assert_eq!(report.success_rate(), 0.0);
    Ok(())
}

fn to_roman(mut n: u64) -> String {
    const TABLE: &[(u64, &str)] = &[
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut roman = String::new();
    for &(value, symbol) in TABLE {
        while n >= value {
            roman.push_str(symbol);
            n -= value;
        }
    }
    roman
}

proptest! {
    #[test]
    fn roman_numerals_round_trip(n in 1u64..4000) {
        prop_assert_eq!(roman_to_int(&to_roman(n)), Some(n));
        prop_assert_eq!(roman_to_int(&to_roman(n).to_lowercase()), Some(n));
    }

    #[test]
    fn quotes_are_sorted_stably(pages in prop::collection::vec(0u64..20, 1..40)) {
        let txt: String = pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                format!(
                    "Libro (Autor)\n- Tu resaltado en la página {} | Añadido el lunes\n\ncita {}\n==========\n",
                    page, i
                )
            })
            .collect();

        let report = extract_quotes(&txt, &ClippingsConfig::default()).unwrap();
        let quotes = &report.books["Libro, Autor"];

        let mut expected: Vec<(u64, String)> = pages
            .iter()
            .enumerate()
            .map(|(i, &page)| (page, format!("cita {}", i)))
            .collect();
        expected.sort_by_key(|(page, _)| *page);

        let actual: Vec<(u64, String)> = quotes
            .iter()
            .map(|quote| (quote.page, quote.text.clone()))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn unprocessed_text_is_truncated(body in "[a-z ñ\n]{0,3000}") {
        let txt = format!("Libro\n{}\n==========\n", body);
        let report = extract_quotes(&txt, &ClippingsConfig::default()).unwrap();

        for record in &report.unprocessed {
            prop_assert!(record.raw.chars().count() <= UNPROCESSED_MAX_CHARS + ELLIPSIS.len());
            prop_assert!(record.raw.ends_with(ELLIPSIS));
        }
    }
}
