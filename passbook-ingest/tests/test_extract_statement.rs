use passbook_core::{Category, Document, LayoutError, Page, Token, profile_for};
use passbook_ingest::{ExtractionFailure, FieldNormalizer, extract, to_transactions};
use std::path::PathBuf;

fn fixture(name: &str) -> Document {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let raw = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn word(text: &str, x0: f64, x1: f64, top: f64) -> Token {
    Token::new(text, x0, x1, top, top + 9.0)
}

/// Header spans chosen so the midpoint rule gives edges 161, 256, 410, 520.
fn generic_header(top: f64) -> Vec<Token> {
    vec![
        word("Date", 10.0, 130.0, top),
        word("Narration", 192.0, 232.0, top),
        word("Withdrawals", 280.0, 360.0, top),
        word("Deposits", 460.0, 500.0, top),
        word("Balance", 540.0, 600.0, top),
    ]
}

#[test]
fn test_single_line_opens_record() {
    let profile = profile_for("generic").unwrap();
    let mut words = generic_header(100.0);
    words.extend([
        word("01/11/25", 10.0, 50.0, 130.0),
        word("UPI-MERCHANT", 180.0, 250.0, 130.0),
        word("708.00", 330.0, 360.0, 130.0),
    ]);
    let out = extract(&[Page::new(612.0, words)], &profile).unwrap();

    let layout = out.layout.as_ref().unwrap();
    let edges: Vec<(f64, f64)> = layout.boundaries.iter().map(|b| (b.x0, b.x1)).collect();
    assert_eq!(
        edges,
        vec![(0.0, 161.0), (161.0, 256.0), (256.0, 410.0), (410.0, 520.0), (520.0, 612.0)]
    );

    assert_eq!(out.records.len(), 1);
    let rec = &out.records[0];
    assert_eq!(rec.get(Category::Date), "01/11/25");
    assert_eq!(rec.get(Category::Narration), "UPI-MERCHANT");
    assert_eq!(rec.get(Category::Withdrawals), "708.00");
    assert_eq!(rec.get(Category::Deposits), "");
    assert_eq!(rec.get(Category::Balance), "");
    assert!(rec.has_column(Category::Deposits));
    assert_eq!(out.failure, None);
}

#[test]
fn test_amount_right_of_410_is_a_deposit() {
    let profile = profile_for("generic").unwrap();
    let mut words = generic_header(100.0);
    words.extend([
        word("01/11/25", 10.0, 50.0, 130.0),
        word("UPI-MERCHANT", 180.0, 250.0, 130.0),
        word("708.00", 430.0, 460.0, 130.0),
    ]);
    let out = extract(&[Page::new(612.0, words)], &profile).unwrap();
    assert_eq!(out.records[0].get(Category::Withdrawals), "");
    assert_eq!(out.records[0].get(Category::Deposits), "708.00");
}

/// A later page without a repeated header may hold a transaction at the
/// header's height; it must not be skipped as a header row.
#[test]
fn test_row_at_header_height_on_later_page_is_kept() {
    let profile = profile_for("generic").unwrap();
    let mut first = generic_header(100.0);
    first.extend([
        word("01/11/25", 10.0, 50.0, 130.0),
        word("FIRST", 180.0, 220.0, 130.0),
    ]);
    let second = vec![
        word("02/11/25", 10.0, 50.0, 60.0),
        word("SECOND", 180.0, 220.0, 60.0),
        word("03/11/25", 10.0, 50.0, 102.0),
        word("THIRD", 180.0, 220.0, 102.0),
        word("04/11/25", 10.0, 50.0, 144.0),
        word("FOURTH", 180.0, 220.0, 144.0),
    ];
    let out = extract(&[Page::new(612.0, first), Page::new(612.0, second)], &profile).unwrap();

    let narrations: Vec<&str> = out.records.iter().map(|r| r.get(Category::Narration)).collect();
    assert_eq!(narrations, vec!["FIRST", "SECOND", "THIRD", "FOURTH"]);
    assert_eq!(out.stats.header_rows, 1);
}

#[test]
fn test_two_category_header_is_not_found() {
    let profile = profile_for("generic").unwrap();
    let words = vec![
        word("Date", 10.0, 40.0, 100.0),
        word("Narration", 180.0, 230.0, 100.0),
        word("01/11/25", 10.0, 50.0, 130.0),
        word("UPI-MERCHANT", 180.0, 250.0, 130.0),
    ];
    let out = extract(&[Page::new(612.0, words)], &profile).unwrap();
    assert!(out.records.is_empty());
    assert!(out.layout.is_none());
    assert_eq!(out.failure, Some(ExtractionFailure::HeaderNotFound { best_match: 2 }));
}

#[test]
fn test_missing_page_width_is_an_error() {
    let profile = profile_for("generic").unwrap();
    let pages = vec![
        Page::new(612.0, generic_header(100.0)),
        Page {
            width: None,
            words: vec![word("02/11/25", 10.0, 50.0, 20.0)],
        },
    ];
    assert_eq!(
        extract(&pages, &profile).unwrap_err(),
        LayoutError::MissingPageWidth { page: 1 }
    );
}

#[test]
fn test_malformed_tokens_are_counted_not_fatal() {
    let profile = profile_for("generic").unwrap();
    let mut words = generic_header(100.0);
    words.extend([
        word("01/11/25", 10.0, 50.0, 130.0),
        word("UPI-MERCHANT", 180.0, 250.0, 130.0),
        Token::new("ghost", f64::NAN, 260.0, 130.0, 139.0),
        Token::new("backwards", 400.0, 380.0, 130.0, 139.0),
    ]);
    let out = extract(&[Page::new(612.0, words)], &profile).unwrap();
    assert_eq!(out.stats.rejected_tokens, 2);
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].get(Category::Narration), "UPI-MERCHANT");
}

#[test]
fn test_empty_document() {
    let profile = profile_for("generic").unwrap();
    let out = extract(&[], &profile).unwrap();
    assert!(out.records.is_empty());
    assert_eq!(out.failure, Some(ExtractionFailure::HeaderNotFound { best_match: 0 }));
}

/// Two HDFC-style pages: a record wraps across the page break and the header
/// is repeated on page two.
#[test]
fn test_hdfc_fixture_across_pages() {
    let doc = fixture("hdfc_two_pages.json");
    let profile = profile_for("hdfc").unwrap();
    let out = extract(&doc.pages, &profile).unwrap();

    let layout = out.layout.as_ref().unwrap();
    assert_eq!(
        layout.categories(),
        vec![
            Category::Date,
            Category::Narration,
            Category::ReferenceNo,
            Category::ValueDate,
            Category::Withdrawals,
            Category::Deposits,
            Category::Balance,
        ]
    );

    let narrations: Vec<&str> = out.records.iter().map(|r| r.get(Category::Narration)).collect();
    assert_eq!(
        narrations,
        vec![
            "UPI-SWIGGY-8812 BANGALORE",
            "NEFT CR-ACME PAYROLL REF SAL NOV",
            "ATM WDL",
        ]
    );
    assert_eq!(out.records[0].get(Category::ReferenceNo), "0000412345");
    assert_eq!(out.records[1].get(Category::Deposits), "50,000.00");
    assert_eq!(out.records[2].get(Category::ValueDate), "03/11/25");

    let stats = &out.stats;
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.lines, 11);
    assert_eq!(stats.preamble_lines, 2);
    assert_eq!(stats.header_rows, 2);
    assert_eq!(stats.noise_lines, 1);
    assert_eq!(stats.continuation_lines, 2);
    assert_eq!(stats.orphan_lines, 1);
    assert_eq!(stats.records, 3);
}

#[test]
fn test_hdfc_fixture_typed_view() {
    let doc = fixture("hdfc_two_pages.json");
    let profile = profile_for("hdfc").unwrap();
    let mut records = extract(&doc.pages, &profile).unwrap().records;
    FieldNormalizer::new(&profile).unwrap().apply(&mut records);

    let (txns, errors) = to_transactions(&records);
    assert!(errors.is_empty());
    let amounts: Vec<f64> = txns.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![-450.0, 50000.0, -2000.0]);
    assert_eq!(txns[2].balance, Some(60550.0));
    assert_eq!(txns[0].reference.as_deref(), Some("0000412345"));
}

#[test]
fn test_extraction_is_deterministic() {
    let doc = fixture("hdfc_two_pages.json");
    let profile = profile_for("hdfc").unwrap();
    let a = extract(&doc.pages, &profile).unwrap();
    let b = extract(&doc.pages, &profile).unwrap();
    assert_eq!(a, b);
}
