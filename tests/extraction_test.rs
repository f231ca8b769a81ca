//! Extraction tests against real PDF files.

mod common;

use common::{build_pdf, write_pdf, PageBuilder};
use pdftab::{
    extract_tables, extract_tables_from_bytes, extract_tables_with_options, parse_file,
    DetectionMethod, DetectionMode, Error, ExtractOptions, PageSelection, TableExtractor,
    TableFormat,
};

#[test]
fn test_extract_ruled_and_whitespace_tables_in_reading_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(
        dir.path(),
        "mixed.pdf",
        vec![PageBuilder::new().rate_grid().city_table(700.0)],
    );

    let extraction = extract_tables(&path).unwrap();
    assert_eq!(extraction.len(), 2);
    assert_eq!(extraction.rendered.len(), 2);

    let first = &extraction.tables[0];
    assert_eq!(first.method, DetectionMethod::Stream);
    assert_eq!(first.rows[0], vec!["City", "Population"]);
    assert_eq!(first.rows[2], vec!["Bergen", "291,000"]);
    assert_eq!(first.header_rows, 1);

    let second = &extraction.tables[1];
    assert_eq!(second.method, DetectionMethod::Lattice);
    assert_eq!(second.rows, vec![vec!["Code", "Rate"], vec!["A1", "4.5%"]]);
}

#[test]
fn test_tables_are_ordered_by_page() {
    let data = build_pdf(vec![
        PageBuilder::new().rate_grid(),
        PageBuilder::new().city_table(500.0),
    ]);

    let extraction = extract_tables_from_bytes(&data, &ExtractOptions::default()).unwrap();
    let pages: Vec<u32> = extraction.tables.iter().map(|t| t.page).collect();
    assert_eq!(pages, vec![1, 2]);
}

#[test]
fn test_document_without_tables_is_empty_not_error() {
    let data = build_pdf(vec![PageBuilder::new().prose(700.0)]);

    let extraction = extract_tables_from_bytes(&data, &ExtractOptions::default()).unwrap();
    assert!(extraction.is_empty());
    assert!(extraction.rendered.is_empty());
}

#[test]
fn test_blank_document_is_empty() {
    let data = build_pdf(vec![PageBuilder::new()]);
    let extraction = extract_tables_from_bytes(&data, &ExtractOptions::default()).unwrap();
    assert!(extraction.is_empty());
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.pdf");
    let mut data = build_pdf(vec![PageBuilder::new().city_table(700.0)]);
    data.truncate(40);
    std::fs::write(&path, &data).unwrap();

    assert!(extract_tables(&path).is_err());
}

#[test]
fn test_non_pdf_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.pdf");
    std::fs::write(&path, "City Population\nOslo 709000\n").unwrap();

    assert!(matches!(extract_tables(&path), Err(Error::UnknownFormat)));
}

#[test]
fn test_strict_mode_fails_on_broken_page() {
    let data = build_pdf(vec![
        PageBuilder::new().city_table(700.0),
        PageBuilder::new().broken(),
        PageBuilder::new().rate_grid(),
    ]);

    let result = extract_tables_from_bytes(&data, &ExtractOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_lenient_mode_skips_broken_page() {
    let data = build_pdf(vec![
        PageBuilder::new().city_table(700.0),
        PageBuilder::new().broken(),
        PageBuilder::new().rate_grid(),
    ]);

    let extraction = extract_tables_from_bytes(&data, &ExtractOptions::new().lenient()).unwrap();
    let pages: Vec<u32> = extraction.tables.iter().map(|t| t.page).collect();
    assert_eq!(pages, vec![1, 3]);
}

#[test]
fn test_page_selection_limits_search() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(
        dir.path(),
        "three.pdf",
        vec![
            PageBuilder::new().city_table(700.0),
            PageBuilder::new().prose(700.0),
            PageBuilder::new().rate_grid(),
        ],
    );

    let options = ExtractOptions::new().with_pages(PageSelection::parse("2-3").unwrap());
    let extraction = extract_tables_with_options(&path, &options).unwrap();
    assert_eq!(extraction.len(), 1);
    assert_eq!(extraction.tables[0].page, 3);
}

#[test]
fn test_page_out_of_range() {
    let data = build_pdf(vec![PageBuilder::new().city_table(700.0)]);
    let options = ExtractOptions::new().with_pages(PageSelection::parse("1,4").unwrap());

    let result = extract_tables_from_bytes(&data, &options);
    assert!(matches!(result, Err(Error::PageOutOfRange(4, 1))));
}

#[test]
fn test_page_range_out_of_range() {
    let data = build_pdf(vec![PageBuilder::new().city_table(700.0)]);
    let options = ExtractOptions::new().with_pages(PageSelection::parse("5-9").unwrap());

    let result = extract_tables_from_bytes(&data, &options);
    assert!(matches!(result, Err(Error::PageOutOfRange(5, 1))));
}

#[test]
fn test_right_aligned_amounts_stay_in_one_table() {
    let data = build_pdf(vec![PageBuilder::new().income_statement(700.0)]);

    let extraction = extract_tables_from_bytes(&data, &ExtractOptions::new()).unwrap();
    assert_eq!(extraction.tables.len(), 1);

    let table = &extraction.tables[0];
    assert_eq!(table.method, DetectionMethod::Stream);
    assert_eq!(table.row_count(), 6);
    assert_eq!(table.rows[2], vec!["Total operating income", "1,250,000"]);
    assert_eq!(table.rows[5], vec!["Net income", "674,500"]);
}

#[test]
fn test_year_table_is_extracted() {
    let data = build_pdf(vec![PageBuilder::new().year_table(600.0)]);

    let extraction = extract_tables_from_bytes(&data, &ExtractOptions::new()).unwrap();
    assert_eq!(extraction.tables.len(), 1);
    assert_eq!(extraction.tables[0].rows[1], vec!["2021", "1,200"]);
    assert_eq!(extraction.tables[0].header_rows, 1);
}

#[test]
fn test_side_by_side_tables_left_first() {
    let data = build_pdf(vec![PageBuilder::new().rate_grid().price_list()]);

    let extraction = extract_tables_from_bytes(&data, &ExtractOptions::new()).unwrap();
    let methods: Vec<DetectionMethod> = extraction.tables.iter().map(|t| t.method).collect();
    assert_eq!(methods, vec![DetectionMethod::Lattice, DetectionMethod::Stream]);
    assert_eq!(extraction.tables[0].rows[0], vec!["Code", "Rate"]);
    assert_eq!(extraction.tables[1].rows[2], vec!["Ink", "3"]);
}

#[test]
fn test_lattice_mode_ignores_whitespace_tables() {
    let data = build_pdf(vec![PageBuilder::new().rate_grid().city_table(700.0)]);

    let extraction = TableExtractor::new()
        .with_mode(DetectionMode::Lattice)
        .extract_bytes(&data)
        .unwrap();
    assert_eq!(extraction.len(), 1);
    assert_eq!(extraction.tables[0].method, DetectionMethod::Lattice);
}

#[test]
fn test_rendered_in_requested_format() {
    let data = build_pdf(vec![PageBuilder::new().city_table(700.0)]);

    let extraction = TableExtractor::new()
        .with_format(TableFormat::Markdown)
        .extract_bytes(&data)
        .unwrap();
    assert_eq!(
        extraction.rendered[0],
        "| City | Population |\n| --- | --- |\n| Oslo | 709,000 |\n| Bergen | 291,000 |\n"
    );

    let extraction = TableExtractor::new()
        .with_format(TableFormat::Text)
        .extract_bytes(&data)
        .unwrap();
    assert_eq!(
        extraction.rendered[0],
        "  City Population\n  Oslo    709,000\nBergen    291,000"
    );
}

#[test]
fn test_parse_file_reports_spans_and_rulings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pdf(dir.path(), "grid.pdf", vec![PageBuilder::new().rate_grid()]);

    let document = parse_file(&path).unwrap();
    assert_eq!(document.page_count(), 1);

    let page = document.page(1).unwrap();
    assert_eq!(page.width, 612.0);
    assert_eq!(page.spans.len(), 4);
    assert_eq!(page.rulings.len(), 6);

    let code = page.spans.iter().find(|s| s.text == "Code").unwrap();
    assert_eq!(code.x, 55.0);
    assert_eq!(code.y, 286.0);
    assert_eq!(code.font_size, 10.0);
}
