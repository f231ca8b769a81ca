//! Builders for small PDFs used by the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Content of one test page.
#[derive(Default)]
pub struct PageBuilder {
    ops: Vec<Operation>,
    broken: bool,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` in 10pt Helvetica with its baseline at (x, y).
    pub fn text(mut self, text: &str, x: f32, y: f32) -> Self {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
        self
    }

    /// Show `text` so that it ends at `right`; each glyph is 5pt wide.
    pub fn text_right(self, text: &str, right: f32, y: f32) -> Self {
        let x = right - text.len() as f32 * 5.0;
        self.text(text, x, y)
    }

    /// Stroke a straight line.
    pub fn line(mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        self.ops.extend([
            Operation::new("m", vec![x0.into(), y0.into()]),
            Operation::new("l", vec![x1.into(), y1.into()]),
            Operation::new("S", vec![]),
        ]);
        self
    }

    /// Make the page's Contents entry unreadable.
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    /// Whitespace-aligned table: City / Population, two data rows.
    pub fn city_table(self, top: f32) -> Self {
        self.text("City", 60.0, top)
            .text("Population", 200.0, top)
            .text("Oslo", 60.0, top - 15.0)
            .text("709,000", 200.0, top - 15.0)
            .text("Bergen", 60.0, top - 30.0)
            .text("291,000", 200.0, top - 30.0)
    }

    /// Ruled 2x2 table between y=260 and y=300.
    pub fn rate_grid(mut self) -> Self {
        for y in [300.0, 280.0, 260.0] {
            self = self.line(50.0, y, 250.0, y);
        }
        for x in [50.0, 150.0, 250.0] {
            self = self.line(x, 260.0, x, 300.0);
        }
        self.text("Code", 55.0, 286.0)
            .text("Rate", 155.0, 286.0)
            .text("A1", 55.0, 266.0)
            .text("4.5%", 155.0, 266.0)
    }

    /// Labels at x=60 with amounts right-aligned at x=300; the widest
    /// amount is in the third row.
    pub fn income_statement(mut self, top: f32) -> Self {
        let rows = [
            ("Line item", "Amount"),
            ("Revenue", "480,500"),
            ("Total operating income", "1,250,000"),
            ("Cost of sales", "120,000"),
            ("Tax", "95,000"),
            ("Net income", "674,500"),
        ];
        for (i, (label, amount)) in rows.into_iter().enumerate() {
            let y = top - i as f32 * 15.0;
            self = self.text(label, 60.0, y).text_right(amount, 300.0, y);
        }
        self
    }

    /// Year / Revenue table whose first column holds bare numbers.
    pub fn year_table(self, top: f32) -> Self {
        self.text("Year", 60.0, top)
            .text("Revenue", 160.0, top)
            .text("2021", 60.0, top - 15.0)
            .text("1,200", 160.0, top - 15.0)
            .text("2022", 60.0, top - 30.0)
            .text("1,450", 160.0, top - 30.0)
            .text("2023", 60.0, top - 45.0)
            .text("1,610", 160.0, top - 45.0)
    }

    /// Whitespace table to the right of [`rate_grid`](Self::rate_grid), on
    /// the same lines.
    pub fn price_list(self) -> Self {
        self.text("Item", 330.0, 296.0)
            .text("Qty", 430.0, 296.0)
            .text("Pens", 330.0, 281.0)
            .text("12", 430.0, 281.0)
            .text("Ink", 330.0, 266.0)
            .text("3", 430.0, 266.0)
    }

    /// A paragraph of running text, no table.
    pub fn prose(self, top: f32) -> Self {
        self.text("Quarterly results were in line with expectations.", 72.0, top)
            .text("The board will meet again in the spring.", 72.0, top - 14.0)
    }
}

/// Build a PDF with one page per builder.
pub fn build_pdf(pages: Vec<PageBuilder>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let contents: Object = if page.broken {
            Object::Integer(5)
        } else {
            let content = Content {
                operations: page.ops,
            };
            let data = content.encode().expect("encode content");
            doc.add_object(Stream::new(dictionary! {}, data)).into()
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}

/// Write a PDF into `dir` and return its path.
pub fn write_pdf(dir: &std::path::Path, name: &str, pages: Vec<PageBuilder>) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages)).expect("write pdf");
    path
}
