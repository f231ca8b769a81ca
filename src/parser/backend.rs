//! PDF backend abstraction layer.
//!
//! The interpreter and table finders never touch lopdf types directly; they
//! see pages, fonts and decoded content operations through [`PdfBackend`].

use std::collections::{BTreeMap, HashMap};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Default page size (US Letter) when no MediaBox is found.
pub const LETTER: (f32, f32) = (612.0, 792.0);

/// Horizontal glyph metrics of a simple font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Character code of `widths[0]`
    pub first_char: u32,
    /// Glyph widths in thousandths of text space
    pub widths: Vec<f32>,
    /// Width used for codes outside the table
    pub missing_width: f32,
}

impl FontMetrics {
    /// Width of a character code in thousandths of text space.
    pub fn glyph_width(&self, code: u32) -> f32 {
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(self.missing_width)
    }
}

/// Font information returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
    /// Whether the font uses two-byte character codes (Type0).
    pub two_byte: bool,
    /// Widths table, when the font carries one.
    pub metrics: Option<FontMetrics>,
}

/// Fonts of one page keyed by resource name (e.g., `F1`).
pub type FontTable = HashMap<Vec<u8>, BackendFontInfo>;

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }
}

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Page width and height from the (possibly inherited) MediaBox.
    fn page_size(&self, page: PageId) -> (f32, f32);

    /// Fonts reachable from the page resources.
    fn page_fonts(&self, page: PageId) -> Result<FontTable>;

    /// Return the raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to [`decode_text_simple`] if the encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Text decoding fallback when no font encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Self::checked(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::checked(doc)
    }

    // lopdf already tried the empty user password while loading; a document
    // that failed that came back as Error::Encrypted.
    fn checked(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            log::debug!("Document is encrypted with an empty user password");
        }
        Ok(Self { doc })
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    fn media_box(&self, page: ObjectId) -> Option<(f32, f32)> {
        let mut current = Some(page);
        // Parent chains are short; the bound guards against cycles.
        for _ in 0..32 {
            let dict = self.doc.get_dictionary(current?).ok()?;
            if let Ok(mb) = dict.get(b"MediaBox") {
                let arr = self.resolve(mb).as_array().ok()?;
                if arr.len() >= 4 {
                    let nums: Vec<f32> = arr
                        .iter()
                        .map(|o| self.resolve(o).as_float().unwrap_or(0.0))
                        .collect();
                    return Some(((nums[2] - nums[0]).abs(), (nums[3] - nums[1]).abs()));
                }
                return None;
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }
        None
    }

    fn font_info(&self, font: &Dictionary) -> BackendFontInfo {
        let base_font = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let two_byte = font
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Type0");

        BackendFontInfo {
            base_font,
            two_byte,
            metrics: self.font_metrics(font),
        }
    }

    fn font_metrics(&self, font: &Dictionary) -> Option<FontMetrics> {
        let widths = self.resolve(font.get(b"Widths").ok()?).as_array().ok()?;
        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| self.resolve(o).as_i64().ok())
            .unwrap_or(0)
            .max(0) as u32;

        let missing_width = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve(o).as_dict().ok())
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|o| self.resolve(o).as_float().ok())
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_GLYPH_WIDTH);

        Some(FontMetrics {
            first_char,
            widths: widths
                .iter()
                .map(|w| self.resolve(w).as_float().unwrap_or(0.0))
                .collect(),
            missing_width,
        })
    }
}

/// Glyph width assumed when a font has no metrics (thousandths of an em).
pub const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_size(&self, page: PageId) -> (f32, f32) {
        self.media_box(page).unwrap_or(LETTER)
    }

    fn page_fonts(&self, page: PageId) -> Result<FontTable> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(fonts
            .iter()
            .map(|(name, dict)| (name.clone(), self.font_info(dict)))
            .collect())
    }

    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        // A page without Contents is blank, not broken.
        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        let streams: Vec<&Object> = match self.resolve(contents) {
            Object::Array(arr) => arr.iter().collect(),
            other => vec![other],
        };

        let mut content = Vec::new();
        for obj in streams {
            match self.resolve(obj) {
                Object::Stream(s) => {
                    let data = s
                        .decompressed_content()
                        .unwrap_or_else(|_| s.content.clone());
                    content.extend_from_slice(&data);
                    content.push(b'\n');
                }
                _ => return Err(Error::PdfParse("Invalid content stream".to_string())),
            }
        }
        Ok(content)
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Helper: extract a number from a [`PdfValue`].
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(r) => Some(*r),
        _ => None,
    }
}
