//! Positioned page content.

use serde::{Deserialize, Serialize};

use super::geometry::{BBox, Ruling};

/// A run of text with position and style information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Advance width of the text
    pub width: f32,
    /// Font size in points, after text and user space scaling
    pub font_size: f32,
    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font appears to be bold
    pub is_bold: bool,
}

impl TextSpan {
    /// Create a new text span; boldness is inferred from the font name.
    pub fn new(
        text: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        font_size: f32,
        font_name: impl Into<String>,
    ) -> Self {
        let font_name = font_name.into();
        let lower = font_name.to_lowercase();
        let is_bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");

        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
            font_name,
            is_bold,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Approximate top, from the ascender.
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    /// Approximate bottom, from the descender.
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }

    /// Horizontal centre.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical centre of the glyph box.
    pub fn center_y(&self) -> f32 {
        (self.top() + self.bottom()) / 2.0
    }

    pub fn bbox(&self) -> BBox {
        BBox::from_corners(self.x, self.bottom(), self.right(), self.top())
    }
}

/// Everything the table finders need from one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// 1-based page number
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Text spans in content-stream order
    pub spans: Vec<TextSpan>,
    /// Painted horizontal and vertical lines
    pub rulings: Vec<Ruling>,
}

impl PageLayout {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            spans: Vec::new(),
            rulings: Vec::new(),
        }
    }

    /// Create an empty US Letter page.
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Whether the page has no text.
    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }
}

/// A parsed document: ordered pages of positioned elements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Pages in document order (only the selected ones)
    pub pages: Vec<PageLayout>,
    /// Total pages in the source file, selected or not
    pub total_pages: u32,
    /// Declared PDF version
    pub version: String,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn add_page(&mut self, page: PageLayout) {
        self.pages.push(page);
    }

    /// Number of pages held.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Look up a page by its 1-based number.
    pub fn page(&self, number: u32) -> Option<&PageLayout> {
        self.pages.iter().find(|p| p.number == number)
    }
}
