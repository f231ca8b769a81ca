//! Content stream interpretation.
//!
//! Walks the decoded operations of one page, tracking the graphics and text
//! state, and records two things: text spans with their user-space position,
//! and painted axis-aligned lines (rulings).

use crate::model::{BBox, Ruling, TextSpan};

use super::backend::{
    get_number_from_value, ContentOp, FontTable, PdfValue, DEFAULT_GLYPH_WIDTH,
};

/// Segments whose minor extent is within this many points count as straight.
const AXIS_TOLERANCE: f32 = 1.0;

/// Filled rectangles thinner than this are drawn lines, not boxes.
const THIN_RECT: f32 = 2.0;

/// TJ adjustments beyond this (thousandths of an em) read as a word break.
const SPACE_KERN_THRESHOLD: f32 = 200.0;

/// 2D affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Spans and rulings found on one page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub spans: Vec<TextSpan>,
    pub rulings: Vec<Ruling>,
}

#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    size: f32,
    char_spacing: f32,
    word_spacing: f32,
    /// Horizontal scaling as a fraction (Tz / 100)
    scaling: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            scaling: 1.0,
            leading: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
}

/// Path under construction, in user space.
#[derive(Debug, Default)]
struct PathBuilder {
    start: Option<(f32, f32)>,
    current: Option<(f32, f32)>,
    segments: Vec<((f32, f32), (f32, f32))>,
    rects: Vec<BBox>,
}

impl PathBuilder {
    fn move_to(&mut self, p: (f32, f32)) {
        self.start = Some(p);
        self.current = Some(p);
    }

    fn line_to(&mut self, p: (f32, f32)) {
        if let Some(from) = self.current {
            self.segments.push((from, p));
        } else {
            self.start = Some(p);
        }
        self.current = Some(p);
    }

    fn close(&mut self) {
        if let (Some(from), Some(to)) = (self.current, self.start) {
            if from != to {
                self.segments.push((from, to));
            }
            self.current = Some(to);
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Stateful interpreter for one page's content stream.
pub struct ContentInterpreter<'a> {
    fonts: &'a FontTable,
    decode: &'a dyn Fn(&[u8], &[u8]) -> String,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text: bool,
    path: PathBuilder,
    out: PageContent,
}

impl<'a> ContentInterpreter<'a> {
    /// Create an interpreter.
    ///
    /// `decode` turns `(font resource name, string bytes)` into text.
    pub fn new(fonts: &'a FontTable, decode: &'a dyn Fn(&[u8], &[u8]) -> String) -> Self {
        Self {
            fonts,
            decode,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text: false,
            path: PathBuilder::default(),
            out: PageContent::default(),
        }
    }

    /// Run all operations and return what was found.
    pub fn run(mut self, ops: &[ContentOp]) -> PageContent {
        for op in ops {
            self.apply(op);
        }
        if !self.stack.is_empty() {
            log::debug!("Content stream left {} unbalanced q", self.stack.len());
        }
        self.out
    }

    fn apply(&mut self, op: &ContentOp) {
        let nums = |i: usize| op.operands.get(i).and_then(get_number_from_value);

        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(&op.operands) {
                    self.state.ctm = m.multiply(&self.state.ctm);
                }
            }

            "BT" => {
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.state.text.font = name.clone();
                }
                if let Some(size) = nums(1) {
                    self.state.text.size = size;
                }
            }
            "Tc" => self.state.text.char_spacing = nums(0).unwrap_or(0.0),
            "Tw" => self.state.text.word_spacing = nums(0).unwrap_or(0.0),
            "Tz" => self.state.text.scaling = nums(0).unwrap_or(100.0) / 100.0,
            "TL" => self.state.text.leading = nums(0).unwrap_or(0.0),
            "Td" => self.move_line(nums(0).unwrap_or(0.0), nums(1).unwrap_or(0.0)),
            "TD" => {
                let ty = nums(1).unwrap_or(0.0);
                self.state.text.leading = -ty;
                self.move_line(nums(0).unwrap_or(0.0), ty);
            }
            "Tm" => {
                if let Some(m) = matrix_operands(&op.operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(s @ PdfValue::Str(_)) = op.operands.first() {
                    self.show(std::slice::from_ref(s));
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(s @ PdfValue::Str(_)) = op.operands.first() {
                    self.show(std::slice::from_ref(s));
                }
            }
            "\"" => {
                self.state.text.word_spacing = nums(0).unwrap_or(0.0);
                self.state.text.char_spacing = nums(1).unwrap_or(0.0);
                self.next_line();
                if let Some(s @ PdfValue::Str(_)) = op.operands.get(2) {
                    self.show(std::slice::from_ref(s));
                }
            }

            "m" => {
                if let (Some(x), Some(y)) = (nums(0), nums(1)) {
                    let p = self.state.ctm.apply(x, y);
                    self.path.move_to(p);
                }
            }
            "l" => {
                if let (Some(x), Some(y)) = (nums(0), nums(1)) {
                    let p = self.state.ctm.apply(x, y);
                    self.path.line_to(p);
                }
            }
            "h" => self.path.close(),
            "re" => {
                if let (Some(x), Some(y), Some(w), Some(h)) = (nums(0), nums(1), nums(2), nums(3)) {
                    let ctm = self.state.ctm;
                    let corners = [
                        ctm.apply(x, y),
                        ctm.apply(x + w, y),
                        ctm.apply(x + w, y + h),
                        ctm.apply(x, y + h),
                    ];
                    let bbox = corners[1..].iter().fold(
                        BBox::from_corners(corners[0].0, corners[0].1, corners[2].0, corners[2].1),
                        |acc, &(px, py)| acc.union(&BBox::from_corners(px, py, px, py)),
                    );
                    self.path.rects.push(bbox);
                    self.path.move_to(corners[0]);
                }
            }
            "s" | "b" | "b*" => {
                self.path.close();
                self.paint();
            }
            "S" | "f" | "F" | "f*" | "B" | "B*" => self.paint(),
            "n" => self.path.clear(),

            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.text.leading;
        self.move_line(0.0, -leading);
    }

    /// Show a sequence of strings and kerning adjustments as one span.
    fn show(&mut self, items: &[PdfValue]) {
        if !self.in_text {
            return;
        }

        let start_trm = self.text_matrix.multiply(&self.state.ctm);
        let (x, y) = start_trm.apply(0.0, 0.0);
        let font_size = self.state.text.size * start_trm.vertical_scale();

        let mut text = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    text.push_str(&(self.decode)(&self.state.text.font, bytes));
                    let tx = self.advance_width(bytes);
                    self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -get_number_from_value(item).unwrap_or(0.0);
                    let tx = adjustment / 1000.0 * self.state.text.size * self.state.text.scaling;
                    self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);

                    if adjustment > SPACE_KERN_THRESHOLD && needs_word_space(&text) {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }

        if text.trim().is_empty() {
            return;
        }

        let end_x = self.text_matrix.multiply(&self.state.ctm).apply(0.0, 0.0).0;
        let font_name = self
            .fonts
            .get(&self.state.text.font)
            .map(|f| f.base_font.clone())
            .unwrap_or_else(|| String::from_utf8_lossy(&self.state.text.font).to_string());

        self.out.spans.push(TextSpan::new(
            text,
            x,
            y,
            (end_x - x).max(0.0),
            font_size,
            font_name,
        ));
    }

    /// Horizontal displacement of a string in text space.
    fn advance_width(&self, bytes: &[u8]) -> f32 {
        let ts = &self.state.text;
        let font = self.fonts.get(&ts.font);
        let two_byte = font.is_some_and(|f| f.two_byte);
        let metrics = font.and_then(|f| f.metrics.as_ref()).filter(|_| !two_byte);

        let codes: Vec<u32> = if two_byte {
            bytes
                .chunks(2)
                .map(|c| c.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32))
                .collect()
        } else {
            bytes.iter().map(|&b| b as u32).collect()
        };

        codes
            .iter()
            .map(|&code| {
                let w0 = metrics
                    .map(|m| m.glyph_width(code))
                    .unwrap_or(DEFAULT_GLYPH_WIDTH)
                    / 1000.0;
                let word = if !two_byte && code == 32 {
                    ts.word_spacing
                } else {
                    0.0
                };
                (w0 * ts.size + ts.char_spacing + word) * ts.scaling
            })
            .sum()
    }

    fn paint(&mut self) {
        let path = std::mem::take(&mut self.path);

        for ((x0, y0), (x1, y1)) in path.segments {
            if let Some(r) = Ruling::from_segment(x0, y0, x1, y1, AXIS_TOLERANCE) {
                self.out.rulings.push(r);
            }
        }

        for rect in path.rects {
            self.out.rulings.extend(rect_rulings(&rect));
        }
    }
}

/// Rulings drawn by a rectangle: one line if it is thin, else its four edges.
fn rect_rulings(rect: &BBox) -> Vec<Ruling> {
    let (w, h) = (rect.width(), rect.height());
    let mid_x = (rect.left + rect.right) / 2.0;
    let mid_y = (rect.bottom + rect.top) / 2.0;

    if w <= THIN_RECT && h <= THIN_RECT {
        return Vec::new();
    }
    if h <= THIN_RECT {
        return Ruling::from_segment(rect.left, mid_y, rect.right, mid_y, AXIS_TOLERANCE)
            .into_iter()
            .collect();
    }
    if w <= THIN_RECT {
        return Ruling::from_segment(mid_x, rect.bottom, mid_x, rect.top, AXIS_TOLERANCE)
            .into_iter()
            .collect();
    }

    [
        (rect.left, rect.bottom, rect.right, rect.bottom),
        (rect.left, rect.top, rect.right, rect.top),
        (rect.left, rect.bottom, rect.left, rect.top),
        (rect.right, rect.bottom, rect.right, rect.top),
    ]
    .into_iter()
    .filter_map(|(x0, y0, x1, y1)| Ruling::from_segment(x0, y0, x1, y1, AXIS_TOLERANCE))
    .collect()
}

fn matrix_operands(operands: &[PdfValue]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let n: Vec<f32> = operands
        .iter()
        .take(6)
        .map(get_number_from_value)
        .collect::<Option<_>>()?;
    Some(Matrix::new(n[0], n[1], n[2], n[3], n[4], n[5]))
}

fn needs_word_space(text: &str) -> bool {
    match text.chars().last() {
        None | Some(' ') | Some('\u{00A0}') => false,
        Some(c) => !is_spaceless_script_char(c),
    }
}

/// Chinese and Japanese don't put spaces between words; Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
