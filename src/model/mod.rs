//! # Document Model
//!
//! The input representation for the layout engine. A document is a page
//! configuration plus a flat, ordered list of content elements. Elements are
//! plain values: the engine never mutates them, and when a table or list has
//! to be split the pieces are derived copies.
//!
//! The element set is closed. Every match over [`Element`] is exhaustive, so
//! adding a kind forces measurement, layout dispatch and every renderer to
//! handle it.

pub mod list;
pub mod qr;
pub mod table;

pub use list::ListElement;
pub use qr::{ErrorCorrection, QrCodeElement, QrModules, VCard, WifiSecurity};
pub use table::{TableCell, TableElement, TableRow};

use serde::{Deserialize, Serialize};

use crate::error::QuireError;
use crate::font::FontContext;
use crate::image_loader;
use crate::page::PageConfig;
use crate::style::{Color, TextAlign, Typeface};
use crate::text::TextLayout;

/// A complete document ready for layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Page size, margins and bands shared by every page.
    #[serde(default)]
    pub config: PageConfig,

    #[serde(default)]
    pub metadata: Metadata,

    /// Custom fonts to register before layout.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fonts: Vec<FontEntry>,

    pub elements: Vec<Element>,
}

/// A custom font to register with the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontEntry {
    /// Font family name (e.g. "Inter", "Roboto").
    pub family: String,
    /// Base64-encoded font data, a data URI, or a file path.
    pub src: String,
    /// Font weight (100-900). Defaults to 400.
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub italic: bool,
}

fn default_weight() -> u32 {
    400
}

/// Document metadata handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Vec<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// Unix timestamp in seconds.
    pub creation_date: Option<i64>,
    pub modification_date: Option<i64>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: Vec::new(),
            creator: Some("Quire".to_string()),
            producer: None,
            creation_date: None,
            modification_date: None,
        }
    }
}

impl Metadata {
    pub fn with_title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    pub fn with_title_and_author(title: &str, author: &str) -> Self {
        Self {
            author: Some(author.to_string()),
            ..Self::with_title(title)
        }
    }
}

// ── Elements ────────────────────────────────────────────────────

/// One unit of document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Text(TextElement),
    Image(ImageElement),
    Spacer(SpacerElement),
    Divider(DividerElement),
    Table(TableElement),
    List(ListElement),
    Box(BoxElement),
    Checkbox(CheckboxElement),
    CheckboxList(CheckboxListElement),
    QrCode(QrCodeElement),
    /// Forces the following content onto a new page.
    PageBreak,
}

impl Element {
    /// Vertical space this element needs at the given width, including its
    /// trailing spacing. A page break never fits anywhere.
    pub fn measure_height(&self, available_width: f64, fonts: &FontContext) -> f64 {
        match self {
            Element::Text(t) => t.measure_height(available_width, fonts),
            Element::Image(i) => i.measure_height(available_width),
            Element::Spacer(s) => s.height,
            Element::Divider(d) => d.measure_height(),
            Element::Table(t) => t.measure_height(available_width, fonts),
            Element::List(l) => l.measure_height(available_width, fonts),
            Element::Box(b) => b.measure_height(available_width, fonts),
            Element::Checkbox(c) => c.measure_height(),
            Element::CheckboxList(c) => c.measure_height(),
            Element::QrCode(q) => q.measure_height(),
            Element::PageBreak => f64::MAX,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Text(_) => "Text",
            Element::Image(_) => "Image",
            Element::Spacer(_) => "Spacer",
            Element::Divider(_) => "Divider",
            Element::Table(_) => "Table",
            Element::List(l) if l.numbered => "NumberedList",
            Element::List(_) => "BulletList",
            Element::Box(_) => "Box",
            Element::Checkbox(_) => "Checkbox",
            Element::CheckboxList(_) => "CheckboxList",
            Element::QrCode(_) => "QrCode",
            Element::PageBreak => "PageBreak",
        }
    }
}

// ── Text ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextElement {
    pub text: String,
    pub font_size: f64,
    pub color: Color,
    pub typeface: Typeface,
    pub align: TextAlign,
    /// Line height as a multiple of the font size.
    pub line_spacing: f64,
    /// Space after the paragraph.
    pub paragraph_spacing: f64,
    pub max_lines: Option<usize>,
    /// Left indent; also narrows the wrap width.
    pub indent: f64,
}

impl Default for TextElement {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 12.0,
            color: Color::BLACK,
            typeface: Typeface::default(),
            align: TextAlign::Left,
            line_spacing: 1.2,
            paragraph_spacing: 8.0,
            max_lines: None,
            indent: 0.0,
        }
    }
}

impl TextElement {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    /// Lines as they will be drawn, truncated to `max_lines`.
    pub fn lines(&self, available_width: f64, fonts: &FontContext) -> Vec<String> {
        let mut lines = TextLayout::new().break_into_lines(
            fonts,
            &self.text,
            available_width - self.indent,
            self.font_size,
            &self.typeface,
        );
        if let Some(max) = self.max_lines {
            lines.truncate(max);
        }
        lines
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * self.line_spacing
    }

    pub fn measure_height(&self, available_width: f64, fonts: &FontContext) -> f64 {
        if self.text.is_empty() {
            return 0.0;
        }
        let lines = self.lines(available_width, fonts).len();
        lines as f64 * self.line_height() + self.paragraph_spacing
    }
}

// ── Image ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleType {
    #[default]
    Fit,
    Fill,
    Crop,
    Center,
}

/// Aspect ratio assumed when the intrinsic width is unknown.
const FALLBACK_ASPECT: f64 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageElement {
    /// Data URI, file path or raw base64. Opaque to layout.
    pub src: String,
    /// Intrinsic size in pixels; only the ratio matters.
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Display width in points. Defaults to the available width.
    pub width: Option<f64>,
    /// Display height in points. Overrides the aspect ratio.
    pub height: Option<f64>,
    pub align: TextAlign,
    pub scale: ScaleType,
    pub spacing_after: f64,
}

impl Default for ImageElement {
    fn default() -> Self {
        Self {
            src: String::new(),
            pixel_width: 0,
            pixel_height: 0,
            width: None,
            height: None,
            align: TextAlign::Center,
            scale: ScaleType::Fit,
            spacing_after: 8.0,
        }
    }
}

impl ImageElement {
    pub fn new(src: &str, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            src: src.to_string(),
            pixel_width,
            pixel_height,
            ..Default::default()
        }
    }

    /// Build from a source, reading the intrinsic size from the image data.
    pub fn from_source(src: &str) -> Result<Self, QuireError> {
        let (w, h) = image_loader::load_image_dimensions(src).map_err(QuireError::Image)?;
        Ok(Self::new(src, w, h))
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.pixel_width == 0 {
            FALLBACK_ASPECT
        } else {
            self.pixel_height as f64 / self.pixel_width as f64
        }
    }

    /// Display size in points at the given available width.
    pub fn display_size(&self, available_width: f64) -> (f64, f64) {
        let width = self.width.unwrap_or(available_width);
        let height = self.height.unwrap_or(width * self.aspect_ratio());
        (width, height)
    }

    pub fn measure_height(&self, available_width: f64) -> f64 {
        self.display_size(available_width).1 + self.spacing_after
    }
}

// ── Spacer / Divider ────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpacerElement {
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividerElement {
    pub thickness: f64,
    pub color: Color,
    pub margin_top: f64,
    pub margin_bottom: f64,
    /// Zero for a solid rule.
    pub dash_width: f64,
    pub dash_gap: f64,
}

impl Default for DividerElement {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            color: Color::BLACK,
            margin_top: 8.0,
            margin_bottom: 8.0,
            dash_width: 0.0,
            dash_gap: 0.0,
        }
    }
}

impl DividerElement {
    pub fn dashed() -> Self {
        Self {
            dash_width: 5.0,
            dash_gap: 3.0,
            ..Default::default()
        }
    }

    pub fn measure_height(&self) -> f64 {
        self.thickness + self.margin_top + self.margin_bottom
    }
}

// ── Box ─────────────────────────────────────────────────────────

/// A bordered container. Always atomic: it moves to a new page whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxElement {
    pub children: Vec<Element>,
    pub padding: f64,
    pub background: Option<Color>,
    pub border_width: f64,
    pub border_color: Color,
    pub border_radius: f64,
    pub spacing_after: f64,
}

impl Default for BoxElement {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            padding: 12.0,
            background: None,
            border_width: 1.0,
            border_color: Color::BLACK,
            border_radius: 0.0,
            spacing_after: 8.0,
        }
    }
}

impl BoxElement {
    pub fn new(children: Vec<Element>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    fn tinted(children: Vec<Element>, background: &str, border: &str) -> Self {
        Self {
            background: Some(Color::hex(background)),
            border_color: Color::hex(border),
            border_radius: 4.0,
            ..Self::new(children)
        }
    }

    pub fn callout(children: Vec<Element>) -> Self {
        Self::tinted(children, "#F5F5F5", "#DDDDDD")
    }

    pub fn info(children: Vec<Element>) -> Self {
        Self::tinted(children, "#E3F2FD", "#2196F3")
    }

    pub fn warning(children: Vec<Element>) -> Self {
        Self::tinted(children, "#FFF8E1", "#FFC107")
    }

    pub fn error(children: Vec<Element>) -> Self {
        Self::tinted(children, "#FFEBEE", "#F44336")
    }

    pub fn success(children: Vec<Element>) -> Self {
        Self::tinted(children, "#E8F5E9", "#4CAF50")
    }

    /// Width available to children.
    pub fn inner_width(&self, available_width: f64) -> f64 {
        available_width - self.padding * 2.0 - self.border_width * 2.0
    }

    pub fn measure_height(&self, available_width: f64, fonts: &FontContext) -> f64 {
        let inner = self.inner_width(available_width);
        let children: f64 = self
            .children
            .iter()
            .map(|child| match child {
                // A break has no meaning inside a box.
                Element::PageBreak => 0.0,
                other => other.measure_height(inner, fonts),
            })
            .sum();
        self.padding * 2.0 + self.border_width * 2.0 + children + self.spacing_after
    }
}

// ── Checkboxes ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckboxElement {
    pub label: String,
    pub checked: bool,
    pub font_size: f64,
    pub color: Color,
    pub box_size: f64,
    pub box_color: Color,
    pub check_color: Color,
    pub typeface: Typeface,
    pub spacing_after: f64,
}

impl Default for CheckboxElement {
    fn default() -> Self {
        Self {
            label: String::new(),
            checked: false,
            font_size: 12.0,
            color: Color::BLACK,
            box_size: 14.0,
            box_color: Color::BLACK,
            check_color: Color::BLACK,
            typeface: Typeface::default(),
            spacing_after: 4.0,
        }
    }
}

impl CheckboxElement {
    pub fn new(label: &str, checked: bool) -> Self {
        Self {
            label: label.to_string(),
            checked,
            ..Default::default()
        }
    }

    pub fn measure_height(&self) -> f64 {
        self.box_size.max(self.font_size * 1.2) + self.spacing_after
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckboxItem {
    pub label: String,
    pub checked: bool,
}

impl CheckboxItem {
    pub fn new(label: &str, checked: bool) -> Self {
        Self {
            label: label.to_string(),
            checked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckboxListElement {
    pub items: Vec<CheckboxItem>,
    pub font_size: f64,
    pub color: Color,
    pub box_size: f64,
    pub box_color: Color,
    pub check_color: Color,
    pub typeface: Typeface,
    pub item_spacing: f64,
    pub spacing_after: f64,
}

impl Default for CheckboxListElement {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            font_size: 12.0,
            color: Color::BLACK,
            box_size: 14.0,
            box_color: Color::BLACK,
            check_color: Color::BLACK,
            typeface: Typeface::default(),
            item_spacing: 4.0,
            spacing_after: 8.0,
        }
    }
}

impl CheckboxListElement {
    pub fn new(items: Vec<CheckboxItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn item_height(&self) -> f64 {
        self.box_size.max(self.font_size * 1.2) + self.item_spacing
    }

    pub fn measure_height(&self) -> f64 {
        self.items.len() as f64 * self.item_height() + self.spacing_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fc() -> FontContext {
        FontContext::new()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_text_has_no_height() {
        assert!(close(TextElement::new("").measure_height(300.0, &fc()), 0.0));
    }

    #[test]
    fn text_height_single_line() {
        // 12 * 1.2 + 8
        assert!(close(TextElement::new("Hello").measure_height(300.0, &fc()), 22.4));
    }

    #[test]
    fn text_max_lines_caps_height() {
        let text = TextElement {
            max_lines: Some(2),
            ..TextElement::new("a\nb\nc\nd")
        };
        assert!(close(text.measure_height(300.0, &fc()), 2.0 * 14.4 + 8.0));
    }

    #[test]
    fn indent_narrows_wrap_width() {
        let plain = TextElement::new("aaaa bbbb cccc dddd");
        let indented = TextElement {
            indent: 60.0,
            ..plain.clone()
        };
        assert!(indented.lines(120.0, &fc()).len() > plain.lines(120.0, &fc()).len());
    }

    #[test]
    fn image_height_from_aspect() {
        let img = ImageElement::new("x", 200, 100);
        assert!(close(img.measure_height(400.0), 200.0 + 8.0));
        let sized = ImageElement {
            width: Some(100.0),
            ..img.clone()
        };
        assert!(close(sized.measure_height(400.0), 50.0 + 8.0));
        let explicit = ImageElement {
            height: Some(30.0),
            ..img
        };
        assert!(close(explicit.measure_height(400.0), 38.0));
    }

    #[test]
    fn image_zero_width_uses_fallback_aspect() {
        let img = ImageElement::new("x", 0, 0);
        assert!(close(img.measure_height(100.0), 75.0 + 8.0));
    }

    #[test]
    fn divider_and_spacer() {
        assert!(close(Element::Divider(DividerElement::default()).measure_height(1.0, &fc()), 17.0));
        assert!(close(Element::Spacer(SpacerElement { height: 42.0 }).measure_height(1.0, &fc()), 42.0));
    }

    #[test]
    fn page_break_never_fits() {
        assert_eq!(Element::PageBreak.measure_height(500.0, &fc()), f64::MAX);
    }

    #[test]
    fn box_adds_padding_border_and_children() {
        let b = BoxElement::new(vec![
            Element::Spacer(SpacerElement { height: 50.0 }),
            Element::PageBreak,
        ]);
        // 2*12 + 2*1 + 50 + 8
        assert!(close(b.measure_height(300.0, &fc()), 84.0));
        assert!(close(b.inner_width(300.0), 274.0));
    }

    #[test]
    fn checkbox_heights() {
        let cb = CheckboxElement::new("Agree", true);
        // max(14, 14.4) + 4
        assert!(close(cb.measure_height(), 18.4));
        let list = CheckboxListElement::new(vec![
            CheckboxItem::new("a", false),
            CheckboxItem::new("b", true),
        ]);
        assert!(close(list.measure_height(), 2.0 * 18.4 + 8.0));
    }

    #[test]
    fn kind_names() {
        assert_eq!(Element::List(ListElement::numbered(vec![])).kind_name(), "NumberedList");
        assert_eq!(Element::PageBreak.kind_name(), "PageBreak");
    }

    #[test]
    fn element_json_is_tagged() {
        let json = r#"[
            { "type": "Text", "text": "Hi", "fontSize": 20 },
            { "type": "PageBreak" },
            { "type": "Spacer", "height": 10 }
        ]"#;
        let elements: Vec<Element> = serde_json::from_str(json).unwrap();
        assert_eq!(elements.len(), 3);
        match &elements[0] {
            Element::Text(t) => {
                assert_eq!(t.text, "Hi");
                assert!(close(t.font_size, 20.0));
                assert!(close(t.line_spacing, 1.2));
            }
            other => panic!("expected text, got {}", other.kind_name()),
        }
        assert_eq!(elements[1], Element::PageBreak);
    }
}
