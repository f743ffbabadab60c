//! # Document Builder
//!
//! A consuming, append-only builder. Every method takes the builder by value
//! and hands it back, so a chain reads top to bottom like the document it
//! produces. [`DocumentBuilder::freeze`] snapshots the result into an
//! immutable [`Document`] for layout.
//!
//! ```
//! use quire::builder::DocumentBuilder;
//!
//! let doc = DocumentBuilder::a4_portrait()
//!     .title("Quarterly Report")
//!     .text("Revenue grew in every region.")
//!     .bullet_list(["North", "South"])
//!     .freeze();
//! assert_eq!(doc.elements.len(), 3);
//! ```

use crate::error::QuireError;
use crate::font::FontContext;
use crate::layout::LayoutEngine;
use crate::model::*;
use crate::page::{BandContent, Edges, Orientation, PageBand, PageConfig, PageSize, Watermark};
use crate::style::{Color, Typeface};

#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    config: PageConfig,
    metadata: Metadata,
    fonts: Vec<FontEntry>,
    elements: Vec<Element>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn a4_portrait() -> Self {
        Self::new().page_size(PageSize::A4).orientation(Orientation::Portrait)
    }

    pub fn a4_landscape() -> Self {
        Self::new().page_size(PageSize::A4).orientation(Orientation::Landscape)
    }

    pub fn a5_portrait() -> Self {
        Self::new().page_size(PageSize::A5).orientation(Orientation::Portrait)
    }

    pub fn letter() -> Self {
        Self::new().page_size(PageSize::Letter).orientation(Orientation::Portrait)
    }

    // ── Page configuration ──────────────────────────────────────

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.size = size;
        self
    }

    pub fn page_size_mm(self, width: f64, height: f64) -> Self {
        self.page_size(PageSize::custom_mm(width, height))
    }

    pub fn page_size_inches(self, width: f64, height: f64) -> Self {
        self.page_size(PageSize::custom_inches(width, height))
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    pub fn margins(mut self, margins: Edges) -> Self {
        self.config.margins = margins;
        self
    }

    pub fn uniform_margins(self, margin: f64) -> Self {
        self.margins(Edges::uniform(margin))
    }

    pub fn background(mut self, color: Color) -> Self {
        self.config.background = color;
        self
    }

    pub fn header(mut self, height: f64, content: BandContent) -> Self {
        self.config.header = PageBand::new(height, content);
        self
    }

    pub fn footer(mut self, height: f64, content: BandContent) -> Self {
        self.config.footer = PageBand::new(height, content);
        self
    }

    /// Footer showing only "Page {page} of {total}", centered.
    pub fn page_numbers(self) -> Self {
        self.footer(
            40.0,
            BandContent {
                show_page_number: true,
                ..Default::default()
            },
        )
    }

    pub fn watermark(mut self, watermark: Watermark) -> Self {
        self.config.watermark = Some(watermark);
        self
    }

    pub fn config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Register a custom font (base64, data URI or path) for the document.
    pub fn font(mut self, family: &str, src: &str, weight: u32, italic: bool) -> Self {
        self.fonts.push(FontEntry {
            family: family.to_string(),
            src: src.to_string(),
            weight,
            italic,
        });
        self
    }

    // ── Content ─────────────────────────────────────────────────

    pub fn element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.elements.extend(elements);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.element(Element::Text(TextElement::new(text)))
    }

    pub fn styled_text(self, text: TextElement) -> Self {
        self.element(Element::Text(text))
    }

    fn bold_text(self, text: &str, font_size: f64, paragraph_spacing: f64) -> Self {
        self.styled_text(TextElement {
            font_size,
            typeface: Typeface::bold(),
            paragraph_spacing,
            ..TextElement::new(text)
        })
    }

    pub fn title(self, text: &str) -> Self {
        self.bold_text(text, 24.0, 16.0)
    }

    pub fn heading(self, text: &str) -> Self {
        self.bold_text(text, 18.0, 12.0)
    }

    pub fn subheading(self, text: &str) -> Self {
        self.bold_text(text, 14.0, 10.0)
    }

    pub fn image(self, image: ImageElement) -> Self {
        self.element(Element::Image(image))
    }

    /// Add an image, reading its intrinsic size from the source.
    pub fn image_from_source(self, src: &str) -> Result<Self, QuireError> {
        Ok(self.image(ImageElement::from_source(src)?))
    }

    pub fn spacer(self, height: f64) -> Self {
        self.element(Element::Spacer(SpacerElement { height }))
    }

    pub fn divider(self) -> Self {
        self.element(Element::Divider(DividerElement::default()))
    }

    pub fn dashed_divider(self) -> Self {
        self.element(Element::Divider(DividerElement::dashed()))
    }

    pub fn table(self, table: TableElement) -> Self {
        self.element(Element::Table(table))
    }

    /// A table of plain cells. With `has_header`, the first row repeats on
    /// every page the table spans.
    pub fn simple_table<R, S>(self, data: impl IntoIterator<Item = R>, has_header: bool) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = data
            .into_iter()
            .enumerate()
            .map(|(i, row)| TableRow {
                cells: row.into_iter().map(|s| TableCell::new(s.as_ref())).collect(),
                is_header: has_header && i == 0,
                ..Default::default()
            })
            .collect();
        self.table(TableElement::new(rows))
    }

    pub fn bullet_list<S: Into<String>>(self, items: impl IntoIterator<Item = S>) -> Self {
        self.element(Element::List(ListElement::bullets(
            items.into_iter().map(Into::into).collect(),
        )))
    }

    pub fn numbered_list<S: Into<String>>(self, items: impl IntoIterator<Item = S>) -> Self {
        self.element(Element::List(ListElement::numbered(
            items.into_iter().map(Into::into).collect(),
        )))
    }

    pub fn page_break(self) -> Self {
        self.element(Element::PageBreak)
    }

    pub fn boxed(self, b: BoxElement) -> Self {
        self.element(Element::Box(b))
    }

    pub fn callout_box(self, children: Vec<Element>) -> Self {
        self.boxed(BoxElement::callout(children))
    }

    pub fn info_box(self, children: Vec<Element>) -> Self {
        self.boxed(BoxElement::info(children))
    }

    pub fn warning_box(self, children: Vec<Element>) -> Self {
        self.boxed(BoxElement::warning(children))
    }

    pub fn error_box(self, children: Vec<Element>) -> Self {
        self.boxed(BoxElement::error(children))
    }

    pub fn success_box(self, children: Vec<Element>) -> Self {
        self.boxed(BoxElement::success(children))
    }

    pub fn checkbox(self, label: &str, checked: bool) -> Self {
        self.element(Element::Checkbox(CheckboxElement::new(label, checked)))
    }

    pub fn checkbox_list(self, items: Vec<CheckboxItem>) -> Self {
        self.element(Element::CheckboxList(CheckboxListElement::new(items)))
    }

    pub fn qr_code(self, qr: QrCodeElement) -> Self {
        self.element(Element::QrCode(qr))
    }

    /// Drop all content, keeping the page configuration.
    pub fn clear(mut self) -> Self {
        self.elements.clear();
        self
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn page_config(&self) -> &PageConfig {
        &self.config
    }

    /// Pages the current content would produce, without freezing.
    pub fn estimate_page_count(&self, font_context: &FontContext) -> Result<usize, QuireError> {
        let geometry = self.config.resolve();
        Ok(LayoutEngine::new()
            .layout_elements(&self.elements, &geometry, font_context)?
            .len())
    }

    /// Snapshot the builder into an immutable document.
    pub fn freeze(self) -> Document {
        Document {
            config: self.config,
            metadata: self.metadata,
            fonts: self.fonts,
            elements: self.elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_set_size_and_orientation() {
        let b = DocumentBuilder::a4_landscape();
        assert_eq!(b.page_config().size, PageSize::A4);
        assert_eq!(b.page_config().orientation, Orientation::Landscape);
        assert_eq!(DocumentBuilder::letter().page_config().size, PageSize::Letter);
        assert_eq!(DocumentBuilder::a5_portrait().page_config().size, PageSize::A5);
    }

    #[test]
    fn headings_are_bold_with_spacing() {
        let doc = DocumentBuilder::new().title("T").heading("H").subheading("S").freeze();
        let sizes: Vec<(f64, f64, u32)> = doc
            .elements
            .iter()
            .map(|e| match e {
                Element::Text(t) => (t.font_size, t.paragraph_spacing, t.typeface.weight),
                other => panic!("unexpected {}", other.kind_name()),
            })
            .collect();
        assert_eq!(sizes, vec![(24.0, 16.0, 700), (18.0, 12.0, 700), (14.0, 10.0, 700)]);
    }

    #[test]
    fn simple_table_marks_first_row_as_header() {
        let doc = DocumentBuilder::new()
            .simple_table(vec![vec!["Name", "Qty"], vec!["Pen", "2"]], true)
            .freeze();
        match &doc.elements[0] {
            Element::Table(t) => {
                assert!(t.rows[0].is_header);
                assert!(!t.rows[1].is_header);
                assert_eq!(t.rows[1].cells[0].content, "Pen");
            }
            other => panic!("unexpected {}", other.kind_name()),
        }
    }

    #[test]
    fn clear_keeps_config() {
        let b = DocumentBuilder::letter().text("a").page_break().clear();
        assert_eq!(b.element_count(), 0);
        assert_eq!(b.page_config().size, PageSize::Letter);
    }

    #[test]
    fn estimate_counts_pages() {
        let b = DocumentBuilder::new().text("one").page_break().text("two");
        assert_eq!(b.estimate_page_count(&FontContext::new()).unwrap(), 2);
    }

    #[test]
    fn page_numbers_enables_footer() {
        let doc = DocumentBuilder::new().page_numbers().freeze();
        assert!(doc.config.footer.enabled);
        assert!((doc.config.resolve().footer_height - 40.0).abs() < 1e-9);
    }
}
