//! # Layout Inspector Output
//!
//! A [`PageRenderer`] that serializes the finished layout instead of drawing
//! it: page geometry, resolved band text, the watermark anchor and one entry
//! per placement. Used by the CLI and by anything that wants to check
//! pagination without a graphics backend.

use serde::Serialize;

use super::{PageFrame, PageRenderer};
use crate::font::FontContext;
use crate::layout::Placement;
use crate::model::{Element, Metadata};
use crate::page::BandText;
use crate::style::Color;

/// Complete layout metadata for all pages.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub page_count: usize,
    pub pages: Vec<PageInfo>,
}

/// Layout metadata for a single page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    pub content_x: f64,
    pub content_y: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub background: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<BandText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<BandText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<WatermarkInfo>,
    pub elements: Vec<ElementInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkInfo {
    pub text: String,
    /// Center of the text before rotation.
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub font_size: f64,
}

/// One placed element.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub element_index: usize,
    pub kind: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Part of a table or list that was split across pages.
    pub chunk: bool,
    /// Wrapped lines of a text element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<String>>,
    /// Face the text is measured and drawn with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Rows in a table, header included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Items in a list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
    /// Number of the first item of a numbered list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_number: Option<usize>,
}

pub struct LayoutInfoRenderer<'f> {
    fonts: &'f FontContext,
    pretty: bool,
    info: LayoutInfo,
    current: Option<PageInfo>,
}

impl<'f> LayoutInfoRenderer<'f> {
    pub fn new(fonts: &'f FontContext) -> Self {
        Self {
            fonts,
            pretty: false,
            info: LayoutInfo::default(),
            current: None,
        }
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// The collected layout, for callers that want the structure rather
    /// than bytes.
    pub fn info(&self) -> &LayoutInfo {
        &self.info
    }

    fn describe(&self, placement: &Placement<'_>) -> ElementInfo {
        let mut info = ElementInfo {
            element_index: placement.element_index,
            kind: placement.element.kind_name(),
            x: placement.x,
            y: placement.y,
            width: placement.available_width,
            height: placement.height,
            chunk: placement.is_chunk(),
            lines: None,
            font: None,
            rows: None,
            items: None,
            start_number: None,
        };
        match placement.element.as_ref() {
            Element::Text(text) => {
                info.lines = Some(text.lines(placement.available_width, self.fonts));
                info.font = Some(self.fonts.face_name(&text.typeface));
            }
            Element::Table(table) => info.rows = Some(table.rows.len()),
            Element::List(list) => {
                info.items = Some(list.items.len());
                info.start_number = list.numbered.then_some(list.start_number);
            }
            _ => {}
        }
        info
    }
}

impl PageRenderer for LayoutInfoRenderer<'_> {
    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn begin_document(&mut self, metadata: &Metadata, total_pages: usize) -> Result<(), String> {
        self.info = LayoutInfo {
            title: metadata.title.clone(),
            page_count: total_pages,
            pages: Vec::with_capacity(total_pages),
        };
        Ok(())
    }

    fn begin_page(&mut self, frame: &PageFrame<'_>) -> Result<(), String> {
        if self.current.is_some() {
            return Err("page started before the previous one ended".to_string());
        }
        let g = frame.geometry;
        let watermark = frame.config.watermark.as_ref().map(|w| {
            let width = self.fonts.measure(&w.text, &w.typeface, w.font_size);
            let (x, y) = w.anchor(g, width, w.font_size);
            WatermarkInfo {
                text: w.text.clone(),
                x,
                y,
                rotation: w.rotation,
                font_size: w.font_size,
            }
        });
        self.current = Some(PageInfo {
            page_number: frame.page_number,
            width: g.page_width,
            height: g.page_height,
            content_x: g.content_start_x(),
            content_y: g.content_start_y(),
            content_width: g.content_width(),
            content_height: g.content_height(),
            background: frame.config.background,
            header: frame.header.clone(),
            footer: frame.footer.clone(),
            watermark,
            elements: Vec::new(),
        });
        Ok(())
    }

    fn draw(&mut self, placement: &Placement<'_>) -> Result<(), String> {
        let element = self.describe(placement);
        match self.current.as_mut() {
            Some(page) => {
                page.elements.push(element);
                Ok(())
            }
            None => Err("no page in progress".to_string()),
        }
    }

    fn end_page(&mut self) -> Result<(), String> {
        let page = self.current.take().ok_or_else(|| "no page in progress".to_string())?;
        self.info.pages.push(page);
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>, String> {
        if self.current.is_some() {
            return Err("last page was never ended".to_string());
        }
        let result = if self.pretty {
            serde_json::to_vec_pretty(&self.info)
        } else {
            serde_json::to_vec(&self.info)
        };
        result.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocumentBuilder;
    use crate::page::Watermark;
    use crate::render::{build, BuildResult, Output, Silent};

    fn render(doc: &crate::model::Document) -> serde_json::Value {
        let fonts = FontContext::new();
        let mut renderer = LayoutInfoRenderer::new(&fonts);
        match build(doc, &fonts, &mut renderer, &Output::Bytes, &mut Silent).unwrap() {
            BuildResult::Bytes { bytes, .. } => serde_json::from_slice(&bytes).unwrap(),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn reports_geometry_and_placements() {
        let doc = DocumentBuilder::letter()
            .uniform_margins(36.0)
            .text("Hello")
            .numbered_list(["a", "b"])
            .freeze();
        let v = render(&doc);
        assert_eq!(v["pageCount"], 1);
        let page = &v["pages"][0];
        assert_eq!(page["width"], 612.0);
        assert_eq!(page["contentWidth"], 540.0);
        assert_eq!(page["elements"][0]["kind"], "Text");
        assert_eq!(page["elements"][0]["lines"][0], "Hello");
        assert_eq!(page["elements"][0]["y"], 36.0);
        assert_eq!(page["elements"][0]["font"], "Helvetica");
        assert_eq!(page["elements"][1]["kind"], "NumberedList");
        assert_eq!(page["elements"][1]["startNumber"], 1);
        assert_eq!(page["elements"][1]["chunk"], false);
    }

    #[test]
    fn watermark_is_centered() {
        let doc = DocumentBuilder::a4_portrait()
            .watermark(Watermark::draft())
            .text("x")
            .freeze();
        let v = render(&doc);
        let wm = &v["pages"][0]["watermark"];
        assert_eq!(wm["text"], "DRAFT");
        let page = &v["pages"][0];
        let half_width = page["width"].as_f64().unwrap() / 2.0;
        let half_height = page["height"].as_f64().unwrap() / 2.0;
        assert!((wm["x"].as_f64().unwrap() - half_width).abs() < 1e-9);
        assert!((wm["y"].as_f64().unwrap() - half_height).abs() < 1e-9);
        assert_eq!(wm["rotation"], -45.0);
    }

    #[test]
    fn end_without_begin_is_an_error() {
        let fonts = FontContext::new();
        let mut r = LayoutInfoRenderer::new(&fonts);
        assert!(r.end_page().is_err());
    }
}
