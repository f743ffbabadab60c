//! # Page-Aware Layout Engine
//!
//! Turns a flat element list into pages of placements. There is no infinite
//! canvas to slice afterwards: every element is measured against the space
//! left on the page it is about to land on.
//!
//! The algorithm, per element:
//!
//! 1. An explicit page break always closes the current page, even an empty one.
//! 2. If the element fits in the remaining height, place it and advance.
//! 3. Tables and lists that don't fit go to their splitter. A chunk that
//!    can't take a single row signals a fresh page; every chunk after the
//!    first starts a new page.
//! 4. Anything else that doesn't fit is atomic: close the current page if it
//!    has content and place the element at the top of the next one, even if
//!    it still overflows.
//!
//! At the end the last page is closed if it has content, and a document
//! that produced no pages at all still yields one empty page.
//!
//! Layout is a pure function of the elements, the geometry and the fonts.
//! Unsplit elements are borrowed from the input; chunks are owned copies.

pub mod page_break;

use std::borrow::Cow;

use serde::Serialize;

use crate::error::QuireError;
use crate::font::FontContext;
use crate::model::{Document, Element};
use crate::page::PageGeometry;
use page_break::{decide_break, split_list, split_table, BreakDecision, Piece, Split};

/// An element (or chunk of one) positioned on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement<'a> {
    pub element: Cow<'a, Element>,
    /// Index of the source element in the document.
    pub element_index: usize,
    /// Absolute page coordinates of the top-left corner, in points.
    pub x: f64,
    pub y: f64,
    pub available_width: f64,
    /// Measured height, including trailing spacing.
    pub height: f64,
}

impl Placement<'_> {
    /// True when the element was split and this is a derived chunk.
    pub fn is_chunk(&self) -> bool {
        matches!(self.element, Cow::Owned(_))
    }
}

/// One finished page. Page numbers start at 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPage<'a> {
    pub page_number: usize,
    pub placements: Vec<Placement<'a>>,
}

/// Tracks where we are on the current page.
struct PageCursor<'a> {
    geometry: PageGeometry,
    page_number: usize,
    /// Offset from the top of the content area.
    y: f64,
    placements: Vec<Placement<'a>>,
}

impl<'a> PageCursor<'a> {
    fn new(geometry: &PageGeometry) -> Self {
        Self {
            geometry: *geometry,
            page_number: 1,
            y: 0.0,
            placements: Vec::new(),
        }
    }

    fn remaining_height(&self) -> f64 {
        (self.geometry.content_height() - self.y).max(0.0)
    }

    fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    fn place(&mut self, element: Cow<'a, Element>, element_index: usize, height: f64) {
        let placement = Placement {
            element,
            element_index,
            x: self.geometry.content_start_x(),
            y: self.geometry.content_start_y() + self.y,
            available_width: self.geometry.content_width(),
            height,
        };
        log::trace!(
            "page {}: {} #{} at y={:.2} h={:.2}",
            self.page_number,
            placement.element.kind_name(),
            element_index,
            placement.y,
            height
        );
        self.y += height;
        self.placements.push(placement);
    }

    /// Close the current page and start the next one.
    fn flush(&mut self, pages: &mut Vec<LayoutPage<'a>>) {
        log::debug!(
            "page {} closed with {} placement(s)",
            self.page_number,
            self.placements.len()
        );
        pages.push(LayoutPage {
            page_number: self.page_number,
            placements: std::mem::take(&mut self.placements),
        });
        self.page_number += 1;
        self.y = 0.0;
    }

    fn flush_if_not_empty(&mut self, pages: &mut Vec<LayoutPage<'a>>) {
        if !self.is_empty() {
            self.flush(pages);
        }
    }
}

pub struct LayoutEngine;

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Lay out a whole document using its own page configuration.
    pub fn layout<'a>(
        &self,
        document: &'a Document,
        font_context: &FontContext,
    ) -> Result<Vec<LayoutPage<'a>>, QuireError> {
        let geometry = document.config.resolve();
        self.layout_elements(&document.elements, &geometry, font_context)
    }

    /// Number of pages the document will produce.
    pub fn page_count(&self, document: &Document, font_context: &FontContext) -> Result<usize, QuireError> {
        Ok(self.layout(document, font_context)?.len())
    }

    /// Paginate `elements` on pages of the given geometry.
    ///
    /// Total for every input; the only error is a broken splitter invariant.
    pub fn layout_elements<'a>(
        &self,
        elements: &'a [Element],
        geometry: &PageGeometry,
        font_context: &FontContext,
    ) -> Result<Vec<LayoutPage<'a>>, QuireError> {
        if geometry.is_degenerate() {
            log::warn!(
                "degenerate page geometry: content {:.2} x {:.2}",
                geometry.content_width(),
                geometry.content_height()
            );
        }

        let mut pages: Vec<LayoutPage<'a>> = Vec::new();
        let mut cursor = PageCursor::new(geometry);
        let width = geometry.content_width();

        for (index, element) in elements.iter().enumerate() {
            if let Element::PageBreak = element {
                cursor.flush(&mut pages);
                continue;
            }

            let height = element.measure_height(width, font_context);
            let breakable = matches!(element, Element::Table(_) | Element::List(_));

            match decide_break(height, cursor.remaining_height(), breakable) {
                BreakDecision::Place => cursor.place(Cow::Borrowed(element), index, height),
                BreakDecision::MoveToNextPage => {
                    self.place_atomic(element, index, height, &mut cursor, &mut pages)
                }
                BreakDecision::Split => {
                    let first = cursor.remaining_height();
                    let full = geometry.content_height();
                    let split = match element {
                        Element::Table(table) => {
                            map_split(split_table(table, width, first, full, font_context), Element::Table)
                        }
                        Element::List(list) => {
                            map_split(split_list(list, width, first, full, font_context), Element::List)
                        }
                        _ => Split::Whole,
                    };
                    self.place_split(split, element, index, height, &mut cursor, &mut pages, font_context)?;
                }
            }
        }

        if !cursor.is_empty() || pages.is_empty() {
            cursor.flush(&mut pages);
        }

        Ok(pages)
    }

    /// Push an element that doesn't fit onto a fresh page, whole.
    fn place_atomic<'a>(
        &self,
        element: &'a Element,
        index: usize,
        height: f64,
        cursor: &mut PageCursor<'a>,
        pages: &mut Vec<LayoutPage<'a>>,
    ) {
        cursor.flush_if_not_empty(pages);
        if height > cursor.remaining_height() {
            log::warn!(
                "{} #{} is {:.2}pt tall and overflows page {}",
                element.kind_name(),
                index,
                height,
                cursor.page_number
            );
        } else {
            log::debug!("{} #{} moved to page {}", element.kind_name(), index, cursor.page_number);
        }
        cursor.place(Cow::Borrowed(element), index, height);
    }

    #[allow(clippy::too_many_arguments)]
    fn place_split<'a>(
        &self,
        split: Split<Element>,
        element: &'a Element,
        index: usize,
        height: f64,
        cursor: &mut PageCursor<'a>,
        pages: &mut Vec<LayoutPage<'a>>,
        font_context: &FontContext,
    ) -> Result<(), QuireError> {
        let pieces = match split {
            Split::Whole => {
                self.place_atomic(element, index, height, cursor, pages);
                return Ok(());
            }
            Split::Pieces(pieces) => pieces,
        };

        if !pieces.iter().any(|p| matches!(p, Piece::Chunk(_))) {
            return Err(QuireError::Layout {
                page: cursor.page_number,
                element: index,
                message: format!("{} splitter produced no chunks", element.kind_name()),
            });
        }

        let width = cursor.geometry.content_width();
        let mut placed_any = false;
        for piece in pieces {
            match piece {
                Piece::NextPage => cursor.flush_if_not_empty(pages),
                Piece::Chunk(chunk) => {
                    if placed_any {
                        cursor.flush(pages);
                    }
                    let chunk_height = chunk.measure_height(width, font_context);
                    // A deferred element that fits in one chunk is the element itself.
                    let placed = if chunk == *element {
                        Cow::Borrowed(element)
                    } else {
                        Cow::Owned(chunk)
                    };
                    cursor.place(placed, index, chunk_height);
                    placed_any = true;
                }
            }
        }
        Ok(())
    }
}

fn map_split<T>(split: Split<T>, wrap: fn(T) -> Element) -> Split<Element> {
    match split {
        Split::Whole => Split::Whole,
        Split::Pieces(pieces) => Split::Pieces(
            pieces
                .into_iter()
                .map(|p| match p {
                    Piece::NextPage => Piece::NextPage,
                    Piece::Chunk(c) => Piece::Chunk(wrap(c)),
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListElement, SpacerElement, TableCell, TableElement, TableRow, TextElement};
    use crate::page::{Edges, PageConfig, PageSize};

    fn geometry(width: f64, height: f64, margin: f64) -> PageGeometry {
        PageConfig {
            size: PageSize::custom(width, height),
            margins: Edges::uniform(margin),
            ..Default::default()
        }
        .resolve()
    }

    fn spacer(height: f64) -> Element {
        Element::Spacer(SpacerElement { height })
    }

    fn layout<'a>(elements: &'a [Element], geometry: &PageGeometry) -> Vec<LayoutPage<'a>> {
        LayoutEngine::new()
            .layout_elements(elements, geometry, &FontContext::new())
            .unwrap()
    }

    #[test]
    fn empty_input_yields_one_empty_page() {
        let elements: Vec<Element> = Vec::new();
        let pages = layout(&elements, &geometry(500.0, 800.0, 50.0));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert!(pages[0].placements.is_empty());
    }

    #[test]
    fn placements_stack_from_content_start() {
        let g = geometry(500.0, 800.0, 50.0);
        let elements = vec![spacer(100.0), spacer(50.0)];
        let pages = layout(&elements, &g);
        assert_eq!(pages.len(), 1);
        let p = &pages[0].placements;
        assert_eq!((p[0].x, p[0].y), (50.0, 50.0));
        assert_eq!(p[1].y, 150.0);
        assert_eq!(p[1].available_width, 400.0);
        assert!(!p[0].is_chunk());
    }

    #[test]
    fn exact_fit_stays_on_page() {
        let g = geometry(500.0, 800.0, 50.0);
        let elements = [spacer(300.0), spacer(400.0)];
        let pages = layout(&elements, &g);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn atomic_overflow_moves_to_next_page() {
        let g = geometry(500.0, 800.0, 50.0);
        let elements = [spacer(600.0), spacer(200.0)];
        let pages = layout(&elements, &g);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].placements[0].element_index, 1);
        assert_eq!(pages[1].placements[0].y, 50.0);
    }

    #[test]
    fn oversized_atomic_is_placed_anyway() {
        let g = geometry(500.0, 800.0, 50.0);
        let elements = [spacer(10.0), spacer(5000.0), spacer(10.0)];
        let pages = layout(&elements, &g);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].placements.len(), 1);
        assert_eq!(pages[1].placements[0].height, 5000.0);
    }

    #[test]
    fn oversized_atomic_on_empty_page_does_not_add_blank_page() {
        let g = geometry(500.0, 800.0, 50.0);
        let elements = [spacer(5000.0)];
        let pages = layout(&elements, &g);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn page_break_flushes_even_empty_pages() {
        let g = geometry(500.0, 800.0, 50.0);
        let elements = vec![spacer(10.0), Element::PageBreak, Element::PageBreak, spacer(10.0)];
        let pages = layout(&elements, &g);
        assert_eq!(pages.len(), 3);
        assert!(pages[1].placements.is_empty());
        assert_eq!(
            pages.iter().map(|p| p.page_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn trailing_page_break_adds_no_blank_page() {
        let g = geometry(500.0, 800.0, 50.0);
        let elements = [spacer(10.0), Element::PageBreak];
        let pages = layout(&elements, &g);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn degenerate_geometry_terminates() {
        let g = geometry(100.0, 100.0, 80.0);
        let elements = vec![
            Element::Text(TextElement::new("words that cannot fit anywhere at all")),
            spacer(1.0),
            Element::Text(TextElement::new("")),
        ];
        let pages = layout(&elements, &g);
        assert!(!pages.is_empty());
        let placed: usize = pages.iter().map(|p| p.placements.len()).sum();
        assert_eq!(placed, 3);
    }

    fn table(data_rows: usize) -> Element {
        let cell = |s: &str| TableCell {
            font_size: 10.0,
            ..TableCell::new(s)
        };
        let mut rows = vec![TableRow::header(vec![cell("Name"), cell("Qty")])];
        for i in 0..data_rows {
            rows.push(TableRow::new(vec![cell(&format!("Item {}", i)), cell("1")]));
        }
        Element::Table(TableElement::new(rows))
    }

    fn summary(page: &LayoutPage<'_>) -> Vec<(&'static str, f64, f64)> {
        page.placements
            .iter()
            .map(|p| (p.element.kind_name(), p.y, p.height))
            .collect()
    }

    #[test]
    fn table_with_room_for_header_only_moves_to_next_page() {
        // 30pt left: the 24pt header fits, header plus one row (48pt) does not.
        let g = geometry(500.0, 800.0, 50.0);
        let elements = [spacer(670.0), table(5)];
        let pages = layout(&elements, &g);
        assert_eq!(pages.len(), 2);
        assert_eq!(summary(&pages[0]), vec![("Spacer", 50.0, 670.0)]);
        assert_eq!(summary(&pages[1]), vec![("Table", 50.0, 152.0)]);
        match pages[1].placements[0].element.as_ref() {
            Element::Table(t) => {
                assert_eq!(t.rows.len(), 6);
                assert!(t.rows[0].is_header);
            }
            other => panic!("unexpected {}", other.kind_name()),
        }
    }

    #[test]
    fn deferred_table_in_one_piece_is_not_a_chunk() {
        let g = geometry(500.0, 800.0, 50.0);
        let elements = [spacer(670.0), table(5)];
        let pages = layout(&elements, &g);
        let placement = &pages[1].placements[0];
        assert!(!placement.is_chunk());
        assert_eq!(placement.element.as_ref(), &elements[1]);
    }

    #[test]
    fn list_whose_first_item_does_not_fit_moves_to_next_page() {
        // Each item is 12 * 1.2 + 4 = 18.4pt; 10pt are left.
        let g = geometry(500.0, 800.0, 50.0);
        let list = ListElement::numbered(vec!["a".into(), "b".into(), "c".into()]);
        let elements = [spacer(690.0), Element::List(list)];
        let pages = layout(&elements, &g);
        assert_eq!(pages.len(), 2);
        assert_eq!(summary(&pages[0]), vec![("Spacer", 50.0, 690.0)]);
        let second = summary(&pages[1]);
        assert_eq!(second.len(), 1);
        assert_eq!((second[0].0, second[0].1), ("NumberedList", 50.0));
        assert!((second[0].2 - 63.2).abs() < 1e-9);
        match pages[1].placements[0].element.as_ref() {
            Element::List(l) => assert_eq!((l.start_number, l.items.len()), (1, 3)),
            other => panic!("unexpected {}", other.kind_name()),
        }
    }

    #[test]
    fn zero_height_elements_fit_on_full_page() {
        let g = geometry(500.0, 800.0, 50.0);
        let elements = vec![spacer(700.0), Element::Text(TextElement::new(""))];
        let pages = layout(&elements, &g);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].placements.len(), 2);
    }
}
