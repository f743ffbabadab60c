//! # Quire
//!
//! A page-native pagination engine.
//!
//! Quire takes a flat list of document elements (text, tables, lists,
//! images, boxes, QR codes) and decides which page each one lands on and
//! where. Elements are measured against the space left on the page they are
//! about to occupy. Tables that don't fit are split between rows with the
//! header repeated on every page; lists are split between items with their
//! numbering carried across. Everything else moves to the next page whole.
//!
//! Drawing is someone else's job. A [`render::PageRenderer`] receives the
//! finished placements page by page.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON / DocumentBuilder)
//!       ↓
//!   [model]   : Closed element set, page configuration
//!       ↓
//!   [font]    : Glyph widths: standard metrics or parsed TrueType
//!   [text]    : Greedy word wrap
//!       ↓
//!   [layout]  : Page cursor, break decisions, table/list splitters
//!       ↓
//!   [render]  : PageRenderer boundary, output sinks, build listener
//! ```

pub mod builder;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod page;
pub mod render;
pub mod style;
pub mod text;

pub use error::{QuireError, Result};

use font::FontContext;
use layout::{LayoutEngine, LayoutPage};
use model::Document;
use render::{LayoutInfoRenderer, Silent};

/// Parse a document from JSON.
pub fn from_json(json: &str) -> Result<Document> {
    Ok(serde_json::from_str(json)?)
}

/// A font context with the document's custom fonts registered on top of the
/// standard fonts.
pub fn font_context_for(document: &Document) -> Result<FontContext> {
    let mut fonts = FontContext::new();
    for entry in &document.fonts {
        let data = image_loader::read_source_bytes(&entry.src)
            .map_err(|e| QuireError::Font(format!("{}: {}", entry.family, e)))?;
        fonts
            .registry_mut()
            .register(&entry.family, entry.weight, entry.italic, &data)?;
    }
    Ok(fonts)
}

/// Paginate a document with its own fonts.
///
/// Pages borrow unsplit elements from `document`.
pub fn layout(document: &Document) -> Result<Vec<LayoutPage<'_>>> {
    let fonts = font_context_for(document)?;
    LayoutEngine::new().layout(document, &fonts)
}

/// Number of pages the document produces.
pub fn page_count(document: &Document) -> Result<usize> {
    Ok(layout(document)?.len())
}

/// Lay out a document and serialize the result as layout JSON.
pub fn render_layout(document: &Document) -> Result<Vec<u8>> {
    let fonts = font_context_for(document)?;
    let pages = LayoutEngine::new().layout(document, &fonts)?;
    let mut renderer = LayoutInfoRenderer::new(&fonts).pretty();
    render::render_pages(document, &pages, &mut renderer, &mut Silent)
}

/// Lay out a document described as JSON and return layout JSON.
pub fn render_json(json: &str) -> Result<Vec<u8>> {
    render_layout(&from_json(json)?)
}
