//! # Renderer Boundary
//!
//! Layout decides where things go; a [`PageRenderer`] decides what they look
//! like. [`build`] drives the whole pipeline:
//!
//! ```text
//! Document ──layout──▶ pages ──PageRenderer──▶ bytes ──Output──▶ memory | file
//!                        │
//!                        └─ BuildListener: start, progress per page, success | failure
//! ```
//!
//! Renderer failures are reported with the page and element that caused
//! them. A file output is either written completely or not left behind.

pub mod json;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{QuireError, Result};
use crate::font::FontContext;
use crate::layout::{LayoutEngine, LayoutPage, Placement};
use crate::model::{Document, Metadata};
use crate::page::{BandText, PageConfig, PageGeometry};

pub use json::LayoutInfoRenderer;

/// Everything a renderer needs to set up one page.
#[derive(Debug, Clone)]
pub struct PageFrame<'a> {
    pub page_number: usize,
    pub total_pages: usize,
    pub geometry: &'a PageGeometry,
    pub config: &'a PageConfig,
    /// Header text with page placeholders filled in. `None` when disabled.
    pub header: Option<BandText>,
    pub footer: Option<BandText>,
}

/// Draws laid-out pages into some output format.
///
/// Calls arrive in order: `begin_document`, then for each page `begin_page`,
/// `draw` per placement and `end_page`, then `finish` once.
pub trait PageRenderer {
    /// Extension appended to output files named without one.
    fn file_extension(&self) -> &'static str;

    fn begin_document(&mut self, _metadata: &Metadata, _total_pages: usize) -> std::result::Result<(), String> {
        Ok(())
    }

    fn begin_page(&mut self, frame: &PageFrame<'_>) -> std::result::Result<(), String>;

    fn draw(&mut self, placement: &Placement<'_>) -> std::result::Result<(), String>;

    fn end_page(&mut self) -> std::result::Result<(), String>;

    fn finish(&mut self) -> std::result::Result<Vec<u8>, String>;
}

/// Where the rendered bytes go.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Keep the bytes in memory.
    Bytes,
    /// Write to this exact path.
    File(PathBuf),
    /// Write `file_name` inside `dir`, creating the directory if missing.
    /// The renderer's extension is added when `file_name` has none.
    Directory { dir: PathBuf, file_name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuildResult {
    Bytes { bytes: Vec<u8>, page_count: usize },
    File { path: PathBuf, size: u64, page_count: usize },
}

impl BuildResult {
    pub fn page_count(&self) -> usize {
        match self {
            BuildResult::Bytes { page_count, .. } | BuildResult::File { page_count, .. } => {
                *page_count
            }
        }
    }
}

/// Observer for a build. Every callback defaults to a no-op.
pub trait BuildListener {
    fn on_start(&mut self) {}
    fn on_progress(&mut self, _page: usize, _total: usize) {}
    fn on_success(&mut self, _result: &BuildResult) {}
    fn on_failure(&mut self, _error: &QuireError) {}
}

/// Listener that ignores every event.
pub struct Silent;

impl BuildListener for Silent {}

/// Lay out, render and deliver a document.
///
/// The listener sees `on_start` first and exactly one of `on_success` or
/// `on_failure` last; the same outcome is returned.
pub fn build(
    document: &Document,
    fonts: &FontContext,
    renderer: &mut dyn PageRenderer,
    output: &Output,
    listener: &mut dyn BuildListener,
) -> Result<BuildResult> {
    listener.on_start();
    let result = run_build(document, fonts, renderer, output, listener);
    match &result {
        Ok(done) => {
            log::info!("build finished: {} page(s)", done.page_count());
            listener.on_success(done);
        }
        Err(e) => {
            log::warn!("build failed: {}", e);
            listener.on_failure(e);
        }
    }
    result
}

fn run_build(
    document: &Document,
    fonts: &FontContext,
    renderer: &mut dyn PageRenderer,
    output: &Output,
    listener: &mut dyn BuildListener,
) -> Result<BuildResult> {
    let pages = LayoutEngine::new().layout(document, fonts)?;
    let page_count = pages.len();
    let bytes = render_pages(document, &pages, renderer, listener)?;

    let path = match output {
        Output::Bytes => return Ok(BuildResult::Bytes { bytes, page_count }),
        Output::File(path) => path.clone(),
        Output::Directory { dir, file_name } => {
            fs::create_dir_all(dir)?;
            let mut path = dir.join(file_name);
            if Path::new(file_name).extension().is_none() {
                path.set_extension(renderer.file_extension());
            }
            path
        }
    };

    let size = write_output(&path, &bytes)?;
    Ok(BuildResult::File { path, size, page_count })
}

/// Feed laid-out pages through a renderer.
pub fn render_pages(
    document: &Document,
    pages: &[LayoutPage<'_>],
    renderer: &mut dyn PageRenderer,
    listener: &mut dyn BuildListener,
) -> Result<Vec<u8>> {
    let config = &document.config;
    let geometry = config.resolve();
    let total = pages.len();

    renderer
        .begin_document(&document.metadata, total)
        .map_err(QuireError::Renderer)?;

    for page in pages {
        let n = page.page_number;
        listener.on_progress(n, total);

        let frame = PageFrame {
            page_number: n,
            total_pages: total,
            geometry: &geometry,
            config,
            header: config.header.resolve_text(n, total),
            footer: config.footer.resolve_text(n, total),
        };
        renderer
            .begin_page(&frame)
            .map_err(|message| QuireError::RenderPage { page: n, message })?;

        for placement in &page.placements {
            renderer.draw(placement).map_err(|message| QuireError::Render {
                page: n,
                element_index: placement.element_index,
                element: placement.element.kind_name(),
                message,
            })?;
        }

        renderer
            .end_page()
            .map_err(|message| QuireError::RenderPage { page: n, message })?;
    }

    renderer.finish().map_err(QuireError::Renderer)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<u64> {
    write_with(path, bytes, |p: &Path| fs::File::create(p))
}

/// Write the whole buffer or remove what was written.
fn write_with<W: Write>(
    path: &Path,
    bytes: &[u8],
    open: impl FnOnce(&Path) -> io::Result<W>,
) -> Result<u64> {
    let mut out = open(path)?;
    let written = out.write_all(bytes).and_then(|()| out.flush());
    drop(out);
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(path) {
            log::warn!("could not remove partial output {}: {}", path.display(), cleanup);
        }
        return Err(e.into());
    }
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len() as u64)
}
