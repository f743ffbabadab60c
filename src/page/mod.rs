//! # Page Configuration and Geometry
//!
//! Everything about the physical page: named sizes, orientation, margins,
//! header/footer bands and watermarks. A [`PageConfig`] is what users write;
//! a [`PageGeometry`] is the resolved, immutable set of numbers the layout
//! engine works with.
//!
//! ```text
//!  ┌──────────────────────────────┐  ─┬─ margins.top
//!  │          header band         │   │  header_height
//!  ├──────────────────────────────┤  ─┴─ content_start_y
//!  │                              │
//!  │         content area         │   content_height
//!  │                              │
//!  ├──────────────────────────────┤  ─── max_y
//!  │          footer band         │      footer_height
//!  └──────────────────────────────┘  ─── page_height - margins.bottom
//! ```
//!
//! Nothing here is validated. Margins larger than the page simply produce
//! negative content dimensions, and the layout engine copes with that.

use serde::{Deserialize, Serialize};

use crate::style::{Color, Typeface};

const POINTS_PER_MM: f64 = 2.83465;
const POINTS_PER_INCH: f64 = 72.0;

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    A3,
    #[default]
    A4,
    A5,
    A6,
    B4,
    B5,
    Letter,
    Legal,
    Tabloid,
    Executive,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points, portrait.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::A6 => (297.64, 419.53),
            PageSize::B4 => (708.66, 1000.63),
            PageSize::B5 => (498.90, 708.66),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Executive => (522.0, 756.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    pub fn custom(width: f64, height: f64) -> Self {
        PageSize::Custom { width, height }
    }

    pub fn custom_mm(width_mm: f64, height_mm: f64) -> Self {
        PageSize::Custom {
            width: width_mm * POINTS_PER_MM,
            height: height_mm * POINTS_PER_MM,
        }
    }

    pub fn custom_inches(width_in: f64, height_in: f64) -> Self {
        PageSize::Custom {
            width: width_in * POINTS_PER_INCH,
            height: height_in * POINTS_PER_INCH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Edge values (top, right, bottom, left) in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub const NONE: Edges = Edges::uniform(0.0);
    /// One inch all around.
    pub const NORMAL: Edges = Edges::uniform(72.0);
    pub const NARROW: Edges = Edges::uniform(36.0);
    pub const MODERATE: Edges = Edges::uniform(54.0);
    pub const WIDE: Edges = Edges::uniform(108.0);

    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn from_mm(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: top * POINTS_PER_MM,
            right: right * POINTS_PER_MM,
            bottom: bottom * POINTS_PER_MM,
            left: left * POINTS_PER_MM,
        }
    }

    pub fn from_inches(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: top * POINTS_PER_INCH,
            right: right * POINTS_PER_INCH,
            bottom: bottom * POINTS_PER_INCH,
            left: left * POINTS_PER_INCH,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

// ── Header / footer bands ───────────────────────────────────────

/// A header or footer band. It only takes space when enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageBand {
    pub enabled: bool,
    pub height: f64,
    pub content: Option<BandContent>,
}

impl Default for PageBand {
    fn default() -> Self {
        Self {
            enabled: false,
            height: 40.0,
            content: None,
        }
    }
}

impl PageBand {
    pub fn new(height: f64, content: BandContent) -> Self {
        Self {
            enabled: true,
            height,
            content: Some(content),
        }
    }

    /// Vertical space the band reserves on every page.
    pub fn reserved_height(&self) -> f64 {
        if self.enabled {
            self.height
        } else {
            0.0
        }
    }

    /// Text for one page, or `None` when the band is off or empty.
    pub fn resolve_text(&self, page: usize, total: usize) -> Option<BandText> {
        self.content
            .as_ref()
            .filter(|_| self.enabled)
            .map(|content| content.resolve_text(page, total))
    }
}

/// Text shown inside a band. `{page}` and `{total}` are substituted per page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BandContent {
    pub left: Option<String>,
    pub center: Option<String>,
    pub right: Option<String>,
    pub show_page_number: bool,
    pub page_number_format: String,
    pub font_size: f64,
    pub color: Color,
    pub typeface: Typeface,
}

impl Default for BandContent {
    fn default() -> Self {
        Self {
            left: None,
            center: None,
            right: None,
            show_page_number: false,
            page_number_format: "Page {page} of {total}".to_string(),
            font_size: 10.0,
            color: Color::BLACK,
            typeface: Typeface::default(),
        }
    }
}

/// Band text for one concrete page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
}

impl BandContent {
    /// Substitute the page placeholders. The bare page number is only shown
    /// (centered) when no explicit slot text is configured.
    pub fn resolve_text(&self, page: usize, total: usize) -> BandText {
        let fill = |s: &String| substitute_page_numbers(s, page, total);
        let mut text = BandText {
            left: self.left.as_ref().map(fill),
            center: self.center.as_ref().map(fill),
            right: self.right.as_ref().map(fill),
        };
        if self.show_page_number
            && text.left.is_none()
            && text.center.is_none()
            && text.right.is_none()
        {
            text.center = Some(substitute_page_numbers(&self.page_number_format, page, total));
        }
        text
    }
}

fn substitute_page_numbers(text: &str, page: usize, total: usize) -> String {
    text.replace("{page}", &page.to_string())
        .replace("{total}", &total.to_string())
}

// ── Watermark ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatermarkPosition {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// A text watermark painted behind the content of every page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Watermark {
    pub text: String,
    pub font_size: f64,
    pub color: Color,
    pub typeface: Typeface,
    /// Degrees, counter-clockwise negative.
    pub rotation: f64,
    pub position: WatermarkPosition,
    pub repeat: bool,
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 48.0,
            color: Color::hex("#33000000"),
            typeface: Typeface::bold(),
            rotation: -45.0,
            position: WatermarkPosition::Center,
            repeat: false,
        }
    }
}

impl Watermark {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn confidential() -> Self {
        Self {
            color: Color::hex("#33FF0000"),
            ..Self::text("CONFIDENTIAL")
        }
    }

    pub fn draft() -> Self {
        Self::text("DRAFT")
    }

    pub fn copy() -> Self {
        Self::text("COPY")
    }

    /// Center point of a watermark of the given extent on a page.
    pub fn anchor(&self, geometry: &PageGeometry, width: f64, height: f64) -> (f64, f64) {
        let (pw, ph) = (geometry.page_width, geometry.page_height);
        let (mx, my) = (geometry.margins.left, geometry.margins.top);
        let left = mx + width / 2.0;
        let right = pw - mx - width / 2.0;
        let top = my + height / 2.0;
        let bottom = ph - my - height / 2.0;
        match self.position {
            WatermarkPosition::TopLeft => (left, top),
            WatermarkPosition::TopCenter => (pw / 2.0, top),
            WatermarkPosition::TopRight => (right, top),
            WatermarkPosition::CenterLeft => (left, ph / 2.0),
            WatermarkPosition::Center => (pw / 2.0, ph / 2.0),
            WatermarkPosition::CenterRight => (right, ph / 2.0),
            WatermarkPosition::BottomLeft => (left, bottom),
            WatermarkPosition::BottomCenter => (pw / 2.0, bottom),
            WatermarkPosition::BottomRight => (right, bottom),
        }
    }
}

// ── Page configuration ──────────────────────────────────────────

/// User-facing page configuration. Defaults to A4 portrait with one-inch
/// margins and no bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    pub size: PageSize,
    pub orientation: Orientation,
    pub margins: Edges,
    pub header: PageBand,
    pub footer: PageBand,
    pub background: Color,
    pub watermark: Option<Watermark>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            orientation: Orientation::Portrait,
            margins: Edges::NORMAL,
            header: PageBand::default(),
            footer: PageBand::default(),
            background: Color::WHITE,
            watermark: None,
        }
    }
}

impl PageConfig {
    /// Resolve to concrete numbers. Landscape swaps width and height.
    pub fn resolve(&self) -> PageGeometry {
        let (w, h) = self.size.dimensions();
        let (page_width, page_height) = match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };
        PageGeometry {
            page_width,
            page_height,
            margins: self.margins,
            header_height: self.header.reserved_height(),
            footer_height: self.footer.reserved_height(),
        }
    }
}

/// Resolved page dimensions. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margins: Edges,
    pub header_height: f64,
    pub footer_height: f64,
}

impl PageGeometry {
    pub fn content_width(&self) -> f64 {
        self.page_width - self.margins.horizontal()
    }

    pub fn content_height(&self) -> f64 {
        self.page_height - self.margins.vertical() - self.header_height - self.footer_height
    }

    pub fn content_start_x(&self) -> f64 {
        self.margins.left
    }

    pub fn content_start_y(&self) -> f64 {
        self.margins.top + self.header_height
    }

    /// Bottom edge of the content area.
    pub fn max_y(&self) -> f64 {
        self.page_height - self.margins.bottom - self.footer_height
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.content_width() > 0.0 && self.content_height() > 0.0)
    }
}
