//! # Font Management
//!
//! Width measurement is the only thing layout needs from a font. The
//! standard PDF families (Helvetica, Times, Courier) are always available
//! from built-in width tables; TrueType/OpenType fonts can be registered and
//! are measured from their `hmtx` advances via ttf-parser.

pub mod metrics;

use std::collections::HashMap;

pub use metrics::StandardFontMetrics;

use crate::error::QuireError;
use crate::style::Typeface;

/// A font registry that maps font family + weight + style to font data.
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

impl FontKey {
    fn new(family: &str, weight: u32, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            weight,
            italic,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FontData {
    /// One of the standard PDF fonts. Measured from built-in tables.
    Standard(StandardFont),
    /// A registered TrueType/OpenType font.
    Custom(CustomFontMetrics),
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
}

impl CustomFontMetrics {
    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Parse metrics from font data using ttf-parser.
    pub fn from_font_data(data: &[u8]) -> Result<Self, QuireError> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| QuireError::Font(format!("Failed to parse font: {}", e)))?;
        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(QuireError::Font("Font reports zero units per em".to_string()));
        }

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Ok(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
        })
    }
}

/// The standard PDF fonts Quire can measure without any font data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// PostScript base name, the face a renderer should draw with.
    pub fn base_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => &metrics::HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &metrics::HELVETICA_BOLD,
            Self::TimesRoman | Self::TimesItalic => &metrics::TIMES_ROMAN,
            Self::TimesBold | Self::TimesBoldItalic => &metrics::TIMES_BOLD,
            Self::Courier | Self::CourierBold | Self::CourierOblique | Self::CourierBoldOblique => {
                &metrics::COURIER
            }
        }
    }
}

static HELVETICA: FontData = FontData::Standard(StandardFont::Helvetica);

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let mut fonts = HashMap::new();

        let standard_mappings = [
            (("Helvetica", 400, false), StandardFont::Helvetica),
            (("Helvetica", 700, false), StandardFont::HelveticaBold),
            (("Helvetica", 400, true), StandardFont::HelveticaOblique),
            (("Helvetica", 700, true), StandardFont::HelveticaBoldOblique),
            (("Times", 400, false), StandardFont::TimesRoman),
            (("Times", 700, false), StandardFont::TimesBold),
            (("Times", 400, true), StandardFont::TimesItalic),
            (("Times", 700, true), StandardFont::TimesBoldItalic),
            (("Courier", 400, false), StandardFont::Courier),
            (("Courier", 700, false), StandardFont::CourierBold),
            (("Courier", 400, true), StandardFont::CourierOblique),
            (("Courier", 700, true), StandardFont::CourierBoldOblique),
        ];

        for ((family, weight, italic), font) in standard_mappings {
            fonts.insert(FontKey::new(family, weight, italic), FontData::Standard(font));
        }

        Self { fonts }
    }

    /// Look up a font, falling back to Helvetica if not found.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        if let Some(font) = self.fonts.get(&FontKey::new(family, weight, italic)) {
            return font;
        }

        // Try with normalized weight (snap to 400 or 700)
        let snapped_weight = if weight >= 600 { 700 } else { 400 };
        if let Some(font) = self.fonts.get(&FontKey::new(family, snapped_weight, italic)) {
            return font;
        }

        self.fonts
            .get(&FontKey::new("Helvetica", snapped_weight, italic))
            .unwrap_or(&HELVETICA)
    }

    /// Register a TrueType/OpenType font under a family name.
    pub fn register(
        &mut self,
        family: &str,
        weight: u32,
        italic: bool,
        data: &[u8],
    ) -> Result<(), QuireError> {
        let metrics = CustomFontMetrics::from_font_data(data)?;
        log::debug!("registered font {} {} italic={}", family, weight, italic);
        self.fonts
            .insert(FontKey::new(family, weight, italic), FontData::Custom(metrics));
        Ok(())
    }

    pub fn contains(&self, family: &str, weight: u32, italic: bool) -> bool {
        self.fonts.contains_key(&FontKey::new(family, weight, italic))
    }
}

/// Shared font context used by measurement and layout.
///
/// Immutable during layout; share it by reference.
pub struct FontContext {
    registry: FontRegistry,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(
        &self,
        ch: char,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
    ) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(std_font) => std_font.metrics().char_width(ch, font_size),
            FontData::Custom(m) => m.char_width(ch, font_size),
        }
    }

    /// Measure the width of a string in points.
    pub fn measure_string(
        &self,
        text: &str,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
        letter_spacing: f64,
    ) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(std_font) => {
                std_font
                    .metrics()
                    .measure_string(text, font_size, letter_spacing)
            }
            FontData::Custom(m) => text
                .chars()
                .map(|ch| m.char_width(ch, font_size) + letter_spacing)
                .sum(),
        }
    }

    /// Measure a string in the given typeface.
    pub fn measure(&self, text: &str, typeface: &Typeface, font_size: f64) -> f64 {
        self.measure_string(
            text,
            &typeface.family,
            typeface.weight,
            typeface.is_italic(),
            font_size,
            0.0,
        )
    }

    /// Resolve a font key to its font data.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        self.registry.resolve(family, weight, italic)
    }

    /// Name of the face that will actually be used for a typeface, after
    /// weight snapping and fallback.
    pub fn face_name(&self, typeface: &Typeface) -> String {
        match self.resolve(&typeface.family, typeface.weight, typeface.is_italic()) {
            FontData::Standard(std_font) => std_font.base_name().to_string(),
            FontData::Custom(_) => typeface.family.clone(),
        }
    }

    /// Access the underlying font registry.
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    /// Access the underlying font registry mutably.
    pub fn registry_mut(&mut self) -> &mut FontRegistry {
        &mut self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_context_helvetica() {
        let ctx = FontContext::new();
        let w = ctx.char_width(' ', "Helvetica", 400, false, 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_font_context_bold_wider() {
        let ctx = FontContext::new();
        let regular = ctx.measure("abc", &Typeface::default(), 12.0);
        let bold = ctx.measure("abc", &Typeface::bold(), 12.0);
        assert!(bold > regular, "Bold text should be wider than regular");
    }

    #[test]
    fn test_font_context_fallback() {
        let ctx = FontContext::new();
        let w1 = ctx.char_width('A', "Helvetica", 400, false, 12.0);
        let w2 = ctx.char_width('A', "UnknownFont", 400, false, 12.0);
        assert!((w1 - w2).abs() < 0.001);
    }

    #[test]
    fn test_font_context_weight_resolution() {
        let ctx = FontContext::new();
        let w700 = ctx.char_width('A', "Helvetica", 700, false, 12.0);
        let w800 = ctx.char_width('A', "Helvetica", 800, false, 12.0);
        assert!((w700 - w800).abs() < 0.001);
    }

    #[test]
    fn test_oblique_shares_upright_widths() {
        let ctx = FontContext::new();
        let upright = ctx.measure_string("Quire", "Times", 400, false, 12.0, 0.0);
        let italic = ctx.measure_string("Quire", "Times", 400, true, 12.0, 0.0);
        assert!((upright - italic).abs() < 1e-9);
    }

    #[test]
    fn test_face_name_follows_fallback() {
        let ctx = FontContext::new();
        assert_eq!(ctx.face_name(&Typeface::bold()), "Helvetica-Bold");
        assert_eq!(ctx.face_name(&Typeface::new("Times").with_weight(800)), "Times-Bold");
        assert_eq!(ctx.face_name(&Typeface::new("Nope")), "Helvetica");
    }

    #[test]
    fn test_register_garbage_font_fails() {
        let mut ctx = FontContext::new();
        let result = ctx.registry_mut().register("Broken", 400, false, b"not a font");
        assert!(matches!(result, Err(QuireError::Font(_))));
        assert!(!ctx.registry().contains("Broken", 400, false));
    }
}
