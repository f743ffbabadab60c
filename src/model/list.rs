//! Bullet and numbered lists.

use serde::{Deserialize, Serialize};

use crate::font::FontContext;
use crate::style::{Color, Typeface};
use crate::text::TextLayout;

const LIST_LINE_HEIGHT: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListElement {
    pub items: Vec<String>,
    pub numbered: bool,
    pub bullet: String,
    pub font_size: f64,
    pub color: Color,
    pub typeface: Typeface,
    /// Space reserved left of the item text for the marker.
    pub indent: f64,
    pub item_spacing: f64,
    pub spacing_after: f64,
    /// Number printed for the first item. Chunks of a split list continue
    /// from where the previous chunk stopped.
    pub start_number: usize,
}

impl Default for ListElement {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            numbered: false,
            bullet: "\u{2022}".to_string(),
            font_size: 12.0,
            color: Color::BLACK,
            typeface: Typeface::default(),
            indent: 20.0,
            item_spacing: 4.0,
            spacing_after: 8.0,
            start_number: 1,
        }
    }
}

impl ListElement {
    pub fn bullets(items: Vec<String>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn numbered(items: Vec<String>) -> Self {
        Self {
            items,
            numbered: true,
            ..Default::default()
        }
    }

    /// Marker drawn before the item at `index` within this element.
    pub fn marker(&self, index: usize) -> String {
        if self.numbered {
            format!("{}.", self.start_number + index)
        } else {
            self.bullet.clone()
        }
    }

    /// Height of one item including its trailing item spacing.
    pub fn item_height(&self, item: &str, available_width: f64, fonts: &FontContext) -> f64 {
        let lines = TextLayout::new().line_count(
            fonts,
            item,
            available_width - self.indent,
            self.font_size,
            &self.typeface,
        );
        lines as f64 * self.font_size * LIST_LINE_HEIGHT + self.item_spacing
    }

    pub fn measure_height(&self, available_width: f64, fonts: &FontContext) -> f64 {
        let items: f64 = self
            .items
            .iter()
            .map(|item| self.item_height(item, available_width, fonts))
            .sum();
        items + self.spacing_after
    }
}
