//! Tables: rows of text cells with an optional repeating header row.

use serde::{Deserialize, Serialize};

use crate::font::FontContext;
use crate::style::{Color, TextAlign, Typeface};
use crate::text::TextLayout;

/// Rows never measure shorter than this.
pub const MIN_ROW_HEIGHT: f64 = 24.0;

/// Line height multiplier for cell text.
const CELL_LINE_HEIGHT: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableElement {
    pub rows: Vec<TableRow>,
    /// Explicit column widths in points. Equal shares when absent.
    pub column_widths: Option<Vec<f64>>,
    pub border_width: f64,
    pub border_color: Color,
    pub header_background: Color,
    pub alternate_row_color: Option<Color>,
    pub spacing_after: f64,
}

impl Default for TableElement {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            column_widths: None,
            border_width: 0.5,
            border_color: Color::BLACK,
            header_background: Color::hex("#EEEEEE"),
            alternate_row_color: None,
            spacing_after: 8.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub is_header: bool,
    pub min_height: f64,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            ..Default::default()
        }
    }

    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
            ..Default::default()
        }
    }

    /// A row of plain cells built from strings.
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        Self::new(texts.iter().map(|t| TableCell::new(t.as_ref())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableCell {
    pub content: String,
    pub font_size: f64,
    pub color: Color,
    pub background: Option<Color>,
    pub typeface: Typeface,
    pub align: TextAlign,
    pub padding: f64,
    /// Carried for renderers; layout measures every cell in its own column.
    pub col_span: u32,
    pub row_span: u32,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_size: 11.0,
            color: Color::BLACK,
            background: None,
            typeface: Typeface::default(),
            align: TextAlign::Left,
            padding: 4.0,
            col_span: 1,
            row_span: 1,
        }
    }
}

impl TableCell {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            ..Default::default()
        }
    }

    pub fn bold(content: &str) -> Self {
        Self {
            typeface: Typeface::bold(),
            ..Self::new(content)
        }
    }
}

impl TableElement {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Number of columns: the widest row, at least one.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.cells.len())
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Resolve column widths for the available width.
    pub fn column_widths_for(&self, available_width: f64) -> Vec<f64> {
        if let Some(widths) = &self.column_widths {
            return widths.clone();
        }
        let columns = self.column_count();
        vec![available_width / columns as f64; columns]
    }

    /// The first row flagged as a header.
    pub fn header_row(&self) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.is_header)
    }

    /// Height of one row: the tallest cell, never below the row's minimum
    /// or [`MIN_ROW_HEIGHT`]. Cells beyond the column count are ignored.
    pub fn row_height(&self, row: &TableRow, column_widths: &[f64], fonts: &FontContext) -> f64 {
        let text_layout = TextLayout::new();
        row.cells
            .iter()
            .zip(column_widths)
            .map(|(cell, column)| {
                let lines = text_layout.line_count(
                    fonts,
                    &cell.content,
                    column - cell.padding * 2.0,
                    cell.font_size,
                    &cell.typeface,
                );
                lines as f64 * cell.font_size * CELL_LINE_HEIGHT + cell.padding * 2.0
            })
            .fold(row.min_height.max(MIN_ROW_HEIGHT), f64::max)
    }

    pub fn measure_height(&self, available_width: f64, fonts: &FontContext) -> f64 {
        let widths = self.column_widths_for(available_width);
        let rows: f64 = self
            .rows
            .iter()
            .map(|row| self.row_height(row, &widths, fonts))
            .sum();
        rows + self.spacing_after
    }
}
