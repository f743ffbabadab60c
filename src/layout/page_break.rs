//! # Page Break Decisions
//!
//! Logic for deciding what happens to an element that meets the bottom of a
//! page, and the splitters that cut tables and lists into page-sized chunks.
//!
//! Both splitters walk their rows/items greedily. The first chunk is
//! budgeted against whatever is left on the current page, every later chunk
//! against a full page. A row or item is never split further, and a chunk
//! after the first always takes at least one, so splitting terminates even
//! when a single row is taller than a page.

use crate::font::FontContext;
use crate::model::{ListElement, TableElement, TableRow};

/// What to do with an element at the current cursor position.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Place the entire element on the current page (it fits).
    Place,
    /// Hand the element to its splitter.
    Split,
    /// Move the entire element to the next page (unbreakable).
    MoveToNextPage,
}

/// Given an element's height and the space left on the page, decide how to
/// break. Only tables and lists are breakable.
pub fn decide_break(height: f64, remaining_height: f64, is_breakable: bool) -> BreakDecision {
    if height <= remaining_height {
        BreakDecision::Place
    } else if is_breakable {
        BreakDecision::Split
    } else {
        BreakDecision::MoveToNextPage
    }
}

/// Result of running a splitter.
#[derive(Debug, Clone, PartialEq)]
pub enum Split<T> {
    /// Nothing to split on; treat the element as atomic.
    Whole,
    /// Ordered pieces. Contains at least one [`Piece::Chunk`].
    Pieces(Vec<Piece<T>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Piece<T> {
    /// Not even one row/item fits in the space left on the current page.
    /// The engine moves to a fresh page before the first chunk.
    NextPage,
    Chunk(T),
}

impl<T> Split<T> {
    /// Number of chunks, ignoring page signals.
    pub fn chunk_count(&self) -> usize {
        match self {
            Split::Whole => 0,
            Split::Pieces(pieces) => pieces
                .iter()
                .filter(|p| matches!(p, Piece::Chunk(_)))
                .count(),
        }
    }
}

/// Greedy accumulation shared by both splitters.
///
/// `costs[i]` is the height of unit `i`; `seed` is the fixed height every
/// chunk starts with (a repeated header). Returns the unit ranges of each
/// chunk, plus whether the first budget could not take a single unit.
fn partition(costs: &[f64], seed: f64, first_budget: f64, full_budget: f64) -> (bool, Vec<(usize, usize)>) {
    let mut ranges = Vec::new();
    let mut deferred = false;
    let mut start = 0;
    let mut used = seed;
    let mut budget = first_budget;
    let mut first_chunk = true;

    for (i, &cost) in costs.iter().enumerate() {
        if used + cost <= budget {
            used += cost;
            continue;
        }
        if i > start {
            ranges.push((start, i));
        } else if first_chunk {
            deferred = true;
        }
        // Later chunks take this unit unconditionally.
        first_chunk = false;
        budget = full_budget;
        start = i;
        used = seed + cost;
    }

    if start < costs.len() {
        ranges.push((start, costs.len()));
    }
    (deferred, ranges)
}

/// Split a table into chunks that each start with the header row.
///
/// The header is the first row flagged `is_header`; any further header rows
/// travel with the data so no row is lost. Every chunk but the last has its
/// trailing spacing removed.
pub fn split_table(
    table: &TableElement,
    available_width: f64,
    first_page_height: f64,
    full_page_height: f64,
    fonts: &FontContext,
) -> Split<TableElement> {
    let widths = table.column_widths_for(available_width);
    let header_index = table.rows.iter().position(|r| r.is_header);
    let header: Option<&TableRow> = header_index.map(|i| &table.rows[i]);
    let header_height = header
        .map(|row| table.row_height(row, &widths, fonts))
        .unwrap_or(0.0);

    let data: Vec<&TableRow> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != header_index)
        .map(|(_, row)| row)
        .collect();

    if data.is_empty() {
        return Split::Whole;
    }

    let costs: Vec<f64> = data
        .iter()
        .map(|row| table.row_height(row, &widths, fonts))
        .collect();
    let (deferred, ranges) = partition(&costs, header_height, first_page_height, full_page_height);

    let last = ranges.len().saturating_sub(1);
    let mut pieces = Vec::with_capacity(ranges.len() + 1);
    if deferred {
        pieces.push(Piece::NextPage);
    }
    for (n, (start, end)) in ranges.into_iter().enumerate() {
        let rows: Vec<TableRow> = header
            .into_iter()
            .chain(data[start..end].iter().copied())
            .cloned()
            .collect();
        pieces.push(Piece::Chunk(TableElement {
            rows,
            spacing_after: if n == last { table.spacing_after } else { 0.0 },
            ..table.clone()
        }));
    }

    log::debug!(
        "split table of {} data rows into {} chunk(s)",
        data.len(),
        pieces.len() - usize::from(deferred)
    );
    Split::Pieces(pieces)
}

/// Split a list into chunks. Numbered chunks continue the numbering of the
/// original list.
pub fn split_list(
    list: &ListElement,
    available_width: f64,
    first_page_height: f64,
    full_page_height: f64,
    fonts: &FontContext,
) -> Split<ListElement> {
    if list.items.is_empty() {
        return Split::Whole;
    }

    let costs: Vec<f64> = list
        .items
        .iter()
        .map(|item| list.item_height(item, available_width, fonts))
        .collect();
    let (deferred, ranges) = partition(&costs, 0.0, first_page_height, full_page_height);

    let last = ranges.len().saturating_sub(1);
    let mut pieces = Vec::with_capacity(ranges.len() + 1);
    if deferred {
        pieces.push(Piece::NextPage);
    }
    for (n, (start, end)) in ranges.into_iter().enumerate() {
        pieces.push(Piece::Chunk(ListElement {
            items: list.items[start..end].to_vec(),
            start_number: list.start_number + start,
            spacing_after: if n == last { list.spacing_after } else { 0.0 },
            ..list.clone()
        }));
    }

    log::debug!(
        "split list of {} items into {} chunk(s)",
        list.items.len(),
        pieces.len() - usize::from(deferred)
    );
    Split::Pieces(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableCell, TableElement};

    fn fc() -> FontContext {
        FontContext::new()
    }

    /// Header + `n` single-line rows at 10pt/4pt padding: every row is 24pt.
    fn table(n: usize) -> TableElement {
        let cell = |s: String| TableCell {
            font_size: 10.0,
            ..TableCell::new(&s)
        };
        let mut rows = vec![TableRow::header(vec![cell("Name".into()), cell("Qty".into())])];
        for i in 0..n {
            rows.push(TableRow::new(vec![cell(format!("Item {}", i)), cell(i.to_string())]));
        }
        TableElement::new(rows)
    }

    fn chunks<T: Clone>(split: &Split<T>) -> Vec<T> {
        match split {
            Split::Whole => vec![],
            Split::Pieces(p) => p
                .iter()
                .filter_map(|p| match p {
                    Piece::Chunk(c) => Some(c.clone()),
                    Piece::NextPage => None,
                })
                .collect(),
        }
    }

    #[test]
    fn everything_fits() {
        assert_eq!(decide_break(50.0, 100.0, false), BreakDecision::Place);
        assert_eq!(decide_break(100.0, 100.0, true), BreakDecision::Place);
    }

    #[test]
    fn unbreakable_moves() {
        assert_eq!(decide_break(150.0, 100.0, false), BreakDecision::MoveToNextPage);
        assert_eq!(decide_break(150.0, 100.0, true), BreakDecision::Split);
    }

    #[test]
    fn table_split_repeats_header() {
        let t = table(25);
        let split = split_table(&t, 400.0, 200.0, 700.0, &fc());
        let parts = chunks(&split);
        assert_eq!(parts.len(), 2);
        // 24 + 7 * 24 = 192 <= 200, an 8th row would need 216.
        assert_eq!(parts[0].rows.len(), 1 + 7);
        assert_eq!(parts[1].rows.len(), 1 + 18);
        for part in &parts {
            assert!(part.rows[0].is_header);
            assert_eq!(part.rows.iter().filter(|r| r.is_header).count(), 1);
        }
        assert_eq!(parts[0].spacing_after, 0.0);
        assert_eq!(parts[1].spacing_after, t.spacing_after);
    }

    #[test]
    fn table_split_preserves_row_order() {
        let t = table(60);
        let parts = chunks(&split_table(&t, 400.0, 100.0, 300.0, &fc()));
        let data: Vec<String> = parts
            .iter()
            .flat_map(|p| p.rows.iter().filter(|r| !r.is_header))
            .map(|r| r.cells[0].content.clone())
            .collect();
        let expected: Vec<String> = (0..60).map(|i| format!("Item {}", i)).collect();
        assert_eq!(data, expected);
    }

    #[test]
    fn header_only_fit_defers_to_next_page() {
        let t = table(5);
        let split = split_table(&t, 400.0, 30.0, 700.0, &fc());
        match &split {
            Split::Pieces(pieces) => {
                assert_eq!(pieces[0], Piece::NextPage);
                assert_eq!(pieces.len(), 2);
            }
            Split::Whole => panic!("expected pieces"),
        }
        assert_eq!(chunks(&split)[0].rows.len(), 6);
    }

    #[test]
    fn table_without_data_rows_is_whole() {
        let t = TableElement::new(vec![TableRow::header(vec![TableCell::new("H")])]);
        assert_eq!(split_table(&t, 400.0, 0.0, 700.0, &fc()), Split::Whole);
        assert_eq!(split_table(&TableElement::default(), 400.0, 0.0, 700.0, &fc()), Split::Whole);
    }

    #[test]
    fn oversized_rows_still_advance() {
        // Budgets smaller than one row: one row per chunk, no infinite loop.
        let t = table(3);
        let split = split_table(&t, 400.0, 10.0, 10.0, &fc());
        assert_eq!(split.chunk_count(), 3);
    }

    #[test]
    fn second_header_row_travels_as_data() {
        let mut t = table(2);
        t.rows.insert(2, TableRow::header(vec![TableCell::new("Sub")]));
        let parts = chunks(&split_table(&t, 400.0, 1000.0, 1000.0, &fc()));
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].rows.len(), 4);
    }

    fn list(n: usize) -> ListElement {
        ListElement::numbered((0..n).map(|i| format!("Item {}", i)).collect())
    }

    #[test]
    fn list_numbering_continues() {
        // Each item: 12 * 1.2 + 4 = 18.4pt.
        let l = list(10);
        let parts = chunks(&split_list(&l, 400.0, 40.0, 60.0, &fc()));
        let numbers: Vec<usize> = parts
            .iter()
            .flat_map(|c| (0..c.items.len()).map(move |i| c.start_number + i))
            .collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
        assert_eq!(parts[0].items.len(), 2);
        assert_eq!(parts[1].items.len(), 3);
        assert!(parts[..parts.len() - 1].iter().all(|c| c.spacing_after == 0.0));
        assert_eq!(parts.last().map(|c| c.spacing_after), Some(8.0));
    }

    #[test]
    fn list_continues_from_custom_start() {
        let mut l = list(4);
        l.start_number = 11;
        let parts = chunks(&split_list(&l, 400.0, 20.0, 20.0, &fc()));
        let starts: Vec<usize> = parts.iter().map(|c| c.start_number).collect();
        assert_eq!(starts, vec![11, 12, 13, 14]);
    }

    #[test]
    fn list_first_item_too_tall_defers() {
        let split = split_list(&list(2), 400.0, 5.0, 100.0, &fc());
        match split {
            Split::Pieces(pieces) => assert_eq!(pieces[0], Piece::NextPage),
            Split::Whole => panic!("expected pieces"),
        }
    }

    #[test]
    fn empty_list_is_whole() {
        assert_eq!(split_list(&ListElement::default(), 400.0, 0.0, 100.0, &fc()), Split::Whole);
    }
}
