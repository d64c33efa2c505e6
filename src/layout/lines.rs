//! # Line Building
//!
//! Partitions the ordered items into main-axis lines. Items are never split:
//! an item wider than the container still gets a line of its own and is
//! allowed to overflow.

use super::flex::FlexItem;

/// An ordered run of items sharing one main-axis row.
#[derive(Debug, Clone, Default)]
pub struct FlexLine {
    pub items: Vec<FlexItem>,
    /// Cross-axis extent, filled in by the cross size pass.
    pub height: f64,
}

impl FlexLine {
    fn new(items: Vec<FlexItem>) -> Self {
        Self { items, height: 0.0 }
    }
}

/// A single line of items, as index range into an outer-size slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapLine {
    /// Index of the first item in this line.
    pub start: usize,
    /// One past the last item (exclusive end).
    pub end: usize,
}

/// Partition outer sizes into wrap lines based on available width.
/// Always adds at least one item per line (prevents infinite loops on oversized items).
pub fn partition_into_lines(outer_sizes: &[f64], available_width: f64) -> Vec<WrapLine> {
    if outer_sizes.is_empty() {
        return vec![];
    }

    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut line_width = 0.0;

    for (i, &w) in outer_sizes.iter().enumerate() {
        if i > line_start && line_width + w > available_width {
            lines.push(WrapLine {
                start: line_start,
                end: i,
            });
            line_start = i;
            line_width = w;
        } else {
            line_width += w;
        }
    }

    lines.push(WrapLine {
        start: line_start,
        end: outer_sizes.len(),
    });

    lines
}

/// Sort items by `order` (stable, so ties keep document order) and split
/// them into lines. With `line_reverse` the list of lines is reversed; the
/// items inside each line are not.
pub fn build_lines(
    mut items: Vec<FlexItem>,
    container_width: f64,
    single_line: bool,
    line_reverse: bool,
) -> Vec<FlexLine> {
    items.sort_by_key(|item| item.attrs.order);

    if items.is_empty() {
        return vec![];
    }

    let mut lines = if single_line {
        vec![FlexLine::new(items)]
    } else {
        let outer: Vec<f64> = items.iter().map(FlexItem::outer_base_size).collect();
        let ranges = partition_into_lines(&outer, container_width);

        let mut rest = items.into_iter();
        ranges
            .iter()
            .map(|r| FlexLine::new(rest.by_ref().take(r.end - r.start).collect()))
            .collect()
    };

    if line_reverse {
        lines.reverse();
    }
    lines
}
