//! # Main-Axis Distribution
//!
//! Offsets for a line's items per `justify-content`. Offsets are margin-box
//! positions measured from the container's left edge, or from its right
//! edge for items anchored at the trailing side.

use serde::Serialize;

use crate::style::JustifyContent;

/// Where an item's margin box sits on the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MainOffset {
    /// Distance from the container's left edge to the item's left margin edge.
    Left(f64),
    /// Distance from the container's right edge to the item's right margin edge.
    Right(f64),
}

impl MainOffset {
    /// The offset expressed from the left edge.
    pub fn left_edge(self, outer_width: f64, container_width: f64) -> f64 {
        match self {
            MainOffset::Left(x) => x,
            MainOffset::Right(x) => container_width - x - outer_width,
        }
    }

    /// Swap anchors, for `row-reverse`.
    pub fn mirrored(self) -> Self {
        match self {
            MainOffset::Left(x) => MainOffset::Right(x),
            MainOffset::Right(x) => MainOffset::Left(x),
        }
    }
}

/// Compute one offset per item from the items' outer widths.
pub fn distribute(
    outer_widths: &[f64],
    container_width: f64,
    justify: JustifyContent,
) -> Vec<MainOffset> {
    let n = outer_widths.len();
    if n == 0 {
        return vec![];
    }
    let total: f64 = outer_widths.iter().sum();
    let slack = container_width - total;

    match justify {
        JustifyContent::FlexStart => from_start(outer_widths, 0.0, 0.0),
        JustifyContent::FlexEnd => from_end(outer_widths),
        JustifyContent::Center => from_start(outer_widths, slack / 2.0, 0.0),
        JustifyContent::SpaceBetween => {
            if n == 1 {
                return from_start(outer_widths, 0.0, 0.0);
            }
            let gap = slack / (n - 1) as f64;
            let mut offsets = from_start(outer_widths, 0.0, gap);
            offsets[n - 1] = MainOffset::Right(0.0);
            offsets
        }
        JustifyContent::SpaceAround => {
            if n == 1 {
                return from_start(outer_widths, slack / 2.0, 0.0);
            }
            let offset = slack / n as f64;
            from_start(outer_widths, offset / 2.0, offset)
        }
        JustifyContent::SpaceEvenly => {
            let offset = slack / (n + 1) as f64;
            from_start(outer_widths, offset, offset)
        }
    }
}

fn from_start(outer_widths: &[f64], start: f64, gap: f64) -> Vec<MainOffset> {
    let mut x = start;
    outer_widths
        .iter()
        .map(|&w| {
            let offset = MainOffset::Left(x);
            x += w + gap;
            offset
        })
        .collect()
}

fn from_end(outer_widths: &[f64]) -> Vec<MainOffset> {
    let mut offsets = vec![MainOffset::Right(0.0); outer_widths.len()];
    let mut x = 0.0;
    for (i, &w) in outer_widths.iter().enumerate().rev() {
        offsets[i] = MainOffset::Right(x);
        x += w;
    }
    offsets
}
