//! # Flexible Length Resolution
//!
//! Turns grow/shrink factors into concrete main sizes for one line.
//!
//! Each item moves through a two-state machine, `Unresolved → Frozen`,
//! exactly once. A pass over the line computes a candidate size for every
//! unresolved item from the remaining free space, clamps it to the item's
//! min/max, and freezes:
//!
//! - everything, when no candidate was clamped;
//! - only the min-clamped items, when the clamps added space overall;
//! - only the max-clamped items, when the clamps removed space overall.
//!
//! Grow or shrink is picked once, from the min/max-clamped base sizes.
//! Items that cannot move in that direction freeze before the first pass.
//!
//! Every pass with a clamp freezes at least one item, so a line of `n`
//! items settles in at most `n` passes.

use crate::model::{BoxId, BoxMetrics, Geometry};
use crate::style::ItemAttributes;

use super::BoxMutator;

/// Resolution state of an item's main size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemState {
    Unresolved,
    Frozen { size: f64 },
}

/// The engine's working unit: one participating box plus derived state.
#[derive(Debug, Clone)]
pub struct FlexItem {
    pub id: BoxId,
    /// Position in the host's child list.
    pub index: usize,
    pub attrs: ItemAttributes,
    pub metrics: BoxMetrics,
    /// Resolved basis (content-box width).
    pub base_size: f64,
    pub state: ItemState,
}

impl FlexItem {
    pub fn new(
        id: BoxId,
        index: usize,
        attrs: ItemAttributes,
        metrics: BoxMetrics,
        base_size: f64,
    ) -> Self {
        Self {
            id,
            index,
            attrs,
            metrics,
            base_size,
            state: ItemState::Unresolved,
        }
    }

    pub fn outer_base_size(&self) -> f64 {
        self.base_size + self.metrics.main_extras()
    }

    /// Base size clamped to min/max.
    pub fn hypothetical_size(&self) -> f64 {
        clamp_main_size(&self.attrs, self.base_size).size
    }

    /// Final content-box width, once frozen.
    pub fn main_size(&self) -> Option<f64> {
        match self.state {
            ItemState::Frozen { size } => Some(size),
            ItemState::Unresolved => None,
        }
    }

    pub fn outer_main_size(&self) -> Option<f64> {
        self.main_size().map(|s| s + self.metrics.main_extras())
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.state, ItemState::Frozen { .. })
    }

    pub fn is_inflexible(&self) -> bool {
        self.attrs.is_inflexible()
    }

    fn freeze<M: BoxMutator>(&mut self, size: f64, mutator: &mut M) {
        debug_assert!(!self.is_frozen(), "item {:?} frozen twice", self.id);
        self.state = ItemState::Frozen { size };
        mutator.apply_geometry(self.id, &Geometry::width(size));
    }
}

/// Which factor distributes the line's free space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexMode {
    Grow,
    Shrink,
}

/// Which bound a clamp hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Min,
    Max,
}

/// A candidate size after min/max clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub size: f64,
    pub violation: Option<Violation>,
}

/// Clamp a candidate main size to `[min-width, max-width]`. Sizes never go
/// below zero; when min exceeds max, min wins.
pub fn clamp_main_size(attrs: &ItemAttributes, size: f64) -> Clamped {
    let min = attrs.min_width.unwrap_or(0.0).max(0.0);
    let max = attrs.max_width.unwrap_or(f64::INFINITY);
    let clamped = size.min(max).max(min);

    let violation = if clamped > size {
        Some(Violation::Min)
    } else if clamped < size {
        Some(Violation::Max)
    } else {
        None
    };

    Clamped {
        size: clamped,
        violation,
    }
}

/// Unclamped target size for one item.
///
/// `factor_sum` is the sum of the active factor over unfrozen items; in
/// shrink mode `scaled_shrink_sum` is the sum of `shrink * base_size`.
/// Free space of the wrong sign for `mode` leaves the item at its base size.
pub fn target_main_size(
    item: &FlexItem,
    mode: FlexMode,
    remaining_free_space: f64,
    factor_sum: f64,
    scaled_shrink_sum: f64,
) -> f64 {
    if remaining_free_space == 0.0 {
        return item.base_size;
    }

    match mode {
        FlexMode::Grow => {
            let ratio = if factor_sum > 0.0 {
                item.attrs.grow / factor_sum
            } else {
                0.0
            };
            item.base_size + remaining_free_space.max(0.0) * ratio
        }
        FlexMode::Shrink => {
            let scaled = item.attrs.shrink * item.base_size;
            let ratio = if scaled_shrink_sum > 0.0 {
                scaled / scaled_shrink_sum
            } else {
                0.0
            };
            item.base_size + remaining_free_space.min(0.0) * ratio
        }
    }
}

fn factor(item: &FlexItem, mode: FlexMode) -> f64 {
    match mode {
        FlexMode::Grow => item.attrs.grow,
        FlexMode::Shrink => item.attrs.shrink,
    }
}

/// Container width minus frozen items' outer sizes and unfrozen items'
/// outer base sizes.
pub fn remaining_free_space(items: &[FlexItem], container_width: f64) -> f64 {
    items.iter().fold(container_width, |acc, item| {
        acc - item.outer_main_size().unwrap_or_else(|| item.outer_base_size())
    })
}

/// Resolve the main sizes of one line. Each item's width is handed to the
/// mutator the moment it freezes. A line whose items are all frozen is
/// left untouched.
pub fn resolve_flexible_lengths<M: BoxMutator>(
    items: &mut [FlexItem],
    container_width: f64,
    mutator: &mut M,
) {
    if items.iter().all(FlexItem::is_frozen) {
        return;
    }

    let sum_outer_hypothetical: f64 = items
        .iter()
        .map(|i| i.hypothetical_size() + i.metrics.main_extras())
        .sum();
    let mode = if sum_outer_hypothetical < container_width {
        FlexMode::Grow
    } else {
        FlexMode::Shrink
    };

    // Items that cannot move in this mode keep their hypothetical size.
    for item in items.iter_mut().filter(|i| !i.is_frozen()) {
        let hypothetical = item.hypothetical_size();
        let stuck = item.is_inflexible()
            || factor(item, mode) == 0.0
            || match mode {
                FlexMode::Grow => item.base_size > hypothetical,
                FlexMode::Shrink => item.base_size < hypothetical,
            };
        if stuck {
            item.freeze(hypothetical, mutator);
        }
    }

    let initial_free_space = remaining_free_space(items, container_width);
    let mut pass = 0usize;

    loop {
        let unfrozen: Vec<usize> = (0..items.len()).filter(|&i| !items[i].is_frozen()).collect();
        if unfrozen.is_empty() {
            break;
        }
        pass += 1;

        let mut remaining = remaining_free_space(items, container_width);
        let factor_sum: f64 = unfrozen.iter().map(|&i| factor(&items[i], mode)).sum();
        if factor_sum < 1.0 {
            let magnitude = initial_free_space * factor_sum;
            if magnitude.abs() < remaining.abs() {
                remaining = magnitude;
            }
        }
        let scaled_shrink_sum: f64 = unfrozen
            .iter()
            .map(|&i| items[i].attrs.shrink * items[i].base_size)
            .sum();

        let mut candidates = Vec::with_capacity(unfrozen.len());
        let mut total_violation = 0.0;
        for &i in &unfrozen {
            let target = target_main_size(&items[i], mode, remaining, factor_sum, scaled_shrink_sum);
            let clamped = clamp_main_size(&items[i].attrs, target);
            total_violation += clamped.size - target;
            candidates.push((i, clamped));
        }

        log::trace!(
            "flex pass {}: mode={:?} unfrozen={} free={:.3} violation={:.3}",
            pass,
            mode,
            unfrozen.len(),
            remaining,
            total_violation
        );

        let any_violation = candidates.iter().any(|(_, c)| c.violation.is_some());
        let freeze_only = if !any_violation || total_violation == 0.0 {
            None
        } else if total_violation > 0.0 {
            Some(Violation::Min)
        } else {
            Some(Violation::Max)
        };

        for (i, clamped) in candidates {
            let freeze = match freeze_only {
                None => true,
                Some(kind) => clamped.violation == Some(kind),
            };
            if freeze {
                items[i].freeze(clamped.size, mutator);
            }
        }
    }
}
