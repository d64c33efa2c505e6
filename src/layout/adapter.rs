//! # Box Query Adapter
//!
//! The boundary over the host. Turns raw box metrics into the numbers the
//! algorithm works with: participating items, their base sizes and their
//! main/cross extras. Every host failure is surfaced here, before the
//! engine commits any geometry.

use thiserror::Error;

use crate::error::FlexError;
use crate::model::{BoxDisplay, BoxId, BoxMetrics};
use crate::style::{FlexBasis, ItemAttributeTable, ItemAttributes};

use super::flex::FlexItem;

/// Reports computed metrics for boxes. Implemented by the host.
pub trait StyleProvider {
    fn computed_box_metrics(&self, id: BoxId) -> BoxMetrics;

    /// Natural width of a box's content, measured off-flow.
    fn intrinsic_content_width(
        &self,
        id: BoxId,
        cx: &mut MeasureContext,
    ) -> Result<f64, MeasureError>;

    /// Name used to match item table keys. Hosts without names keep the default.
    fn box_name(&self, id: BoxId) -> Option<&str> {
        let _ = id;
        None
    }
}

/// Scratch state for a single intrinsic measurement. The engine creates a
/// fresh one per call; nothing survives between measurements.
#[derive(Debug, Clone, Default)]
pub struct MeasureContext {
    /// Upper bound on the measured width. `None` measures unconstrained.
    pub available_width: Option<f64>,
}

impl MeasureContext {
    pub fn unconstrained() -> Self {
        Self {
            available_width: None,
        }
    }

    pub fn constrain(&self, natural: f64) -> f64 {
        match self.available_width {
            Some(limit) => natural.min(limit),
            None => natural,
        }
    }
}

/// The host could not measure a box.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct MeasureError {
    pub reason: String,
}

impl MeasureError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Build flex items for every participating child, in document order.
/// `display: none` children are skipped; their index is still consumed so
/// index-keyed attributes keep matching the host's child list.
pub fn collect_items<P: StyleProvider>(
    provider: &P,
    children: &[BoxId],
    table: &ItemAttributeTable,
    container_width: f64,
) -> Result<Vec<FlexItem>, FlexError> {
    let mut items = Vec::with_capacity(children.len());

    for (index, &id) in children.iter().enumerate() {
        let metrics = provider.computed_box_metrics(id);
        if metrics.display == BoxDisplay::None {
            log::trace!("skipping non-participating box {:?}", id);
            continue;
        }

        let attrs = table.lookup(index, provider.box_name(id)).clone();
        let base_size = resolve_base_size(provider, index, id, &attrs, &metrics, container_width)?;
        items.push(FlexItem::new(id, index, attrs, metrics, base_size));
    }

    Ok(items)
}

/// Resolve an item's basis to exactly one concrete length.
///
/// `auto` uses the explicit `width` attribute, then the host's declared
/// content width, and otherwise falls through to `content`.
pub fn resolve_base_size<P: StyleProvider>(
    provider: &P,
    index: usize,
    id: BoxId,
    attrs: &ItemAttributes,
    metrics: &BoxMetrics,
    container_width: f64,
) -> Result<f64, FlexError> {
    match attrs.basis {
        FlexBasis::Length(px) => Ok(px),
        FlexBasis::Percent(p) => Ok((container_width * p / 100.0).max(0.0)),
        FlexBasis::Auto => match attrs.width.or(metrics.content_width) {
            Some(w) => Ok(w),
            None => content_width(provider, index, id),
        },
        FlexBasis::Content => content_width(provider, index, id),
    }
}

fn content_width<P: StyleProvider>(provider: &P, index: usize, id: BoxId) -> Result<f64, FlexError> {
    let mut cx = MeasureContext::unconstrained();
    provider
        .intrinsic_content_width(id, &mut cx)
        .map_err(|e| FlexError::MeasurementUnavailable {
            item: index,
            reason: e.reason,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edges;

    struct FakeHost {
        boxes: Vec<(BoxMetrics, Option<f64>)>,
    }

    impl StyleProvider for FakeHost {
        fn computed_box_metrics(&self, id: BoxId) -> BoxMetrics {
            self.boxes[id.0].0
        }

        fn intrinsic_content_width(
            &self,
            id: BoxId,
            cx: &mut MeasureContext,
        ) -> Result<f64, MeasureError> {
            self.boxes[id.0]
                .1
                .map(|w| cx.constrain(w))
                .ok_or_else(|| MeasureError::new("detached"))
        }
    }

    fn attrs(basis: FlexBasis) -> ItemAttributes {
        ItemAttributes {
            basis,
            ..Default::default()
        }
    }

    #[test]
    fn basis_resolution_order() {
        let host = FakeHost {
            boxes: vec![(
                BoxMetrics {
                    content_width: Some(70.0),
                    ..Default::default()
                },
                Some(33.0),
            )],
        };
        let m = host.computed_box_metrics(BoxId(0));
        let base = |a: &ItemAttributes| resolve_base_size(&host, 0, BoxId(0), a, &m, 200.0).unwrap();

        assert_eq!(base(&attrs(FlexBasis::Length(12.0))), 12.0);
        assert_eq!(base(&attrs(FlexBasis::Percent(25.0))), 50.0);
        assert_eq!(base(&attrs(FlexBasis::Content)), 33.0);
        assert_eq!(base(&attrs(FlexBasis::Auto)), 70.0);

        let explicit = ItemAttributes {
            width: Some(90.0),
            ..Default::default()
        };
        assert_eq!(base(&explicit), 90.0);
    }

    #[test]
    fn auto_without_width_measures_content() {
        let host = FakeHost {
            boxes: vec![(BoxMetrics::default(), Some(44.0))],
        };
        let m = host.computed_box_metrics(BoxId(0));
        let w = resolve_base_size(&host, 0, BoxId(0), &attrs(FlexBasis::Auto), &m, 100.0).unwrap();
        assert_eq!(w, 44.0);
    }

    #[test]
    fn measurement_failure_is_surfaced() {
        let host = FakeHost {
            boxes: vec![(BoxMetrics::default(), None)],
        };
        let m = host.computed_box_metrics(BoxId(0));
        let err = resolve_base_size(&host, 0, BoxId(0), &attrs(FlexBasis::Content), &m, 100.0)
            .unwrap_err();
        assert!(matches!(err, FlexError::MeasurementUnavailable { item: 0, .. }));
    }

    #[test]
    fn hidden_boxes_are_skipped_but_keep_their_index() {
        let host = FakeHost {
            boxes: vec![
                (
                    BoxMetrics {
                        display: BoxDisplay::None,
                        ..Default::default()
                    },
                    None,
                ),
                (
                    BoxMetrics {
                        padding: Edges::uniform(1.0),
                        content_width: Some(10.0),
                        ..Default::default()
                    },
                    None,
                ),
            ],
        };
        let items =
            collect_items(&host, &[BoxId(0), BoxId(1)], &ItemAttributeTable::default(), 100.0)
                .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].index, 1);
        assert_eq!(items[0].outer_base_size(), 12.0);
    }
}
