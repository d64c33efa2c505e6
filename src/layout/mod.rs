//! # Flex Layout Engine
//!
//! One pass lays out one container. The stages run in a fixed order:
//!
//! 1. **Adapter**: ask the host for metrics, drop `display: none` boxes,
//!    resolve every basis to a length. All failures happen here.
//! 2. **Lines**: sort by `order` and wrap into lines.
//! 3. **Flex**: resolve grow/shrink per line. Widths are committed to the
//!    host item by item as they freeze.
//! 4. **Cross**: line heights and line stacking.
//! 5. **Justify**: main-axis offsets per line, committed with the line's
//!    cross offset.
//!
//! The engine is synchronous and owns its [`FlexContainer`] for the length of
//! the pass. Nothing is kept between passes.

pub mod adapter;
pub mod cross;
pub mod flex;
pub mod justify;
pub mod lines;

use serde::Serialize;

use crate::error::FlexError;
use crate::model::{BoxId, Geometry, Position};
use crate::style::{ContainerAttributes, FlexDirection, ItemAttributeTable};

pub use adapter::{MeasureContext, MeasureError, StyleProvider};
use flex::FlexItem;
use justify::MainOffset;
use lines::FlexLine;

/// Applies geometry to host boxes. Implemented by the host.
pub trait BoxMutator {
    /// Make the container the coordinate space for its items' offsets.
    fn establish_containing_block(&mut self);

    /// Apply a geometry patch to one box.
    fn apply_geometry(&mut self, id: BoxId, geometry: &Geometry);
}

/// Everything one pass needs from the caller.
#[derive(Debug, Clone, Copy)]
pub struct FlexRequest<'a> {
    /// Available main-axis space (the container's content width).
    pub width: f64,
    pub attributes: &'a ContainerAttributes,
    pub items: &'a ItemAttributeTable,
    /// The container's children in document order.
    pub children: &'a [BoxId],
}

/// Working state of one pass.
#[derive(Debug, Clone)]
pub struct FlexContainer {
    pub attributes: ContainerAttributes,
    pub width: f64,
    pub lines: Vec<FlexLine>,
}

// ── Pass result ─────────────────────────────────────────────────

/// Resolved geometry of a whole pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexLayout {
    pub width: f64,
    pub lines: Vec<LineLayout>,
}

impl FlexLayout {
    /// All items in line order.
    pub fn items(&self) -> impl Iterator<Item = &ItemLayout> {
        self.lines.iter().flat_map(|l| l.items.iter())
    }

    pub fn item(&self, id: BoxId) -> Option<&ItemLayout> {
        self.items().find(|i| i.id == id)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineLayout {
    pub top: f64,
    pub height: f64,
    pub items: Vec<ItemLayout>,
}

/// Final placement of one item. `left`/`top` locate the margin box;
/// `width`/`height` are content-box sizes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLayout {
    pub id: BoxId,
    pub index: usize,
    pub offset: MainOffset,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub outer_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

// ── Engine ──────────────────────────────────────────────────────

/// Runs layout passes.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    _private: (),
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out one container. On error nothing has been committed to `mutator`.
    pub fn layout<P, M>(
        &self,
        request: &FlexRequest<'_>,
        provider: &P,
        mutator: &mut M,
    ) -> Result<FlexLayout, FlexError>
    where
        P: StyleProvider,
        M: BoxMutator,
    {
        let attrs = request.attributes;
        let items = adapter::collect_items(provider, request.children, request.items, request.width)?;
        let item_count = items.len();

        let mut container = FlexContainer {
            attributes: attrs.clone(),
            width: request.width,
            lines: lines::build_lines(
                items,
                request.width,
                attrs.is_single_line(),
                attrs.is_line_reverse(),
            ),
        };

        log::debug!(
            "flex pass: {} items in {} lines, width {}",
            item_count,
            container.lines.len(),
            container.width
        );

        for line in container.lines.iter_mut() {
            flex::resolve_flexible_lengths(&mut line.items, container.width, mutator);
        }

        cross::compute_line_heights(&mut container.lines, &container.attributes);
        let tops = cross::stack_lines(&mut container.lines, &container.attributes);

        mutator.establish_containing_block();
        let lines = container
            .lines
            .iter()
            .zip(tops)
            .map(|(line, top)| place_line(&container, line, top, mutator))
            .collect();

        Ok(FlexLayout {
            width: container.width,
            lines,
        })
    }
}

/// Distribute one resolved line on the main axis and commit each item's
/// final position.
fn place_line<M: BoxMutator>(
    container: &FlexContainer,
    line: &FlexLine,
    top: f64,
    mutator: &mut M,
) -> LineLayout {
    let attrs = &container.attributes;
    let outer_widths: Vec<f64> = line.items.iter().map(outer_main_size).collect();
    let offsets = justify::distribute(&outer_widths, container.width, attrs.justify_content);

    let items = line
        .items
        .iter()
        .zip(offsets)
        .zip(outer_widths)
        .map(|((item, offset), outer_width)| {
            let offset = match attrs.direction {
                FlexDirection::Row => offset,
                FlexDirection::RowReverse => offset.mirrored(),
            };
            let align = item.attrs.align_self.unwrap_or(attrs.align_items);
            let (cross_offset, stretched) = cross::place_in_line(item, line.height, align);
            let width = item.main_size().unwrap_or(item.base_size);
            let item_top = top + cross_offset;

            let (left, right) = match offset {
                MainOffset::Left(x) => (Some(x), None),
                MainOffset::Right(x) => (None, Some(x)),
            };
            mutator.apply_geometry(
                item.id,
                &Geometry {
                    position: Some(Position::Absolute),
                    top: Some(item_top),
                    left,
                    right,
                    width: Some(width),
                    height: stretched,
                },
            );

            ItemLayout {
                id: item.id,
                index: item.index,
                offset,
                left: offset.left_edge(outer_width, container.width),
                top: item_top,
                width,
                outer_width,
                height: stretched,
            }
        })
        .collect();

    LineLayout {
        top,
        height: line.height,
        items,
    }
}

fn outer_main_size(item: &FlexItem) -> f64 {
    item.outer_main_size().unwrap_or_else(|| item.outer_base_size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoxDisplay, BoxMetrics, Edges};
    use crate::style::{AlignItems, FlexWrap, ItemAttributes, JustifyContent};

    /// In-memory host that also records every call it receives.
    #[derive(Default)]
    struct Host {
        boxes: Vec<BoxMetrics>,
        log: Vec<(BoxId, Geometry)>,
        container_calls: usize,
    }

    impl StyleProvider for Host {
        fn computed_box_metrics(&self, id: BoxId) -> BoxMetrics {
            self.boxes[id.0]
        }

        fn intrinsic_content_width(
            &self,
            _id: BoxId,
            _cx: &mut MeasureContext,
        ) -> Result<f64, MeasureError> {
            Err(MeasureError::new("not measurable"))
        }
    }

    impl BoxMutator for Host {
        fn establish_containing_block(&mut self) {
            self.container_calls += 1;
        }

        fn apply_geometry(&mut self, id: BoxId, geometry: &Geometry) {
            self.log.push((id, *geometry));
        }
    }

    fn sized(width: f64, height: f64) -> BoxMetrics {
        BoxMetrics {
            content_width: Some(width),
            content_height: height,
            ..Default::default()
        }
    }

    fn run(
        host: &mut Host,
        width: f64,
        attrs: &ContainerAttributes,
        table: &ItemAttributeTable,
    ) -> Result<FlexLayout, FlexError> {
        let children: Vec<BoxId> = (0..host.boxes.len()).map(BoxId).collect();
        let request = FlexRequest {
            width,
            attributes: attrs,
            items: table,
            children: &children,
        };
        // provider and mutator are the same host; measure first, then mutate
        let snapshot = Host {
            boxes: host.boxes.clone(),
            ..Default::default()
        };
        LayoutEngine::new().layout(&request, &snapshot, host)
    }

    #[test]
    fn wrapped_lines_stack_by_height() {
        let mut host = Host {
            boxes: vec![sized(40.0, 10.0), sized(40.0, 25.0), sized(40.0, 5.0)],
            ..Default::default()
        };
        let attrs = ContainerAttributes {
            wrap: FlexWrap::Wrap,
            align_items: AlignItems::FlexStart,
            ..Default::default()
        };
        let layout = run(&mut host, 100.0, &attrs, &ItemAttributeTable::default()).unwrap();

        assert_eq!(layout.lines.len(), 2);
        assert_eq!(layout.lines[0].height, 25.0);
        assert_eq!(layout.lines[1].top, 25.0);
        let third = layout.item(BoxId(2)).unwrap();
        assert_eq!(third.top, 25.0);
        assert_eq!(third.left, 0.0);
        assert_eq!(host.container_calls, 1);
    }

    #[test]
    fn widths_are_committed_before_positions() {
        let mut host = Host {
            boxes: vec![sized(10.0, 10.0), sized(10.0, 10.0)],
            ..Default::default()
        };
        let table = ItemAttributeTable {
            default: ItemAttributes {
                grow: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        run(&mut host, 100.0, &ContainerAttributes::default(), &table).unwrap();

        assert_eq!(host.log.len(), 4);
        assert!(host.log[..2].iter().all(|(_, g)| g.position.is_none() && g.width == Some(50.0)));
        assert!(host.log[2..].iter().all(|(_, g)| g.position == Some(Position::Absolute)));
    }

    #[test]
    fn failed_measurement_commits_nothing() {
        let mut host = Host {
            boxes: vec![sized(10.0, 10.0), BoxMetrics::default()],
            ..Default::default()
        };
        let err = run(&mut host, 100.0, &ContainerAttributes::default(), &ItemAttributeTable::default())
            .unwrap_err();
        assert!(matches!(err, FlexError::MeasurementUnavailable { item: 1, .. }));
        assert!(host.log.is_empty());
        assert_eq!(host.container_calls, 0);
    }

    #[test]
    fn hidden_boxes_get_no_geometry() {
        let mut host = Host {
            boxes: vec![
                sized(10.0, 10.0),
                BoxMetrics {
                    display: BoxDisplay::None,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        run(&mut host, 100.0, &ContainerAttributes::default(), &ItemAttributeTable::default()).unwrap();
        assert!(host.log.iter().all(|(id, _)| *id == BoxId(0)));
    }

    #[test]
    fn row_reverse_mirrors_offsets() {
        let mut host = Host {
            boxes: vec![sized(10.0, 10.0), sized(20.0, 10.0)],
            ..Default::default()
        };
        let attrs = ContainerAttributes {
            direction: FlexDirection::RowReverse,
            ..Default::default()
        };
        let layout = run(&mut host, 100.0, &attrs, &ItemAttributeTable::default()).unwrap();
        assert_eq!(layout.item(BoxId(0)).unwrap().left, 90.0);
        assert_eq!(layout.item(BoxId(1)).unwrap().left, 70.0);
    }

    #[test]
    fn margins_offset_the_margin_box() {
        let mut host = Host {
            boxes: vec![
                BoxMetrics {
                    margin: Edges::symmetric(0.0, 5.0),
                    ..sized(10.0, 10.0)
                },
                sized(10.0, 10.0),
            ],
            ..Default::default()
        };
        let attrs = ContainerAttributes {
            justify_content: JustifyContent::FlexStart,
            ..Default::default()
        };
        let layout = run(&mut host, 100.0, &attrs, &ItemAttributeTable::default()).unwrap();
        assert_eq!(layout.item(BoxId(0)).unwrap().outer_width, 20.0);
        assert_eq!(layout.item(BoxId(1)).unwrap().left, 20.0);
    }

    #[test]
    fn default_stretch_fills_line_height() {
        let mut host = Host {
            boxes: vec![sized(10.0, 10.0), sized(10.0, 30.0)],
            ..Default::default()
        };
        let layout = run(&mut host, 100.0, &ContainerAttributes::default(), &ItemAttributeTable::default())
            .unwrap();
        assert_eq!(layout.item(BoxId(0)).unwrap().height, Some(30.0));
    }

    #[test]
    fn empty_container_lays_out_nothing() {
        let mut host = Host::default();
        let layout = run(&mut host, 100.0, &ContainerAttributes::default(), &ItemAttributeTable::default())
            .unwrap();
        assert!(layout.lines.is_empty());
        assert_eq!(host.container_calls, 1);
    }
}
