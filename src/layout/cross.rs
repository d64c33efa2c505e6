//! # Cross Sizing
//!
//! Line heights, line stacking (with `align-content` when the container
//! has an explicit height), and each item's placement inside its line.

use crate::style::{AlignContent, AlignItems, ContainerAttributes};

use super::flex::FlexItem;
use super::lines::FlexLine;

/// Content height plus padding, border and margin on the cross axis.
pub fn outer_cross_size(item: &FlexItem) -> f64 {
    item.metrics.content_height + item.metrics.cross_extras()
}

/// Fill in every line's height. A single-line container with an explicit
/// height uses it as-is; otherwise a line is as tall as its tallest item.
pub fn compute_line_heights(lines: &mut [FlexLine], attrs: &ContainerAttributes) {
    if attrs.is_single_line() {
        if let Some(height) = attrs.height {
            for line in lines.iter_mut() {
                line.height = height;
            }
            return;
        }
    }

    for line in lines.iter_mut() {
        line.height = line.items.iter().map(outer_cross_size).fold(0.0f64, f64::max);
    }
}

/// Top offset of each line, stacked in list order. Multi-line containers
/// with an explicit height distribute leftover cross space per
/// `align-content`; `stretch` also grows the lines.
pub fn stack_lines(lines: &mut [FlexLine], attrs: &ContainerAttributes) -> Vec<f64> {
    let n = lines.len();
    if n == 0 {
        return vec![];
    }

    let used: f64 = lines.iter().map(|l| l.height).sum();
    let slack = match attrs.height {
        Some(h) if !attrs.is_single_line() => (h - used).max(0.0),
        _ => 0.0,
    };

    let (start, between) = if slack > 0.0 {
        match attrs.align_content {
            AlignContent::FlexStart => (0.0, 0.0),
            AlignContent::FlexEnd => (slack, 0.0),
            AlignContent::Center => (slack / 2.0, 0.0),
            AlignContent::SpaceBetween => {
                if n <= 1 {
                    (0.0, 0.0)
                } else {
                    (0.0, slack / (n - 1) as f64)
                }
            }
            AlignContent::SpaceAround => {
                let space = slack / n as f64;
                (space / 2.0, space)
            }
            AlignContent::SpaceEvenly => {
                let space = slack / (n + 1) as f64;
                (space, space)
            }
            AlignContent::Stretch => {
                let extra = slack / n as f64;
                for line in lines.iter_mut() {
                    line.height += extra;
                }
                (0.0, 0.0)
            }
        }
    } else {
        (0.0, 0.0)
    };

    let mut tops = Vec::with_capacity(n);
    let mut y = start;
    for line in lines.iter() {
        tops.push(y);
        y += line.height + between;
    }
    tops
}

/// Offset of an item's margin edge from its line's top, and the
/// content height to apply when the item stretches.
pub fn place_in_line(item: &FlexItem, line_height: f64, align: AlignItems) -> (f64, Option<f64>) {
    let free = line_height - outer_cross_size(item);
    match align {
        AlignItems::FlexStart | AlignItems::Baseline => (0.0, None),
        AlignItems::FlexEnd => (free, None),
        AlignItems::Center => (free / 2.0, None),
        AlignItems::Stretch => {
            let height = (line_height - item.metrics.cross_extras()).max(0.0);
            (0.0, Some(height))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoxId, BoxMetrics, Edges};
    use crate::style::{FlexWrap, ItemAttributes};

    fn item(height: f64, margin: f64) -> FlexItem {
        FlexItem::new(
            BoxId(0),
            0,
            ItemAttributes::default(),
            BoxMetrics {
                content_height: height,
                margin: Edges::uniform(margin),
                padding: Edges::symmetric(1.0, 0.0),
                ..Default::default()
            },
            0.0,
        )
    }

    fn line(heights: &[f64]) -> FlexLine {
        FlexLine {
            items: heights.iter().map(|&h| item(h, 0.0)).collect(),
            height: 0.0,
        }
    }

    fn multi_line(height: Option<f64>, align_content: AlignContent) -> ContainerAttributes {
        ContainerAttributes {
            wrap: FlexWrap::Wrap,
            height,
            align_content,
            ..Default::default()
        }
    }

    #[test]
    fn line_height_is_tallest_outer_item() {
        let mut lines = vec![FlexLine {
            items: vec![item(10.0, 0.0), item(20.0, 3.0)],
            height: 0.0,
        }];
        compute_line_heights(&mut lines, &ContainerAttributes::default());
        // 20 + 2 padding + 6 margin
        assert_eq!(lines[0].height, 28.0);
    }

    #[test]
    fn single_line_explicit_height_wins() {
        let mut lines = vec![line(&[10.0])];
        let attrs = ContainerAttributes {
            height: Some(75.0),
            ..Default::default()
        };
        compute_line_heights(&mut lines, &attrs);
        assert_eq!(lines[0].height, 75.0);
    }

    #[test]
    fn multi_line_ignores_explicit_height_for_line_size() {
        let mut lines = vec![line(&[10.0]), line(&[4.0])];
        compute_line_heights(&mut lines, &multi_line(Some(100.0), AlignContent::FlexStart));
        assert_eq!(lines[0].height, 12.0);
        assert_eq!(lines[1].height, 6.0);
    }

    #[test]
    fn lines_stack_top_to_bottom() {
        let mut lines = vec![line(&[8.0]), line(&[18.0]), line(&[3.0])];
        let attrs = multi_line(None, AlignContent::Stretch);
        compute_line_heights(&mut lines, &attrs);
        assert_eq!(stack_lines(&mut lines, &attrs), vec![0.0, 10.0, 30.0]);
    }

    #[test]
    fn align_content_center_and_space_between() {
        let mut lines = vec![line(&[8.0]), line(&[8.0])];
        let attrs = multi_line(Some(60.0), AlignContent::Center);
        compute_line_heights(&mut lines, &attrs);
        assert_eq!(stack_lines(&mut lines, &attrs), vec![20.0, 30.0]);

        let attrs = multi_line(Some(60.0), AlignContent::SpaceBetween);
        assert_eq!(stack_lines(&mut lines, &attrs), vec![0.0, 50.0]);
    }

    #[test]
    fn align_content_stretch_grows_lines() {
        let mut lines = vec![line(&[8.0]), line(&[8.0])];
        let attrs = multi_line(Some(60.0), AlignContent::Stretch);
        compute_line_heights(&mut lines, &attrs);
        assert_eq!(stack_lines(&mut lines, &attrs), vec![0.0, 30.0]);
        assert_eq!(lines[0].height, 30.0);
    }

    #[test]
    fn placement_within_line() {
        let it = item(10.0, 0.0);
        assert_eq!(place_in_line(&it, 32.0, AlignItems::FlexStart), (0.0, None));
        assert_eq!(place_in_line(&it, 32.0, AlignItems::FlexEnd), (20.0, None));
        assert_eq!(place_in_line(&it, 32.0, AlignItems::Center), (10.0, None));
        assert_eq!(place_in_line(&it, 32.0, AlignItems::Stretch), (0.0, Some(30.0)));
    }
}
